use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let chain = state.chain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(StatsResponse {
        height: chain.len(),
        difficulty: chain.difficulty(),
        target: chain.target().to_hex(),
        genesis_hash: hex::encode(chain.blocks()[0].hash()),
        tip_hash: hex::encode(chain.tip().hash()),
    })
}
