mod chain;
mod health;
mod mining;
pub mod models;
mod stats;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::get_raw_block)
            .service(chain::get_block)
            .service(chain::validate_chain)
            .service(mining::mine_block)
            .service(mining::submit_block)
            .service(stats::get_stats),
    );
}
