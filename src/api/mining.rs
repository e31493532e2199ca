use actix_web::{HttpResponse, Responder, post, web};
use log::{info, warn};

use super::models::{AppState, ErrorResponse, MineRequest, MineResponse};
use crate::blockchain::{Block, codec};
use crate::error::LedgerError;

fn error_response(err: &LedgerError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        LedgerError::StaleTip { .. } => HttpResponse::Conflict().json(body),
        LedgerError::SearchExhausted { .. } => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn accepted(state: &AppState, block: Block) -> HttpResponse {
    let mut chain = state.chain.lock().expect("mutex poisoned");
    let (mined_index, difficulty) = (chain.len(), chain.difficulty());
    match chain.accept(block) {
        Ok(b) => {
            let resp = MineResponse {
                mined_index,
                hash: hex::encode(b.hash()),
                nonce: b.nonce(),
                difficulty,
            };
            HttpResponse::Ok().json(resp)
        }
        Err(e) => error_response(&e),
    }
}

/// Mine a new block carrying `data` on top of the current tip.
///
/// The search runs on the blocking pool without holding the chain lock;
/// if another block lands first the result is rejected with 409.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>, req: web::Json<MineRequest>) -> impl Responder {
    let payload = req.into_inner().data.into_bytes();

    // snapshot the head, release the lock before PoW
    let (prev_hash, target) = {
        let chain = state.chain.lock().expect("mutex poisoned");
        (*chain.tip().hash(), chain.target())
    };

    let mined = web::block(move || Block::create(payload, &prev_hash, target)).await;
    let block = match mined {
        Ok(Ok(block)) => block,
        Ok(Err(e)) => return error_response(&e),
        Err(e) => {
            warn!("MINER - blocking task failed: {}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    info!(
        "MINER - sealed block (hash={}, nonce={})",
        hex::encode(block.hash()),
        block.nonce()
    );
    accepted(&state, block)
}

/// Submit a block mined elsewhere. It is decoded, re-validated and appended
/// only if it extends the current tip.
#[post("/blocks/")]
pub async fn submit_block(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let block = match codec::deserialize(&body) {
        Ok(b) => b,
        Err(e) => {
            warn!("SUBMIT - undecodable block: {}", e);
            return error_response(&e);
        }
    };
    accepted(&state, block)
}
