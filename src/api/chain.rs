use actix_web::{HttpResponse, Responder, get, web};
use log::debug;

use super::models::{AppState, BlockView, ChainResponse, ErrorResponse, ValidateResponse};
use crate::blockchain::codec;
use crate::error::LedgerError;

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.chain.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: chain.len(),
        difficulty: chain.difficulty(),
        target: chain.target().to_hex(),
        chain: chain
            .iter()
            .enumerate()
            .map(|(i, b)| BlockView::new(i, b))
            .collect(),
    };
    HttpResponse::Ok().json(resp)
}

/// Get a single block by height.
#[get("/chain/{index}/")]
pub async fn get_block(state: web::Data<AppState>, path: web::Path<(usize,)>) -> impl Responder {
    let index = path.into_inner().0;
    let chain = state.chain.lock().expect("mutex poisoned");
    match chain.get(index) {
        Some(block) => HttpResponse::Ok().json(BlockView::new(index, block)),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("no block at height {} (length {})", index, chain.len()),
        }),
    }
}

/// Get a single block in its wire encoding, ready to be submitted elsewhere.
#[get("/chain/{index}/raw/")]
pub async fn get_raw_block(state: web::Data<AppState>, path: web::Path<(usize,)>) -> impl Responder {
    let index = path.into_inner().0;
    let chain = state.chain.lock().expect("mutex poisoned");
    let Some(block) = chain.get(index) else {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: format!("no block at height {} (length {})", index, chain.len()),
        });
    };
    match codec::serialize(block) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("application/json")
            .body(bytes),
        Err(e) => HttpResponse::InternalServerError().json(ErrorResponse {
            error: e.to_string(),
        }),
    }
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.chain.lock().expect("mutex poisoned");
    let (failed_index, reason) = match chain.verify() {
        Ok(()) => (None, None),
        Err(LedgerError::ChainIntegrityViolation { index, reason }) => {
            (Some(index), Some(reason.to_string()))
        }
        Err(other) => (None, Some(other.to_string())),
    };
    debug!("validate: length={} failed_index={:?}", chain.len(), failed_index);

    HttpResponse::Ok().json(ValidateResponse {
        valid: reason.is_none(),
        length: chain.len(),
        difficulty: chain.difficulty(),
        failed_index,
        reason,
    })
}
