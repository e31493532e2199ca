use crate::blockchain::codec::BlockRecord;
use crate::blockchain::{Block, Chain};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state: one in-memory chain, one writer at a time.
pub struct AppState {
    pub chain: Mutex<Chain>,
}

impl AppState {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain: Mutex::new(chain),
        }
    }
}

/* ---------- Chain API Models ---------- */

/// A block as shown to API clients: wire fields plus readable text.
#[derive(Serialize)]
pub struct BlockView {
    pub index: usize,
    #[serde(flatten)]
    pub record: BlockRecord,
    pub text: String,
}

impl BlockView {
    pub fn new(index: usize, block: &Block) -> Self {
        Self {
            index,
            text: String::from_utf8_lossy(block.payload()).into_owned(),
            record: BlockRecord::from(block.clone()),
        }
    }
}

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub difficulty: u32,
    pub target: String,
    pub chain: Vec<BlockView>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    pub failed_index: Option<usize>,
    pub reason: Option<String>,
}

/* ---------- Mining API Models ---------- */

#[derive(Deserialize)]
pub struct MineRequest {
    pub data: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub mined_index: usize,
    pub hash: String,
    pub nonce: i64,
    pub difficulty: u32,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty: u32,
    pub target: String,
    pub genesis_hash: String,
    pub tip_hash: String,
}
