pub mod block;
pub mod codec;
pub mod model;
pub mod pow;
pub mod target;

pub use block::Block;
pub use model::Chain;
pub use target::HashTarget;

/// Default Proof-of-Work difficulty (leading zero bits), fixed for the process.
pub const DEFAULT_DIFFICULTY: u32 = 18;

/// Payload of the first block in every chain.
pub const GENESIS_PAYLOAD: &str = "Genesis";
