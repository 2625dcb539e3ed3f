pub mod block;
pub mod hashing;
pub mod model;
pub mod pow;
pub mod validate;

pub use block::Block;
pub use hashing::BlockHash;
pub use model::Blockchain;
pub use pow::{CancelOnDrop, ProofOfWork};
pub use validate::{check_replacement, is_valid_chain};

/// Default Proof-of-Work difficulty (leading zero hex digits of the proof digest).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Difficulty bounds; a SHA-256 digest has 64 hex digits.
pub const DIFF_MIN: u32 = 1;
pub const DIFF_MAX: u32 = 64;

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 1;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: BlockHash = BlockHash([0u8; 32]);
