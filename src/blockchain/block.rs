use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hashing::{BlockHash, hash_block};
use crate::transaction::Transaction;

/// A sealed block. Never mutated once it is part of a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix milliseconds (UTC)
    pub proof: u64,
    pub previous_hash: BlockHash,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Seal a block stamped with the current time.
    pub fn new(
        index: u64,
        proof: u64,
        previous_hash: BlockHash,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp_millis(),
            proof,
            previous_hash,
            transactions,
        }
    }

    pub fn hash(&self) -> BlockHash {
        hash_block(self)
    }
}
