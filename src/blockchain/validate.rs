use std::fmt;

use super::Block;
use super::hashing::{hash_proof_candidate, meets_difficulty};

/// First point at which a chain stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainBreak {
    Empty,
    /// `previous_hash` of the block at `index` does not match its predecessor.
    BrokenLink { index: usize },
    /// Block at `index` does not carry its predecessor's index plus one.
    BadIndex { index: usize },
    /// Proof of the block at `index` does not meet the difficulty.
    BadProof { index: usize },
    /// First block of a replacement chain is not index 0.
    BadGenesis,
}

impl fmt::Display for ChainBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainBreak::Empty => write!(f, "chain is empty"),
            ChainBreak::BrokenLink { index } => {
                write!(f, "block at position {index} does not link to its predecessor")
            }
            ChainBreak::BadIndex { index } => {
                write!(f, "block at position {index} is out of sequence")
            }
            ChainBreak::BadProof { index } => {
                write!(f, "block at position {index} carries an invalid proof")
            }
            ChainBreak::BadGenesis => write!(f, "chain does not start at index 0"),
        }
    }
}

/// Walk every adjacent pair and report the first break.
///
/// A single block has no pair to check and is valid.
pub fn check_chain(chain: &[Block], difficulty: u32) -> Result<(), ChainBreak> {
    if chain.is_empty() {
        return Err(ChainBreak::Empty);
    }

    for (i, pair) in chain.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let index = i + 1;

        if cur.previous_hash != prev.hash() {
            return Err(ChainBreak::BrokenLink { index });
        }

        if prev.index.checked_add(1) != Some(cur.index) {
            return Err(ChainBreak::BadIndex { index });
        }

        let digest = hash_proof_candidate(cur.proof, prev.proof);
        if !meets_difficulty(&digest, difficulty) {
            return Err(ChainBreak::BadProof { index });
        }
    }

    Ok(())
}

pub fn is_valid_chain(chain: &[Block], difficulty: u32) -> bool {
    check_chain(chain, difficulty).is_ok()
}

/// [`check_chain`] plus the genesis rule a chain must meet before it may
/// replace the local one: indices start at 0, so they can never overflow.
pub fn check_replacement(chain: &[Block], difficulty: u32) -> Result<(), ChainBreak> {
    check_chain(chain, difficulty)?;
    if chain[0].index != 0 {
        return Err(ChainBreak::BadGenesis);
    }
    Ok(())
}
