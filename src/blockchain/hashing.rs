use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::Block;

/// A 32-byte SHA-256 digest. Serialized as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }

    /// Number of leading zero nibbles (hex digits) in the digest.
    pub fn leading_zero_nibbles(&self) -> u32 {
        let mut count = 0;
        for byte in self.0 {
            if byte == 0 {
                count += 2;
                continue;
            }
            if byte >> 4 == 0 {
                count += 1;
            }
            break;
        }
        count
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.to_hex())
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BlockHash::from_hex(&s).map_err(D::Error::custom)
    }
}

/// Hash every field of a block.
///
/// Byte layout, in order: index (u64 BE), timestamp millis (i64 BE),
/// proof (u64 BE), previous hash (32 bytes), transaction count (u64 BE),
/// then for each transaction the length-prefixed sender and receiver
/// followed by the IEEE-754 bits of the amount (u64 BE).
pub fn hash_block(block: &Block) -> BlockHash {
    let mut hasher = Sha256::new();
    hasher.update(block.index.to_be_bytes());
    hasher.update(block.timestamp.to_be_bytes());
    hasher.update(block.proof.to_be_bytes());
    hasher.update(block.previous_hash.as_bytes());
    hasher.update((block.transactions.len() as u64).to_be_bytes());
    for tx in &block.transactions {
        hasher.update((tx.sender.len() as u64).to_be_bytes());
        hasher.update(tx.sender.as_bytes());
        hasher.update((tx.receiver.len() as u64).to_be_bytes());
        hasher.update(tx.receiver.as_bytes());
        hasher.update(tx.amount.to_bits().to_be_bytes());
    }
    BlockHash(hasher.finalize().into())
}

/// Decimal rendering of `candidate² - previous²`.
///
/// Squares are taken in u128, which holds any u64 square exactly.
pub fn encode_proof_candidate(candidate: u64, previous: u64) -> String {
    let c = u128::from(candidate) * u128::from(candidate);
    let p = u128::from(previous) * u128::from(previous);
    if c >= p {
        (c - p).to_string()
    } else {
        format!("-{}", p - c)
    }
}

/// SHA-256 of [`encode_proof_candidate`].
pub fn hash_proof_candidate(candidate: u64, previous: u64) -> BlockHash {
    let encoded = encode_proof_candidate(candidate, previous);
    BlockHash(Sha256::digest(encoded.as_bytes()).into())
}

/// True when the digest starts with at least `difficulty` zero nibbles.
pub fn meets_difficulty(hash: &BlockHash, difficulty: u32) -> bool {
    hash.leading_zero_nibbles() >= difficulty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::GENESIS_PREVIOUS_HASH;
    use crate::transaction::Transaction;

    fn sample_block() -> Block {
        Block {
            index: 3,
            timestamp: 1_700_000_000_000,
            proof: 533,
            previous_hash: GENESIS_PREVIOUS_HASH,
            transactions: vec![Transaction::new("alice", "bob", 1.5)],
        }
    }

    #[test]
    fn block_hash_is_deterministic() {
        let b = sample_block();
        assert_eq!(hash_block(&b), hash_block(&b));
        assert_eq!(hash_block(&b), hash_block(&b.clone()));
    }

    #[test]
    fn every_field_feeds_the_block_hash() {
        let base = hash_block(&sample_block());

        let mut b = sample_block();
        b.index += 1;
        assert_ne!(hash_block(&b), base);

        let mut b = sample_block();
        b.timestamp += 1;
        assert_ne!(hash_block(&b), base);

        let mut b = sample_block();
        b.proof += 1;
        assert_ne!(hash_block(&b), base);

        let mut b = sample_block();
        b.previous_hash = BlockHash([1; 32]);
        assert_ne!(hash_block(&b), base);

        let mut b = sample_block();
        b.transactions[0].amount = 2.0;
        assert_ne!(hash_block(&b), base);
    }

    #[test]
    fn transaction_fields_are_length_prefixed() {
        let mut a = sample_block();
        a.transactions = vec![Transaction::new("ab", "c", 1.0)];
        let mut b = sample_block();
        b.transactions = vec![Transaction::new("a", "bc", 1.0)];
        assert_ne!(hash_block(&a), hash_block(&b));
    }

    #[test]
    fn proof_encoding_is_difference_of_squares() {
        assert_eq!(encode_proof_candidate(1, 2), "-3");
        assert_eq!(encode_proof_candidate(5, 3), "16");
        assert_eq!(encode_proof_candidate(7, 7), "0");
        assert_eq!(
            encode_proof_candidate(u64::MAX, 0),
            (u128::from(u64::MAX) * u128::from(u64::MAX)).to_string()
        );
    }

    #[test]
    fn proof_hash_is_sha256_of_encoding() {
        // sha256("0")
        assert_eq!(
            hash_proof_candidate(4, 4).to_hex(),
            "5feceb66ffc86f38d952786c6d696c79c2dbc239dd4e91b46729d73a27fb57e9"
        );
    }

    #[test]
    fn counts_leading_zero_nibbles() {
        let mut bytes = [0xffu8; 32];
        assert_eq!(BlockHash(bytes).leading_zero_nibbles(), 0);
        bytes[0] = 0x0f;
        assert_eq!(BlockHash(bytes).leading_zero_nibbles(), 1);
        bytes[0] = 0x00;
        bytes[1] = 0x00;
        bytes[2] = 0x01;
        assert_eq!(BlockHash(bytes).leading_zero_nibbles(), 5);
        assert_eq!(BlockHash([0; 32]).leading_zero_nibbles(), 64);

        assert!(meets_difficulty(&BlockHash(bytes), 5));
        assert!(!meets_difficulty(&BlockHash(bytes), 6));
    }

    #[test]
    fn hex_serde_round_trip() {
        let h = hash_block(&sample_block());
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: BlockHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
        assert!(serde_json::from_str::<BlockHash>("\"abcd\"").is_err());
    }
}
