use std::sync::Arc;

use log::{debug, info};

use super::hashing::BlockHash;
use super::{
    Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, check_replacement, is_valid_chain,
};
use crate::consensus::PeerSet;
use crate::error::NodeError;
use crate::transaction::Transaction;

/// In-memory chain store: sealed blocks, the pending buffer and known peers.
///
/// The chain lives behind an `Arc` so readers can hold a snapshot while a
/// mint (copy-on-write) or a reconciliation (whole swap) replaces it.
#[derive(Debug)]
pub struct Blockchain {
    chain: Arc<Vec<Block>>,
    pending: Vec<Transaction>,
    peers: PeerSet,
    difficulty: u32,
}

impl Blockchain {
    /// A store holding only the genesis block.
    pub fn new(difficulty: u32) -> Self {
        let mut bc = Self::empty(difficulty);
        let genesis = bc.mint(GENESIS_PROOF, GENESIS_PREVIOUS_HASH);
        debug!("genesis sealed at {}", genesis.timestamp);
        bc
    }

    fn empty(difficulty: u32) -> Self {
        Self {
            chain: Arc::new(Vec::new()),
            pending: Vec::new(),
            peers: PeerSet::default(),
            difficulty,
        }
    }

    /// Seal the pending buffer into a new block on top of the head.
    pub fn mint(&mut self, proof: u64, previous_hash: BlockHash) -> Block {
        let index = self.chain.last().map_or(0, |head| head.index + 1);
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(index, proof, previous_hash, transactions);
        Arc::make_mut(&mut self.chain).push(block.clone());
        block
    }

    pub fn head(&self) -> Result<&Block, NodeError> {
        self.chain.last().ok_or(NodeError::EmptyChain)
    }

    /// Queue a transaction; returns the index of the block that will carry it.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<u64, NodeError> {
        let next = self.head()?.index + 1;
        self.pending.push(tx);
        Ok(next)
    }

    pub fn add_peer(&mut self, address: &str) -> bool {
        self.peers.insert(address)
    }

    /// Swap in `candidate` if it is strictly longer, valid and rooted at index 0.
    pub fn adopt(&mut self, candidate: Arc<Vec<Block>>) -> bool {
        if candidate.len() <= self.len() {
            debug!(
                "keeping local chain ({} blocks) over candidate ({} blocks)",
                self.chain.len(),
                candidate.len()
            );
            return false;
        }
        if let Err(brk) = check_replacement(&candidate, self.difficulty) {
            debug!("rejecting candidate chain: {brk}");
            return false;
        }
        info!(
            "chain replaced: {} -> {} blocks",
            self.chain.len(),
            candidate.len()
        );
        self.chain = candidate;
        true
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Cheap shared handle to the current chain.
    pub fn snapshot(&self) -> Arc<Vec<Block>> {
        Arc::clone(&self.chain)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn is_valid(&self) -> bool {
        is_valid_chain(self.chain(), self.difficulty)
    }
}

#[cfg(test)]
impl Blockchain {
    /// Solve and mint on top of the current head (test helper).
    pub fn mine_next(&mut self) -> Result<Block, NodeError> {
        let head = self.head()?;
        let previous_hash = head.hash();
        let proof = super::ProofOfWork::new(self.difficulty, None).solve(head.proof)?;
        Ok(self.mint(proof, previous_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::ProofOfWork;

    const DIFF: u32 = 2;

    #[test]
    fn starts_with_genesis() {
        let bc = Blockchain::new(DIFF);
        assert_eq!(bc.len(), 1);
        let genesis = bc.head().unwrap();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.proof, GENESIS_PROOF);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions.is_empty());
        assert!(bc.is_valid());
    }

    #[test]
    fn head_of_empty_store_fails() {
        let bc = Blockchain::empty(DIFF);
        assert!(matches!(bc.head(), Err(NodeError::EmptyChain)));
        let mut bc = bc;
        assert!(matches!(
            bc.add_transaction(Transaction::new("a", "b", 1.0)),
            Err(NodeError::EmptyChain)
        ));
    }

    #[test]
    fn add_transaction_targets_next_block() {
        let mut bc = Blockchain::new(DIFF);
        assert_eq!(bc.add_transaction(Transaction::new("a", "b", 1.0)).unwrap(), 1);
        assert_eq!(bc.add_transaction(Transaction::new("b", "c", 2.0)).unwrap(), 1);
        assert_eq!(bc.pending().len(), 2);
    }

    #[test]
    fn mint_drains_pending_buffer() {
        let mut bc = Blockchain::new(DIFF);
        bc.add_transaction(Transaction::new("a", "b", 1.0)).unwrap();
        bc.add_transaction(Transaction::new("b", "c", 2.0)).unwrap();

        let first = bc.mine_next().unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(first.transactions.len(), 2);
        assert!(bc.pending().is_empty());

        let second = bc.mine_next().unwrap();
        assert_eq!(second.index, 2);
        assert!(second.transactions.is_empty());
        assert_eq!(second.previous_hash, first.hash());
        assert!(bc.is_valid());
    }

    #[test]
    fn mint_does_not_disturb_snapshots() {
        let mut bc = Blockchain::new(DIFF);
        let before = bc.snapshot();
        bc.mine_next().unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(bc.len(), 2);
    }

    #[test]
    fn peers_are_deduplicated() {
        let mut bc = Blockchain::new(DIFF);
        assert!(bc.add_peer("127.0.0.1:5001"));
        assert!(!bc.add_peer("127.0.0.1:5001"));
        assert!(!bc.add_peer(""));
        assert_eq!(bc.peers().len(), 1);
    }

    #[test]
    fn adopt_requires_strictly_longer_valid_chain() {
        let mut local = Blockchain::new(DIFF);
        local.mine_next().unwrap();

        let mut other = Blockchain::new(DIFF);
        other.mine_next().unwrap();
        assert!(!local.adopt(other.snapshot()), "equal length never replaces");

        other.mine_next().unwrap();
        let mut forged = other.chain().to_vec();
        forged[2].previous_hash = GENESIS_PREVIOUS_HASH;
        assert!(!local.adopt(Arc::new(forged)));
        assert_eq!(local.len(), 2);

        assert!(local.adopt(other.snapshot()));
        assert_eq!(local.chain(), other.chain());
    }

    #[test]
    fn adopt_refuses_chain_ending_at_max_index() {
        let mut local = Blockchain::new(DIFF);
        let genesis = local.head().unwrap().clone();
        let proof = ProofOfWork::new(DIFF, None)
            .solve(genesis.proof)
            .unwrap();
        let jump = Block::new(u64::MAX, proof, genesis.hash(), vec![]);
        assert!(!local.adopt(Arc::new(vec![genesis.clone(), jump])));

        let tail_start = Block::new(
            u64::MAX - 1,
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH,
            vec![],
        );
        let proof = ProofOfWork::new(DIFF, None)
            .solve(tail_start.proof)
            .unwrap();
        let tail_end = Block::new(u64::MAX, proof, tail_start.hash(), vec![]);
        assert!(!local.adopt(Arc::new(vec![tail_start, tail_end])));

        assert_eq!(local.len(), 1);
        assert_eq!(
            local.add_transaction(Transaction::new("a", "b", 1.0)).unwrap(),
            1
        );
    }
}
