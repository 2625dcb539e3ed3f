use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_web::web;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::blockchain::{Block, Blockchain, CancelOnDrop, ProofOfWork};
use crate::config::NodeConfig;
use crate::consensus::{ChainFetcher, HttpChainFetcher, reconcile};
use crate::error::NodeError;
use crate::transaction::Transaction;

/// How many times a mint is retried when the head moves during the search.
const MAX_MINE_ATTEMPTS: usize = 3;

/// Result of a reconciliation request.
#[derive(Debug)]
pub struct ChainReplacement {
    pub replaced: bool,
    pub chain: Arc<Vec<Block>>,
}

/// Process-wide node state shared by every request handler.
///
/// All mutation of the chain, pending buffer and peer set goes through the
/// single `ledger` lock. The proof-of-work search and peer fetches run
/// without holding it.
pub struct NodeState {
    ledger: Mutex<Blockchain>,
    solver: ProofOfWork,
    fetcher: Box<dyn ChainFetcher>,
    node_id: String,
    reward_receiver: String,
    mining_reward: f64,
}

impl NodeState {
    pub fn new(config: &NodeConfig, fetcher: Box<dyn ChainFetcher>) -> Self {
        Self {
            ledger: Mutex::new(Blockchain::new(config.difficulty)),
            solver: ProofOfWork::new(config.difficulty, Some(config.mining_timeout)),
            fetcher,
            node_id: Uuid::new_v4().simple().to_string(),
            reward_receiver: config.reward_receiver.clone(),
            mining_reward: config.mining_reward,
        }
    }

    /// State that reaches peers over HTTP.
    pub fn from_config(config: &NodeConfig) -> Result<Self, reqwest::Error> {
        let fetcher = HttpChainFetcher::new(config.peer_timeout)?;
        Ok(Self::new(config, Box::new(fetcher)))
    }

    fn ledger(&self) -> MutexGuard<'_, Blockchain> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn chain(&self) -> Arc<Vec<Block>> {
        self.ledger().snapshot()
    }

    pub fn pending(&self) -> Vec<Transaction> {
        self.ledger().pending().to_vec()
    }

    pub fn is_valid(&self) -> bool {
        self.ledger().is_valid()
    }

    pub fn add_transaction(&self, tx: Transaction) -> Result<u64, NodeError> {
        let mut ledger = self.ledger();
        let index = ledger.add_transaction(tx)?;
        debug!(
            "TX - queued for block #{} (pending={})",
            index,
            ledger.pending().len()
        );
        Ok(index)
    }

    /// Register peers and return the full peer list.
    pub fn connect_nodes(&self, addresses: &[String]) -> Vec<String> {
        let mut ledger = self.ledger();
        for addr in addresses {
            if ledger.add_peer(addr) {
                info!("PEERS - registered {}", addr.trim());
            }
        }
        ledger.peers().to_vec()
    }

    /// Solve a proof for the current head and seal the pending buffer,
    /// together with this node's mining reward, into a new block.
    pub async fn mine_block(&self) -> Result<Block, NodeError> {
        self.mine_block_with(|| {}).await
    }

    /// `before_seal` runs after each search, before the head is re-checked.
    async fn mine_block_with<H: FnMut()>(&self, mut before_seal: H) -> Result<Block, NodeError> {
        for attempt in 1..=MAX_MINE_ATTEMPTS {
            let (previous_proof, previous_hash) = {
                let ledger = self.ledger();
                let head = ledger.head()?;
                (head.proof, head.hash())
            };

            let solver = self.solver.clone();
            // dropping the request drops the guard and stops the search thread
            let cancel = CancelOnDrop::new();
            let flag = cancel.flag();
            let proof = web::block(move || solver.solve_until(previous_proof, &flag)).await??;
            drop(cancel);
            before_seal();

            let mut ledger = self.ledger();
            if ledger.head()?.hash() != previous_hash {
                warn!("MINER - head moved during search (attempt {attempt}), retrying");
                continue;
            }
            ledger.add_transaction(Transaction::new(
                self.node_id.clone(),
                self.reward_receiver.clone(),
                self.mining_reward,
            ))?;
            let block = ledger.mint(proof, previous_hash);
            info!(
                "MINER - sealed block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(block);
        }
        Err(NodeError::StaleHead)
    }

    /// Adopt the longest valid chain among the known peers, if it beats ours.
    pub async fn replace_chain(&self) -> ChainReplacement {
        let (local, peers, difficulty) = {
            let ledger = self.ledger();
            (ledger.snapshot(), ledger.peers().to_vec(), ledger.difficulty())
        };

        let resolution = reconcile(local, &peers, self.fetcher.as_ref(), difficulty).await;
        if !resolution.skipped.is_empty() {
            debug!(
                "CONSENSUS - {} of {} peers skipped",
                resolution.skipped.len(),
                peers.len()
            );
        }

        let mut ledger = self.ledger();
        // the chain may have grown while peers were polled
        let replaced = resolution.replaced && ledger.adopt(resolution.chain);
        ChainReplacement {
            replaced,
            chain: ledger.snapshot(),
        }
    }
}
