use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::transaction::Transaction;

pub use crate::node::NodeState as AppState;

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    #[serde(flatten)]
    pub block: Block,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ReplaceChainResponse<'a> {
    pub message: String,
    pub replaced: bool,
    pub chain: &'a [Block],
}

/* ---------- TX API Models ---------- */

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Peer API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectNodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ConnectNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}
