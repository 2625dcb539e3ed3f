use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::NodeError;

/// Route every node serves its chain on.
pub const PEER_CHAIN_PATH: &str = "/api/v1/get_chain";

/// A chain as reported by a node: the blocks plus the length it claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Source of peer chains used during reconciliation.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, NodeError>;
}

/// Fetches `GET {peer}/api/v1/get_chain` with a per-request timeout.
#[derive(Clone)]
pub struct HttpChainFetcher {
    inner: Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, NodeError> {
        let url = format!("{peer}{PEER_CHAIN_PATH}");
        let unreachable = |reason: String| NodeError::PeerUnreachable {
            peer: peer.to_string(),
            reason,
        };

        let response = self
            .inner
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unreachable(format!("HTTP status {}", response.status())));
        }

        let body: PeerChain = response
            .json()
            .await
            .map_err(|e| unreachable(format!("unreadable chain payload: {e}")))?;
        debug!("FETCH - {} reported {} blocks", peer, body.length);
        Ok(body)
    }
}
