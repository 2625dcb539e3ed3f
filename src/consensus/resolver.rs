use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};

use super::fetch::{ChainFetcher, PeerChain};
use crate::blockchain::{Block, check_replacement};
use crate::error::NodeError;

/// Outcome of one reconciliation round.
#[derive(Debug)]
pub struct Resolution {
    /// Longest valid chain seen (the local one when nothing beat it).
    pub chain: Arc<Vec<Block>>,
    pub replaced: bool,
    /// Peer the winning chain came from.
    pub source: Option<String>,
    /// Peers left out of the comparison and why.
    pub skipped: Vec<NodeError>,
}

/// Poll every peer once and pick the longest valid chain.
///
/// Fetches run concurrently. A peer that cannot be reached or reports an
/// invalid chain is skipped; it never aborts the round. Only a strictly
/// longer chain beats the current best.
pub async fn reconcile<F>(
    local: Arc<Vec<Block>>,
    peers: &[String],
    fetcher: &F,
    difficulty: u32,
) -> Resolution
where
    F: ChainFetcher + ?Sized,
{
    let fetches = peers.iter().map(move |peer| async move {
        let result = fetcher.fetch_chain(peer).await;
        (peer.as_str(), result)
    });
    let results = join_all(fetches).await;

    let mut longest = Arc::clone(&local);
    let mut max_len = local.len();
    let mut source = None;
    let mut skipped = Vec::new();

    for (peer, result) in results {
        let reported = match result {
            Ok(reported) => reported,
            Err(e) => {
                warn!("CONSENSUS - skipping peer: {e}");
                skipped.push(e);
                continue;
            }
        };

        if reported.length <= max_len {
            debug!(
                "CONSENSUS - {} has {} blocks, best so far is {}",
                peer, reported.length, max_len
            );
            continue;
        }

        if let Err(e) = vet_candidate(peer, &reported, difficulty) {
            warn!("CONSENSUS - discarding candidate: {e}");
            skipped.push(e);
            continue;
        }

        max_len = reported.length;
        longest = Arc::new(reported.chain);
        source = Some(peer.to_string());
    }

    if let Some(peer) = &source {
        info!(
            "CONSENSUS - longest chain ({} blocks) offered by {}",
            max_len, peer
        );
    }

    Resolution {
        chain: longest,
        replaced: source.is_some(),
        source,
        skipped,
    }
}

fn vet_candidate(peer: &str, reported: &PeerChain, difficulty: u32) -> Result<(), NodeError> {
    let invalid = |reason: String| NodeError::InvalidCandidateChain {
        peer: peer.to_string(),
        reason,
    };
    if reported.length != reported.chain.len() {
        return Err(invalid(format!(
            "claims {} blocks but sent {}",
            reported.length,
            reported.chain.len()
        )));
    }
    check_replacement(&reported.chain, difficulty).map_err(|brk| invalid(brk.to_string()))
}
