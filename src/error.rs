use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Failures surfaced by the ledger core.
///
/// Peer related variants are produced while reconciling and are recovered
/// locally by the resolver (the peer is skipped); they only reach callers
/// through the resolution report.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("chain has no blocks yet")]
    EmptyChain,
    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },
    #[error("peer {peer} reported an invalid chain: {reason}")]
    InvalidCandidateChain { peer: String, reason: String },
    #[error("proof-of-work search gave up after {limit:?}")]
    MiningTimedOut { limit: Duration },
    #[error("proof-of-work search was cancelled")]
    MiningCancelled,
    #[error("proof-of-work search exhausted the proof space")]
    ProofSpaceExhausted,
    #[error("chain head moved while mining")]
    StaleHead,
    #[error("blocking task failed: {0}")]
    BlockingTask(String),
}

impl From<actix_web::error::BlockingError> for NodeError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        NodeError::BlockingTask(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ResponseError for NodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            NodeError::EmptyChain | NodeError::StaleHead => StatusCode::CONFLICT,
            NodeError::MiningTimedOut { .. } | NodeError::MiningCancelled => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::NodeError;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use std::time::Duration;

    #[test]
    fn mining_failures_map_to_service_unavailable() {
        let err = NodeError::MiningTimedOut {
            limit: Duration::from_secs(1),
        };
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            NodeError::MiningCancelled.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn peer_errors_name_the_peer() {
        let err = NodeError::PeerUnreachable {
            peer: "http://10.0.0.2:5001".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "peer http://10.0.0.2:5001 unreachable: connection refused"
        );
        assert_eq!(NodeError::EmptyChain.status_code(), StatusCode::CONFLICT);
    }
}
