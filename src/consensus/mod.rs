pub mod fetch;
pub mod peers;
pub mod resolver;

pub use fetch::{ChainFetcher, HttpChainFetcher, PeerChain};
pub use peers::PeerSet;
pub use resolver::reconcile;
