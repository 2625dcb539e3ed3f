use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::blockchain::{DEFAULT_DIFFICULTY, DIFF_MAX, DIFF_MIN};

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub mining_timeout: Duration,
    pub peer_timeout: Duration,
    pub reward_receiver: String,
    pub mining_reward: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
            mining_timeout: Duration::from_secs(60),
            peer_timeout: Duration::from_secs(5),
            reward_receiver: "miner".to_string(),
            mining_reward: 1.0,
        }
    }
}

impl NodeConfig {
    /// Build from `HOST`, `PORT`, `DIFFICULTY`, `MINING_TIMEOUT_SECS`,
    /// `PEER_TIMEOUT_SECS`, `REWARD_RECEIVER` and `MINING_REWARD`.
    /// A port given as first CLI argument wins over `PORT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port_arg = env::args().nth(1);

        let difficulty: u32 = parse_var("DIFFICULTY", defaults.difficulty);
        let clamped = difficulty.clamp(DIFF_MIN, DIFF_MAX);
        if clamped != difficulty {
            warn!("DIFFICULTY {difficulty} out of range, using {clamped}");
        }

        let port = match port_arg.as_deref().map(str::parse::<u16>) {
            Some(Ok(port)) => port,
            Some(Err(_)) => {
                warn!("ignoring non-numeric port argument");
                parse_var("PORT", defaults.port)
            }
            None => parse_var("PORT", defaults.port),
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            difficulty: clamped,
            mining_timeout: Duration::from_secs(parse_var(
                "MINING_TIMEOUT_SECS",
                defaults.mining_timeout.as_secs(),
            )),
            peer_timeout: Duration::from_secs(parse_var(
                "PEER_TIMEOUT_SECS",
                defaults.peer_timeout.as_secs(),
            )),
            reward_receiver: env::var("REWARD_RECEIVER").unwrap_or(defaults.reward_receiver),
            mining_reward: parse_var("MINING_REWARD", defaults.mining_reward),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T: FromStr>(key: &str, raw: &str, default: T) -> T {
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!("{key}={raw:?} is not valid, using default");
            default
        }
    }
}
