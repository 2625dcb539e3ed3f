use std::collections::BTreeSet;

use serde::Serialize;

/// Known peer base URLs. Grows only through explicit registration.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PeerSet {
    addresses: BTreeSet<String>,
}

impl PeerSet {
    /// Register `address`; returns false when it is blank or already known.
    pub fn insert(&mut self, address: &str) -> bool {
        match normalize_address(address) {
            Some(addr) => self.addresses.insert(addr),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.addresses.iter().cloned().collect()
    }
}

/// Trim, drop trailing slashes and default the scheme to `http://`.
pub fn normalize_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains("://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("http://{trimmed}"))
    }
}
