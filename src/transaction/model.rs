use serde::{Deserialize, Serialize};

/// A value transfer waiting in the pending buffer or sealed into a block.
///
/// No signature or balance checks are attached: any sender may move any
/// amount to any receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}
