//! Observed outcomes fed back into the engine

use serde::{Deserialize, Serialize};

use taskmdp_core::Attributes;

use crate::state::Reward;

/// A single real-world experience tuple (s, a, r, s')
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state: Attributes,
    pub action: String,
    pub reward: Reward,
    pub next_state: Attributes,
}

impl Experience {
    /// Create a new experience
    pub fn new(
        state: Attributes,
        action: impl Into<String>,
        reward: Reward,
        next_state: Attributes,
    ) -> Self {
        Self {
            state,
            action: action.into(),
            reward,
            next_state,
        }
    }
}
