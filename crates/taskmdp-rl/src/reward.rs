//! Reward model: R(s, a)

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use taskmdp_core::{ActionId, MdpError, Result, StateId, StateRef};

use crate::state::{ActionCatalog, Reward, StateCatalog};

/// Weight kept by the old estimate in the exponential moving average
pub const REWARD_SMOOTHING: f64 = 0.9;

/// Seed entry for the reward model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardSeed {
    pub state: StateRef,
    pub action: String,
    pub reward: Reward,
}

/// Scalar reward for every (state, action) pair, zero unless seeded
#[derive(Debug, Clone)]
pub struct RewardModel {
    rewards: Array2<f64>,
}

impl RewardModel {
    pub fn new(state_count: usize, action_count: usize) -> Self {
        Self {
            rewards: Array2::zeros((state_count, action_count)),
        }
    }

    pub fn from_seeds(
        states: &StateCatalog,
        actions: &ActionCatalog,
        seeds: &[RewardSeed],
    ) -> Result<Self> {
        let mut model = Self::new(states.len(), actions.len());
        let mut seeded = Array2::from_elem((states.len(), actions.len()), false);

        for seed in seeds {
            let state = states.resolve(&seed.state)?;
            let action = actions.resolve(&seed.action)?;
            if !seed.reward.is_finite() {
                return Err(MdpError::InvalidSeed(format!(
                    "reward for ({}, {}) is not finite",
                    seed.state, seed.action
                )));
            }
            let cell = &mut seeded[[state.index(), action.index()]];
            if *cell {
                return Err(MdpError::InvalidSeed(format!(
                    "duplicate reward entry for ({}, {})",
                    seed.state, seed.action
                )));
            }
            *cell = true;
            model.set(state, action, seed.reward);
        }

        Ok(model)
    }

    pub fn reward(&self, state: StateId, action: ActionId) -> Reward {
        self.rewards[[state.index(), action.index()]]
    }

    pub fn set(&mut self, state: StateId, action: ActionId, reward: Reward) {
        self.rewards[[state.index(), action.index()]] = reward;
    }

    /// Exponential moving average: `new = 0.9 * old + 0.1 * observed`
    pub fn record_observed_reward(&mut self, state: StateId, action: ActionId, observed: Reward) {
        if !observed.is_finite() {
            warn!(
                "Ignoring non-finite reward {} for ({}, {})",
                observed, state, action
            );
            return;
        }
        let cell = &mut self.rewards[[state.index(), action.index()]];
        *cell = REWARD_SMOOTHING * *cell + (1.0 - REWARD_SMOOTHING) * observed;
    }

    /// Smallest and largest reward in the model
    pub fn bounds(&self) -> (Reward, Reward) {
        self.rewards
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                (lo.min(r), hi.max(r))
            })
    }

    pub fn table(&self) -> &Array2<f64> {
        &self.rewards
    }
}
