//! Read-only view of the MDP handed to solvers

use ndarray::Array1;

use taskmdp_core::{ActionId, StateId};

use crate::reward::RewardModel;
use crate::state::{ActionCatalog, StateCatalog};
use crate::transition::TransitionModel;

/// Catalogs plus transition and reward models
#[derive(Debug, Clone, Copy)]
pub struct ModelView<'a> {
    pub states: &'a StateCatalog,
    pub actions: &'a ActionCatalog,
    pub transitions: &'a TransitionModel,
    pub rewards: &'a RewardModel,
}

impl<'a> ModelView<'a> {
    /// One-step lookahead: R(s, a) + γ · Σ P(s' | s, a) · V(s')
    pub fn backup(&self, state: StateId, action: ActionId, gamma: f64, values: &Array1<f64>) -> f64 {
        self.rewards.reward(state, action)
            + gamma * self.transitions.expected_value(state, action, values)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}
