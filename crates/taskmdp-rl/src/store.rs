//! Value/policy store shared by all solvers

use ndarray::{Array1, Array2, ArrayView1};

use taskmdp_core::{ActionId, StateId};

/// First index holding the maximum; earlier entries win ties.
pub fn argmax<I: IntoIterator<Item = f64>>(values: I) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best
}

/// V(s), Q(s, a) and π(s), zero-initialized
#[derive(Debug, Clone)]
pub struct ValueStore {
    values: Array1<f64>,
    q_values: Array2<f64>,
    policy: Vec<ActionId>,
}

impl ValueStore {
    pub fn new(state_count: usize, action_count: usize) -> Self {
        Self {
            values: Array1::zeros(state_count),
            q_values: Array2::zeros((state_count, action_count)),
            policy: vec![ActionId(0); state_count],
        }
    }

    pub fn reset(&mut self) {
        self.values.fill(0.0);
        self.q_values.fill(0.0);
        self.policy.fill(ActionId(0));
    }

    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    pub fn action_count(&self) -> usize {
        self.q_values.ncols()
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn q_values(&self) -> &Array2<f64> {
        &self.q_values
    }

    pub fn value(&self, state: StateId) -> f64 {
        self.values[state.index()]
    }

    pub fn set_value(&mut self, state: StateId, value: f64) {
        self.values[state.index()] = value;
    }

    pub fn q(&self, state: StateId, action: ActionId) -> f64 {
        self.q_values[[state.index(), action.index()]]
    }

    pub fn set_q(&mut self, state: StateId, action: ActionId, value: f64) {
        self.q_values[[state.index(), action.index()]] = value;
    }

    pub fn q_row(&self, state: StateId) -> ArrayView1<'_, f64> {
        self.q_values.row(state.index())
    }

    pub fn policy(&self, state: StateId) -> ActionId {
        self.policy[state.index()]
    }

    pub fn set_policy(&mut self, state: StateId, action: ActionId) {
        self.policy[state.index()] = action;
    }

    pub fn policy_len(&self) -> usize {
        self.policy.len()
    }

    /// Greedy action and its Q-value
    pub fn best(&self, state: StateId) -> (ActionId, f64) {
        argmax(self.q_row(state).iter().copied())
            .map_or((ActionId(0), 0.0), |(i, q)| (ActionId::from(i), q))
    }

    /// max over every (state, action) pair
    pub fn max_q(&self) -> f64 {
        self.q_values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Point π(s) at the greedy action and set V(s) to its Q-value
    pub fn make_greedy(&mut self, state: StateId) -> ActionId {
        let (action, q) = self.best(state);
        self.policy[state.index()] = action;
        self.values[state.index()] = q;
        action
    }
}
