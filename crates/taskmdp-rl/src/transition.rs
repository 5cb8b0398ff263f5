//! Transition model: P(s' | s, a)

use std::borrow::Cow;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use taskmdp_core::{ActionId, MdpError, Result, StateId, StateRef};

use crate::state::{ActionCatalog, StateCatalog};

/// Distributions must sum to 1 within this tolerance
pub const NORMALIZATION_TOLERANCE: f64 = 1e-6;

/// Seed distributions may deviate from 1 by at most this before renormalizing
pub const SEED_TOLERANCE: f64 = 1e-3;

/// Multiplicative weight boost for an observed successor
pub const OBSERVATION_BOOST: f64 = 1.1;

/// Weight given to a successor seen for the first time, before the boost
pub const NOVEL_SUCCESSOR_WEIGHT: f64 = 0.1;

/// Ordered list of successor states with probabilities summing to 1.
///
/// Only built through [`Distribution::from_weights`] or
/// [`Distribution::certain`]; it serializes but never deserializes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    outcomes: Vec<(StateId, f64)>,
}

impl Distribution {
    /// All mass on a single successor
    pub fn certain(state: StateId) -> Self {
        Self {
            outcomes: vec![(state, 1.0)],
        }
    }

    /// Build from non-negative weights, normalizing them to sum to 1.
    pub fn from_weights(weights: Vec<(StateId, f64)>) -> Result<Self> {
        if weights.is_empty() {
            return Err(MdpError::InvalidSeed(
                "distribution has no successors".to_string(),
            ));
        }
        for (i, &(state, weight)) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MdpError::InvalidSeed(format!(
                    "weight {weight} for successor {state} is not a finite non-negative number"
                )));
            }
            if weights[..i].iter().any(|&(s, _)| s == state) {
                return Err(MdpError::InvalidSeed(format!(
                    "successor {state} listed twice"
                )));
            }
        }

        let mut dist = Self { outcomes: weights };
        if dist.total() <= 0.0 {
            return Err(MdpError::InvalidSeed(
                "distribution weights sum to zero".to_string(),
            ));
        }
        dist.normalize();
        Ok(dist)
    }

    pub fn outcomes(&self) -> &[(StateId, f64)] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.outcomes.iter().map(|(_, p)| p).sum()
    }

    pub fn probability(&self, state: StateId) -> f64 {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == state)
            .map_or(0.0, |(_, p)| *p)
    }

    /// Σ P(s') · values[s']
    pub fn expectation(&self, values: &Array1<f64>) -> f64 {
        self.outcomes
            .iter()
            .map(|(s, p)| p * values[s.index()])
            .sum()
    }

    /// Inverse-CDF sampling for `u` drawn uniformly from [0, 1).
    pub fn sample(&self, u: f64) -> StateId {
        let mut cumulative = 0.0;
        for &(state, p) in &self.outcomes {
            cumulative += p;
            if u < cumulative {
                return state;
            }
        }
        // Rounding can leave the cumulative sum a hair below 1
        self.outcomes
            .iter()
            .rev()
            .find(|(_, p)| *p > 0.0)
            .map_or(self.outcomes[0].0, |(s, _)| *s)
    }

    /// Shift mass toward an observed successor and renormalize.
    ///
    /// Known successors are never dropped; unseen ones enter with
    /// [`NOVEL_SUCCESSOR_WEIGHT`] before the boost is applied.
    pub fn reinforce(&mut self, observed: StateId) {
        match self.outcomes.iter_mut().find(|(s, _)| *s == observed) {
            Some((_, weight)) => *weight *= OBSERVATION_BOOST,
            None => self
                .outcomes
                .push((observed, NOVEL_SUCCESSOR_WEIGHT * OBSERVATION_BOOST)),
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for (_, p) in &mut self.outcomes {
                *p /= total;
            }
        }
    }
}

/// One successor in a seed distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessorSeed {
    pub state: StateRef,
    pub probability: f64,
}

/// Seed entry for the transition model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSeed {
    pub state: StateRef,
    pub action: String,
    pub successors: Vec<SuccessorSeed>,
}

/// Transition distributions for every (state, action) pair.
///
/// Pairs without an explicit entry behave as a certain self-loop.
#[derive(Debug, Clone)]
pub struct TransitionModel {
    action_count: usize,
    entries: Vec<Option<Distribution>>,
}

impl TransitionModel {
    pub fn new(state_count: usize, action_count: usize) -> Self {
        Self {
            action_count,
            entries: vec![None; state_count * action_count],
        }
    }

    pub fn from_seeds(
        states: &StateCatalog,
        actions: &ActionCatalog,
        seeds: &[TransitionSeed],
    ) -> Result<Self> {
        let mut model = Self::new(states.len(), actions.len());

        for seed in seeds {
            let state = states.resolve(&seed.state)?;
            let action = actions.resolve(&seed.action)?;
            if model.has_entry(state, action) {
                return Err(MdpError::InvalidSeed(format!(
                    "duplicate transition entry for ({}, {})",
                    seed.state, seed.action
                )));
            }

            let weights = seed
                .successors
                .iter()
                .map(|s| Ok((states.resolve(&s.state)?, s.probability)))
                .collect::<Result<Vec<_>>>()?;
            let total: f64 = weights.iter().map(|(_, p)| p).sum();
            if (total - 1.0).abs() > SEED_TOLERANCE {
                return Err(MdpError::InvalidSeed(format!(
                    "probabilities for ({}, {}) sum to {total}",
                    seed.state, seed.action
                )));
            }

            model.set(state, action, Distribution::from_weights(weights)?);
        }

        Ok(model)
    }

    fn slot(&self, state: StateId, action: ActionId) -> usize {
        state.index() * self.action_count + action.index()
    }

    pub fn set(&mut self, state: StateId, action: ActionId, distribution: Distribution) {
        let slot = self.slot(state, action);
        self.entries[slot] = Some(distribution);
    }

    pub fn has_entry(&self, state: StateId, action: ActionId) -> bool {
        self.entries[self.slot(state, action)].is_some()
    }

    /// Successor distribution, falling back to a self-loop
    pub fn transition(&self, state: StateId, action: ActionId) -> Cow<'_, Distribution> {
        match &self.entries[self.slot(state, action)] {
            Some(dist) => Cow::Borrowed(dist),
            None => Cow::Owned(Distribution::certain(state)),
        }
    }

    /// Σ P(s' | s, a) · values[s'] without materializing the self-loop default
    pub fn expected_value(&self, state: StateId, action: ActionId, values: &Array1<f64>) -> f64 {
        match &self.entries[self.slot(state, action)] {
            Some(dist) => dist.expectation(values),
            None => values[state.index()],
        }
    }

    /// Draw a successor using `u` uniform in [0, 1)
    pub fn sample(&self, state: StateId, action: ActionId, u: f64) -> StateId {
        match &self.entries[self.slot(state, action)] {
            Some(dist) => dist.sample(u),
            None => state,
        }
    }

    pub fn record_observed_transition(&mut self, state: StateId, action: ActionId, next: StateId) {
        let slot = self.slot(state, action);
        let dist = self.entries[slot].get_or_insert_with(|| Distribution::certain(state));
        dist.reinforce(next);
        debug!(
            "Transition ({}, {}) -> {} now p={:.4}",
            state,
            action,
            next,
            dist.probability(next)
        );
    }

    /// Explicit entries in (state, action) order
    pub fn entries(&self) -> impl Iterator<Item = (StateId, ActionId, &Distribution)> + '_ {
        self.entries.iter().enumerate().filter_map(move |(slot, dist)| {
            dist.as_ref().map(|d| {
                (
                    StateId::from(slot / self.action_count),
                    ActionId::from(slot % self.action_count),
                    d,
                )
            })
        })
    }

    pub fn explicit_len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}
