//! MDP Engine - Coordinates planning, task queries, and online learning

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use taskmdp_core::{
    ActionDescriptor, ActionId, AttributeDomain, Attributes, MdpError, Result, StateId, StateRef,
    TerminalMarker,
};

use crate::algorithm::{PolicySolver, SolveReport, SolverConfig};
use crate::experience::Experience;
use crate::model::ModelView;
use crate::reward::{RewardModel, RewardSeed};
use crate::state::{ActionCatalog, MatchKind, Reward, StateCatalog};
use crate::store::ValueStore;
use crate::transition::{SuccessorSeed, TransitionModel, TransitionSeed};

/// Confidence reported when no meaningful ratio can be computed
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// Everything needed to build the catalogs and seed the models
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MdpDefinition {
    pub domains: Vec<AttributeDomain>,
    /// Explicit state list; when absent every combination of domain values is a state
    #[serde(default)]
    pub states: Option<Vec<Attributes>>,
    pub actions: Vec<ActionDescriptor>,
    #[serde(default)]
    pub terminal: Option<TerminalMarker>,
    #[serde(default)]
    pub transitions: Vec<TransitionSeed>,
    #[serde(default)]
    pub rewards: Vec<RewardSeed>,
}

impl MdpDefinition {
    /// Parse a definition from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Replace the seed tables with previously exported ones
    pub fn with_seeds(mut self, tables: &ModelTables) -> Self {
        self.transitions = tables.transitions.clone();
        self.rewards = tables.rewards.clone();
        self
    }
}

fn default_learning_rate() -> f64 {
    0.1
}
fn default_seed() -> u64 {
    42
}
fn default_similarity_threshold() -> f64 {
    0.7
}
fn default_summary_size() -> usize {
    10
}

/// Engine tuning outside the solver itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// TD(0) learning rate α
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Seed for every random draw the engine makes
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Minimum fraction of matching attributes for an approximate match
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Default number of entries in the policy summary
    #[serde(default = "default_summary_size")]
    pub summary_size: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            seed: default_seed(),
            similarity_threshold: default_similarity_threshold(),
            summary_size: default_summary_size(),
        }
    }
}

impl EngineParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(MdpError::InvalidParameter(format!(
                "learning_rate must be in [0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(MdpError::InvalidParameter(format!(
                "similarity_threshold must be in [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

/// Answer to a task-selection query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub details: ActionDescriptor,
    pub confidence: f64,
    pub expected_value: f64,
    pub matched_state: MatchKind,
    /// Key of the catalog state the recommendation is for
    pub state: String,
    pub similarity: f64,
}

/// Effect of one TD(0) step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdUpdate {
    pub previous: f64,
    pub target: f64,
    pub updated: f64,
    pub policy_action: ActionId,
}

/// One line of the policy summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub state: String,
    pub action: String,
    pub q_value: f64,
}

/// Engine statistics
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub state_count: usize,
    pub action_count: usize,
    pub policy_entries: usize,
    pub explicit_transitions: usize,
    pub solver: String,
    pub solver_params: serde_json::Value,
    pub last_report: Option<SolveReport>,
    pub last_solved_at: Option<DateTime<Utc>>,
    pub experiences_recorded: u64,
    pub total_observed_reward: f64,
    pub average_observed_reward: f64,
}

/// Flat key-to-value dump of the four model tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTables {
    pub transitions: Vec<TransitionSeed>,
    pub rewards: Vec<RewardSeed>,
    pub values: BTreeMap<String, f64>,
    pub policy: BTreeMap<String, String>,
}

impl ModelTables {
    /// Parse tables previously produced by [`MdpEngine::export_tables`]
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// MDP engine owning the catalogs, models, and value/policy store
pub struct MdpEngine {
    states: StateCatalog,
    actions: ActionCatalog,
    transitions: TransitionModel,
    rewards: RewardModel,
    store: ValueStore,
    solver: Box<dyn PolicySolver>,
    params: EngineParams,
    rng: StdRng,
    last_report: Option<SolveReport>,
    last_solved_at: Option<DateTime<Utc>>,
    experiences_recorded: u64,
    total_observed_reward: f64,
}

impl MdpEngine {
    /// Build catalogs and models, then run the selected solver once.
    ///
    /// Malformed catalogs or seeds fail here. A solver that hits its
    /// iteration cap does not: check `last_report().converged`.
    pub fn initialize(
        definition: MdpDefinition,
        solver: SolverConfig,
        params: EngineParams,
    ) -> Result<Self> {
        params.validate()?;
        let solver = solver.build()?;

        let MdpDefinition {
            domains,
            states,
            actions,
            terminal,
            transitions,
            rewards,
        } = definition;

        let states = match states {
            Some(list) => StateCatalog::from_states(domains, &list, terminal.as_ref())?,
            None => StateCatalog::from_domains(domains, terminal.as_ref())?,
        };
        let actions = ActionCatalog::new(actions)?;
        let transitions = TransitionModel::from_seeds(&states, &actions, &transitions)?;
        let rewards = RewardModel::from_seeds(&states, &actions, &rewards)?;

        info!(
            "MDP engine initialized: {} states, {} actions, {} explicit transitions, solver {}",
            states.len(),
            actions.len(),
            transitions.explicit_len(),
            solver.name()
        );

        let store = ValueStore::new(states.len(), actions.len());
        let mut engine = Self {
            states,
            actions,
            transitions,
            rewards,
            store,
            solver,
            rng: StdRng::seed_from_u64(params.seed),
            params,
            last_report: None,
            last_solved_at: None,
            experiences_recorded: 0,
            total_observed_reward: 0.0,
        };
        engine.compute_optimal_policy();

        Ok(engine)
    }

    /// Rebuild V, Q and π wholesale with the configured solver
    pub fn compute_optimal_policy(&mut self) -> SolveReport {
        let view = ModelView {
            states: &self.states,
            actions: &self.actions,
            transitions: &self.transitions,
            rewards: &self.rewards,
        };
        let report = self.solver.solve(&view, &mut self.store, &mut self.rng);

        self.last_report = Some(report.clone());
        self.last_solved_at = Some(Utc::now());
        report
    }

    /// Swap the solver; takes effect on the next `compute_optimal_policy`
    pub fn set_solver(&mut self, config: &SolverConfig) -> Result<()> {
        self.solver = config.build()?;
        info!("Active solver set to: {}", self.solver.name());
        Ok(())
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn last_report(&self) -> Option<&SolveReport> {
        self.last_report.as_ref()
    }

    pub fn states(&self) -> &StateCatalog {
        &self.states
    }

    pub fn actions(&self) -> &ActionCatalog {
        &self.actions
    }

    pub fn transitions(&self) -> &TransitionModel {
        &self.transitions
    }

    pub fn rewards(&self) -> &RewardModel {
        &self.rewards
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// Recommend the next action for an observed state. Never fails.
    pub fn select_task(&self, observed: &Attributes) -> Recommendation {
        let matched = self
            .states
            .match_state(observed, self.params.similarity_threshold);
        let action = self.store.policy(matched.state);
        let expected_value = self.store.q(matched.state, action);

        let confidence = match matched.kind {
            MatchKind::Default => NEUTRAL_CONFIDENCE,
            MatchKind::Exact | MatchKind::Approximate => self.confidence(expected_value),
        };

        let details = self.actions.get(action).clone();
        debug!(
            "Selected {} for state {} ({:?}, confidence {:.2})",
            details.id,
            self.states.key(matched.state),
            matched.kind,
            confidence
        );

        Recommendation {
            action: details.id.clone(),
            details,
            confidence,
            expected_value,
            matched_state: matched.kind,
            state: self.states.key(matched.state),
            similarity: matched.similarity,
        }
    }

    /// Q(s, a) / max Q, clamped to [0, 1]; neutral when max Q is not positive
    fn confidence(&self, q: f64) -> f64 {
        let max = self.store.max_q();
        if max > 0.0 && max.is_finite() && q.is_finite() {
            (q / max).clamp(0.0, 1.0)
        } else {
            NEUTRAL_CONFIDENCE
        }
    }

    /// Fold a real outcome into the models and take one TD(0) step.
    ///
    /// States must match the catalog exactly or approximately; the default
    /// fallback used by `select_task` is not accepted here.
    pub fn record_experience(&mut self, experience: &Experience) -> Result<TdUpdate> {
        let state = self.resolve_observed(&experience.state)?;
        let next = self.resolve_observed(&experience.next_state)?;
        let action = self.actions.resolve(&experience.action)?;

        self.apply_experience(state, action, experience.reward, next)
    }

    /// Id-level form of [`record_experience`](Self::record_experience).
    ///
    /// Ids outside the catalogs and non-finite rewards are rejected before
    /// anything is mutated.
    pub fn apply_experience(
        &mut self,
        state: StateId,
        action: ActionId,
        reward: Reward,
        next: StateId,
    ) -> Result<TdUpdate> {
        for id in [state, next] {
            if id.index() >= self.states.len() {
                return Err(MdpError::UnknownState(id.to_string()));
            }
        }
        if action.index() >= self.actions.len() {
            return Err(MdpError::UnknownAction(action.to_string()));
        }
        if !reward.is_finite() {
            return Err(MdpError::InvalidParameter(format!(
                "reward {reward} is not finite"
            )));
        }

        self.transitions
            .record_observed_transition(state, action, next);
        self.rewards.record_observed_reward(state, action, reward);

        let (_, next_best) = self.store.best(next);
        let previous = self.store.q(state, action);
        let target = reward + self.solver.gamma() * next_best;
        let updated = previous + self.params.learning_rate * (target - previous);
        self.store.set_q(state, action, updated);
        let policy_action = self.store.make_greedy(state);

        self.experiences_recorded += 1;
        self.total_observed_reward += reward;

        debug!(
            "TD update ({}, {}): {:.4} -> {:.4} (target {:.4})",
            self.states.key(state),
            self.actions.get(action).id,
            previous,
            updated,
            target
        );

        Ok(TdUpdate {
            previous,
            target,
            updated,
            policy_action,
        })
    }

    fn resolve_observed(&self, observed: &Attributes) -> Result<StateId> {
        let matched = self
            .states
            .match_state(observed, self.params.similarity_threshold);
        match matched.kind {
            MatchKind::Exact | MatchKind::Approximate => Ok(matched.state),
            MatchKind::Default => Err(MdpError::UnknownState(
                StateRef::Attributes(observed.clone()).to_string(),
            )),
        }
    }

    /// Get statistics
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            state_count: self.states.len(),
            action_count: self.actions.len(),
            policy_entries: self.store.policy_len(),
            explicit_transitions: self.transitions.explicit_len(),
            solver: self.solver.name().to_string(),
            solver_params: self.solver.get_params(),
            last_report: self.last_report.clone(),
            last_solved_at: self.last_solved_at,
            experiences_recorded: self.experiences_recorded,
            total_observed_reward: self.total_observed_reward,
            average_observed_reward: if self.experiences_recorded > 0 {
                self.total_observed_reward / self.experiences_recorded as f64
            } else {
                0.0
            },
        }
    }

    /// Highest-value recommendations, one per state, sorted by Q descending
    pub fn policy_summary(&self, top_n: usize) -> Vec<PolicyEntry> {
        let mut entries: Vec<PolicyEntry> = self
            .states
            .ids()
            .map(|s| {
                let action = self.store.policy(s);
                PolicyEntry {
                    state: self.states.key(s),
                    action: self.actions.get(action).id.clone(),
                    q_value: self.store.q(s, action),
                }
            })
            .collect();

        entries.sort_by(|a, b| b.q_value.total_cmp(&a.q_value));
        entries.truncate(top_n);
        entries
    }

    /// Policy summary sized by `EngineParams::summary_size`
    pub fn default_policy_summary(&self) -> Vec<PolicyEntry> {
        self.policy_summary(self.params.summary_size)
    }

    /// Dump the model tables as flat records keyed by state key and action id
    pub fn export_tables(&self) -> ModelTables {
        let transitions = self
            .transitions
            .entries()
            .map(|(s, a, dist)| TransitionSeed {
                state: StateRef::Key(self.states.key(s)),
                action: self.actions.get(a).id.clone(),
                successors: dist
                    .outcomes()
                    .iter()
                    .map(|&(next, probability)| SuccessorSeed {
                        state: StateRef::Key(self.states.key(next)),
                        probability,
                    })
                    .collect(),
            })
            .collect();

        let mut rewards = Vec::with_capacity(self.states.len() * self.actions.len());
        for s in self.states.ids() {
            for (a, action) in self.actions.iter() {
                rewards.push(RewardSeed {
                    state: StateRef::Key(self.states.key(s)),
                    action: action.id.clone(),
                    reward: self.rewards.reward(s, a),
                });
            }
        }

        let values = self
            .states
            .ids()
            .map(|s| (self.states.key(s), self.store.value(s)))
            .collect();
        let policy = self
            .states
            .ids()
            .map(|s| {
                (
                    self.states.key(s),
                    self.actions.get(self.store.policy(s)).id.clone(),
                )
            })
            .collect();

        ModelTables {
            transitions,
            rewards,
            values,
            policy,
        }
    }
}
