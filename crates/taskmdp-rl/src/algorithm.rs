//! Policy solver trait and implementations

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use taskmdp_core::{ActionId, MdpError, Result};

use crate::episode::EpisodeSimulator;
use crate::model::ModelView;
use crate::store::ValueStore;

/// Policy iteration only switches actions on a strictly better Q-value
const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Outcome of a full solver run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub solver: String,
    /// False when the iteration cap was hit first
    pub converged: bool,
    pub iterations: usize,
    /// Largest value change in the final iteration
    pub final_delta: f64,
}

/// Trait for algorithms that populate the value/policy store
pub trait PolicySolver: Send + Sync {
    /// Algorithm name
    fn name(&self) -> &str;

    /// Discount factor γ
    fn gamma(&self) -> f64;

    /// Rebuild V, Q and π from scratch
    fn solve(&self, model: &ModelView<'_>, store: &mut ValueStore, rng: &mut StdRng)
        -> SolveReport;

    /// Get algorithm parameters as JSON
    fn get_params(&self) -> serde_json::Value;
}

fn default_gamma() -> f64 {
    0.95
}
fn default_theta() -> f64 {
    0.01
}
fn default_max_iterations() -> usize {
    1000
}
fn default_max_improvement_rounds() -> usize {
    100
}
fn default_episodes() -> usize {
    5000
}
fn default_max_steps() -> usize {
    100
}
fn default_epsilon() -> f64 {
    0.1
}

/// Solver selection and parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum SolverConfig {
    ValueIteration {
        #[serde(default = "default_gamma")]
        gamma: f64,
        #[serde(default = "default_theta")]
        theta: f64,
        #[serde(default = "default_max_iterations")]
        max_iterations: usize,
    },
    PolicyIteration {
        #[serde(default = "default_gamma")]
        gamma: f64,
        #[serde(default = "default_theta")]
        theta: f64,
        #[serde(default = "default_max_iterations")]
        max_evaluation_sweeps: usize,
        #[serde(default = "default_max_improvement_rounds")]
        max_improvement_rounds: usize,
    },
    MonteCarlo {
        #[serde(default = "default_gamma")]
        gamma: f64,
        #[serde(default = "default_episodes")]
        episodes: usize,
        #[serde(default = "default_max_steps")]
        max_steps: usize,
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::value_iteration()
    }
}

impl SolverConfig {
    pub fn value_iteration() -> Self {
        SolverConfig::ValueIteration {
            gamma: default_gamma(),
            theta: default_theta(),
            max_iterations: default_max_iterations(),
        }
    }

    pub fn policy_iteration() -> Self {
        SolverConfig::PolicyIteration {
            gamma: default_gamma(),
            theta: default_theta(),
            max_evaluation_sweeps: default_max_iterations(),
            max_improvement_rounds: default_max_improvement_rounds(),
        }
    }

    pub fn monte_carlo() -> Self {
        SolverConfig::MonteCarlo {
            gamma: default_gamma(),
            episodes: default_episodes(),
            max_steps: default_max_steps(),
            epsilon: default_epsilon(),
        }
    }

    pub fn gamma(&self) -> f64 {
        match self {
            SolverConfig::ValueIteration { gamma, .. }
            | SolverConfig::PolicyIteration { gamma, .. }
            | SolverConfig::MonteCarlo { gamma, .. } => *gamma,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let gamma = self.gamma();
        if !(gamma > 0.0 && gamma < 1.0) {
            return Err(MdpError::InvalidParameter(format!(
                "gamma must be in (0, 1), got {gamma}"
            )));
        }

        match self {
            SolverConfig::ValueIteration {
                theta,
                max_iterations,
                ..
            } => {
                check_theta(*theta)?;
                check_count("max_iterations", *max_iterations)
            }
            SolverConfig::PolicyIteration {
                theta,
                max_evaluation_sweeps,
                max_improvement_rounds,
                ..
            } => {
                check_theta(*theta)?;
                check_count("max_evaluation_sweeps", *max_evaluation_sweeps)?;
                check_count("max_improvement_rounds", *max_improvement_rounds)
            }
            SolverConfig::MonteCarlo {
                episodes,
                max_steps,
                epsilon,
                ..
            } => {
                if !(0.0..=1.0).contains(epsilon) {
                    return Err(MdpError::InvalidParameter(format!(
                        "epsilon must be in [0, 1], got {epsilon}"
                    )));
                }
                check_count("episodes", *episodes)?;
                check_count("max_steps", *max_steps)
            }
        }
    }

    /// Validate and instantiate the solver
    pub fn build(&self) -> Result<Box<dyn PolicySolver>> {
        self.validate()?;
        let solver: Box<dyn PolicySolver> = match *self {
            SolverConfig::ValueIteration {
                gamma,
                theta,
                max_iterations,
            } => Box::new(ValueIteration {
                gamma,
                theta,
                max_iterations,
            }),
            SolverConfig::PolicyIteration {
                gamma,
                theta,
                max_evaluation_sweeps,
                max_improvement_rounds,
            } => Box::new(PolicyIteration {
                gamma,
                theta,
                max_evaluation_sweeps,
                max_improvement_rounds,
            }),
            SolverConfig::MonteCarlo {
                gamma,
                episodes,
                max_steps,
                epsilon,
            } => Box::new(MonteCarloControl {
                gamma,
                episodes,
                max_steps,
                epsilon,
            }),
        };
        Ok(solver)
    }
}

fn check_theta(theta: f64) -> Result<()> {
    if theta > 0.0 && theta.is_finite() {
        Ok(())
    } else {
        Err(MdpError::InvalidParameter(format!(
            "theta must be positive, got {theta}"
        )))
    }
}

fn check_count(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        Err(MdpError::InvalidParameter(format!(
            "{name} must be greater than zero"
        )))
    } else {
        Ok(())
    }
}

fn log_report(report: &SolveReport) {
    if report.converged {
        info!(
            "{} converged after {} iterations (delta {:.6})",
            report.solver, report.iterations, report.final_delta
        );
    } else {
        warn!(
            "{} stopped at iteration cap {} without converging (delta {:.6})",
            report.solver, report.iterations, report.final_delta
        );
    }
}

/// Bellman optimality sweeps until the largest value change drops below θ
#[derive(Debug, Clone)]
pub struct ValueIteration {
    gamma: f64,
    theta: f64,
    max_iterations: usize,
}

impl ValueIteration {
    pub fn new(gamma: f64, theta: f64, max_iterations: usize) -> Self {
        Self {
            gamma,
            theta,
            max_iterations,
        }
    }
}

impl PolicySolver for ValueIteration {
    fn name(&self) -> &str {
        "value_iteration"
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn solve(
        &self,
        model: &ModelView<'_>,
        store: &mut ValueStore,
        _rng: &mut StdRng,
    ) -> SolveReport {
        store.reset();
        let mut values = store.values().clone();
        let mut iterations = 0;
        let mut delta = f64::INFINITY;

        while iterations < self.max_iterations {
            iterations += 1;
            delta = 0.0;

            for s in model.states.ids() {
                for a in model.actions.ids() {
                    let q = model.backup(s, a, self.gamma, &values);
                    store.set_q(s, a, q);
                }
                let previous = values[s.index()];
                let best = store.make_greedy(s);
                let v = store.q(s, best);
                values[s.index()] = v;
                delta = delta.max((previous - v).abs());
            }

            if delta < self.theta {
                break;
            }
        }

        let report = SolveReport {
            solver: self.name().to_string(),
            converged: delta < self.theta,
            iterations,
            final_delta: delta,
        };
        log_report(&report);
        report
    }

    fn get_params(&self) -> serde_json::Value {
        serde_json::json!({
            "gamma": self.gamma,
            "theta": self.theta,
            "max_iterations": self.max_iterations,
        })
    }
}

/// Alternating policy evaluation and greedy improvement
#[derive(Debug, Clone)]
pub struct PolicyIteration {
    gamma: f64,
    theta: f64,
    max_evaluation_sweeps: usize,
    max_improvement_rounds: usize,
}

impl PolicyIteration {
    pub fn new(
        gamma: f64,
        theta: f64,
        max_evaluation_sweeps: usize,
        max_improvement_rounds: usize,
    ) -> Self {
        Self {
            gamma,
            theta,
            max_evaluation_sweeps,
            max_improvement_rounds,
        }
    }

    /// Iterative evaluation of the stored policy; returns (converged, delta)
    fn evaluate(&self, model: &ModelView<'_>, store: &mut ValueStore) -> (bool, f64) {
        let mut values = store.values().clone();
        let mut delta = f64::INFINITY;

        for _ in 0..self.max_evaluation_sweeps {
            delta = 0.0;
            for s in model.states.ids() {
                let v = model.backup(s, store.policy(s), self.gamma, &values);
                delta = delta.max((values[s.index()] - v).abs());
                values[s.index()] = v;
            }
            if delta < self.theta {
                break;
            }
        }

        for s in model.states.ids() {
            store.set_value(s, values[s.index()]);
        }
        (delta < self.theta, delta)
    }

    /// Greedy improvement against the evaluated V; true if no action changed
    fn improve(&self, model: &ModelView<'_>, store: &mut ValueStore) -> bool {
        let values = store.values().clone();
        let mut stable = true;

        for s in model.states.ids() {
            for a in model.actions.ids() {
                let q = model.backup(s, a, self.gamma, &values);
                store.set_q(s, a, q);
            }
            let current = store.policy(s);
            let (best, best_q) = store.best(s);
            if best != current && best_q > store.q(s, current) + IMPROVEMENT_EPSILON {
                store.set_policy(s, best);
                stable = false;
            }
        }

        stable
    }
}

impl PolicySolver for PolicyIteration {
    fn name(&self) -> &str {
        "policy_iteration"
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn solve(&self, model: &ModelView<'_>, store: &mut ValueStore, rng: &mut StdRng) -> SolveReport {
        store.reset();
        for s in model.states.ids() {
            store.set_policy(s, ActionId::from(rng.gen_range(0..model.action_count())));
        }

        let mut rounds = 0;
        let mut converged = false;
        let mut delta = f64::INFINITY;

        while rounds < self.max_improvement_rounds {
            rounds += 1;
            let (evaluated, eval_delta) = self.evaluate(model, store);
            delta = eval_delta;
            let stable = self.improve(model, store);
            debug!(
                "Policy iteration round {}: evaluation delta {:.6}, stable {}",
                rounds, delta, stable
            );

            if stable {
                converged = evaluated;
                break;
            }
        }

        let report = SolveReport {
            solver: self.name().to_string(),
            converged,
            iterations: rounds,
            final_delta: delta,
        };
        log_report(&report);
        report
    }

    fn get_params(&self) -> serde_json::Value {
        serde_json::json!({
            "gamma": self.gamma,
            "theta": self.theta,
            "max_evaluation_sweeps": self.max_evaluation_sweeps,
            "max_improvement_rounds": self.max_improvement_rounds,
        })
    }
}

/// Every-visit Monte Carlo control with ε-greedy exploration.
///
/// Returns are truncated at `max_steps`, so Q only respects the
/// `[r_min / (1 - γ), r_max / (1 - γ)]` bound of the infinite-horizon
/// solvers from above. With all-positive rewards a visited Q can sit below
/// `r_min / (1 - γ)`; it is at least `r_min`.
#[derive(Debug, Clone)]
pub struct MonteCarloControl {
    gamma: f64,
    episodes: usize,
    max_steps: usize,
    epsilon: f64,
}

impl MonteCarloControl {
    pub fn new(gamma: f64, episodes: usize, max_steps: usize, epsilon: f64) -> Self {
        Self {
            gamma,
            episodes,
            max_steps,
            epsilon,
        }
    }
}

impl PolicySolver for MonteCarloControl {
    fn name(&self) -> &str {
        "monte_carlo"
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn solve(&self, model: &ModelView<'_>, store: &mut ValueStore, rng: &mut StdRng) -> SolveReport {
        store.reset();
        let shape = (model.state_count(), model.action_count());
        let mut returns_sum = Array2::<f64>::zeros(shape);
        let mut returns_count = Array2::<u32>::zeros(shape);
        let simulator = EpisodeSimulator::new(model, self.epsilon, self.max_steps);
        let mut delta = 0.0;
        let mut total_steps = 0usize;

        for _ in 0..self.episodes {
            let episode = simulator.generate(store, rng);
            let returns = episode.returns(self.gamma);
            total_steps += episode.len();
            delta = 0.0;

            for (step, g) in episode.steps().iter().zip(returns) {
                let cell = [step.state.index(), step.action.index()];
                returns_sum[cell] += g;
                returns_count[cell] += 1;
                let q = returns_sum[cell] / f64::from(returns_count[cell]);
                delta = f64::max(delta, (q - store.q(step.state, step.action)).abs());
                store.set_q(step.state, step.action, q);
            }
        }

        for s in model.states.ids() {
            store.make_greedy(s);
        }

        let visited = returns_count.iter().filter(|&&c| c > 0).count();
        debug!(
            "Monte Carlo control: {} steps simulated, {}/{} pairs visited",
            total_steps,
            visited,
            shape.0 * shape.1
        );

        let report = SolveReport {
            solver: self.name().to_string(),
            converged: true,
            iterations: self.episodes,
            final_delta: delta,
        };
        log_report(&report);
        report
    }

    fn get_params(&self) -> serde_json::Value {
        serde_json::json!({
            "gamma": self.gamma,
            "episodes": self.episodes,
            "max_steps": self.max_steps,
            "epsilon": self.epsilon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::RewardModel;
    use crate::state::{ActionCatalog, StateCatalog};
    use crate::transition::{Distribution, TransitionModel};
    use rand::SeedableRng;
    use taskmdp_core::{ActionCategory, ActionDescriptor, AttributeDomain, StateId};

    const GAMMA: f64 = 0.9;

    struct Fixture {
        states: StateCatalog,
        actions: ActionCatalog,
        transitions: TransitionModel,
        rewards: RewardModel,
    }

    impl Fixture {
        /// A --go(1)--> B --go(10), 0.8--> C (absorbing, reward 0)
        ///                 \--0.2--> B
        /// "stay" in A keeps A, "stay" in B returns to A.
        fn three_state() -> Self {
            let states = StateCatalog::from_domains(
                vec![AttributeDomain::new("node", ["a", "b", "c"])],
                None,
            )
            .unwrap();
            let actions = ActionCatalog::new(vec![
                ActionDescriptor::new("stay", ActionCategory::Schedule),
                ActionDescriptor::new("go", ActionCategory::Progress),
            ])
            .unwrap();

            let (a, b, c) = (StateId(0), StateId(1), StateId(2));
            let (stay, go) = (ActionId(0), ActionId(1));
            let mut transitions = TransitionModel::new(3, 2);
            transitions.set(b, stay, Distribution::certain(a));
            transitions.set(a, go, Distribution::certain(b));
            transitions.set(
                b,
                go,
                Distribution::from_weights(vec![(c, 0.8), (b, 0.2)]).unwrap(),
            );

            let mut rewards = RewardModel::new(3, 2);
            rewards.set(a, go, 1.0);
            rewards.set(b, go, 10.0);

            Self {
                states,
                actions,
                transitions,
                rewards,
            }
        }

        fn view(&self) -> ModelView<'_> {
            ModelView {
                states: &self.states,
                actions: &self.actions,
                transitions: &self.transitions,
                rewards: &self.rewards,
            }
        }
    }

    fn analytic_values() -> [f64; 3] {
        let v_b = 10.0 / (1.0 - GAMMA * 0.2);
        let v_a = 1.0 + GAMMA * v_b;
        [v_a, v_b, 0.0]
    }

    #[test]
    fn test_value_iteration_bellman_fixed_point() {
        let fixture = Fixture::three_state();
        let mut store = ValueStore::new(3, 2);
        let mut rng = StdRng::seed_from_u64(0);

        let report = ValueIteration::new(GAMMA, 1e-4, 1000).solve(&fixture.view(), &mut store, &mut rng);

        assert!(report.converged);
        for (s, expected) in analytic_values().iter().enumerate() {
            let v = store.value(StateId::from(s));
            assert!((v - expected).abs() < 1e-3, "V({s}) = {v}, expected {expected}");
        }
        assert_eq!(store.policy(StateId(0)), ActionId(1));
        assert_eq!(store.policy(StateId(1)), ActionId(1));
        // Absorbing state ties; first action wins
        assert_eq!(store.policy(StateId(2)), ActionId(0));
    }

    #[test]
    fn test_value_iteration_reports_cap() {
        let fixture = Fixture::three_state();
        let mut store = ValueStore::new(3, 2);
        let mut rng = StdRng::seed_from_u64(0);

        let report = ValueIteration::new(GAMMA, 1e-12, 2).solve(&fixture.view(), &mut store, &mut rng);

        assert!(!report.converged);
        assert_eq!(report.iterations, 2);
        assert!(report.final_delta >= 1e-12);
    }

    #[test]
    fn test_policy_iteration_matches_value_iteration() {
        let fixture = Fixture::three_state();
        let mut store = ValueStore::new(3, 2);
        let mut rng = StdRng::seed_from_u64(11);

        let report = PolicyIteration::new(GAMMA, 1e-6, 10_000, 100).solve(&fixture.view(), &mut store, &mut rng);

        assert!(report.converged);
        assert!(report.iterations <= 100);
        assert_eq!(store.policy(StateId(0)), ActionId(1));
        assert_eq!(store.policy(StateId(1)), ActionId(1));
        for (s, expected) in analytic_values().iter().enumerate() {
            assert!((store.value(StateId::from(s)) - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_policy_iteration_is_reproducible() {
        let fixture = Fixture::three_state();
        let solver = PolicyIteration::new(GAMMA, 1e-4, 1000, 100);

        let mut first = ValueStore::new(3, 2);
        let mut second = ValueStore::new(3, 2);
        solver.solve(&fixture.view(), &mut first, &mut StdRng::seed_from_u64(5));
        solver.solve(&fixture.view(), &mut second, &mut StdRng::seed_from_u64(5));

        assert_eq!(first.values(), second.values());
        for s in fixture.states.ids() {
            assert_eq!(first.policy(s), second.policy(s));
        }
    }

    #[test]
    fn test_policy_iteration_reports_cap() {
        let definition = crate::preset::project_management();
        let states = StateCatalog::from_states(
            definition.domains,
            definition.states.as_deref().unwrap(),
            None,
        )
        .unwrap();
        let actions = ActionCatalog::new(definition.actions).unwrap();
        let transitions =
            TransitionModel::from_seeds(&states, &actions, &definition.transitions).unwrap();
        let rewards = RewardModel::from_seeds(&states, &actions, &definition.rewards).unwrap();
        let view = ModelView {
            states: &states,
            actions: &actions,
            transitions: &transitions,
            rewards: &rewards,
        };

        let mut store = ValueStore::new(states.len(), actions.len());
        let report = PolicyIteration::new(0.95, 0.01, 1000, 1).solve(
            &view,
            &mut store,
            &mut StdRng::seed_from_u64(42),
        );

        assert!(!report.converged);
        assert_eq!(report.iterations, 1);
        assert_eq!(report.solver, "policy_iteration");
    }

    #[test]
    fn test_policy_iteration_stable_but_unevaluated() {
        let fixture = Fixture::three_state();
        let mut store = ValueStore::new(3, 2);
        let mut rng = StdRng::seed_from_u64(3);

        // One evaluation sweep per round never gets below theta
        let report =
            PolicyIteration::new(GAMMA, 1e-12, 1, 100).solve(&fixture.view(), &mut store, &mut rng);

        assert!(!report.converged);
        assert!(report.iterations < 100);
        assert!(report.final_delta >= 1e-12);
        assert_eq!(store.policy(StateId(0)), ActionId(1));
        assert_eq!(store.policy(StateId(1)), ActionId(1));
    }

    #[test]
    fn test_monte_carlo_truncated_returns_with_positive_rewards() {
        let mut fixture = Fixture::three_state();
        for s in fixture.states.ids() {
            for a in fixture.actions.ids() {
                fixture.rewards.set(s, a, 1.0);
            }
        }
        let max_steps = 3;
        let horizon_cap = (1.0 - GAMMA.powi(max_steps as i32)) / (1.0 - GAMMA);
        let infinite_lower = 1.0 / (1.0 - GAMMA);

        let mut store = ValueStore::new(3, 2);
        MonteCarloControl::new(GAMMA, 500, max_steps, 0.3).solve(
            &fixture.view(),
            &mut store,
            &mut StdRng::seed_from_u64(8),
        );

        let visited: Vec<f64> = store.q_values().iter().copied().filter(|&q| q != 0.0).collect();
        assert!(!visited.is_empty());
        for q in visited {
            assert!(q >= 1.0 - 1e-9 && q <= horizon_cap + 1e-9, "Q = {q}");
            assert!(q < infinite_lower);
        }
    }

    #[test]
    fn test_monte_carlo_learns_to_advance() {
        let fixture = Fixture::three_state();
        let mut store = ValueStore::new(3, 2);
        let mut rng = StdRng::seed_from_u64(42);

        let report = MonteCarloControl::new(GAMMA, 3000, 30, 0.2).solve(&fixture.view(), &mut store, &mut rng);

        assert!(report.converged);
        assert_eq!(report.iterations, 3000);
        assert_eq!(store.policy(StateId(1)), ActionId(1));
        assert!(store.q(StateId(1), ActionId(1)) > store.q(StateId(1), ActionId(0)));
    }

    #[test]
    fn test_q_bounds_for_all_solvers() {
        let mut fixture = Fixture::three_state();
        fixture.rewards.set(StateId(0), ActionId(0), -2.0);
        let (r_min, r_max) = fixture.rewards.bounds();
        let lower = r_min / (1.0 - GAMMA);
        let upper = r_max / (1.0 - GAMMA);

        let configs = [
            SolverConfig::ValueIteration {
                gamma: GAMMA,
                theta: 1e-4,
                max_iterations: 1000,
            },
            SolverConfig::PolicyIteration {
                gamma: GAMMA,
                theta: 1e-4,
                max_evaluation_sweeps: 1000,
                max_improvement_rounds: 100,
            },
            SolverConfig::MonteCarlo {
                gamma: GAMMA,
                episodes: 500,
                max_steps: 50,
                epsilon: 0.3,
            },
        ];

        for config in configs {
            let solver = config.build().unwrap();
            let mut store = ValueStore::new(3, 2);
            solver.solve(&fixture.view(), &mut store, &mut StdRng::seed_from_u64(9));

            for &q in store.q_values() {
                assert!(
                    q >= lower - 1e-9 && q <= upper + 1e-9,
                    "{}: Q = {q} outside [{lower}, {upper}]",
                    solver.name()
                );
            }
        }
    }

    #[test]
    fn test_solver_config_validation() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(SolverConfig::policy_iteration().validate().is_ok());
        assert!(SolverConfig::monte_carlo().validate().is_ok());

        let bad_gamma = SolverConfig::ValueIteration {
            gamma: 1.0,
            theta: 0.01,
            max_iterations: 10,
        };
        assert!(matches!(
            bad_gamma.build(),
            Err(MdpError::InvalidParameter(_))
        ));

        let bad_theta = SolverConfig::PolicyIteration {
            gamma: 0.9,
            theta: 0.0,
            max_evaluation_sweeps: 10,
            max_improvement_rounds: 10,
        };
        assert!(bad_theta.validate().is_err());

        let bad_epsilon = SolverConfig::MonteCarlo {
            gamma: 0.9,
            episodes: 10,
            max_steps: 10,
            epsilon: 1.5,
        };
        assert!(bad_epsilon.validate().is_err());
    }

    #[test]
    fn test_solver_config_deserialization() {
        let config: SolverConfig =
            serde_json::from_str(r#"{"algorithm": "policy_iteration", "gamma": 0.8}"#).unwrap();

        assert_eq!(
            config,
            SolverConfig::PolicyIteration {
                gamma: 0.8,
                theta: 0.01,
                max_evaluation_sweeps: 1000,
                max_improvement_rounds: 100,
            }
        );
        assert_eq!(config.build().unwrap().name(), "policy_iteration");
    }

    #[test]
    fn test_get_params() {
        let solver = SolverConfig::monte_carlo().build().unwrap();
        let params = solver.get_params();
        assert_eq!(params["episodes"], 5000);
        assert_eq!(params["epsilon"], 0.1);
    }
}
