//! Episode simulation for Monte Carlo control

use rand::Rng;

use taskmdp_core::{ActionId, StateId};

use crate::model::ModelView;
use crate::state::Reward;
use crate::store::ValueStore;

/// A single (s, a, r) step of a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: StateId,
    pub action: ActionId,
    pub reward: Reward,
}

/// Finite trajectory produced by the simulator
#[derive(Debug, Clone, Default)]
pub struct Episode {
    steps: Vec<Step>,
}

impl Episode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_reward(&self) -> Reward {
        self.steps.iter().map(|s| s.reward).sum()
    }

    /// Discounted return from every step, computed backwards:
    /// `G[t] = r[t] + γ · G[t+1]`, `G[last] = r[last]`.
    pub fn returns(&self, gamma: f64) -> Vec<f64> {
        let mut returns = vec![0.0; self.steps.len()];
        let mut g = 0.0;
        for (t, step) in self.steps.iter().enumerate().rev() {
            g = step.reward + gamma * g;
            returns[t] = g;
        }
        returns
    }
}

impl FromIterator<Step> for Episode {
    fn from_iter<T: IntoIterator<Item = Step>>(iter: T) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// Samples trajectories from the transition model under ε-greedy control
pub struct EpisodeSimulator<'m, 'a> {
    model: &'m ModelView<'a>,
    epsilon: f64,
    max_steps: usize,
}

impl<'m, 'a> EpisodeSimulator<'m, 'a> {
    pub fn new(model: &'m ModelView<'a>, epsilon: f64, max_steps: usize) -> Self {
        Self {
            model,
            epsilon,
            max_steps,
        }
    }

    /// ε-greedy: uniform random action with probability ε, else greedy by Q
    pub fn choose_action<R: Rng + ?Sized>(
        &self,
        state: StateId,
        store: &ValueStore,
        rng: &mut R,
    ) -> ActionId {
        if rng.gen::<f64>() < self.epsilon {
            ActionId::from(rng.gen_range(0..self.model.action_count()))
        } else {
            store.best(state).0
        }
    }

    /// Run one episode from a uniformly drawn start state
    pub fn generate<R: Rng + ?Sized>(&self, store: &ValueStore, rng: &mut R) -> Episode {
        let start = StateId::from(rng.gen_range(0..self.model.state_count()));
        self.generate_from(start, store, rng)
    }

    /// Run one episode until a terminal state or the step cap
    pub fn generate_from<R: Rng + ?Sized>(
        &self,
        start: StateId,
        store: &ValueStore,
        rng: &mut R,
    ) -> Episode {
        let mut episode = Episode::new();
        let mut state = start;

        while episode.len() < self.max_steps && !self.model.states.is_terminal(state) {
            let action = self.choose_action(state, store, rng);
            let reward = self.model.rewards.reward(state, action);
            let next = self
                .model
                .transitions
                .sample(state, action, rng.gen::<f64>());

            episode.push(Step {
                state,
                action,
                reward,
            });
            state = next;
        }

        episode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::RewardModel;
    use crate::state::{ActionCatalog, StateCatalog};
    use crate::transition::{Distribution, TransitionModel};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use taskmdp_core::{ActionCategory, ActionDescriptor, AttributeDomain, TerminalMarker};

    struct Fixture {
        states: StateCatalog,
        actions: ActionCatalog,
        transitions: TransitionModel,
        rewards: RewardModel,
    }

    impl Fixture {
        /// start -> middle -> done chain, "done" is terminal
        fn chain() -> Self {
            let states = StateCatalog::from_domains(
                vec![AttributeDomain::new("phase", ["start", "middle", "done"])],
                Some(&TerminalMarker::new("phase", "done")),
            )
            .unwrap();
            let actions = ActionCatalog::new(vec![
                ActionDescriptor::new("advance", ActionCategory::Progress),
                ActionDescriptor::new("idle", ActionCategory::Schedule),
            ])
            .unwrap();
            let mut transitions = TransitionModel::new(3, 2);
            transitions.set(StateId(0), ActionId(0), Distribution::certain(StateId(1)));
            transitions.set(StateId(1), ActionId(0), Distribution::certain(StateId(2)));
            let mut rewards = RewardModel::new(3, 2);
            rewards.set(StateId(0), ActionId(0), 1.0);
            rewards.set(StateId(1), ActionId(0), 10.0);

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

    #[test]
    fn test_returns_backward_pass() {
        let episode: Episode = [1.0, 2.0, 4.0]
            .iter()
            .map(|&reward| Step {
                state: StateId(0),
                action: ActionId(0),
                reward,
            })
            .collect();

        let returns = episode.returns(0.5);
        assert_eq!(returns, vec![1.0 + 0.5 * (2.0 + 0.5 * 4.0), 2.0 + 0.5 * 4.0, 4.0]);
        assert_eq!(episode.total_reward(), 7.0);
    }

    #[test]
    fn test_greedy_episode_stops_at_terminal() {
        let fixture = Fixture::chain();
        let view = fixture.view();
        let simulator = EpisodeSimulator::new(&view, 0.0, 50);
        let mut rng = StdRng::seed_from_u64(1);

        // Greedy on an all-zero Q picks the first action, which advances
        let episode = simulator.generate_from(StateId(0), &ValueStore::new(3, 2), &mut rng);
        assert_eq!(episode.len(), 2);
        assert_eq!(episode.steps()[1].reward, 10.0);
    }

    #[test]
    fn test_episode_respects_step_cap() {
        let fixture = Fixture::chain();
        let view = fixture.view();
        let simulator = EpisodeSimulator::new(&view, 0.0, 5);
        let mut store = ValueStore::new(3, 2);
        store.set_q(StateId(0), ActionId(1), 1.0);
        let mut rng = StdRng::seed_from_u64(7);

        // "idle" self-loops forever
        let episode = simulator.generate_from(StateId(0), &store, &mut rng);
        assert_eq!(episode.len(), 5);
        assert!(episode.steps().iter().all(|s| s.action == ActionId(1)));
    }

    #[test]
    fn test_terminal_start_gives_empty_episode() {
        let fixture = Fixture::chain();
        let view = fixture.view();
        let simulator = EpisodeSimulator::new(&view, 0.3, 10);
        let mut rng = StdRng::seed_from_u64(3);

        let episode = simulator.generate_from(StateId(2), &ValueStore::new(3, 2), &mut rng);
        assert!(episode.is_empty());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let fixture = Fixture::chain();
        let view = fixture.view();
        let simulator = EpisodeSimulator::new(&view, 0.5, 20);
        let store = ValueStore::new(3, 2);

        let a = simulator.generate(&store, &mut StdRng::seed_from_u64(99));
        let b = simulator.generate(&store, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.steps(), b.steps());
    }
}
