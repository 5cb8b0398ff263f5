//! taskmdp RL - MDP planning and online learning for task selection
//!
//! This crate recommends the next action for a project given its discrete
//! condition. It keeps a transition and reward model over a fixed catalog
//! of states and actions, solves it with value iteration, policy iteration
//! or Monte Carlo control, and nudges the solution with TD(0) steps as real
//! outcomes are reported.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod algorithm;
pub mod engine;
pub mod episode;
pub mod experience;
pub mod model;
pub mod preset;
pub mod reward;
pub mod state;
pub mod store;
pub mod transition;

pub use algorithm::{
    MonteCarloControl, PolicyIteration, PolicySolver, SolveReport, SolverConfig, ValueIteration,
};
pub use engine::{
    EngineParams, EngineStatus, MdpDefinition, MdpEngine, ModelTables, PolicyEntry,
    Recommendation, TdUpdate,
};
pub use episode::{Episode, EpisodeSimulator, Step};
pub use experience::Experience;
pub use model::ModelView;
pub use reward::{RewardModel, RewardSeed};
pub use state::{ActionCatalog, MatchKind, Reward, StateCatalog, StateMatch};
pub use store::ValueStore;
pub use transition::{Distribution, SuccessorSeed, TransitionModel, TransitionSeed};
