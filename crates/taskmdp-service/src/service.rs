//! Async service wrapping the MDP engine
//!
//! Queries take a shared read lock, so any number of them run concurrently
//! and each sees a complete policy. Online updates and full recomputation
//! take the write lock and are serialized against everything else.

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};

use taskmdp_core::Attributes;
use taskmdp_rl::{
    EngineStatus, Experience, MdpEngine, ModelTables, PolicyEntry, Recommendation, SolveReport,
    SolverConfig, TdUpdate,
};

use crate::config::ServiceConfig;

/// Shared handle to one engine instance
pub struct MdpService {
    engine: RwLock<MdpEngine>,
    recompute_interval: u64,
}

impl MdpService {
    /// Wrap an already initialized engine
    pub fn new(engine: MdpEngine) -> Self {
        Self {
            engine: RwLock::new(engine),
            recompute_interval: 0,
        }
    }

    /// Re-run the solver after every `interval` recorded experiences; 0 disables
    pub fn with_recompute_interval(mut self, interval: u64) -> Self {
        self.recompute_interval = interval;
        self
    }

    /// Build the configured model and solve it once
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let definition = config.model.definition()?;
        let engine = MdpEngine::initialize(definition, config.solver.clone(), config.engine.clone())
            .context("Failed to initialize MDP engine")?;

        info!(
            "MDP service initialized with solver: {}, recompute_interval: {}",
            engine.solver_name(),
            config.service.recompute_interval
        );

        Ok(Self::new(engine).with_recompute_interval(config.service.recompute_interval))
    }

    /// Recommend the next action for an observed state
    pub async fn select_task(&self, observed: &Attributes) -> Recommendation {
        let engine = self.engine.read().await;
        engine.select_task(observed)
    }

    /// Fold an observed outcome into the engine
    pub async fn record_experience(&self, experience: &Experience) -> Result<TdUpdate> {
        let mut engine = self.engine.write().await;
        let update = engine
            .record_experience(experience)
            .context("Failed to record experience")?;

        let recorded = engine.status().experiences_recorded;
        if self.recompute_interval > 0 && recorded % self.recompute_interval == 0 {
            debug!("Recomputing policy after {} experiences", recorded);
            engine.compute_optimal_policy();
        }

        Ok(update)
    }

    /// Rebuild the policy from the current models
    pub async fn recompute(&self) -> SolveReport {
        let mut engine = self.engine.write().await;
        engine.compute_optimal_policy()
    }

    /// Switch solver and recompute with it
    pub async fn set_solver(&self, config: &SolverConfig) -> Result<SolveReport> {
        let mut engine = self.engine.write().await;
        engine
            .set_solver(config)
            .context("Failed to set solver")?;
        Ok(engine.compute_optimal_policy())
    }

    /// Get current statistics
    pub async fn status(&self) -> EngineStatus {
        let engine = self.engine.read().await;
        engine.status()
    }

    /// Get solver parameters
    pub async fn solver_params(&self) -> serde_json::Value {
        let engine = self.engine.read().await;
        engine.status().solver_params
    }

    pub async fn policy_summary(&self, top_n: Option<usize>) -> Vec<PolicyEntry> {
        let engine = self.engine.read().await;
        match top_n {
            Some(n) => engine.policy_summary(n),
            None => engine.default_policy_summary(),
        }
    }

    pub async fn export_tables(&self) -> ModelTables {
        let engine = self.engine.read().await;
        engine.export_tables()
    }
}
