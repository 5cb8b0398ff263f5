//! taskmdp service - shared async access to the MDP engine
//!
//! Wraps a single [`taskmdp_rl::MdpEngine`] behind a read/write lock and
//! loads its model, solver and engine parameters from TOML files and
//! `TASKMDP__*` environment variables.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod service;

pub use config::{ModelConfig, ServiceConfig, ServiceSection, ENV_PREFIX};
pub use service::MdpService;
