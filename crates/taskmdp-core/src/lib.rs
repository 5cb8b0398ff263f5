//! taskmdp Core - Catalog vocabulary, errors, and shared types
//!
//! This crate provides the foundational types used by the MDP engine and
//! the service layer: attribute domains that compose a state, action
//! descriptors, and the identifiers the engine interns them under.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod attribute;
pub mod error;
pub mod types;

pub use action::{ActionCategory, ActionDescriptor, CostTier, DurationTier};
pub use attribute::{attributes, AttributeDomain, Attributes, StateRef, TerminalMarker};
pub use error::{MdpError, Result};
pub use types::{ActionId, StateId};
