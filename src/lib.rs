//! # access-rs - Single-Rule Access Control
//!
//! `access-rs` decides whether a caller may proceed under one allow/deny rule.
//! A rule combines optional conditions on the user, the request IP, the
//! user's roles and a custom predicate:
//!
//! - **AND across conditions**: every present condition must hold for the
//!   rule's `allow` value to take effect
//! - **Inversion**: when the rule does not apply, the verdict is `!allow`
//! - **Diagnostics**: a [`Decision`] carries the [`ErrorBits`] of the
//!   categories behind a denial
//!
//! ## Quick Start
//!
//! ```rust
//! use access_rs::{AccessEvaluator, RemoteAddr, Result, Rule, StaticPrincipal};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let evaluator = AccessEvaluator::builder()
//!     .principal(Arc::new(StaticPrincipal::user("alice").with_role("admin")))
//!     .origin(Arc::new("10.0.0.7".parse::<RemoteAddr>().unwrap()))
//!     .build();
//! let owner = json!({"controller": "admin", "action": "index"});
//!
//! // Deny the internal network
//! let rule = Rule::deny().ips(["10.0.0.0/8"]);
//! assert!(!evaluator.check_access(Some(&rule), Some(&owner))?.allowed);
//!
//! // Allow admins only
//! let rule = Rule::allow().roles(["admin"]);
//! assert!(evaluator.check_access(Some(&rule), Some(&owner))?.allowed);
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod config;
pub mod context;
pub mod error;

pub use crate::access::{
    AccessEvaluator, AccessEvaluatorBuilder, CustomCondition, Decision, ErrorBits, Outcome,
    Predicate, PredicateRegistry, Rule, RuleDocument,
};
pub use crate::config::AccessConfig;
pub use crate::context::{
    Origin, Principal, RemoteAddr, Responder, StaticPrincipal, StatusRecorder, STATUS_FORBIDDEN,
};
pub use crate::error::{AccessError, Result};
