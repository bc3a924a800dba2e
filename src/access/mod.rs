//! Single-rule access control
//!
//! Provides:
//! - Rules with optional users, IPs, roles and custom conditions
//! - Wildcards `*` (anyone), `?` (guests), `@` (authenticated)
//! - AND across conditions, with inversion of `allow` when the rule does not apply
//! - A diagnostic bitmask of the categories behind a denial

mod bits;
mod evaluator;
mod matcher;
mod rule;

pub use bits::ErrorBits;
pub use evaluator::{
    AccessEvaluator, AccessEvaluatorBuilder, Decision, Evaluation, Outcome, RuleEvaluator,
};
pub use matcher::{Matchers, ANY, AUTHENTICATED, GUEST, OWNER_KEY};
pub use rule::{CustomCondition, CustomSpec, Predicate, PredicateRegistry, Rule, RuleDocument};
