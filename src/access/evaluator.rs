//! Rule evaluation
//!
//! [`RuleEvaluator`] runs every present condition of one rule in the order
//! users, ips, roles, custom and combines the answers with AND. A rule
//! whose conditions all hold yields its `allow` value; otherwise the rule
//! does not apply and [`AccessEvaluator`] falls back to the inverse of
//! `allow`. A deny rule thus denies only on match, and an allow rule
//! allows only on match.

use super::bits::ErrorBits;
use super::matcher::Matchers;
use super::rule::Rule;
use crate::config::AccessConfig;
use crate::context::{Origin, Principal, Responder};
use crate::error::{AccessError, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Result of matching one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every present condition held; carries the rule's `allow`
    Matched(bool),
    /// No condition present, or at least one failed
    NotApplicable,
}

/// Outcome plus the categories recorded while matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub errors: ErrorBits,
}

/// Final verdict of [`AccessEvaluator::check_access`]
///
/// `errors` is always empty when access is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    pub errors: ErrorBits,
}

impl Decision {
    pub fn permit() -> Self {
        Decision {
            allowed: true,
            errors: ErrorBits::NONE,
        }
    }

    pub fn deny(errors: ErrorBits) -> Self {
        Decision {
            allowed: false,
            errors,
        }
    }
}

/// Combines the matchers for a single rule
pub struct RuleEvaluator<'a> {
    matchers: Matchers<'a>,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(matchers: Matchers<'a>) -> Self {
        RuleEvaluator { matchers }
    }

    /// Match `rule` against the current caller
    ///
    /// All present conditions are evaluated, even after one fails, so that
    /// each records its bit and side effect. A missing `allow` counts as
    /// `false` here.
    pub fn matches(&self, rule: &Rule) -> Result<Evaluation> {
        let allow = rule.allow.unwrap_or(false);
        let mut errors = ErrorBits::NONE;
        let mut results = Vec::with_capacity(4);

        if let Some(users) = &rule.users {
            let matched = self.matchers.match_users(users)?;
            debug!("Users condition matched: {}", matched);
            results.push(errors.record_if_failed(matched, ErrorBits::USERS, allow));
        }
        if let Some(ips) = &rule.ips {
            let matched = self.matchers.match_ips(ips)?;
            debug!("IPs condition matched: {}", matched);
            results.push(errors.record_if_failed(matched, ErrorBits::IPS, allow));
        }
        if let Some(roles) = &rule.roles {
            let matched = self.matchers.match_roles(roles)?;
            debug!("Roles condition matched: {}", matched);
            results.push(errors.record_if_failed(matched, ErrorBits::ROLES, allow));
        }
        if let Some(custom) = &rule.custom {
            let matched = self.matchers.match_custom(custom)?;
            debug!("Custom condition matched: {}", matched);
            results.push(errors.record_if_failed(matched, ErrorBits::CUSTOM, allow));
        }

        let outcome = if results.is_empty() || results.contains(&false) {
            Outcome::NotApplicable
        } else {
            Outcome::Matched(allow)
        };

        Ok(Evaluation { outcome, errors })
    }
}

/// PHP-style emptiness: absent owners and these values skip the check
fn is_empty_owner(owner: &Value) -> bool {
    match owner {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

/// Entry point: checks one rule for one owner
///
/// Holds no per-call state, so one instance can be shared across threads.
#[derive(Clone)]
pub struct AccessEvaluator {
    principal: Option<Arc<dyn Principal>>,
    origin: Option<Arc<dyn Origin>>,
    responder: Option<Arc<dyn Responder>>,
    send_headers: bool,
}

impl AccessEvaluator {
    pub fn builder() -> AccessEvaluatorBuilder {
        AccessEvaluatorBuilder::new()
    }

    pub fn send_headers(&self) -> bool {
        self.send_headers
    }

    /// Decide whether `owner` may proceed under `rule`
    ///
    /// A missing or empty rule, or a missing or empty owner, allows access.
    ///
    /// # Errors
    ///
    /// - `NotObject` if the owner is not a JSON object
    /// - `UnknownPrincipalType` / `UnknownOriginType` if a condition needs a
    ///   collaborator that is not configured
    /// - `Predicate` if a custom predicate fails
    ///
    /// # Examples
    ///
    /// ```
    /// use access_rs::{AccessEvaluator, Rule, StaticPrincipal};
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// let evaluator = AccessEvaluator::builder()
    ///     .principal(Arc::new(StaticPrincipal::user("bob")))
    ///     .build();
    /// let owner = json!({"controller": "admin"});
    ///
    /// let rule = Rule::allow().users(["alice"]);
    /// assert!(!evaluator.check_access(Some(&rule), Some(&owner)).unwrap().allowed);
    ///
    /// let rule = Rule::allow().users(["@"]);
    /// assert!(evaluator.check_access(Some(&rule), Some(&owner)).unwrap().allowed);
    /// ```
    pub fn check_access(&self, rule: Option<&Rule>, owner: Option<&Value>) -> Result<Decision> {
        let rule = match rule {
            Some(rule) if rule.allow.is_some() || rule.has_conditions() => rule,
            _ => {
                debug!("No rule configured, access allowed");
                return Ok(Decision::permit());
            }
        };
        let owner = match owner {
            Some(owner) if !is_empty_owner(owner) => owner,
            _ => {
                debug!("No owner set, access allowed");
                return Ok(Decision::permit());
            }
        };

        let decision = self.provide(rule, owner)?;
        debug!(
            "Access {} (errors: {})",
            if decision.allowed { "allowed" } else { "denied" },
            decision.errors
        );
        Ok(decision)
    }

    /// Verdict only
    pub fn is_allowed(&self, rule: Option<&Rule>, owner: Option<&Value>) -> Result<bool> {
        Ok(self.check_access(rule, owner)?.allowed)
    }

    fn provide(&self, rule: &Rule, owner: &Value) -> Result<Decision> {
        if !owner.is_object() {
            return Err(AccessError::NotObject {
                name: "owner".to_string(),
            });
        }

        let allow = match rule.allow {
            Some(allow) => allow,
            None => return Ok(Decision::permit()),
        };
        if !rule.has_conditions() {
            return Ok(Decision::permit());
        }

        let Evaluation { outcome, errors } = self.rule_evaluator(owner).matches(rule)?;
        let allowed = match outcome {
            Outcome::Matched(verdict) => verdict,
            Outcome::NotApplicable => !allow,
        };

        if allowed {
            Ok(Decision::permit())
        } else {
            Ok(Decision::deny(errors))
        }
    }

    fn rule_evaluator<'a>(&'a self, owner: &'a Value) -> RuleEvaluator<'a> {
        RuleEvaluator::new(Matchers::new(
            self.principal.as_deref(),
            self.origin.as_deref(),
            self.responder.as_deref(),
            self.send_headers,
            owner,
        ))
    }
}

impl Default for AccessEvaluator {
    fn default() -> Self {
        AccessEvaluatorBuilder::new().build()
    }
}

/// Builder for [`AccessEvaluator`]
pub struct AccessEvaluatorBuilder {
    principal: Option<Arc<dyn Principal>>,
    origin: Option<Arc<dyn Origin>>,
    responder: Option<Arc<dyn Responder>>,
    send_headers: bool,
}

impl AccessEvaluatorBuilder {
    pub fn new() -> Self {
        AccessEvaluatorBuilder {
            principal: None,
            origin: None,
            responder: None,
            send_headers: true,
        }
    }

    pub fn principal(mut self, principal: Arc<dyn Principal>) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn origin(mut self, origin: Arc<dyn Origin>) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn responder(mut self, responder: Arc<dyn Responder>) -> Self {
        self.responder = Some(responder);
        self
    }

    /// Whether failed matchers mark the response forbidden (default: true)
    pub fn send_headers(mut self, enabled: bool) -> Self {
        self.send_headers = enabled;
        self
    }

    /// Apply settings from a loaded config
    pub fn config(self, config: &AccessConfig) -> Self {
        self.send_headers(config.send_headers)
    }

    pub fn build(self) -> AccessEvaluator {
        AccessEvaluator {
            principal: self.principal,
            origin: self.origin,
            responder: self.responder,
            send_headers: self.send_headers,
        }
    }
}

impl Default for AccessEvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
