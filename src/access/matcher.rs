//! Condition matchers
//!
//! Each matcher answers one condition of a rule for the current caller.
//! `*` matches anyone, `?` only guests, `@` only authenticated principals.
//! A negative answer marks the response as forbidden when side effects
//! are enabled and a responder is configured.

use super::rule::CustomCondition;
use crate::context::{Origin, Principal, Responder, USERNAME_KEY};
use crate::error::{AccessError, Result};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

pub const ANY: &str = "*";
pub const GUEST: &str = "?";
pub const AUTHENTICATED: &str = "@";

/// Owner key in the argument bag handed to custom predicates
pub const OWNER_KEY: &str = "owner";

fn contains(list: &[String], token: &str) -> bool {
    list.iter().any(|entry| entry == token)
}

/// Matchers bound to the collaborators and owner of one check
pub struct Matchers<'a> {
    principal: Option<&'a dyn Principal>,
    origin: Option<&'a dyn Origin>,
    responder: Option<&'a dyn Responder>,
    send_headers: bool,
    owner: &'a Value,
}

impl<'a> Matchers<'a> {
    pub fn new(
        principal: Option<&'a dyn Principal>,
        origin: Option<&'a dyn Origin>,
        responder: Option<&'a dyn Responder>,
        send_headers: bool,
        owner: &'a Value,
    ) -> Self {
        Matchers {
            principal,
            origin,
            responder,
            send_headers,
            owner,
        }
    }

    fn principal(&self) -> Result<&'a dyn Principal> {
        self.principal.ok_or(AccessError::UnknownPrincipalType)
    }

    fn forbidden(&self) {
        if !self.send_headers {
            return;
        }
        if let Some(responder) = self.responder {
            warn!("Sending 403 Forbidden");
            responder.send_forbidden();
        }
    }

    /// Wildcard tokens shared by the users and roles conditions
    fn matches_wildcards(list: &[String], principal: &dyn Principal) -> bool {
        if contains(list, ANY) {
            trace!("Wildcard '*' matched");
            return true;
        }
        if contains(list, GUEST) && principal.is_guest() {
            trace!("Wildcard '?' matched guest");
            return true;
        }
        if contains(list, AUTHENTICATED) && !principal.is_guest() {
            trace!("Wildcard '@' matched authenticated principal");
            return true;
        }
        false
    }

    /// Match the current principal against a user list
    ///
    /// # Errors
    ///
    /// Returns `UnknownPrincipalType` if no principal is configured.
    pub fn match_users(&self, users: &[String]) -> Result<bool> {
        let principal = self.principal()?;

        if Self::matches_wildcards(users, principal) {
            return Ok(true);
        }
        if let Some(username) = principal.get(USERNAME_KEY) {
            if contains(users, &username) {
                return Ok(true);
            }
        }

        self.forbidden();
        Ok(false)
    }

    /// Match the request origin against an IP list
    ///
    /// # Errors
    ///
    /// Returns `UnknownOriginType` if the list needs an origin and none is configured.
    pub fn match_ips(&self, ips: &[String]) -> Result<bool> {
        if contains(ips, ANY) {
            trace!("Wildcard '*' matched any origin");
            return Ok(true);
        }

        let origin = self.origin.ok_or(AccessError::UnknownOriginType)?;
        let matched = origin.is_ips(ips);
        if !matched {
            self.forbidden();
        }
        Ok(matched)
    }

    /// Match the current principal against a role list
    ///
    /// Outside the wildcards every listed role must pass.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPrincipalType` if no principal is configured.
    pub fn match_roles(&self, roles: &[String]) -> Result<bool> {
        let principal = self.principal()?;

        if Self::matches_wildcards(roles, principal) {
            return Ok(true);
        }

        for role in roles {
            if !principal.check(role) {
                debug!("Role check failed: {}", role);
                self.forbidden();
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Run a custom predicate with `{"owner": .., ..args}`
    ///
    /// Extra args override the owner key if they repeat it. Predicate
    /// errors propagate unchanged.
    pub fn match_custom(&self, custom: &CustomCondition) -> Result<bool> {
        let mut args = Map::with_capacity(custom.args.len() + 1);
        args.insert(OWNER_KEY.to_string(), self.owner.clone());
        args.extend(
            custom
                .args
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        let matched = custom
            .predicate
            .call(&args)
            .map_err(AccessError::Predicate)?;
        if !matched {
            self.forbidden();
        }
        Ok(matched)
    }
}
