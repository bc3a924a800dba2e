#![no_main]
use access_rs::{AccessEvaluator, RemoteAddr, Rule, StaticPrincipal};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

#[derive(Arbitrary, Debug)]
struct Input {
    allow: Option<bool>,
    users: Option<Vec<String>>,
    ips: Option<Vec<String>>,
    roles: Option<Vec<String>>,
    username: Option<String>,
    held_roles: Vec<String>,
    ip: u32,
}

fuzz_target!(|input: Input| {
    let principal = match input.username {
        Some(name) => StaticPrincipal::user(name),
        None => StaticPrincipal::guest(),
    }
    .with_roles(input.held_roles);

    let evaluator = AccessEvaluator::builder()
        .principal(Arc::new(principal))
        .origin(Arc::new(RemoteAddr::new(IpAddr::V4(Ipv4Addr::from(input.ip)))))
        .build();

    let rule = Rule {
        allow: input.allow,
        users: input.users,
        ips: input.ips,
        roles: input.roles,
        custom: None,
    };

    let decision = evaluator
        .check_access(Some(&rule), Some(&json!({"fuzz": true})))
        .expect("all collaborators configured");
    if decision.allowed {
        assert!(decision.errors.is_empty());
    }
    if !rule.has_conditions() {
        assert!(decision.allowed);
    }
});
