//! End-to-end checks driven by config files

use access_rs::{
    AccessConfig, AccessError, AccessEvaluator, ErrorBits, PredicateRegistry, RemoteAddr,
    StaticPrincipal, StatusRecorder,
};
use serde_json::{json, Map, Value};
use std::io::Write;
use std::sync::Arc;

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_office_network_rule_from_toml() {
    let file = write_config(
        ".toml",
        r#"
send_headers = true

[rule]
allow = true
users = ["@"]
ips = ["203.0.113.0/24", "198.51.100.7"]
"#,
    );
    let config = AccessConfig::load(file.path()).unwrap();
    let rule = config.rule(&PredicateRegistry::new()).unwrap();
    let owner = json!({"controller": "reports"});

    let recorder = Arc::new(StatusRecorder::new());
    let inside = AccessEvaluator::builder()
        .config(&config)
        .principal(Arc::new(StaticPrincipal::user("pat")))
        .origin(Arc::new("203.0.113.44".parse::<RemoteAddr>().unwrap()))
        .responder(recorder.clone())
        .build();
    assert!(inside.is_allowed(rule.as_ref(), Some(&owner)).unwrap());
    assert_eq!(recorder.status(), None);

    let outside = AccessEvaluator::builder()
        .config(&config)
        .principal(Arc::new(StaticPrincipal::user("pat")))
        .origin(Arc::new("192.0.2.1".parse::<RemoteAddr>().unwrap()))
        .responder(recorder.clone())
        .build();
    let decision = outside.check_access(rule.as_ref(), Some(&owner)).unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.errors, ErrorBits::IPS);
    assert_eq!(recorder.status(), Some(403));
}

#[test]
fn test_custom_rule_from_json() {
    let file = write_config(
        ".json",
        r#"{
            "send_headers": false,
            "rule": {
                "allow": false,
                "roles": ["intern"],
                "custom": {"name": "after_hours", "args": {"hour": 23}}
            }
        }"#,
    );
    let config = AccessConfig::load(file.path()).unwrap();

    let mut registry = PredicateRegistry::new();
    registry.register("after_hours", |args: &Map<String, Value>| {
        let hour = args
            .get("hour")
            .and_then(Value::as_u64)
            .ok_or_else(|| anyhow::anyhow!("hour argument missing"))?;
        Ok(!(8..18).contains(&hour))
    });
    let rule = config.rule(&registry).unwrap();

    let recorder = Arc::new(StatusRecorder::new());
    let evaluator = AccessEvaluator::builder()
        .config(&config)
        .principal(Arc::new(StaticPrincipal::user("quinn").with_role("intern")))
        .responder(recorder.clone())
        .build();
    let decision = evaluator
        .check_access(rule.as_ref(), Some(&json!({"controller": "payroll"})))
        .unwrap();

    // Deny rule matched on both conditions
    assert!(!decision.allowed);
    assert_eq!(decision.errors, ErrorBits::ROLES | ErrorBits::CUSTOM);
    assert_eq!(recorder.forbidden_count(), 0);
}

#[test]
fn test_config_without_rule_allows() {
    let config = AccessConfig::from_toml_str("send_headers = true").unwrap();
    let rule = config.rule(&PredicateRegistry::new()).unwrap();
    assert!(rule.is_none());

    let evaluator = AccessEvaluator::builder().config(&config).build();
    assert!(evaluator
        .is_allowed(rule.as_ref(), Some(&json!({"controller": "home"})))
        .unwrap());
}

#[test]
fn test_ips_rule_without_origin() {
    let config = AccessConfig::from_toml_str(
        r#"
[rule]
allow = true
ips = ["10.0.0.0/8"]
"#,
    )
    .unwrap();
    let rule = config.rule(&PredicateRegistry::new()).unwrap();

    let evaluator = AccessEvaluator::builder().build();
    let err = evaluator
        .check_access(rule.as_ref(), Some(&json!({"controller": "home"})))
        .unwrap_err();
    assert!(matches!(err, AccessError::UnknownOriginType));
}

#[test]
fn test_users_rule_without_principal() {
    let config = AccessConfig::from_json_str(r#"{"rule": {"allow": true, "users": "?"}}"#).unwrap();
    let rule = config.rule(&PredicateRegistry::new()).unwrap();

    let evaluator = AccessEvaluator::builder().build();
    let err = evaluator
        .check_access(rule.as_ref(), Some(&json!({"controller": "home"})))
        .unwrap_err();
    assert!(matches!(err, AccessError::UnknownPrincipalType));
}
