use access_rs::{AccessEvaluator, RemoteAddr, Rule, StaticPrincipal};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn evaluator() -> AccessEvaluator {
    AccessEvaluator::builder()
        .principal(Arc::new(
            StaticPrincipal::user("alice").with_roles(["admin", "editor", "billing"]),
        ))
        .origin(Arc::new("10.20.30.40".parse::<RemoteAddr>().unwrap()))
        .send_headers(false)
        .build()
}

/// Rule using every condition type
fn create_complex_rule() -> Rule {
    Rule::allow()
        .users(["bob", "carol", "alice"])
        .ips(["192.168.0.0/16", "172.16.0.0/12", "10.0.0.0/8"])
        .roles(["admin", "editor"])
        .custom(
            |args: &Map<String, Value>| Ok(args["owner"]["action"] != "delete"),
            Map::new(),
        )
}

/// Benchmark single-condition rules per condition type
fn bench_condition_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_types");
    let evaluator = evaluator();
    let owner = json!({"controller": "posts", "action": "edit"});

    let rules = [
        ("users", Rule::allow().users(["bob", "alice"])),
        ("ips", Rule::allow().ips(["10.0.0.0/8"])),
        ("roles", Rule::allow().roles(["admin", "billing"])),
        (
            "custom",
            Rule::allow().custom(|_: &Map<String, Value>| Ok(true), Map::new()),
        ),
    ];

    for (name, rule) in rules {
        group.bench_function(name, |b| {
            b.iter(|| {
                let decision = evaluator.check_access(Some(&rule), Some(&owner)).unwrap();
                black_box(decision);
            });
        });
    }

    group.finish();
}

/// Benchmark a rule combining all conditions
fn bench_complex_rule(c: &mut Criterion) {
    let eval_counts = vec![100, 1_000, 10_000];

    let mut group = c.benchmark_group("complex_rule");

    for count in eval_counts {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let evaluator = evaluator();
            let rule = create_complex_rule();
            let owner = json!({"controller": "posts", "action": "edit"});

            b.iter(|| {
                for _ in 0..count {
                    let decision = evaluator.check_access(Some(&rule), Some(&owner)).unwrap();
                    black_box(decision);
                }
            });
        });
    }

    group.finish();
}

/// Benchmark IP lists of growing size where only the last entry matches
fn bench_ip_list_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("ip_list_size");
    let evaluator = evaluator();
    let owner = json!({"controller": "posts"});

    for size in [1usize, 10, 100] {
        let mut ips: Vec<String> = (0..size.saturating_sub(1))
            .map(|i| format!("192.168.{}.0/24", i % 256))
            .collect();
        ips.push("10.20.30.40".to_string());
        let rule = Rule::allow().ips(ips);

        group.bench_with_input(BenchmarkId::from_parameter(size), &rule, |b, rule| {
            b.iter(|| {
                let decision = evaluator.check_access(Some(rule), Some(&owner)).unwrap();
                black_box(decision);
            });
        });
    }

    group.finish();
}

/// Compare deny-rule hits with allow-rule fallthrough
fn bench_deny_vs_allow(c: &mut Criterion) {
    let mut group = c.benchmark_group("deny_vs_allow");
    let evaluator = evaluator();
    let owner = json!({"controller": "posts"});

    group.bench_function("allow_match", |b| {
        let rule = Rule::allow().roles(["admin"]);
        b.iter(|| black_box(evaluator.check_access(Some(&rule), Some(&owner)).unwrap()));
    });

    group.bench_function("deny_match", |b| {
        let rule = Rule::deny().ips(["10.0.0.0/8"]);
        b.iter(|| black_box(evaluator.check_access(Some(&rule), Some(&owner)).unwrap()));
    });

    group.bench_function("deny_fallthrough", |b| {
        let rule = Rule::deny().users(["mallory"]);
        b.iter(|| black_box(evaluator.check_access(Some(&rule), Some(&owner)).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_condition_types,
    bench_complex_rule,
    bench_ip_list_size,
    bench_deny_vs_allow,
);
criterion_main!(benches);
