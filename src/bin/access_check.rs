//! Access Check
//!
//! Evaluates the rule from an access config file against a caller
//! described on the command line.

use access_rs::{
    AccessConfig, AccessEvaluator, ErrorBits, PredicateRegistry, RemoteAddr, StaticPrincipal,
    StatusRecorder, STATUS_FORBIDDEN,
};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "access-check")]
#[command(about = "Check a caller against an access rule")]
struct Args {
    /// Path to the access config (.toml or .json)
    #[arg(short = 'c', long)]
    config: PathBuf,

    /// Username of the caller
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Check as an unauthenticated guest
    #[arg(long, conflicts_with = "user")]
    guest: bool,

    /// Role held by the caller (repeatable)
    #[arg(short = 'r', long = "role")]
    roles: Vec<String>,

    /// Request IP address
    #[arg(short = 'i', long)]
    ip: Option<RemoteAddr>,

    /// Owner name passed to the rule as {"name": ...}
    #[arg(short = 'o', long, default_value = "cli")]
    owner: String,

    /// Do not mark failed conditions as 403
    #[arg(long)]
    no_send_headers: bool,
}

/// Outcome of one check as printed by the tool
#[derive(Debug, Serialize)]
struct Report {
    allowed: bool,
    errors: ErrorBits,
    status: Option<u16>,
    forbidden: bool,
    forbidden_count: usize,
}

fn run(args: &Args) -> anyhow::Result<Report> {
    info!("Loading config: {:?}", args.config);
    let config = AccessConfig::load(&args.config)?;
    let rule = config.rule(&PredicateRegistry::new())?;

    let principal = match &args.user {
        Some(user) if !args.guest => StaticPrincipal::user(user.as_str()),
        _ => StaticPrincipal::guest(),
    }
    .with_roles(args.roles.iter().cloned());

    let recorder = Arc::new(StatusRecorder::new());
    let mut builder = AccessEvaluator::builder()
        .config(&config)
        .principal(Arc::new(principal))
        .responder(recorder.clone());
    if args.no_send_headers {
        builder = builder.send_headers(false);
    }
    if let Some(ip) = args.ip {
        builder = builder.origin(Arc::new(ip));
    }
    let evaluator = builder.build();

    let owner = json!({ "name": args.owner });
    let decision = evaluator.check_access(rule.as_ref(), Some(&owner))?;

    let status = recorder.status();
    Ok(Report {
        allowed: decision.allowed,
        errors: decision.errors,
        status,
        forbidden: status == Some(STATUS_FORBIDDEN),
        forbidden_count: recorder.forbidden_count(),
    })
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let report = run(&args)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    info!(
        "Access {} (errors: {})",
        if report.allowed { "allowed" } else { "denied" },
        report.errors
    );

    Ok(if report.allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
