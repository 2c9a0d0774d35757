//! Deploy Gate entry point
//!
//! Resolves configuration, runs the verification, prints the summary, and
//! maps the aggregated result to the process exit code.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deploy_gate::config::{HealthCheckConfig, RawConfig};
use deploy_gate::engine::auth::AuthVerifier;
use deploy_gate::engine::AssertionPipeline;
use deploy_gate::probe::ProbeExecutor;
use deploy_gate::report::{OutputFormat, RunReport};

#[derive(Parser)]
#[command(name = "deploy-gate")]
#[command(about = "Deploy Gate - remote service health verification for CI")]
#[command(version)]
struct Cli {
    /// URL of the service to verify (default: https://api.github.com)
    #[arg(long, env = "HEALTH_URL")]
    url: Option<String>,

    /// Top-level JSON field that must be present in the response body
    /// (default: current_user_url)
    #[arg(long, env = "EXPECT_FIELD")]
    expect_field: Option<String>,

    /// Per-request abort deadline in milliseconds (default: 5000)
    #[arg(long, env = "TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Upper bound on observed latency in milliseconds (default: 1000)
    #[arg(long, env = "MAX_LATENCY_MS")]
    max_latency_ms: Option<u64>,

    /// Substring the content-type header must contain
    /// (default: application/json)
    #[arg(long, env = "EXPECT_CONTENT_TYPE")]
    expect_content_type: Option<String>,

    /// Also verify the endpoint enforces authentication
    #[arg(long, env = "CHECK_AUTH")]
    check_auth: bool,

    /// Authenticated endpoint probed by the auth verification
    #[arg(long, env = "AUTH_URL")]
    auth_url: Option<String>,

    /// Bearer credential for the authorized probe
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match HealthCheckConfig::resolve(RawConfig {
        target_url: cli.url,
        expected_field: cli.expect_field,
        timeout_ms: cli.timeout_ms,
        max_latency_ms: cli.max_latency_ms,
        expected_content_type: cli.expect_content_type,
        auth_enabled: cli.check_auth,
        auth_url: cli.auth_url,
        auth_token: cli.auth_token,
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            std::process::exit(2);
        }
    };

    tracing::info!(
        url = %config.target_url,
        timeout_ms = config.timeout_ms,
        max_latency_ms = config.max_latency_ms,
        auth = config.auth_enabled,
        "starting health check"
    );

    let executor = ProbeExecutor::new(&config)?;
    let attempt = executor.execute(&config.target_url, &[]).await;
    let outcome = AssertionPipeline::new().evaluate(&attempt, &config);

    // The first failing stage is terminal: auth verification only runs
    // once the primary endpoint has passed.
    let auth = if outcome.passed && config.auth_enabled {
        Some(AuthVerifier::new(&executor).verify(&config).await)
    } else {
        None
    };

    let report = RunReport::aggregate(&config, outcome, auth);

    println!("{}", report.render(cli.format)?);

    if !report.is_success() {
        if let Some(cause) = report.failure_cause() {
            eprintln!("health check failed: {}", cause);
        }
        std::process::exit(1);
    }

    Ok(())
}
