//! # Structured Logging Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//!
//! The library itself only emits `tracing` events; applications and tests
//! that want to see them call [`init_structured_logging`] once.
//!
//! - `RUST_LOG` wins when set
//! - otherwise the level follows `CONFIGURED_BUILDER_ENV` (test and
//!   development log at debug, production at info)
//! - `CONFIGURED_BUILDER_LOG_FORMAT=json` switches to JSON lines

use crate::state_machine::BuildState;
use chrono::Utc;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let json = use_json_format();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let result = if json {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_filter(filter),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_ansi(std::io::stdout().is_terminal())
                        .with_filter(filter),
                )
                .try_init()
        };

        // A global subscriber may already be installed by the host application
        if result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            json = json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("CONFIGURED_BUILDER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn use_json_format() -> bool {
    std::env::var("CONFIGURED_BUILDER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log a lifecycle state change of a builder
pub fn log_lifecycle_transition(builder: &str, from: BuildState, to: BuildState) {
    tracing::debug!(
        builder = %builder,
        from = %from,
        to = %to,
        timestamp = %Utc::now().to_rfc3339(),
        "LIFECYCLE_TRANSITION"
    );
}

/// Log a configurer registry mutation
pub fn log_registry_operation(
    builder: &str,
    operation: &str,
    configurer: &str,
    state: BuildState,
    details: Option<&str>,
) {
    tracing::debug!(
        builder = %builder,
        operation = %operation,
        configurer = %configurer,
        state = %state,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "REGISTRY_OPERATION"
    );
}
