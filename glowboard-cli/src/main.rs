//! # Glowboard CLI
//!
//! Batch correction, collision checks and command replay for layout
//! documents.

use std::process::ExitCode;

use clap::Parser;
use glowboard_cli::{run, CliArgs, CliConfig, RunStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code when the resulting layout still has colliding elements.
const EXIT_COLLISIONS: u8 = 2;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,glowboard_core=debug"));

    // Reports go to stdout, logs to stderr
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let config = CliConfig::from(CliArgs::parse());
    tracing::debug!(command = ?config.command, "Starting glowboard");

    let mut stdout = std::io::stdout().lock();
    let status = run(&config, &mut stdout)?;

    Ok(match status {
        RunStatus::Clean => ExitCode::SUCCESS,
        RunStatus::CollisionsFound => ExitCode::from(EXIT_COLLISIONS),
    })
}
