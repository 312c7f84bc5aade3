use std::path::Path;

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt::MakeWriter, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Install the global tracing subscriber
///
/// Console output plus daily rotating files per level, e.g.
/// `logs/info.log.2024-12-22`, `logs/error.log.2024-12-22`.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init(log_dir: impl AsRef<Path>) -> std::io::Result<()> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)?;

    let env_filter = env_filter("info");

    let info_file = tracing_appender::rolling::daily(log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .try_init()
        .map_err(std::io::Error::other)
}

/// Install a stderr-only subscriber for the `jobs` client commands
///
/// Stdout stays reserved for command output and no log files are created.
/// `RUST_LOG` overrides the default `warn` filter.
pub fn init_cli() -> std::io::Result<()> {
    cli_subscriber(env_filter("warn"), std::io::stderr)
        .try_init()
        .map_err(std::io::Error::other)
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

fn cli_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false),
    )
}
