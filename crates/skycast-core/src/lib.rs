//! Shared configuration and startup plumbing for Skycast.

pub mod config;
pub mod error;

pub use config::{Config, Units};
pub use error::ConfigError;

/// Initialize tracing for the process.
///
/// Logs go to stderr: stdout is the MCP protocol channel and must carry
/// nothing but newline-delimited JSON.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Skycast core initialized");
}
