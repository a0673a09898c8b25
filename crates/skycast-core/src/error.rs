//! Startup configuration errors.

use thiserror::Error;

/// Errors raised while reading the environment at startup.
///
/// Any of these terminates the process before it serves a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENWEATHER_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("OPENWEATHER_UNITS must be one of metric, imperial, standard (got {0:?})")]
    InvalidUnits(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_variable() {
        assert!(ConfigError::MissingApiKey
            .to_string()
            .contains("OPENWEATHER_API_KEY"));
        assert!(ConfigError::InvalidUnits("x".into())
            .to_string()
            .contains("OPENWEATHER_UNITS"));
    }
}
