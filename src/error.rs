//! Strategy error types

use thiserror::Error;

/// Errors a strategy surfaces to its host.
///
/// Missing or short price series are never errors; they only drop the
/// ticker from ranking.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("malformed timestamp '{input}': expected YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or RFC 3339")]
    MalformedTimestamp { input: String },

    #[error("unknown strategy '{name}'. Available: {available}")]
    UnknownStrategy { name: String, available: String },

    #[error("invalid '{strategy}' config: {source}")]
    InvalidConfig {
        strategy: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
