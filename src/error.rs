//! Error types for match setup and configuration loading
//!
//! Nothing inside a running tick returns an error; these cover construction
//! (fail fast on bad derived constants) and I/O at the edges.

/// Errors raised while building or configuring a match
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("a match needs at least 2 spinners, got {count}")]
    TooFewSpinners { count: usize },

    #[error("invalid derived constant for {ticker}: {field} = {value}")]
    InvalidConstants {
        ticker: String,
        field: &'static str,
        value: f32,
    },

    #[error("invalid setting {field} = {value}")]
    InvalidSettings { field: &'static str, value: f32 },

    #[error("rematch requested before any match was started")]
    NoRoster,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
