//! Routing table construction errors.

use thiserror::Error;

/// Reasons a proxy rule or table is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("invalid prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    #[error("invalid target {target:?} for prefix {prefix:?}: {reason}")]
    InvalidTarget {
        prefix: String,
        target: String,
        reason: String,
    },

    #[error("prefix {0:?} is declared more than once")]
    DuplicatePrefix(String),

    #[error("prefix {shorter:?} is a prefix of {longer:?}")]
    AmbiguousPrefix { shorter: String, longer: String },

    #[error("cannot build upstream URI: {0}")]
    UpstreamUri(String),
}
