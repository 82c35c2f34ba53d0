use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Intersection observation unavailable: {0}")]
    ObservationUnavailable(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a request was dropped without effect.
///
/// None of these are errors: they are logged at debug level and reported
/// back to the caller so tests and traces can tell a no-op from a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// The resource the request depends on does not exist yet
    PrematureInvocation,
    /// The request would not change the current state
    RedundantTransition,
    /// The anchor could not be resolved to a document offset
    UnknownAnchor,
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Ignored::PrematureInvocation => "premature invocation",
            Ignored::RedundantTransition => "redundant transition",
            Ignored::UnknownAnchor => "unknown anchor",
        };
        f.write_str(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_their_cause() {
        let err = Error::UnknownSection("pricing".into());
        assert_eq!(err.to_string(), "Unknown section: pricing");

        let err = Error::ObservationUnavailable("no layout".into());
        assert_eq!(err.to_string(), "Intersection observation unavailable: no layout");

        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_ignored_display() {
        assert_eq!(Ignored::PrematureInvocation.to_string(), "premature invocation");
        assert_eq!(Ignored::UnknownAnchor.to_string(), "unknown anchor");
    }
}
