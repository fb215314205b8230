//! Error types for the `triage-models` crate.
//!
//! All fallible parsers in this crate return variants of [`ModelError`].

/// Errors produced when parsing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A ticket status was not one of `open`, `resolved` or `deleted`.
    #[error("invalid ticket status \"{value}\"")]
    InvalidStatus {
        /// The value that failed validation.
        value: String,
    },

    /// A dashboard location could not be parsed.
    #[error("invalid dashboard location \"{value}\": {reason}")]
    InvalidLocation {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A timestamp was neither RFC 3339 nor a naive ISO-8601 date-time.
    #[error("invalid timestamp \"{value}\"")]
    InvalidTimestamp {
        /// The value that failed validation.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_status() {
        let err = ModelError::InvalidStatus {
            value: "archived".into(),
        };
        assert_eq!(err.to_string(), "invalid ticket status \"archived\"");
    }

    #[test]
    fn error_display_location() {
        let err = ModelError::InvalidLocation {
            value: "?tab=open".into(),
            reason: "missing `page`".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid dashboard location \"?tab=open\": missing `page`"
        );
    }

    #[test]
    fn error_display_timestamp() {
        let err = ModelError::InvalidTimestamp {
            value: "yesterday".into(),
        };
        assert_eq!(err.to_string(), "invalid timestamp \"yesterday\"");
    }
}
