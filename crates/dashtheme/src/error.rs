//! Errors raised while loading and validating themes.

use std::path::PathBuf;

/// Error returned when a theme, token table or configuration cannot be loaded.
///
/// Resolution never fails: every variant here is raised at load or
/// validation time, before a [`Theme`](crate::Theme) exists.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// A declared value is not a parseable color, length, or keyword.
    #[error("invalid value '{value}' for '{property}': {reason}")]
    InvalidLiteral {
        property: String,
        value: String,
        reason: String,
    },

    /// One or more token references do not name a defined token.
    #[error("unresolved token reference(s): {}", references.join(", "))]
    UnresolvedToken { references: Vec<String> },

    /// Token values reference each other in a loop.
    #[error("cycle detected in token references: {}", path.join(" -> "))]
    TokenCycle { path: Vec<String> },

    /// The stylesheet is malformed (strict mode only).
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },

    /// A theme or token file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration or token file contents are invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for theme operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

impl ThemeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_token_display_names_references() {
        let err = ThemeError::UnresolvedToken {
            references: vec!["--undefined-token".to_string(), "accent".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("--undefined-token"));
        assert!(msg.contains("accent"));
    }

    #[test]
    fn test_cycle_display() {
        let err = ThemeError::TokenCycle {
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_invalid_literal_display() {
        let err = ThemeError::InvalidLiteral {
            property: "color".to_string(),
            value: "#zz".to_string(),
            reason: "invalid hex color".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("color"));
        assert!(msg.contains("#zz"));
    }
}
