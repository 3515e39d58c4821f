//! Theme loading options.
//!
//! [`ThemeConfig`] is plain data that deserializes from YAML, so a host
//! application can embed it in its own configuration file:
//!
//! ```yaml
//! strict-syntax: true
//! unresolved: drop-property
//! mode: dark
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{ThemeError, ThemeResult};
use crate::theme::ColorMode;

/// What to do with declarations that reference undefined tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Fail the load with [`ThemeError::UnresolvedToken`].
    #[default]
    Fail,
    /// Drop the offending declarations and log a warning for each.
    DropProperty,
}

/// Which color mode a theme resolves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModePreference {
    /// Ask the mode detector (the OS setting by default).
    #[default]
    Auto,
    Light,
    Dark,
}

impl ModePreference {
    pub fn fixed(self) -> Option<ColorMode> {
        match self {
            ModePreference::Auto => None,
            ModePreference::Light => Some(ColorMode::Light),
            ModePreference::Dark => Some(ColorMode::Dark),
        }
    }
}

/// Options controlling how a theme is loaded and resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ThemeConfig {
    /// Fail on malformed rules instead of skipping them.
    pub strict_syntax: bool,
    pub unresolved: UnresolvedPolicy,
    pub mode: ModePreference,
}

impl ThemeConfig {
    pub fn from_yaml(text: &str) -> ThemeResult<Self> {
        serde_yaml::from_str(text).map_err(|e| ThemeError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ThemeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
        Self::from_yaml(&text)
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_syntax = strict;
        self
    }

    pub fn unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    pub fn mode(mut self, mode: ModePreference) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ThemeConfig::default();
        assert!(!config.strict_syntax);
        assert_eq!(config.unresolved, UnresolvedPolicy::Fail);
        assert_eq!(config.mode, ModePreference::Auto);
    }

    #[test]
    fn test_from_yaml_full() {
        let config =
            ThemeConfig::from_yaml("strict-syntax: true\nunresolved: drop-property\nmode: dark\n")
                .unwrap();
        assert!(config.strict_syntax);
        assert_eq!(config.unresolved, UnresolvedPolicy::DropProperty);
        assert_eq!(config.mode.fixed(), Some(ColorMode::Dark));
    }

    #[test]
    fn test_from_yaml_partial_uses_defaults() {
        let config = ThemeConfig::from_yaml("mode: light\n").unwrap();
        assert!(!config.strict_syntax);
        assert_eq!(config.mode, ModePreference::Light);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        assert!(matches!(
            ThemeConfig::from_yaml("colour: dark\n"),
            Err(ThemeError::Config(_))
        ));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_policy() {
        assert!(ThemeConfig::from_yaml("unresolved: shrug\n").is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = ThemeConfig::default()
            .strict(true)
            .unresolved(UnresolvedPolicy::DropProperty)
            .mode(ModePreference::Light);
        assert!(config.strict_syntax);
        assert_eq!(config.unresolved, UnresolvedPolicy::DropProperty);
        assert_eq!(config.mode.fixed(), Some(ColorMode::Light));
    }
}
