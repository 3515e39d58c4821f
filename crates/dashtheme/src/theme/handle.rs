//! Shared, reloadable access to the active theme.
//!
//! Readers take a cheap [`Arc`] snapshot and resolve against it without
//! holding any lock. A reload builds the replacement theme completely before
//! swapping it in, so readers see either the old theme or the new one and a
//! failed reload leaves the old theme active.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use super::mode::ColorMode;
use super::theme::Theme;
use crate::error::{ThemeError, ThemeResult};

/// Holds the active [`Theme`] for concurrent readers.
///
/// ```rust
/// use dashtheme::{Theme, ThemeHandle};
///
/// let handle = ThemeHandle::new(Theme::from_css(".card { color: red; }").unwrap());
/// let before = handle.current();
///
/// handle.reload_from_str(".card { color: blue; }").unwrap();
/// assert!(handle.reload_from_str(".card { color: #zz; }").is_err());
///
/// assert_eq!(before.resolve(["card"], None)["color"], "red");
/// assert_eq!(handle.resolve(["card"], None)["color"], "blue");
/// ```
#[derive(Debug)]
pub struct ThemeHandle {
    current: RwLock<Arc<Theme>>,
}

impl ThemeHandle {
    pub fn new(theme: Theme) -> Self {
        Self {
            current: RwLock::new(Arc::new(theme)),
        }
    }

    /// Snapshot of the active theme.
    pub fn current(&self) -> Arc<Theme> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Installs `theme`, returning the one it replaced.
    pub fn replace(&self, theme: Theme) -> Arc<Theme> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, Arc::new(theme))
    }

    /// Builds a replacement from the active theme and installs it.
    ///
    /// The build runs outside the lock. On error nothing changes.
    pub fn reload_with<F>(&self, build: F) -> ThemeResult<Arc<Theme>>
    where
        F: FnOnce(&Theme) -> ThemeResult<Theme>,
    {
        let current = self.current();
        match build(&current) {
            Ok(theme) => {
                let theme = Arc::new(theme);
                let mut guard = self
                    .current
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                *guard = Arc::clone(&theme);
                drop(guard);
                info!(
                    tokens = theme.tokens(ColorMode::Light).len(),
                    skipped = theme.diagnostics().len(),
                    "theme reloaded"
                );
                Ok(theme)
            }
            Err(err) => {
                warn!(error = %err, "theme reload failed, keeping previous theme");
                Err(err)
            }
        }
    }

    /// Reloads from stylesheet source, keeping the active tokens and config.
    pub fn reload_from_str(&self, css: &str) -> ThemeResult<Arc<Theme>> {
        self.reload_with(|current| current.rebuild(css))
    }

    /// Reloads from a stylesheet file, keeping the active tokens and config.
    pub fn reload_from_path(&self, path: impl AsRef<Path>) -> ThemeResult<Arc<Theme>> {
        let path = path.as_ref();
        self.reload_with(|current| {
            let css = std::fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
            current.rebuild(&css)
        })
    }

    /// Resolves against the active theme.
    pub fn resolve<I, S>(&self, classes: I, state: Option<&str>) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current().resolve(classes, state)
    }
}

impl From<Theme> for ThemeHandle {
    fn from(theme: Theme) -> Self {
        Self::new(theme)
    }
}
