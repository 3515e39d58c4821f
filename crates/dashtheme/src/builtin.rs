//! The bundled dashboard theme.

use crate::error::ThemeResult;
use crate::theme::Theme;

/// Source of the bundled dashboard stylesheet.
pub const DASHBOARD_CSS: &str = include_str!("../themes/dashboard.css");

impl Theme {
    /// The bundled dark dashboard theme, with a light variant for
    /// `prefers-color-scheme: light`.
    pub fn dashboard() -> ThemeResult<Theme> {
        Theme::from_css(DASHBOARD_CSS)
    }
}
