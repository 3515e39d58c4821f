//! Loaded themes and cascade resolution.
//!
//! A [`Theme`] is compiled once per color mode: tokens are expanded, every
//! `var()` reference is checked and substituted, and the surviving rules are
//! kept in source order. Resolution then only has to match selectors and run
//! the cascade.
//!
//! # Color modes
//!
//! Rules and tokens inside `@media (prefers-color-scheme: dark)` apply only in
//! [`ColorMode::Dark`] (likewise for `light`). Which mode [`Theme::resolve`]
//! uses follows [`ThemeConfig::mode`](crate::ThemeConfig), falling back to
//! [`detect_color_mode`] when set to `auto`.

mod cascade;
mod handle;
mod mode;
#[allow(clippy::module_inception)]
mod theme;
mod validate;

pub use handle::ThemeHandle;
pub use mode::{detect_color_mode, set_mode_detector, ColorMode};
pub use theme::{Theme, ThemeBuilder};
pub use validate::validate_rules;
