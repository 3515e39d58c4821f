//! # Dashtheme - Themes for Dashboard Interfaces
//!
//! Dashtheme loads a dashboard theme written as a small stylesheet and answers
//! the one question a UI needs at render time: which property values apply to
//! an element with these classes, in this state?
//!
//! A theme has two inputs:
//!
//! - **Design tokens**: named values (`background-color: #181818`) supplied
//!   from code, YAML, or `:root` custom properties.
//! - **Style rules**: selectors with declarations that use literals and
//!   `var()` references to tokens.
//!
//! ## Quick Start
//!
//! ```rust
//! use dashtheme::{load_tokens, ElementQuery, ColorMode, Theme};
//!
//! let tokens = load_tokens([
//!     ("background-color", "#181818"),
//!     ("tab-border", "#007bff"),
//! ]).unwrap();
//!
//! let theme = Theme::builder()
//!     .tokens(tokens)
//!     .stylesheet(r#"
//!         .dash-tab { background-color: var(background-color); border: 1px solid var(tab-border); }
//!         .dash-tab:hover { border-color: white; }
//!     "#)
//!     .build()
//!     .unwrap();
//!
//! let hovered = ElementQuery::new().class("dash-tab").state("hover");
//! let props = theme.resolve_in(&hovered, ColorMode::Dark);
//! assert_eq!(props["background-color"], "#181818");
//! assert_eq!(props["border"], "1px solid #007bff");
//! assert_eq!(props["border-color"], "white");
//! ```
//!
//! ## Guarantees
//!
//! - Loading validates everything up front: malformed literals, undefined
//!   token references and token cycles fail the load with a [`ThemeError`].
//! - Resolution is deterministic and never fails. Unmatched elements resolve
//!   to an empty map.
//! - [`ThemeHandle`] swaps whole themes atomically. Readers never see a
//!   partially loaded theme, and a failed reload keeps the previous one.
//!
//! ## Cascade
//!
//! For each property the winning declaration is the one with, in order:
//! `!important` over normal, higher [`Specificity`], later rule, later
//! position within the rule.
//!
//! ## Modules
//!
//! - [`style`]: Literal and value parsing
//! - [`selector`]: Compound selectors and element queries
//! - [`token`]: Token tables
//! - [`sheet`]: Stylesheet parsing with error recovery
//! - [`theme`]: Compiled themes, the cascade and reloading
//! - [`config`]: Loading options

pub mod builtin;
pub mod config;
pub mod error;
pub mod selector;
pub mod sheet;
pub mod style;
pub mod theme;
pub mod token;

pub use config::{ModePreference, ThemeConfig, UnresolvedPolicy};
pub use error::{ThemeError, ThemeResult};
pub use selector::{ElementQuery, Selector, SelectorList, Specificity};
pub use sheet::{
    parse_stylesheet, Declaration, Diagnostic, Rule, SheetError, Stylesheet, TokenDeclaration,
};
pub use style::{Color, Component, Literal, LiteralKind, PropertyValue, TokenRef};
pub use theme::{
    detect_color_mode, set_mode_detector, validate_rules, ColorMode, Theme, ThemeBuilder,
    ThemeHandle,
};
pub use token::{load_tokens, TokenTable};
