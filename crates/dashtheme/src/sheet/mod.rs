//! Parsed stylesheets.
//!
//! A [`Stylesheet`] is the raw result of parsing theme source: custom
//! property definitions found in `:root` blocks, the ordered list of style
//! rules, and diagnostics for anything that was skipped. It has not been
//! checked against a token table yet; [`Theme`](crate::Theme) does that.
//!
//! # Error recovery
//!
//! Parsing follows stylesheet error recovery: a malformed rule or declaration is
//! skipped, logged with `tracing::warn!`, and recorded as a [`Diagnostic`].
//! Two classes of problems are not recoverable:
//!
//! - An invalid literal (a bad hex color, an unknown unit): load aborts.
//! - Any malformed construct when strict syntax is enabled.
//!
//! Unsupported selectors (combinators, attribute selectors) and at-rules other
//! than `@media (prefers-color-scheme: ...)` are always skipped.

mod parser;

use std::fmt;

use cssparser::{BasicParseErrorKind, ParseError, ParseErrorKind};

use crate::error::ThemeError;
use crate::selector::SelectorList;
use crate::style::PropertyValue;
use crate::theme::ColorMode;

pub use parser::parse_stylesheet;

/// A single `property: value` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: PropertyValue,
    pub important: bool,
}

/// A style rule: selectors and their declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selectors: SelectorList,
    pub declarations: Vec<Declaration>,
    /// Position of the rule in the sheet, used as the cascade tie-breaker.
    pub index: usize,
    /// Color mode the rule is restricted to, from an enclosing `@media` block.
    pub mode: Option<ColorMode>,
}

impl Rule {
    pub fn applies_in(&self, mode: ColorMode) -> bool {
        self.mode.map_or(true, |m| m == mode)
    }
}

/// A custom property declared in a `:root` block.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDeclaration {
    /// Token name without the leading `--`.
    pub name: String,
    pub value: PropertyValue,
    pub mode: Option<ColorMode>,
}

/// Something the parser skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    pub message: String,
    /// The skipped source text.
    pub source: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Tokens, rules and diagnostics parsed from theme source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub tokens: Vec<TokenDeclaration>,
    pub rules: Vec<Rule>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Stylesheet {
    /// Appends another sheet, keeping `other`'s rules after this sheet's rules
    /// in cascade order.
    pub fn append(&mut self, other: Stylesheet) {
        let offset = self.rules.iter().map(|r| r.index + 1).max().unwrap_or(0);
        self.tokens.extend(other.tokens);
        self.rules.extend(other.rules.into_iter().map(|mut rule| {
            rule.index += offset;
            rule
        }));
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Custom parse errors raised while reading stylesheets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    #[error("invalid value '{value}' for '{property}': {reason}")]
    InvalidLiteral {
        property: String,
        value: String,
        reason: String,
    },
    #[error("{0}")]
    InvalidValue(String),
    #[error("unsupported selector '{0}'")]
    UnsupportedSelector(String),
    #[error("unsupported at-rule '@{0}'")]
    UnsupportedAtRule(String),
}

impl SheetError {
    /// Whether this error must abort the load regardless of strictness.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(self, SheetError::InvalidLiteral { .. })
    }

    /// Whether this error is skipped even in strict mode.
    pub(crate) fn is_unsupported(&self) -> bool {
        matches!(
            self,
            SheetError::UnsupportedSelector(_) | SheetError::UnsupportedAtRule(_)
        )
    }
}

pub(crate) fn describe_error_kind(kind: &ParseErrorKind<'_, SheetError>) -> String {
    match kind {
        ParseErrorKind::Custom(err) => err.to_string(),
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("unexpected token {:?}", token)
        }
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
            "unexpected end of input".to_string()
        }
        ParseErrorKind::Basic(BasicParseErrorKind::AtRuleInvalid(name)) => {
            format!("invalid @{} rule", &**name)
        }
        ParseErrorKind::Basic(BasicParseErrorKind::AtRuleBodyInvalid) => {
            "invalid at-rule body".to_string()
        }
        ParseErrorKind::Basic(BasicParseErrorKind::QualifiedRuleInvalid) => {
            "invalid rule".to_string()
        }
        #[allow(unreachable_patterns)]
        _ => "invalid syntax".to_string(),
    }
}

pub(crate) fn diagnostic_from(err: &ParseError<'_, SheetError>, source: &str) -> Diagnostic {
    Diagnostic {
        line: err.location.line + 1,
        column: err.location.column,
        message: describe_error_kind(&err.kind),
        source: source.trim().to_string(),
    }
}

pub(crate) fn into_theme_error(err: ParseError<'_, SheetError>) -> ThemeError {
    let location = err.location;
    match err.kind {
        ParseErrorKind::Custom(SheetError::InvalidLiteral {
            property,
            value,
            reason,
        }) => ThemeError::InvalidLiteral {
            property,
            value,
            reason,
        },
        kind => ThemeError::Syntax {
            line: location.line + 1,
            column: location.column,
            message: describe_error_kind(&kind),
        },
    }
}
