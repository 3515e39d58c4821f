//! Value system for declarations and tokens.
//!
//! This module provides the styling primitives:
//!
//! - [`PropertyValue`]: A parsed declaration value
//! - [`TokenRef`]: A `var()` reference to a design token
//! - [`Literal`] and [`Color`]: Validated literal values
//!
//! Values may reference tokens, and token values may reference other tokens,
//! so a theme forms a layered pattern where semantic tokens alias palette
//! tokens which carry concrete colors.

pub(crate) mod literal;
pub(crate) mod value;

pub use literal::{Color, Literal, LiteralKind, DIMENSION_UNITS};
pub use value::{Component, PropertyValue, TokenRef};
