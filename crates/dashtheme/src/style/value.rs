//! Declared property values.
//!
//! A [`PropertyValue`] is the parsed right-hand side of a declaration: a
//! sequence of literals, functions, separators and token references. Values
//! keep enough of their source shape (whitespace between parts, literal text)
//! to render back to declaration text once references are substituted.

use std::fmt;

use cssparser::{BasicParseErrorKind, ParseError, Parser, ParserInput, Token};

use super::literal::{is_color_function, is_dimension_unit, Color, Literal, LiteralKind, Numeric};
use crate::error::{ThemeError, ThemeResult};
use crate::sheet::SheetError;

/// A reference to a design token, written `var(--name)` or `var(name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRef {
    name: String,
    written: String,
    fallback: Option<PropertyValue>,
}

impl TokenRef {
    /// Token name without the leading `--`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as written inside `var()`.
    pub fn written(&self) -> &str {
        &self.written
    }

    pub fn fallback(&self) -> Option<&PropertyValue> {
        self.fallback.as_ref()
    }
}

/// One part of a property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Literal(Literal),
    /// A function call. Parenthesised groups are functions with an empty name.
    Function { name: String, args: PropertyValue },
    Reference(TokenRef),
    /// A `[...]` group, such as grid line names.
    Brackets(PropertyValue),
    /// `,` `/` or an arithmetic operator.
    Separator(char),
}

#[derive(Debug, Clone, PartialEq)]
struct Part {
    component: Component,
    space_before: bool,
}

/// The parsed value of a declaration or token.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyValue {
    parts: Vec<Part>,
}

impl PropertyValue {
    /// Parses a standalone value such as `1px solid var(--tab-border)`.
    ///
    /// `name` is the property or token the value belongs to and only appears
    /// in error messages.
    pub fn parse(name: &str, text: &str) -> ThemeResult<Self> {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        let parsed = parser.parse_entirely(parse_declaration_value);
        match parsed {
            Ok((_, true)) => Err(ThemeError::InvalidLiteral {
                property: name.to_string(),
                value: text.trim().to_string(),
                reason: "!important is only allowed in declarations".to_string(),
            }),
            Ok((value, false)) => Ok(value),
            Err(err) => Err(ThemeError::InvalidLiteral {
                property: name.to_string(),
                value: text.trim().to_string(),
                reason: describe_value_error(&err),
            }),
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.parts.iter().map(|part| &part.component)
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Visits every token reference, including those nested in functions and
    /// fallbacks.
    pub fn references(&self) -> Vec<&TokenRef> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a TokenRef>) {
        for part in &self.parts {
            match &part.component {
                Component::Reference(reference) => {
                    found.push(reference);
                    if let Some(fallback) = &reference.fallback {
                        fallback.collect_references(found);
                    }
                }
                Component::Function { args, .. } | Component::Brackets(args) => {
                    args.collect_references(found)
                }
                Component::Literal(_) | Component::Separator(_) => {}
            }
        }
    }

    /// Rebuilds the value with token references replaced.
    ///
    /// `lookup` returns the replacement for a reference, or `None` when the
    /// token is unknown. Unknown references fall back to their `var()`
    /// fallback if one exists and are otherwise kept as written.
    pub(crate) fn map_refs<E>(
        &self,
        lookup: &mut dyn FnMut(&TokenRef) -> Result<Option<PropertyValue>, E>,
    ) -> Result<PropertyValue, E> {
        let mut parts = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            match &part.component {
                Component::Reference(reference) => {
                    let replacement = match lookup(reference)? {
                        Some(value) => Some(value),
                        None => match &reference.fallback {
                            Some(fallback) => Some(fallback.map_refs(lookup)?),
                            None => None,
                        },
                    };
                    match replacement {
                        Some(value) => splice(&mut parts, value, part.space_before),
                        None => parts.push(part.clone()),
                    }
                }
                Component::Function { name, args } => parts.push(Part {
                    component: Component::Function {
                        name: name.clone(),
                        args: args.map_refs(lookup)?,
                    },
                    space_before: part.space_before,
                }),
                Component::Brackets(args) => parts.push(Part {
                    component: Component::Brackets(args.map_refs(lookup)?),
                    space_before: part.space_before,
                }),
                Component::Literal(_) | Component::Separator(_) => parts.push(part.clone()),
            }
        }
        Ok(PropertyValue { parts })
    }

    fn push(&mut self, component: Component, space_before: bool) {
        self.parts.push(Part {
            component,
            space_before: space_before && !self.parts.is_empty(),
        });
    }
}

fn splice(parts: &mut Vec<Part>, value: PropertyValue, space_before: bool) {
    let mut inserted = value.parts.into_iter();
    if let Some(mut first) = inserted.next() {
        first.space_before = space_before && !parts.is_empty();
        parts.push(first);
        parts.extend(inserted);
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            if part.space_before {
                f.write_str(" ")?;
            }
            match &part.component {
                Component::Literal(literal) => write!(f, "{}", literal)?,
                Component::Function { name, args } => write!(f, "{}({})", name, args)?,
                Component::Brackets(args) => write!(f, "[{}]", args)?,
                Component::Reference(reference) => {
                    write!(f, "var({}", reference.written)?;
                    if let Some(fallback) = &reference.fallback {
                        write!(f, ", {}", fallback)?;
                    }
                    f.write_str(")")?;
                }
                Component::Separator(c) => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}

/// Parses a declaration value, returning it and whether it was `!important`.
///
/// Consumes the whole input.
pub(crate) fn parse_declaration_value<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<(PropertyValue, bool), ParseError<'i, SheetError>> {
    let value = parse_components(input, true)?;
    if value.is_empty() {
        return Err(input.new_error(BasicParseErrorKind::EndOfInput));
    }
    let important = input.try_parse(cssparser::parse_important).is_ok();
    Ok((value, important))
}

fn parse_components<'i, 't>(
    input: &mut Parser<'i, 't>,
    stop_at_important: bool,
) -> Result<PropertyValue, ParseError<'i, SheetError>> {
    let mut value = PropertyValue::default();
    let mut space_before = false;
    loop {
        let state = input.state();
        let start = input.position();
        let token = match input.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let component = match token {
            Token::WhiteSpace(_) => {
                space_before = true;
                continue;
            }
            Token::Delim('!') if stop_at_important => {
                input.reset(&state);
                break;
            }
            Token::Ident(ident) => {
                let kind = match Color::named(&ident) {
                    Some(color) => LiteralKind::Color(color),
                    None => LiteralKind::Keyword(ident.to_string()),
                };
                Component::Literal(Literal::new(kind, input.slice_from(start)))
            }
            Token::Hash(digits) | Token::IDHash(digits) => match Color::from_hex(&digits) {
                Some(color) => {
                    Component::Literal(Literal::new(LiteralKind::Color(color), input.slice_from(start)))
                }
                None => {
                    return Err(input.new_custom_error(SheetError::InvalidValue(format!(
                        "'#{}' is not a valid hex color",
                        &*digits
                    ))))
                }
            },
            Token::Number { value: n, .. } => {
                Component::Literal(Literal::new(LiteralKind::Number(n), input.slice_from(start)))
            }
            Token::Percentage { unit_value, .. } => Component::Literal(Literal::new(
                LiteralKind::Percentage(unit_value),
                input.slice_from(start),
            )),
            Token::Dimension { value: n, unit, .. } => {
                if !is_dimension_unit(&unit) {
                    return Err(input.new_custom_error(SheetError::InvalidValue(format!(
                        "unknown unit '{}'",
                        &*unit
                    ))));
                }
                Component::Literal(Literal::new(
                    LiteralKind::Dimension {
                        value: n,
                        unit: unit.to_ascii_lowercase(),
                    },
                    input.slice_from(start),
                ))
            }
            Token::QuotedString(text) => Component::Literal(Literal::new(
                LiteralKind::String(text.to_string()),
                input.slice_from(start),
            )),
            Token::UnquotedUrl(url) => Component::Literal(Literal::new(
                LiteralKind::Url(url.to_string()),
                input.slice_from(start),
            )),
            Token::Comma => Component::Separator(','),
            Token::Delim(c @ ('/' | '+' | '-' | '*')) => Component::Separator(c),
            Token::Function(name) if name.eq_ignore_ascii_case("var") => {
                Component::Reference(input.parse_nested_block(parse_reference)?)
            }
            Token::Function(name) => {
                let args = input.parse_nested_block(|block| parse_components(block, false))?;
                if is_color_function(&name) && args.references().is_empty() {
                    if let Err(reason) = Color::from_function(&name, &numeric_args(&args)) {
                        return Err(input.new_custom_error(SheetError::InvalidValue(reason)));
                    }
                }
                Component::Function {
                    name: name.to_string(),
                    args,
                }
            }
            Token::ParenthesisBlock => Component::Function {
                name: String::new(),
                args: input.parse_nested_block(|block| parse_components(block, false))?,
            },
            Token::SquareBracketBlock => Component::Brackets(
                input.parse_nested_block(|block| parse_components(block, false))?,
            ),
            other => return Err(input.new_unexpected_token_error(other)),
        };
        value.push(component, space_before);
        space_before = false;
    }
    Ok(value)
}

fn parse_reference<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<TokenRef, ParseError<'i, SheetError>> {
    let written = input.expect_ident_cloned()?.to_string();
    let name = written.strip_prefix("--").unwrap_or(&written).to_string();
    if name.is_empty() {
        return Err(input.new_custom_error(SheetError::InvalidValue(
            "empty token name in var()".to_string(),
        )));
    }
    let fallback = if input.try_parse(|i| i.expect_comma()).is_ok() {
        Some(parse_components(input, false)?)
    } else {
        None
    };
    Ok(TokenRef {
        name,
        written,
        fallback,
    })
}

fn numeric_args(args: &PropertyValue) -> Vec<Numeric> {
    args.components()
        .filter_map(|component| match component {
            Component::Literal(literal) => match literal.kind() {
                LiteralKind::Number(n) => Some(Numeric::Number(*n)),
                LiteralKind::Percentage(p) => Some(Numeric::Percentage(*p)),
                LiteralKind::Dimension { value, unit } => {
                    Some(Numeric::Dimension(*value, unit.clone()))
                }
                _ => None,
            },
            _ => None,
        })
        .collect()
}

pub(crate) fn describe_value_error(err: &ParseError<'_, SheetError>) -> String {
    crate::sheet::describe_error_kind(&err.kind)
}
