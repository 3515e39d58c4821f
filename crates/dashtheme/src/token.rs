//! Design token tables.
//!
//! Tokens are named values (`background-color`, `tab-border`) that rules
//! reference through `var()`. Names are stored without the leading `--`, so
//! `var(--tab-border)` and `var(tab-border)` name the same token.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ThemeError, ThemeResult};
use crate::style::{PropertyValue, TokenRef};

/// A table of design tokens keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTable {
    entries: BTreeMap<String, PropertyValue>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads tokens from a YAML mapping of names to values.
    ///
    /// ```rust
    /// use dashtheme::TokenTable;
    ///
    /// let tokens = TokenTable::from_yaml("background-color: '#181818'\ngap: 4px\n").unwrap();
    /// assert_eq!(tokens.get("--gap").unwrap().to_string(), "4px");
    /// ```
    pub fn from_yaml(text: &str) -> ThemeResult<Self> {
        let raw: BTreeMap<String, serde_yaml::Value> =
            serde_yaml::from_str(text).map_err(|e| ThemeError::Config(e.to_string()))?;
        let mut pairs = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let text = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                other => {
                    return Err(ThemeError::Config(format!(
                        "token '{}' must be a string or number, found {:?}",
                        name, other
                    )))
                }
            };
            pairs.push((name, text));
        }
        load_tokens(pairs)
    }

    pub fn from_yaml_path(path: impl AsRef<Path>) -> ThemeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
        Self::from_yaml(&text)
    }

    /// Inserts a token, replacing any previous value under the same name.
    pub fn insert(&mut self, name: &str, value: PropertyValue) -> Option<PropertyValue> {
        self.entries.insert(normalize_name(name).to_string(), value)
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merges `other` into this table; `other` wins on conflicts.
    pub fn extend(&mut self, other: TokenTable) {
        self.entries.extend(other.entries);
    }

    /// Substitutes token references inside token values.
    ///
    /// Returns the expanded table and the references that named no token.
    /// Unknown references stay in the expanded values as written.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::TokenCycle`] if token values reference each other
    /// in a loop.
    pub(crate) fn expand(&self) -> ThemeResult<(TokenTable, Vec<String>)> {
        let mut expander = Expander {
            raw: &self.entries,
            done: BTreeMap::new(),
            stack: Vec::new(),
            missing: Vec::new(),
        };
        for name in self.entries.keys() {
            expander.expand(name)?;
        }
        Ok((
            TokenTable {
                entries: expander.done,
            },
            expander.missing,
        ))
    }
}

struct Expander<'a> {
    raw: &'a BTreeMap<String, PropertyValue>,
    done: BTreeMap<String, PropertyValue>,
    stack: Vec<String>,
    missing: Vec<String>,
}

impl<'a> Expander<'a> {
    fn expand(&mut self, name: &str) -> ThemeResult<Option<PropertyValue>> {
        if let Some(value) = self.done.get(name) {
            return Ok(Some(value.clone()));
        }
        let raw = self.raw;
        let Some(value) = raw.get(name) else {
            return Ok(None);
        };
        if let Some(pos) = self.stack.iter().position(|n| n == name) {
            let mut path = self.stack[pos..].to_vec();
            path.push(name.to_string());
            return Err(ThemeError::TokenCycle { path });
        }

        self.stack.push(name.to_string());
        let expanded = value.map_refs::<ThemeError>(&mut |reference: &TokenRef| {
            let found = self.expand(reference.name())?;
            if found.is_none() && reference.fallback().is_none() {
                push_unique(&mut self.missing, reference.written());
            }
            Ok(found)
        })?;
        self.stack.pop();

        self.done.insert(name.to_string(), expanded.clone());
        Ok(Some(expanded))
    }
}

pub(crate) fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

fn normalize_name(name: &str) -> &str {
    name.strip_prefix("--").unwrap_or(name)
}

/// Builds a token table from name/value pairs.
///
/// Each value is parsed and validated as a literal; token names may be given
/// with or without the leading `--`.
///
/// ```rust
/// use dashtheme::load_tokens;
///
/// let tokens = load_tokens([
///     ("background-color", "#181818"),
///     ("--tab-border", "#007bff"),
/// ]).unwrap();
/// assert!(tokens.contains("tab-border"));
/// ```
///
/// # Errors
///
/// Returns [`ThemeError::InvalidLiteral`] if a value is not a valid literal,
/// and [`ThemeError::Config`] for an empty or malformed token name.
pub fn load_tokens<I, K, V>(definitions: I) -> ThemeResult<TokenTable>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut table = TokenTable::new();
    for (name, value) in definitions {
        let name = name.as_ref().trim();
        let normalized = normalize_name(name);
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(ThemeError::Config(format!("invalid token name '{}'", name)));
        }
        let value = PropertyValue::parse(name, value.as_ref())?;
        table.insert(normalized, value);
    }
    Ok(table)
}
