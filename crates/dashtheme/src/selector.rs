//! Selectors, specificity and element matching.
//!
//! Theme rules target single elements, so only compound selectors are
//! supported: an optional type selector (or `*`), ids, classes and
//! pseudo-class states, e.g. `button.dash-tab:hover`. Comma-separated lists
//! of compounds are allowed. Combinators and attribute selectors are
//! rejected with [`SheetError::UnsupportedSelector`].

use std::collections::BTreeSet;
use std::fmt;

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};

use crate::error::ThemeResult;
use crate::sheet::{into_theme_error, SheetError};

/// Selector specificity as `(ids, classes and states, types)`.
///
/// Compared lexicographically, so one id outweighs any number of classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

/// The element a theme is being resolved for.
///
/// ```rust
/// use dashtheme::ElementQuery;
///
/// let query = ElementQuery::new().class("dash-tab").state("hover");
/// assert!(query.has_class("dash-tab"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementQuery {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub state: Option<String>,
}

impl ElementQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from a class set and an optional interaction state.
    pub fn from_classes<I, S>(classes: I, state: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            state: state.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// A compound selector such as `button.dash-tab:hover`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    universal: bool,
    ids: Vec<String>,
    classes: Vec<String>,
    states: Vec<String>,
    root: bool,
}

impl Selector {
    pub fn specificity(&self) -> Specificity {
        Specificity(
            self.ids.len() as u32,
            (self.classes.len() + self.states.len() + usize::from(self.root)) as u32,
            u32::from(self.tag.is_some()),
        )
    }

    /// Whether every component of the selector matches the element.
    pub fn matches(&self, query: &ElementQuery) -> bool {
        let tag_matches = match (&self.tag, &query.tag) {
            (None, _) => true,
            (Some(tag), Some(actual)) => tag.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        };
        let root_matches = !self.root
            || query
                .tag
                .as_deref()
                .is_some_and(|tag| tag.eq_ignore_ascii_case("html"));

        tag_matches
            && root_matches
            && self.ids.iter().all(|id| query.id.as_deref() == Some(id.as_str()))
            && self.classes.iter().all(|class| query.classes.contains(class))
            && self
                .states
                .iter()
                .all(|state| query.state.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(state)))
    }

    /// `:root` or `html` with nothing else.
    fn is_root(&self) -> bool {
        let bare = self.ids.is_empty() && self.classes.is_empty() && self.states.is_empty();
        let html = self
            .tag
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case("html"));
        bare && ((self.root && self.tag.is_none()) || (html && !self.root))
    }

    fn is_empty(&self) -> bool {
        *self == Selector::default()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        } else if self.universal {
            f.write_str("*")?;
        }
        for id in &self.ids {
            write!(f, "#{}", id)?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        if self.root {
            f.write_str(":root")?;
        }
        for state in &self.states {
            write!(f, ":{}", state)?;
        }
        Ok(())
    }
}

/// A comma-separated list of compound selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Selector>,
}

impl SelectorList {
    /// Parses a selector list from text.
    ///
    /// ```rust
    /// use dashtheme::{ElementQuery, SelectorList, Specificity};
    ///
    /// let list = SelectorList::parse_str(".dash-tab:hover, .dash-tab--selected").unwrap();
    /// let query = ElementQuery::new().class("dash-tab").state("hover");
    /// assert_eq!(list.specificity_for(&query), Some(Specificity(0, 2, 0)));
    /// ```
    pub fn parse_str(text: &str) -> ThemeResult<Self> {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        parser.parse_entirely(Self::parse).map_err(into_theme_error)
    }

    /// Parses a selector list, consuming the whole input.
    pub(crate) fn parse<'i, 't>(
        input: &mut Parser<'i, 't>,
    ) -> Result<Self, ParseError<'i, SheetError>> {
        let start = input.position();
        let mut selectors = Vec::new();
        let mut current = Selector::default();
        let mut saw_space = false;

        loop {
            let token = match input.next_including_whitespace() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            match token {
                Token::WhiteSpace(_) => {
                    saw_space = !current.is_empty();
                    continue;
                }
                Token::Comma => {
                    if current.is_empty() {
                        return Err(input.new_unexpected_token_error(Token::Comma));
                    }
                    selectors.push(std::mem::take(&mut current));
                    saw_space = false;
                    continue;
                }
                _ => {}
            }
            if saw_space {
                // Descendant combinator.
                return Err(unsupported(input, start));
            }
            match token {
                Token::Ident(name) if current.is_empty() => current.tag = Some(name.to_string()),
                Token::Delim('*') if current.is_empty() => current.universal = true,
                Token::Delim('.') => {
                    let next = input.next_including_whitespace()?.clone();
                    match next {
                        Token::Ident(class) => current.classes.push(class.to_string()),
                        other => return Err(input.new_unexpected_token_error(other)),
                    }
                }
                Token::IDHash(id) => current.ids.push(id.to_string()),
                Token::Colon => {
                    let next = input.next_including_whitespace()?.clone();
                    match next {
                        Token::Ident(state) if state.eq_ignore_ascii_case("root") => {
                            current.root = true
                        }
                        Token::Ident(state) => current.states.push(state.to_ascii_lowercase()),
                        // Pseudo-elements and functional pseudo-classes.
                        Token::Colon | Token::Function(_) => return Err(unsupported(input, start)),
                        other => return Err(input.new_unexpected_token_error(other)),
                    }
                }
                Token::Delim('>' | '+' | '~') | Token::SquareBracketBlock => {
                    return Err(unsupported(input, start))
                }
                other => return Err(input.new_unexpected_token_error(other)),
            }
        }

        if current.is_empty() {
            return Err(input.new_error_for_next_token());
        }
        selectors.push(current);
        Ok(Self { selectors })
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Highest specificity among the selectors matching the element.
    pub fn specificity_for(&self, query: &ElementQuery) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|selector| selector.matches(query))
            .map(Selector::specificity)
            .max()
    }

    pub fn matches(&self, query: &ElementQuery) -> bool {
        self.selectors.iter().any(|selector| selector.matches(query))
    }

    /// Whether the list only names the document root, making its custom
    /// properties theme tokens.
    pub fn is_root(&self) -> bool {
        self.selectors.iter().all(Selector::is_root)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

fn unsupported<'i>(input: &mut Parser<'i, '_>, start: SourcePosition) -> ParseError<'i, SheetError> {
    while input.next().is_ok() {}
    let text = input.slice_from(start).trim().to_string();
    input.new_custom_error(SheetError::UnsupportedSelector(text))
}
