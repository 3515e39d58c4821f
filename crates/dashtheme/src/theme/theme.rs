//! Theme struct: a validated, immutable token and rule set.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::cascade::{cascade, CompiledRule, ResolvedDeclaration};
use super::mode::{detect_color_mode, ColorMode};
use super::validate::collect_unresolved;
use crate::config::{ThemeConfig, UnresolvedPolicy};
use crate::error::{ThemeError, ThemeResult};
use crate::selector::ElementQuery;
use crate::sheet::{parse_stylesheet, Diagnostic, Stylesheet};
use crate::style::PropertyValue;
use crate::token::{load_tokens, push_unique, TokenTable};

/// A loaded theme.
///
/// Themes are built once and never mutated: tokens are expanded, references
/// validated and values substituted at load time, so [`Theme::resolve`] is a
/// pure lookup. Reloading builds a new `Theme`; see
/// [`ThemeHandle`](crate::ThemeHandle).
///
/// # Example
///
/// ```rust
/// use dashtheme::{load_tokens, Theme};
///
/// let theme = Theme::builder()
///     .tokens(load_tokens([("background-color", "#181818"), ("tab-border", "#007bff")]).unwrap())
///     .stylesheet(".dash-tab { background-color: var(background-color); border: 1px solid var(tab-border); }")
///     .build()
///     .unwrap();
///
/// let props = theme.resolve(["dash-tab"], None);
/// assert_eq!(props["background-color"], "#181818");
/// assert_eq!(props["border"], "1px solid #007bff");
/// ```
#[derive(Debug, Clone)]
pub struct Theme {
    config: ThemeConfig,
    /// Tokens supplied outside the stylesheet, kept for reloads.
    base_tokens: TokenTable,
    variants: [Variant; 2],
    diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
struct Variant {
    tokens: TokenTable,
    rules: Vec<CompiledRule>,
}

impl Theme {
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }

    /// Loads a theme from stylesheet source with the default configuration.
    pub fn from_css(css: &str) -> ThemeResult<Self> {
        Self::builder().stylesheet(css).build()
    }

    /// Loads a theme from a stylesheet file.
    pub fn from_path(path: impl AsRef<Path>, config: ThemeConfig) -> ThemeResult<Self> {
        Self::builder()
            .stylesheet_path(path.as_ref())
            .config(config)
            .build()
    }

    /// Builds a theme from tokens and an already parsed stylesheet.
    ///
    /// `tokens` come first; custom properties declared in the sheet's `:root`
    /// blocks are applied on top in declaration order.
    ///
    /// # Errors
    ///
    /// - [`ThemeError::TokenCycle`] if token values reference each other in a loop.
    /// - [`ThemeError::UnresolvedToken`] if a reference names no token and the
    ///   policy is [`UnresolvedPolicy::Fail`].
    pub fn from_stylesheet(
        tokens: TokenTable,
        sheet: Stylesheet,
        config: ThemeConfig,
    ) -> ThemeResult<Self> {
        let mut missing = Vec::new();
        let [light, dark] =
            ColorMode::ALL.map(|mode| compile(&tokens, &sheet, &config, mode, &mut missing));
        let variants = [light?, dark?];

        if !missing.is_empty() && config.unresolved == UnresolvedPolicy::Fail {
            return Err(ThemeError::UnresolvedToken {
                references: missing,
            });
        }

        debug!(
            tokens = variants[0].tokens.len(),
            rules = sheet.rules.len(),
            "loaded theme"
        );
        Ok(Self {
            config,
            base_tokens: tokens,
            variants,
            diagnostics: sheet.diagnostics,
        })
    }

    /// Builds a new theme from `css` with this theme's tokens and configuration.
    pub fn rebuild(&self, css: &str) -> ThemeResult<Self> {
        let sheet = parse_stylesheet(css, self.config.strict_syntax)?;
        Self::from_stylesheet(self.base_tokens.clone(), sheet, self.config.clone())
    }

    /// Resolves the properties of an element with the given classes and state.
    ///
    /// Uses the color mode from the configuration, asking the mode detector
    /// when it is `auto`. An element no rule matches gets an empty map.
    pub fn resolve<I, S>(&self, classes: I, state: Option<&str>) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve_query(&ElementQuery::from_classes(classes, state))
    }

    pub fn resolve_query(&self, query: &ElementQuery) -> BTreeMap<String, String> {
        self.resolve_in(query, self.mode())
    }

    /// Resolves in an explicit color mode.
    pub fn resolve_in(&self, query: &ElementQuery, mode: ColorMode) -> BTreeMap<String, String> {
        cascade(&self.variants[mode.index()].rules, query)
    }

    /// The color mode [`Theme::resolve`] uses right now.
    pub fn mode(&self) -> ColorMode {
        self.config.mode.fixed().unwrap_or_else(detect_color_mode)
    }

    /// Expanded tokens in effect for `mode`.
    pub fn tokens(&self, mode: ColorMode) -> &TokenTable {
        &self.variants[mode.index()].tokens
    }

    /// Rendered value of a token in the current color mode.
    pub fn token(&self, name: &str) -> Option<String> {
        self.tokens(self.mode()).get(name).map(ToString::to_string)
    }

    /// Rules and declarations the parser skipped.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Number of rules that apply in `mode`.
    pub fn rule_count(&self, mode: ColorMode) -> usize {
        self.variants[mode.index()].rules.len()
    }
}

fn compile(
    base: &TokenTable,
    sheet: &Stylesheet,
    config: &ThemeConfig,
    mode: ColorMode,
    missing: &mut Vec<String>,
) -> ThemeResult<Variant> {
    let mut tokens = base.clone();
    for token in sheet.tokens.iter().filter(|t| t.mode.map_or(true, |m| m == mode)) {
        tokens.insert(&token.name, token.value.clone());
    }

    let (mut tokens, token_missing) = tokens.expand()?;
    for reference in &token_missing {
        push_unique(missing, reference);
    }
    if config.unresolved == UnresolvedPolicy::DropProperty && !token_missing.is_empty() {
        let mut kept = TokenTable::new();
        for (name, value) in tokens.iter() {
            if value.references().is_empty() {
                kept.insert(name, value.clone());
            } else {
                warn!(token = name, ?mode, "dropping token with unresolved reference");
            }
        }
        tokens = kept;
    }

    let mut rules = Vec::new();
    for rule in sheet.rules.iter().filter(|r| r.applies_in(mode)) {
        let mut declarations = Vec::with_capacity(rule.declarations.len());
        for declaration in &rule.declarations {
            let mut unresolved = Vec::new();
            collect_unresolved(&declaration.value, &tokens, &mut unresolved);
            if !unresolved.is_empty() {
                for reference in &unresolved {
                    push_unique(missing, reference);
                }
                if config.unresolved == UnresolvedPolicy::DropProperty {
                    warn!(
                        selector = %rule.selectors,
                        property = declaration.property.as_str(),
                        references = %unresolved.join(", "),
                        ?mode,
                        "dropping declaration with unresolved token reference"
                    );
                    continue;
                }
            }
            declarations.push(ResolvedDeclaration {
                property: declaration.property.clone(),
                value: substitute(&declaration.value, &tokens).to_string(),
                important: declaration.important,
            });
        }
        if !declarations.is_empty() {
            rules.push(CompiledRule {
                selectors: rule.selectors.clone(),
                index: rule.index,
                declarations,
            });
        }
    }

    Ok(Variant { tokens, rules })
}

fn substitute(value: &PropertyValue, tokens: &TokenTable) -> PropertyValue {
    match value.map_refs::<Infallible>(&mut |reference| Ok(tokens.get(reference.name()).cloned())) {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

enum Source {
    Css(String),
    Path(PathBuf),
}

/// Fluent builder assembling a theme from tokens and stylesheets.
///
/// Stylesheets cascade in the order they are added. Nothing is parsed until
/// [`build`](ThemeBuilder::build).
#[derive(Default)]
pub struct ThemeBuilder {
    tokens: TokenTable,
    pairs: Vec<(String, String)>,
    sources: Vec<Source>,
    config: ThemeConfig,
}

impl ThemeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single token definition, parsed at build time.
    pub fn token(mut self, name: &str, value: &str) -> Self {
        self.pairs.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds a table of tokens.
    pub fn tokens(mut self, tokens: TokenTable) -> Self {
        self.tokens.extend(tokens);
        self
    }

    pub fn stylesheet(mut self, css: impl Into<String>) -> Self {
        self.sources.push(Source::Css(css.into()));
        self
    }

    pub fn stylesheet_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::Path(path.into()));
        self
    }

    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> ThemeResult<Theme> {
        let mut tokens = self.tokens;
        tokens.extend(load_tokens(self.pairs)?);

        let strict = self.config.strict_syntax;
        let mut sheet = Stylesheet::default();
        for source in self.sources {
            let parsed = match source {
                Source::Css(css) => parse_stylesheet(&css, strict)?,
                Source::Path(path) => {
                    let css = std::fs::read_to_string(&path)
                        .map_err(|e| ThemeError::io(&path, e))?;
                    parse_stylesheet(&css, strict)?
                }
            };
            sheet.append(parsed);
        }
        Theme::from_stylesheet(tokens, sheet, self.config)
    }
}
