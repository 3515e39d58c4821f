//! Stylesheet parsing on top of `cssparser`.

use cssparser::{
    AtRuleParser, BasicParseError, CowRcStr, DeclarationParser, ParseError, ParseErrorKind,
    Parser, ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
    StyleSheetParser,
};
use tracing::{debug, warn};

use super::{
    diagnostic_from, into_theme_error, Declaration, Rule, SheetError,
    Stylesheet, TokenDeclaration,
};
use crate::error::ThemeResult;
use crate::selector::SelectorList;
use crate::style::value::parse_declaration_value;
use crate::theme::ColorMode;

/// Parses theme source into a [`Stylesheet`].
///
/// With `strict` set, any malformed rule or declaration fails the parse with
/// [`ThemeError::Syntax`](crate::ThemeError::Syntax); otherwise it is skipped
/// and recorded in [`Stylesheet::diagnostics`]. Invalid literals always fail.
///
/// ```rust
/// use dashtheme::parse_stylesheet;
///
/// let sheet = parse_stylesheet(
///     ":root { --accent: #007bff; }\n.dash-tab { border-color: var(--accent); }",
///     false,
/// ).unwrap();
/// assert_eq!(sheet.tokens.len(), 1);
/// assert_eq!(sheet.rules.len(), 1);
/// ```
pub fn parse_stylesheet(css: &str, strict: bool) -> ThemeResult<Stylesheet> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut sheet_parser = SheetParser {
        strict,
        mode: None,
        sheet: Stylesheet::default(),
    };

    let mut errors = Vec::new();
    for result in StyleSheetParser::new(&mut parser, &mut sheet_parser) {
        if let Err(err) = result {
            errors.push(err);
        }
    }
    for (err, source) in errors {
        sheet_parser.absorb(err, source).map_err(into_theme_error)?;
    }

    let mut sheet = sheet_parser.sheet;
    sheet.diagnostics.sort_by_key(|d| (d.line, d.column));
    debug!(
        tokens = sheet.tokens.len(),
        rules = sheet.rules.len(),
        skipped = sheet.diagnostics.len(),
        "parsed stylesheet"
    );
    Ok(sheet)
}

struct SheetParser {
    strict: bool,
    /// Color mode of the enclosing `@media` block, if any.
    mode: Option<ColorMode>,
    sheet: Stylesheet,
}

impl SheetParser {
    /// Records a recoverable error as a diagnostic, or hands it back.
    fn absorb<'i>(
        &mut self,
        err: ParseError<'i, SheetError>,
        source: &str,
    ) -> Result<(), ParseError<'i, SheetError>> {
        let recoverable = match &err.kind {
            ParseErrorKind::Custom(custom) if custom.is_fatal() => false,
            ParseErrorKind::Custom(custom) if custom.is_unsupported() => true,
            _ => !self.strict,
        };
        if !recoverable {
            return Err(err);
        }
        let diagnostic = diagnostic_from(&err, source);
        warn!(
            line = diagnostic.line,
            column = diagnostic.column,
            "skipping '{}': {}",
            diagnostic.source,
            diagnostic.message
        );
        self.sheet.diagnostics.push(diagnostic);
        Ok(())
    }

    fn push_rule(&mut self, selectors: SelectorList, declarations: Vec<Declaration>) {
        let declarations = if selectors.is_root() {
            let mode = self.mode;
            let (custom, rest): (Vec<_>, Vec<_>) = declarations
                .into_iter()
                .partition(|d| d.property.starts_with("--"));
            for declaration in custom {
                let name = declaration.property.strip_prefix("--").unwrap_or(&declaration.property);
                if declaration.important {
                    warn!(token = name, "ignoring !important on token definition");
                }
                self.sheet.tokens.push(TokenDeclaration {
                    name: name.to_string(),
                    value: declaration.value,
                    mode,
                });
            }
            rest
        } else {
            declarations
        };

        if declarations.is_empty() {
            return;
        }
        let index = self.sheet.rules.len();
        self.sheet.rules.push(Rule {
            selectors,
            declarations,
            index,
            mode: self.mode,
        });
    }
}

impl<'i> QualifiedRuleParser<'i> for SheetParser {
    type Prelude = SelectorList;
    type QualifiedRule = ();
    type Error = SheetError;

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        SelectorList::parse(input)
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut body = BodyParser;
        let mut declarations = Vec::new();
        let mut errors = Vec::new();
        for item in RuleBodyParser::new(input, &mut body) {
            match item {
                Ok(declaration) => declarations.push(declaration),
                Err(err) => errors.push(err),
            }
        }
        for (err, source) in errors {
            self.absorb(err, source)?;
        }
        self.push_rule(selectors, declarations);
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for SheetParser {
    type Prelude = ColorMode;
    type AtRule = ();
    type Error = SheetError;

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        if !name.eq_ignore_ascii_case("media") {
            return Err(input.new_custom_error(SheetError::UnsupportedAtRule(name.to_string())));
        }
        let start = input.position();
        if let Ok(mode) = input.try_parse(parse_color_scheme_query) {
            return Ok(mode);
        }
        while input.next().is_ok() {}
        let query = input.slice_from(start).trim();
        Err(input.new_custom_error(SheetError::UnsupportedAtRule(format!("media {}", query))))
    }

    fn parse_block<'t>(
        &mut self,
        mode: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let outer = self.mode.replace(mode);
        let mut errors = Vec::new();
        for result in StyleSheetParser::new(input, self) {
            if let Err(err) = result {
                errors.push(err);
            }
        }
        self.mode = outer;
        for (err, source) in errors {
            self.absorb(err, source)?;
        }
        Ok(())
    }
}

/// Parses `(prefers-color-scheme: dark)`, optionally preceded by `screen and`.
fn parse_color_scheme_query<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<ColorMode, ParseError<'i, SheetError>> {
    let _ = input.try_parse(|i| -> Result<(), BasicParseError<'i>> {
        i.expect_ident_matching("screen")?;
        i.expect_ident_matching("and")?;
        Ok(())
    });
    input.expect_parenthesis_block()?;
    input.parse_nested_block(|block| {
        block.expect_ident_matching("prefers-color-scheme")?;
        block.expect_colon()?;
        let scheme = block.expect_ident_cloned()?;
        if scheme.eq_ignore_ascii_case("dark") {
            Ok(ColorMode::Dark)
        } else if scheme.eq_ignore_ascii_case("light") {
            Ok(ColorMode::Light)
        } else {
            Err(block.new_custom_error(SheetError::UnsupportedAtRule(format!(
                "media (prefers-color-scheme: {})",
                &*scheme
            ))))
        }
    })
}

/// Parses the declarations inside a rule block.
struct BodyParser;

impl<'i> DeclarationParser<'i> for BodyParser {
    type Declaration = Declaration;
    type Error = SheetError;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        // Custom property names are case-sensitive.
        let property = if name.starts_with("--") {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };
        let start = input.position();
        match parse_declaration_value(input) {
            Ok((value, important)) => Ok(Declaration {
                property,
                value,
                important,
            }),
            // Bad literals abort the load; anything else is a malformed
            // declaration the rule body parser can skip.
            Err(ParseError {
                kind: ParseErrorKind::Custom(SheetError::InvalidValue(reason)),
                location,
            }) => {
                while input.next().is_ok() {}
                let value = input.slice_from(start).trim().to_string();
                Err(ParseError {
                    kind: ParseErrorKind::Custom(SheetError::InvalidLiteral {
                        property,
                        value,
                        reason,
                    }),
                    location,
                })
            }
            Err(err) => Err(err),
        }
    }
}

impl<'i> AtRuleParser<'i> for BodyParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = SheetError;
}

impl<'i> QualifiedRuleParser<'i> for BodyParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = SheetError;
}

impl<'i> RuleBodyItemParser<'i, Declaration, SheetError> for BodyParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}
