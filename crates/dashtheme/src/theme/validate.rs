//! Token reference validation.

use crate::error::{ThemeError, ThemeResult};
use crate::sheet::Rule;
use crate::style::{Component, PropertyValue};
use crate::token::{push_unique, TokenTable};

/// Checks that every token reference used in `rules` exists in `tokens`.
///
/// References carrying a `var()` fallback are satisfied by the fallback, whose
/// own references are then checked. Neither input is modified.
///
/// ```rust
/// use dashtheme::{load_tokens, parse_stylesheet, validate_rules, ThemeError};
///
/// let tokens = load_tokens([("accent", "#007bff")]).unwrap();
/// let sheet = parse_stylesheet(".card { color: var(--undefined-token); }", false).unwrap();
///
/// match validate_rules(&sheet.rules, &tokens) {
///     Err(ThemeError::UnresolvedToken { references }) => {
///         assert_eq!(references, vec!["--undefined-token".to_string()]);
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
///
/// # Errors
///
/// Returns [`ThemeError::UnresolvedToken`] listing each unresolved reference
/// once, in the order first seen.
pub fn validate_rules(rules: &[Rule], tokens: &TokenTable) -> ThemeResult<()> {
    let mut missing = Vec::new();
    for declaration in rules.iter().flat_map(|rule| &rule.declarations) {
        collect_unresolved(&declaration.value, tokens, &mut missing);
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ThemeError::UnresolvedToken {
            references: missing,
        })
    }
}

/// Appends the references in `value` that `tokens` cannot satisfy.
pub(crate) fn collect_unresolved(
    value: &PropertyValue,
    tokens: &TokenTable,
    missing: &mut Vec<String>,
) {
    for component in value.components() {
        match component {
            Component::Reference(reference) => {
                if tokens.contains(reference.name()) {
                    continue;
                }
                match reference.fallback() {
                    Some(fallback) => collect_unresolved(fallback, tokens, missing),
                    None => push_unique(missing, reference.written()),
                }
            }
            Component::Function { args, .. } | Component::Brackets(args) => {
                collect_unresolved(args, tokens, missing)
            }
            Component::Literal(_) | Component::Separator(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::parse_stylesheet;
    use crate::token::load_tokens;

    fn rules(css: &str) -> Vec<Rule> {
        parse_stylesheet(css, true).unwrap().rules
    }

    #[test]
    fn test_all_references_defined() {
        let tokens = load_tokens([("background-color", "#181818"), ("tab-border", "#007bff")]).unwrap();
        let rules = rules(
            ".dash-tab { background-color: var(background-color); border: 1px solid var(tab-border); }",
        );
        assert!(validate_rules(&rules, &tokens).is_ok());
    }

    #[test]
    fn test_reports_each_missing_reference_once() {
        let tokens = TokenTable::new();
        let rules = rules(
            ".a { color: var(--x); border-color: var(--y); }\n.b { color: var(--x); }",
        );
        match validate_rules(&rules, &tokens) {
            Err(ThemeError::UnresolvedToken { references }) => {
                assert_eq!(references, vec!["--x".to_string(), "--y".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fallback_satisfies_reference() {
        let rules = rules(".a { color: var(--x, red); }");
        assert!(validate_rules(&rules, &TokenTable::new()).is_ok());
    }

    #[test]
    fn test_fallback_references_checked_when_used() {
        let rules = rules(".a { color: var(--x, var(--y)); }");
        assert!(validate_rules(&rules, &TokenTable::new()).is_err());

        let tokens = load_tokens([("y", "red")]).unwrap();
        assert!(validate_rules(&rules, &tokens).is_ok());
    }

    #[test]
    fn test_references_inside_functions() {
        let rules = rules(".a { width: calc(var(--gap) * 2); }");
        assert!(validate_rules(&rules, &TokenTable::new()).is_err());
    }

    #[test]
    fn test_validation_does_not_modify_inputs() {
        let tokens = load_tokens([("x", "red")]).unwrap();
        let rules = rules(".a { color: var(--x); background: var(--nope); }");
        let tokens_before = tokens.clone();
        let rules_before = rules.clone();
        let _ = validate_rules(&rules, &tokens);
        assert_eq!(tokens, tokens_before);
        assert_eq!(rules, rules_before);
    }
}
