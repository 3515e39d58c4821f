//! Cascade resolution.
//!
//! Candidate declarations from every matching rule are ordered by
//! `(importance, specificity, rule index, position in rule)` and folded in
//! that order, so later entries overwrite earlier ones for the same property.

use std::collections::BTreeMap;

use crate::selector::{ElementQuery, SelectorList, Specificity};

/// A declaration whose token references have been substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedDeclaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// A rule ready for resolution in one color mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledRule {
    pub selectors: SelectorList,
    pub index: usize,
    pub declarations: Vec<ResolvedDeclaration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CascadeKey {
    important: bool,
    specificity: Specificity,
    rule: usize,
    position: usize,
}

pub(crate) fn cascade(rules: &[CompiledRule], query: &ElementQuery) -> BTreeMap<String, String> {
    let mut candidates: Vec<(CascadeKey, &ResolvedDeclaration)> = Vec::new();
    for rule in rules {
        let Some(specificity) = rule.selectors.specificity_for(query) else {
            continue;
        };
        for (position, declaration) in rule.declarations.iter().enumerate() {
            let key = CascadeKey {
                important: declaration.important,
                specificity,
                rule: rule.index,
                position,
            };
            candidates.push((key, declaration));
        }
    }
    candidates.sort_by_key(|(key, _)| *key);

    let mut resolved = BTreeMap::new();
    for (_, declaration) in candidates {
        resolved.insert(declaration.property.clone(), declaration.value.clone());
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(selector: &str, index: usize, declarations: &[(&str, &str, bool)]) -> CompiledRule {
        CompiledRule {
            selectors: SelectorList::parse_str(selector).unwrap(),
            index,
            declarations: declarations
                .iter()
                .map(|(property, value, important)| ResolvedDeclaration {
                    property: property.to_string(),
                    value: value.to_string(),
                    important: *important,
                })
                .collect(),
        }
    }

    #[test]
    fn test_later_rule_wins_at_equal_specificity() {
        let rules = vec![
            rule(".card", 0, &[("color", "red", false)]),
            rule(".card", 1, &[("color", "blue", false)]),
        ];
        let resolved = cascade(&rules, &ElementQuery::new().class("card"));
        assert_eq!(resolved["color"], "blue");
    }

    #[test]
    fn test_specificity_beats_declaration_order() {
        let rules = vec![
            rule(".dash-tab:hover", 0, &[("color", "white", false)]),
            rule(".dash-tab", 1, &[("color", "gray", false)]),
        ];
        let hovered = ElementQuery::new().class("dash-tab").state("hover");
        assert_eq!(cascade(&rules, &hovered)["color"], "white");
        let idle = ElementQuery::new().class("dash-tab");
        assert_eq!(cascade(&rules, &idle)["color"], "gray");
    }

    #[test]
    fn test_important_beats_specificity() {
        let rules = vec![
            rule(".card", 0, &[("color", "red", true)]),
            rule("#main.card", 1, &[("color", "blue", false)]),
        ];
        let query = ElementQuery::new().id("main").class("card");
        assert_eq!(cascade(&rules, &query)["color"], "red");
    }

    #[test]
    fn test_duplicate_property_in_rule_last_wins() {
        let rules = vec![rule(
            ".card",
            0,
            &[("color", "red", false), ("color", "green", false)],
        )];
        let resolved = cascade(&rules, &ElementQuery::new().class("card"));
        assert_eq!(resolved["color"], "green");
    }

    #[test]
    fn test_properties_merge_across_rules() {
        let rules = vec![
            rule(".card", 0, &[("color", "red", false), ("padding", "1rem", false)]),
            rule(".results-panel", 1, &[("color", "blue", false)]),
        ];
        let query = ElementQuery::new().class("card").class("results-panel");
        let resolved = cascade(&rules, &query);
        assert_eq!(resolved["color"], "blue");
        assert_eq!(resolved["padding"], "1rem");
    }

    #[test]
    fn test_no_match_is_empty() {
        let rules = vec![rule(".card", 0, &[("color", "red", false)])];
        assert!(cascade(&rules, &ElementQuery::new().class("tab")).is_empty());
    }
}
