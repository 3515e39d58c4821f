use dashtheme::{
    load_tokens, parse_stylesheet, validate_rules, ColorMode, ElementQuery, Theme, ThemeConfig,
    ThemeError, UnresolvedPolicy,
};
use proptest::prelude::*;

fn build(css: &str) -> Theme {
    Theme::builder().stylesheet(css).build().unwrap()
}

#[test]
fn dash_tab_background_and_border() {
    let theme = Theme::builder()
        .tokens(load_tokens([("background-color", "#181818"), ("tab-border", "#007bff")]).unwrap())
        .stylesheet(
            ".dash-tab { background-color: var(background-color); border: 1px solid var(tab-border); }",
        )
        .build()
        .unwrap();

    let props = theme.resolve_in(&ElementQuery::new().class("dash-tab"), ColorMode::Dark);
    assert_eq!(props.len(), 2);
    assert_eq!(props["background-color"], "#181818");
    assert_eq!(props["border"], "1px solid #007bff");
}

#[test]
fn undefined_token_is_reported_by_name() {
    let sheet = parse_stylesheet(".card { color: var(--undefined-token); }", false).unwrap();
    let tokens = load_tokens([("accent", "#007bff")]).unwrap();
    let err = validate_rules(&sheet.rules, &tokens).unwrap_err();
    assert!(err.to_string().contains("--undefined-token"));
}

#[test]
fn invalid_literal_fails_load() {
    let err = Theme::from_css(".card { color: #12345g; }").unwrap_err();
    assert!(matches!(err, ThemeError::InvalidLiteral { ref property, .. } if property == "color"));

    let err = Theme::from_css(".card { width: 12parsecs; }").unwrap_err();
    assert!(matches!(err, ThemeError::InvalidLiteral { .. }));
}

#[test]
fn hover_state_overrides_base_rule() {
    let theme = build(
        ".dash-tab { color: gray; padding: 4px; }\n\
         .dash-tab:hover { color: white; }",
    );
    let idle = theme.resolve_in(&ElementQuery::new().class("dash-tab"), ColorMode::Light);
    assert_eq!(idle["color"], "gray");

    let hovered = ElementQuery::new().class("dash-tab").state("hover");
    let props = theme.resolve_in(&hovered, ColorMode::Light);
    assert_eq!(props["color"], "white");
    assert_eq!(props["padding"], "4px");
}

#[test]
fn id_beats_classes_regardless_of_order() {
    let theme = build("#main { color: red; }\n.card.results-panel { color: blue; }");
    let query = ElementQuery::new()
        .id("main")
        .class("card")
        .class("results-panel");
    assert_eq!(theme.resolve_in(&query, ColorMode::Light)["color"], "red");
}

#[test]
fn important_wins_over_specificity_and_order() {
    let theme = build(".card { color: red !important; }\n#main.card { color: blue; }");
    let query = ElementQuery::new().id("main").class("card");
    assert_eq!(theme.resolve_in(&query, ColorMode::Light)["color"], "red");
}

#[test]
fn unmatched_element_resolves_empty() {
    let theme = build(".card { color: red; }");
    assert!(theme
        .resolve_in(&ElementQuery::new().class("unknown"), ColorMode::Light)
        .is_empty());
    assert!(theme.resolve_in(&ElementQuery::new(), ColorMode::Light).is_empty());
}

#[test]
fn lenient_load_skips_malformed_rules() {
    let theme = build(
        ".card { color: red; }\n\
         .broken { color red; }\n\
         .panel > .card { color: blue; }\n\
         @font-face { font-family: x; }\n\
         .tab { color: green; }",
    );
    assert_eq!(theme.resolve_in(&ElementQuery::new().class("card"), ColorMode::Light)["color"], "red");
    assert_eq!(theme.resolve_in(&ElementQuery::new().class("tab"), ColorMode::Light)["color"], "green");
    assert!(theme.diagnostics().len() >= 2);
}

#[test]
fn strict_load_rejects_malformed_rules() {
    let err = Theme::builder()
        .stylesheet(".card { color: red; }\n.broken { color red; }")
        .config(ThemeConfig::default().strict(true))
        .build()
        .unwrap_err();
    assert!(matches!(err, ThemeError::Syntax { line: 2, .. }));
}

#[test]
fn token_cycle_is_rejected() {
    let err = Theme::from_css(":root { --a: var(--b); --b: var(--a); }").unwrap_err();
    assert!(matches!(err, ThemeError::TokenCycle { .. }));
}

#[test]
fn fallback_used_for_missing_token() {
    let theme = build(".card { color: var(--accent, #007bff); }");
    assert_eq!(
        theme.resolve_in(&ElementQuery::new().class("card"), ColorMode::Light)["color"],
        "#007bff"
    );
}

#[test]
fn drop_property_policy_keeps_the_rest() {
    let theme = Theme::builder()
        .stylesheet(".card { color: var(--missing); padding: 1rem; }")
        .config(ThemeConfig::default().unresolved(UnresolvedPolicy::DropProperty))
        .build()
        .unwrap();
    let props = theme.resolve_in(&ElementQuery::new().class("card"), ColorMode::Light);
    assert_eq!(props.len(), 1);
    assert_eq!(props["padding"], "1rem");
}

#[test]
fn config_from_yaml_drives_loading() {
    let config = ThemeConfig::from_yaml("unresolved: drop-property\nmode: dark\n").unwrap();
    let theme = Theme::builder()
        .stylesheet(".card { color: var(--missing); margin: 0; }")
        .config(config)
        .build()
        .unwrap();
    assert_eq!(theme.resolve(["card"], None)["margin"], "0");
}

#[test]
fn tokens_from_yaml() {
    let tokens = dashtheme::TokenTable::from_yaml("accent: '#007bff'\ngap: 8px\n").unwrap();
    let theme = Theme::builder()
        .tokens(tokens)
        .stylesheet(".card { border-color: var(--accent); padding: var(--gap); }")
        .build()
        .unwrap();
    let props = theme.resolve_in(&ElementQuery::new().class("card"), ColorMode::Light);
    assert_eq!(props["border-color"], "#007bff");
    assert_eq!(props["padding"], "8px");
}

const CLASSES: &[&str] = &["card", "dash-tab", "dash-tab--selected", "results-panel", "tab-content"];
const STATES: &[&str] = &["hover", "focus", "active"];

const PROPERTY_SHEET: &str = "\
.card { color: red; padding: 4px; }\n\
.dash-tab { color: gray; border: 1px solid blue; }\n\
.dash-tab:hover { color: white; }\n\
.dash-tab.dash-tab--selected { color: black !important; }\n\
.results-panel, .tab-content { margin: 0; color: green; }\n\
.card:focus { outline: 2px solid orange; }\n\
.card.results-panel:active { color: purple; }\n";

proptest! {
    #[test]
    fn resolution_is_deterministic(
        classes in proptest::sample::subsequence(CLASSES.to_vec(), 0..=CLASSES.len()),
        state in proptest::option::of(proptest::sample::select(STATES.to_vec())),
    ) {
        let theme = build(PROPERTY_SHEET);
        let first = theme.resolve_in(&ElementQuery::from_classes(classes.clone(), state), ColorMode::Light);
        let again = theme.resolve_in(&ElementQuery::from_classes(classes.iter().rev().copied(), state), ColorMode::Light);
        prop_assert_eq!(&first, &again);

        let rebuilt = build(PROPERTY_SHEET);
        let third = rebuilt.resolve_in(&ElementQuery::from_classes(classes, state), ColorMode::Light);
        prop_assert_eq!(first, third);
    }

    #[test]
    fn important_selected_tab_is_always_black(
        extra in proptest::sample::subsequence(CLASSES.to_vec(), 0..=CLASSES.len()),
        state in proptest::option::of(proptest::sample::select(STATES.to_vec())),
    ) {
        let theme = build(PROPERTY_SHEET);
        let query = ElementQuery::from_classes(
            extra.into_iter().chain(["dash-tab", "dash-tab--selected"]),
            state,
        );
        let props = theme.resolve_in(&query, ColorMode::Light);
        prop_assert_eq!(props.get("color").map(String::as_str), Some("black"));
    }
}

#[test]
fn viewport_and_container_units_load() {
    let theme = build(".results-panel { max-height: 60dvh; min-height: 10svh; width: 50cqw; line-height: 1.2lh; color: red; }");
    let props = theme.resolve_in(&ElementQuery::new().class("results-panel"), ColorMode::Light);
    assert_eq!(props["max-height"], "60dvh");
    assert_eq!(props["min-height"], "10svh");
    assert_eq!(props["width"], "50cqw");
    assert_eq!(props["color"], "red");

    let tokens = load_tokens([("panel-height", "100dvh"), ("icon-scale", "2dppx")]).unwrap();
    assert_eq!(tokens.len(), 2);
}

#[test]
fn grid_line_names_do_not_break_the_theme() {
    let theme = build(
        ".card { grid-template-columns: [full-start] 1fr [full-end]; }\n\
         .tab { color: red; }",
    );
    assert_eq!(
        theme.resolve_in(&ElementQuery::new().class("card"), ColorMode::Light)["grid-template-columns"],
        "[full-start] 1fr [full-end]"
    );
    assert_eq!(theme.resolve_in(&ElementQuery::new().class("tab"), ColorMode::Light)["color"], "red");
}

#[test]
fn unparseable_value_skips_only_that_declaration() {
    let theme = build(
        ".card { color: red @media; padding: 4px; }\n\
         .tab { color: blue; }",
    );
    let card = theme.resolve_in(&ElementQuery::new().class("card"), ColorMode::Light);
    assert!(!card.contains_key("color"));
    assert_eq!(card["padding"], "4px");
    assert_eq!(theme.resolve_in(&ElementQuery::new().class("tab"), ColorMode::Light)["color"], "blue");
    assert_eq!(theme.diagnostics().len(), 1);
}

#[test]
fn triple_dash_token_names_round_trip() {
    let theme = build(":root { ---x: red; }\n.card { color: var(---x); }");
    assert_eq!(
        theme.resolve_in(&ElementQuery::new().class("card"), ColorMode::Light)["color"],
        "red"
    );
}
