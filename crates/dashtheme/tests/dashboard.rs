use dashtheme::builtin::DASHBOARD_CSS;
use dashtheme::{set_mode_detector, ColorMode, Theme, ThemeHandle};
use serial_test::serial;

#[test]
#[serial]
fn resolve_follows_detected_mode() {
    let theme = Theme::dashboard().unwrap();

    set_mode_detector(|| ColorMode::Dark);
    assert_eq!(theme.mode(), ColorMode::Dark);
    assert_eq!(theme.resolve(["tab-content"], None)["background-color"], "#181818");

    set_mode_detector(|| ColorMode::Light);
    assert_eq!(theme.resolve(["tab-content"], None)["background-color"], "#f8f9fa");
    assert_eq!(theme.token("text-color").as_deref(), Some("#212529"));
}

#[test]
#[serial]
fn selected_tab_in_dark_mode() {
    set_mode_detector(|| ColorMode::Dark);
    let theme = Theme::dashboard().unwrap();
    let props = theme.resolve(["dash-tab", "dash-tab--selected"], None);
    assert_eq!(props["background-color"], "#007bff");
    assert_eq!(props["color"], "#ffffff");
    assert_eq!(props["border"], "1px solid #007bff");
    assert_eq!(props["font-weight"], "bold");
}

#[test]
#[serial]
fn hovered_tab_uses_text_color() {
    set_mode_detector(|| ColorMode::Dark);
    let theme = Theme::dashboard().unwrap();
    assert_eq!(theme.resolve(["dash-tab"], None)["color"], "#9e9e9e");
    assert_eq!(theme.resolve(["dash-tab"], Some("hover"))["color"], "#e0e0e0");
}

#[test]
fn computed_values_are_substituted() {
    let theme = Theme::dashboard().unwrap();
    let props = theme.resolve_in(
        &dashtheme::ElementQuery::new().class("dash-tab"),
        ColorMode::Dark,
    );
    assert_eq!(props["padding"], "8px calc(8px * 2)");
}

#[test]
#[serial]
fn reloading_the_dashboard_with_an_override() {
    set_mode_detector(|| ColorMode::Dark);
    let handle = ThemeHandle::new(Theme::dashboard().unwrap());
    let css = format!("{}\n.card {{ border: 2px dashed var(--accent-color); }}", DASHBOARD_CSS);
    handle.reload_from_str(&css).unwrap();
    let props = handle.resolve(["card"], None);
    assert_eq!(props["border"], "2px dashed #007bff");
    assert_eq!(props["background-color"], "#222222");
}
