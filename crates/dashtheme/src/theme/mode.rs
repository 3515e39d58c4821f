//! Light and dark color modes with OS detection.

use std::sync::Mutex;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;

/// The user's preferred color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    /// Every mode, in the order themes store their variants.
    pub const ALL: [ColorMode; 2] = [ColorMode::Light, ColorMode::Dark];

    pub(crate) fn index(self) -> usize {
        match self {
            ColorMode::Light => 0,
            ColorMode::Dark => 1,
        }
    }
}

type ModeDetector = fn() -> ColorMode;

static MODE_DETECTOR: Lazy<Mutex<ModeDetector>> = Lazy::new(|| Mutex::new(os_mode_detector));

/// Overrides the detector used to decide whether the user prefers a light or
/// dark theme.
///
/// Useful for tests, or to follow an application-level setting instead of
/// the OS.
pub fn set_mode_detector(detector: ModeDetector) {
    let mut guard = MODE_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = detector;
}

/// Returns the color mode reported by the current detector.
pub fn detect_color_mode() -> ColorMode {
    let detector = *MODE_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    detector()
}

fn os_mode_detector() -> ColorMode {
    match detect_os_theme() {
        OsThemeMode::Dark => ColorMode::Dark,
        #[allow(unreachable_patterns)]
        _ => ColorMode::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_detector_override() {
        set_mode_detector(|| ColorMode::Dark);
        assert_eq!(detect_color_mode(), ColorMode::Dark);

        set_mode_detector(|| ColorMode::Light);
        assert_eq!(detect_color_mode(), ColorMode::Light);
    }

    #[test]
    fn test_mode_indices_are_distinct() {
        assert_eq!(ColorMode::Light.index(), 0);
        assert_eq!(ColorMode::Dark.index(), 1);
        for (position, mode) in ColorMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), position);
        }
    }
}
