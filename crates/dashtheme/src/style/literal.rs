//! Literal values: colors, dimensions, numbers and keywords.

use std::fmt;

/// Units accepted on dimension literals.
///
/// Lengths (absolute, font-relative, viewport and container units) make up
/// most of the list. Angles, times, frequencies, resolutions and `fr` are
/// included so that transition, gradient, media and grid values validate too.
pub const DIMENSION_UNITS: &[&str] = &[
    // absolute lengths
    "px", "cm", "mm", "q", "in", "pt", "pc",
    // font-relative lengths
    "em", "rem", "ex", "rex", "cap", "rcap", "ch", "rch", "ic", "ric", "lh", "rlh",
    // viewport lengths
    "vw", "vh", "vi", "vb", "vmin", "vmax",
    "svw", "svh", "svi", "svb", "svmin", "svmax",
    "lvw", "lvh", "lvi", "lvb", "lvmin", "lvmax",
    "dvw", "dvh", "dvi", "dvb", "dvmin", "dvmax",
    // container lengths
    "cqw", "cqh", "cqi", "cqb", "cqmin", "cqmax",
    // angles
    "deg", "rad", "grad", "turn",
    // times
    "s", "ms",
    // frequencies
    "hz", "khz",
    // resolutions
    "dpi", "dpcm", "dppx", "x",
    // flex
    "fr",
];

/// A color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parses hex digits without the leading `#`.
    ///
    /// Accepts the 3, 4, 6 and 8 digit forms.
    ///
    /// ```rust
    /// use dashtheme::Color;
    ///
    /// assert_eq!(Color::from_hex("007bff"), Some(Color::rgb(0, 123, 255)));
    /// assert_eq!(Color::from_hex("fff"), Some(Color::rgb(255, 255, 255)));
    /// assert_eq!(Color::from_hex("12345"), None);
    /// ```
    pub fn from_hex(digits: &str) -> Option<Self> {
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 | 4 => {
                let r = nibble(0)?;
                let g = nibble(1)?;
                let b = nibble(2)?;
                let a = if digits.len() == 4 { nibble(3)? } else { 15 };
                Some(Self::rgba(r * 17, g * 17, b * 17, a * 17))
            }
            6 | 8 => {
                let a = if digits.len() == 8 { byte(6)? } else { 255 };
                Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
            }
            _ => None,
        }
    }

    /// Looks up a color keyword, case-insensitively.
    pub fn named(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, hex)| {
                let value = *hex;
                Self::rgba(
                    (value >> 24) as u8,
                    (value >> 16) as u8,
                    (value >> 8) as u8,
                    value as u8,
                )
            })
    }

    /// Builds a color from the numeric arguments of `rgb()`/`rgba()`/`hsl()`/`hsla()`.
    pub(crate) fn from_function(name: &str, args: &[Numeric]) -> Result<Self, String> {
        let name = name.to_ascii_lowercase();
        if args.len() != 3 && args.len() != 4 {
            return Err(format!(
                "{}() expects 3 or 4 arguments, found {}",
                name,
                args.len()
            ));
        }
        let alpha = match args.get(3) {
            None => 255,
            Some(Numeric::Number(n)) => unit_to_byte(*n)?,
            Some(Numeric::Percentage(p)) => unit_to_byte(*p)?,
            Some(Numeric::Dimension(_, unit)) => {
                return Err(format!("unexpected unit '{}' in alpha channel", unit))
            }
        };
        match name.as_str() {
            "rgb" | "rgba" => {
                let mut channels = [0u8; 3];
                for (slot, arg) in channels.iter_mut().zip(args) {
                    *slot = match arg {
                        Numeric::Number(n) if (0.0..=255.0).contains(n) => n.round() as u8,
                        Numeric::Percentage(p) => unit_to_byte(*p)?,
                        other => return Err(format!("invalid rgb channel {}", other)),
                    };
                }
                Ok(Self::rgba(channels[0], channels[1], channels[2], alpha))
            }
            "hsl" | "hsla" => {
                let hue = match &args[0] {
                    Numeric::Number(n) => *n,
                    Numeric::Dimension(n, unit) if unit.eq_ignore_ascii_case("deg") => *n,
                    Numeric::Dimension(n, unit) if unit.eq_ignore_ascii_case("turn") => n * 360.0,
                    other => return Err(format!("invalid hue {}", other)),
                };
                let percent = |arg: &Numeric| match arg {
                    Numeric::Percentage(p) if (0.0..=1.0).contains(p) => Ok(*p),
                    other => Err(format!("expected a percentage, found {}", other)),
                };
                let saturation = percent(&args[1])?;
                let lightness = percent(&args[2])?;
                let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
                Ok(Self::rgba(r, g, b, alpha))
            }
            _ => Err(format!("unknown color function '{}'", name)),
        }
    }
}

/// Numeric argument of a color function.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Numeric {
    Number(f32),
    /// Fraction, `50%` is `0.5`.
    Percentage(f32),
    Dimension(f32, String),
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Number(n) => write!(f, "{}", n),
            Numeric::Percentage(p) => write!(f, "{}%", p * 100.0),
            Numeric::Dimension(n, unit) => write!(f, "{}{}", n, unit),
        }
    }
}

fn unit_to_byte(fraction: f32) -> Result<u8, String> {
    if (0.0..=1.0).contains(&fraction) {
        Ok((fraction * 255.0).round() as u8)
    } else {
        Err(format!("value {} is outside 0..1", fraction))
    }
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

/// What a literal value was parsed as.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Color(Color),
    /// A number with a unit from [`DIMENSION_UNITS`].
    Dimension { value: f32, unit: String },
    Number(f32),
    /// Fraction, `50%` is `0.5`.
    Percentage(f32),
    Keyword(String),
    String(String),
    Url(String),
}

/// A literal value together with its text as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    kind: LiteralKind,
    text: String,
}

impl Literal {
    pub(crate) fn new(kind: LiteralKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> &LiteralKind {
        &self.kind
    }

    pub fn as_color(&self) -> Option<Color> {
        match self.kind {
            LiteralKind::Color(color) => Some(color),
            _ => None,
        }
    }

    /// Source text of the literal.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub(crate) fn is_dimension_unit(unit: &str) -> bool {
    DIMENSION_UNITS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(unit))
}

pub(crate) fn is_color_function(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "rgb" | "rgba" | "hsl" | "hsla"
    )
}

/// Color keywords as `0xRRGGBBAA`.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("transparent", 0x0000_0000),
    ("black", 0x0000_00ff),
    ("white", 0xffff_ffff),
    ("red", 0xff00_00ff),
    ("green", 0x0080_00ff),
    ("blue", 0x0000_ffff),
    ("yellow", 0xffff_00ff),
    ("orange", 0xffa5_00ff),
    ("purple", 0x8000_80ff),
    ("gray", 0x8080_80ff),
    ("grey", 0x8080_80ff),
    ("silver", 0xc0c0_c0ff),
    ("maroon", 0x8000_00ff),
    ("olive", 0x8080_00ff),
    ("lime", 0x00ff_00ff),
    ("aqua", 0x00ff_ffff),
    ("cyan", 0x00ff_ffff),
    ("teal", 0x0080_80ff),
    ("navy", 0x0000_80ff),
    ("fuchsia", 0xff00_ffff),
    ("magenta", 0xff00_ffff),
    ("pink", 0xffc0_cbff),
    ("brown", 0xa52a_2aff),
    ("gold", 0xffd7_00ff),
    ("indigo", 0x4b00_82ff),
    ("violet", 0xee82_eeff),
    ("coral", 0xff7f_50ff),
    ("salmon", 0xfa80_72ff),
    ("crimson", 0xdc14_3cff),
    ("tomato", 0xff63_47ff),
    ("khaki", 0xf0e6_8cff),
    ("beige", 0xf5f5_dcff),
    ("ivory", 0xffff_f0ff),
    ("lavender", 0xe6e6_faff),
    ("turquoise", 0x40e0_d0ff),
    ("skyblue", 0x87ce_ebff),
    ("steelblue", 0x4682_b4ff),
    ("royalblue", 0x4169_e1ff),
    ("dodgerblue", 0x1e90_ffff),
    ("slategray", 0x7080_90ff),
    ("slategrey", 0x7080_90ff),
    ("darkgray", 0xa9a9_a9ff),
    ("darkgrey", 0xa9a9_a9ff),
    ("lightgray", 0xd3d3_d3ff),
    ("lightgrey", 0xd3d3_d3ff),
    ("dimgray", 0x6969_69ff),
    ("dimgrey", 0x6969_69ff),
    ("gainsboro", 0xdcdc_dcff),
    ("whitesmoke", 0xf5f5_f5ff),
    ("darkslategray", 0x2f4f_4fff),
    ("darkslategrey", 0x2f4f_4fff),
    ("darkblue", 0x0000_8bff),
    ("darkgreen", 0x0064_00ff),
    ("darkred", 0x8b00_00ff),
    ("lightblue", 0xadd8_e6ff),
    ("lightgreen", 0x90ee_90ff),
];
