use std::str::FromStr;

use palette::{FromColor, Hsla, Srgb, Srgba};
use thiserror::Error;

/// Straight-alpha RGBA colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty colour string")]
    Empty,
    #[error("invalid hex colour: {0}")]
    InvalidHex(String),
    #[error("malformed colour function: {0}")]
    MalformedFunction(String),
    #[error("unknown colour name: {0}")]
    UnknownName(String),
}

impl Color {
    pub const WHITE: Self = Self::rgb8(255, 255, 255);
    pub const BLACK: Self = Self::rgb8(0, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0.0);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 1.0)
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    /// CSS `hsla()`: hue in degrees, saturation and lightness in percent.
    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let hsla: Hsla = Hsla::new(
            hue.rem_euclid(360.0),
            (saturation / 100.0).clamp(0.0, 1.0),
            (lightness / 100.0).clamp(0.0, 1.0),
            alpha.clamp(0.0, 1.0),
        );
        let rgba: Srgba = Srgba::from_color(hsla);
        Self {
            r: rgba.red,
            g: rgba.green,
            b: rgba.blue,
            a: rgba.alpha,
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [
            unit_to_u8(self.r),
            unit_to_u8(self.g),
            unit_to_u8(self.b),
            unit_to_u8(self.a),
        ]
    }

    /// Parses the subset of CSS colour syntax a colour picker produces:
    /// hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()`,
    /// `hsl()`/`hsla()` and a handful of keywords.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let text = input.trim().to_ascii_lowercase();
        if text.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(input.trim().to_string()));
        }
        if let Some((name, args)) = split_function(&text) {
            let malformed = || ColorParseError::MalformedFunction(input.trim().to_string());
            return match name {
                "rgb" | "rgba" => parse_rgb_args(args).ok_or_else(malformed),
                "hsl" | "hsla" => parse_hsl_args(args).ok_or_else(malformed),
                _ => Err(malformed()),
            };
        }
        named_color(&text).ok_or_else(|| ColorParseError::UnknownName(input.trim().to_string()))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    // Colour digits go through palette; a trailing alpha digit or pair is read here.
    let (rgb, alpha) = match hex.len() {
        3 | 6 => (hex, 1.0),
        4 => (&hex[..3], f32::from(u8::from_str_radix(&hex[3..], 16).ok()? * 17) / 255.0),
        8 => (&hex[..6], f32::from(u8::from_str_radix(&hex[6..], 16).ok()?) / 255.0),
        _ => return None,
    };
    let c = Srgb::<u8>::from_str(rgb).ok()?;
    Some(Color::rgba8(c.red, c.green, c.blue, alpha))
}

fn split_function(text: &str) -> Option<(&str, &str)> {
    let open = text.find('(')?;
    let inner = text[open + 1..].strip_suffix(')')?;
    Some((text[..open].trim(), inner))
}

/// Accepts both the legacy comma syntax and the modern `r g b / a` form.
fn split_args(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_number(raw: &str) -> Option<f32> {
    let v = raw.parse::<f32>().ok()?;
    v.is_finite().then_some(v)
}

fn parse_channel(raw: &str) -> Option<f32> {
    match raw.strip_suffix('%') {
        Some(pct) => Some((parse_number(pct)? / 100.0).clamp(0.0, 1.0)),
        None => Some((parse_number(raw)? / 255.0).clamp(0.0, 1.0)),
    }
}

fn parse_alpha(raw: Option<&&str>) -> Option<f32> {
    let Some(raw) = raw else {
        return Some(1.0);
    };
    let v = match raw.strip_suffix('%') {
        Some(pct) => parse_number(pct)? / 100.0,
        None => parse_number(raw)?,
    };
    Some(v.clamp(0.0, 1.0))
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    Some(Color {
        r: parse_channel(parts[0])?,
        g: parse_channel(parts[1])?,
        b: parse_channel(parts[2])?,
        a: parse_alpha(parts.get(3))?,
    })
}

fn parse_hsl_args(args: &str) -> Option<Color> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let hue = parse_number(parts[0].trim_end_matches("deg"))?;
    let sat = parse_number(parts[1].strip_suffix('%')?)?;
    let light = parse_number(parts[2].strip_suffix('%')?)?;
    Some(Color::hsla(hue, sat, light, parse_alpha(parts.get(3))?))
}

fn named_color(name: &str) -> Option<Color> {
    let c = match name {
        "transparent" => Color::TRANSPARENT,
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb8(255, 0, 0),
        "green" => Color::rgb8(0, 128, 0),
        "lime" => Color::rgb8(0, 255, 0),
        "blue" => Color::rgb8(0, 0, 255),
        "yellow" => Color::rgb8(255, 255, 0),
        "cyan" | "aqua" => Color::rgb8(0, 255, 255),
        "magenta" | "fuchsia" => Color::rgb8(255, 0, 255),
        "gray" | "grey" => Color::rgb8(128, 128, 128),
        "silver" => Color::rgb8(192, 192, 192),
        "navy" => Color::rgb8(0, 0, 128),
        "purple" => Color::rgb8(128, 0, 128),
        "orange" => Color::rgb8(255, 165, 0),
        "pink" => Color::rgb8(255, 192, 203),
        "teal" => Color::rgb8(0, 128, 128),
        "maroon" => Color::rgb8(128, 0, 0),
        "olive" => Color::rgb8(128, 128, 0),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsla_primary_hues() {
        assert_eq!(Color::hsla(0.0, 100.0, 50.0, 1.0).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color::hsla(120.0, 100.0, 50.0, 1.0).to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(Color::hsla(240.0, 100.0, 50.0, 1.0).to_rgba8(), [0, 0, 255, 255]);
        // Hue wraps like CSS.
        assert_eq!(
            Color::hsla(360.0 + 120.0, 100.0, 50.0, 1.0).to_rgba8(),
            Color::hsla(120.0, 100.0, 50.0, 1.0).to_rgba8()
        );
    }

    #[test]
    fn hsla_zero_saturation_is_gray() {
        let c = Color::hsla(200.0, 0.0, 50.0, 0.5).to_rgba8();
        assert_eq!(c[0], c[1]);
        assert_eq!(c[1], c[2]);
        assert_eq!(c[3], 128);
    }

    #[test]
    fn hsla_matches_css_reference_values() {
        // hsl(30, 100%, 50%) is CSS orange-red #ff8000.
        assert_eq!(Color::hsla(30.0, 100.0, 50.0, 1.0).to_rgba8(), [255, 128, 0, 255]);
        assert_eq!(Color::hsla(0.0, 0.0, 100.0, 1.0).to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::hsla(-120.0, 100.0, 50.0, 1.0).to_rgba8(), [0, 0, 255, 255]);
    }

    #[test]
    fn hex_alpha_digits_are_read() {
        assert_eq!(parse_hex("f008").map(Color::to_rgba8), Some([255, 0, 0, 136]));
        assert_eq!(parse_hex("00ff0080").map(Color::to_rgba8), Some([0, 255, 0, 128]));
        assert_eq!(parse_hex("12345"), None);
    }

    #[test]
    fn split_args_handles_modern_syntax() {
        assert_eq!(split_args("10 20 30 / 50%"), vec!["10", "20", "30", "50%"]);
        assert_eq!(split_args("10, 20,30"), vec!["10", "20", "30"]);
    }
}
