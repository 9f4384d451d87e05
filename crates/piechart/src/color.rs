use derive_more::{Deref, From, Into};
use palette::{FromColor, Hsv, Srgb, Srgba};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An sRGB color with alpha, written as `#rrggbb` or `#rrggbbaa` in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, DeserializeFromStr, SerializeDisplay)]
pub struct Color(Srgba<f64>);

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const DARK_GRAY: Color = Color::rgba(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self(Srgba::new(red, green, blue, alpha))
    }

    pub fn components(&self) -> (f64, f64, f64, f64) {
        self.0.into_components()
    }

    /// Default slice color for `index`: hue steps every eight slices, saturation
    /// steps within each group of eight.
    pub fn for_slice(index: usize) -> Self {
        let hue = ((index / 8) % 20) as f64 / 20.0 + 0.02;
        let saturation = ((index % 8) + 3) as f64 / 10.0;
        let hsv: Hsv<palette::encoding::Srgb, f64> = Hsv::new(hue * 360.0, saturation, 0.91);
        let rgb: Srgb<f64> = Srgb::from_color(hsv);
        Self::rgba(rgb.red, rgb.green, rgb.blue, 1.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 6 or 8 hex digits, got {0:?}")]
    Length(String),
    #[error("invalid hex digits in {0:?}")]
    Digits(String),
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::Length(s.to_string()));
        }
        // from_str_radix alone would let a sign through
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::Digits(s.to_string()));
        }

        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .map(|v| v as f64 / 255.0)
                .ok_or_else(|| ColorParseError::Digits(s.to_string()))
        };

        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.components();
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))?;
        if byte(a) != u8::MAX {
            write!(f, "{:02x}", byte(a))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_deserialization() {
        let cases = vec![
            ("\"#ff0000\"", Color::rgba(1.0, 0.0, 0.0, 1.0)),
            ("\"00ff00\"", Color::rgba(0.0, 1.0, 0.0, 1.0)),
            ("\"#0000ff00\"", Color::rgba(0.0, 0.0, 1.0, 0.0)),
        ];

        for (json, expected) in cases {
            let deserialized: Color = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_color_rejects_malformed_input() {
        assert_eq!(
            "#fff".parse::<Color>(),
            Err(ColorParseError::Length("#fff".to_string()))
        );
        assert_eq!(
            "#gg0000".parse::<Color>(),
            Err(ColorParseError::Digits("#gg0000".to_string()))
        );
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }

    #[test]
    fn test_color_rejects_signed_channels() {
        for input in ["#+f+f+f", "+f+f+f", "#ff+fff", "##ffffff"] {
            assert!(input.parse::<Color>().is_err(), "{input} parsed");
        }
        assert_eq!(
            "#+f+f+f".parse::<Color>(),
            Err(ColorParseError::Digits("#+f+f+f".to_string()))
        );
    }

    #[test]
    fn test_color_display_is_parseable() {
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
        assert_eq!(Color::TRANSPARENT.to_string(), "#00000000");
        let parsed: Color = "#336699cc".parse().unwrap();
        assert_eq!(parsed.to_string(), "#336699cc");
    }

    #[test]
    fn test_slice_palette_cycles() {
        let first = Color::for_slice(0);
        let second = Color::for_slice(1);
        assert_ne!(first, second);
        assert_eq!(Color::for_slice(3), Color::for_slice(3));

        let (_, _, _, alpha) = first.components();
        assert_eq!(alpha, 1.0);
        // value 0.91 means the brightest channel sits at 0.91
        let (r, g, b, _) = Color::for_slice(5).components();
        assert!((r.max(g).max(b) - 0.91).abs() < 1e-9);
    }
}
