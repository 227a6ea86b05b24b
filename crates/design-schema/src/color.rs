//! RGBA colors in the 0–1 channel range

use serde::{Deserialize, Serialize};

fn default_alpha() -> f64 {
    1.0
}

fn is_opaque(alpha: &f64) -> bool {
    (*alpha - 1.0).abs() < f64::EPSILON
}

/// A color with channels in the 0–1 range, as used by the host design tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha", skip_serializing_if = "is_opaque")]
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    /// Opaque color from 0–1 channels
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return None,
        };

        let channel = |i: usize| -> Option<f64> {
            let byte = u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok()?;
            Some(f64::from(byte) / 255.0)
        };

        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if expanded.len() == 8 { channel(6)? } else { 1.0 },
        })
    }

    /// Uppercase `#RRGGBB`; alpha is not encoded.
    pub fn to_hex(&self) -> String {
        let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }

    /// Same color with full alpha; hosts carry alpha as paint opacity
    pub fn opaque(&self) -> Self {
        Self { a: 1.0, ..*self }
    }

    /// Same color with every channel clamped into 0–1.
    pub fn clamped(&self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Rgba::from_hex("#18A0FB").unwrap();
        assert_eq!(color.to_hex(), "#18A0FB");
        assert!((color.r - 24.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_hex_and_alpha() {
        assert_eq!(Rgba::from_hex("fff").unwrap(), Rgba::WHITE);
        let translucent = Rgba::from_hex("#00000080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Rgba::from_hex("#12345").is_none());
        assert!(Rgba::from_hex("#GGGGGG").is_none());
    }

    #[test]
    fn test_alpha_defaults_to_opaque() {
        let color: Rgba = serde_json::from_str(r#"{"r":1,"g":0,"b":0}"#).unwrap();
        assert_eq!(color.a, 1.0);
        assert_eq!(serde_json::to_string(&color).unwrap(), r#"{"r":1.0,"g":0.0,"b":0.0}"#);
    }
}
