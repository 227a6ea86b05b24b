//! Fills, strokes and effects

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Paint kind for a fill or stroke slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    #[default]
    Solid,
    GradientLinear,
    GradientRadial,
    /// Image and other host paints are never generated
    #[serde(other)]
    Unsupported,
}

/// A fill or stroke.
///
/// `color_variable` is authoritative when it resolves; `color` is the
/// fallback literal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: PaintKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gradient_stops: Vec<GradientStop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Paint {
    /// Solid literal color
    pub fn solid(color: Rgba) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    /// Solid paint referencing a color variable by name
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            color_variable: Some(name.into()),
            ..Default::default()
        }
    }

    /// Invisible paints are dropped before rendering
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

/// One stop of a gradient
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradientStop {
    pub position: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_variable: Option<String>,
}

/// Effect kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Unsupported,
}

impl EffectKind {
    pub fn is_shadow(self) -> bool {
        matches!(self, EffectKind::DropShadow | EffectKind::InnerShadow)
    }
}

/// 2D offset for shadows
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// A shadow or blur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl Effect {
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_defaults_to_solid() {
        let paint: Paint = serde_json::from_str(r#"{"colorVariable":"Primary/500"}"#).unwrap();
        assert_eq!(paint.kind, PaintKind::Solid);
        assert_eq!(paint.color_variable.as_deref(), Some("Primary/500"));
        assert!(paint.is_visible());
    }

    #[test]
    fn test_hidden_effect() {
        let effect: Effect =
            serde_json::from_str(r#"{"type":"DROP_SHADOW","radius":4,"visible":false}"#).unwrap();
        assert!(effect.kind.is_shadow());
        assert!(!effect.is_visible());
    }

    #[test]
    fn test_image_paint_is_unsupported() {
        let paint: Paint = serde_json::from_str(r#"{"type":"IMAGE"}"#).unwrap();
        assert_eq!(paint.kind, PaintKind::Unsupported);
    }
}
