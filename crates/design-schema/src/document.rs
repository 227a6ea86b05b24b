//! Root design document and the property groups shared with elements

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::layout::{CounterAxisAlign, LayoutMode, PrimaryAxisAlign, SizingIntent};
use crate::paint::{Effect, Paint};

/// Target frame size for a generated screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One side of a padded container
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// Padding, either literal or by spacing-variable name.
///
/// Per-side fields override the uniform `padding` / `padding_variable`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Padding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top_variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right_variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom_variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left_variable: Option<String>,
}

impl Padding {
    /// Literal value declared for a side
    pub fn literal(&self, side: Side) -> Option<f64> {
        let specific = match side {
            Side::Top => self.padding_top,
            Side::Right => self.padding_right,
            Side::Bottom => self.padding_bottom,
            Side::Left => self.padding_left,
        };
        specific.or(self.padding)
    }

    /// Spacing-variable name declared for a side
    pub fn variable(&self, side: Side) -> Option<&str> {
        let specific = match side {
            Side::Top => self.padding_top_variable.as_deref(),
            Side::Right => self.padding_right_variable.as_deref(),
            Side::Bottom => self.padding_bottom_variable.as_deref(),
            Side::Left => self.padding_left_variable.as_deref(),
        };
        specific.or(self.padding_variable.as_deref())
    }

    /// Set one side's literal value
    pub fn set_literal(&mut self, side: Side, value: f64) {
        match side {
            Side::Top => self.padding_top = Some(value),
            Side::Right => self.padding_right = Some(value),
            Side::Bottom => self.padding_bottom = Some(value),
            Side::Left => self.padding_left = Some(value),
        }
    }

    /// Set one side's variable reference
    pub fn set_variable(&mut self, side: Side, name: String) {
        match side {
            Side::Top => self.padding_top_variable = Some(name),
            Side::Right => self.padding_right_variable = Some(name),
            Side::Bottom => self.padding_bottom_variable = Some(name),
            Side::Left => self.padding_left_variable = Some(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Padding::default()
    }
}

/// Auto-layout properties of a container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_axis_align_items: Option<PrimaryAxisAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_axis_align_items: Option<CounterAxisAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_axis_sizing_mode: Option<SizingIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_axis_sizing_mode: Option<SizingIntent>,
    #[serde(flatten)]
    pub padding: Padding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_spacing_variable: Option<String>,
}

/// Visual properties shared by every node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appearance {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clips_content: Option<bool>,
}

/// The root of a generated (or serialized) design.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub layout: ContainerLayout,
    #[serde(flatten)]
    pub appearance: Appearance,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl DesignDocument {
    /// Number of elements in the tree, root excluded
    pub fn element_count(&self) -> usize {
        self.children.iter().map(Element::subtree_size).sum()
    }

    /// Serialize to compact JSON (used as prior-document context)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_side_overrides_uniform() {
        let padding = Padding {
            padding: Some(16.0),
            padding_top: Some(24.0),
            padding_variable: Some("Spacing/md".into()),
            padding_left_variable: Some("Spacing/lg".into()),
            ..Default::default()
        };
        assert_eq!(padding.literal(Side::Top), Some(24.0));
        assert_eq!(padding.literal(Side::Bottom), Some(16.0));
        assert_eq!(padding.variable(Side::Left), Some("Spacing/lg"));
        assert_eq!(padding.variable(Side::Right), Some("Spacing/md"));
    }

    #[test]
    fn test_document_flattened_fields() {
        let doc: DesignDocument = serde_json::from_str(
            r#"{
                "name": "Screen",
                "layoutMode": "VERTICAL",
                "paddingTop": 8,
                "itemSpacingVariable": "Spacing/sm",
                "fills": [{"type": "SOLID", "color": {"r": 1, "g": 1, "b": 1}}],
                "children": []
            }"#,
        )
        .unwrap();
        assert_eq!(doc.layout.layout_mode, Some(LayoutMode::Vertical));
        assert_eq!(doc.layout.padding.padding_top, Some(8.0));
        assert_eq!(doc.layout.item_spacing_variable.as_deref(), Some("Spacing/sm"));
        assert_eq!(doc.appearance.fills.len(), 1);
    }

    #[test]
    fn test_minimal_serialization_omits_absent_fields() {
        let doc = DesignDocument {
            name: "Empty".into(),
            ..Default::default()
        };
        assert_eq!(doc.to_json().unwrap(), r#"{"name":"Empty","children":[]}"#);
    }
}
