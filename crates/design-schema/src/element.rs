//! Element tree nodes
//!
//! `Element` is a closed sum type over the node kinds the renderer knows.
//! On the wire it is a flat JSON object discriminated by `"type"`; the
//! conversion goes through [`ElementWire`] so that a missing or unexpected
//! `type` never fails the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Appearance, ContainerLayout};
use crate::layout::{ChildAlign, LayoutPositioning, SizingIntent, TextAlign};

/// How a node participates in its parent's auto-layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChildLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_sizing_horizontal: Option<SizingIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_sizing_vertical: Option<SizingIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_align: Option<ChildAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_grow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_positioning: Option<LayoutPositioning>,
}

/// Properties every element carries, regardless of kind
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(flatten)]
    pub layout: ContainerLayout,
    #[serde(flatten)]
    pub child: ChildLayout,
    #[serde(flatten)]
    pub appearance: Appearance,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

/// Font weight as emitted by models: `700`, `700.0` or `"Bold"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    #[serde(deserialize_with = "numeric_weight")]
    Numeric(u16),
    Named(String),
}

/// Any JSON number, rounded to the nearest whole weight
fn numeric_weight<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(whole_weight)
}

fn whole_weight(weight: f64) -> u16 {
    weight.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

impl FontWeight {
    /// Host font style name for this weight (e.g. 600 → "Semi Bold")
    pub fn style_name(&self) -> String {
        match self {
            FontWeight::Named(name) => match name.trim().parse::<f64>() {
                Ok(weight) if weight.is_finite() => FontWeight::Numeric(whole_weight(weight)).style_name(),
                _ => name.clone(),
            },
            FontWeight::Numeric(weight) => match weight {
                0..=149 => "Thin",
                150..=249 => "Extra Light",
                250..=349 => "Light",
                350..=449 => "Regular",
                450..=549 => "Medium",
                550..=649 => "Semi Bold",
                650..=749 => "Bold",
                750..=849 => "Extra Bold",
                _ => "Black",
            }
            .to_string(),
        }
    }
}

/// Text-specific properties
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextProps {
    pub characters: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    /// Explicit host style name; wins over `font_weight`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<TextAlign>,
    /// Named text style; wins over direct font properties when it resolves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style_name: Option<String>,
}

impl TextProps {
    /// Style name derived from `font_style`, then `font_weight`
    pub fn requested_style(&self) -> Option<String> {
        self.font_style
            .clone()
            .or_else(|| self.font_weight.as_ref().map(FontWeight::style_name))
    }
}

/// Component instance reference
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_properties: BTreeMap<String, serde_json::Value>,
}

/// The kind-specific part of an element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Frame,
    Text(TextProps),
    Rectangle,
    Ellipse,
    Line,
    Instance(InstanceProps),
    /// A `type` the renderer does not know; rendered as a frame
    Unknown(String),
}

impl ElementKind {
    /// Wire value of the `type` discriminator
    pub fn type_name(&self) -> &str {
        match self {
            ElementKind::Frame => "FRAME",
            ElementKind::Text(_) => "TEXT",
            ElementKind::Rectangle => "RECTANGLE",
            ElementKind::Ellipse => "ELLIPSE",
            ElementKind::Line => "LINE",
            ElementKind::Instance(_) => "INSTANCE",
            ElementKind::Unknown(name) => name,
        }
    }
}

/// A node of the design tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementWire", into = "ElementWire")]
pub struct Element {
    pub props: NodeProps,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            props: NodeProps::default(),
            kind,
        }
    }

    /// Text element with the given content
    pub fn text(characters: impl Into<String>) -> Self {
        Self::new(ElementKind::Text(TextProps {
            characters: characters.into(),
            ..Default::default()
        }))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.props.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.props.children = children;
        self
    }

    /// This element plus all of its descendants
    pub fn subtree_size(&self) -> usize {
        1 + self
            .props
            .children
            .iter()
            .map(Element::subtree_size)
            .sum::<usize>()
    }

    /// Display name, falling back to the kind
    pub fn display_name(&self) -> &str {
        self.props
            .name
            .as_deref()
            .unwrap_or_else(|| self.kind.type_name())
    }
}

/// Flat wire form of an element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementWire {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(flatten)]
    props: NodeProps,
    #[serde(flatten)]
    text: TextWire,
    #[serde(flatten)]
    instance: InstanceProps,
}

/// Text fields as optional wire values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TextWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    characters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_align_horizontal: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_style_name: Option<String>,
}

impl From<TextWire> for TextProps {
    fn from(wire: TextWire) -> Self {
        Self {
            characters: wire.characters.unwrap_or_default(),
            font_family: wire.font_family,
            font_weight: wire.font_weight,
            font_style: wire.font_style,
            font_size: wire.font_size,
            line_height: wire.line_height,
            letter_spacing: wire.letter_spacing,
            text_align_horizontal: wire.text_align_horizontal,
            text_style_name: wire.text_style_name,
        }
    }
}

impl From<TextProps> for TextWire {
    fn from(props: TextProps) -> Self {
        Self {
            characters: Some(props.characters),
            font_family: props.font_family,
            font_weight: props.font_weight,
            font_style: props.font_style,
            font_size: props.font_size,
            line_height: props.line_height,
            letter_spacing: props.letter_spacing,
            text_align_horizontal: props.text_align_horizontal,
            text_style_name: props.text_style_name,
        }
    }
}

impl From<ElementWire> for Element {
    fn from(wire: ElementWire) -> Self {
        let declared = wire.kind.as_deref().map(|k| k.trim().to_ascii_uppercase());
        let kind = match declared.as_deref() {
            Some("FRAME") | Some("GROUP") | Some("COMPONENT") | Some("SECTION") => {
                ElementKind::Frame
            }
            Some("TEXT") => ElementKind::Text(wire.text.into()),
            Some("RECTANGLE") => ElementKind::Rectangle,
            Some("ELLIPSE") => ElementKind::Ellipse,
            Some("LINE") | Some("DIVIDER") => ElementKind::Line,
            Some("INSTANCE") => ElementKind::Instance(wire.instance),
            Some(other) => ElementKind::Unknown(other.to_string()),
            None if wire.text.characters.is_some() => ElementKind::Text(wire.text.into()),
            None => ElementKind::Frame,
        };
        Self {
            props: wire.props,
            kind,
        }
    }
}

impl From<Element> for ElementWire {
    fn from(element: Element) -> Self {
        let mut wire = ElementWire {
            kind: Some(element.kind.type_name().to_string()),
            props: element.props,
            ..Default::default()
        };
        match element.kind {
            ElementKind::Text(text) => wire.text = text.into(),
            ElementKind::Instance(instance) => wire.instance = instance,
            _ => {}
        }
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutMode;

    #[test]
    fn test_typed_variants() {
        let element: Element = serde_json::from_str(
            r#"{"type":"FRAME","name":"Row","layoutMode":"HORIZONTAL","children":[
                {"type":"TEXT","characters":"Hello","fontWeight":700,"textStyleName":"Body"},
                {"type":"INSTANCE","componentKey":"abc","componentProperties":{"Label":"Go"}},
                {"type":"ellipse","width":8,"height":8}
            ]}"#,
        )
        .unwrap();

        assert_eq!(element.kind, ElementKind::Frame);
        assert_eq!(element.props.layout.layout_mode, Some(LayoutMode::Horizontal));
        assert_eq!(element.subtree_size(), 4);

        match &element.props.children[0].kind {
            ElementKind::Text(text) => {
                assert_eq!(text.characters, "Hello");
                assert_eq!(text.requested_style().as_deref(), Some("Bold"));
                assert_eq!(text.text_style_name.as_deref(), Some("Body"));
            }
            other => panic!("expected text, got {:?}", other),
        }
        match &element.props.children[1].kind {
            ElementKind::Instance(instance) => {
                assert_eq!(instance.component_key.as_deref(), Some("abc"));
                assert_eq!(instance.component_properties.len(), 1);
            }
            other => panic!("expected instance, got {:?}", other),
        }
        assert_eq!(element.props.children[2].kind, ElementKind::Ellipse);
    }

    #[test]
    fn test_missing_type_is_inferred() {
        let text: Element = serde_json::from_str(r#"{"characters":"Hi"}"#).unwrap();
        assert!(matches!(text.kind, ElementKind::Text(_)));

        let frame: Element = serde_json::from_str(r#"{"name":"Box"}"#).unwrap();
        assert_eq!(frame.kind, ElementKind::Frame);
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let element: Element = serde_json::from_str(r#"{"type":"VECTOR","name":"Icon"}"#).unwrap();
        assert_eq!(element.kind, ElementKind::Unknown("VECTOR".into()));
        assert_eq!(element.display_name(), "Icon");
    }

    #[test]
    fn test_serialization_is_flat() {
        let element = Element::text("Sign in").with_name("Label");
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "TEXT");
        assert_eq!(json["characters"], "Sign in");
        assert_eq!(json["name"], "Label");
        assert!(json.get("children").is_none());
        assert!(json.get("componentKey").is_none());
    }

    #[test]
    fn test_font_weight_names() {
        assert_eq!(FontWeight::Numeric(400).style_name(), "Regular");
        assert_eq!(FontWeight::Numeric(600).style_name(), "Semi Bold");
        assert_eq!(FontWeight::Named("Medium".into()).style_name(), "Medium");
    }

    #[test]
    fn test_fractional_font_weight_is_rounded() {
        let text: Element =
            serde_json::from_str(r#"{"type":"TEXT","characters":"Hi","fontWeight":700.0}"#).unwrap();
        let ElementKind::Text(props) = &text.kind else {
            panic!("expected text");
        };
        assert_eq!(props.font_weight, Some(FontWeight::Numeric(700)));
        assert_eq!(props.font_weight.as_ref().unwrap().style_name(), "Bold");

        let weight: FontWeight = serde_json::from_str("549.6").unwrap();
        assert_eq!(weight, FontWeight::Numeric(550));
        let weight: FontWeight = serde_json::from_str("-3").unwrap();
        assert_eq!(weight, FontWeight::Numeric(0));
        assert_eq!(FontWeight::Named(" 600 ".into()).style_name(), "Semi Bold");
    }
}
