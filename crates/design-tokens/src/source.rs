//! Host-document read surface for design-system entities
//!
//! The host owns variables, styles and components; this crate only reads
//! them through [`DesignSystemSource`].

use std::collections::BTreeMap;

use design_schema::Rgba;
use serde::{Deserialize, Serialize};

/// Errors reading design-system data from the host
#[derive(Debug, thiserror::Error)]
pub enum TokenSourceError {
    #[error("Host read failed: {0}")]
    Host(String),

    #[error("Invalid design system data: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Variable data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    Color,
    Float,
    String,
    Boolean,
}

/// A variable's stored value for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum VariableValue {
    Color(Rgba),
    Float(f64),
    String(String),
    Boolean(bool),
    /// Reference to another variable by id
    Alias(String),
}

impl VariableValue {
    pub fn is_alias(&self) -> bool {
        matches!(self, VariableValue::Alias(_))
    }
}

/// A variable collection with its modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    pub id: String,
    pub name: String,
    pub default_mode_id: String,
}

/// A host variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    pub collection_id: String,
    pub resolved_type: VariableType,
    pub values_by_mode: BTreeMap<String, VariableValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Font family + style, as the host identifies a font
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl std::fmt::Display for FontName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// Line height of a text style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineHeight {
    Auto,
    Pixels(f64),
    Percent(f64),
}

/// Letter spacing of a text style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LetterSpacing {
    Pixels(f64),
    Percent(f64),
}

/// A local text style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub id: String,
    pub name: String,
    pub font: FontName,
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<LineHeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<LetterSpacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A local component that instances can reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Read access to the host document's design system
pub trait DesignSystemSource {
    /// All local variable collections
    fn variable_collections(&self) -> Result<Vec<VariableCollection>, TokenSourceError>;

    /// All local variables, across collections
    fn variables(&self) -> Result<Vec<Variable>, TokenSourceError>;

    /// All local text styles
    fn text_styles(&self) -> Result<Vec<TextStyle>, TokenSourceError>;

    /// All local components
    fn components(&self) -> Result<Vec<Component>, TokenSourceError>;
}

/// Plain design-system data, e.g. loaded from a JSON export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSystemData {
    pub collections: Vec<VariableCollection>,
    pub variables: Vec<Variable>,
    pub text_styles: Vec<TextStyle>,
    pub components: Vec<Component>,
}

impl DesignSystemData {
    pub fn from_json(json: &str) -> Result<Self, TokenSourceError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DesignSystemSource for DesignSystemData {
    fn variable_collections(&self) -> Result<Vec<VariableCollection>, TokenSourceError> {
        Ok(self.collections.clone())
    }

    fn variables(&self) -> Result<Vec<Variable>, TokenSourceError> {
        Ok(self.variables.clone())
    }

    fn text_styles(&self) -> Result<Vec<TextStyle>, TokenSourceError> {
        Ok(self.text_styles.clone())
    }

    fn components(&self) -> Result<Vec<Component>, TokenSourceError> {
        Ok(self.components.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_from_json() {
        let data = DesignSystemData::from_json(
            r#"{
                "collections": [{"id": "c1", "name": "Tokens", "defaultModeId": "m1"}],
                "variables": [{
                    "id": "v1", "name": "Primary/500", "collectionId": "c1",
                    "resolvedType": "COLOR",
                    "valuesByMode": {"m1": {"kind": "color", "value": {"r": 0.2, "g": 0.4, "b": 1}}}
                }],
                "textStyles": [{
                    "id": "s1", "name": "Body", "font": {"family": "Inter", "style": "Regular"},
                    "fontSize": 16, "lineHeight": {"unit": "PIXELS", "value": 24}
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(data.variables.len(), 1);
        assert_eq!(
            data.text_styles[0].line_height,
            Some(LineHeight::Pixels(24.0))
        );
        assert!(data.components().unwrap().is_empty());
    }
}
