//! Shared test fixtures

use std::collections::BTreeMap;

use design_schema::Rgba;
use design_tokens::{
    Component, DesignSystemData, FontName, IndexLimits, LineHeight, TextStyle, TokenIndex,
    Variable, VariableCollection, VariableType, VariableValue,
};

use crate::memory::MemoryScene;

fn variable(id: &str, name: &str, resolved_type: VariableType, value: VariableValue) -> Variable {
    Variable {
        id: id.into(),
        name: name.into(),
        collection_id: "tokens".into(),
        resolved_type,
        values_by_mode: BTreeMap::from([("tokens-mode".to_string(), value)]),
        description: None,
    }
}

/// A small design system: one color, two spacing tokens, one text style and
/// one component
pub fn design_system() -> DesignSystemData {
    DesignSystemData {
        collections: vec![VariableCollection {
            id: "tokens".into(),
            name: "Tokens".into(),
            default_mode_id: "tokens-mode".into(),
        }],
        variables: vec![
            variable(
                "VariableID:primary",
                "Primary/500",
                VariableType::Color,
                VariableValue::Color(Rgba::from_hex("#3366FF").unwrap()),
            ),
            variable(
                "VariableID:space-md",
                "Spacing/md",
                VariableType::Float,
                VariableValue::Float(16.0),
            ),
            variable(
                "VariableID:space-sm",
                "Spacing/sm",
                VariableType::Float,
                VariableValue::Float(8.0),
            ),
        ],
        text_styles: vec![TextStyle {
            id: "S:body".into(),
            name: "Typography/Body/Regular".into(),
            font: FontName::new("Inter", "Regular"),
            font_size: 16.0,
            line_height: Some(LineHeight::Pixels(24.0)),
            letter_spacing: None,
            description: None,
        }],
        components: vec![Component {
            key: "btn-key".into(),
            name: "Button/Primary".into(),
            description: None,
        }],
    }
}

/// Scene seeded with [`design_system`] and its index
pub fn scene() -> (MemoryScene, TokenIndex) {
    let data = design_system();
    let index = TokenIndex::build(&data, &IndexLimits::default()).unwrap();
    (MemoryScene::new(data), index)
}
