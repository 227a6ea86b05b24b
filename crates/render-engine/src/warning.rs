//! Non-fatal resolution outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of reference failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    ColorVariable,
    SpacingVariable,
    TextStyle,
    Font,
    Component,
    ComponentProperty,
    Alignment,
    /// A node failed to render and was left out
    Node,
}

/// A symbolic reference that did not resolve, and what was used instead.
///
/// Warnings never abort a render; they are logged and collected on the
/// rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionWarning {
    pub kind: WarningKind,
    /// Name of the node being rendered
    pub node: String,
    /// The reference as written in the document
    pub reference: String,
    /// What was used instead
    pub fallback: String,
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            WarningKind::ColorVariable => "color variable",
            WarningKind::SpacingVariable => "spacing variable",
            WarningKind::TextStyle => "text style",
            WarningKind::Font => "font",
            WarningKind::Component => "component",
            WarningKind::ComponentProperty => "component property",
            WarningKind::Alignment => "alignment",
            WarningKind::Node => "node",
        };
        write!(
            f,
            "{}: {} {:?} unresolved, using {}",
            self.node, kind, self.reference, self.fallback
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let warning = ResolutionWarning {
            kind: WarningKind::Component,
            node: "Header".into(),
            reference: "nonexistent-key".into(),
            fallback: "frame".into(),
        };
        assert_eq!(
            warning.to_string(),
            "Header: component \"nonexistent-key\" unresolved, using frame"
        );
    }
}
