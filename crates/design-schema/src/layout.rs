//! Auto-layout vocabulary shared by documents and the rendered scene

use serde::{Deserialize, Serialize};

/// Container layout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    /// Free (absolute) positioning
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl LayoutMode {
    pub fn is_auto_layout(self) -> bool {
        !matches!(self, LayoutMode::None)
    }
}

/// Alignment of children along the container's primary axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryAxisAlign {
    Min,
    Center,
    Max,
    SpaceBetween,
    /// Any value the host does not accept
    #[serde(other)]
    Unsupported,
}

/// Alignment of children along the container's cross axis.
///
/// `Stretch` is accepted on input because models frequently emit it, but it
/// is only meaningful as a child participation flag; containers never keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAxisAlign {
    Min,
    Center,
    Max,
    Baseline,
    Stretch,
    #[serde(other)]
    Unsupported,
}

impl CounterAxisAlign {
    /// Whether the host accepts this value on a container
    pub fn is_container_value(self) -> bool {
        matches!(
            self,
            CounterAxisAlign::Min
                | CounterAxisAlign::Center
                | CounterAxisAlign::Max
                | CounterAxisAlign::Baseline
        )
    }
}

/// Declared sizing intent for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizingIntent {
    /// Explicit size
    Fixed,
    /// Wrap content
    #[serde(alias = "AUTO")]
    Hug,
    /// Expand to the space the parent offers
    Fill,
}

/// How a child participates in its parent's cross axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChildAlign {
    #[default]
    Inherit,
    Stretch,
    Min,
    Center,
    Max,
    #[serde(other)]
    Unsupported,
}

/// Whether a child takes part in auto-layout flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutPositioning {
    #[default]
    Auto,
    Absolute,
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_alignment_is_tolerated() {
        let align: CounterAxisAlign = serde_json::from_str("\"SPACE_AROUND\"").unwrap();
        assert_eq!(align, CounterAxisAlign::Unsupported);
        let stretch: CounterAxisAlign = serde_json::from_str("\"STRETCH\"").unwrap();
        assert!(!stretch.is_container_value());
    }

    #[test]
    fn test_auto_is_hug() {
        let intent: SizingIntent = serde_json::from_str("\"AUTO\"").unwrap();
        assert_eq!(intent, SizingIntent::Hug);
    }
}
