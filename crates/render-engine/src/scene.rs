//! Host scene surface
//!
//! The renderer never touches a concrete scene graph. It speaks to the host
//! design tool through [`SceneHost`]: create nodes, set properties, bind
//! properties to variables, attach and replace nodes, and read nodes back
//! for serialization.

use std::collections::BTreeMap;
use std::fmt;

use design_schema::{
    ChildAlign, CounterAxisAlign, EffectKind, LayoutMode, LayoutPositioning, Offset,
    PrimaryAxisAlign, Rgba, Side, TextAlign,
};
use design_tokens::{FontName, LetterSpacing, LineHeight};
use serde::{Deserialize, Serialize};

/// Host-assigned node identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Node kinds the host can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Frame,
    Text,
    Rectangle,
    Ellipse,
    Line,
    Instance,
}

impl NodeKind {
    /// Frames and instances can carry auto-layout and children
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Frame | NodeKind::Instance)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Frame => "FRAME",
            NodeKind::Text => "TEXT",
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Ellipse => "ELLIPSE",
            NodeKind::Line => "LINE",
            NodeKind::Instance => "INSTANCE",
        };
        f.write_str(name)
    }
}

/// Host sizing primitive for one auto-layout axis.
///
/// There is no FILL here: filling is expressed on the child through
/// `layoutGrow` (primary axis) or `layoutAlign = STRETCH` (counter axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisSizing {
    #[default]
    Fixed,
    Auto,
}

/// How a text node grows with its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAutoResize {
    None,
    /// Fixed width, height wraps
    Height,
    #[default]
    WidthAndHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgba,
}

/// A concrete paint as stored on a host node
#[derive(Debug, Clone, PartialEq)]
pub enum HostPaint {
    Solid {
        color: Rgba,
        opacity: f64,
        /// Variable the color is live-bound to
        bound_variable: Option<String>,
    },
    Gradient {
        kind: GradientKind,
        stops: Vec<ColorStop>,
        opacity: f64,
    },
}

impl HostPaint {
    pub fn solid(color: Rgba) -> Self {
        HostPaint::Solid {
            color,
            opacity: 1.0,
            bound_variable: None,
        }
    }

    pub fn bound_variable(&self) -> Option<&str> {
        match self {
            HostPaint::Solid { bound_variable, .. } => bound_variable.as_deref(),
            HostPaint::Gradient { .. } => None,
        }
    }
}

/// A concrete effect as stored on a host node
#[derive(Debug, Clone, PartialEq)]
pub struct HostEffect {
    pub kind: EffectKind,
    pub color: Rgba,
    pub offset: Offset,
    pub radius: f64,
    pub spread: f64,
}

/// Numeric fields that can be bound to a FLOAT variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindableField {
    Padding(Side),
    ItemSpacing,
    CornerRadius,
}

impl BindableField {
    pub fn name(self) -> &'static str {
        match self {
            BindableField::Padding(Side::Top) => "paddingTop",
            BindableField::Padding(Side::Right) => "paddingRight",
            BindableField::Padding(Side::Bottom) => "paddingBottom",
            BindableField::Padding(Side::Left) => "paddingLeft",
            BindableField::ItemSpacing => "itemSpacing",
            BindableField::CornerRadius => "cornerRadius",
        }
    }
}

/// One property assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Name(String),
    Resize { width: f64, height: f64 },
    Position { x: f64, y: f64 },
    Visible(bool),
    Opacity(f64),

    // container
    LayoutMode(LayoutMode),
    PrimaryAxisSizingMode(AxisSizing),
    CounterAxisSizingMode(AxisSizing),
    PrimaryAxisAlignItems(PrimaryAxisAlign),
    CounterAxisAlignItems(CounterAxisAlign),
    Padding(Side, f64),
    ItemSpacing(f64),
    ClipsContent(bool),

    // participation in the parent's auto-layout
    LayoutGrow(f64),
    LayoutAlign(ChildAlign),
    LayoutPositioning(LayoutPositioning),

    // appearance
    Fills(Vec<HostPaint>),
    Strokes(Vec<HostPaint>),
    StrokeWeight(f64),
    CornerRadius(f64),
    Effects(Vec<HostEffect>),

    // text
    FontName(FontName),
    FontSize(f64),
    LineHeight(LineHeight),
    LetterSpacing(LetterSpacing),
    TextAlignHorizontal(TextAlign),
    TextAutoResize(TextAutoResize),
    Characters(String),
    /// Apply a text style by id
    TextStyle(String),

    // instance
    ComponentProperties(BTreeMap<String, serde_json::Value>),
}

impl Property {
    /// Property name as the host spells it
    pub fn name(&self) -> &'static str {
        match self {
            Property::Name(_) => "name",
            Property::Resize { .. } => "size",
            Property::Position { .. } => "position",
            Property::Visible(_) => "visible",
            Property::Opacity(_) => "opacity",
            Property::LayoutMode(_) => "layoutMode",
            Property::PrimaryAxisSizingMode(_) => "primaryAxisSizingMode",
            Property::CounterAxisSizingMode(_) => "counterAxisSizingMode",
            Property::PrimaryAxisAlignItems(_) => "primaryAxisAlignItems",
            Property::CounterAxisAlignItems(_) => "counterAxisAlignItems",
            Property::Padding(..) => "padding",
            Property::ItemSpacing(_) => "itemSpacing",
            Property::ClipsContent(_) => "clipsContent",
            Property::LayoutGrow(_) => "layoutGrow",
            Property::LayoutAlign(_) => "layoutAlign",
            Property::LayoutPositioning(_) => "layoutPositioning",
            Property::Fills(_) => "fills",
            Property::Strokes(_) => "strokes",
            Property::StrokeWeight(_) => "strokeWeight",
            Property::CornerRadius(_) => "cornerRadius",
            Property::Effects(_) => "effects",
            Property::FontName(_) => "fontName",
            Property::FontSize(_) => "fontSize",
            Property::LineHeight(_) => "lineHeight",
            Property::LetterSpacing(_) => "letterSpacing",
            Property::TextAlignHorizontal(_) => "textAlignHorizontal",
            Property::TextAutoResize(_) => "textAutoResize",
            Property::Characters(_) => "characters",
            Property::TextStyle(_) => "textStyleId",
            Property::ComponentProperties(_) => "componentProperties",
        }
    }
}

/// Text-node state
#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    pub characters: String,
    pub font: FontName,
    pub font_size: f64,
    pub line_height: LineHeight,
    pub letter_spacing: LetterSpacing,
    pub align: TextAlign,
    pub auto_resize: TextAutoResize,
    pub text_style_id: Option<String>,
}

/// Padding of a container, per side
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SidePadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl SidePadding {
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set(&mut self, side: Side, value: f64) {
        match side {
            Side::Top => self.top = value,
            Side::Right => self.right = value,
            Side::Bottom => self.bottom = value,
            Side::Left => self.left = value,
        }
    }
}

/// Snapshot of a host node, as returned by [`SceneHost::read_node`]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    pub opacity: f64,

    pub layout_mode: LayoutMode,
    pub primary_axis_sizing_mode: AxisSizing,
    pub counter_axis_sizing_mode: AxisSizing,
    pub primary_axis_align_items: PrimaryAxisAlign,
    pub counter_axis_align_items: CounterAxisAlign,
    pub padding: SidePadding,
    pub item_spacing: f64,
    pub clips_content: bool,

    pub layout_grow: f64,
    pub layout_align: ChildAlign,
    pub layout_positioning: LayoutPositioning,

    pub fills: Vec<HostPaint>,
    pub strokes: Vec<HostPaint>,
    pub stroke_weight: f64,
    pub corner_radius: f64,
    pub effects: Vec<HostEffect>,

    /// Numeric fields bound to variables (variable ids)
    pub bound_variables: BTreeMap<BindableField, String>,

    pub text: Option<TextData>,

    pub component_key: Option<String>,
    pub component_properties: BTreeMap<String, serde_json::Value>,
}

impl SceneNode {
    /// Primary axis sizing expressed per screen axis
    pub fn axis_sizing(&self, horizontal: bool) -> AxisSizing {
        let primary_is_horizontal = self.layout_mode == LayoutMode::Horizontal;
        if horizontal == primary_is_horizontal {
            self.primary_axis_sizing_mode
        } else {
            self.counter_axis_sizing_mode
        }
    }
}

/// Error types for host scene operations
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Property '{property}' is not supported on {kind} nodes")]
    UnsupportedProperty { property: &'static str, kind: NodeKind },

    #[error("Font {0} must be loaded before it is used")]
    FontNotLoaded(FontName),

    #[error("Font {0} is not available")]
    FontUnavailable(FontName),

    #[error("Unknown component key: {0}")]
    UnknownComponent(String),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown text style: {0}")]
    UnknownTextStyle(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// The host design tool as the renderer and serializer see it.
pub trait SceneHost {
    // ─── CREATION ───────────────────────────────────────────────────

    /// Create a detached node of `kind` (instances go through `create_instance`)
    fn create_node(&mut self, kind: NodeKind) -> Result<NodeId, SceneError>;

    /// Create an instance of the component with `key`
    fn create_instance(&mut self, component_key: &str) -> Result<NodeId, SceneError>;

    // ─── MUTATION ───────────────────────────────────────────────────

    fn set_property(&mut self, node: &NodeId, property: Property) -> Result<(), SceneError>;

    /// Bind a numeric field to a FLOAT variable by id
    fn bind_variable(
        &mut self,
        node: &NodeId,
        field: BindableField,
        variable_id: &str,
    ) -> Result<(), SceneError>;

    /// Make a font usable; must succeed before text using it is edited
    fn load_font(&mut self, font: &FontName) -> Result<(), SceneError>;

    /// Attach `child` as the last child of `parent`
    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), SceneError>;

    /// Put `new` where `old` is (same parent, index and position), then remove `old`
    fn replace_node(&mut self, old: &NodeId, new: &NodeId) -> Result<(), SceneError>;

    /// Remove a node and its subtree
    fn remove_node(&mut self, node: &NodeId) -> Result<(), SceneError>;

    // ─── SELECTION & VIEWPORT ───────────────────────────────────────

    fn set_selection(&mut self, nodes: &[NodeId]) -> Result<(), SceneError>;

    /// Scroll and zoom the viewport onto `nodes`
    fn focus(&mut self, nodes: &[NodeId]) -> Result<(), SceneError>;

    fn selection(&self) -> Vec<NodeId>;

    // ─── READ ───────────────────────────────────────────────────────

    fn read_node(&self, node: &NodeId) -> Result<SceneNode, SceneError>;
}
