//! In-memory host scene
//!
//! `MemoryScene` implements both host surfaces ([`SceneHost`] and
//! [`DesignSystemSource`]) without a design tool. It enforces the host rules
//! the renderer must respect:
//! - a font must be loaded before it is assigned or its text is edited
//! - text-only properties are rejected on non-text nodes, container-only
//!   properties on leaf nodes
//! - instances can only be created for known component keys
//! - bindings must name an existing variable of the right type
//!
//! Auto-layout frames report hugged sizes when read, so sizing behaviour can
//! be asserted in tests.

use std::collections::{HashMap, HashSet};

use design_schema::{
    ChildAlign, CounterAxisAlign, LayoutMode, LayoutPositioning, PrimaryAxisAlign, Rgba, TextAlign,
};
use design_tokens::{
    Component, DesignSystemData, DesignSystemSource, FontName, LetterSpacing, LineHeight,
    TextStyle, TokenSourceError, Variable, VariableCollection, VariableType,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::constants::{defaults, fonts};
use crate::scene::{
    AxisSizing, BindableField, HostPaint, NodeId, NodeKind, Property, SceneError, SceneHost,
    SceneNode, SidePadding, TextAutoResize, TextData,
};

/// Average glyph advance as a fraction of the font size
const GLYPH_WIDTH_RATIO: f64 = 0.55;
/// Line height used for `LineHeight::Auto`
const AUTO_LINE_HEIGHT_RATIO: f64 = 1.2;

/// Seed file for a scene: the document's design system plus extra fonts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneSeed {
    pub design_system: DesignSystemData,
    pub fonts: Vec<FontName>,
}

/// A scene graph held in memory
#[derive(Debug, Clone)]
pub struct MemoryScene {
    design_system: DesignSystemData,
    nodes: HashMap<NodeId, SceneNode>,
    /// Top-level nodes in page order
    page: Vec<NodeId>,
    selection: Vec<NodeId>,
    focused: Vec<NodeId>,
    available_fonts: HashSet<FontName>,
    loaded_fonts: HashSet<FontName>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new(DesignSystemData::default())
    }
}

impl MemoryScene {
    /// Scene with the standard font set plus every text style's font
    pub fn new(design_system: DesignSystemData) -> Self {
        let mut available_fonts: HashSet<FontName> = fonts::INSTALLED
            .iter()
            .flat_map(|(family, styles)| styles.iter().map(|style| FontName::new(*family, *style)))
            .collect();
        available_fonts.extend(design_system.text_styles.iter().map(|s| s.font.clone()));

        Self {
            design_system,
            nodes: HashMap::new(),
            page: Vec::new(),
            selection: Vec::new(),
            focused: Vec::new(),
            available_fonts,
            loaded_fonts: HashSet::new(),
        }
    }

    pub fn from_seed(seed: SceneSeed) -> Self {
        let mut scene = Self::new(seed.design_system);
        scene.available_fonts.extend(seed.fonts);
        scene
    }

    /// Parse a JSON seed (`{"designSystem": {...}, "fonts": [...]}`)
    pub fn from_json(json: &str) -> Result<Self, TokenSourceError> {
        let seed: SceneSeed = serde_json::from_str(json)?;
        Ok(Self::from_seed(seed))
    }

    /// Restrict the installed fonts (tests use this to force fallbacks)
    pub fn with_fonts(mut self, fonts: impl IntoIterator<Item = FontName>) -> Self {
        self.available_fonts = fonts.into_iter().collect();
        self
    }

    pub fn design_system(&self) -> &DesignSystemData {
        &self.design_system
    }

    /// Top-level nodes in page order
    pub fn page_nodes(&self) -> &[NodeId] {
        &self.page
    }

    /// Nodes the viewport was last focused on
    pub fn focused(&self) -> &[NodeId] {
        &self.focused
    }

    pub fn is_font_loaded(&self, font: &FontName) -> bool {
        self.loaded_fonts.contains(font)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: &NodeId) -> Result<&SceneNode, SceneError> {
        self.nodes
            .get(id)
            .ok_or_else(|| SceneError::NodeNotFound(id.clone()))
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut SceneNode, SceneError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| SceneError::NodeNotFound(id.clone()))
    }

    fn variable(&self, id: &str) -> Option<&Variable> {
        self.design_system.variables.iter().find(|v| v.id == id)
    }

    fn insert_node(&mut self, kind: NodeKind, component_key: Option<String>) -> NodeId {
        let id = NodeId(format!("node-{}", Uuid::new_v4()));
        let node = new_node(id.clone(), kind, component_key);
        self.nodes.insert(id.clone(), node);
        self.page.push(id.clone());
        id
    }

    /// Remove `id` from its parent's children or from the page
    fn detach(&mut self, id: &NodeId) -> Option<(Option<NodeId>, usize)> {
        let parent = self.nodes.get(id)?.parent.clone();
        let siblings = match &parent {
            Some(parent_id) => &mut self.nodes.get_mut(parent_id)?.children,
            None => &mut self.page,
        };
        let index = siblings.iter().position(|c| c == id)?;
        siblings.remove(index);
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        Some((parent, index))
    }

    /// Delete a detached node and everything under it
    fn drop_subtree(&mut self, id: &NodeId) {
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
        }
        self.selection.retain(|s| self.nodes.contains_key(s));
        self.focused.retain(|s| self.nodes.contains_key(s));
    }

    fn is_ancestor(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent.clone());
        while let Some(id) = current {
            if &id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent.clone());
        }
        false
    }

    fn require_kind(
        &self,
        id: &NodeId,
        property: &Property,
        allowed: impl Fn(NodeKind) -> bool,
    ) -> Result<NodeKind, SceneError> {
        let kind = self.node(id)?.kind;
        if allowed(kind) {
            Ok(kind)
        } else {
            Err(SceneError::UnsupportedProperty {
                property: property.name(),
                kind,
            })
        }
    }

    fn require_loaded(&self, font: &FontName) -> Result<(), SceneError> {
        if self.loaded_fonts.contains(font) {
            Ok(())
        } else {
            Err(SceneError::FontNotLoaded(font.clone()))
        }
    }

    fn current_font(&self, id: &NodeId) -> Result<FontName, SceneError> {
        self.node(id)?
            .text
            .as_ref()
            .map(|t| t.font.clone())
            .ok_or_else(|| SceneError::InvalidOperation(format!("{} is not a text node", id)))
    }

    fn check_paints(&self, paints: &[HostPaint]) -> Result<(), SceneError> {
        for paint in paints {
            if let Some(variable_id) = paint.bound_variable() {
                match self.variable(variable_id) {
                    Some(v) if v.resolved_type == VariableType::Color => {}
                    Some(_) => {
                        return Err(SceneError::InvalidOperation(format!(
                            "variable {} is not a color",
                            variable_id
                        )))
                    }
                    None => return Err(SceneError::UnknownVariable(variable_id.to_string())),
                }
            }
        }
        Ok(())
    }

    // ─── LAYOUT MEASUREMENT ─────────────────────────────────────────

    /// Size of a node as the host would report it, after hugging, stretching
    /// and growing.
    fn measure(&self, node: &SceneNode) -> (f64, f64) {
        let (mut width, mut height) = self.intrinsic_size(node);

        let Some(parent) = node.parent.as_ref().and_then(|p| self.nodes.get(p)) else {
            return (width, height);
        };
        if !parent.layout_mode.is_auto_layout()
            || node.layout_positioning == LayoutPositioning::Absolute
        {
            return (width, height);
        }

        let parent_horizontal = parent.layout_mode == LayoutMode::Horizontal;
        let padding = parent.padding;

        if node.layout_align == ChildAlign::Stretch
            && parent.counter_axis_sizing_mode == AxisSizing::Fixed
        {
            if parent_horizontal {
                height = (parent.height - padding.top - padding.bottom).max(0.0);
            } else {
                width = (parent.width - padding.left - padding.right).max(0.0);
            }
        }

        if node.layout_grow > 0.0 && parent.primary_axis_sizing_mode == AxisSizing::Fixed {
            let in_flow: Vec<&SceneNode> = parent
                .children
                .iter()
                .filter_map(|c| self.nodes.get(c))
                .filter(|c| c.visible && c.layout_positioning == LayoutPositioning::Auto)
                .collect();
            let main = |size: (f64, f64)| if parent_horizontal { size.0 } else { size.1 };

            let fixed_total: f64 = in_flow
                .iter()
                .filter(|c| c.layout_grow <= 0.0)
                .map(|c| main(self.intrinsic_size(c)))
                .sum();
            let total_grow: f64 = in_flow.iter().map(|c| c.layout_grow.max(0.0)).sum();
            let gaps = parent.item_spacing * in_flow.len().saturating_sub(1) as f64;
            let available = if parent_horizontal {
                parent.width - padding.left - padding.right
            } else {
                parent.height - padding.top - padding.bottom
            };
            let share = ((available - gaps - fixed_total) * node.layout_grow / total_grow).max(0.0);

            if parent_horizontal {
                width = share;
            } else {
                height = share;
            }
        }

        (width, height)
    }

    /// Size ignoring the parent's stretch/grow distribution
    fn intrinsic_size(&self, node: &SceneNode) -> (f64, f64) {
        if let Some(text) = &node.text {
            return measure_text(text, node.width, node.height);
        }
        if !node.kind.is_container() || !node.layout_mode.is_auto_layout() {
            return (node.width, node.height);
        }

        let horizontal = node.layout_mode == LayoutMode::Horizontal;
        let children: Vec<(f64, f64)> = node
            .children
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .filter(|c| c.visible && c.layout_positioning == LayoutPositioning::Auto)
            .map(|c| self.measure(c))
            .collect();

        let gaps = node.item_spacing * children.len().saturating_sub(1) as f64;
        let (main_sum, cross_max) = children.iter().fold((0.0f64, 0.0f64), |(sum, max), size| {
            let (main, cross) = if horizontal { *size } else { (size.1, size.0) };
            (sum + main, max.max(cross))
        });
        let pad = node.padding;
        let (content_width, content_height) = if horizontal {
            (main_sum + gaps + pad.left + pad.right, cross_max + pad.top + pad.bottom)
        } else {
            (cross_max + pad.left + pad.right, main_sum + gaps + pad.top + pad.bottom)
        };

        let width = match node.axis_sizing(true) {
            AxisSizing::Auto => content_width,
            AxisSizing::Fixed => node.width,
        };
        let height = match node.axis_sizing(false) {
            AxisSizing::Auto => content_height,
            AxisSizing::Fixed => node.height,
        };
        (width, height)
    }
}

fn line_height_px(text: &TextData) -> f64 {
    match text.line_height {
        LineHeight::Pixels(px) => px,
        LineHeight::Percent(pct) => text.font_size * pct / 100.0,
        LineHeight::Auto => text.font_size * AUTO_LINE_HEIGHT_RATIO,
    }
}

fn measure_text(text: &TextData, width: f64, height: f64) -> (f64, f64) {
    let letter_spacing = match text.letter_spacing {
        LetterSpacing::Pixels(px) => px,
        LetterSpacing::Percent(pct) => text.font_size * pct / 100.0,
    };
    let advance = text.font_size * GLYPH_WIDTH_RATIO + letter_spacing;
    let line_height = line_height_px(text);
    let lines: Vec<usize> = text.characters.split('\n').map(|l| l.chars().count()).collect();
    let natural_width = lines.iter().copied().max().unwrap_or(0) as f64 * advance;

    match text.auto_resize {
        TextAutoResize::WidthAndHeight => (natural_width, lines.len() as f64 * line_height),
        TextAutoResize::Height => {
            let width = if width > 0.0 { width } else { natural_width };
            let rows: f64 = lines
                .iter()
                .map(|&len| {
                    let line_width = len as f64 * advance;
                    if width > 0.0 {
                        (line_width / width).ceil().max(1.0)
                    } else {
                        1.0
                    }
                })
                .sum();
            (width, rows * line_height)
        }
        TextAutoResize::None => (width, height),
    }
}

fn new_node(id: NodeId, kind: NodeKind, component_key: Option<String>) -> SceneNode {
    let (width, height) = match kind {
        NodeKind::Text => (0.0, 0.0),
        NodeKind::Line => (defaults::NODE_SIZE, 0.0),
        _ => (defaults::NODE_SIZE, defaults::NODE_SIZE),
    };
    let fills = match kind {
        NodeKind::Frame => vec![HostPaint::solid(Rgba::WHITE)],
        NodeKind::Text => vec![HostPaint::solid(Rgba::BLACK)],
        NodeKind::Rectangle | NodeKind::Ellipse => vec![HostPaint::solid(defaults::SHAPE_FILL)],
        NodeKind::Line | NodeKind::Instance => Vec::new(),
    };
    let (strokes, stroke_weight) = match kind {
        NodeKind::Line => (vec![HostPaint::solid(Rgba::BLACK)], 1.0),
        _ => (Vec::new(), 1.0),
    };
    let text = (kind == NodeKind::Text).then(|| TextData {
        characters: String::new(),
        font: FontName::new(fonts::FALLBACK_FAMILY, fonts::FALLBACK_STYLE),
        font_size: defaults::HOST_FONT_SIZE,
        line_height: LineHeight::Auto,
        letter_spacing: LetterSpacing::Percent(0.0),
        align: TextAlign::Left,
        auto_resize: TextAutoResize::WidthAndHeight,
        text_style_id: None,
    });

    SceneNode {
        id,
        kind,
        name: kind.to_string().to_lowercase(),
        parent: None,
        children: Vec::new(),
        x: 0.0,
        y: 0.0,
        width,
        height,
        visible: true,
        opacity: 1.0,
        layout_mode: LayoutMode::None,
        primary_axis_sizing_mode: AxisSizing::Auto,
        counter_axis_sizing_mode: AxisSizing::Fixed,
        primary_axis_align_items: PrimaryAxisAlign::Min,
        counter_axis_align_items: CounterAxisAlign::Min,
        padding: SidePadding::default(),
        item_spacing: 0.0,
        clips_content: kind == NodeKind::Frame,
        layout_grow: 0.0,
        layout_align: ChildAlign::Inherit,
        layout_positioning: LayoutPositioning::Auto,
        fills,
        strokes,
        stroke_weight,
        corner_radius: 0.0,
        effects: Vec::new(),
        bound_variables: Default::default(),
        text,
        component_key,
        component_properties: Default::default(),
    }
}

impl SceneHost for MemoryScene {
    fn create_node(&mut self, kind: NodeKind) -> Result<NodeId, SceneError> {
        if kind == NodeKind::Instance {
            return Err(SceneError::InvalidOperation(
                "instances are created from a component key".to_string(),
            ));
        }
        Ok(self.insert_node(kind, None))
    }

    fn create_instance(&mut self, component_key: &str) -> Result<NodeId, SceneError> {
        let component = self
            .design_system
            .components
            .iter()
            .find(|c| c.key == component_key)
            .ok_or_else(|| SceneError::UnknownComponent(component_key.to_string()))?;
        let name = component.name.clone();
        let id = self.insert_node(NodeKind::Instance, Some(component_key.to_string()));
        self.node_mut(&id)?.name = name;
        Ok(id)
    }

    fn set_property(&mut self, id: &NodeId, property: Property) -> Result<(), SceneError> {
        let is_text = |k: NodeKind| k == NodeKind::Text;

        // validation pass
        match &property {
            Property::LayoutMode(_)
            | Property::PrimaryAxisSizingMode(_)
            | Property::CounterAxisSizingMode(_)
            | Property::PrimaryAxisAlignItems(_)
            | Property::CounterAxisAlignItems(_)
            | Property::Padding(..)
            | Property::ItemSpacing(_)
            | Property::ClipsContent(_) => {
                self.require_kind(id, &property, NodeKind::is_container)?;
            }
            Property::CornerRadius(_) => {
                self.require_kind(id, &property, |k| !matches!(k, NodeKind::Text | NodeKind::Line))?;
            }
            Property::FontName(font) => {
                self.require_kind(id, &property, is_text)?;
                self.require_loaded(font)?;
            }
            Property::FontSize(_)
            | Property::LineHeight(_)
            | Property::LetterSpacing(_)
            | Property::Characters(_) => {
                self.require_kind(id, &property, is_text)?;
                let font = self.current_font(id)?;
                self.require_loaded(&font)?;
            }
            Property::TextAlignHorizontal(_) | Property::TextAutoResize(_) => {
                self.require_kind(id, &property, is_text)?;
            }
            Property::TextStyle(style_id) => {
                self.require_kind(id, &property, is_text)?;
                let style = self
                    .design_system
                    .text_styles
                    .iter()
                    .find(|s| &s.id == style_id)
                    .ok_or_else(|| SceneError::UnknownTextStyle(style_id.clone()))?;
                self.require_loaded(&style.font)?;
            }
            Property::ComponentProperties(_) => {
                self.require_kind(id, &property, |k| k == NodeKind::Instance)?;
            }
            Property::Fills(paints) | Property::Strokes(paints) => {
                self.node(id)?;
                self.check_paints(paints)?;
            }
            Property::Resize { width, height } => {
                self.node(id)?;
                if *width < 0.0 || *height < 0.0 || !width.is_finite() || !height.is_finite() {
                    return Err(SceneError::InvalidOperation(format!(
                        "invalid size {}x{}",
                        width, height
                    )));
                }
            }
            _ => {
                self.node(id)?;
            }
        }

        let style = match &property {
            Property::TextStyle(style_id) => self
                .design_system
                .text_styles
                .iter()
                .find(|s| &s.id == style_id)
                .cloned(),
            _ => None,
        };

        let node = self.node_mut(id)?;
        match property {
            Property::Name(name) => node.name = name,
            Property::Resize { width, height } => {
                node.width = width;
                node.height = height;
            }
            Property::Position { x, y } => {
                node.x = x;
                node.y = y;
            }
            Property::Visible(visible) => node.visible = visible,
            Property::Opacity(opacity) => node.opacity = opacity.clamp(0.0, 1.0),
            Property::LayoutMode(mode) => node.layout_mode = mode,
            Property::PrimaryAxisSizingMode(mode) => node.primary_axis_sizing_mode = mode,
            Property::CounterAxisSizingMode(mode) => node.counter_axis_sizing_mode = mode,
            Property::PrimaryAxisAlignItems(align) => node.primary_axis_align_items = align,
            Property::CounterAxisAlignItems(align) => node.counter_axis_align_items = align,
            Property::Padding(side, value) => node.padding.set(side, value),
            Property::ItemSpacing(value) => node.item_spacing = value,
            Property::ClipsContent(clips) => node.clips_content = clips,
            Property::LayoutGrow(grow) => node.layout_grow = grow,
            Property::LayoutAlign(align) => node.layout_align = align,
            Property::LayoutPositioning(positioning) => node.layout_positioning = positioning,
            Property::Fills(paints) => node.fills = paints,
            Property::Strokes(paints) => node.strokes = paints,
            Property::StrokeWeight(weight) => node.stroke_weight = weight,
            Property::CornerRadius(radius) => node.corner_radius = radius,
            Property::Effects(effects) => node.effects = effects,
            Property::ComponentProperties(properties) => {
                node.component_properties.extend(properties)
            }
            text_property => {
                let Some(text) = node.text.as_mut() else {
                    return Err(SceneError::InvalidOperation(format!("{} is not a text node", id)));
                };
                match text_property {
                    Property::FontName(font) => {
                        text.font = font;
                        text.text_style_id = None;
                    }
                    Property::FontSize(size) => text.font_size = size,
                    Property::LineHeight(line_height) => text.line_height = line_height,
                    Property::LetterSpacing(spacing) => text.letter_spacing = spacing,
                    Property::TextAlignHorizontal(align) => text.align = align,
                    Property::TextAutoResize(mode) => text.auto_resize = mode,
                    Property::Characters(characters) => text.characters = characters,
                    Property::TextStyle(style_id) => {
                        if let Some(TextStyle {
                            font,
                            font_size,
                            line_height,
                            letter_spacing,
                            ..
                        }) = style
                        {
                            text.font = font;
                            text.font_size = font_size;
                            text.line_height = line_height.unwrap_or(LineHeight::Auto);
                            text.letter_spacing =
                                letter_spacing.unwrap_or(LetterSpacing::Percent(0.0));
                        }
                        text.text_style_id = Some(style_id);
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn bind_variable(
        &mut self,
        id: &NodeId,
        field: BindableField,
        variable_id: &str,
    ) -> Result<(), SceneError> {
        let kind = self.node(id)?.kind;
        let supported = match field {
            BindableField::Padding(_) | BindableField::ItemSpacing => kind.is_container(),
            BindableField::CornerRadius => !matches!(kind, NodeKind::Text | NodeKind::Line),
        };
        if !supported {
            return Err(SceneError::UnsupportedProperty {
                property: field.name(),
                kind,
            });
        }
        match self.variable(variable_id) {
            Some(v) if v.resolved_type == VariableType::Float => {}
            Some(_) => {
                return Err(SceneError::InvalidOperation(format!(
                    "variable {} is not a number",
                    variable_id
                )))
            }
            None => return Err(SceneError::UnknownVariable(variable_id.to_string())),
        }
        self.node_mut(id)?
            .bound_variables
            .insert(field, variable_id.to_string());
        Ok(())
    }

    fn load_font(&mut self, font: &FontName) -> Result<(), SceneError> {
        if !self.available_fonts.contains(font) {
            return Err(SceneError::FontUnavailable(font.clone()));
        }
        self.loaded_fonts.insert(font.clone());
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), SceneError> {
        let parent_kind = self.node(parent)?.kind;
        self.node(child)?;
        if !parent_kind.is_container() {
            return Err(SceneError::InvalidOperation(format!(
                "cannot append children to a {} node",
                parent_kind
            )));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::InvalidOperation(
                "cannot append a node to its own subtree".to_string(),
            ));
        }

        self.detach(child);
        self.node_mut(parent)?.children.push(child.clone());
        self.node_mut(child)?.parent = Some(parent.clone());
        Ok(())
    }

    fn replace_node(&mut self, old: &NodeId, new: &NodeId) -> Result<(), SceneError> {
        let (x, y) = {
            let old_node = self.node(old)?;
            (old_node.x, old_node.y)
        };
        self.node(new)?;
        if old == new || self.is_ancestor(new, old) || self.is_ancestor(old, new) {
            return Err(SceneError::InvalidOperation(
                "replacement must not overlap the replaced subtree".to_string(),
            ));
        }

        self.detach(new);
        let (parent, index) = self
            .detach(old)
            .ok_or_else(|| SceneError::NodeNotFound(old.clone()))?;
        match &parent {
            Some(parent_id) => self.node_mut(parent_id)?.children.insert(index, new.clone()),
            None => self.page.insert(index, new.clone()),
        }
        {
            let node = self.node_mut(new)?;
            node.parent = parent;
            node.x = x;
            node.y = y;
        }

        self.drop_subtree(old);
        Ok(())
    }

    fn remove_node(&mut self, id: &NodeId) -> Result<(), SceneError> {
        self.node(id)?;
        self.detach(id);
        self.drop_subtree(id);
        Ok(())
    }

    fn set_selection(&mut self, nodes: &[NodeId]) -> Result<(), SceneError> {
        for id in nodes {
            self.node(id)?;
        }
        self.selection = nodes.to_vec();
        Ok(())
    }

    fn focus(&mut self, nodes: &[NodeId]) -> Result<(), SceneError> {
        for id in nodes {
            self.node(id)?;
        }
        self.focused = nodes.to_vec();
        Ok(())
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn read_node(&self, id: &NodeId) -> Result<SceneNode, SceneError> {
        let node = self.node(id)?;
        let (width, height) = self.measure(node);
        let mut snapshot = node.clone();
        snapshot.width = width;
        snapshot.height = height;
        Ok(snapshot)
    }
}

impl DesignSystemSource for MemoryScene {
    fn variable_collections(&self) -> Result<Vec<VariableCollection>, TokenSourceError> {
        self.design_system.variable_collections()
    }

    fn variables(&self) -> Result<Vec<Variable>, TokenSourceError> {
        self.design_system.variables()
    }

    fn text_styles(&self) -> Result<Vec<TextStyle>, TokenSourceError> {
        self.design_system.text_styles()
    }

    fn components(&self) -> Result<Vec<Component>, TokenSourceError> {
        self.design_system.components()
    }
}
