//! Document renderer
//!
//! Walks a [`DesignDocument`] depth-first and builds the equivalent node tree
//! through a [`SceneHost`]. Every node goes through the same phases:
//!
//! 1. create the host node (instances fall back to frames)
//! 2. establish its size
//! 3. apply its own layout and its participation in the parent's layout
//! 4. apply appearance
//! 5. render children
//! 6. attach to the parent
//!
//! A host failure aborts only the failing subtree: the partial node is
//! removed, a warning is recorded and siblings continue. Only a failure on the
//! root itself fails the render.

use design_schema::{
    Appearance, ChildAlign, ContainerLayout, CounterAxisAlign, DesignDocument, Element,
    ElementKind, InstanceProps, LayoutMode, LayoutPositioning, NodeProps, PrimaryAxisAlign, Side,
    TextProps, Viewport,
};
use design_tokens::TokenIndex;
use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::resolve::{ResolvedSpacing, Resolver};
use crate::scene::{
    AxisSizing, BindableField, NodeId, NodeKind, Property, SceneError, SceneHost,
    TextAutoResize,
};
use crate::sizing::{self, AxisIntents};
use crate::text;
use crate::warning::{ResolutionWarning, WarningKind};

/// Name given to a document that has none
const UNTITLED: &str = "Generated Design";

/// Where and how the rendered tree lands in the host document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Existing node to swap the new tree in for (edit-in-place)
    pub replace: Option<NodeId>,
    /// Select and focus the rendered root
    pub select: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            replace: None,
            select: true,
        }
    }
}

impl RenderOptions {
    pub fn replacing(node: NodeId) -> Self {
        Self {
            replace: Some(node),
            ..Default::default()
        }
    }
}

/// Outcome of a successful render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedArtifact {
    pub root: NodeId,
    /// Number of descendants under the rendered root
    pub element_count: usize,
    pub warnings: Vec<ResolutionWarning>,
    /// Subtrees left out because a host mutation failed
    pub failed_nodes: usize,
}

/// Error types for rendering
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to render '{node}': {source}")]
    Node {
        node: String,
        #[source]
        source: SceneError,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Render `document` into `host` at the size of `viewport`.
pub fn render(
    document: &DesignDocument,
    viewport: Viewport,
    index: &TokenIndex,
    host: &mut dyn SceneHost,
    options: &RenderOptions,
) -> Result<RenderedArtifact, RenderError> {
    Renderer {
        host,
        resolver: Resolver::new(index),
        failed_nodes: 0,
    }
    .render_document(document, viewport, options)
}

/// Total number of nodes below `root`
pub fn count_descendants(host: &dyn SceneHost, root: &NodeId) -> Result<usize, SceneError> {
    let mut count = 0;
    let mut stack = host.read_node(root)?.children;
    while let Some(id) = stack.pop() {
        count += 1;
        stack.extend(host.read_node(&id)?.children);
    }
    Ok(count)
}

/// What kind of node an element ended up as, for appearance rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Root,
    Frame,
    Instance,
    Shape(NodeKind),
    Text,
}

impl Surface {
    fn is_container(self) -> bool {
        matches!(self, Surface::Root | Surface::Frame | Surface::Instance)
    }

    fn accepts_corner_radius(self) -> bool {
        !matches!(self, Surface::Text | Surface::Shape(NodeKind::Line))
    }
}

struct Renderer<'h, 'i> {
    host: &'h mut dyn SceneHost,
    resolver: Resolver<'i>,
    failed_nodes: usize,
}

impl Renderer<'_, '_> {
    fn render_document(
        mut self,
        document: &DesignDocument,
        viewport: Viewport,
        options: &RenderOptions,
    ) -> Result<RenderedArtifact, RenderError> {
        let name = match document.name.trim() {
            "" => UNTITLED.to_string(),
            name => name.to_string(),
        };
        log::info!(
            "Rendering '{}' ({} elements) at {}x{}",
            name,
            document.element_count(),
            viewport.width,
            viewport.height
        );

        let root = self.host.create_node(NodeKind::Frame)?;
        if let Err(source) = self.build_root(&root, &name, document, viewport) {
            self.discard(&root);
            return Err(RenderError::Node { node: name, source });
        }

        if let Some(old) = &options.replace {
            if let Err(e) = self.host.replace_node(old, &root) {
                self.discard(&root);
                return Err(e.into());
            }
            log::debug!("Replaced {} with {}", old, root);
        }
        if options.select {
            let selection = [root.clone()];
            self.host.set_selection(&selection)?;
            self.host.focus(&selection)?;
        }

        let element_count = count_descendants(&*self.host, &root)?;
        let warnings = self.resolver.into_warnings();
        log::info!(
            "Rendered '{}': {} elements, {} warnings, {} failed",
            name,
            element_count,
            warnings.len(),
            self.failed_nodes
        );
        Ok(RenderedArtifact {
            root,
            element_count,
            warnings,
            failed_nodes: self.failed_nodes,
        })
    }

    // ─── ROOT ───────────────────────────────────────────────────────

    /// The root always matches the viewport exactly, whatever sizing the
    /// document asked for.
    fn build_root(
        &mut self,
        root: &NodeId,
        name: &str,
        document: &DesignDocument,
        viewport: Viewport,
    ) -> Result<(), SceneError> {
        let layout_mode = document.layout.layout_mode.unwrap_or(LayoutMode::Vertical);

        self.host.set_property(root, Property::Name(name.to_string()))?;
        self.host.set_property(
            root,
            Property::Resize {
                width: viewport.width.max(1.0),
                height: viewport.height.max(1.0),
            },
        )?;

        let mut layout = document.layout.clone();
        layout.primary_axis_align_items = layout
            .primary_axis_align_items
            .or(Some(PrimaryAxisAlign::Min));
        layout.counter_axis_align_items = layout
            .counter_axis_align_items
            .or(Some(CounterAxisAlign::Min));
        self.apply_container_layout(root, name, &layout, layout_mode)?;
        if layout_mode.is_auto_layout() {
            self.host
                .set_property(root, Property::PrimaryAxisSizingMode(AxisSizing::Fixed))?;
            self.host
                .set_property(root, Property::CounterAxisSizingMode(AxisSizing::Fixed))?;
        }

        self.apply_appearance(root, name, &document.appearance, Surface::Root)?;
        self.render_children(root, &document.children, layout_mode);
        Ok(())
    }

    // ─── ELEMENTS ───────────────────────────────────────────────────

    fn render_children(&mut self, parent: &NodeId, children: &[Element], parent_layout: LayoutMode) {
        for child in children {
            self.render_child(parent, child, parent_layout);
        }
    }

    fn render_child(&mut self, parent: &NodeId, element: &Element, parent_layout: LayoutMode) {
        let name = element.display_name();
        let node = match self.render_element(element, parent_layout) {
            Ok(node) => node,
            Err(e) => return self.record_failure(name, e),
        };
        if let Err(e) = self.host.append_child(parent, &node) {
            self.discard(&node);
            self.record_failure(name, e);
        }
    }

    /// Build a detached subtree for `element`
    fn render_element(
        &mut self,
        element: &Element,
        parent_layout: LayoutMode,
    ) -> Result<NodeId, SceneError> {
        let name = element.display_name();
        let (node, surface) = match &element.kind {
            ElementKind::Text(_) => (self.host.create_node(NodeKind::Text)?, Surface::Text),
            ElementKind::Rectangle => (
                self.host.create_node(NodeKind::Rectangle)?,
                Surface::Shape(NodeKind::Rectangle),
            ),
            ElementKind::Ellipse => (
                self.host.create_node(NodeKind::Ellipse)?,
                Surface::Shape(NodeKind::Ellipse),
            ),
            ElementKind::Line => (
                self.host.create_node(NodeKind::Line)?,
                Surface::Shape(NodeKind::Line),
            ),
            ElementKind::Instance(instance) => match self.create_instance(name, instance) {
                Some(node) => (node, Surface::Instance),
                None => (self.host.create_node(NodeKind::Frame)?, Surface::Frame),
            },
            ElementKind::Unknown(kind) => {
                log::debug!("'{}': unknown element type {}, rendering as frame", name, kind);
                (self.host.create_node(NodeKind::Frame)?, Surface::Frame)
            }
            ElementKind::Frame => (self.host.create_node(NodeKind::Frame)?, Surface::Frame),
        };

        if let Err(e) = self.populate(&node, element, surface, parent_layout) {
            self.discard(&node);
            return Err(e);
        }
        Ok(node)
    }

    fn populate(
        &mut self,
        node: &NodeId,
        element: &Element,
        surface: Surface,
        parent_layout: LayoutMode,
    ) -> Result<(), SceneError> {
        let name = element.display_name();
        let props = &element.props;
        // Unnamed instances keep their component's name
        if props.name.is_some() || surface != Surface::Instance {
            self.host.set_property(node, Property::Name(name.to_string()))?;
        }
        if props.visible == Some(false) {
            self.host.set_property(node, Property::Visible(false))?;
        }

        match (&element.kind, surface) {
            (ElementKind::Text(text), _) => self.populate_text(node, name, props, text, parent_layout),
            (_, Surface::Shape(kind)) => self.populate_shape(node, name, props, kind, parent_layout),
            (ElementKind::Instance(instance), Surface::Instance) => {
                self.populate_instance(node, name, props, instance, parent_layout)
            }
            _ => self.populate_frame(node, name, props, parent_layout),
        }
    }

    fn populate_frame(
        &mut self,
        node: &NodeId,
        name: &str,
        props: &NodeProps,
        parent_layout: LayoutMode,
    ) -> Result<(), SceneError> {
        let layout_mode = match props.layout.layout_mode {
            Some(mode) => mode,
            None if props.children.is_empty() => LayoutMode::None,
            None => LayoutMode::Vertical,
        };
        let auto_layout = layout_mode.is_auto_layout();
        let intents = sizing::resolve_intents(
            props,
            layout_mode,
            auto_layout,
            parent_layout.is_auto_layout(),
        );

        self.apply_explicit_size(node, props)?;

        self.apply_container_layout(node, name, &props.layout, layout_mode)?;
        if auto_layout {
            // Hugging nothing would collapse the frame
            let has_flow_children = props.children.iter().any(|child| {
                child.props.visible != Some(false)
                    && child.props.child.layout_positioning != Some(LayoutPositioning::Absolute)
            });
            let (primary, counter) =
                sizing::to_layout_axes(layout_mode, intents.horizontal, intents.vertical);
            let host_mode = |intent| {
                if has_flow_children {
                    sizing::host_sizing(intent)
                } else {
                    AxisSizing::Fixed
                }
            };
            self.host
                .set_property(node, Property::PrimaryAxisSizingMode(host_mode(primary)))?;
            self.host
                .set_property(node, Property::CounterAxisSizingMode(host_mode(counter)))?;
        }
        self.apply_participation(node, name, props, intents, parent_layout)?;

        self.apply_appearance(node, name, &props.appearance, Surface::Frame)?;

        self.render_children(node, &props.children, layout_mode);
        if auto_layout {
            self.keep_positive_extent(node, layout_mode)?;
        }
        Ok(())
    }

    /// Fix any hugging axis whose content measured zero (a lone line, empty
    /// text) at the minimum extent.
    fn keep_positive_extent(
        &mut self,
        node: &NodeId,
        layout_mode: LayoutMode,
    ) -> Result<(), SceneError> {
        let measured = self.host.read_node(node)?;
        let width_collapsed = measured.width <= 0.0;
        let height_collapsed = measured.height <= 0.0;
        if !width_collapsed && !height_collapsed {
            return Ok(());
        }
        log::debug!(
            "'{}' hugs zero-size content ({}x{})",
            measured.name,
            measured.width,
            measured.height
        );

        self.host.set_property(
            node,
            Property::Resize {
                width: measured.width.max(defaults::MIN_EXTENT),
                height: measured.height.max(defaults::MIN_EXTENT),
            },
        )?;
        let (primary_collapsed, counter_collapsed) = match layout_mode {
            LayoutMode::Horizontal => (width_collapsed, height_collapsed),
            _ => (height_collapsed, width_collapsed),
        };
        let keep = |collapsed: bool, mode: AxisSizing| {
            if collapsed {
                AxisSizing::Fixed
            } else {
                mode
            }
        };
        self.host.set_property(
            node,
            Property::PrimaryAxisSizingMode(keep(
                primary_collapsed,
                measured.primary_axis_sizing_mode,
            )),
        )?;
        self.host.set_property(
            node,
            Property::CounterAxisSizingMode(keep(
                counter_collapsed,
                measured.counter_axis_sizing_mode,
            )),
        )
    }

    fn populate_shape(
        &mut self,
        node: &NodeId,
        name: &str,
        props: &NodeProps,
        kind: NodeKind,
        parent_layout: LayoutMode,
    ) -> Result<(), SceneError> {
        let intents =
            sizing::resolve_intents(props, LayoutMode::None, false, parent_layout.is_auto_layout());

        let width = props.width.unwrap_or(defaults::NODE_SIZE).max(0.0);
        let height = match kind {
            NodeKind::Line => 0.0,
            _ => props.height.unwrap_or(defaults::NODE_SIZE).max(0.0),
        };
        self.host
            .set_property(node, Property::Resize { width, height })?;
        self.apply_participation(node, name, props, intents, parent_layout)?;
        self.apply_appearance(node, name, &props.appearance, Surface::Shape(kind))?;

        if !props.children.is_empty() {
            log::debug!(
                "'{}': {} children of a {} node ignored",
                name,
                props.children.len(),
                kind
            );
        }
        Ok(())
    }

    fn populate_text(
        &mut self,
        node: &NodeId,
        name: &str,
        props: &NodeProps,
        text_props: &TextProps,
        parent_layout: LayoutMode,
    ) -> Result<(), SceneError> {
        text::apply_typography(&mut *self.host, &mut self.resolver, node, name, text_props)?;
        self.host
            .set_property(node, Property::Characters(text_props.characters.clone()))?;
        if let Some(align) = text_props.text_align_horizontal {
            self.host
                .set_property(node, Property::TextAlignHorizontal(align))?;
        }

        let intents =
            sizing::resolve_intents(props, LayoutMode::None, true, parent_layout.is_auto_layout());
        let auto_resize = sizing::text_auto_resize(intents);
        self.host
            .set_property(node, Property::TextAutoResize(auto_resize))?;
        match auto_resize {
            TextAutoResize::WidthAndHeight => {}
            TextAutoResize::Height => {
                if let Some(width) = props.width {
                    self.host.set_property(
                        node,
                        Property::Resize {
                            width: width.max(1.0),
                            height: 0.0,
                        },
                    )?;
                }
            }
            TextAutoResize::None => {
                self.host.set_property(
                    node,
                    Property::Resize {
                        width: props.width.unwrap_or(defaults::NODE_SIZE).max(1.0),
                        height: props.height.unwrap_or(defaults::NODE_SIZE).max(1.0),
                    },
                )?;
            }
        }
        self.apply_participation(node, name, props, intents, parent_layout)?;
        self.apply_appearance(node, name, &props.appearance, Surface::Text)
    }

    // ─── INSTANCES ──────────────────────────────────────────────────

    /// Instance by key, then by component name; `None` renders a frame
    fn create_instance(&mut self, name: &str, instance: &InstanceProps) -> Option<NodeId> {
        let key = non_empty(instance.component_key.as_deref());
        let component_name = non_empty(instance.component_name.as_deref());

        if let Some(key) = key {
            match self.host.create_instance(key) {
                Ok(node) => return Some(node),
                Err(e) => log::debug!("'{}': component key {} failed: {}", name, key, e),
            }
        }
        if let Some(component_name) = component_name {
            if let Some(component) = self.resolver.index().find_component(component_name) {
                match self.host.create_instance(&component.key) {
                    Ok(node) => return Some(node),
                    Err(e) => log::debug!(
                        "'{}': component '{}' failed: {}",
                        name,
                        component.name,
                        e
                    ),
                }
            }
        }

        let reference = key.or(component_name).unwrap_or("(none)");
        self.resolver
            .warn(WarningKind::Component, name, reference, "frame");
        None
    }

    fn populate_instance(
        &mut self,
        node: &NodeId,
        name: &str,
        props: &NodeProps,
        instance: &InstanceProps,
        parent_layout: LayoutMode,
    ) -> Result<(), SceneError> {
        if !instance.component_properties.is_empty() {
            let overrides = Property::ComponentProperties(instance.component_properties.clone());
            if let Err(e) = self.host.set_property(node, overrides) {
                let keys: Vec<&str> = instance
                    .component_properties
                    .keys()
                    .map(String::as_str)
                    .collect();
                log::debug!("'{}': component properties rejected: {}", name, e);
                self.resolver.warn(
                    WarningKind::ComponentProperty,
                    name,
                    keys.join(", "),
                    "component defaults",
                );
            }
        }

        if props.width.is_some() || props.height.is_some() {
            let current = self.host.read_node(node)?;
            self.host.set_property(
                node,
                Property::Resize {
                    width: props.width.unwrap_or(current.width).max(1.0),
                    height: props.height.unwrap_or(current.height).max(1.0),
                },
            )?;
        }
        let intents =
            sizing::resolve_intents(props, LayoutMode::None, false, parent_layout.is_auto_layout());
        self.apply_participation(node, name, props, intents, parent_layout)?;
        self.apply_appearance(node, name, &props.appearance, Surface::Instance)?;

        if !props.children.is_empty() {
            log::debug!(
                "'{}': {} children ignored, the component defines its content",
                name,
                props.children.len()
            );
        }
        Ok(())
    }

    // ─── PROPERTIES ─────────────────────────────────────────────────

    fn apply_explicit_size(
        &mut self,
        node: &NodeId,
        props: &NodeProps,
    ) -> Result<(), SceneError> {
        if props.width.is_none() && props.height.is_none() {
            return Ok(());
        }
        self.host.set_property(
            node,
            Property::Resize {
                width: props.width.unwrap_or(defaults::NODE_SIZE).max(1.0),
                height: props.height.unwrap_or(defaults::NODE_SIZE).max(1.0),
            },
        )
    }

    fn apply_container_layout(
        &mut self,
        node: &NodeId,
        name: &str,
        layout: &ContainerLayout,
        layout_mode: LayoutMode,
    ) -> Result<(), SceneError> {
        self.host.set_property(node, Property::LayoutMode(layout_mode))?;
        if !layout_mode.is_auto_layout() {
            return Ok(());
        }

        match layout.primary_axis_align_items {
            Some(PrimaryAxisAlign::Unsupported) => {
                self.resolver
                    .warn(WarningKind::Alignment, name, "primaryAxisAlignItems", "MIN");
                self.host
                    .set_property(node, Property::PrimaryAxisAlignItems(PrimaryAxisAlign::Min))?;
            }
            Some(align) => {
                self.host
                    .set_property(node, Property::PrimaryAxisAlignItems(align))?;
            }
            None => {}
        }
        match layout.counter_axis_align_items {
            Some(align) if align.is_container_value() => {
                self.host
                    .set_property(node, Property::CounterAxisAlignItems(align))?;
            }
            Some(align) => {
                self.resolver
                    .warn(WarningKind::Alignment, name, wire_name(&align), "CENTER");
                self.host.set_property(
                    node,
                    Property::CounterAxisAlignItems(CounterAxisAlign::Center),
                )?;
            }
            None => {}
        }

        for side in Side::ALL {
            let spacing = self.resolver.spacing(
                name,
                layout.padding.variable(side),
                layout.padding.literal(side),
            );
            if let Some(spacing) = spacing {
                self.apply_spacing(
                    node,
                    Property::Padding(side, spacing.value()),
                    BindableField::Padding(side),
                    spacing,
                )?;
            }
        }
        let item_spacing = self.resolver.spacing(
            name,
            layout.item_spacing_variable.as_deref(),
            layout.item_spacing,
        );
        if let Some(spacing) = item_spacing {
            self.apply_spacing(
                node,
                Property::ItemSpacing(spacing.value()),
                BindableField::ItemSpacing,
                spacing,
            )?;
        }
        Ok(())
    }

    fn apply_spacing(
        &mut self,
        node: &NodeId,
        property: Property,
        field: BindableField,
        spacing: ResolvedSpacing,
    ) -> Result<(), SceneError> {
        self.host.set_property(node, property)?;
        if let ResolvedSpacing::Bound { variable_id, .. } = spacing {
            self.host.bind_variable(node, field, &variable_id)?;
        }
        Ok(())
    }

    /// How the node sits in its parent: absolute position, or grow/stretch
    /// flags inside an auto-layout parent.
    fn apply_participation(
        &mut self,
        node: &NodeId,
        name: &str,
        props: &NodeProps,
        intents: AxisIntents,
        parent_layout: LayoutMode,
    ) -> Result<(), SceneError> {
        let position = Property::Position {
            x: props.x.unwrap_or(0.0),
            y: props.y.unwrap_or(0.0),
        };
        if !parent_layout.is_auto_layout() {
            if props.x.is_some() || props.y.is_some() {
                self.host.set_property(node, position)?;
            }
            return Ok(());
        }
        if props.child.layout_positioning == Some(LayoutPositioning::Absolute) {
            self.host.set_property(
                node,
                Property::LayoutPositioning(LayoutPositioning::Absolute),
            )?;
            return self.host.set_property(node, position);
        }

        let participation = sizing::participation(intents, parent_layout);
        let grow = participation
            .grow
            .or(props.child.layout_grow.filter(|grow| *grow > 0.0));
        if let Some(grow) = grow {
            self.host.set_property(node, Property::LayoutGrow(grow))?;
        }

        let align = match (participation.align, props.child.layout_align) {
            (Some(align), _) => Some(align),
            (None, Some(ChildAlign::Unsupported)) => {
                self.resolver
                    .warn(WarningKind::Alignment, name, "layoutAlign", "INHERIT");
                None
            }
            (None, align) => align.filter(|a| *a != ChildAlign::Inherit),
        };
        if let Some(align) = align {
            self.host.set_property(node, Property::LayoutAlign(align))?;
        }
        Ok(())
    }

    fn apply_appearance(
        &mut self,
        node: &NodeId,
        name: &str,
        appearance: &Appearance,
        surface: Surface,
    ) -> Result<(), SceneError> {
        let default_fill = match surface {
            Surface::Text => defaults::INK,
            _ => defaults::SHAPE_FILL,
        };
        if !appearance.fills.is_empty() {
            let fills = self.resolver.paints(name, &appearance.fills, default_fill);
            self.host.set_property(node, Property::Fills(fills))?;
        } else if surface == Surface::Frame {
            // Nested frames are transparent unless they ask for a fill
            self.host.set_property(node, Property::Fills(Vec::new()))?;
        }

        if !appearance.strokes.is_empty() {
            let strokes = self
                .resolver
                .paints(name, &appearance.strokes, defaults::INK);
            self.host.set_property(node, Property::Strokes(strokes))?;
        }
        if let Some(weight) = appearance.stroke_weight {
            self.host
                .set_property(node, Property::StrokeWeight(weight.max(0.0)))?;
        }
        if let Some(radius) = appearance.corner_radius {
            if surface.accepts_corner_radius() {
                self.host
                    .set_property(node, Property::CornerRadius(radius.max(0.0)))?;
            } else {
                log::debug!("'{}': corner radius ignored", name);
            }
        }
        if let Some(opacity) = appearance.opacity {
            self.host
                .set_property(node, Property::Opacity(opacity.clamp(0.0, 1.0)))?;
        }
        if !appearance.effects.is_empty() {
            let effects = self.resolver.effects(name, &appearance.effects);
            self.host.set_property(node, Property::Effects(effects))?;
        }
        if let Some(clips) = appearance.clips_content {
            if surface.is_container() {
                self.host.set_property(node, Property::ClipsContent(clips))?;
            }
        }
        Ok(())
    }

    // ─── FAILURE HANDLING ───────────────────────────────────────────

    fn record_failure(&mut self, name: &str, error: SceneError) {
        log::error!("Failed to render '{}': {}", name, error);
        self.failed_nodes += 1;
        self.resolver.push(ResolutionWarning {
            kind: WarningKind::Node,
            node: name.to_string(),
            reference: error.to_string(),
            fallback: "skipped".to_string(),
        });
    }

    /// Remove a partially built node
    fn discard(&mut self, node: &NodeId) {
        if let Err(e) = self.host.remove_node(node) {
            log::warn!("Failed to remove partial node {}: {}", node, e);
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Wire spelling of an enum value, e.g. `STRETCH`
fn wire_name<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_else(|| format!("{:?}", value))
}
