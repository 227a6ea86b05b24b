//! Selection serializer
//!
//! The inverse of rendering: reads host nodes back into the document schema
//! so an existing design can be sent to a model as context for an edit.
//! Bound variables and text styles are mapped back to their names through the
//! token index, and neutral values (opacity 1, no grow, INHERIT alignment,
//! MIN alignment, left-aligned text) are left out.

use design_schema::{
    Appearance, ChildAlign, ChildLayout, ContainerLayout, CounterAxisAlign, DesignDocument,
    Effect, Element, ElementKind, GradientStop, InstanceProps, LayoutMode, LayoutPositioning,
    NodeProps, Padding, Paint, PaintKind, PrimaryAxisAlign, Side, SizingIntent, TextAlign,
    TextProps,
};
use design_tokens::{LetterSpacing, LineHeight, TokenIndex};
use serde::{Deserialize, Serialize};

use crate::scene::{
    AxisSizing, BindableField, GradientKind, HostEffect, HostPaint, NodeId, NodeKind, SceneError,
    SceneHost, SceneNode, TextAutoResize,
};
use crate::sizing;

/// Name of the document that wraps a multi-node selection
const SELECTION_NAME: &str = "Selection";

/// What is selected, for the UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    pub count: usize,
    pub names: Vec<String>,
}

/// Summarise the current selection; nodes that vanished are skipped
pub fn selection_summary(host: &dyn SceneHost) -> SelectionSummary {
    let names: Vec<String> = host
        .selection()
        .iter()
        .filter_map(|id| host.read_node(id).ok())
        .map(|node| node.name)
        .collect();
    SelectionSummary {
        count: names.len(),
        names,
    }
}

/// Serialize the current selection.
///
/// A single selected frame becomes the document root; anything else is
/// wrapped in a vertical "Selection" document. Returns `None` when nothing is
/// selected.
pub fn serialize_selection(
    host: &dyn SceneHost,
    index: &TokenIndex,
) -> Result<Option<DesignDocument>, SceneError> {
    let selection = host.selection();
    match selection.as_slice() {
        [] => Ok(None),
        [single] => {
            let node = host.read_node(single)?;
            if node.kind == NodeKind::Frame {
                return serialize_root(host, index, &node).map(Some);
            }
            wrap(host, index, &selection).map(Some)
        }
        _ => wrap(host, index, &selection).map(Some),
    }
}

fn serialize_root(
    host: &dyn SceneHost,
    index: &TokenIndex,
    node: &SceneNode,
) -> Result<DesignDocument, SceneError> {
    log::debug!("Serializing '{}' ({} children)", node.name, node.children.len());
    Ok(DesignDocument {
        name: node.name.clone(),
        width: Some(node.width),
        height: Some(node.height),
        layout: container_layout(node, index),
        appearance: appearance(node, index),
        children: serialize_children(host, index, node)?,
    })
}

fn wrap(
    host: &dyn SceneHost,
    index: &TokenIndex,
    selection: &[NodeId],
) -> Result<DesignDocument, SceneError> {
    let children = selection
        .iter()
        .map(|id| serialize_element(host, index, id, None))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DesignDocument {
        name: SELECTION_NAME.to_string(),
        layout: ContainerLayout {
            layout_mode: Some(LayoutMode::Vertical),
            ..Default::default()
        },
        children,
        ..Default::default()
    })
}

fn serialize_children(
    host: &dyn SceneHost,
    index: &TokenIndex,
    node: &SceneNode,
) -> Result<Vec<Element>, SceneError> {
    node.children
        .iter()
        .map(|child| serialize_element(host, index, child, Some(node)))
        .collect()
}

fn serialize_element(
    host: &dyn SceneHost,
    index: &TokenIndex,
    id: &NodeId,
    parent: Option<&SceneNode>,
) -> Result<Element, SceneError> {
    let node = host.read_node(id)?;
    let kind = match node.kind {
        NodeKind::Frame => ElementKind::Frame,
        NodeKind::Text => ElementKind::Text(text_props(&node, index)),
        NodeKind::Rectangle => ElementKind::Rectangle,
        NodeKind::Ellipse => ElementKind::Ellipse,
        NodeKind::Line => ElementKind::Line,
        NodeKind::Instance => ElementKind::Instance(instance_props(&node, index)),
    };

    let parent_layout = parent.map_or(LayoutMode::None, |p| p.layout_mode);
    let absolute = node.layout_positioning == LayoutPositioning::Absolute;
    let in_flow = parent_layout.is_auto_layout() && !absolute;

    let mut props = NodeProps {
        name: Some(node.name.clone()),
        visible: (!node.visible).then_some(false),
        appearance: appearance(&node, index),
        ..Default::default()
    };
    if !in_flow && (node.x != 0.0 || node.y != 0.0) {
        props.x = Some(node.x);
        props.y = Some(node.y);
    }

    let (horizontal, vertical) = axis_intents(&node, parent_layout, in_flow);
    props.child = ChildLayout {
        layout_sizing_horizontal: (horizontal == SizingIntent::Fill).then_some(horizontal),
        layout_sizing_vertical: (vertical == SizingIntent::Fill).then_some(vertical),
        layout_align: match node.layout_align {
            ChildAlign::Min | ChildAlign::Center | ChildAlign::Max if in_flow => {
                Some(node.layout_align)
            }
            _ => None,
        },
        layout_grow: None,
        layout_positioning: (absolute && parent_layout.is_auto_layout())
            .then_some(LayoutPositioning::Absolute),
    };
    if horizontal == SizingIntent::Fixed {
        props.width = Some(node.width);
    }
    if vertical == SizingIntent::Fixed {
        props.height = Some(node.height);
    }

    if node.kind == NodeKind::Frame {
        props.layout = container_layout(&node, index);
        props.children = serialize_children(host, index, &node)?;
    }
    Ok(Element { props, kind })
}

/// Sizing intent of each screen axis, as (horizontal, vertical)
fn axis_intents(
    node: &SceneNode,
    parent_layout: LayoutMode,
    in_flow: bool,
) -> (SizingIntent, SizingIntent) {
    let (fills_horizontal, fills_vertical) = if in_flow {
        let grows = node.layout_grow > 0.0;
        let stretches = node.layout_align == ChildAlign::Stretch;
        match parent_layout {
            LayoutMode::Horizontal => (grows, stretches),
            _ => (stretches, grows),
        }
    } else {
        (false, false)
    };

    let (own_horizontal, own_vertical) = match (&node.text, node.kind) {
        (Some(text), _) => match text.auto_resize {
            TextAutoResize::WidthAndHeight => (Some(AxisSizing::Auto), Some(AxisSizing::Auto)),
            TextAutoResize::Height => (None, Some(AxisSizing::Auto)),
            TextAutoResize::None => (None, None),
        },
        (None, NodeKind::Frame) if node.layout_mode.is_auto_layout() => {
            (Some(node.axis_sizing(true)), Some(node.axis_sizing(false)))
        }
        _ => (None, None),
    };
    (
        sizing::intent_from_host(own_horizontal, fills_horizontal),
        sizing::intent_from_host(own_vertical, fills_vertical),
    )
}

fn container_layout(node: &SceneNode, index: &TokenIndex) -> ContainerLayout {
    let mut layout = ContainerLayout {
        layout_mode: Some(node.layout_mode),
        ..Default::default()
    };
    if !node.layout_mode.is_auto_layout() {
        return layout;
    }

    layout.primary_axis_align_items = (node.primary_axis_align_items != PrimaryAxisAlign::Min)
        .then_some(node.primary_axis_align_items);
    layout.counter_axis_align_items = (node.counter_axis_align_items != CounterAxisAlign::Min)
        .then_some(node.counter_axis_align_items);
    layout.padding = padding(node, index);

    let spacing_variable = spacing_name(node, BindableField::ItemSpacing, index);
    if node.item_spacing != 0.0 || spacing_variable.is_some() {
        layout.item_spacing = Some(node.item_spacing);
    }
    layout.item_spacing_variable = spacing_variable;
    layout
}

fn spacing_name(node: &SceneNode, field: BindableField, index: &TokenIndex) -> Option<String> {
    node.bound_variables
        .get(&field)
        .and_then(|id| index.spacing_by_id(id))
        .map(|token| token.name.clone())
}

/// Padding, collapsed to the uniform fields when all sides agree
fn padding(node: &SceneNode, index: &TokenIndex) -> Padding {
    let values = Side::ALL.map(|side| node.padding.get(side));
    let variables = Side::ALL.map(|side| spacing_name(node, BindableField::Padding(side), index));

    let mut padding = Padding::default();
    let uniform = values.iter().all(|v| *v == values[0])
        && variables.iter().all(|v| *v == variables[0]);
    if uniform {
        if values[0] != 0.0 || variables[0].is_some() {
            padding.padding = Some(values[0]);
        }
        padding.padding_variable = variables[0].clone();
        return padding;
    }

    for ((side, value), variable) in Side::ALL.into_iter().zip(values).zip(variables) {
        if value != 0.0 || variable.is_some() {
            padding.set_literal(side, value);
        }
        if let Some(name) = variable {
            padding.set_variable(side, name);
        }
    }
    padding
}

fn appearance(node: &SceneNode, index: &TokenIndex) -> Appearance {
    let paints = |paints: &[HostPaint]| paints.iter().map(|p| paint(p, index)).collect::<Vec<_>>();
    Appearance {
        fills: paints(&node.fills),
        strokes: paints(&node.strokes),
        stroke_weight: (!node.strokes.is_empty() && node.stroke_weight != 1.0)
            .then_some(node.stroke_weight),
        corner_radius: (node.corner_radius > 0.0).then_some(node.corner_radius),
        opacity: (node.opacity < 1.0).then_some(node.opacity),
        effects: node.effects.iter().map(effect).collect(),
        clips_content: (node.kind == NodeKind::Frame && !node.clips_content).then_some(false),
    }
}

fn paint(paint: &HostPaint, index: &TokenIndex) -> Paint {
    match paint {
        HostPaint::Solid {
            color,
            opacity,
            bound_variable,
        } => Paint {
            kind: PaintKind::Solid,
            color: Some(*color),
            color_variable: bound_variable
                .as_deref()
                .and_then(|id| index.color_by_id(id))
                .map(|token| token.name.clone()),
            opacity: (*opacity < 1.0).then_some(*opacity),
            ..Default::default()
        },
        HostPaint::Gradient {
            kind,
            stops,
            opacity,
        } => Paint {
            kind: match kind {
                GradientKind::Linear => PaintKind::GradientLinear,
                GradientKind::Radial => PaintKind::GradientRadial,
            },
            gradient_stops: stops
                .iter()
                .map(|stop| GradientStop {
                    position: stop.position,
                    color: Some(stop.color),
                    color_variable: None,
                })
                .collect(),
            opacity: (*opacity < 1.0).then_some(*opacity),
            ..Default::default()
        },
    }
}

fn effect(effect: &HostEffect) -> Effect {
    Effect {
        kind: effect.kind,
        color: Some(effect.color),
        offset: Some(effect.offset),
        radius: Some(effect.radius),
        spread: (effect.spread != 0.0).then_some(effect.spread),
        visible: None,
    }
}

fn text_props(node: &SceneNode, index: &TokenIndex) -> TextProps {
    let Some(text) = &node.text else {
        return TextProps::default();
    };
    let mut props = TextProps {
        characters: text.characters.clone(),
        text_align_horizontal: (text.align != TextAlign::Left).then_some(text.align),
        ..Default::default()
    };

    let style = text
        .text_style_id
        .as_deref()
        .and_then(|id| index.text_style_by_id(id));
    if let Some(style) = style {
        props.text_style_name = Some(style.name.clone());
        return props;
    }

    props.font_family = Some(text.font.family.clone());
    props.font_style = Some(text.font.style.clone());
    props.font_size = Some(text.font_size);
    props.line_height = match text.line_height {
        LineHeight::Pixels(px) => Some(px),
        LineHeight::Percent(pct) => Some(text.font_size * pct / 100.0),
        LineHeight::Auto => None,
    };
    props.letter_spacing = match text.letter_spacing {
        LetterSpacing::Pixels(px) if px != 0.0 => Some(px),
        LetterSpacing::Percent(pct) if pct != 0.0 => Some(text.font_size * pct / 100.0),
        _ => None,
    };
    props
}

fn instance_props(node: &SceneNode, index: &TokenIndex) -> InstanceProps {
    let component_name = node
        .component_key
        .as_deref()
        .and_then(|key| index.component_by_key(key))
        .map(|component| component.name.clone());
    InstanceProps {
        component_key: node.component_key.clone(),
        component_name,
        component_properties: node.component_properties.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::memory::MemoryScene;
    use crate::render::{render, RenderOptions};
    use design_schema::{parse_design_document, Viewport};

    const VIEWPORT: Viewport = Viewport::new(390.0, 844.0);

    const DOCUMENT: &str = r#"{
        "name": "Profile",
        "paddingVariable": "Spacing/md",
        "itemSpacing": 12,
        "fills": [{"colorVariable": "Primary/500"}],
        "children": [
            {"type": "TEXT", "name": "Title", "characters": "Jane", "textStyleName": "body"},
            {"type": "TEXT", "name": "Bio", "characters": "Hello", "fontSize": 14, "textAlignHorizontal": "CENTER",
             "layoutSizingHorizontal": "FILL"},
            {"type": "FRAME", "name": "Actions", "layoutMode": "HORIZONTAL", "paddingTop": 4, "children": [
                {"type": "INSTANCE", "componentKey": "btn-key"},
                {"type": "INSTANCE", "name": "Ghost", "componentKey": "missing", "children": [{"type": "TEXT", "characters": "x"}]},
                {"type": "ELLIPSE", "width": 24, "height": 24, "opacity": 0.5}
            ]},
            {"type": "LINE", "width": 300, "strokes": [{"color": {"r": 0.9, "g": 0.9, "b": 0.9}}]},
            {"type": "RECTANGLE", "name": "Badge", "layoutPositioning": "ABSOLUTE", "x": 10, "y": 12, "cornerRadius": 4}
        ]
    }"#;

    /// Node kinds and child counts at every level
    #[derive(Debug, PartialEq)]
    struct Shape(NodeKind, Vec<Shape>);

    fn shape(scene: &MemoryScene, id: &NodeId) -> Shape {
        let node = scene.read_node(id).unwrap();
        Shape(
            node.kind,
            node.children.iter().map(|c| shape(scene, c)).collect(),
        )
    }

    fn rendered() -> (MemoryScene, TokenIndex, NodeId) {
        let _ = env_logger::builder().is_test(true).try_init();
        let (mut scene, index) = fixtures::scene();
        let document = parse_design_document(DOCUMENT).unwrap();
        let artifact =
            render(&document, VIEWPORT, &index, &mut scene, &RenderOptions::default()).unwrap();
        (scene, index, artifact.root)
    }

    #[test]
    fn test_empty_selection() {
        let (scene, index) = fixtures::scene();
        assert!(serialize_selection(&scene, &index).unwrap().is_none());
        assert_eq!(selection_summary(&scene), SelectionSummary::default());
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let (scene, index, root) = rendered();
        let document = serialize_selection(&scene, &index).unwrap().unwrap();

        let json = document.to_json().unwrap();
        let reparsed = parse_design_document(&json).unwrap();
        let (mut fresh, fresh_index) = fixtures::scene();
        let artifact =
            render(&reparsed, VIEWPORT, &fresh_index, &mut fresh, &RenderOptions::default())
                .unwrap();

        assert_eq!(shape(&fresh, &artifact.root), shape(&scene, &root));
    }

    #[test]
    fn test_references_map_back_to_names() {
        let (scene, index, _) = rendered();
        let document = serialize_selection(&scene, &index).unwrap().unwrap();

        assert_eq!(document.name, "Profile");
        assert_eq!(document.layout.padding.padding_variable.as_deref(), Some("Spacing/md"));
        assert_eq!(document.layout.padding.padding, Some(16.0));
        assert_eq!(document.layout.item_spacing, Some(12.0));
        assert_eq!(
            document.appearance.fills[0].color_variable.as_deref(),
            Some("Primary/500")
        );

        match &document.children[0].kind {
            ElementKind::Text(text) => {
                assert_eq!(text.text_style_name.as_deref(), Some("Typography/Body/Regular"));
                assert!(text.font_family.is_none());
            }
            other => panic!("unexpected kind {:?}", other),
        }
        match &document.children[1].kind {
            ElementKind::Text(text) => {
                assert_eq!(text.font_family.as_deref(), Some("Inter"));
                assert_eq!(text.font_size, Some(14.0));
                assert_eq!(text.text_align_horizontal, Some(TextAlign::Center));
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(
            document.children[1].props.child.layout_sizing_horizontal,
            Some(SizingIntent::Fill)
        );

        let actions = &document.children[2];
        match &actions.props.children[0].kind {
            ElementKind::Instance(instance) => {
                assert_eq!(instance.component_key.as_deref(), Some("btn-key"));
                assert_eq!(instance.component_name.as_deref(), Some("Button/Primary"));
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(actions.props.children[1].kind, ElementKind::Frame);
    }

    #[test]
    fn test_neutral_values_omitted() {
        let (scene, index, _) = rendered();
        let document = serialize_selection(&scene, &index).unwrap().unwrap();

        let title = &document.children[0].props;
        assert!(title.appearance.opacity.is_none());
        assert!(title.child.layout_grow.is_none());
        assert!(title.child.layout_align.is_none());
        assert!(title.x.is_none());

        let actions = &document.children[2].props;
        assert_eq!(actions.layout.padding.padding_top, Some(4.0));
        assert!(actions.layout.padding.padding_bottom.is_none());
        assert!(actions.layout.primary_axis_align_items.is_none());
        let ellipse = &actions.children[2].props;
        assert_eq!(ellipse.appearance.opacity, Some(0.5));
        assert_eq!((ellipse.width, ellipse.height), (Some(24.0), Some(24.0)));

        let badge = &document.children[4].props;
        assert_eq!(badge.child.layout_positioning, Some(LayoutPositioning::Absolute));
        assert_eq!((badge.x, badge.y), (Some(10.0), Some(12.0)));
        assert_eq!(badge.appearance.corner_radius, Some(4.0));

        let json = document.to_json().unwrap();
        assert!(!json.contains("\"opacity\":1"));
        assert!(!json.contains("INHERIT"));
    }

    #[test]
    fn test_multi_selection_is_wrapped() {
        let (mut scene, index, root) = rendered();
        let children = scene.read_node(&root).unwrap().children;
        scene
            .set_selection(&[children[0].clone(), children[3].clone()])
            .unwrap();

        let document = serialize_selection(&scene, &index).unwrap().unwrap();
        assert_eq!(document.name, "Selection");
        assert_eq!(document.children.len(), 2);
        assert_eq!(document.children[1].kind, ElementKind::Line);

        let summary = selection_summary(&scene);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.names[0], "Title");
    }
}
