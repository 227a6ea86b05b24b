//! Sizing intent translation
//!
//! Documents speak in per-axis intents (FIXED / HUG / FILL). The host only
//! knows FIXED and AUTO on a container's own axes, and expresses FILL on the
//! child: `layoutGrow` along the parent's primary axis, `layoutAlign =
//! STRETCH` along its counter axis.

use design_schema::{ChildAlign, LayoutMode, NodeProps, SizingIntent};

use crate::scene::{AxisSizing, TextAutoResize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Resolved intent for both screen axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisIntents {
    pub horizontal: SizingIntent,
    pub vertical: SizingIntent,
}

impl AxisIntents {
    pub fn get(&self, axis: Axis) -> SizingIntent {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    fn set(&mut self, axis: Axis, intent: SizingIntent) {
        match axis {
            Axis::Horizontal => self.horizontal = intent,
            Axis::Vertical => self.vertical = intent,
        }
    }
}

/// Intent written on the element for `axis`, if any.
///
/// `layoutSizing*` wins; otherwise the node's own primary/counter sizing mode
/// is mapped onto the screen axis through its layout direction.
pub fn declared_intent(props: &NodeProps, layout_mode: LayoutMode, axis: Axis) -> Option<SizingIntent> {
    let child = match axis {
        Axis::Horizontal => props.child.layout_sizing_horizontal,
        Axis::Vertical => props.child.layout_sizing_vertical,
    };
    child.or_else(|| match (layout_mode, axis) {
        (LayoutMode::Horizontal, Axis::Horizontal) | (LayoutMode::Vertical, Axis::Vertical) => {
            props.layout.primary_axis_sizing_mode
        }
        (LayoutMode::Horizontal, Axis::Vertical) | (LayoutMode::Vertical, Axis::Horizontal) => {
            props.layout.counter_axis_sizing_mode
        }
        (LayoutMode::None, _) => None,
    })
}

/// Resolve the intent of both axes.
///
/// Undeclared axes with an explicit size are FIXED; otherwise nodes that can
/// hug (auto-layout containers, text) hug and everything else stays FIXED.
/// FILL needs an auto-layout parent and degrades the same way without one.
pub fn resolve_intents(
    props: &NodeProps,
    layout_mode: LayoutMode,
    can_hug: bool,
    parent_is_auto_layout: bool,
) -> AxisIntents {
    let mut intents = AxisIntents {
        horizontal: SizingIntent::Fixed,
        vertical: SizingIntent::Fixed,
    };
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let has_size = match axis {
            Axis::Horizontal => props.width.is_some(),
            Axis::Vertical => props.height.is_some(),
        };
        let implicit = if has_size || !can_hug {
            SizingIntent::Fixed
        } else {
            SizingIntent::Hug
        };
        let intent = match declared_intent(props, layout_mode, axis) {
            Some(SizingIntent::Fill) if !parent_is_auto_layout => implicit,
            Some(SizingIntent::Hug) if !can_hug => SizingIntent::Fixed,
            Some(intent) => intent,
            None => implicit,
        };
        intents.set(axis, intent);
    }
    intents
}

/// Host sizing mode of a container's own axis
pub fn host_sizing(intent: SizingIntent) -> AxisSizing {
    match intent {
        SizingIntent::Fixed => AxisSizing::Fixed,
        SizingIntent::Hug | SizingIntent::Fill => AxisSizing::Auto,
    }
}

/// Split screen-axis sizing into (primary, counter) for a layout direction
pub fn to_layout_axes<T>(layout_mode: LayoutMode, horizontal: T, vertical: T) -> (T, T) {
    match layout_mode {
        LayoutMode::Horizontal => (horizontal, vertical),
        _ => (vertical, horizontal),
    }
}

/// How a child fills an auto-layout parent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Participation {
    pub grow: Option<f64>,
    pub align: Option<ChildAlign>,
}

/// FILL on the parent's primary axis grows, on its counter axis stretches
pub fn participation(intents: AxisIntents, parent_layout: LayoutMode) -> Participation {
    if !parent_layout.is_auto_layout() {
        return Participation::default();
    }
    let (primary, counter) = to_layout_axes(parent_layout, intents.horizontal, intents.vertical);
    Participation {
        grow: (primary == SizingIntent::Fill).then_some(1.0),
        align: (counter == SizingIntent::Fill).then_some(ChildAlign::Stretch),
    }
}

/// Text resize behaviour for the resolved intents.
///
/// A hugging width always auto-sizes both axes; a fixed or filled width wraps
/// and grows in height unless the height is fixed as well.
pub fn text_auto_resize(intents: AxisIntents) -> TextAutoResize {
    match (intents.horizontal, intents.vertical) {
        (SizingIntent::Hug, _) => TextAutoResize::WidthAndHeight,
        (_, SizingIntent::Fixed) => TextAutoResize::None,
        _ => TextAutoResize::Height,
    }
}

/// Map host state back to the intent of one screen axis
pub fn intent_from_host(
    own_sizing: Option<AxisSizing>,
    fills_parent: bool,
) -> SizingIntent {
    if fills_parent {
        return SizingIntent::Fill;
    }
    match own_sizing {
        Some(AxisSizing::Auto) => SizingIntent::Hug,
        _ => SizingIntent::Fixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_schema::ChildLayout;

    fn props(width: Option<f64>, height: Option<f64>) -> NodeProps {
        NodeProps {
            width,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_explicit_size_means_fixed() {
        let intents = resolve_intents(&props(Some(320.0), None), LayoutMode::Vertical, true, false);
        assert_eq!(intents.horizontal, SizingIntent::Fixed);
        assert_eq!(intents.vertical, SizingIntent::Hug);
    }

    #[test]
    fn test_shapes_never_hug() {
        let intents = resolve_intents(&props(None, None), LayoutMode::None, false, true);
        assert_eq!(intents.horizontal, SizingIntent::Fixed);
        assert_eq!(intents.vertical, SizingIntent::Fixed);
    }

    #[test]
    fn test_layout_sizing_beats_own_mode() {
        let mut p = props(None, None);
        p.layout.primary_axis_sizing_mode = Some(SizingIntent::Fixed);
        p.child = ChildLayout {
            layout_sizing_vertical: Some(SizingIntent::Fill),
            ..Default::default()
        };
        let intents = resolve_intents(&p, LayoutMode::Vertical, true, true);
        assert_eq!(intents.vertical, SizingIntent::Fill);
    }

    #[test]
    fn test_own_modes_map_through_direction() {
        let mut p = props(None, None);
        p.layout.primary_axis_sizing_mode = Some(SizingIntent::Fixed);
        p.layout.counter_axis_sizing_mode = Some(SizingIntent::Hug);
        let intents = resolve_intents(&p, LayoutMode::Horizontal, true, false);
        assert_eq!(intents.horizontal, SizingIntent::Fixed);
        assert_eq!(intents.vertical, SizingIntent::Hug);
    }

    #[test]
    fn test_fill_without_auto_layout_parent_degrades() {
        let mut p = props(Some(200.0), None);
        p.child.layout_sizing_horizontal = Some(SizingIntent::Fill);
        p.child.layout_sizing_vertical = Some(SizingIntent::Fill);
        let intents = resolve_intents(&p, LayoutMode::Vertical, true, false);
        assert_eq!(intents.horizontal, SizingIntent::Fixed);
        assert_eq!(intents.vertical, SizingIntent::Hug);
    }

    #[test]
    fn test_participation_in_horizontal_parent() {
        let intents = AxisIntents {
            horizontal: SizingIntent::Fill,
            vertical: SizingIntent::Fill,
        };
        let p = participation(intents, LayoutMode::Horizontal);
        assert_eq!(p.grow, Some(1.0));
        assert_eq!(p.align, Some(ChildAlign::Stretch));

        let none = participation(intents, LayoutMode::None);
        assert_eq!(none, Participation::default());
    }

    #[test]
    fn test_participation_in_vertical_parent() {
        let intents = AxisIntents {
            horizontal: SizingIntent::Fill,
            vertical: SizingIntent::Hug,
        };
        let p = participation(intents, LayoutMode::Vertical);
        assert_eq!(p.grow, None);
        assert_eq!(p.align, Some(ChildAlign::Stretch));
    }

    #[test]
    fn test_text_auto_resize() {
        let hug = AxisIntents {
            horizontal: SizingIntent::Hug,
            vertical: SizingIntent::Hug,
        };
        assert_eq!(text_auto_resize(hug), TextAutoResize::WidthAndHeight);
        let wrap = AxisIntents {
            horizontal: SizingIntent::Fill,
            vertical: SizingIntent::Hug,
        };
        assert_eq!(text_auto_resize(wrap), TextAutoResize::Height);
        let fixed = AxisIntents {
            horizontal: SizingIntent::Fixed,
            vertical: SizingIntent::Fixed,
        };
        assert_eq!(text_auto_resize(fixed), TextAutoResize::None);
    }
}
