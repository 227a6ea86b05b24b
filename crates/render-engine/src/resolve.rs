//! Reference resolution
//!
//! Every symbolic reference in a document resolves in three tiers: a design
//! token from the index, then the literal value written next to it, then a
//! fixed default. A miss on the first tier is never an error; it is recorded
//! as a [`ResolutionWarning`] and rendering continues with the next tier.

use design_schema::{Effect, EffectKind, Offset, Paint, PaintKind, Rgba};
use design_tokens::TokenIndex;

use crate::constants::defaults;
use crate::scene::{ColorStop, GradientKind, HostEffect, HostPaint};
use crate::warning::{ResolutionWarning, WarningKind};

/// A spacing value ready to apply
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedSpacing {
    /// Token value plus the variable to bind to
    Bound { value: f64, variable_id: String },
    Literal(f64),
}

impl ResolvedSpacing {
    pub fn value(&self) -> f64 {
        match self {
            ResolvedSpacing::Bound { value, .. } => *value,
            ResolvedSpacing::Literal(value) => *value,
        }
    }
}

/// Resolves references against a token index and collects warnings
pub struct Resolver<'a> {
    index: &'a TokenIndex,
    warnings: Vec<ResolutionWarning>,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a TokenIndex) -> Self {
        Self {
            index,
            warnings: Vec::new(),
        }
    }

    pub fn index(&self) -> &'a TokenIndex {
        self.index
    }

    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ResolutionWarning> {
        self.warnings
    }

    /// Record and log a resolution warning.
    ///
    /// A repeat of the previous warning (e.g. one padding variable read for
    /// all four sides) is dropped.
    pub fn warn(
        &mut self,
        kind: WarningKind,
        node: &str,
        reference: impl Into<String>,
        fallback: impl Into<String>,
    ) {
        let warning = ResolutionWarning {
            kind,
            node: node.to_string(),
            reference: reference.into(),
            fallback: fallback.into(),
        };
        if self.warnings.last() == Some(&warning) {
            return;
        }
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Record a warning that was already logged by the caller
    pub fn push(&mut self, warning: ResolutionWarning) {
        self.warnings.push(warning);
    }

    // ─── PAINTS ─────────────────────────────────────────────────────

    /// Resolve a paint list; invisible and unsupported paints are dropped
    pub fn paints(&mut self, node: &str, paints: &[Paint], default: Rgba) -> Vec<HostPaint> {
        paints
            .iter()
            .filter(|paint| paint.is_visible())
            .filter_map(|paint| self.paint(node, paint, default))
            .collect()
    }

    pub fn paint(&mut self, node: &str, paint: &Paint, default: Rgba) -> Option<HostPaint> {
        match paint.kind {
            PaintKind::Solid => Some(self.solid(node, paint, default)),
            PaintKind::GradientLinear => self.gradient(node, paint, GradientKind::Linear, default),
            PaintKind::GradientRadial => self.gradient(node, paint, GradientKind::Radial, default),
            PaintKind::Unsupported => {
                log::debug!("{}: skipping unsupported paint type", node);
                None
            }
        }
    }

    fn solid(&mut self, node: &str, paint: &Paint, default: Rgba) -> HostPaint {
        if let Some(name) = paint.color_variable.as_deref() {
            if let Some(token) = self.index.find_color(name) {
                return HostPaint::Solid {
                    color: token.value.opaque(),
                    opacity: paint.opacity.unwrap_or(token.value.a),
                    bound_variable: Some(token.id.clone()),
                };
            }
        }

        let color = self.color_fallback(node, paint.color_variable.as_deref(), paint.color, default);
        HostPaint::Solid {
            color: color.opaque(),
            opacity: paint.opacity.unwrap_or(color.a),
            bound_variable: None,
        }
    }

    fn gradient(
        &mut self,
        node: &str,
        paint: &Paint,
        kind: GradientKind,
        default: Rgba,
    ) -> Option<HostPaint> {
        if paint.gradient_stops.len() < 2 {
            log::debug!(
                "{}: gradient with {} stops skipped",
                node,
                paint.gradient_stops.len()
            );
            return None;
        }
        let stops = paint
            .gradient_stops
            .iter()
            .map(|stop| {
                let token = stop
                    .color_variable
                    .as_deref()
                    .and_then(|name| self.index.find_color(name))
                    .map(|token| token.value);
                let color = match token {
                    Some(value) => value,
                    None => self.color_fallback(node, stop.color_variable.as_deref(), stop.color, default),
                };
                ColorStop {
                    position: stop.position.clamp(0.0, 1.0),
                    color,
                }
            })
            .collect();
        Some(HostPaint::Gradient {
            kind,
            stops,
            opacity: paint.opacity.unwrap_or(1.0),
        })
    }

    /// Second and third tiers, warning when a named variable missed
    fn color_fallback(
        &mut self,
        node: &str,
        variable: Option<&str>,
        literal: Option<Rgba>,
        default: Rgba,
    ) -> Rgba {
        let color = literal.map(|c| c.clamped()).unwrap_or(default);
        if let Some(name) = variable {
            let fallback = match literal {
                Some(_) => format!("literal {}", color.to_hex()),
                None => format!("default {}", color.to_hex()),
            };
            self.warn(WarningKind::ColorVariable, node, name, fallback);
        }
        color
    }

    // ─── EFFECTS ────────────────────────────────────────────────────

    pub fn effects(&mut self, node: &str, effects: &[Effect]) -> Vec<HostEffect> {
        effects
            .iter()
            .filter(|effect| effect.is_visible())
            .filter_map(|effect| {
                if effect.kind == EffectKind::Unsupported {
                    log::debug!("{}: skipping unsupported effect type", node);
                    return None;
                }
                Some(resolve_effect(effect))
            })
            .collect()
    }

    // ─── SPACING ────────────────────────────────────────────────────

    /// Resolve a spacing value; `None` leaves the host default in place
    pub fn spacing(
        &mut self,
        node: &str,
        variable: Option<&str>,
        literal: Option<f64>,
    ) -> Option<ResolvedSpacing> {
        if let Some(name) = variable {
            if let Some(token) = self.index.find_spacing(name) {
                return Some(ResolvedSpacing::Bound {
                    value: token.value,
                    variable_id: token.id.clone(),
                });
            }
            let fallback = match literal {
                Some(value) => format!("literal {}", value),
                None => "default 0".to_string(),
            };
            self.warn(WarningKind::SpacingVariable, node, name, fallback);
        }
        literal.map(|value| ResolvedSpacing::Literal(value.max(0.0)))
    }
}

fn resolve_effect(effect: &Effect) -> HostEffect {
    let is_shadow = effect.kind.is_shadow();
    let color = match effect.color {
        Some(color) => color.clamped(),
        None if is_shadow => defaults::SHADOW,
        None => Rgba::BLACK,
    };
    let offset = match effect.offset {
        Some(offset) => offset,
        None if is_shadow => Offset {
            x: 0.0,
            y: defaults::SHADOW_OFFSET_Y,
        },
        None => Offset::default(),
    };
    HostEffect {
        kind: effect.kind,
        color,
        offset,
        radius: effect.radius.unwrap_or(defaults::EFFECT_RADIUS).max(0.0),
        spread: if is_shadow {
            effect.spread.unwrap_or(0.0)
        } else {
            0.0
        },
    }
}
