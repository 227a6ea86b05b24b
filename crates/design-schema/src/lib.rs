//! Design document schema
//!
//! This crate defines the typed tree that generative models emit and that the
//! renderer consumes:
//! - **DesignDocument**: the root frame (viewport-sized screen)
//! - **Element**: a closed sum type over frames, text, shapes and instances
//! - **Paint / Effect**: fills, strokes, shadows and blurs
//!
//! It also owns the tolerant parser that turns raw (possibly truncated)
//! model output into a `DesignDocument`.
//!
//! # Example
//!
//! ```rust,ignore
//! use design_schema::parse_design_document;
//!
//! let raw = r#"Here you go: {"name": "Card", "children": [{"type": "TEXT", "characters": "Hi"}]}"#;
//! let doc = parse_design_document(raw)?;
//! assert_eq!(doc.children.len(), 1);
//! ```

pub mod color;
pub mod document;
pub mod element;
pub mod layout;
pub mod paint;
pub mod parse;

pub use color::Rgba;
pub use document::{Appearance, ContainerLayout, DesignDocument, Padding, Side, Viewport};
pub use element::{ChildLayout, Element, ElementKind, FontWeight, InstanceProps, NodeProps, TextProps};
pub use layout::{
    ChildAlign, CounterAxisAlign, LayoutMode, LayoutPositioning, PrimaryAxisAlign, SizingIntent,
    TextAlign,
};
pub use paint::{Effect, EffectKind, GradientStop, Offset, Paint, PaintKind};
pub use parse::{parse_design_document, repair_truncated_json, ParseError};
