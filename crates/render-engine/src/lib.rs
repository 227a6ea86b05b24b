//! Design document renderer
//!
//! This crate turns a parsed [`design_schema::DesignDocument`] into nodes of a
//! host design tool and reads them back:
//! - **SceneHost**: the host surface (create, mutate, bind, attach, read)
//! - **render**: resolves references against a token index and builds the tree
//! - **serialize_selection**: the inverse, for edit requests
//! - **MemoryScene**: an in-memory host used by tests and the stdio bridge
//!
//! # Example
//!
//! ```rust,ignore
//! use render_engine::{render, MemoryScene, RenderOptions};
//!
//! let mut scene = MemoryScene::default();
//! let artifact = render(&document, viewport, &index, &mut scene, &RenderOptions::default())?;
//! println!("{} elements", artifact.element_count);
//! ```

pub mod constants;
pub mod memory;
pub mod render;
pub mod resolve;
pub mod scene;
pub mod serialize;
pub mod sizing;
pub mod text;
pub mod warning;

#[cfg(test)]
mod fixtures;

pub use memory::{MemoryScene, SceneSeed};
pub use render::{count_descendants, render, RenderError, RenderOptions, RenderedArtifact};
pub use resolve::{ResolvedSpacing, Resolver};
pub use scene::{
    AxisSizing, BindableField, HostEffect, HostPaint, NodeId, NodeKind, Property, SceneError,
    SceneHost, SceneNode,
};
pub use serialize::{selection_summary, serialize_selection, SelectionSummary};
pub use warning::{ResolutionWarning, WarningKind};
