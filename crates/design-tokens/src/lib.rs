//! Design-system token index
//!
//! Reads the host document's variables, text styles and components once per
//! session and exposes them as lookup tables:
//! - **Colors / spacing**: variables with alias chains flattened, semantic
//!   tokens preferred over raw primitives
//! - **Text styles** and **components**: capped lists
//!
//! Names generated by a model rarely match host naming exactly, so every
//! lookup tries an exact match, then case-insensitive, then substring.

pub mod alias;
pub mod classify;
pub mod index;
pub mod matching;
pub mod source;

pub use index::{
    ColorToken, DesignSystemSnapshot, IndexLimits, SpacingToken, TokenIndex,
};
pub use source::{
    Component, DesignSystemData, DesignSystemSource, FontName, LetterSpacing, LineHeight,
    TextStyle, TokenSourceError, Variable, VariableCollection, VariableType, VariableValue,
};
