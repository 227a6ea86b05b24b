//! Token vs primitive classification
//!
//! Semantic tokens ("Background/Primary") are what consumers should bind to;
//! primitives ("Blue/500") are raw palette values that tokens alias.

/// Collection names that mark semantic token collections
const TOKEN_COLLECTION_PATTERNS: &[&str] = &["semantic", "theme", "alias", "component"];

/// Collection names that mark raw primitive collections
const PRIMITIVE_COLLECTION_PATTERNS: &[&str] = &[
    "primitive",
    "base",
    "core",
    "foundation",
    "scale",
    "palette",
    "brand",
];

/// Variable name fragments that read as semantic roles
const SEMANTIC_NAME_PATTERNS: &[&str] = &[
    "background",
    "foreground",
    "surface",
    "primary",
    "secondary",
    "tertiary",
    "accent",
    "border",
    "text",
    "icon",
    "success",
    "warning",
    "error",
    "danger",
    "info",
    "muted",
    "disabled",
    "hover",
    "focus",
    "overlay",
];

/// Name fragments that mark a number variable as spacing
const SPACING_NAME_PATTERNS: &[&str] = &[
    "spacing", "space", "gap", "padding", "margin", "inset", "gutter",
];

/// Whether a collection holds semantic tokens.
///
/// Exact `tokens`/`token` always wins; otherwise a collection that matches
/// both semantic and primitive patterns is treated as primitive.
pub fn is_token_collection(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    if lower == "tokens" || lower == "token" {
        return true;
    }
    let semantic = TOKEN_COLLECTION_PATTERNS.iter().any(|p| lower.contains(p));
    let primitive = PRIMITIVE_COLLECTION_PATTERNS
        .iter()
        .any(|p| lower.contains(p));
    semantic && !primitive
}

/// Whether a variable name reads as a semantic role
pub fn has_semantic_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    SEMANTIC_NAME_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Whether a number variable describes spacing
pub fn is_spacing_name(variable_name: &str, collection_name: &str) -> bool {
    let variable = variable_name.to_lowercase();
    let collection = collection_name.to_lowercase();
    SPACING_NAME_PATTERNS
        .iter()
        .any(|p| variable.contains(p) || collection.contains(p))
}
