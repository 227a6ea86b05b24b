//! Session-scoped token index
//!
//! Built once per generation/render session from a [`DesignSystemSource`]
//! and read-only afterwards. Each render call gets its own index so a
//! design system edited between runs is never served stale.

use std::collections::HashMap;

use design_schema::Rgba;
use serde::{Deserialize, Serialize};

use crate::alias::AliasResolver;
use crate::classify::{has_semantic_name, is_spacing_name, is_token_collection};
use crate::matching::find_by_name;
use crate::source::{
    Component, DesignSystemSource, TextStyle, TokenSourceError, VariableType, VariableValue,
};

/// Tuning limits for index construction.
///
/// The defaults bound prompt size; none of the numbers are load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexLimits {
    /// Maximum alias hops followed before giving up
    pub max_alias_depth: usize,
    pub max_colors: usize,
    pub max_spacing: usize,
    pub max_text_styles: usize,
    pub max_components: usize,
}

impl Default for IndexLimits {
    fn default() -> Self {
        Self {
            max_alias_depth: 10,
            max_colors: 50,
            max_spacing: 30,
            max_text_styles: 30,
            max_components: 30,
        }
    }
}

/// A color variable with its alias chain resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    pub id: String,
    pub name: String,
    pub collection: String,
    pub value: Rgba,
    /// Semantic token (true) or raw primitive (false)
    pub is_token: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A spacing variable with its alias chain resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingToken {
    pub id: String,
    pub name: String,
    pub collection: String,
    pub value: f64,
    pub is_token: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The exposed design system: what the prompt lists and the renderer binds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSystemSnapshot {
    pub colors: Vec<ColorToken>,
    pub spacing: Vec<SpacingToken>,
    pub text_styles: Vec<TextStyle>,
    pub components: Vec<Component>,
}

impl DesignSystemSnapshot {
    /// True when no category has any entry
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.spacing.is_empty()
            && self.text_styles.is_empty()
            && self.components.is_empty()
    }
}

/// Read-only lookup tables over a design-system snapshot
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    snapshot: DesignSystemSnapshot,
}

impl TokenIndex {
    /// Index with no entries; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an existing snapshot (e.g. one received from the UI)
    pub fn from_snapshot(snapshot: DesignSystemSnapshot) -> Self {
        Self { snapshot }
    }

    /// Read the host design system and build the index.
    pub fn build(
        source: &dyn DesignSystemSource,
        limits: &IndexLimits,
    ) -> Result<Self, TokenSourceError> {
        let collections = source.variable_collections()?;
        let variables = source.variables()?;

        let collection_names: HashMap<&str, &str> = collections
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();
        let resolver = AliasResolver::new(&variables, &collections, limits.max_alias_depth);

        let mut colors = Vec::new();
        let mut spacing = Vec::new();
        let mut unresolved = 0usize;

        for variable in &variables {
            let collection = collection_names
                .get(variable.collection_id.as_str())
                .copied()
                .unwrap_or_default();
            let is_alias = resolver
                .default_value(variable)
                .map(VariableValue::is_alias)
                .unwrap_or(false);
            let is_token =
                is_token_collection(collection) || is_alias || has_semantic_name(&variable.name);

            match (variable.resolved_type, resolver.resolve(variable)) {
                (VariableType::Color, Some(VariableValue::Color(value))) => {
                    colors.push(ColorToken {
                        id: variable.id.clone(),
                        name: variable.name.clone(),
                        collection: collection.to_string(),
                        value,
                        is_token,
                        description: variable.description.clone(),
                    });
                }
                (VariableType::Float, Some(VariableValue::Float(value)))
                    if is_spacing_name(&variable.name, collection) =>
                {
                    spacing.push(SpacingToken {
                        id: variable.id.clone(),
                        name: variable.name.clone(),
                        collection: collection.to_string(),
                        value,
                        is_token,
                        description: variable.description.clone(),
                    });
                }
                (VariableType::Color | VariableType::Float, None) => unresolved += 1,
                _ => {}
            }
        }

        if unresolved > 0 {
            log::warn!("{} variables could not be resolved to a value", unresolved);
        }

        let mut colors = prefer_tokens(colors, |c| c.is_token);
        colors.truncate(limits.max_colors);

        let mut spacing = prefer_tokens(spacing, |s| s.is_token);
        spacing.sort_by(|a, b| a.value.total_cmp(&b.value));
        spacing.truncate(limits.max_spacing);

        let mut text_styles = source.text_styles()?;
        text_styles.truncate(limits.max_text_styles);

        let mut components = source.components()?;
        components.truncate(limits.max_components);

        log::info!(
            "Design system indexed: {} colors, {} spacing, {} text styles, {} components",
            colors.len(),
            spacing.len(),
            text_styles.len(),
            components.len()
        );

        Ok(Self {
            snapshot: DesignSystemSnapshot {
                colors,
                spacing,
                text_styles,
                components,
            },
        })
    }

    pub fn snapshot(&self) -> &DesignSystemSnapshot {
        &self.snapshot
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    // ─── LOOKUPS BY NAME ────────────────────────────────────────────

    pub fn find_color(&self, name: &str) -> Option<&ColorToken> {
        find_by_name(&self.snapshot.colors, name, |c| c.name.as_str())
    }

    pub fn find_spacing(&self, name: &str) -> Option<&SpacingToken> {
        find_by_name(&self.snapshot.spacing, name, |s| s.name.as_str())
    }

    pub fn find_text_style(&self, name: &str) -> Option<&TextStyle> {
        find_by_name(&self.snapshot.text_styles, name, |s| s.name.as_str())
    }

    pub fn find_component(&self, name: &str) -> Option<&Component> {
        find_by_name(&self.snapshot.components, name, |c| c.name.as_str())
    }

    // ─── LOOKUPS BY IDENTITY ────────────────────────────────────────

    pub fn component_by_key(&self, key: &str) -> Option<&Component> {
        self.snapshot.components.iter().find(|c| c.key == key)
    }

    pub fn color_by_id(&self, id: &str) -> Option<&ColorToken> {
        self.snapshot.colors.iter().find(|c| c.id == id)
    }

    pub fn spacing_by_id(&self, id: &str) -> Option<&SpacingToken> {
        self.snapshot.spacing.iter().find(|s| s.id == id)
    }

    pub fn text_style_by_id(&self, id: &str) -> Option<&TextStyle> {
        self.snapshot.text_styles.iter().find(|s| s.id == id)
    }
}

/// Keep only tokens when any exist, otherwise keep everything
fn prefer_tokens<T>(items: Vec<T>, is_token: impl Fn(&T) -> bool) -> Vec<T> {
    if items.iter().any(&is_token) {
        items.into_iter().filter(|item| is_token(item)).collect()
    } else {
        items
    }
}
