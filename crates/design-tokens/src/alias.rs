//! Alias-chain resolution
//!
//! A variable's value may point at another variable, which may itself be an
//! alias. Chains are flattened eagerly, to a bounded depth, at index build
//! time.

use std::collections::{HashMap, HashSet};

use crate::source::{Variable, VariableCollection, VariableValue};

/// Lookup context for resolving alias chains
pub struct AliasResolver<'a> {
    variables: HashMap<&'a str, &'a Variable>,
    default_modes: HashMap<&'a str, &'a str>,
    max_depth: usize,
}

impl<'a> AliasResolver<'a> {
    pub fn new(
        variables: &'a [Variable],
        collections: &'a [VariableCollection],
        max_depth: usize,
    ) -> Self {
        Self {
            variables: variables.iter().map(|v| (v.id.as_str(), v)).collect(),
            default_modes: collections
                .iter()
                .map(|c| (c.id.as_str(), c.default_mode_id.as_str()))
                .collect(),
            max_depth,
        }
    }

    /// Raw stored value of a variable in its collection's default mode
    pub fn default_value(&self, variable: &'a Variable) -> Option<&'a VariableValue> {
        let mode = self.default_modes.get(variable.collection_id.as_str());
        mode.and_then(|m| variable.values_by_mode.get(*m))
            // Collections missing from the host listing fall back to any mode
            .or_else(|| variable.values_by_mode.values().next())
    }

    /// Follow aliases to a concrete value.
    ///
    /// Returns `None` for dangling references, cycles, or chains longer than
    /// the configured depth.
    pub fn resolve(&self, variable: &'a Variable) -> Option<VariableValue> {
        let mut current = variable;
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(current.id.as_str());

        for _ in 0..=self.max_depth {
            match self.default_value(current)? {
                VariableValue::Alias(target_id) => {
                    if !visited.insert(target_id.as_str()) {
                        log::warn!("Alias cycle detected at variable '{}'", variable.name);
                        return None;
                    }
                    current = self.variables.get(target_id.as_str())?;
                }
                concrete => return Some(concrete.clone()),
            }
        }

        log::warn!(
            "Alias chain for '{}' exceeds {} hops",
            variable.name,
            self.max_depth
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::source::VariableType;

    fn var(id: &str, value: VariableValue) -> Variable {
        Variable {
            id: id.into(),
            name: id.into(),
            collection_id: "c".into(),
            resolved_type: VariableType::Float,
            values_by_mode: BTreeMap::from([("m".to_string(), value)]),
            description: None,
        }
    }

    fn collections() -> Vec<VariableCollection> {
        vec![VariableCollection {
            id: "c".into(),
            name: "Numbers".into(),
            default_mode_id: "m".into(),
        }]
    }

    #[test]
    fn test_resolves_chain() {
        let vars = vec![
            var("a", VariableValue::Alias("b".into())),
            var("b", VariableValue::Alias("c".into())),
            var("c", VariableValue::Float(8.0)),
        ];
        let cols = collections();
        let resolver = AliasResolver::new(&vars, &cols, 10);
        assert_eq!(resolver.resolve(&vars[0]), Some(VariableValue::Float(8.0)));
    }

    #[test]
    fn test_cycle_yields_none() {
        let vars = vec![
            var("a", VariableValue::Alias("b".into())),
            var("b", VariableValue::Alias("a".into())),
        ];
        let cols = collections();
        let resolver = AliasResolver::new(&vars, &cols, 10);
        assert_eq!(resolver.resolve(&vars[0]), None);
    }

    #[test]
    fn test_depth_bound() {
        let mut vars: Vec<Variable> = (0..5)
            .map(|i| var(&format!("v{}", i), VariableValue::Alias(format!("v{}", i + 1))))
            .collect();
        vars.push(var("v5", VariableValue::Float(4.0)));
        let cols = collections();

        assert_eq!(
            AliasResolver::new(&vars, &cols, 5).resolve(&vars[0]),
            Some(VariableValue::Float(4.0))
        );
        assert_eq!(AliasResolver::new(&vars, &cols, 4).resolve(&vars[0]), None);
    }

    #[test]
    fn test_dangling_alias() {
        let vars = vec![var("a", VariableValue::Alias("missing".into()))];
        let cols = collections();
        assert_eq!(AliasResolver::new(&vars, &cols, 10).resolve(&vars[0]), None);
    }
}
