//! Program-variable / logical-variable map
//!
//! Built once per state: root bindings are expanded generation by
//! generation along the acyclic part of the heap graph, then inverted into
//! alias groups. Immutable afterwards.

use super::heap_graph::HeapGraph;
use crate::features::heap_resolution::domain::{child_name, root_name, AliasGroup, AliasSets};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    pvar_to_lvar: BTreeMap<String, String>,
    lvar_to_group: BTreeMap<String, AliasGroup>,
}

impl VariableMap {
    /// Expand `roots` (source-level variable → lvar of its address) over `heap`
    pub fn build<'a>(roots: impl IntoIterator<Item = (&'a str, &'a str)>, heap: &HeapGraph) -> Self {
        let mut pvar_to_lvar = BTreeMap::new();
        let mut frontier: BTreeMap<String, String> = BTreeMap::new();
        for (pvar, lvar) in roots {
            let name = root_name(pvar);
            pvar_to_lvar.insert(name.clone(), lvar.to_string());
            frontier.insert(lvar.to_string(), name);
        }

        let mut generation = 0usize;
        while !frontier.is_empty() {
            let mut next: BTreeMap<String, String> = BTreeMap::new();
            for (lvar, parent_name) in &frontier {
                for (label, child) in heap.children_outside_cycles(lvar) {
                    let name = child_name(parent_name, label);
                    pvar_to_lvar.insert(name.clone(), child.to_string());
                    next.insert(child.to_string(), name);
                }
            }
            frontier = next;
            generation += 1;
        }
        tracing::trace!(
            "Expanded {} program variables in {} generations",
            pvar_to_lvar.len(),
            generation
        );

        let mut lvar_to_group: BTreeMap<String, AliasGroup> = BTreeMap::new();
        for (pvar, lvar) in &pvar_to_lvar {
            lvar_to_group
                .entry(lvar.clone())
                .or_default()
                .insert(pvar.clone());
        }

        Self {
            pvar_to_lvar,
            lvar_to_group,
        }
    }

    pub fn lvar_of(&self, pvar: &str) -> Option<&str> {
        self.pvar_to_lvar.get(pvar).map(String::as_str)
    }

    pub fn alias_group(&self, lvar: &str) -> Option<&AliasGroup> {
        self.lvar_to_group.get(lvar)
    }

    /// Representative alias: the lexicographically greatest member
    pub fn first_alias(&self, lvar: &str) -> Option<&str> {
        self.lvar_to_group
            .get(lvar)
            .and_then(|group| group.iter().next_back())
            .map(String::as_str)
    }

    /// Name a logical variable by its representative alias, or itself
    pub fn display_name(&self, lvar: &str) -> String {
        self.first_alias(lvar).unwrap_or(lvar).to_string()
    }

    pub fn alias_groups(&self) -> Vec<AliasGroup> {
        self.lvar_to_group.values().cloned().collect()
    }

    pub fn pvars(&self) -> impl Iterator<Item = &String> {
        self.pvar_to_lvar.keys()
    }

    pub fn len(&self) -> usize {
        self.pvar_to_lvar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pvar_to_lvar.is_empty()
    }

    /// Alias groups of the given lvars; lvars without a mapping are dropped
    pub fn to_alias_sets<'a>(&self, lvars: impl IntoIterator<Item = &'a str>) -> AliasSets {
        lvars
            .into_iter()
            .filter_map(|lvar| {
                let group = self.lvar_to_group.get(lvar);
                if group.is_none() {
                    tracing::trace!("No program variable for {}", lvar);
                }
                group.cloned()
            })
            .collect()
    }
}
