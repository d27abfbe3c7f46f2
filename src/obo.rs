//! Reading Gene Ontology terms and their "is-a" edges from OBO files.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result};

use crate::hierarchy::TermHierarchy;

/// Term names and the parent to children hierarchy of an ontology
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    pub names: HashMap<String, String>,
    pub hierarchy: TermHierarchy,
}

pub fn read_obo(path: &Path) -> Result<Ontology> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading ontology {}", path.display()))?;
    Ok(parse_obo(&text))
}

/// Parses the `[Term]` stanzas of an OBO document
///
/// Children are listed in the order their `is_a` lines appear.
pub fn parse_obo(text: &str) -> Ontology {
    let mut ontology = Ontology::default();
    let mut in_term = false;
    let mut id: Option<&str> = None;
    let mut name: Option<&str> = None;
    let mut parents: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim).chain(std::iter::once("[End]")) {
        if line.starts_with('[') {
            if let Some(term) = id.take() {
                if let Some(name) = name {
                    ontology.names.insert(term.to_string(), name.to_string());
                }
                for parent in parents.drain(..) {
                    ontology.hierarchy.add_child(parent, term);
                }
            }
            name = None;
            parents.clear();
            in_term = line == "[Term]";
            continue;
        }
        if !in_term {
            continue;
        }
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        match key {
            "id" => id = Some(value),
            "name" => name = Some(value),
            // is_a: GO:0005575 {source="x"} ! cellular_component
            "is_a" => {
                if let Some(parent) = value.split_whitespace().next() {
                    parents.push(parent);
                }
            }
            _ => {}
        }
    }
    ontology
}
