use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rayon::prelude::*;

use crate::error::{EnrichmentError, Result};

/// Parent to immediate-children ("is-a") relationships between terms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermHierarchy {
    children: HashMap<String, Vec<String>>,
}
impl TermHierarchy {
    pub fn new(children: HashMap<String, Vec<String>>) -> Self {
        Self { children }
    }

    /// Records `child` as an immediate child of `parent`
    pub fn add_child(&mut self, parent: &str, child: &str) {
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
    }

    pub fn children(&self, term: &str) -> &[String] {
        self.children.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every term reachable from `term` through child edges
    ///
    /// A term reachable through several parents appears once. Returns
    /// [`EnrichmentError::CycleDetected`] if the traversal reaches a term that
    /// is still on the current path.
    pub fn descendants(&self, term: &str) -> Result<BTreeSet<String>> {
        enum Visit<'a> {
            Enter(&'a str),
            Exit(&'a str),
        }

        let mut found = BTreeSet::new();
        let mut finished = HashSet::new();
        let mut on_path = HashSet::new();
        let mut stack = vec![Visit::Enter(term)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(node) => {
                    if finished.contains(node) {
                        continue;
                    }
                    on_path.insert(node);
                    stack.push(Visit::Exit(node));
                    for child in self.children(node).iter().rev() {
                        if on_path.contains(child.as_str()) {
                            return Err(EnrichmentError::CycleDetected(child.clone()));
                        }
                        found.insert(child.clone());
                        stack.push(Visit::Enter(child.as_str()));
                    }
                }
                Visit::Exit(node) => {
                    on_path.remove(node);
                    finished.insert(node);
                }
            }
        }
        Ok(found)
    }

    /// Descendant closure of every term of interest
    ///
    /// Terms are independent so the closures are computed in parallel.
    pub fn closure(&self, terms: &[String]) -> Result<BTreeMap<String, BTreeSet<String>>> {
        terms
            .par_iter()
            .map(|term| self.descendants(term).map(|found| (term.clone(), found)))
            .collect()
    }
}
impl FromIterator<(String, Vec<String>)> for TermHierarchy {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
