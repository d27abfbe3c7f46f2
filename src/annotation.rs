use std::collections::{BTreeMap, BTreeSet, HashSet};

use derive_new::new;
use itertools::Itertools;

use crate::config::{Aspect, AspectFilter};

/// A single protein-term association
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, new)]
pub struct Annotation {
    pub accession: String,
    pub term_id: String,
    pub aspect: Aspect,
    pub term_name: String,
}
impl Annotation {
    pub fn key(&self) -> TermKey {
        TermKey::new(self.term_id.clone(), self.term_name.clone(), self.aspect)
    }
}

/// Identifies a tested term in the results
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, new)]
pub struct TermKey {
    pub id: String,
    pub name: String,
    pub aspect: Aspect,
}

/// The protein-term association relation
///
/// Rows are kept in insertion order and exact duplicates are collapsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    rows: Vec<Annotation>,
}
impl AnnotationTable {
    pub fn new(rows: Vec<Annotation>) -> Self {
        let mut table = Self { rows };
        table.dedup();
        table
    }

    /// Associates every accession with a single term
    ///
    /// Terms outside the ontology get the id `CUSTOM:<name>` unless one is given.
    pub fn for_term<I, S>(accessions: I, aspect: Aspect, name: &str, id: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.map_or_else(|| format!("CUSTOM:{name}"), str::to_string);
        let rows = accessions
            .into_iter()
            .map(|accession| Annotation::new(accession.into(), id.clone(), aspect, name.to_string()))
            .collect();
        Self::new(rows)
    }

    pub fn rows(&self) -> &[Annotation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends rows, collapsing any exact duplicates
    pub fn extend(&mut self, rows: impl IntoIterator<Item = Annotation>) {
        self.rows.extend(rows);
        self.dedup();
    }

    fn dedup(&mut self) {
        let rows = std::mem::take(&mut self.rows);
        self.rows = rows.into_iter().unique().collect();
    }

    /// Rows annotated exactly to `term_id`
    pub fn rows_for_term<'a>(&'a self, term_id: &'a str) -> impl Iterator<Item = &'a Annotation> {
        self.rows.iter().filter(move |row| row.term_id == term_id)
    }

    /// The display name of a term, taken from its first row
    pub fn term_name(&self, term_id: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.term_id == term_id)
            .map(|row| row.term_name.as_str())
    }

    pub fn filter_aspect(&self, filter: AspectFilter) -> Self {
        self.filtered(|row| filter.accepts(row.aspect))
    }

    /// Keeps rows whose term id or term name exactly matches an entry of `subset`
    pub fn filter_subset(&self, subset: &[String]) -> Self {
        let wanted = subset.iter().map(String::as_str).collect::<HashSet<_>>();
        self.filtered(|row| {
            wanted.contains(row.term_id.as_str()) || wanted.contains(row.term_name.as_str())
        })
    }

    /// Resolves a subset of ids or names to the unique term ids it matches
    pub fn resolve_subset(&self, subset: &[String]) -> Vec<String> {
        self.filter_subset(subset)
            .rows
            .into_iter()
            .map(|row| row.term_id)
            .unique()
            .collect()
    }

    pub fn retain_accessions(&self, accessions: &HashSet<&str>) -> Self {
        self.filtered(|row| accessions.contains(row.accession.as_str()))
    }

    pub fn accessions(&self) -> HashSet<&str> {
        self.rows.iter().map(|row| row.accession.as_str()).collect()
    }

    /// Groups accessions by term, ordered by (id, name, aspect)
    pub fn group_by_term(&self) -> BTreeMap<TermKey, BTreeSet<&str>> {
        let mut groups: BTreeMap<TermKey, BTreeSet<&str>> = BTreeMap::new();
        for row in &self.rows {
            groups
                .entry(row.key())
                .or_default()
                .insert(row.accession.as_str());
        }
        groups
    }

    fn filtered(&self, predicate: impl Fn(&Annotation) -> bool) -> Self {
        Self {
            rows: self.rows.iter().filter(|row| predicate(row)).cloned().collect(),
        }
    }
}
impl FromIterator<Annotation> for AnnotationTable {
    fn from_iter<T: IntoIterator<Item = Annotation>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
