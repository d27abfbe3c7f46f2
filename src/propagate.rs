use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::{
    annotation::{Annotation, AnnotationTable},
    error::{EnrichmentError, Result},
    hierarchy::TermHierarchy,
};

/// Copies descendant annotations up to each term of interest
///
/// Every row annotated to a descendant of `P` is cloned with `P`'s id and name,
/// so proteins annotated to a narrow subtype also count towards its ancestor.
/// Exact duplicate rows are collapsed afterwards.
pub fn propagate(
    closure: &BTreeMap<String, BTreeSet<String>>,
    annotations: &AnnotationTable,
) -> Result<AnnotationTable> {
    let mut inherited = Vec::new();
    for (parent, descendants) in closure {
        let name = annotations
            .term_name(parent)
            .ok_or_else(|| EnrichmentError::LookupFailure(parent.clone()))?;

        for descendant in descendants {
            inherited.extend(annotations.rows_for_term(descendant).map(|row| {
                Annotation::new(
                    row.accession.clone(),
                    parent.clone(),
                    row.aspect,
                    name.to_string(),
                )
            }));
        }
    }

    debug!("Inherited {} annotations from descendant terms", inherited.len());
    let mut expanded = annotations.clone();
    expanded.extend(inherited);
    Ok(expanded)
}

/// Resolves `subset` against the annotations, then propagates the descendant
/// annotations of every matched term into it
pub fn expand_annotations(
    hierarchy: &TermHierarchy,
    subset: &[String],
    annotations: &AnnotationTable,
) -> Result<AnnotationTable> {
    let terms = annotations.resolve_subset(subset);
    let closure = hierarchy.closure(&terms)?;
    propagate(&closure, annotations)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::Aspect;

    /// Accessions 0..26 annotated to terms a..z named A..Z
    fn alphabet_annotations() -> AnnotationTable {
        ('a'..='z')
            .enumerate()
            .map(|(i, id)| {
                Annotation::new(
                    i.to_string(),
                    id.to_string(),
                    Aspect::CellularComponent,
                    id.to_ascii_uppercase().to_string(),
                )
            })
            .collect()
    }

    fn mock_mapping() -> TermHierarchy {
        let mut tree = TermHierarchy::default();
        for (parent, children) in [
            ("a", vec!["b", "c", "d"]),
            ("b", vec!["e"]),
            ("d", vec!["g", "h"]),
            ("e", vec!["f"]),
            ("i", vec!["j", "k", "y"]),
            ("x", vec!["y", "z"]),
            ("y", vec!["z"]),
            ("z", vec!["l", "m", "n"]),
        ] {
            for child in children {
                tree.add_child(parent, child);
            }
        }
        tree
    }

    fn pairs(table: &AnnotationTable) -> HashSet<(String, String, String)> {
        table
            .rows()
            .iter()
            .map(|r| (r.accession.clone(), r.term_id.clone(), r.term_name.clone()))
            .collect()
    }

    #[test]
    fn test_expand_annotations() {
        let annot = alphabet_annotations();
        let subset = vec!["y".to_string(), "z".to_string()];
        let expanded = expand_annotations(&mock_mapping(), &subset, &annot).unwrap();

        assert_eq!(expanded.len(), annot.len() + 7);
        // original rows are kept in place
        assert_eq!(&expanded.rows()[..annot.len()], annot.rows());

        let added = pairs(&expanded)
            .difference(&pairs(&annot))
            .cloned()
            .collect::<HashSet<_>>();
        let expected = [
            ("25", "y", "Y"),
            ("11", "y", "Y"),
            ("12", "y", "Y"),
            ("13", "y", "Y"),
            ("11", "z", "Z"),
            ("12", "z", "Z"),
            ("13", "z", "Z"),
        ]
        .iter()
        .map(|(a, b, c)| (a.to_string(), b.to_string(), c.to_string()))
        .collect::<HashSet<_>>();
        assert_eq!(added, expected);
    }

    #[test]
    fn test_expand_by_name() {
        let annot = alphabet_annotations();
        let subset = vec!["A".to_string()];
        let expanded = expand_annotations(&mock_mapping(), &subset, &annot).unwrap();
        // b, c, d, e, f, g, h
        assert_eq!(expanded.len(), annot.len() + 7);
        assert_eq!(expanded.rows_for_term("a").count(), 8);
    }

    #[test]
    fn test_duplicates_are_removed() {
        let mut annot = alphabet_annotations();
        // protein 1 is already annotated to a
        annot.extend([Annotation::new(
            "1".to_string(),
            "a".to_string(),
            Aspect::CellularComponent,
            "A".to_string(),
        )]);
        let subset = vec!["a".to_string()];
        let expanded = expand_annotations(&mock_mapping(), &subset, &annot).unwrap();
        assert_eq!(expanded.rows_for_term("a").count(), 8);
    }

    #[test]
    fn test_missing_term_is_lookup_failure() {
        let annot = alphabet_annotations();
        let mut closure = BTreeMap::new();
        closure.insert("absent".to_string(), BTreeSet::from(["a".to_string()]));
        assert!(matches!(
            propagate(&closure, &annot),
            Err(EnrichmentError::LookupFailure(id)) if id == "absent"
        ));
    }

    #[test]
    fn test_cycle_is_reported() {
        let annot = alphabet_annotations();
        let mut tree = mock_mapping();
        tree.add_child("n", "y");
        let subset = vec!["y".to_string()];
        assert!(matches!(
            expand_annotations(&tree, &subset, &annot),
            Err(EnrichmentError::CycleDetected(_))
        ));
    }
}
