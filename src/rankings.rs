use ndarray::Array2;

use crate::{annotation::AnnotationTable, matrix::AbundanceMatrix, rank::rank_columns};

/// Per-sample mid-ranks of every protein and whether it belongs to a term
#[derive(Debug, Clone)]
pub struct TermRankings {
    pub accessions: Vec<String>,
    pub samples: Vec<String>,
    pub ranks: Array2<f64>,
    pub in_term: Vec<bool>,
}

/// Ranks the proteins of each sample and flags those annotated to `term_name`
pub fn term_rankings(
    proteins: &AbundanceMatrix,
    annotations: &AnnotationTable,
    term_name: &str,
) -> TermRankings {
    let members = annotations
        .rows()
        .iter()
        .filter(|row| row.term_name == term_name)
        .map(|row| row.accession.as_str())
        .collect::<std::collections::HashSet<_>>();

    let ranked = rank_columns(proteins.values().view());
    TermRankings {
        accessions: proteins.accessions().to_vec(),
        samples: proteins.samples().to_vec(),
        ranks: ranked.ranks,
        in_term: proteins
            .accessions()
            .iter()
            .map(|accession| members.contains(accession.as_str()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Aspect;
    use ndarray::array;

    #[test]
    fn test_term_rankings() {
        let proteins = AbundanceMatrix::new(
            vec!["P1".to_string(), "P2".to_string(), "P3".to_string()],
            vec!["s1".to_string()],
            array![[10.0], [30.0], [20.0]],
        )
        .unwrap();
        let annotations = AnnotationTable::for_term(["P2", "P9"], Aspect::CellularComponent, "nucleus", None);

        let rankings = term_rankings(&proteins, &annotations, "nucleus");
        assert_eq!(rankings.ranks, array![[1.0], [3.0], [2.0]]);
        assert_eq!(rankings.in_term, vec![false, true, false]);
    }
}
