use std::collections::HashSet;

use bon::Builder;
use log::{debug, info, warn};
use ndarray::Array2;
use rayon::prelude::*;

use crate::{
    annotation::{AnnotationTable, TermKey},
    config::{Alternative, AspectFilter, TransformConfig},
    correction::adjust_columns,
    error::{EnrichmentError, Result},
    hierarchy::TermHierarchy,
    mannwhitney::MannWhitneyU,
    matrix::AbundanceMatrix,
    propagate::expand_annotations,
    results::{EnrichmentResults, TermResult},
    source::AnnotationSource,
};

/// Tests Gene Ontology terms for enrichment in protein abundances
///
/// For every term, the proteins annotated to it are compared against all other
/// annotated proteins with a Mann-Whitney U test in each sample. The p-values
/// of each sample are then corrected across terms.
#[derive(Debug, Clone, Builder)]
pub struct EnrichmentEngine {
    /// Higher values indicate stronger association with a term
    #[builder(default = true)]
    desc: bool,
    #[builder(default)]
    alternative: Alternative,
    #[builder(default)]
    aspect: AspectFilter,
    /// Term ids or names to restrict testing to
    go_subset: Option<Vec<String>>,
    /// Accessions removed before testing
    contaminants: Option<Vec<String>>,
    /// Propagate descendant annotations up to the subset terms
    #[builder(default = true)]
    aggregate_terms: bool,
    #[builder(default = true)]
    continuity: bool,
    #[builder(default)]
    correction: TransformConfig,
}
impl Default for EnrichmentEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EnrichmentEngine {
    /// Run the enrichment against annotations supplied by `source`
    pub fn run(
        &self,
        proteins: &AbundanceMatrix,
        source: &dyn AnnotationSource,
    ) -> Result<EnrichmentResults> {
        info!("Retrieving GO annotations...");
        let annotations = source.annotations(self.aspect)?;
        let hierarchy = if self.expands_terms() {
            source.hierarchy()?
        } else {
            None
        };
        self.run_with(proteins, annotations, hierarchy.as_deref())
    }

    /// Run the enrichment against caller-supplied annotations
    ///
    /// The enrichment is a five-step process:
    /// 1. Expand and restrict the annotations to the term subset
    /// 2. Join the annotations with the abundance matrix
    /// 3. Orient the abundances
    /// 4. Test every term in every sample
    /// 5. Correct each sample's p-values across terms
    pub fn run_with(
        &self,
        proteins: &AbundanceMatrix,
        annotations: AnnotationTable,
        hierarchy: Option<&TermHierarchy>,
    ) -> Result<EnrichmentResults> {
        let annotations = self.select_terms(annotations.filter_aspect(self.aspect), hierarchy)?;
        let (mut proteins, annotations, unannotated) = self.join(proteins, &annotations);

        if !self.desc {
            proteins.negate();
        }

        info!("Testing enrichment...");
        let test = MannWhitneyU::new(self.alternative, self.continuity);
        let groups = annotations.group_by_term();
        debug!("Testing {} terms across {} samples", groups.len(), proteins.samples().len());

        let term_results = groups
            .par_iter()
            .map(|(term, members)| {
                self.test_term(&test, &proteins, term, |accession| members.contains(accession))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut results =
            EnrichmentResults::from_vec(term_results, proteins.samples().to_vec(), unannotated);
        results.pvalues = self.correct(&results.pvalues);
        Ok(results)
    }

    fn expands_terms(&self) -> bool {
        self.aggregate_terms && self.go_subset.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Expands the annotations through the hierarchy, then keeps only subset terms
    fn select_terms(
        &self,
        annotations: AnnotationTable,
        hierarchy: Option<&TermHierarchy>,
    ) -> Result<AnnotationTable> {
        let Some(subset) = self.go_subset.as_ref().filter(|s| !s.is_empty()) else {
            return Ok(annotations);
        };

        let annotations = match hierarchy {
            Some(hierarchy) if self.aggregate_terms => {
                let expanded = expand_annotations(hierarchy, subset, &annotations)?;
                debug!(
                    "Term expansion added {} annotations",
                    expanded.len() - annotations.len()
                );
                expanded
            }
            _ => annotations,
        };
        Ok(annotations.filter_subset(subset))
    }

    /// Inner-joins the annotations with the abundance matrix
    ///
    /// Returns the annotated proteins, the annotations of measured proteins,
    /// and the number of measured proteins that were dropped for lack of
    /// annotations.
    fn join(
        &self,
        proteins: &AbundanceMatrix,
        annotations: &AnnotationTable,
    ) -> (AbundanceMatrix, AnnotationTable, usize) {
        let contaminants = self
            .contaminants
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<HashSet<_>>();
        let measured = proteins
            .accessions()
            .iter()
            .map(String::as_str)
            .filter(|accession| !contaminants.contains(accession))
            .collect::<HashSet<_>>();

        let annotations = annotations.retain_accessions(&measured);
        let annotated = annotations.accessions();
        let unannotated = measured.len() - annotated.len();
        if unannotated > 0 {
            warn!("{unannotated} proteins not found in GO annotations.");
        }

        let proteins = proteins.retain(|accession| annotated.contains(accession));
        (proteins, annotations, unannotated)
    }

    fn test_term(
        &self,
        test: &MannWhitneyU,
        proteins: &AbundanceMatrix,
        term: &TermKey,
        is_member: impl Fn(&str) -> bool,
    ) -> Result<TermResult> {
        let (inside, outside) = proteins.partition(is_member);
        match test.test(inside.view(), outside.view()) {
            Ok(result) => Ok(TermResult::new(term.clone(), result.pvalues)),
            Err(EnrichmentError::NoVariance) => {
                warn!("{} ({}) could not be tested: all values are identical", term.name, term.id);
                Ok(TermResult::new(
                    term.clone(),
                    vec![f64::NAN; proteins.samples().len()],
                ))
            }
            Err(err) => Err(err),
        }
    }

    fn correct(&self, pvalues: &Array2<f64>) -> Array2<f64> {
        adjust_columns(pvalues, self.correction)
    }
}
