use std::collections::HashMap;

use ndarray::{Array2, Axis};

use crate::error::{EnrichmentError, Result};

/// Protein abundances: one row per accession, one column per sample
#[derive(Debug, Clone, PartialEq)]
pub struct AbundanceMatrix {
    accessions: Vec<String>,
    samples: Vec<String>,
    values: Array2<f64>,
    index: HashMap<String, usize>,
}
impl AbundanceMatrix {
    /// Builds a matrix, rejecting duplicate accessions and mismatched shapes
    pub fn new(accessions: Vec<String>, samples: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.dim() != (accessions.len(), samples.len()) {
            return Err(EnrichmentError::ShapeMismatch(format!(
                "{} accessions and {} samples do not match a {}x{} matrix",
                accessions.len(),
                samples.len(),
                values.nrows(),
                values.ncols()
            )));
        }

        let mut index = HashMap::with_capacity(accessions.len());
        for (i, accession) in accessions.iter().enumerate() {
            if index.insert(accession.clone(), i).is_some() {
                return Err(EnrichmentError::DuplicateAccession(accession.clone()));
            }
        }

        Ok(Self {
            accessions,
            samples,
            values,
            index,
        })
    }

    pub fn accessions(&self) -> &[String] {
        &self.accessions
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.accessions.len()
    }

    pub fn contains(&self, accession: &str) -> bool {
        self.index.contains_key(accession)
    }

    /// Keeps the rows whose accession satisfies `keep`, in their original order
    pub fn retain(&self, keep: impl Fn(&str) -> bool) -> Self {
        let rows = (0..self.nrows())
            .filter(|i| keep(&self.accessions[*i]))
            .collect::<Vec<_>>();
        let accessions = rows
            .iter()
            .map(|i| self.accessions[*i].clone())
            .collect::<Vec<_>>();
        let index = accessions
            .iter()
            .enumerate()
            .map(|(i, accession)| (accession.clone(), i))
            .collect();
        Self {
            accessions,
            samples: self.samples.clone(),
            values: self.values.select(Axis(0), &rows),
            index,
        }
    }

    /// Flips the sign of every value so that low abundances rank highest
    pub fn negate(&mut self) {
        self.values.mapv_inplace(|v| -v);
    }

    /// Splits the rows into members and non-members
    pub fn partition(&self, is_member: impl Fn(&str) -> bool) -> (Array2<f64>, Array2<f64>) {
        let (inside, outside): (Vec<usize>, Vec<usize>) =
            (0..self.nrows()).partition(|i| is_member(&self.accessions[*i]));
        (
            self.values.select(Axis(0), &inside),
            self.values.select(Axis(0), &outside),
        )
    }
}
