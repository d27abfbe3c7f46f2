use std::io::Write;

use anyhow::Result;
use derive_new::new;
use ndarray::{Array2, ArrayView1};

use crate::annotation::TermKey;

/// The raw p-values of a single term across every sample
#[derive(Debug, Clone, new)]
pub struct TermResult {
    pub term: TermKey,
    pub pvalues: Vec<f64>,
}

/// Adjusted p-values of every tested term (rows) in every sample (columns)
#[derive(Debug, Clone)]
pub struct EnrichmentResults {
    pub terms: Vec<TermKey>,
    pub samples: Vec<String>,
    pub pvalues: Array2<f64>,
    /// Proteins in the abundance matrix without any usable annotation
    pub unannotated: usize,
}
impl EnrichmentResults {
    /// Assembles term results into a matrix, ordered by term
    pub fn from_vec(mut term_results: Vec<TermResult>, samples: Vec<String>, unannotated: usize) -> Self {
        term_results.sort_by(|a, b| a.term.cmp(&b.term));

        let mut pvalues = Array2::from_elem((term_results.len(), samples.len()), f64::NAN);
        let mut terms = Vec::with_capacity(term_results.len());
        for (i, term_result) in term_results.into_iter().enumerate() {
            for (j, p) in term_result.pvalues.into_iter().enumerate() {
                pvalues[[i, j]] = p;
            }
            terms.push(term_result.term);
        }

        Self {
            terms,
            samples,
            pvalues,
            unannotated,
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Looks up a term by id or name
    pub fn get(&self, term: &str) -> Option<ArrayView1<f64>> {
        self.terms
            .iter()
            .position(|key| key.id == term || key.name == term)
            .map(|i| self.pvalues.row(i))
    }

    pub fn pprint(&self) {
        println!("term_id\tterm_name\taspect\t{}", self.samples.join("\t"));
        for (term, row) in self.terms.iter().zip(self.pvalues.rows()) {
            let values = row.iter().map(|p| p.to_string()).collect::<Vec<_>>();
            println!("{}\t{}\t{}\t{}", term.id, term.name, term.aspect, values.join("\t"));
        }
    }

    /// Writes the results as a tab-separated table
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        let mut header = vec!["term_id".to_string(), "term_name".to_string(), "aspect".to_string()];
        header.extend(self.samples.iter().cloned());
        writer.write_record(&header)?;

        for (term, row) in self.terms.iter().zip(self.pvalues.rows()) {
            let mut record = vec![term.id.clone(), term.name.clone(), term.aspect.to_string()];
            record.extend(row.iter().map(|p| p.to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
