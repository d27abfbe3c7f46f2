//! Abundance normalization by sample totals and protein molecular weight.

use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use log::{debug, warn};
use ndarray::Axis;

use crate::{
    error::{EnrichmentError, Result},
    matrix::AbundanceMatrix,
};

/// Average mass (Da) of a free amino acid
fn residue_mass(residue: char) -> Option<f64> {
    let mass = match residue.to_ascii_uppercase() {
        'A' => 89.10,
        'R' => 174.20,
        'N' => 132.12,
        'D' => 133.11,
        'C' => 121.16,
        'E' => 147.13,
        'Q' => 146.15,
        'G' => 75.07,
        'H' => 155.16,
        'I' => 131.18,
        'L' => 131.18,
        'K' => 146.19,
        'M' => 149.21,
        'F' => 165.19,
        'P' => 115.13,
        'S' => 105.09,
        'T' => 119.12,
        'W' => 204.23,
        'Y' => 181.19,
        'V' => 117.15,
        _ => return None,
    };
    Some(mass)
}

/// Sum of the residue masses of a protein sequence
///
/// Returns `None` if the sequence holds anything but the twenty standard
/// amino acids.
pub fn molecular_weight(sequence: &str) -> Option<f64> {
    sequence.chars().map(residue_mass).sum()
}

fn sequence_mass(accession: &str, sequence: &str) -> Result<f64> {
    if sequence.is_empty() {
        return Err(EnrichmentError::InvalidArgument(format!(
            "empty sequence for {accession}"
        )));
    }
    sequence.chars().try_fold(0.0, |mass, residue| {
        residue_mass(residue)
            .map(|m| mass + m)
            .ok_or_else(|| EnrichmentError::UnknownResidue {
                accession: accession.to_string(),
                residue,
            })
    })
}

impl AbundanceMatrix {
    /// Converts abundances to molar proportions
    ///
    /// Every sample column is divided by its total, then every protein row is
    /// divided by the molecular weight of its sequence. Proteins without a
    /// sequence in `sequences` are dropped after the column totals are taken.
    pub fn normalize(&self, sequences: &HashMap<String, String>) -> Result<AbundanceMatrix> {
        let mut values = self.values().clone();
        for mut column in values.axis_iter_mut(Axis(1)) {
            let total = column.sum();
            column.mapv_inplace(|v| v / total);
        }
        let proportions =
            AbundanceMatrix::new(self.accessions().to_vec(), self.samples().to_vec(), values)?;

        let kept = proportions.retain(|accession| sequences.contains_key(accession));
        let dropped = self.nrows() - kept.nrows();
        if dropped > 0 {
            warn!("{dropped} proteins have no sequence and were dropped.");
        }

        let masses = kept
            .accessions()
            .iter()
            .map(|accession| sequence_mass(accession, &sequences[accession]))
            .collect::<Result<Vec<_>>>()?;

        let mut values = kept.values().clone();
        for (mut row, mass) in values.axis_iter_mut(Axis(0)).zip(masses) {
            row.mapv_inplace(|v| v / mass);
        }
        debug!("Normalized {} proteins by molecular weight", kept.nrows());
        AbundanceMatrix::new(kept.accessions().to_vec(), kept.samples().to_vec(), values)
    }
}

pub fn read_fasta(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading sequences {}", path.display()))?;
    Ok(parse_fasta(&text))
}

/// Maps accessions to sequences from a FASTA document
///
/// UniProt headers (`>sp|P12345|NAME_HUMAN ...`) are keyed by the accession
/// between the first two bars, anything else by the first word of the header.
pub fn parse_fasta(text: &str) -> HashMap<String, String> {
    let mut sequences = HashMap::new();
    let mut current: Option<String> = None;
    for line in text.lines().map(str::trim) {
        if let Some(header) = line.strip_prefix('>') {
            let id = header.split_whitespace().next().unwrap_or_default();
            let accession = id.split('|').nth(1).unwrap_or(id).to_string();
            sequences.insert(accession.clone(), String::new());
            current = Some(accession);
        } else if let Some(sequence) = current.as_ref().and_then(|a| sequences.get_mut(a)) {
            sequence.push_str(line.trim_end_matches('*'));
        }
    }
    sequences
}
