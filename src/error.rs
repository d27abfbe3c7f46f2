use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnrichmentError>;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// An option string could not be parsed (aspect filter, alternative, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("accession {0} appears more than once in the abundance matrix")]
    DuplicateAccession(String),

    /// Every value across both groups is identical in every column
    #[error("all numbers are identical")]
    NoVariance,

    /// A term of interest has no annotation rows to take its name from
    #[error("term {0} has no annotations")]
    LookupFailure(String),

    /// A protein sequence holds a character outside the twenty standard residues
    #[error("unknown residue {residue:?} in the sequence of {accession}")]
    UnknownResidue { accession: String, residue: char },

    #[error("cycle detected in term hierarchy at {0}")]
    CycleDetected(String),

    #[error("annotation source failed: {0:#}")]
    Source(#[from] anyhow::Error),
}
