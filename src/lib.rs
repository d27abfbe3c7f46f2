//! goenrich: rank-based Gene Ontology enrichment of protein abundances
//!
//! This library tests whether proteins annotated to a Gene Ontology term show
//! systematically different abundance than the remaining proteins, in many
//! samples at once, and corrects the p-values for the number of terms tested.
//!
//! The main components of this library are:
//! - `EnrichmentEngine`: Orchestrates term selection, testing and correction
//! - `MannWhitneyU`: The column-wise rank test with tie correction
//! - `TermHierarchy`: Descendant closure over the "is-a" term graph
//! - `AnnotationSource`: Supplies annotations and hierarchies to the engine
//! - `EnrichmentResults`: Structure to hold and display the adjusted p-values

mod annotation;
mod config;
mod correction;
mod engine;
mod error;
mod gaf;
mod hierarchy;
mod mannwhitney;
mod matrix;
mod normalize;
mod obo;
mod propagate;
mod rank;
mod rankings;
mod results;
mod source;

pub use annotation::{Annotation, AnnotationTable, TermKey};
pub use config::{Alternative, Aspect, AspectFilter, TransformConfig};
pub use correction::{adjust_column, adjust_columns};
pub use engine::EnrichmentEngine;
pub use error::{EnrichmentError, Result};
pub use gaf::{parse_gaf, read_gaf};
pub use hierarchy::TermHierarchy;
pub use mannwhitney::{normal_sf, MannWhitneyResult, MannWhitneyU};
pub use matrix::AbundanceMatrix;
pub use normalize::{molecular_weight, parse_fasta, read_fasta};
pub use obo::{parse_obo, read_obo, Ontology};
pub use propagate::{expand_annotations, propagate};
pub use rank::{midranks, rank_columns, tie_correction, RankedMatrix};
pub use rankings::{term_rankings, TermRankings};
pub use results::{EnrichmentResults, TermResult};
pub use source::{annotation_stem, AnnotationSource, GoFileSource, InMemorySource};
