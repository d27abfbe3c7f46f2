use std::{fmt, str::FromStr};

use adjustp::{adjust, Procedure};

use crate::error::EnrichmentError;

/// The alternative hypothesis of the rank test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    /// In-term values tend to be larger than out-of-term values
    #[default]
    Greater,
    /// In-term values tend to be smaller than out-of-term values
    Less,
    TwoSided,
}
impl FromStr for Alternative {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greater" => Ok(Self::Greater),
            "less" => Ok(Self::Less),
            "two-sided" => Ok(Self::TwoSided),
            _ => Err(EnrichmentError::InvalidArgument(format!(
                "expected alternative ({s}) to be one of 'greater', 'less', or 'two-sided'"
            ))),
        }
    }
}

/// The Gene Ontology aspect (namespace) a term belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Aspect {
    CellularComponent,
    MolecularFunction,
    BiologicalProcess,
}
impl Aspect {
    /// The single-letter code used in GAF files
    pub fn code(&self) -> &'static str {
        match self {
            Aspect::CellularComponent => "C",
            Aspect::MolecularFunction => "F",
            Aspect::BiologicalProcess => "P",
        }
    }
}
impl FromStr for Aspect {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "C" => Ok(Self::CellularComponent),
            "F" => Ok(Self::MolecularFunction),
            "P" => Ok(Self::BiologicalProcess),
            _ => Err(EnrichmentError::InvalidArgument(format!(
                "expected aspect code ({s}) to be one of 'C', 'F', or 'P'"
            ))),
        }
    }
}
impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Restricts annotations to a single aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectFilter {
    #[default]
    All,
    Only(Aspect),
}
impl AspectFilter {
    pub fn accepts(&self, aspect: Aspect) -> bool {
        match self {
            AspectFilter::All => true,
            AspectFilter::Only(only) => *only == aspect,
        }
    }
}
impl FromStr for AspectFilter {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cc" => Ok(Self::Only(Aspect::CellularComponent)),
            "mf" => Ok(Self::Only(Aspect::MolecularFunction)),
            "bp" => Ok(Self::Only(Aspect::BiologicalProcess)),
            "all" => Ok(Self::All),
            _ => Err(EnrichmentError::InvalidArgument(format!(
                "expected aspect ({s}) to be one of 'cc', 'mf', 'bp', or 'all'"
            ))),
        }
    }
}

/// Multiple testing correction applied to each sample column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformConfig {
    Identity,
    #[default]
    Fdr,
    Bonferroni,
}
impl TransformConfig {
    /// Adjusts a vector of finite p-values, clipping the result to `[0, 1]`
    pub fn transform(&self, pvalues: &[f64]) -> Vec<f64> {
        if pvalues.is_empty() {
            return Vec::new();
        }
        let adjusted = match self {
            TransformConfig::Identity => pvalues.to_vec(),
            TransformConfig::Fdr => adjust(pvalues, Procedure::BenjaminiHochberg),
            TransformConfig::Bonferroni => adjust(pvalues, Procedure::Bonferroni),
        };
        adjusted.into_iter().map(|p| p.clamp(0.0, 1.0)).collect()
    }
}
