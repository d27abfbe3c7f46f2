use std::f64::consts::SQRT_2;

use bon::Builder;
use derive_new::new;
use ndarray::ArrayView2;
use rayon::prelude::*;
use statrs::function::erf::erfc;

use crate::{
    config::Alternative,
    error::{EnrichmentError, Result},
    rank::{midranks, tie_correction},
};

/// Survival function of the standard normal distribution
pub fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

/// The Mann-Whitney U test with the normal approximation
///
/// Each column of the two groups is tested independently. Ties are handled by
/// mid-ranking and a variance correction computed on the combined ranking.
#[derive(Debug, Clone, Copy, Builder)]
pub struct MannWhitneyU {
    #[builder(default)]
    alternative: Alternative,
    #[builder(default = true)]
    continuity: bool,
}
impl Default for MannWhitneyU {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Statistic and p-value of every tested column
#[derive(Debug, Clone, new)]
pub struct MannWhitneyResult {
    pub statistics: Vec<f64>,
    pub pvalues: Vec<f64>,
}

/// Intermediate quantities of a single column
struct ColumnTest {
    u1: f64,
    u2: f64,
    tie_factor: f64,
}

impl MannWhitneyU {
    pub fn new(alternative: Alternative, continuity: bool) -> Self {
        Self {
            alternative,
            continuity,
        }
    }

    /// Tests every column of `x` against the same column of `y`
    ///
    /// Fails with [`EnrichmentError::NoVariance`] when every column is constant
    /// across both groups. A column with zero variance while others vary
    /// yields a NaN p-value for that column only. If either group is empty
    /// every p-value is 1 with continuity correction and NaN without it.
    pub fn test(&self, x: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<MannWhitneyResult> {
        if x.ncols() != y.ncols() {
            return Err(EnrichmentError::ShapeMismatch(format!(
                "groups have {} and {} columns",
                x.ncols(),
                y.ncols()
            )));
        }

        let n1 = x.nrows() as f64;
        let n2 = y.nrows() as f64;

        let columns = (0..x.ncols())
            .into_par_iter()
            .map(|j| Self::rank_column(x.column(j).iter(), y.column(j).iter(), n1, n2))
            .collect::<Vec<_>>();

        if !columns.is_empty() && columns.iter().all(|c| c.tie_factor == 0.0) {
            return Err(EnrichmentError::NoVariance);
        }

        let (statistics, pvalues): (Vec<f64>, Vec<f64>) = columns
            .iter()
            .map(|column| self.evaluate(column, n1, n2))
            .unzip();
        Ok(MannWhitneyResult::new(statistics, pvalues))
    }

    fn rank_column<'a>(
        x: impl Iterator<Item = &'a f64>,
        y: impl Iterator<Item = &'a f64>,
        n1: f64,
        n2: f64,
    ) -> ColumnTest {
        let combined = x.chain(y).copied().collect::<Vec<_>>();
        let ranks = midranks(&combined);
        let rank_sum = ranks[..n1 as usize].iter().sum::<f64>();

        let u1 = n1 * n2 + (n1 * (n1 + 1.0)) / 2.0 - rank_sum;
        let u2 = n1 * n2 - u1;
        ColumnTest {
            u1,
            u2,
            tie_factor: tie_correction(&combined),
        }
    }

    fn evaluate(&self, column: &ColumnTest, n1: f64, n2: f64) -> (f64, f64) {
        let sd = (column.tie_factor * n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
        let mut mean = n1 * n2 / 2.0;
        if self.continuity {
            mean += 0.5;
        }

        let (u, multiplier) = match self.alternative {
            Alternative::Greater => (column.u2, 1.0),
            Alternative::Less => (column.u1, 1.0),
            Alternative::TwoSided => (column.u1.max(column.u2), 2.0),
        };

        if sd == 0.0 {
            // an empty group leaves U at zero, below a continuity-shifted mean
            let empty = n1 == 0.0 || n2 == 0.0;
            let pvalue = if empty && u < mean { 1.0 } else { f64::NAN };
            return (u, pvalue);
        }
        let z = (u - mean) / sd;
        let pvalue = (normal_sf(z) * multiplier).clamp(0.0, 1.0);
        (u, pvalue)
    }
}
