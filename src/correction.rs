use ndarray::Array2;
use rayon::prelude::*;

use crate::config::TransformConfig;

/// Adjusts a single column of p-values.
///
/// Non-finite entries mark untestable terms: they are left out of the number of
/// comparisons and stay NaN in the output.
pub fn adjust_column(pvalues: &[f64], transform: TransformConfig) -> Vec<f64> {
    let testable = pvalues
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_finite())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let finite = testable.iter().map(|i| pvalues[*i]).collect::<Vec<_>>();
    let adjusted = transform.transform(&finite);

    let mut output = vec![f64::NAN; pvalues.len()];
    for (i, p) in testable.into_iter().zip(adjusted) {
        output[i] = p;
    }
    output
}

/// Adjusts every column of a (terms x samples) matrix independently
pub fn adjust_columns(pvalues: &Array2<f64>, transform: TransformConfig) -> Array2<f64> {
    let adjusted = (0..pvalues.ncols())
        .into_par_iter()
        .map(|j| adjust_column(&pvalues.column(j).to_vec(), transform))
        .collect::<Vec<_>>();

    let mut output = Array2::from_elem(pvalues.dim(), f64::NAN);
    for (j, column) in adjusted.into_iter().enumerate() {
        for (i, p) in column.into_iter().enumerate() {
            output[[i, j]] = p;
        }
    }
    output
}
