//! Column-wise mid-ranking with tie correction.

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

/// Total order on floats that places every NaN last, whatever its sign
fn nan_last(a: &f64, b: &f64) -> Ordering {
    a.is_nan().cmp(&b.is_nan()).then(a.total_cmp(b))
}

/// Assigns mid-ranks (1-based) to `data`.
///
/// Tied values receive the average of the ranks they would occupy.
pub fn midranks(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    let mut sorter = (0..n).collect::<Vec<_>>();
    sorter.sort_by(|a, b| nan_last(&data[*a], &data[*b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && data[sorter[j]] == data[sorter[i]] {
            j += 1;
        }
        // positions i..j occupy ranks (i + 1)..=j
        let rank = (i + 1 + j) as f64 / 2.0;
        for idx in &sorter[i..j] {
            ranks[*idx] = rank;
        }
        i = j;
    }
    ranks
}

/// Computes `1 - sum(c^3 - c) / (n^3 - n)` over the tie-group sizes `c`.
///
/// Defined as 1 when fewer than two values are present.
pub fn tie_correction(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 1.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(nan_last);

    let mut ties = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && sorted[j] == sorted[i] {
            j += 1;
        }
        let c = (j - i) as f64;
        ties += c.powi(3) - c;
        i = j;
    }
    let size = n as f64;
    1.0 - ties / (size.powi(3) - size)
}

/// Mid-ranks of every column and their tie-correction factors
#[derive(Debug, Clone)]
pub struct RankedMatrix {
    pub ranks: Array2<f64>,
    pub tie_factors: Vec<f64>,
}

/// Ranks each column of `data` independently and in parallel
pub fn rank_columns(data: ArrayView2<f64>) -> RankedMatrix {
    let columns = (0..data.ncols())
        .into_par_iter()
        .map(|j| {
            let column = data.column(j).to_vec();
            (midranks(&column), tie_correction(&column))
        })
        .collect::<Vec<_>>();

    let mut ranks = Array2::zeros(data.dim());
    let mut tie_factors = Vec::with_capacity(columns.len());
    for (j, (column_ranks, factor)) in columns.into_iter().enumerate() {
        ranks.column_mut(j).assign(&ndarray::Array1::from(column_ranks));
        tie_factors.push(factor);
    }
    RankedMatrix { ranks, tie_factors }
}
