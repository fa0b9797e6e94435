//! Utility functions for kernel matrices

use crate::core::{KernelError, KernelMatrix, KernelValue, Result};
use crate::kernel::Kernel;

/// Normalization of completed kernel matrices
pub mod normalization {
    use super::*;

    /// Cosine-normalize a square kernel matrix in place
    ///
    /// Off-diagonal entries are divided by `sqrt(m[i][i] * m[j][j])` and mirrored;
    /// diagonal entries become 1. Zero entries are left at zero, so rows of a
    /// zero-norm input stay zero.
    pub fn normalize_in_place<R: KernelValue>(m: &mut KernelMatrix<R>) {
        let n = m.len();
        for i in 0..n {
            for j in 0..i {
                if m[i][j] != R::zero() {
                    let k = m[i][j] / (m[i][i] * m[j][j]).sqrt();
                    m[i][j] = k;
                    m[j][i] = k;
                }
            }
        }
        for (i, row) in m.iter_mut().enumerate() {
            if row[i] != R::zero() {
                row[i] = R::one();
            }
        }
    }

    /// Normalized kernel value k(x,y) / sqrt(k(x,x) k(y,y)), or 0 when k(x,y) is 0
    pub fn normalized_value<X, R, K>(kernel: &K, x: &X, y: &X) -> Result<R>
    where
        R: KernelValue,
        K: Kernel<X, R> + ?Sized,
    {
        let k = kernel.pair_value(x, y)?;
        if k == R::zero() {
            return Ok(R::zero());
        }
        let kx = kernel.self_value(x)?;
        let ky = kernel.self_value(y)?;
        Ok(k / (kx * ky).sqrt())
    }
}

/// Conversion of kernel values into kernel-induced distances
///
/// d(x, y) = sqrt(k(x,x) + k(y,y) - 2 k(x,y))
pub mod distance {
    use super::*;

    /// Convert a square kernel matrix into a distance matrix in place
    pub fn to_distance_in_place<R: KernelValue>(m: &mut KernelMatrix<R>) {
        let n = m.len();
        for i in 0..n {
            for j in 0..i {
                let d = non_negative_sqrt(m[i][i] + m[j][j] - m[i][j] - m[j][i]);
                m[i][j] = d;
                m[j][i] = d;
            }
        }
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = R::zero();
        }
    }

    /// Distance between two items
    pub fn distance_value<X, R, K>(kernel: &K, x: &X, y: &X) -> Result<R>
    where
        R: KernelValue,
        K: Kernel<X, R> + ?Sized,
    {
        let k = kernel.pair_value(x, y)?;
        let kx = kernel.self_value(x)?;
        let ky = kernel.self_value(y)?;
        Ok(non_negative_sqrt(kx + ky - R::from_f64(2.0) * k))
    }

    /// Distances between every item of `xs` and every item of `ys`
    pub fn distance_cross_matrix<X, R, K>(kernel: &K, xs: &[X], ys: &[X]) -> Result<KernelMatrix<R>>
    where
        R: KernelValue,
        K: Kernel<X, R> + ?Sized,
    {
        let mut dm = kernel.cross_matrix(xs, ys)?;
        let kvx = kernel.self_vector(xs)?;
        let kvy = kernel.self_vector(ys)?;
        let two = R::from_f64(2.0);
        for (row, &kx) in dm.iter_mut().zip(kvx.iter()) {
            for (d, &ky) in row.iter_mut().zip(kvy.iter()) {
                *d = non_negative_sqrt(kx + ky - two * *d);
            }
        }
        Ok(dm)
    }

    /// Square root clamped at zero; rounding can push k(x,x) + k(y,y) - 2 k(x,y)
    /// just below zero for identical inputs
    fn non_negative_sqrt<R: KernelValue>(value: R) -> R {
        if value > R::zero() {
            value.sqrt()
        } else {
            R::zero()
        }
    }

    /// Symmetric distance matrix of one list
    pub fn distance_self_matrix<X, R, K>(kernel: &K, xs: &[X]) -> Result<KernelMatrix<R>>
    where
        R: KernelValue,
        K: Kernel<X, R> + ?Sized,
    {
        let mut dm = kernel.self_matrix(xs)?;
        to_distance_in_place(&mut dm);
        Ok(dm)
    }
}

/// Checks on completed kernel and distance matrices
pub mod validation {
    use super::*;

    /// Every row has as many entries as there are rows
    pub fn is_square<R>(m: &[Vec<R>]) -> bool {
        let n = m.len();
        m.iter().all(|row| row.len() == n)
    }

    /// Square and exactly symmetric
    pub fn is_symmetric<R: PartialEq>(m: &[Vec<R>]) -> bool {
        if !is_square(m) {
            return false;
        }
        (0..m.len()).all(|i| (0..i).all(|j| m[i][j] == m[j][i]))
    }

    /// d(i,j) <= d(i,k) + d(k,j) for every triple; O(n³)
    pub fn respects_triangle_inequality<R: KernelValue>(dm: &[Vec<R>]) -> bool {
        if !is_symmetric(dm) {
            return false;
        }
        let n = dm.len();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    if dm[i][j] > dm[i][k] + dm[k][j] {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// k(i,j)² <= k(i,i) k(j,j) for every pair; O(n²)
    pub fn respects_cauchy_schwarz<R: KernelValue>(km: &[Vec<R>]) -> bool {
        if !is_symmetric(km) {
            return false;
        }
        (0..km.len()).all(|i| (0..i).all(|j| km[i][j] * km[i][j] <= km[i][i] * km[j][j]))
    }
}

/// Heuristics for choosing kernel parameters
pub mod sigma {
    use super::*;
    use crate::kernel::gaussian::squared_euclidean_distance;
    use rand::Rng;

    /// Pick a Gaussian sigma for sequences of vectors
    ///
    /// Draws `samples` random pairs of symbols (each from a random sequence) and
    /// returns the median of their Euclidean distances. When `samples` is `None`
    /// the floor of the square root of the total number of symbols is used.
    pub fn select_sigma<R: Rng + ?Sized>(
        sequences: &[Vec<Vec<f64>>],
        samples: Option<usize>,
        rng: &mut R,
    ) -> Result<f64> {
        if sequences.is_empty() || sequences.iter().any(|s| s.is_empty()) {
            return Err(KernelError::InvalidInput(
                "sigma selection needs non-empty sequences".to_string(),
            ));
        }
        let dim = sequences[0][0].len();
        for symbol in sequences.iter().flatten() {
            if symbol.len() != dim {
                return Err(KernelError::DimensionMismatch {
                    expected: dim,
                    actual: symbol.len(),
                });
            }
        }

        let total: usize = sequences.iter().map(|s| s.len()).sum();
        let n = samples
            .unwrap_or_else(|| (total as f64).sqrt().floor() as usize)
            .max(1);

        let mut distances: Vec<f64> = (0..n)
            .map(|_| {
                let a = &sequences[rng.gen_range(0..sequences.len())];
                let b = &sequences[rng.gen_range(0..sequences.len())];
                let x = &a[rng.gen_range(0..a.len())];
                let y = &b[rng.gen_range(0..b.len())];
                squared_euclidean_distance(x, y).sqrt()
            })
            .collect();

        let mid = distances.len() / 2;
        let (_, median, _) = distances.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        Ok(*median)
    }
}
