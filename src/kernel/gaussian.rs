//! Gaussian (RBF) kernel implementation
//!
//! The Gaussian kernel is defined as: K(x, y) = exp(-||x - y||² / (2σ²))
//! where σ (sigma) controls the kernel width.

use crate::core::{KernelError, KernelMatrix, KernelValue, Result};
use crate::kernel::traits::ensure_non_empty;
use crate::kernel::Kernel;

/// Gaussian kernel over dense real vectors: K(x, y) = exp(-||x - y||² / (2σ²))
///
/// Inputs are `Vec<f64>`; all vectors passed to a single call must share one
/// dimensionality. Sigma plays the role of a length scale:
/// - Small sigma: only near-identical vectors are similar
/// - Large sigma: similarity decays slowly with distance
///
/// [`crate::utils::sigma::select_sigma`] gives a data-driven starting value
/// for sequences of vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    sigma: f64,
    /// Precomputed -1 / (2σ²)
    scale: f64,
}

impl GaussianKernel {
    /// Create a new Gaussian kernel with the given sigma
    ///
    /// # Errors
    /// Returns `InvalidParameter` if sigma is not a positive finite number
    pub fn new(sigma: f64) -> Result<Self> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(KernelError::InvalidParameter(format!(
                "sigma must be positive, got: {sigma}"
            )));
        }
        Ok(Self {
            sigma,
            scale: -1.0 / (2.0 * sigma * sigma),
        })
    }

    /// Create a Gaussian kernel with sigma = 1.0
    pub fn unit_sigma() -> Self {
        Self {
            sigma: 1.0,
            scale: -0.5,
        }
    }

    /// Get the sigma parameter
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self::unit_sigma()
    }
}

impl<R: KernelValue> Kernel<Vec<f64>, R> for GaussianKernel {
    fn pair_value(&self, x: &Vec<f64>, y: &Vec<f64>) -> Result<R> {
        if x.is_empty() || y.is_empty() {
            return Err(empty_vector());
        }
        if x.len() != y.len() {
            return Err(KernelError::DimensionMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        let squared_distance = squared_euclidean_distance(x, y);
        Ok(R::from_f64((self.scale * squared_distance).exp()))
    }

    fn self_value(&self, x: &Vec<f64>) -> Result<R> {
        // ||x - x||² = 0
        if x.is_empty() {
            return Err(empty_vector());
        }
        Ok(R::one())
    }

    fn cross_matrix(&self, xs: &[Vec<f64>], ys: &[Vec<f64>]) -> Result<KernelMatrix<R>> {
        ensure_non_empty(xs)?;
        ensure_non_empty(ys)?;
        let dim = common_dimension(xs)?;
        check_dimension(ys, dim)?;

        Ok(xs
            .iter()
            .map(|x| {
                ys.iter()
                    .map(|y| R::from_f64((self.scale * squared_euclidean_distance(x, y)).exp()))
                    .collect()
            })
            .collect())
    }

    fn self_matrix(&self, xs: &[Vec<f64>]) -> Result<KernelMatrix<R>> {
        ensure_non_empty(xs)?;
        common_dimension(xs)?;

        let n = xs.len();
        let mut km = vec![vec![R::zero(); n]; n];
        for i in 0..n {
            km[i][i] = R::one();
            for j in 0..i {
                let k = R::from_f64((self.scale * squared_euclidean_distance(&xs[i], &xs[j])).exp());
                km[i][j] = k;
                km[j][i] = k;
            }
        }
        Ok(km)
    }

    fn self_vector(&self, xs: &[Vec<f64>]) -> Result<Vec<R>> {
        ensure_non_empty(xs)?;
        common_dimension(xs)?;
        Ok(vec![R::one(); xs.len()])
    }
}

fn empty_vector() -> KernelError {
    KernelError::InvalidInput("input vector is empty".to_string())
}

/// Dimension shared by every vector of a non-empty list
fn common_dimension(xs: &[Vec<f64>]) -> Result<usize> {
    let dim = xs[0].len();
    check_dimension(xs, dim)?;
    Ok(dim)
}

fn check_dimension(xs: &[Vec<f64>], dim: usize) -> Result<()> {
    for x in xs {
        if x.is_empty() {
            return Err(empty_vector());
        }
        if x.len() != dim {
            return Err(KernelError::DimensionMismatch {
                expected: dim,
                actual: x.len(),
            });
        }
    }
    Ok(())
}

/// Compute squared Euclidean distance between two vectors of equal length
pub(crate) fn squared_euclidean_distance(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum()
}
