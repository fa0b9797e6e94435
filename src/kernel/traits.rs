//! Kernel trait definition

use crate::core::{KernelError, KernelMatrix, KernelValue, Result};

/// Kernel function trait
///
/// A kernel k(x, y) is a similarity function over pairs of inputs of type `X`,
/// returning values of the caller-chosen numeric type `R`. Every kernel answers
/// the same five questions: a single pair, an item with itself, a cross matrix
/// between two lists, the symmetric matrix of one list, and the diagonal of
/// that matrix.
///
/// Only [`Kernel::pair_value`] is required. The other operations have default
/// implementations built on it; kernels override them when a cheaper identity
/// or an up-front validation pass exists.
pub trait Kernel<X, R: KernelValue = f64> {
    /// Compute k(x, y)
    fn pair_value(&self, x: &X, y: &X) -> Result<R>;

    /// Compute k(x, x)
    ///
    /// Must agree with `pair_value(x, x)`.
    fn self_value(&self, x: &X) -> Result<R> {
        self.pair_value(x, x)
    }

    /// Compute `m[i][j] = k(xs[i], ys[j])`
    fn cross_matrix(&self, xs: &[X], ys: &[X]) -> Result<KernelMatrix<R>> {
        ensure_non_empty(xs)?;
        ensure_non_empty(ys)?;

        xs.iter()
            .map(|x| {
                ys.iter()
                    .map(|y| self.pair_value(x, y))
                    .collect::<Result<Vec<R>>>()
            })
            .collect()
    }

    /// Compute the symmetric matrix `m[i][j] = k(xs[i], xs[j])`
    ///
    /// Only the diagonal and the lower triangle are evaluated; the upper
    /// triangle is mirrored.
    fn self_matrix(&self, xs: &[X]) -> Result<KernelMatrix<R>> {
        ensure_non_empty(xs)?;

        let n = xs.len();
        let mut km = vec![vec![R::zero(); n]; n];
        for i in 0..n {
            km[i][i] = self.self_value(&xs[i])?;
            for j in 0..i {
                let k = self.pair_value(&xs[i], &xs[j])?;
                km[i][j] = k;
                km[j][i] = k;
            }
        }
        Ok(km)
    }

    /// Compute `v[i] = k(xs[i], xs[i])`
    fn self_vector(&self, xs: &[X]) -> Result<Vec<R>> {
        ensure_non_empty(xs)?;
        xs.iter().map(|x| self.self_value(x)).collect()
    }
}

/// Reject an empty input list
pub(crate) fn ensure_non_empty<T>(items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(KernelError::InvalidInput(
            "input list doesn't contain any element".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Product kernel on scalars, relying on every default
    struct ProductKernel;

    impl Kernel<f64> for ProductKernel {
        fn pair_value(&self, x: &f64, y: &f64) -> Result<f64> {
            Ok(x * y)
        }
    }

    #[test]
    fn test_default_self_value() {
        let kernel = ProductKernel;
        let k: f64 = kernel.self_value(&3.0).unwrap();
        assert_eq!(k, 9.0);
    }

    #[test]
    fn test_default_cross_matrix() {
        let kernel = ProductKernel;
        let km: KernelMatrix = kernel.cross_matrix(&[1.0, 2.0], &[3.0, 4.0, 5.0]).unwrap();

        assert_eq!(km.len(), 2);
        assert_eq!(km[0], vec![3.0, 4.0, 5.0]);
        assert_eq!(km[1], vec![6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_default_self_matrix_is_symmetric() {
        let kernel = ProductKernel;
        let xs = [1.0, -2.0, 0.5];
        let km: KernelMatrix = kernel.self_matrix(&xs).unwrap();
        let kv: Vec<f64> = kernel.self_vector(&xs).unwrap();

        for i in 0..xs.len() {
            assert_eq!(km[i][i], kv[i]);
            for j in 0..xs.len() {
                assert_eq!(km[i][j], km[j][i]);
                assert_eq!(km[i][j], xs[i] * xs[j]);
            }
        }
    }

    #[test]
    fn test_empty_lists_rejected() {
        let kernel = ProductKernel;
        let empty: [f64; 0] = [];

        let cross: Result<KernelMatrix> = kernel.cross_matrix(&empty, &[1.0]);
        assert!(matches!(cross, Err(KernelError::InvalidInput(_))));

        let cross: Result<KernelMatrix> = kernel.cross_matrix(&[1.0], &empty);
        assert!(matches!(cross, Err(KernelError::InvalidInput(_))));

        let matrix: Result<KernelMatrix> = kernel.self_matrix(&empty);
        assert!(matches!(matrix, Err(KernelError::InvalidInput(_))));

        let vector: Result<Vec<f64>> = kernel.self_vector(&empty);
        assert!(matches!(vector, Err(KernelError::InvalidInput(_))));
    }
}
