//! Cosine normalization of another kernel

use crate::core::{KernelMatrix, KernelValue, Result};
use crate::kernel::{Kernel, KernelRef};
use crate::utils::normalization::normalize_in_place;

/// Kernel computing k(x, y) / sqrt(k(x, x) k(y, y)) from a borrowed inner kernel
///
/// A zero inner value yields 0 regardless of the self values, so a zero-norm
/// input never divides by zero. Otherwise every self value is exactly 1.
pub struct NormalizedKernel<'a, K: ?Sized> {
    base: KernelRef<'a, K>,
}

impl<'a, K: ?Sized> NormalizedKernel<'a, K> {
    pub fn new(kernel: &'a K) -> Self {
        Self {
            base: KernelRef::new(kernel),
        }
    }

    /// Get the inner kernel
    pub fn kernel_ref(&self) -> &'a K {
        self.base.kernel_ref()
    }
}

impl<'a, X, R, K> Kernel<X, R> for NormalizedKernel<'a, K>
where
    R: KernelValue,
    K: Kernel<X, R> + ?Sized,
{
    fn pair_value(&self, x: &X, y: &X) -> Result<R> {
        let inner = self.base.kernel_ref();
        let k = inner.pair_value(x, y)?;
        if k == R::zero() {
            return Ok(R::zero());
        }
        let kx = inner.self_value(x)?;
        let ky = inner.self_value(y)?;
        Ok(k / (kx * ky).sqrt())
    }

    fn self_value(&self, x: &X) -> Result<R> {
        let k = self.base.kernel_ref().self_value(x)?;
        Ok(unit_or_zero(k))
    }

    fn cross_matrix(&self, xs: &[X], ys: &[X]) -> Result<KernelMatrix<R>> {
        let inner = self.base.kernel_ref();
        let mut km = inner.cross_matrix(xs, ys)?;
        let kvx = inner.self_vector(xs)?;
        let kvy = inner.self_vector(ys)?;

        for (row, &kx) in km.iter_mut().zip(kvx.iter()) {
            for (k, &ky) in row.iter_mut().zip(kvy.iter()) {
                if *k != R::zero() {
                    *k = *k / (kx * ky).sqrt();
                }
            }
        }
        Ok(km)
    }

    fn self_matrix(&self, xs: &[X]) -> Result<KernelMatrix<R>> {
        let mut km = self.base.kernel_ref().self_matrix(xs)?;
        normalize_in_place(&mut km);
        Ok(km)
    }

    fn self_vector(&self, xs: &[X]) -> Result<Vec<R>> {
        let kv = self.base.kernel_ref().self_vector(xs)?;
        Ok(kv.into_iter().map(unit_or_zero).collect())
    }
}

fn unit_or_zero<R: KernelValue>(k: R) -> R {
    if k == R::zero() {
        R::zero()
    } else {
        R::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::KernelError;
    use crate::kernel::{GaussianKernel, PathKernel, SymbolKernel};
    use approx::assert_relative_eq;

    /// Plain dot product, zero for the zero vector
    struct DotKernel;

    impl Kernel<Vec<f64>> for DotKernel {
        fn pair_value(&self, x: &Vec<f64>, y: &Vec<f64>) -> Result<f64> {
            Ok(x.iter().zip(y.iter()).map(|(a, b)| a * b).sum())
        }
    }

    #[test]
    fn test_normalized_dot_product() {
        let inner = DotKernel;
        let kernel = NormalizedKernel::new(&inner);
        let x = vec![3.0, 4.0];
        let y = vec![4.0, 3.0];

        let k: f64 = kernel.pair_value(&x, &y).unwrap();
        assert_relative_eq!(k, 24.0 / 25.0, epsilon = 1e-12);

        let unit: f64 = kernel.self_value(&x).unwrap();
        assert_eq!(unit, 1.0);
    }

    #[test]
    fn test_zero_vector() {
        let inner = DotKernel;
        let kernel = NormalizedKernel::new(&inner);
        let zero = vec![0.0, 0.0];
        let x = vec![1.0, 2.0];

        let k: f64 = kernel.pair_value(&zero, &x).unwrap();
        let kz: f64 = kernel.self_value(&zero).unwrap();
        assert_eq!(k, 0.0);
        assert_eq!(kz, 0.0);

        let km: KernelMatrix = kernel.self_matrix(&[zero.clone(), x.clone()]).unwrap();
        assert_eq!(km, vec![vec![0.0, 0.0], vec![0.0, 1.0]]);

        let kv: Vec<f64> = kernel.self_vector(&[zero, x]).unwrap();
        assert_eq!(kv, vec![0.0, 1.0]);
    }

    #[test]
    fn test_normalized_path_kernel() {
        let symbols = SymbolKernel::identity(3).unwrap();
        let path = PathKernel::new(&symbols);
        let kernel = NormalizedKernel::new(&path);
        let list: Vec<Vec<usize>> = vec![vec![0, 1, 2, 1], vec![2, 2], vec![1, 0, 1, 0, 1, 0], vec![0]];

        let sym: KernelMatrix = kernel.self_matrix(&list).unwrap();
        let cross: KernelMatrix = kernel.cross_matrix(&list, &list).unwrap();
        let diag: Vec<f64> = kernel.self_vector(&list).unwrap();

        for i in 0..list.len() {
            assert_eq!(sym[i][i], 1.0);
            assert_eq!(diag[i], 1.0);
            for j in 0..list.len() {
                assert!(sym[i][j] >= -1.0 && sym[i][j] <= 1.0 + 1e-12);
                assert_eq!(sym[i][j], sym[j][i]);
                assert_relative_eq!(cross[i][j], sym[i][j], epsilon = 1e-12);

                let pair: f64 = kernel.pair_value(&list[i], &list[j]).unwrap();
                assert_relative_eq!(pair, sym[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_gaussian_is_already_normalized() {
        let gaussian = GaussianKernel::new(2.0).unwrap();
        let kernel = NormalizedKernel::new(&gaussian);
        let x = vec![1.0, 0.0, 2.0];
        let y = vec![0.0, 1.0, 2.0];

        let normalized: f64 = kernel.pair_value(&x, &y).unwrap();
        let raw: f64 = gaussian.pair_value(&x, &y).unwrap();
        assert_relative_eq!(normalized, raw, epsilon = 1e-12);
    }

    #[test]
    fn test_errors_pass_through() {
        let symbols = SymbolKernel::identity(2).unwrap();
        let kernel = NormalizedKernel::new(&symbols);

        let out_of_range: Result<f64> = kernel.pair_value(&0usize, &4usize);
        assert!(matches!(out_of_range, Err(KernelError::InvalidInput(_))));

        let none: [usize; 0] = [];
        let empty: Result<KernelMatrix> = kernel.self_matrix(&none);
        assert!(matches!(empty, Err(KernelError::InvalidInput(_))));
    }
}
