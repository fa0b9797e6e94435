//! Lookup-matrix kernel for labeled data

use crate::core::{KernelError, KernelMatrix, KernelValue, Result};
use crate::kernel::traits::ensure_non_empty;
use crate::kernel::Kernel;

/// Kernel over integer labels `0..N`, reading values from a fixed symmetric matrix
///
/// `SymbolKernel::identity(N)` is the delta kernel: 1 for identical labels and
/// 0 otherwise. It is the usual symbol kernel for Path Kernels over discrete
/// alphabets.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolKernel {
    similarities: Vec<Vec<f64>>,
}

impl SymbolKernel {
    /// Create a kernel from a square, symmetric similarity matrix
    pub fn from_matrix(similarities: Vec<Vec<f64>>) -> Result<Self> {
        let n = similarities.len();
        if n == 0 {
            return Err(KernelError::InvalidParameter(
                "similarity matrix is empty".to_string(),
            ));
        }
        for (i, row) in similarities.iter().enumerate() {
            if row.len() != n {
                return Err(KernelError::InvalidParameter(format!(
                    "similarity matrix is not square: row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
        }
        for i in 0..n {
            for j in 0..i {
                if similarities[i][j] != similarities[j][i] {
                    return Err(KernelError::InvalidParameter(format!(
                        "similarity matrix is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }
        Ok(Self { similarities })
    }

    /// Create the delta kernel over `n` labels
    pub fn identity(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(KernelError::InvalidParameter(
                "number of labels must be positive".to_string(),
            ));
        }
        let similarities = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Ok(Self { similarities })
    }

    /// Number of labels the kernel accepts
    pub fn n_labels(&self) -> usize {
        self.similarities.len()
    }

    fn check_label(&self, label: usize) -> Result<()> {
        if label >= self.n_labels() {
            return Err(KernelError::InvalidInput(format!(
                "label {label} exceeds maximum value {}",
                self.n_labels() - 1
            )));
        }
        Ok(())
    }

    fn check_labels(&self, labels: &[usize]) -> Result<()> {
        ensure_non_empty(labels)?;
        labels.iter().try_for_each(|&label| self.check_label(label))
    }

    fn lookup<R: KernelValue>(&self, i: usize, j: usize) -> R {
        R::from_f64(self.similarities[i][j])
    }
}

impl<R: KernelValue> Kernel<usize, R> for SymbolKernel {
    fn pair_value(&self, x: &usize, y: &usize) -> Result<R> {
        self.check_label(*x)?;
        self.check_label(*y)?;
        Ok(self.lookup(*x, *y))
    }

    fn self_value(&self, x: &usize) -> Result<R> {
        self.check_label(*x)?;
        Ok(self.lookup(*x, *x))
    }

    fn cross_matrix(&self, xs: &[usize], ys: &[usize]) -> Result<KernelMatrix<R>> {
        self.check_labels(xs)?;
        self.check_labels(ys)?;

        Ok(xs
            .iter()
            .map(|&x| ys.iter().map(|&y| self.lookup(x, y)).collect())
            .collect())
    }

    fn self_matrix(&self, xs: &[usize]) -> Result<KernelMatrix<R>> {
        self.check_labels(xs)?;

        let n = xs.len();
        let mut km = vec![vec![R::zero(); n]; n];
        for i in 0..n {
            km[i][i] = self.lookup(xs[i], xs[i]);
            for j in 0..i {
                let k = self.lookup(xs[i], xs[j]);
                km[i][j] = k;
                km[j][i] = k;
            }
        }
        Ok(km)
    }

    fn self_vector(&self, xs: &[usize]) -> Result<Vec<R>> {
        self.check_labels(xs)?;
        Ok(xs.iter().map(|&x| self.lookup(x, x)).collect())
    }
}
