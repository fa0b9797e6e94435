//! Weight table of the Path Kernel
//!
//! The weight table k_ω counts weighted monotone lattice paths from the origin
//! to cell (i, j), where horizontal and vertical steps cost C_HV and diagonal
//! steps cost C_D:
//!
//! k_ω(0, 0) = 1
//! k_ω(i, j) = C_HV * (k_ω(i-1, j) + k_ω(i, j-1)) + C_D * k_ω(i-1, j-1)
//!
//! with out-of-range predecessors counting as 0. The table is symmetric and only
//! ever grows; a cell never changes once written.
//!
//! This recurrence defines only the table. The kernel value is the averaged
//! closed form documented in [`crate::kernel::path`].

use crate::core::{KernelError, KernelMatrix, Result, DEFAULT_CD, DEFAULT_CHV};
use log::debug;

/// Square, symmetric, append-only DP table of path weights
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    chv: f64,
    cd: f64,
    weights: Vec<Vec<f64>>,
}

impl WeightTable {
    /// Create a table of dimension 1 for the given step costs
    ///
    /// # Errors
    /// Returns `InvalidParameter` if either cost is not a positive finite number
    pub fn new(chv: f64, cd: f64) -> Result<Self> {
        validate_cost("CHV", chv)?;
        validate_cost("CD", cd)?;
        Ok(Self {
            chv,
            cd,
            weights: vec![vec![1.0]],
        })
    }

    /// Create a table directly at the given dimension
    pub fn with_dimension(chv: f64, cd: f64, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(KernelError::InvalidParameter(
                "weight table dimension must be positive".to_string(),
            ));
        }
        let mut table = Self::new(chv, cd)?;
        table.ensure_dimension(dim);
        Ok(table)
    }

    /// Rebuild a table from stored rows. The caller guarantees the rows form a
    /// non-empty square matrix.
    pub(crate) fn from_rows(chv: f64, cd: f64, weights: Vec<Vec<f64>>) -> Self {
        Self { chv, cd, weights }
    }

    /// Cost of horizontal and vertical steps
    pub fn chv(&self) -> f64 {
        self.chv
    }

    /// Cost of diagonal steps
    pub fn cd(&self) -> f64 {
        self.cd
    }

    /// Current number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// Get k_ω(i, j)
    ///
    /// # Panics
    /// Panics if i or j >= dimension()
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.weights[i][j]
    }

    /// Borrow the rows of the table
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// Copy the table into a plain matrix
    pub fn to_matrix(&self) -> KernelMatrix<f64> {
        self.weights.clone()
    }

    pub(crate) fn into_rows(self) -> Vec<Vec<f64>> {
        self.weights
    }

    /// Grow the table to at least `dim` rows and columns
    ///
    /// Does nothing if the table is already large enough. Existing cells are
    /// reused as they are, so extending in several steps yields exactly the
    /// same table as extending once.
    pub fn ensure_dimension(&mut self, dim: usize) {
        let old_dim = self.dimension();
        if dim <= old_dim {
            return;
        }
        debug!(
            "Extending weight table (CHV={}, CD={}) from {} to {}",
            self.chv, self.cd, old_dim, dim
        );

        let (chv, cd) = (self.chv, self.cd);
        let w = &mut self.weights;
        for row in w.iter_mut() {
            row.resize(dim, 0.0);
        }
        w.resize(dim, vec![0.0; dim]);

        // New border cells of row and column 0
        for i in old_dim..dim {
            let temp = chv * w[i - 1][0];
            w[i][0] = temp;
            w[0][i] = temp;
        }
        // New columns of the old rows
        for i in 1..old_dim {
            for j in old_dim..dim {
                let temp = recurrence(w, chv, cd, i, j);
                w[i][j] = temp;
                w[j][i] = temp;
            }
        }
        // New bottom-right block, upper triangle mirrored
        for i in old_dim..dim {
            for j in i..dim {
                let temp = recurrence(w, chv, cd, i, j);
                w[i][j] = temp;
                w[j][i] = temp;
            }
        }
    }

    /// Swap in a strictly larger table, as read from the cache
    ///
    /// Returns false and keeps the current table when `weights` is not larger.
    pub(crate) fn replace_with(&mut self, weights: Vec<Vec<f64>>) -> bool {
        if weights.len() <= self.dimension() {
            return false;
        }
        self.weights = weights;
        true
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::from_rows(DEFAULT_CHV, DEFAULT_CD, vec![vec![1.0]])
    }
}

/// Interior cell, i and j both positive
fn recurrence(w: &[Vec<f64>], chv: f64, cd: f64, i: usize, j: usize) -> f64 {
    chv * (w[i - 1][j] + w[i][j - 1]) + cd * w[i - 1][j - 1]
}

fn validate_cost(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(KernelError::InvalidParameter(format!(
            "parameter {name} is not positive, got: {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_table() {
        let table = WeightTable::new(0.3, 0.4).unwrap();
        assert_eq!(table.dimension(), 1);
        assert_eq!(table.get(0, 0), 1.0);
        assert_eq!(table.chv(), 0.3);
        assert_eq!(table.cd(), 0.4);

        let default = WeightTable::default();
        assert_eq!(default.chv(), DEFAULT_CHV);
        assert_eq!(default.cd(), DEFAULT_CD);
        assert_eq!(default.rows(), &[vec![1.0]]);
    }

    #[test]
    fn test_invalid_costs() {
        assert!(matches!(
            WeightTable::new(0.0, 0.4),
            Err(KernelError::InvalidParameter(_))
        ));
        assert!(matches!(
            WeightTable::new(0.3, -0.4),
            Err(KernelError::InvalidParameter(_))
        ));
        assert!(matches!(
            WeightTable::new(f64::INFINITY, 0.4),
            Err(KernelError::InvalidParameter(_))
        ));
        assert!(matches!(
            WeightTable::with_dimension(0.3, 0.4, 0),
            Err(KernelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_hand_computed_table() {
        let table = WeightTable::with_dimension(0.3, 0.4, 3).unwrap();
        let expected = [
            [1.0, 0.3, 0.09],
            [0.3, 0.58, 0.321],
            [0.09, 0.321, 0.4246],
        ];

        assert_eq!(table.dimension(), 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(table.get(i, j), expected[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_table_is_symmetric() {
        let table = WeightTable::with_dimension(DEFAULT_CHV, DEFAULT_CD, 12).unwrap();
        for i in 0..12 {
            for j in 0..12 {
                assert_eq!(table.get(i, j), table.get(j, i));
            }
        }
    }

    #[test]
    fn test_incremental_extension_matches_direct() {
        let direct = WeightTable::with_dimension(0.3, 0.4, 9).unwrap();

        let mut stepped = WeightTable::new(0.3, 0.4).unwrap();
        stepped.ensure_dimension(2);
        stepped.ensure_dimension(5);
        stepped.ensure_dimension(9);

        // Bitwise identical, not just close
        assert_eq!(stepped, direct);
    }

    #[test]
    fn test_extension_keeps_existing_cells() {
        let mut table = WeightTable::with_dimension(0.25, 0.5, 4).unwrap();
        let before = table.to_matrix();

        table.ensure_dimension(7);
        for (i, row) in before.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                assert_eq!(table.get(i, j), value);
            }
        }
    }

    #[test]
    fn test_ensure_smaller_dimension_is_noop() {
        let mut table = WeightTable::with_dimension(0.3, 0.4, 6).unwrap();
        let before = table.clone();

        table.ensure_dimension(3);
        table.ensure_dimension(6);
        table.ensure_dimension(0);
        assert_eq!(table, before);
    }

    #[test]
    fn test_replace_with_requires_larger_table() {
        let mut table = WeightTable::with_dimension(0.3, 0.4, 3).unwrap();
        let smaller = WeightTable::with_dimension(0.3, 0.4, 2).unwrap().to_matrix();
        let larger = WeightTable::with_dimension(0.3, 0.4, 5).unwrap().to_matrix();

        assert!(!table.replace_with(smaller));
        assert_eq!(table.dimension(), 3);

        assert!(table.replace_with(larger.clone()));
        assert_eq!(table.to_matrix(), larger);
    }
}
