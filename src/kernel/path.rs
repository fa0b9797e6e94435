//! Path Kernel over sequences
//!
//! For non-empty sequences s and t the Path Kernel is defined by the closed form
//!
//! k_PATH(s, t) = Σ_ij S[i][j] * (k_ω(i, j) + k_ω(|s|-1-i, |t|-1-j)) / 2
//!
//! where S[i][j] = k_Σ(s_i, t_j) is the matrix of symbol similarities from the
//! inner kernel and k_ω is the weight table. Each cell is weighted by the
//! average of its forward path weight and its path weight measured from the
//! sequence ends. This formula is the definition; it is not derived from a
//! recursion over sequence suffixes.
//!
//! The weight table is grown on demand and can be shared across runs through a
//! [`WeightCache`] directory.

use crate::cache::WeightCache;
use crate::core::{KernelError, KernelValue, PathKernelConfig, Result, Sequence};
use crate::kernel::{Kernel, KernelRef, WeightTable};
use log::{debug, warn};
use std::cell::RefCell;
use std::path::PathBuf;

/// Path Kernel wrapping a borrowed symbol kernel
///
/// Inputs are sequences (`Vec<S>`) of whatever symbol type the inner kernel
/// accepts. With a [`crate::kernel::GaussianKernel`] as inner kernel the inputs
/// are sequences of vectors; with a [`crate::kernel::SymbolKernel`] they are
/// sequences of labels.
///
/// Evaluation takes `&self`: the weight table lives in a `RefCell` and grows as
/// longer sequences are seen. The kernel is meant for single-threaded use.
pub struct PathKernel<'a, K: ?Sized> {
    base: KernelRef<'a, K>,
    table: RefCell<WeightTable>,
    storage: Option<WeightCache>,
}

impl<'a, K: ?Sized> PathKernel<'a, K> {
    /// Create a Path Kernel with the default step costs
    /// (C_HV = 0.9/3, C_D = 1.1/3)
    pub fn new(kernel: &'a K) -> Self {
        Self {
            base: KernelRef::new(kernel),
            table: RefCell::new(WeightTable::default()),
            storage: None,
        }
    }

    /// Create a Path Kernel with explicit step costs
    ///
    /// # Errors
    /// Returns `InvalidParameter` if either cost is not positive
    pub fn with_costs(kernel: &'a K, chv: f64, cd: f64) -> Result<Self> {
        Ok(Self {
            base: KernelRef::new(kernel),
            table: RefCell::new(WeightTable::new(chv, cd)?),
            storage: None,
        })
    }

    /// Create a Path Kernel from a configuration
    ///
    /// When the configuration names a storage location, the cached weight table
    /// is loaded right away.
    pub fn with_config(kernel: &'a K, config: &PathKernelConfig) -> Result<Self> {
        let mut path_kernel = Self::with_costs(kernel, config.chv, config.cd)?;
        if let Some(storage) = &config.storage {
            path_kernel.configure_storage(storage.location.clone(), storage.writable);
            path_kernel.load();
        }
        Ok(path_kernel)
    }

    /// Get the symbol kernel
    pub fn kernel_ref(&self) -> &'a K {
        self.base.kernel_ref()
    }

    /// Cost of horizontal and vertical steps
    pub fn chv(&self) -> f64 {
        self.table.borrow().chv()
    }

    /// Cost of diagonal steps
    pub fn cd(&self) -> f64 {
        self.table.borrow().cd()
    }

    /// Current dimension of the weight table
    pub fn dimension(&self) -> usize {
        self.table.borrow().dimension()
    }

    /// Copy of the current weight table
    pub fn weight_matrix(&self) -> Vec<Vec<f64>> {
        self.table.borrow().to_matrix()
    }

    /// Grow the weight table to handle sequences of length `dim`
    pub fn ensure_dimension(&self, dim: usize) {
        self.table.borrow_mut().ensure_dimension(dim);
    }

    /// Set the directory used by [`PathKernel::save`] and [`PathKernel::load`]
    ///
    /// A non-empty location grants read access; `writable` also grants write
    /// access. An empty location disables the cache.
    pub fn configure_storage<P: Into<PathBuf>>(&mut self, location: P, writable: bool) {
        let location = location.into();
        self.storage = if location.as_os_str().is_empty() {
            None
        } else {
            Some(WeightCache::new(location, writable))
        };
    }

    /// Configured cache, if any
    pub fn storage(&self) -> Option<&WeightCache> {
        self.storage.as_ref()
    }

    /// Write the weight table to the cache
    ///
    /// Returns true only if a record was written: the cache must be configured
    /// and writable, and must not already hold an equal or larger table. I/O
    /// failures are logged and reported as false.
    pub fn save(&self) -> bool {
        let Some(cache) = &self.storage else {
            return false;
        };
        match cache.save_table(&self.table.borrow()) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(
                    "Weight cache {:?} unavailable, table not saved: {}",
                    cache.location(),
                    e
                );
                false
            }
        }
    }

    /// Replace the weight table with the cached one if that is larger
    ///
    /// Returns true only if the in-memory table was replaced. I/O failures are
    /// logged and reported as false.
    pub fn load(&self) -> bool {
        let Some(cache) = &self.storage else {
            return false;
        };
        let (chv, cd, dim) = {
            let table = self.table.borrow();
            (table.chv(), table.cd(), table.dimension())
        };
        match cache.load_table(chv, cd, dim) {
            Ok(Some(loaded)) => self.table.borrow_mut().replace_with(loaded.into_rows()),
            Ok(None) => false,
            Err(e) => {
                warn!(
                    "Weight cache {:?} unavailable, table not loaded: {}",
                    cache.location(),
                    e
                );
                false
            }
        }
    }
}

fn empty_sequence() -> KernelError {
    KernelError::InvalidInput("input sequence is empty".to_string())
}

/// Average of the forward weight and the weight mirrored from the sequence ends
fn averaged_weight(table: &WeightTable, ls: usize, lt: usize, i: usize, j: usize) -> f64 {
    (table.get(i, j) + table.get(ls - 1 - i, lt - 1 - j)) / 2.0
}

impl<'a, S, R, K> Kernel<Sequence<S>, R> for PathKernel<'a, K>
where
    R: KernelValue,
    K: Kernel<S, R> + ?Sized,
{
    fn pair_value(&self, s: &Sequence<S>, t: &Sequence<S>) -> Result<R> {
        let (ls, lt) = (s.len(), t.len());
        if ls == 0 || lt == 0 {
            return Err(empty_sequence());
        }
        self.ensure_dimension(ls.max(lt));

        let skm = self.base.kernel_ref().cross_matrix(s, t)?;
        let table = self.table.borrow();

        let mut k = R::zero();
        for (i, row) in skm.iter().enumerate() {
            for (j, &sk) in row.iter().enumerate() {
                k += sk * R::from_f64(averaged_weight(&table, ls, lt, i, j));
            }
        }
        Ok(k)
    }

    fn self_value(&self, s: &Sequence<S>) -> Result<R> {
        let ls = s.len();
        if ls == 0 {
            return Err(empty_sequence());
        }
        self.ensure_dimension(ls);

        let skm = self.base.kernel_ref().self_matrix(s)?;
        let table = self.table.borrow();
        let two = R::from_f64(2.0);

        let mut k = R::zero();
        for i in 0..ls {
            k += skm[i][i] * R::from_f64(averaged_weight(&table, ls, ls, i, i));
            for j in (i + 1)..ls {
                k += two * skm[i][j] * R::from_f64(averaged_weight(&table, ls, ls, i, j));
            }
        }
        debug!("Path self value over {ls} symbols: {k:?}");
        Ok(k)
    }
}
