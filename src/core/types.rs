//! Core type definitions shared by all kernels

use crate::core::{KernelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::ops::{Add, AddAssign, Div, Mul, Sub};
use std::path::{Path, PathBuf};

/// Default horizontal/vertical step cost of the Path Kernel
pub const DEFAULT_CHV: f64 = 0.9 / 3.0;

/// Default diagonal step cost of the Path Kernel
pub const DEFAULT_CD: f64 = 1.1 / 3.0;

/// Matrix of kernel values, `m[i][j]` holding the value for the i-th left and j-th right input
pub type KernelMatrix<R = f64> = Vec<Vec<R>>;

/// Ordered list of symbols
pub type Sequence<S> = Vec<S>;

/// Numeric type a kernel can return its values in
///
/// Implemented for `f32` and `f64`. Intermediate weights are kept in `f64`
/// and converted with [`KernelValue::from_f64`] where they meet kernel values.
pub trait KernelValue:
    Copy
    + Debug
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    fn zero() -> Self;

    fn one() -> Self;

    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64;

    fn sqrt(self) -> Self;
}

macro_rules! impl_kernel_value {
    ($($t:ty),*) => {
        $(
            impl KernelValue for $t {
                fn zero() -> Self {
                    0.0
                }

                fn one() -> Self {
                    1.0
                }

                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn sqrt(self) -> Self {
                    <$t>::sqrt(self)
                }
            }
        )*
    };
}

impl_kernel_value!(f32, f64);

/// Location of the weight-table cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `wmat_*.bin` records
    pub location: PathBuf,
    /// Whether records may be created or overwritten
    #[serde(default)]
    pub writable: bool,
}

/// Configuration for a Path Kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathKernelConfig {
    /// Cost of horizontal and vertical steps
    pub chv: f64,
    /// Cost of diagonal steps
    pub cd: f64,
    /// Optional on-disk cache for the weight table
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

impl Default for PathKernelConfig {
    fn default() -> Self {
        Self {
            chv: DEFAULT_CHV,
            cd: DEFAULT_CD,
            storage: None,
        }
    }
}

impl PathKernelConfig {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| KernelError::ParseError(e.to_string()))
    }
}
