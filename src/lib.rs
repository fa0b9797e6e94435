//! Path Kernel for sequences of symbols
//!
//! Implements the Path Kernel k_PATH together with a small kernel framework:
//! a shared kernel contract, kernels on single symbols, and combinators that
//! borrow the kernel they wrap.

pub mod cache;
pub mod core;
pub mod data;
pub mod kernel;
pub mod utils;

// Re-export main types for convenience
pub use crate::cache::{RecordState, WeightCache};
pub use crate::core::types::*;
pub use crate::core::{KernelError, Result};
pub use crate::data::{LabelAlphabet, SequenceDataset};
pub use crate::kernel::{
    GaussianKernel, Kernel, KernelRef, NormalizedKernel, PathKernel, SymbolKernel, WeightTable,
};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
