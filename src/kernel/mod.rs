//! Kernel functions and kernel combinators

pub mod gaussian;
pub mod normalized;
pub mod path;
pub mod reference;
pub mod symbol;
pub mod traits;
pub mod weights;

pub use self::gaussian::GaussianKernel;
pub use self::normalized::NormalizedKernel;
pub use self::path::PathKernel;
pub use self::reference::KernelRef;
pub use self::symbol::SymbolKernel;
pub use self::traits::Kernel;
pub use self::weights::WeightTable;
