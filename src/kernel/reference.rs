//! Borrowed inner kernel shared by combinators

/// Non-owning handle on the kernel a combinator wraps
///
/// The combinator neither owns nor copies the inner kernel; the borrow keeps
/// the inner kernel alive for at least as long as the combinator.
pub struct KernelRef<'a, K: ?Sized> {
    kernel: &'a K,
}

impl<'a, K: ?Sized> KernelRef<'a, K> {
    /// Wrap a reference to an inner kernel
    pub fn new(kernel: &'a K) -> Self {
        Self { kernel }
    }

    /// Get the inner kernel
    pub fn kernel_ref(&self) -> &'a K {
        self.kernel
    }
}

impl<K: ?Sized> Clone for KernelRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for KernelRef<'_, K> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Kernel, SymbolKernel};

    #[test]
    fn test_kernel_ref_exposes_inner() {
        let inner = SymbolKernel::identity(3).unwrap();
        let handle = KernelRef::new(&inner);

        assert!(std::ptr::eq(handle.kernel_ref(), &inner));

        let k: f64 = handle.kernel_ref().pair_value(&1, &1).unwrap();
        assert_eq!(k, 1.0);
    }

    #[test]
    fn test_kernel_ref_over_trait_object() {
        let inner = SymbolKernel::identity(2).unwrap();
        let object: &dyn Kernel<usize, f64> = &inner;
        let handle = KernelRef::new(object);
        let copy = handle;

        assert_eq!(copy.kernel_ref().pair_value(&0, &1).unwrap(), 0.0);
        assert_eq!(handle.kernel_ref().pair_value(&1, &1).unwrap(), 1.0);
    }
}
