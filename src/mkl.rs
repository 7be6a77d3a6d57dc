//! Multiple kernel learning callback registration
//!
//! An MKL optimizer re-weights several subkernels between solver
//! iterations. The SVM only stores a shared handle to that optimizer and
//! the callback the solver loop should invoke; it never calls either
//! itself.

use std::fmt;
use std::sync::Arc;

/// External multiple kernel learning optimizer
pub trait MklOptimizer: Send + Sync {
    /// Update the kernel weights from the current weighted kernel sums
    ///
    /// Returns `true` when the MKL iteration should stop.
    fn perform_mkl_step(&self, weighted_sums: &[f64], sum_alpha: f64) -> bool;
}

/// Callback invoked by the solver with the registered optimizer, the
/// per-kernel weighted sums and the running alpha sum
pub type MklCallback = Arc<dyn Fn(&dyn MklOptimizer, &[f64], f64) -> bool + Send + Sync>;

/// Registered MKL optimizer and callback
#[derive(Clone, Default)]
pub struct MklHook {
    mkl: Option<Arc<dyn MklOptimizer>>,
    callback: Option<MklCallback>,
}

impl MklHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new optimizer and callback, dropping the previous handle
    pub fn register(
        &mut self,
        mkl: Option<Arc<dyn MklOptimizer>>,
        callback: Option<MklCallback>,
    ) {
        self.mkl = mkl;
        self.callback = callback;
    }

    pub fn mkl(&self) -> Option<&Arc<dyn MklOptimizer>> {
        self.mkl.as_ref()
    }

    pub fn callback(&self) -> Option<&MklCallback> {
        self.callback.as_ref()
    }

    /// Run the registered callback on behalf of a solver loop
    ///
    /// Returns `None` unless both an optimizer and a callback are registered.
    pub fn invoke(&self, weighted_sums: &[f64], sum_alpha: f64) -> Option<bool> {
        match (&self.mkl, &self.callback) {
            (Some(mkl), Some(callback)) => {
                Some(callback(mkl.as_ref(), weighted_sums, sum_alpha))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for MklHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MklHook")
            .field("mkl", &self.mkl.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Callback that forwards straight to [`MklOptimizer::perform_mkl_step`]
pub fn perform_mkl_step_callback() -> MklCallback {
    Arc::new(|mkl: &dyn MklOptimizer, sums: &[f64], suma: f64| {
        mkl.perform_mkl_step(sums, suma)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingMkl {
        steps: AtomicUsize,
    }

    impl MklOptimizer for CountingMkl {
        fn perform_mkl_step(&self, weighted_sums: &[f64], _sum_alpha: f64) -> bool {
            self.steps.fetch_add(1, Ordering::SeqCst);
            weighted_sums.is_empty()
        }
    }

    fn counting() -> Arc<CountingMkl> {
        Arc::new(CountingMkl {
            steps: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_empty_hook() {
        let hook = MklHook::new();
        assert!(hook.mkl().is_none());
        assert!(hook.callback().is_none());
        assert_eq!(hook.invoke(&[1.0], 0.5), None);
    }

    #[test]
    fn test_register_holds_reference() {
        let mkl = counting();
        let mut hook = MklHook::new();
        hook.register(Some(mkl.clone()), Some(perform_mkl_step_callback()));
        assert_eq!(Arc::strong_count(&mkl), 2);

        assert_eq!(hook.invoke(&[1.0, 2.0], 3.0), Some(false));
        assert_eq!(mkl.steps.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replacement_releases_previous() {
        let first = counting();
        let second = counting();
        let mut hook = MklHook::new();

        hook.register(Some(first.clone()), None);
        assert_eq!(Arc::strong_count(&first), 2);

        hook.register(Some(second.clone()), None);
        assert_eq!(Arc::strong_count(&first), 1);
        assert_eq!(Arc::strong_count(&second), 2);

        drop(hook);
        assert_eq!(Arc::strong_count(&second), 1);
    }

    #[test]
    fn test_custom_callback_receives_arguments() {
        let mut hook = MklHook::new();
        let callback: MklCallback = Arc::new(|_mkl: &dyn MklOptimizer, sums: &[f64], suma: f64| {
            sums.len() == 2 && suma > 1.0
        });
        hook.register(Some(counting()), Some(callback));

        assert_eq!(hook.invoke(&[0.1, 0.2], 1.5), Some(true));
        assert_eq!(hook.invoke(&[0.1], 1.5), Some(false));
    }
}
