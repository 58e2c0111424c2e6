use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared "an export is running" flag.
///
/// Cloning shares the flag. At most one [`ExportGuard`] exists per flag at any time.
#[derive(Clone, Debug, Default)]
pub struct ExportFlag(Arc<AtomicBool>);

impl ExportFlag {
    /// Fresh, idle flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an export currently holds the flag.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Claim the flag. `None` when another export already holds it.
    pub fn try_acquire(&self) -> Option<ExportGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard {
                flag: Arc::clone(&self.0),
            })
    }
}

/// Holds the export flag; dropping it releases the flag on every exit path.
#[derive(Debug)]
pub struct ExportGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/flag.rs"]
mod tests;
