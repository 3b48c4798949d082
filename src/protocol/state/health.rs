//! Health collaborator feeding the `WithError` state presentation.
//!
//! The state machine only reads health. Whoever runs the built-in tests owns
//! the flag and updates it from outside (another thread, an interrupt, a
//! periodic task).
use core::sync::atomic::{AtomicBool, Ordering};

/// Source of the module's health flag.
pub trait HealthMonitor {
    /// `false` once any built-in test reports a fault.
    fn health_ok(&self) -> bool;
}

/// Monitor for setups without built-in tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AlwaysHealthy;

impl HealthMonitor for AlwaysHealthy {
    fn health_ok(&self) -> bool {
        true
    }
}

impl HealthMonitor for AtomicBool {
    fn health_ok(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: HealthMonitor + ?Sized> HealthMonitor for &T {
    fn health_ok(&self) -> bool {
        (**self).health_ok()
    }
}

#[cfg(feature = "std")]
impl<T: HealthMonitor + ?Sized> HealthMonitor for std::sync::Arc<T> {
    fn health_ok(&self) -> bool {
        (**self).health_ok()
    }
}
