use std::fmt::Debug;

/// Wall-clock source for the default end of explicit windows.
pub trait Clock: Send + Sync + Debug {
    /// Current time in whole seconds since the Unix epoch.
    fn now_epoch(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Frozen clock for deterministic request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch(&self) -> i64 {
        self.0
    }
}
