//! Cycle counting and the optional cycle guard.

/// Returned by [`CycleGuard::tick`] when the armed bound is exceeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardTripped {
    /// The number of cycles the guard was armed for.
    pub limit: u64,
}

/// Counts execution cycles and enforces an optional cycle bound.
///
/// A guard armed for `C` cycles lets exactly `C` cycles run; the tick that
/// starts cycle `C + 1` trips it. Tripping disarms the guard, so the error
/// handling that follows is not itself cut short.
#[derive(Clone, Debug, Default)]
pub struct CycleGuard {
    /// Cycles started since the interpreter was created.
    cycles: u64,
    /// Armed bound: (cycle count at arming, allowed cycles).
    armed: Option<(u64, u64)>,
    /// Cycle (relative to arming) on which the guard last tripped.
    tripped_at: Option<u64>,
}

impl CycleGuard {
    pub fn new() -> Self {
        CycleGuard::default()
    }

    /// Allow `limit` more cycles.
    pub fn arm(&mut self, limit: u64) {
        self.armed = Some((self.cycles, limit));
        self.tripped_at = None;
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Total cycles started.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Relative cycle number on which the guard last tripped.
    pub fn tripped_at(&self) -> Option<u64> {
        self.tripped_at
    }

    /// Count one cycle, failing if it exceeds the armed bound.
    #[inline]
    pub fn tick(&mut self) -> Result<(), GuardTripped> {
        self.cycles = self.cycles.saturating_add(1);
        if let Some((start, limit)) = self.armed {
            let used = self.cycles - start;
            if used > limit {
                self.armed = None;
                self.tripped_at = Some(used);
                return Err(GuardTripped { limit });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_guard_only_counts() {
        let mut guard = CycleGuard::new();
        for _ in 0..1000 {
            assert!(guard.tick().is_ok());
        }
        assert_eq!(guard.cycles(), 1000);
        assert_eq!(guard.tripped_at(), None);
    }

    #[test]
    fn trips_on_cycle_after_limit() {
        let mut guard = CycleGuard::new();
        guard.tick().ok();
        guard.arm(5);
        for _ in 0..5 {
            assert!(guard.tick().is_ok());
        }
        assert_eq!(guard.tick(), Err(GuardTripped { limit: 5 }));
        assert_eq!(guard.tripped_at(), Some(6));
        assert!(!guard.is_armed());
        assert!(guard.tick().is_ok());
    }

    #[test]
    fn zero_limit_trips_immediately() {
        let mut guard = CycleGuard::new();
        guard.arm(0);
        assert!(guard.tick().is_err());
        assert_eq!(guard.tripped_at(), Some(1));
    }

    #[test]
    fn disarm_cancels_bound() {
        let mut guard = CycleGuard::new();
        guard.arm(1);
        guard.disarm();
        assert!(guard.tick().is_ok());
        assert!(guard.tick().is_ok());
    }
}
