//! Lazy integer progressions.

/// Inclusive progression `start, start+step, ...` up to `stop`.
///
/// Produced by `Range`, consumed element by element by `forall`, and
/// materialized into an array by `cva`. The step is never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeIter {
    start: i64,
    stop: i64,
    step: i64,
}

impl RangeIter {
    /// Build a progression; `None` when `step` is zero.
    pub fn new(start: i64, stop: i64, step: i64) -> Option<Self> {
        (step != 0).then_some(RangeIter { start, stop, step })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn stop(&self) -> i64 {
        self.stop
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        let span = i128::from(self.stop) - i128::from(self.start);
        let step = i128::from(self.step);
        if (step > 0 && span < 0) || (step < 0 && span > 0) {
            return 0;
        }
        usize::try_from(span / step + 1).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<i64> {
        if index >= self.len() {
            return None;
        }
        let offset = i64::try_from(index).ok()?.checked_mul(self.step)?;
        self.start.checked_add(offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len()).map_while(|i| self.get(i))
    }
}
