use std::fmt;
use std::ops::Sub;

/// Index of a page-sized frame within one storage tier.
///
/// RAM and the swap area each number their frames from zero, so the same
/// index can name a RAM frame and an unrelated swap frame at the same time.
pub type FrameIndex = usize;

/// Ticks per simulated time unit. Whole-page operations (install, swap,
/// access) cost one unit; releasing a page on free costs a single tick.
pub const TICKS_PER_UNIT: u64 = 10;

/// Identity of one logical page: the owning process plus the page's number
/// within that process's address space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    pub pid: String,
    pub page: usize,
}

impl PageKey {
    pub fn new(pid: impl Into<String>, page: usize) -> PageKey {
        PageKey {
            pid: pid.into(),
            page,
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pid, self.page)
    }
}

/// Instant on the simulation clock, stored as a whole number of ticks so
/// that fractional costs stay exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_ticks(ticks: u64) -> SimTime {
        SimTime(ticks)
    }

    pub fn ticks(self) -> u64 {
        self.0
    }

    /// Advances the clock by whole time units.
    pub fn advance_units(&mut self, units: u64) {
        self.0 += units * TICKS_PER_UNIT;
    }

    /// Advances the clock by individual ticks.
    pub fn advance_ticks(&mut self, ticks: u64) {
        self.0 += ticks;
    }
}

impl Sub for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 - rhs.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / TICKS_PER_UNIT, self.0 % TICKS_PER_UNIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0.0")]
    #[case(5, "0.5")]
    #[case(10, "1.0")]
    #[case(22, "2.2")]
    #[case(105, "10.5")]
    fn test_sim_time_display(#[case] ticks: u64, #[case] expected: &str) {
        assert_eq!(SimTime::from_ticks(ticks).to_string(), expected);
    }

    #[rstest]
    fn test_sim_time_advances() {
        let mut time = SimTime::ZERO;
        time.advance_units(2);
        assert_eq!(time.ticks(), 20);
        time.advance_ticks(3);
        assert_eq!(time.ticks(), 23);
    }

    #[rstest]
    fn test_sim_time_difference() {
        let earlier = SimTime::from_ticks(10);
        let later = SimTime::from_ticks(32);
        assert_eq!(later - earlier, SimTime::from_ticks(22));
    }

    #[rstest]
    fn test_page_key_display() {
        assert_eq!(PageKey::new("p1", 2).to_string(), "p1/2");
    }
}
