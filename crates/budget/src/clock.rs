use std::time::Duration;
use std::time::Instant;
use tp_core::Millis;

/// Wall-clock deadline over the whole hand.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
    budget: Duration,
}

impl Clock {
    pub fn new(budget: Millis) -> Self {
        Self {
            start: Instant::now(),
            budget: Duration::from_millis(budget),
        }
    }
    pub fn budget(&self) -> Millis {
        self.budget.as_millis() as Millis
    }
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
    pub fn elapsed_ms(&self) -> Millis {
        self.elapsed().as_millis() as Millis
    }
    /// Zero once the budget is spent, and always zero for a zero budget.
    pub fn remaining_ms(&self) -> Millis {
        self.budget.saturating_sub(self.elapsed()).as_millis() as Millis
    }
    pub fn exhausted(&self) -> bool {
        self.budget.is_zero() || self.elapsed() >= self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_clock_has_budget() {
        let clock = Clock::new(3000);
        assert!(!clock.exhausted());
        assert!(clock.remaining_ms() > 2900);
        assert_eq!(clock.budget(), 3000);
    }
    #[test]
    fn zero_budget_is_exhausted() {
        let clock = Clock::new(0);
        assert!(clock.exhausted());
        assert_eq!(clock.remaining_ms(), 0);
    }
    #[test]
    fn expires() {
        let clock = Clock::new(1);
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.exhausted());
        assert_eq!(clock.remaining_ms(), 0);
        assert!(clock.elapsed_ms() >= 5);
    }
}
