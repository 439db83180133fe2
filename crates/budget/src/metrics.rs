use std::collections::VecDeque;
use tp_core::Millis;

/// Rolling window of observed stage latencies.
#[derive(Debug, Clone)]
pub struct Window {
    samples: VecDeque<Millis>,
    capacity: usize,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }
    /// Appends a sample, evicting the oldest past capacity.
    pub fn push(&mut self, sample: Millis) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    /// `None` until the first sample.
    pub fn snapshot(&self) -> Option<Metrics> {
        let last = *self.samples.back()?;
        let mut sorted = self.samples.iter().copied().collect::<Vec<_>>();
        sorted.sort_unstable();
        Some(Metrics {
            p50: percentile(&sorted, 50.),
            p95: percentile(&sorted, 95.),
            p99: percentile(&sorted, 99.),
            last,
            count: sorted.len(),
        })
    }
}

/// Latency summary for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Metrics {
    pub p50: Millis,
    pub p95: Millis,
    pub p99: Millis,
    pub last: Millis,
    pub count: usize,
}

/// Nearest-rank percentile over sorted, non-empty samples.
fn percentile(sorted: &[Millis], p: f64) -> Millis {
    let rank = (p / 100. * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_rank() {
        let mut window = Window::new(256);
        (1..=100).for_each(|ms| window.push(ms));
        let metrics = window.snapshot().unwrap();
        assert_eq!(metrics.p50, 50);
        assert_eq!(metrics.p95, 95);
        assert_eq!(metrics.p99, 99);
        assert_eq!(metrics.last, 100);
        assert_eq!(metrics.count, 100);
    }
    #[test]
    fn evicts_oldest() {
        let mut window = Window::new(3);
        [500, 1, 2, 3].into_iter().for_each(|ms| window.push(ms));
        let metrics = window.snapshot().unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(metrics.p99, 3);
        assert_eq!(metrics.p50, 2);
    }
    #[test]
    fn empty_window_has_no_metrics() {
        assert!(Window::new(8).snapshot().is_none());
    }
}
