use super::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tp_core::*;

/// Budget defaults a [`Scheduler`] resets to at the start of every hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub total_ms: Millis,
    pub stages: BTreeMap<Stage, Millis>,
    pub buffer_ms: Millis,
    /// Upstream stage → downstream stage whose allocation absorbs its overrun.
    pub spill: BTreeMap<Stage, Stage>,
    /// Latency samples kept per stage.
    pub window: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_ms: BUDGET_TOTAL_MS,
            stages: [
                (Stage::Perception, BUDGET_PERCEPTION_MS),
                (Stage::Solver, BUDGET_SOLVER_MS),
                (Stage::Advisory, BUDGET_ADVISORY_MS),
                (Stage::Decision, BUDGET_DECISION_MS),
            ]
            .into_iter()
            .collect(),
            buffer_ms: BUDGET_BUFFER_MS,
            spill: [
                (Stage::Perception, Stage::Solver),
                (Stage::Solver, Stage::Advisory),
            ]
            .into_iter()
            .collect(),
            window: METRICS_WINDOW,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.total_ms == 0 {
            anyhow::bail!("total budget must be positive");
        }
        let sum = self.stages.values().sum::<Millis>() + self.buffer_ms;
        if sum > self.total_ms {
            anyhow::bail!("stage budgets and buffer ({}ms) exceed total ({}ms)", sum, self.total_ms);
        }
        if let Some((from, _)) = self.spill.iter().find(|(from, to)| from == to) {
            anyhow::bail!("stage {} cannot spill into itself", from);
        }
        Ok(())
    }
}

/// Per-stage remaining ceilings plus the shared buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub stages: BTreeMap<Stage, Millis>,
    pub buffer: Millis,
}

/// Result of recording a stage's actual duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub stage: Stage,
    pub actual: Millis,
    pub allocated: Millis,
    pub overrun: Millis,
    pub underrun: Millis,
    /// True only for the one call per hand that rebalanced the budget.
    pub applied: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    ceiling: Millis,
    reserved: Millis,
    started: Option<Instant>,
    finalized: bool,
}

impl Slot {
    fn remaining(&self) -> Millis {
        self.ceiling.saturating_sub(self.reserved)
    }
}

/// Per-hand time budget bookkeeping across pipeline stages.
///
/// The scheduler never interrupts anything. It tracks ceilings, moves
/// overruns and surplus between stages as durations are finalized, and
/// answers [`Scheduler::should_preempt`] so callers can abort themselves.
///
/// # Rebalancing
///
/// A finalized overrun on a stage with a spill target shrinks that target's
/// ceiling by exactly the overrun; any excess beyond that ceiling carries
/// on down the spill chain. A finalized underrun returns exactly the
/// surplus to the buffer. Each stage finalizes at most once per hand, so
/// surplus is never counted twice.
#[derive(Debug, Clone)]
pub struct Scheduler {
    settings: Settings,
    clock: Clock,
    slots: [Slot; 4],
    buffer: Millis,
    metrics: BTreeMap<Stage, Window>,
}

impl Scheduler {
    pub fn new(settings: Settings) -> Self {
        let metrics = Stage::all()
            .into_iter()
            .map(|stage| (stage, Window::new(settings.window)))
            .collect();
        let mut scheduler = Self {
            clock: Clock::new(settings.total_ms),
            slots: [Slot::default(); 4],
            buffer: 0,
            metrics,
            settings,
        };
        scheduler.start();
        scheduler
    }
    /// Restarts the hand clock and restores default allocations.
    /// Latency metrics persist across hands.
    pub fn start(&mut self) {
        self.clock = Clock::new(self.settings.total_ms);
        self.buffer = self.settings.buffer_ms;
        self.slots = Stage::all().map(|stage| Slot {
            ceiling: self.settings.stages.get(&stage).copied().unwrap_or(0),
            ..Slot::default()
        });
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
    pub fn ceiling(&self, stage: Stage) -> Millis {
        self.slot(stage).ceiling
    }
    /// Ceiling minus reservations.
    pub fn remaining(&self, stage: Stage) -> Millis {
        self.slot(stage).remaining()
    }
    pub fn buffer(&self) -> Millis {
        self.buffer
    }
    /// Reserves time against a stage. Fails without side effects when the
    /// stage has less than `ms` left.
    pub fn reserve(&mut self, stage: Stage, ms: Millis) -> bool {
        let slot = self.slot_mut(stage);
        match ms <= slot.remaining() {
            true => {
                slot.reserved += ms;
                true
            }
            false => false,
        }
    }
    /// Moves up to `ms` from the buffer into a stage's ceiling.
    /// Returns the amount granted.
    pub fn draw(&mut self, stage: Stage, ms: Millis) -> Millis {
        let grant = ms.min(self.buffer);
        self.buffer -= grant;
        self.slot_mut(stage).ceiling += grant;
        grant
    }
    pub fn start_component(&mut self, stage: Stage) {
        self.slot_mut(stage).started = Some(Instant::now());
    }
    /// Finalizes the bracketed duration. Returns `None` if the stage was
    /// never started.
    pub fn end_component(&mut self, stage: Stage) -> Option<Report> {
        let started = self.slot_mut(stage).started.take()?;
        let actual = started.elapsed().as_millis() as Millis;
        Some(self.record_actual(stage, actual, true))
    }
    /// True once the running stage has been inside its bracket longer than
    /// its ceiling.
    pub fn should_preempt(&self, stage: Stage) -> bool {
        let slot = self.slot(stage);
        slot.started
            .map(|t| t.elapsed().as_millis() as Millis > slot.ceiling)
            .unwrap_or(false)
    }
    /// Records an observed duration.
    ///
    /// Interim calls compare against the stage's remaining allocation and
    /// change nothing. The first finalizing call per hand rebalances the
    /// budget and records a latency sample; later ones only report.
    pub fn record_actual(&mut self, stage: Stage, actual: Millis, finalize: bool) -> Report {
        let slot = *self.slot(stage);
        let allocated = match finalize {
            true => slot.ceiling,
            false => slot.remaining(),
        };
        let mut report = Report {
            stage,
            actual,
            allocated,
            overrun: actual.saturating_sub(allocated),
            underrun: allocated.saturating_sub(actual),
            applied: false,
        };
        if !finalize || slot.finalized {
            return report;
        }
        self.slot_mut(stage).finalized = true;
        if let Some(window) = self.metrics.get_mut(&stage) {
            window.push(actual);
        }
        if report.overrun > 0 {
            self.spill(stage, report.overrun);
        }
        self.buffer += report.underrun;
        report.applied = true;
        report
    }
    pub fn allocation_snapshot(&self) -> Snapshot {
        Snapshot {
            stages: Stage::all()
                .into_iter()
                .map(|stage| (stage, self.remaining(stage)))
                .collect(),
            buffer: self.buffer,
        }
    }
    pub fn metrics_snapshot(&self, stage: Stage) -> Option<Metrics> {
        self.metrics.get(&stage).and_then(Window::snapshot)
    }
}

impl Scheduler {
    /// Charges an overrun to the spill chain. Whatever one target's ceiling
    /// cannot absorb moves on to that target's own spill target.
    fn spill(&mut self, from: Stage, overrun: Millis) {
        let mut source = from;
        let mut left = overrun;
        for _ in 0..Stage::all().len() {
            let Some(downstream) = self.settings.spill.get(&source).copied() else {
                break;
            };
            let target = self.slot_mut(downstream);
            let absorbed = left.min(target.ceiling);
            target.ceiling -= absorbed;
            left -= absorbed;
            log::debug!(
                "{:<32}{:<32}",
                format!("{} overran {}ms", from, overrun),
                format!("{} now {}ms", downstream, target.ceiling)
            );
            if left == 0 {
                return;
            }
            source = downstream;
        }
        log::debug!("{:<32}{:<32}", format!("{} overran", from), format!("{}ms unabsorbed", left));
    }
    fn slot(&self, stage: Stage) -> &Slot {
        &self.slots[stage as usize]
    }
    fn slot_mut(&mut self, stage: Stage) -> &mut Slot {
        &mut self.slots[stage as usize]
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_fill_total() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        let sum = settings.stages.values().sum::<Millis>() + settings.buffer_ms;
        assert_eq!(sum, settings.total_ms);
    }
    #[test]
    fn rejects_oversubscribed_settings() {
        let mut settings = Settings::default();
        settings.buffer_ms += 1;
        assert!(settings.validate().is_err());
    }
    #[test]
    fn failed_reserve_does_not_mutate() {
        let mut scheduler = Scheduler::default();
        let before = scheduler.allocation_snapshot();
        assert!(!scheduler.reserve(Stage::Solver, BUDGET_SOLVER_MS + 1));
        assert_eq!(scheduler.allocation_snapshot(), before);
        assert!(scheduler.reserve(Stage::Solver, 100));
        assert_eq!(scheduler.remaining(Stage::Solver), BUDGET_SOLVER_MS - 100);
        assert!(scheduler.reserve(Stage::Solver, BUDGET_SOLVER_MS - 100));
        assert!(!scheduler.reserve(Stage::Solver, 1));
    }
    #[test]
    fn overrun_shrinks_downstream_by_exact_amount() {
        let mut scheduler = Scheduler::default();
        let report = scheduler.record_actual(Stage::Perception, BUDGET_PERCEPTION_MS + 150, true);
        assert!(report.applied);
        assert_eq!(report.overrun, 150);
        assert_eq!(scheduler.ceiling(Stage::Solver), BUDGET_SOLVER_MS - 150);
        assert_eq!(scheduler.buffer(), BUDGET_BUFFER_MS);
    }
    #[test]
    fn overrun_saturates_downstream() {
        let mut scheduler = Scheduler::default();
        scheduler.record_actual(Stage::Perception, 5_000, true);
        assert_eq!(scheduler.ceiling(Stage::Solver), 0);
        assert_eq!(scheduler.ceiling(Stage::Advisory), 0);
    }
    #[test]
    fn excess_overrun_carries_down_the_chain() {
        let mut scheduler = Scheduler::default();
        scheduler.record_actual(Stage::Perception, 1_400, true);
        let excess = 1_400 - BUDGET_PERCEPTION_MS - BUDGET_SOLVER_MS;
        assert_eq!(scheduler.ceiling(Stage::Solver), 0);
        assert_eq!(scheduler.ceiling(Stage::Advisory), BUDGET_ADVISORY_MS - excess);
        assert_eq!(scheduler.ceiling(Stage::Decision), BUDGET_DECISION_MS);
    }
    #[test]
    fn underrun_returns_surplus_only_on_finalize() {
        let mut scheduler = Scheduler::default();
        let interim = scheduler.record_actual(Stage::Perception, 100, false);
        assert!(!interim.applied);
        assert_eq!(interim.underrun, BUDGET_PERCEPTION_MS - 100);
        assert_eq!(scheduler.buffer(), BUDGET_BUFFER_MS);
        scheduler.record_actual(Stage::Perception, 100, true);
        assert_eq!(scheduler.buffer(), BUDGET_BUFFER_MS + BUDGET_PERCEPTION_MS - 100);
    }
    #[test]
    fn finalizes_once_per_hand() {
        let mut scheduler = Scheduler::default();
        scheduler.record_actual(Stage::Perception, 100, true);
        let again = scheduler.record_actual(Stage::Perception, 100, true);
        assert!(!again.applied);
        assert_eq!(scheduler.buffer(), BUDGET_BUFFER_MS + BUDGET_PERCEPTION_MS - 100);
        scheduler.start();
        assert_eq!(scheduler.buffer(), BUDGET_BUFFER_MS);
        assert!(scheduler.record_actual(Stage::Perception, 100, true).applied);
    }
    #[test]
    fn draw_is_bounded_by_buffer() {
        let mut scheduler = Scheduler::default();
        assert_eq!(scheduler.draw(Stage::Decision, 100), 100);
        assert_eq!(scheduler.ceiling(Stage::Decision), BUDGET_DECISION_MS + 100);
        assert_eq!(scheduler.draw(Stage::Decision, 10_000), BUDGET_BUFFER_MS - 100);
        assert_eq!(scheduler.buffer(), 0);
    }
    #[test]
    fn preempts_after_ceiling() {
        let mut settings = Settings::default();
        settings.stages.insert(Stage::Advisory, 1);
        let mut scheduler = Scheduler::new(settings);
        assert!(!scheduler.should_preempt(Stage::Advisory));
        scheduler.start_component(Stage::Advisory);
        std::thread::sleep(Duration::from_millis(10));
        assert!(scheduler.should_preempt(Stage::Advisory));
        let report = scheduler.end_component(Stage::Advisory).unwrap();
        assert!(report.overrun > 0);
        assert!(!scheduler.should_preempt(Stage::Advisory));
    }
    #[test]
    fn metrics_persist_across_hands() {
        let mut scheduler = Scheduler::default();
        scheduler.record_actual(Stage::Solver, 40, true);
        scheduler.start();
        scheduler.record_actual(Stage::Solver, 60, true);
        let metrics = scheduler.metrics_snapshot(Stage::Solver).unwrap();
        assert_eq!(metrics.count, 2);
        assert_eq!(metrics.last, 60);
        assert!(scheduler.metrics_snapshot(Stage::Decision).is_none());
    }
}
