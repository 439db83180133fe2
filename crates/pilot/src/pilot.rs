use super::*;
use futures::future::join_all;
use std::time::Duration;
use tokio::time::Instant;
use tp_budget::Scheduler;
use tp_budget::Stage;
use tp_cache::LoadStatus;
use tp_cache::Loader;
use tp_cache::Strategies;
use tp_core::*;
use tp_engine::*;
use tp_risk::Gate;
use tp_risk::Panic;
use tp_state::GameState;

/// What one hand produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub decision: Decision,
    /// Every advisory answer, usable or not, in oracle order.
    pub advice: Vec<Advice>,
    pub record: HandRecord,
}

/// Runs the per-hand pipeline: perception accounting, cache lookup,
/// parallel advisory queries, then a gated decision.
///
/// A pilot owns every piece of mutable per-agent state (the scheduler and
/// the risk gate) and handles one hand at a time.
pub struct Pilot {
    config: Config,
    engine: Engine,
    scheduler: Scheduler,
    gate: Gate,
    strategies: Strategies,
    oracles: Vec<Box<dyn Oracle>>,
}

impl Pilot {
    pub fn new(config: Config, strategies: Strategies) -> Self {
        Self {
            engine: Engine::new(config.blend),
            scheduler: Scheduler::new(config.budget.clone()),
            gate: Gate::new(config.risk),
            strategies,
            oracles: Vec::new(),
            config,
        }
    }
    /// Loads the configured cache root, or runs without a cache.
    pub fn load(config: Config) -> Self {
        let strategies = match config.cache.root.as_ref() {
            Some(root) => Loader::new(root).expect(config.cache.expected.clone()).load(),
            None => {
                log::info!("{:<32}{:<32}", "no strategy cache configured", "advisory only");
                Strategies::empty(LoadStatus::Missing(String::from("no cache root configured")))
            }
        };
        Self::new(config, strategies)
    }
    pub fn with_oracle(mut self, oracle: impl Oracle + 'static) -> Self {
        self.oracles.push(Box::new(oracle));
        self
    }
    pub fn on_panic(&mut self, callback: impl FnMut(&Panic) + Send + 'static) {
        self.gate.on_panic(callback);
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
    pub fn strategies(&self) -> &Strategies {
        &self.strategies
    }
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
    pub fn gate(&self) -> &Gate {
        &self.gate
    }
    /// Settles a finished hand against the risk gate.
    pub fn settle(&mut self, net: Chips) {
        self.gate.record_outcome(net);
        self.gate.increment_hand_count();
    }
    /// Starts a new session: clears the panic stop and risk counters.
    pub fn reset_session(&mut self) {
        self.gate.reset_session();
    }
}

impl Pilot {
    pub async fn decide(&mut self, state: &GameState, session: &str) -> Outcome {
        self.scheduler.start();
        let perception = self
            .scheduler
            .record_actual(Stage::Perception, state.latency_ms(), true);
        if perception.overrun > 0 {
            log::warn!("{:<32}{:<32}", "perception overran", format!("{}ms over", perception.overrun));
        }

        self.scheduler.start_component(Stage::Solver);
        let cache = CacheSignal::lookup(&self.strategies, state);
        self.finish(Stage::Solver);

        let (seed, _) = resolve_seed(state.hand_id(), session, self.config.seed);
        let allocation = match self.oracles.is_empty() {
            true => None,
            false => self.fund(Stage::Advisory, state.latency_ms()),
        };
        let skipped = !self.oracles.is_empty() && allocation.is_none();
        let advice = match (allocation, skipped) {
            (None, false) => Vec::new(),
            (None, true) => {
                log::warn!(
                    "{:<32}{:<32}",
                    "advisory skipped",
                    format!("{}ms left", self.scheduler.remaining(Stage::Advisory))
                );
                Vec::new()
            }
            (Some(allocation), _) => {
                self.scheduler.reserve(Stage::Advisory, allocation);
                self.scheduler.start_component(Stage::Advisory);
                let deadline = Instant::now() + Duration::from_millis(allocation);
                let advice = join_all(self.oracles.iter().enumerate().map(|(i, oracle)| {
                    Self::ask(oracle.as_ref(), state, deadline, sub_seed(seed, i as u32), self.config.advisory)
                }))
                .await;
                self.finish(Stage::Advisory);
                advice
            }
        };
        let opinions = advice
            .iter()
            .filter_map(Advice::opinion)
            .cloned()
            .collect::<Vec<_>>();

        self.scheduler.start_component(Stage::Decision);
        let request = Request::new(state, session)
            .cache(cache.as_ref())
            .opinions(&opinions)
            .skipped(skipped)
            .seed(self.config.seed);
        let decision = self.engine.decide(request, &mut self.gate);
        self.finish(Stage::Decision);
        if self.scheduler.clock().exhausted() {
            log::warn!("{:<32}{:<32}", "hand budget exhausted", format!("{}ms", self.scheduler.clock().elapsed_ms()));
        }
        log::info!("{:<32}{:<32}", format!("{} {}", state.hand_id(), state.street()), decision.action);
        let record = HandRecord::new(request, decision.metadata.clone());
        Outcome {
            decision,
            advice,
            record,
        }
    }
    /// Tops a starved stage up from the buffer and returns what it may
    /// spend: its remaining allocation, bounded by the query ceiling and by
    /// what the hand clock leaves once perception and the decision stage are
    /// paid for. `None` if that falls short of the advisory minimum.
    fn fund(&mut self, stage: Stage, perception: Millis) -> Option<Millis> {
        let minimum = self.config.advisory.min_budget_ms;
        let remaining = self.scheduler.remaining(stage);
        if remaining < minimum {
            let granted = self.scheduler.draw(stage, minimum - remaining);
            log::debug!("{:<32}{:<32}", format!("{} drew from buffer", stage), format!("{}ms", granted));
        }
        let headroom = self
            .scheduler
            .clock()
            .remaining_ms()
            .saturating_sub(perception)
            .saturating_sub(self.scheduler.remaining(Stage::Decision));
        let available = self.scheduler.remaining(stage).min(headroom);
        match available >= minimum {
            true => Some(available.min(self.config.advisory.hard_timeout_ms)),
            false => None,
        }
    }
    fn finish(&mut self, stage: Stage) {
        if self.scheduler.should_preempt(stage) {
            log::warn!(
                "{:<32}{:<32}",
                format!("{} preempted", stage),
                format!("{}ms ceiling", self.scheduler.ceiling(stage))
            );
        }
        if let Some(report) = self.scheduler.end_component(stage) {
            log::trace!("{:<32}{:<32}", format!("{} took {}ms", stage, report.actual), format!("of {}ms", report.allocated));
        }
    }
    /// Queries one oracle until it answers, the deadline passes, or transport
    /// retries run out. Rejected payloads are final.
    async fn ask(oracle: &dyn Oracle, state: &GameState, deadline: Instant, seed: Seed, advisory: Advisory) -> Advice {
        let model = oracle.model().to_string();
        let mut attempt = 0;
        loop {
            match tokio::time::timeout_at(deadline, oracle.advise(state)).await {
                Ok(Ok(payload)) => return Advice::validate(&model, &payload),
                Ok(Err(e)) if attempt < advisory.retries => {
                    let backoff = sub_seed(seed, attempt as u32) as Millis % advisory.jitter_ms.saturating_add(1);
                    log::debug!("{:<32}{:<32}", format!("advisory {} retry", model), format!("{:#} ({}ms)", e, backoff));
                    tokio::time::sleep_until(deadline.min(Instant::now() + Duration::from_millis(backoff))).await;
                    attempt += 1;
                }
                Ok(Err(e)) => {
                    log::warn!("{:<32}{:<32}", format!("advisory {} failed", model), format!("{:#}", e));
                    return Advice::Failed {
                        model,
                        detail: format!("{:#}", e),
                    };
                }
                Err(_) => {
                    log::warn!("{:<32}{:<32}", format!("advisory {} timed out", model), format!("attempt {}", attempt + 1));
                    return Advice::Timeout { model };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use tp_cache::*;
    use tp_fingerprint::Fingerprint;
    use tp_risk::Limits;
    use tp_risk::Rejection;
    use tp_state::*;

    fn state(hand: &str) -> GameState {
        lagging(hand, 120)
    }
    fn lagging(hand: &str, latency: Millis) -> GameState {
        GameState::from_json(
            &json!({
                "hand_id": hand,
                "game": "nlhe-6max",
                "blinds": { "small": 50, "big": 100 },
                "roles": { "hero": "BB", "button": "BTN", "small_blind": "SB", "big_blind": "BB" },
                "seats": { "BTN": { "stack": 10000 }, "BB": { "stack": 10000, "hole": ["8h", "8d"] } },
                "pot": 350,
                "street": "preflop",
                "history": [
                    { "seat": "BB", "street": "preflop", "action": "BLIND 100" },
                    { "seat": "BTN", "street": "preflop", "action": "RAISE 200" }
                ],
                "legal": [
                    { "kind": "fold" },
                    { "kind": "call", "min": 100, "max": 100 },
                    { "kind": "raise", "min": 300, "max": 10000 }
                ],
                "latency_ms": latency
            })
            .to_string(),
        )
        .unwrap()
    }
    fn calling() -> Canned {
        Canned::new("gpt-x", json!({ "confidence": 0.8, "actions": [{ "action": "CALL", "probability": 1.0 }] }))
    }

    struct Slow(u64);
    #[async_trait::async_trait]
    impl Oracle for Slow {
        fn model(&self) -> &str {
            "slow"
        }
        async fn advise(&self, _: &GameState) -> anyhow::Result<serde_json::Value> {
            tokio::time::sleep(Duration::from_millis(self.0)).await;
            Ok(json!({ "confidence": 1.0, "actions": [{ "action": "FOLD", "probability": 1.0 }] }))
        }
    }

    struct Flaky {
        failures: usize,
        calls: Arc<AtomicUsize>,
    }
    #[async_trait::async_trait]
    impl Oracle for Flaky {
        fn model(&self) -> &str {
            "flaky"
        }
        async fn advise(&self, _: &GameState) -> anyhow::Result<serde_json::Value> {
            match self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                true => Err(anyhow::anyhow!("connection reset")),
                false => Ok(json!({ "confidence": 0.9, "actions": [{ "action": "RAISE 600", "probability": 1.0 }] })),
            }
        }
    }

    #[tokio::test]
    async fn advisory_only_without_cache() {
        let mut pilot = Pilot::load(Config::default()).with_oracle(calling());
        let outcome = pilot.decide(&state("H-1"), "S-1").await;
        assert_eq!(outcome.decision.action, tp_state::Action::Call(100));
        assert_eq!(outcome.decision.metadata.fallback, Some(Fallback::CacheMiss));
        assert_eq!(outcome.decision.metadata.seed, stable_hash("H-1:S-1"));
        assert_eq!(outcome.advice.len(), 1);
        assert_eq!(pilot.scheduler().metrics_snapshot(Stage::Perception).map(|m| m.last), Some(120));
    }
    #[tokio::test]
    async fn slow_advisor_times_out_without_stalling() {
        let mut config = Config::default();
        config.budget.stages.insert(Stage::Advisory, 100);
        let mut pilot = Pilot::load(config).with_oracle(Slow(5_000)).with_oracle(calling());
        let started = std::time::Instant::now();
        let outcome = pilot.decide(&state("H-2"), "S-1").await;
        assert!(started.elapsed() < Duration::from_millis(2_000));
        assert_eq!(outcome.advice[0], Advice::Timeout { model: String::from("slow") });
        assert!(outcome.advice[1].opinion().is_some());
        assert_eq!(outcome.decision.action, tp_state::Action::Call(100));
    }
    #[tokio::test]
    async fn slow_perception_shortens_advisory() {
        let mut pilot = Pilot::load(Config::default()).with_oracle(Slow(10_000));
        let started = std::time::Instant::now();
        let outcome = pilot.decide(&lagging("H-11", 1_400), "S-1").await;
        let spent = 1_400 + started.elapsed().as_millis() as Millis;
        assert!(spent < BUDGET_TOTAL_MS, "hand took {}ms", spent);
        assert_eq!(outcome.advice[0], Advice::Timeout { model: String::from("slow") });
        assert_eq!(outcome.decision.action, tp_state::Action::Fold);
    }
    #[tokio::test]
    async fn hand_clock_bounds_advisory_without_spill() {
        let mut config = Config::default();
        config.budget.spill.clear();
        let mut pilot = Pilot::load(config).with_oracle(Slow(10_000));
        let started = std::time::Instant::now();
        pilot.decide(&lagging("H-12", 1_400), "S-1").await;
        let spent = 1_400 + started.elapsed().as_millis() as Millis;
        assert!(spent < BUDGET_TOTAL_MS, "hand took {}ms", spent);
    }
    #[tokio::test]
    async fn exhausted_hand_clock_skips_advisory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let flaky = Flaky {
            failures: 0,
            calls: calls.clone(),
        };
        let mut pilot = Pilot::load(Config::default()).with_oracle(flaky);
        let outcome = pilot.decide(&lagging("H-13", BUDGET_TOTAL_MS), "S-1").await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.decision.metadata.fallback, Some(Fallback::NoSignal));
        assert_eq!(outcome.decision.action, tp_state::Action::Fold);
    }
    #[tokio::test]
    async fn unbounded_jitter_does_not_overflow() {
        let mut config = Config::default();
        config.advisory.jitter_ms = Millis::MAX;
        config.budget.stages.insert(Stage::Advisory, 200);
        let calls = Arc::new(AtomicUsize::new(0));
        let broken = Flaky {
            failures: usize::MAX,
            calls: calls.clone(),
        };
        let mut pilot = Pilot::load(config).with_oracle(broken);
        let outcome = pilot.decide(&state("H-14"), "S-1").await;
        assert!(matches!(outcome.advice[0], Advice::Failed { .. } | Advice::Timeout { .. }));
    }
    #[tokio::test]
    async fn transport_failures_are_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let flaky = Flaky {
            failures: 1,
            calls: calls.clone(),
        };
        let mut pilot = Pilot::load(Config::default()).with_oracle(flaky);
        let outcome = pilot.decide(&state("H-3"), "S-1").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.decision.action, tp_state::Action::Raise(600));
    }
    #[tokio::test]
    async fn exhausted_retries_fail_soft() {
        let calls = Arc::new(AtomicUsize::new(0));
        let broken = Flaky {
            failures: usize::MAX,
            calls: calls.clone(),
        };
        let mut pilot = Pilot::load(Config::default()).with_oracle(broken);
        let outcome = pilot.decide(&state("H-4"), "S-1").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1 + ADVISORY_RETRIES);
        assert!(matches!(outcome.advice[0], Advice::Failed { .. }));
        assert_eq!(outcome.decision.metadata.fallback, Some(Fallback::NoSignal));
        assert_eq!(outcome.decision.action, tp_state::Action::Fold);
    }
    #[tokio::test]
    async fn budget_pressure_skips_advisory() {
        let dir = tempfile::tempdir().unwrap();
        let state = state("H-5");
        let manifest = Manifest::new(&Expectation::default(), vec![Street::Preflop], "2026-01-01T00:00:00Z");
        Strategies::write_manifest(dir.path(), &manifest).unwrap();
        let record = StrategyRecord {
            version: String::from(CACHE_FORMAT_VERSION),
            fingerprint: Fingerprint::from(&state),
            exploitability: 0.02,
            compute_time_ms: 40,
            actions: vec![Stored {
                action: String::from("raise"),
                amount_bb: Some(9.),
                seat: Some(Position::BB),
                stats: Stats {
                    frequency: 1.,
                    ..Stats::default()
                },
            }],
        };
        Strategies::write_record(dir.path(), Street::Preflop, &record).unwrap();
        let mut config = Config::default();
        config.cache.root = Some(dir.path().to_path_buf());
        config.budget.stages.insert(Stage::Advisory, 50);
        config.budget.buffer_ms = 0;
        config.advisory.min_budget_ms = 1_000;
        let calls = Arc::new(AtomicUsize::new(0));
        let flaky = Flaky {
            failures: 0,
            calls: calls.clone(),
        };
        let mut pilot = Pilot::load(config).with_oracle(flaky);
        let outcome = pilot.decide(&state, "S-1").await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(outcome.advice.is_empty());
        assert_eq!(outcome.decision.metadata.fallback, Some(Fallback::AdvisorySkipped));
        assert_eq!(outcome.decision.metadata.cache_match, Some(Match::Exact));
        assert_eq!(outcome.decision.action, tp_state::Action::Raise(900));
    }
    #[tokio::test]
    async fn buffer_covers_small_shortfall() {
        let mut config = Config::default();
        config.budget.stages.insert(Stage::Advisory, 50);
        let mut pilot = Pilot::load(config).with_oracle(calling());
        let outcome = pilot.decide(&state("H-6"), "S-1").await;
        assert_eq!(outcome.advice.len(), 1);
        assert_eq!(outcome.decision.metadata.fallback, Some(Fallback::CacheMiss));
    }
    #[tokio::test]
    async fn bankroll_breach_forces_fold_and_fires_once() {
        let mut config = Config::default();
        config.risk = Limits {
            bankroll: 1000,
            session: 0,
        };
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let mut pilot = Pilot::load(config).with_oracle(calling());
        pilot.on_panic(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        pilot.settle(-950);
        let first = pilot.decide(&state("H-7"), "S-1").await;
        assert_eq!(first.decision.action, tp_state::Action::Fold);
        assert_eq!(first.decision.verdict.reason, Some(Rejection::Bankroll));
        assert_eq!(pilot.gate().panic().map(|p| p.hand_id.as_str()), Some("H-7"));
        let second = pilot.decide(&state("H-8"), "S-1").await;
        assert_eq!(second.decision.verdict.reason, Some(Rejection::Panic));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        pilot.reset_session();
        let third = pilot.decide(&state("H-9"), "S-1").await;
        assert_eq!(third.decision.action, tp_state::Action::Call(100));
    }
    #[tokio::test]
    async fn records_replay() {
        let mut pilot = Pilot::load(Config::default())
            .with_oracle(calling())
            .with_oracle(Canned::new("other", json!({ "confidence": 0.5, "actions": [{ "action": "RAISE 500", "probability": 1.0 }] })));
        let outcome = pilot.decide(&state("H-10"), "S-2").await;
        let record = HandRecord::from_json(&outcome.record.to_json().unwrap()).unwrap();
        assert!(replay(pilot.engine(), &record).matches);
    }
}
