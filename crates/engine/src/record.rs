use super::*;
use tp_core::*;
use tp_risk::*;
use tp_state::*;

/// Everything one decision consumed and produced, as persisted for audit.
///
/// Holds the detached inputs (snapshot, cache signal, validated opinions)
/// so the decision can be recomputed without the cache index or advisors.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HandRecord {
    pub state: GameState,
    pub session: String,
    pub cache: Option<CacheSignal>,
    #[serde(default)]
    pub opinions: Vec<Opinion>,
    #[serde(default)]
    pub skipped: bool,
    pub metadata: Metadata,
}

impl HandRecord {
    pub fn new(request: Request<'_>, metadata: Metadata) -> Self {
        Self {
            state: request.state.clone(),
            session: request.session.to_string(),
            cache: request.cache.cloned(),
            opinions: request.opinions.to_vec(),
            skipped: request.skipped,
            metadata,
        }
    }
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let record = serde_json::from_str::<Self>(json)?;
        record.state.validate()?;
        Ok(record)
    }
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
    /// The request that reproduces this record under its recorded seed.
    pub fn request(&self) -> Request<'_> {
        Request::new(&self.state, &self.session)
            .cache(self.cache.as_ref())
            .opinions(&self.opinions)
            .skipped(self.skipped)
            .seed(Some(self.metadata.seed))
    }
}

/// Outcome of recomputing a recorded decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub seed: Seed,
    pub expected: Action,
    pub actual: Action,
    /// Whether the recorded final action was also compared. Risk-forced
    /// records depend on gate history that a replay does not have.
    pub compared_final: bool,
    pub matches: bool,
}

impl std::fmt::Display for Replay {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.matches {
            true => write!(f, "match {} seed {}", self.actual, self.seed),
            false => write!(f, "MISMATCH expected {} got {} seed {}", self.expected, self.actual, self.seed),
        }
    }
}

/// Recomputes a recorded decision with its recorded seed against a
/// permissive gate, comparing the pre-gate sample and, for decisions the
/// gate did not force, the final action.
pub fn replay(engine: &Engine, record: &HandRecord) -> Replay {
    let decision = engine.decide(record.request(), &mut Gate::default());
    let compared_final = record.metadata.forced.is_none();
    let matches = decision.metadata.seed == record.metadata.seed
        && decision.metadata.sampled == record.metadata.sampled
        && (!compared_final || decision.action == record.metadata.action);
    match matches {
        true => log::debug!("{:<32}{:<32}", format!("replayed {}", record.state.hand_id()), decision.action),
        false => log::warn!(
            "{:<32}{:<32}",
            format!("replay diverged {}", record.state.hand_id()),
            format!("{} != {}", decision.metadata.sampled, record.metadata.sampled)
        ),
    }
    Replay {
        seed: decision.metadata.seed,
        expected: record.metadata.sampled,
        actual: decision.metadata.sampled,
        compared_final,
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::from_json(
            &serde_json::json!({
                "hand_id": "H-42",
                "game": "nlhe-6max",
                "blinds": { "small": 50, "big": 100 },
                "roles": { "hero": "CO", "button": "BTN", "small_blind": "SB", "big_blind": "BB" },
                "seats": { "CO": { "stack": 8000, "hole": ["Ts", "9s"] }, "BB": { "stack": 12000 } },
                "board": ["Ah", "7d", "2c"],
                "pot": 500,
                "street": "flop",
                "legal": [
                    { "kind": "check" },
                    { "kind": "bet", "min": 100, "max": 8000 }
                ]
            })
            .to_string(),
        )
        .unwrap()
    }
    fn dist(entries: &[(&str, Probability)]) -> Distribution {
        entries
            .iter()
            .map(|(c, p)| (Choice::try_from(*c).unwrap(), *p))
            .collect()
    }

    #[test]
    fn record_replays_through_json() {
        let state = state();
        let opinions = [
            Opinion::new("a", 0.7, dist(&[("CHECK", 0.5), ("BET 300", 0.5)])),
            Opinion::new("b", 0.5, dist(&[("BET 250", 1.)])),
        ];
        let engine = Engine::default();
        let request = Request::new(&state, "S-3").opinions(&opinions);
        let decision = engine.decide(request, &mut Gate::default());
        let record = HandRecord::new(request, decision.metadata);
        let record = HandRecord::from_json(&record.to_json().unwrap()).unwrap();
        let replayed = replay(&engine, &record);
        assert!(replayed.matches);
        assert!(replayed.compared_final);
        assert_eq!(replayed.seed, stable_hash("H-42:S-3"));
    }
    #[test]
    fn tampered_record_mismatches() {
        let state = state();
        let opinions = [Opinion::new("a", 1., dist(&[("BET 300", 1.)]))];
        let engine = Engine::default();
        let request = Request::new(&state, "S-3").opinions(&opinions);
        let decision = engine.decide(request, &mut Gate::default());
        let mut record = HandRecord::new(request, decision.metadata);
        record.metadata.sampled = Action::Check;
        assert!(!replay(&engine, &record).matches);
    }
    #[test]
    fn forced_records_compare_samples_only() {
        let state = state();
        let opinions = [Opinion::new("a", 1., dist(&[("BET 5000", 1.)]))];
        let engine = Engine::default();
        let request = Request::new(&state, "S-3").opinions(&opinions);
        let mut gate = Gate::new(Limits {
            bankroll: 1000,
            session: 0,
        });
        let decision = engine.decide(request, &mut gate);
        assert_eq!(decision.action, Action::Check);
        let record = HandRecord::new(request, decision.metadata);
        let replayed = replay(&engine, &record);
        assert!(!replayed.compared_final);
        assert!(replayed.matches);
        assert_eq!(replayed.actual, Action::Bet(5000));
    }
}
