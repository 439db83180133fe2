use super::*;
use tp_core::*;
use tp_fingerprint::*;
use tp_risk::*;
use tp_state::*;

/// Inputs to one decision.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub state: &'a GameState,
    pub session: &'a str,
    pub cache: Option<&'a CacheSignal>,
    pub opinions: &'a [Opinion],
    /// The advisory stage was skipped rather than attempted.
    pub skipped: bool,
    /// Seed override; derived from hand and session ids when absent.
    pub seed: Option<Seed>,
}

impl<'a> Request<'a> {
    pub fn new(state: &'a GameState, session: &'a str) -> Self {
        Self {
            state,
            session,
            cache: None,
            opinions: &[],
            skipped: false,
            seed: None,
        }
    }
    pub fn cache(self, cache: Option<&'a CacheSignal>) -> Self {
        Self { cache, ..self }
    }
    pub fn opinions(self, opinions: &'a [Opinion]) -> Self {
        Self { opinions, ..self }
    }
    pub fn skipped(self, skipped: bool) -> Self {
        Self { skipped, ..self }
    }
    pub fn seed(self, seed: Option<Seed>) -> Self {
        Self { seed, ..self }
    }
}

/// The final action with its legal context, gate verdict, and metadata.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Decision {
    pub action: Action,
    /// Legal entry the action was realized from.
    pub legal: Option<Legal>,
    pub verdict: Verdict,
    pub metadata: Metadata,
}

/// Seeded, reproducible action selection.
///
/// Cache and advisory signals are projected onto the legal set, blended
/// with weight `alpha` on the cache, and sampled once from a generator
/// seeded by the decision seed. The sample then passes the risk gate; a
/// rejection forces a check (or fold) that does not go back through the gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    blend: Blend,
}

impl Engine {
    pub fn new(blend: Blend) -> Self {
        Self { blend }
    }
    pub fn blend(&self) -> &Blend {
        &self.blend
    }

    pub fn decide(&self, request: Request<'_>, gate: &mut Gate) -> Decision {
        let state = request.state;
        let legal = state.legal();
        let (seed, seed_source) = resolve_seed(state.hand_id(), request.session, request.seed);
        let consensus = self.blend.consensus(request.opinions, legal);
        let synthetic = request.cache.is_some_and(CacheSignal::is_synthetic);
        let cached = request
            .cache
            .filter(|_| !(synthetic && consensus.is_some()))
            .and_then(|c| Projection::project(&c.distribution, legal));
        let divergence = match (&cached, &consensus) {
            (Some(c), Some(a)) => Some(c.divergence(a)),
            _ => None,
        };
        let (blended, alpha, fallback) = match (&cached, &consensus) {
            (Some(c), Some(a)) => (
                Projection::mix([(self.blend.alpha, c), (1. - self.blend.alpha, a)]),
                self.blend.alpha,
                None,
            ),
            (Some(c), None) => (
                Some(c.clone()),
                1.,
                Some(match (synthetic, request.skipped) {
                    (true, _) => Fallback::ColdStart,
                    (false, true) => Fallback::AdvisorySkipped,
                    (false, false) => Fallback::AdvisoryUnavailable,
                }),
            ),
            (None, Some(a)) => (Some(a.clone()), 0., Some(Fallback::CacheMiss)),
            (None, None) => (None, 0., Some(Fallback::NoSignal)),
        };
        let (index, sampled) = blended
            .as_ref()
            .and_then(|b| b.sample(seed))
            .map(|(i, action)| (Some(i), action))
            .unwrap_or_else(|| Self::safe(legal));
        let verdict = gate.check(&sampled, state, None);
        let (index, action, forced) = match verdict.reason {
            None => (index, sampled, None),
            Some(reason) => {
                let (index, action) = Self::safe(legal);
                log::warn!("{:<32}{:<32}", format!("risk rejected {}", sampled), format!("forcing {}", action));
                (index, action, Some(Forced::Risk(reason)))
            }
        };
        let flagged = divergence.is_some_and(|d| d > self.blend.divergence_threshold);
        if flagged {
            log::info!(
                "{:<32}{:<32}",
                format!("divergence flagged {}", state.hand_id()),
                format!("{:.3}", divergence.unwrap_or_default())
            );
        }
        let metadata = Metadata {
            hand_id: state.hand_id().to_string(),
            session_id: request.session.to_string(),
            seed,
            seed_source,
            fingerprint: Fingerprint::from(state),
            cache_match: request.cache.map(|c| c.kind),
            alpha,
            sampled,
            action,
            cache_confidence: request.cache.map(|c| c.confidence),
            advisors: request
                .opinions
                .iter()
                .map(|o| Advisor {
                    model: o.model.clone(),
                    confidence: o.confidence,
                })
                .collect(),
            divergence,
            divergence_flagged: flagged,
            versions: Versions {
                cache: request.cache.and_then(|c| c.version.clone()),
                advisory: request.opinions.iter().map(|o| o.model.clone()).collect(),
                perception: state.perception_model().map(str::to_string),
            },
            fallback,
            forced,
        };
        log::debug!("{:<32}{:<32}", format!("decided {}", state.hand_id()), action);
        Decision {
            action,
            legal: index.and_then(|i| legal.get(i)).copied(),
            verdict,
            metadata,
        }
    }

    /// Check if legal, else fold, else the first legal entry at its minimum.
    fn safe(legal: &[Legal]) -> (Option<usize>, Action) {
        let find = |kind: Kind| legal.iter().position(|l| l.kind() == kind);
        match (find(Kind::Check), find(Kind::Fold)) {
            (Some(i), _) => (Some(i), Action::Check),
            (None, Some(i)) => (Some(i), Action::Fold),
            (None, None) => match legal.first() {
                Some(l) => (Some(0), l.realize(None)),
                None => (None, Action::Fold),
            },
        }
    }
}
