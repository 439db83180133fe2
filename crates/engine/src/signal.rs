use tp_cache::*;
use tp_core::*;
use tp_fingerprint::*;
use tp_state::*;

/// Owned copy of a cache hit, detached from the index so hand records can
/// carry it for replay.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct CacheSignal {
    pub fingerprint: Fingerprint,
    pub kind: Match,
    pub confidence: Probability,
    pub distribution: Distribution,
    /// Manifest version of the cache the hit came from.
    pub version: Option<String>,
}

impl CacheSignal {
    /// Resolves a lookup against the live blind level.
    pub fn from_hit(hit: &Hit<'_>, state: &GameState, version: Option<&str>) -> Self {
        Self {
            fingerprint: hit.entry.fingerprint().clone(),
            kind: hit.kind,
            confidence: hit.entry.confidence(),
            distribution: hit.entry.distribution(state.big_blind()),
            version: version.map(str::to_string),
        }
    }
    /// Looks a state up in the index and detaches the result.
    pub fn lookup(strategies: &Strategies, state: &GameState) -> Option<Self> {
        strategies
            .lookup(state)
            .map(|hit| Self::from_hit(&hit, state, strategies.version()))
    }
    pub fn is_synthetic(&self) -> bool {
        self.kind == Match::Synthetic
    }
}
