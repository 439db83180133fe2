use super::*;
use tp_cache::Match;
use tp_core::*;
use tp_fingerprint::*;
use tp_risk::Rejection;
use tp_state::*;

/// Why the blend ran on fewer than both signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// No usable cache entry; advisory consensus alone.
    CacheMiss,
    /// Only the synthetic placeholder was available.
    ColdStart,
    /// Advisory opinions all failed, timed out, or projected to nothing.
    AdvisoryUnavailable,
    /// The advisory stage was skipped under budget pressure.
    AdvisorySkipped,
    /// Neither source produced legal mass; a safe action was taken.
    NoSignal,
}

/// Why the sampled action was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Forced {
    Risk(Rejection),
}

/// Per-advisor confidence as received.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Advisor {
    pub model: String,
    pub confidence: Probability,
}

/// Component versions that shaped the decision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Versions {
    pub cache: Option<String>,
    pub advisory: Vec<String>,
    pub perception: Option<String>,
}

/// Everything needed to audit and replay one decision.
///
/// Populated on every path, fallback and forced ones included.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Metadata {
    pub hand_id: String,
    pub session_id: String,
    pub seed: Seed,
    pub seed_source: SeedSource,
    /// Fingerprint of the live state, whether or not the cache matched it.
    pub fingerprint: Fingerprint,
    pub cache_match: Option<Match>,
    /// Effective cache weight: the configured alpha when both signals
    /// blended, `1` for cache only, `0` for advisory only.
    pub alpha: Probability,
    /// Action drawn from the blend, before the risk gate.
    pub sampled: Action,
    /// Action returned to execution.
    pub action: Action,
    pub cache_confidence: Option<Probability>,
    pub advisors: Vec<Advisor>,
    pub divergence: Option<Probability>,
    pub divergence_flagged: bool,
    pub versions: Versions,
    pub fallback: Option<Fallback>,
    pub forced: Option<Forced>,
}

impl Metadata {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
