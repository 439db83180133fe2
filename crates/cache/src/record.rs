use tp_core::*;
use tp_fingerprint::*;
use tp_state::*;

/// Solver statistics attached to one stored action.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Stats {
    pub frequency: Probability,
    #[serde(default)]
    pub ev: Utility,
    #[serde(default)]
    pub regret: Utility,
}

/// One action of a solved spot.
///
/// `amount_bb` is the sizing in big blinds, converted to chips at lookup time
/// against the live blind level. `seat` names the position the solve was run
/// for, which approximate lookup uses to prefer records solved for hero.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Stored {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_bb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat: Option<Position>,
    #[serde(flatten)]
    pub stats: Stats,
}

impl Stored {
    pub fn kind(&self) -> anyhow::Result<Kind> {
        Kind::try_from(self.action.as_str())
    }
    /// Realizes the stored sizing at a blind level.
    pub fn choice(&self, big_blind: Chips) -> anyhow::Result<Choice> {
        let size = self
            .amount_bb
            .map(|bb| (bb * big_blind as f64).round() as Chips);
        Ok(Choice::new(self.kind()?, size))
    }
}

/// A solved strategy for one fingerprint, as stored on disk.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRecord {
    pub version: String,
    pub fingerprint: Fingerprint,
    pub exploitability: Utility,
    #[serde(default, alias = "compute_time_ms")]
    pub compute_time_ms: Millis,
    pub actions: Vec<Stored>,
}

impl StrategyRecord {
    /// Minimal placeholder for a street with no usable records.
    pub fn synthetic(street: Street) -> Self {
        let stored = |action: &str, frequency: Probability| Stored {
            action: action.to_string(),
            amount_bb: None,
            seat: None,
            stats: Stats {
                frequency,
                ..Stats::default()
            },
        };
        Self {
            version: CACHE_FORMAT_VERSION.to_string(),
            fingerprint: Fingerprint::synthetic(street),
            exploitability: SYNTHETIC_EXPLOITABILITY,
            compute_time_ms: 0,
            actions: vec![
                stored("check", 0.4),
                stored("call", 0.3),
                stored("fold", 0.3),
            ],
        }
    }
    /// Structural checks applied to every record read from disk.
    pub fn validate(&self, version: &str) -> anyhow::Result<()> {
        if self.version != version {
            anyhow::bail!("record version {} != {}", self.version, version);
        }
        if self.fingerprint.as_str().is_empty() {
            anyhow::bail!("empty fingerprint");
        }
        if self.actions.is_empty() {
            anyhow::bail!("no actions for {}", self.fingerprint);
        }
        for stored in self.actions.iter() {
            stored.kind()?;
            if !stored.stats.frequency.is_finite() || stored.stats.frequency < 0. {
                anyhow::bail!("bad frequency {} for {}", stored.stats.frequency, stored.action);
            }
        }
        Ok(())
    }
    /// True if any stored action was solved for this position.
    pub fn references(&self, position: Position) -> bool {
        self.actions.iter().any(|a| a.seat == Some(position))
    }
    /// Stored frequencies as a distribution in chips.
    pub fn distribution(&self, big_blind: Chips) -> Distribution {
        self.actions
            .iter()
            .filter_map(|a| a.choice(big_blind).ok().map(|c| (c, a.stats.frequency)))
            .collect()
    }
}
