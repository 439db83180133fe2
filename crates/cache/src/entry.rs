use super::*;
use tp_core::*;
use tp_fingerprint::*;
use tp_state::*;

/// A loaded record and the street it was filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    record: StrategyRecord,
    street: Street,
}

impl Entry {
    pub fn new(record: StrategyRecord, street: Street) -> Self {
        Self { record, street }
    }
    pub fn synthetic(street: Street) -> Self {
        Self::new(StrategyRecord::synthetic(street), street)
    }
    pub fn record(&self) -> &StrategyRecord {
        &self.record
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.record.fingerprint
    }
    pub fn is_synthetic(&self) -> bool {
        self.record.fingerprint.is_synthetic()
    }
    pub fn exploitability(&self) -> Utility {
        self.record.exploitability
    }
    /// Trust in this entry, `1 - exploitability` clamped to `[0, 1]`.
    pub fn confidence(&self) -> Probability {
        (1. - self.record.exploitability).clamp(0., 1.)
    }
    pub fn distribution(&self, big_blind: Chips) -> Distribution {
        self.record.distribution(big_blind)
    }
}

/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Match {
    Exact,
    Approximate,
    Synthetic,
}

/// A successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub entry: &'a Entry,
    pub kind: Match,
}

impl Hit<'_> {
    pub fn is_synthetic(&self) -> bool {
        self.kind == Match::Synthetic
    }
}
