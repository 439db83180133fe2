use tp_core::Chips;

/// Session stop limits. Zero disables a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest tolerated cumulative loss, including live exposure.
    pub bankroll: Chips,
    /// Hands allowed before the session stops.
    pub session: usize,
}

impl Limits {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bankroll < 0 {
            anyhow::bail!("bankroll limit must be non-negative, got {}", self.bankroll);
        }
        Ok(())
    }
}
