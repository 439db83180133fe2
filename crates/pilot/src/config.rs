use anyhow::Context;
use std::path::Path;
use std::path::PathBuf;
use tp_budget::Settings;
use tp_cache::Expectation;
use tp_core::*;
use tp_engine::Blend;
use tp_risk::Limits;

/// Where the strategy cache lives and what it must declare.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Cache {
    /// Cache root; no cache is loaded when absent.
    pub root: Option<PathBuf>,
    #[serde(flatten)]
    pub expected: Expectation,
}

/// Advisory query limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Advisory {
    /// Ceiling on any single query, whatever the stage allocation.
    pub hard_timeout_ms: Millis,
    /// Below this remaining allocation the advisory stage is skipped.
    pub min_budget_ms: Millis,
    /// Extra attempts after a transport failure.
    pub retries: usize,
    /// Upper bound of the seeded backoff between attempts.
    pub jitter_ms: Millis,
}

impl Default for Advisory {
    fn default() -> Self {
        Self {
            hard_timeout_ms: ADVISORY_HARD_TIMEOUT_MS,
            min_budget_ms: ADVISORY_MIN_BUDGET_MS,
            retries: ADVISORY_RETRIES,
            jitter_ms: ADVISORY_JITTER_MS,
        }
    }
}

/// Everything a [`crate::Pilot`] needs, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub budget: Settings,
    pub blend: Blend,
    pub risk: Limits,
    /// Replaces the derived seed of every decision.
    pub seed: Option<Seed>,
    pub session: Option<String>,
    pub cache: Cache,
    pub advisory: Advisory,
}

impl Config {
    /// Reads a JSON config file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parse config {}", path.display()))
    }
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str::<Self>(json)?)
    }
    /// Applies `PILOT_CACHE_ROOT`, `PILOT_SEED`, and `PILOT_SESSION`.
    pub fn with_env(self) -> anyhow::Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }
    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(root) = var("PILOT_CACHE_ROOT") {
            self.cache.root = Some(PathBuf::from(root));
        }
        if let Some(seed) = var("PILOT_SEED") {
            self.seed = Some(seed.trim().parse::<Seed>().with_context(|| format!("PILOT_SEED {:?}", seed))?);
        }
        if let Some(session) = var("PILOT_SESSION") {
            self.session = Some(session);
        }
        Ok(self)
    }
    pub fn validate(&self) -> anyhow::Result<()> {
        self.budget.validate().context("budget")?;
        self.blend.validate().context("blend")?;
        self.risk.validate().context("risk")?;
        if self.advisory.hard_timeout_ms == 0 {
            anyhow::bail!("advisory hard timeout must be positive");
        }
        if self.session.as_deref().is_some_and(|s| s.trim().is_empty()) {
            anyhow::bail!("session id must not be blank");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.budget.total_ms, BUDGET_TOTAL_MS);
        assert_eq!(config.blend.alpha, BLEND_ALPHA);
        assert_eq!(config.cache.expected.algorithm, FINGERPRINT_ALGORITHM);
    }
    #[test]
    fn partial_json_fills_defaults() {
        let config = Config::from_json(
            r#"{ "blend": { "alpha": 0.25 }, "risk": { "bankroll": 5000 }, "cache": { "root": "/var/cache/tp" } }"#,
        )
        .unwrap();
        assert_eq!(config.blend.alpha, 0.25);
        assert_eq!(config.blend.divergence_threshold, DIVERGENCE_THRESHOLD);
        assert_eq!(config.risk.bankroll, 5000);
        assert_eq!(config.risk.session, 0);
        assert_eq!(config.cache.root, Some(PathBuf::from("/var/cache/tp")));
        assert_eq!(config.cache.expected.compression, CACHE_COMPRESSION);
        assert_eq!(config.advisory.retries, ADVISORY_RETRIES);
    }
    #[test]
    fn environment_overrides() {
        let vars = |key: &str| match key {
            "PILOT_CACHE_ROOT" => Some(String::from("/tmp/strategies")),
            "PILOT_SEED" => Some(String::from("42")),
            "PILOT_SESSION" => Some(String::from("S-7")),
            _ => None,
        };
        let config = Config::default().with_vars(vars).unwrap();
        assert_eq!(config.cache.root, Some(PathBuf::from("/tmp/strategies")));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.session.as_deref(), Some("S-7"));
        let bad = |key: &str| (key == "PILOT_SEED").then(|| String::from("lucky"));
        assert!(Config::default().with_vars(bad).is_err());
    }
    #[test]
    fn rejects_malformed_config() {
        let mut config = Config::default();
        config.blend.alpha = -0.1;
        assert!(config.validate().is_err());
        let mut config = Config::default();
        config.budget.buffer_ms = BUDGET_TOTAL_MS;
        assert!(config.validate().is_err());
        let mut config = Config::default();
        config.risk.bankroll = -1;
        assert!(config.validate().is_err());
    }
}
