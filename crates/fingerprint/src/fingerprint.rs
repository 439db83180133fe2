use super::*;
use tp_core::*;
use tp_state::*;

/// Versioned cache key, `"<version>:<hash>"`.
///
/// Computed as a pure function of a [`GameState`]: the state is reduced to
/// its bucketed [`Features`], serialized in a fixed field order, hashed with
/// 64-bit FNV-1a, and prefixed with [`FINGERPRINT_VERSION`]. Changing any
/// bucket width or the hash means bumping the version, so stale cache keys
/// miss instead of colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Key of the placeholder entry seeded into an empty street.
    /// Never equal to a computed fingerprint.
    pub fn synthetic(street: Street) -> Self {
        Self(format!("{}:{}", SYNTHETIC_PREFIX, street.label()))
    }
    pub fn is_synthetic(&self) -> bool {
        self.version() == SYNTHETIC_PREFIX
    }
    /// Everything before the first `:`.
    pub fn version(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Features> for Fingerprint {
    fn from(features: &Features) -> Self {
        Self(format!(
            "{}:{}",
            FINGERPRINT_VERSION,
            stable_hex(&features.canonical())
        ))
    }
}

impl From<&GameState> for Fingerprint {
    fn from(state: &GameState) -> Self {
        Self::from(&Features::from(state))
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonicalizes a snapshot into its cache key. Total: never fails.
pub fn compute(state: &GameState) -> Fingerprint {
    Fingerprint::from(state)
}
