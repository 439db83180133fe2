use tp_core::*;
use tp_state::*;

/// Header of an on-disk strategy cache, read from `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Manifest {
    pub version: String,
    pub fingerprint_algorithm: String,
    pub compression: String,
    pub supported_streets: Vec<Street>,
    #[serde(default)]
    pub created_at: String,
}

impl Manifest {
    /// A manifest matching the given expectation, for writers.
    pub fn new(expected: &Expectation, streets: Vec<Street>, created_at: &str) -> Self {
        Self {
            version: expected.version.clone(),
            fingerprint_algorithm: expected.algorithm.clone(),
            compression: expected.compression.clone(),
            supported_streets: streets,
            created_at: created_at.to_string(),
        }
    }
    pub fn supports(&self, street: Street) -> bool {
        self.supported_streets.contains(&street)
    }
    /// Checks the identifying fields against what this build can read.
    pub fn validate(&self, expected: &Expectation) -> Result<(), Mismatch> {
        if self.version != expected.version {
            return Err(Mismatch::Version {
                expected: expected.version.clone(),
                found: self.version.clone(),
            });
        }
        if self.fingerprint_algorithm != expected.algorithm {
            return Err(Mismatch::Algorithm {
                expected: expected.algorithm.clone(),
                found: self.fingerprint_algorithm.clone(),
            });
        }
        if self.compression != expected.compression {
            return Err(Mismatch::Compression {
                expected: expected.compression.clone(),
                found: self.compression.clone(),
            });
        }
        Ok(())
    }
}

/// Manifest fields a reader requires.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Expectation {
    pub version: String,
    pub algorithm: String,
    pub compression: String,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            version: CACHE_FORMAT_VERSION.to_string(),
            algorithm: FINGERPRINT_ALGORITHM.to_string(),
            compression: CACHE_COMPRESSION.to_string(),
        }
    }
}

/// Why a manifest was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Version { expected: String, found: String },
    Algorithm { expected: String, found: String },
    Compression { expected: String, found: String },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Version { expected, found } => {
                write!(f, "version {} != {}", found, expected)
            }
            Self::Algorithm { expected, found } => {
                write!(f, "fingerprint algorithm {} != {}", found, expected)
            }
            Self::Compression { expected, found } => {
                write!(f, "compression {} != {}", found, expected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_manifest() {
        let expected = Expectation::default();
        let manifest = Manifest::new(&expected, vec![Street::Preflop, Street::Flop], "now");
        assert!(manifest.validate(&expected).is_ok());
        assert!(manifest.supports(Street::Flop));
        assert!(!manifest.supports(Street::Turn));
    }
    #[test]
    fn names_the_mismatched_field() {
        let expected = Expectation::default();
        let mut manifest = Manifest::new(&expected, vec![Street::Preflop], "now");
        manifest.fingerprint_algorithm = String::from("md5-v0");
        assert!(matches!(
            manifest.validate(&expected),
            Err(Mismatch::Algorithm { .. })
        ));
        manifest.compression = String::from("gzip");
        manifest.version = String::from("2");
        assert!(matches!(
            manifest.validate(&expected),
            Err(Mismatch::Version { .. })
        ));
    }
    #[test]
    fn parses_disk_format() {
        let json = r#"{
            "version": "1",
            "fingerprint_algorithm": "fnv1a64-v1",
            "compression": "zstd",
            "supported_streets": ["preflop", "flop"],
            "created_at": "2026-01-01T00:00:00Z"
        }"#;
        let manifest = serde_json::from_str::<Manifest>(json).unwrap();
        assert_eq!(manifest.supported_streets, vec![Street::Preflop, Street::Flop]);
        assert!(manifest.validate(&Expectation::default()).is_ok());
    }
}
