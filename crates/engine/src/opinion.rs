use tp_core::*;
use tp_state::*;

/// A validated advisory opinion.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Opinion {
    pub model: String,
    pub confidence: Probability,
    pub distribution: Distribution,
}

impl Opinion {
    pub fn new(model: impl Into<String>, confidence: Probability, distribution: Distribution) -> Self {
        Self {
            model: model.into(),
            confidence,
            distribution,
        }
    }
}

impl std::fmt::Display for Opinion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} @{:.2} {}", self.model, self.confidence, self.distribution)
    }
}
