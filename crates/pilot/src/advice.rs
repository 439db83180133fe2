use anyhow::Context;
use tp_core::*;
use tp_engine::Opinion;
use tp_state::*;

/// Outcome of one advisory query, validated at the boundary.
///
/// Only [`Advice::Opinion`] ever reaches the blend; every other variant is
/// kept for logging and the hand record's advisor list.
#[derive(Debug, Clone, PartialEq)]
pub enum Advice {
    Opinion(Opinion),
    /// The service answered with something unusable.
    Rejected { model: String, detail: String },
    /// No answer inside the advisory deadline.
    Timeout { model: String },
    /// Transport failure after all retries.
    Failed { model: String, detail: String },
}

#[derive(Debug, serde::Deserialize)]
struct Payload {
    confidence: Probability,
    actions: Vec<Weighted>,
}

#[derive(Debug, serde::Deserialize)]
struct Weighted {
    action: String,
    #[serde(alias = "frequency", alias = "weight")]
    probability: Probability,
}

impl Advice {
    /// Validates a raw advisory payload of the form
    /// `{"confidence": 0.8, "actions": [{"action": "CALL", "probability": 1.0}]}`.
    pub fn validate(model: &str, payload: &serde_json::Value) -> Self {
        match Self::parse(payload) {
            Ok((confidence, distribution)) => Self::Opinion(Opinion::new(model, confidence, distribution)),
            Err(e) => {
                log::warn!("{:<32}{:<32}", format!("advisory {} rejected", model), format!("{:#}", e));
                Self::Rejected {
                    model: model.to_string(),
                    detail: format!("{:#}", e),
                }
            }
        }
    }
    fn parse(payload: &serde_json::Value) -> anyhow::Result<(Probability, Distribution)> {
        let payload = serde_json::from_value::<Payload>(payload.clone()).context("malformed advisory payload")?;
        if !payload.confidence.is_finite() || !(0. ..=1.).contains(&payload.confidence) {
            anyhow::bail!("confidence {} outside [0, 1]", payload.confidence);
        }
        if payload.actions.is_empty() {
            anyhow::bail!("no actions");
        }
        let weighted = payload
            .actions
            .iter()
            .map(|w| {
                let choice = Choice::try_from(w.action.as_str()).with_context(|| format!("action {:?}", w.action))?;
                match w.probability.is_finite() && w.probability >= 0. {
                    true => Ok((choice, w.probability)),
                    false => Err(anyhow::anyhow!("probability {} of {} is invalid", w.probability, w.action)),
                }
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let distribution = Distribution::from(weighted)
            .normalized()
            .ok_or_else(|| anyhow::anyhow!("probabilities carry no mass"))?;
        Ok((payload.confidence, distribution))
    }
    pub fn model(&self) -> &str {
        match self {
            Self::Opinion(opinion) => &opinion.model,
            Self::Rejected { model, .. } | Self::Timeout { model } | Self::Failed { model, .. } => model,
        }
    }
    pub fn opinion(&self) -> Option<&Opinion> {
        match self {
            Self::Opinion(opinion) => Some(opinion),
            _ => None,
        }
    }
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Opinion(opinion) => write!(f, "{}", opinion),
            Self::Rejected { model, detail } => write!(f, "{} rejected: {}", model, detail),
            Self::Timeout { model } => write!(f, "{} timed out", model),
            Self::Failed { model, detail } => write!(f, "{} failed: {}", model, detail),
        }
    }
}
