use super::*;
use std::collections::BTreeMap;
use tp_core::*;
use tp_state::*;

/// How advisory opinions combine into one consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consensus {
    /// Confidence-weighted mean of the opinions' distributions.
    #[default]
    Average,
    /// Each opinion casts its confidence on its own favorite action.
    Vote,
}

/// Blend parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Blend {
    /// Weight of the cached strategy; advisory consensus gets `1 - alpha`.
    pub alpha: Probability,
    pub divergence_threshold: Probability,
    pub consensus: Consensus,
}

impl Default for Blend {
    fn default() -> Self {
        Self {
            alpha: BLEND_ALPHA,
            divergence_threshold: DIVERGENCE_THRESHOLD,
            consensus: Consensus::default(),
        }
    }
}

impl Blend {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0. ..=1.).contains(&self.alpha) {
            anyhow::bail!("blend alpha must be in [0, 1], got {}", self.alpha);
        }
        if !(0. ..=1.).contains(&self.divergence_threshold) {
            anyhow::bail!("divergence threshold must be in [0, 1], got {}", self.divergence_threshold);
        }
        Ok(())
    }
    /// Combines opinions that project onto the legal set. Opinions with no
    /// confidence or no legal mass carry no weight; `None` if none remain.
    pub fn consensus(&self, opinions: &[Opinion], legal: &[Legal]) -> Option<Projection> {
        let projected = opinions
            .iter()
            .filter(|o| o.confidence.is_finite() && o.confidence > 0.)
            .filter_map(|o| Projection::project(&o.distribution, legal).map(|p| (o.confidence, p)))
            .collect::<Vec<_>>();
        match self.consensus {
            Consensus::Average => Projection::mix(projected.iter().map(|(c, p)| (*c, p))),
            Consensus::Vote => {
                let mut votes = BTreeMap::<Slot, Probability>::new();
                for (confidence, projection) in projected.iter() {
                    if let Some(slot) = projection.argmax() {
                        *votes.entry(slot).or_insert(0.) += confidence;
                    }
                }
                let ballots = votes
                    .into_iter()
                    .map(|(slot, weight)| (weight, Projection::point(slot)))
                    .collect::<Vec<_>>();
                Projection::mix(ballots.iter().map(|(w, p)| (*w, p)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legal() -> Vec<Legal> {
        vec![Legal::fold(), Legal::call(200), Legal::raise(600, 5000)]
    }
    fn opinion(model: &str, confidence: Probability, entries: &[(&str, Probability)]) -> Opinion {
        Opinion::new(
            model,
            confidence,
            entries
                .iter()
                .map(|(c, p)| (Choice::try_from(*c).unwrap(), *p))
                .collect(),
        )
    }

    #[test]
    fn average_weights_by_confidence() {
        let opinions = [
            opinion("a", 0.75, &[("CALL", 1.)]),
            opinion("b", 0.25, &[("FOLD", 1.)]),
        ];
        let consensus = Blend::default().consensus(&opinions, &legal()).unwrap();
        assert!((consensus.weight(Kind::Call) - 0.75).abs() < 1e-12);
    }
    #[test]
    fn vote_counts_favorites() {
        let blend = Blend {
            consensus: Consensus::Vote,
            ..Blend::default()
        };
        let opinions = [
            opinion("a", 0.5, &[("CALL", 0.6), ("FOLD", 0.4)]),
            opinion("b", 0.3, &[("CALL", 0.7), ("RAISE 900", 0.3)]),
            opinion("c", 0.2, &[("FOLD", 1.)]),
        ];
        let consensus = blend.consensus(&opinions, &legal()).unwrap();
        assert!((consensus.weight(Kind::Call) - 0.8).abs() < 1e-12);
        assert!((consensus.weight(Kind::Raise)).abs() < 1e-12);
    }
    #[test]
    fn unusable_opinions_are_ignored() {
        let opinions = [
            opinion("zero", 0., &[("CALL", 1.)]),
            opinion("illegal", 0.9, &[("CHECK", 1.)]),
        ];
        assert!(Blend::default().consensus(&opinions, &legal()).is_none());
    }
    #[test]
    fn validates_alpha() {
        assert!(Blend::default().validate().is_ok());
        let blend = Blend {
            alpha: 1.5,
            ..Blend::default()
        };
        assert!(blend.validate().is_err());
    }
}
