use super::choice::Choice;
use super::kind::Kind;
use tp_core::Probability;

/// Weighted action preferences from one source, in source order.
///
/// Weights need not sum to one on construction; [`Distribution::normalized`]
/// rescales them. Order matters: it is preserved through projection onto the
/// legal set, which keeps sampling reproducible.
#[derive(Debug, Clone, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Distribution(Vec<(Choice, Probability)>);

impl Distribution {
    pub fn iter(&self) -> impl Iterator<Item = &(Choice, Probability)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Total weight over valid entries.
    pub fn mass(&self) -> Probability {
        self.0.iter().map(|(_, p)| p).filter(|p| valid(**p)).sum()
    }
    /// Drops non-finite and non-positive weights and rescales the rest to
    /// sum to one. `None` if no mass survives.
    pub fn normalized(&self) -> Option<Self> {
        let mass = self.mass();
        match mass > 0. {
            false => None,
            true => Some(Self(
                self.0
                    .iter()
                    .filter(|(_, p)| valid(*p) && *p > 0.)
                    .map(|(c, p)| (*c, p / mass))
                    .collect(),
            )),
        }
    }
    /// Total weight on a kind.
    pub fn weight(&self, kind: Kind) -> Probability {
        self.0
            .iter()
            .filter(|(c, p)| c.kind() == kind && valid(*p))
            .map(|(_, p)| p)
            .sum()
    }
    /// Heaviest entry, first wins ties.
    pub fn argmax(&self) -> Option<Choice> {
        self.0
            .iter()
            .filter(|(_, p)| valid(*p))
            .fold(None, |best: Option<(Choice, Probability)>, (c, p)| match best {
                Some((_, q)) if q >= *p => best,
                _ => Some((*c, *p)),
            })
            .map(|(c, _)| c)
    }
}

fn valid(p: Probability) -> bool {
    p.is_finite() && p >= 0.
}

impl FromIterator<(Choice, Probability)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (Choice, Probability)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<(Choice, Probability)>> for Distribution {
    fn from(weights: Vec<(Choice, Probability)>) -> Self {
        Self(weights)
    }
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let entries = self
            .0
            .iter()
            .map(|(c, p)| format!("{} {:.3}", c, p))
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", entries.join(", "))
    }
}
