use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tp_core::*;
use tp_state::*;

/// A legal entry index together with the concrete action realized from it.
pub type Slot = (usize, Action);

/// A distribution restricted to the legal action set.
///
/// Every support point is a legal entry index plus a concrete, in-bounds
/// action, so anything sampled from a projection is executable as is.
/// Slots iterate in legal-index order, which fixes the cumulative walk
/// used by [`Projection::sample`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection(BTreeMap<Slot, Probability>);

impl Projection {
    /// Maps each choice onto the legal set and renormalizes. Mass on choices
    /// with no legal counterpart is dropped. `None` if nothing survives.
    pub fn project(distribution: &Distribution, legal: &[Legal]) -> Option<Self> {
        let mut weights = BTreeMap::new();
        for (choice, p) in distribution.normalized()?.iter() {
            if let Some(slot) = Self::resolve(choice, legal) {
                *weights.entry(slot).or_insert(0.) += p;
            }
        }
        Self(weights).normalized()
    }
    /// Finds the legal entry for a choice.
    ///
    /// Kinds match directly or through the bet/raise alias; among several
    /// candidates the one whose bounds are nearest the requested size wins,
    /// first listed on ties. A shove with no shove entry becomes the largest
    /// sized entry at its maximum, and a call with nothing to call becomes a
    /// check.
    pub fn resolve(choice: &Choice, legal: &[Legal]) -> Option<Slot> {
        let direct = legal
            .iter()
            .enumerate()
            .filter(|(_, l)| l.accepts(choice.kind()))
            .min_by_key(|(_, l)| choice.size().map_or(0, |size| l.gap(size)))
            .map(|(i, l)| (i, l.realize(choice.size())));
        direct.or_else(|| match choice.kind() {
            Kind::Shove => legal
                .iter()
                .enumerate()
                .filter(|(_, l)| l.kind().is_sized())
                .fold(None, |best: Option<(usize, &Legal)>, (i, l)| match best {
                    Some((_, b)) if b.max() >= l.max() => best,
                    _ => Some((i, l)),
                })
                .map(|(i, l)| (i, l.realize(Some(l.max())))),
            Kind::Call => legal
                .iter()
                .position(|l| l.kind() == Kind::Check)
                .map(|i| (i, Action::Check)),
            _ => None,
        })
    }
    /// Weighted sum of projections, renormalized. Non-positive weights are
    /// skipped.
    pub fn mix<'a>(terms: impl IntoIterator<Item = (Probability, &'a Projection)>) -> Option<Self> {
        let mut weights = BTreeMap::new();
        for (w, projection) in terms.into_iter().filter(|(w, _)| *w > 0.) {
            for (slot, p) in projection.0.iter() {
                *weights.entry(*slot).or_insert(0.) += w * p;
            }
        }
        Self(weights).normalized()
    }
    /// All mass on one slot.
    pub fn point(slot: Slot) -> Self {
        Self(BTreeMap::from([(slot, 1.)]))
    }
    fn normalized(self) -> Option<Self> {
        let mass = self.0.values().filter(|p| p.is_finite()).sum::<Probability>();
        match mass > 0. {
            false => None,
            true => Some(Self(
                self.0
                    .into_iter()
                    .filter(|(_, p)| p.is_finite() && *p > 0.)
                    .map(|(slot, p)| (slot, p / mass))
                    .collect(),
            )),
        }
    }
}

impl Projection {
    pub fn iter(&self) -> impl Iterator<Item = (&Slot, &Probability)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Total probability per legal entry, ignoring sizes.
    pub fn marginal(&self) -> BTreeMap<usize, Probability> {
        let mut marginal = BTreeMap::new();
        for ((i, _), p) in self.0.iter() {
            *marginal.entry(*i).or_insert(0.) += p;
        }
        marginal
    }
    /// Total probability on actions of a kind.
    pub fn weight(&self, kind: Kind) -> Probability {
        self.0
            .iter()
            .filter(|((_, action), _)| action.kind() == kind)
            .map(|(_, p)| p)
            .sum()
    }
    /// Heaviest slot, lowest slot on ties.
    pub fn argmax(&self) -> Option<Slot> {
        self.0
            .iter()
            .fold(None, |best: Option<(Slot, Probability)>, (slot, p)| match best {
                Some((_, q)) if q >= *p => best,
                _ => Some((*slot, *p)),
            })
            .map(|(slot, _)| slot)
    }
    /// Total variation distance between the legal-entry marginals.
    pub fn divergence(&self, other: &Self) -> Probability {
        let (a, b) = (self.marginal(), other.marginal());
        let indices = a.keys().chain(b.keys()).collect::<std::collections::BTreeSet<_>>();
        indices
            .into_iter()
            .map(|i| {
                let p = a.get(i).copied().unwrap_or(0.);
                let q = b.get(i).copied().unwrap_or(0.);
                (p - q).abs()
            })
            .sum::<Probability>()
            / 2.
    }
    /// Draws one slot from a generator seeded with `seed` by walking the
    /// cumulative weights in slot order.
    pub fn sample(&self, seed: Seed) -> Option<Slot> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        let draw = rng.random::<f64>();
        let mut cumulative = 0.;
        for (slot, p) in self.0.iter() {
            cumulative += p;
            if draw < cumulative {
                return Some(*slot);
            }
        }
        self.0.keys().next_back().copied()
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let entries = self
            .0
            .iter()
            .map(|((_, action), p)| format!("{} {:.3}", action, p))
            .collect::<Vec<_>>();
        write!(f, "[{}]", entries.join(", "))
    }
}
