use tp_state::*;

/// Strategic class of hero's hole cards: `AA`, `AKs`, `T9o`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Unknown,
    Pair(Rank),
    Ranked { hi: Rank, lo: Rank, suited: bool },
}

impl From<Option<&Hole>> for Class {
    fn from(hole: Option<&Hole>) -> Self {
        match hole.map(Hole::cards) {
            None => Self::Unknown,
            Some([a, b]) if a.rank() == b.rank() => Self::Pair(a.rank()),
            Some([a, b]) => Self::Ranked {
                hi: a.rank().max(b.rank()),
                lo: a.rank().min(b.rank()),
                suited: a.suit() == b.suit(),
            },
        }
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Pair(r) => write!(f, "{}{}", r.symbol(), r.symbol()),
            Self::Ranked { hi, lo, suited } => write!(
                f,
                "{}{}{}",
                hi.symbol(),
                lo.symbol(),
                if *suited { 's' } else { 'o' }
            ),
        }
    }
}
