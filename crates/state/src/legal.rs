use super::action::Action;
use super::kind::Kind;
use tp_core::Chips;

/// One entry of the legal action set reported by the table.
///
/// `min..=max` bounds the amount using [`Action`] conventions: the call amount
/// for `Call` (min = max), the raise-to range for `Bet`/`Raise`, and the
/// all-in total for `Shove`. Passive kinds carry zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Legal {
    kind: Kind,
    #[serde(default)]
    min: Chips,
    #[serde(default)]
    max: Chips,
}

impl Legal {
    pub fn new(kind: Kind, min: Chips, max: Chips) -> Self {
        Self {
            kind,
            min: min.min(max),
            max: max.max(min),
        }
    }
    pub fn fold() -> Self {
        Self::new(Kind::Fold, 0, 0)
    }
    pub fn check() -> Self {
        Self::new(Kind::Check, 0, 0)
    }
    pub fn call(amount: Chips) -> Self {
        Self::new(Kind::Call, amount, amount)
    }
    pub fn raise(min: Chips, max: Chips) -> Self {
        Self::new(Kind::Raise, min, max)
    }
    pub fn bet(min: Chips, max: Chips) -> Self {
        Self::new(Kind::Bet, min, max)
    }
    pub fn shove(total: Chips) -> Self {
        Self::new(Kind::Shove, total, total)
    }
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn min(&self) -> Chips {
        self.min
    }
    pub fn max(&self) -> Chips {
        self.max
    }
    /// True if this entry accepts the given kind, directly or through the
    /// bet/raise alias.
    pub fn accepts(&self, kind: Kind) -> bool {
        self.kind == kind || self.kind.alias() == Some(kind)
    }
    /// Distance from a size to the nearest point inside the bounds.
    pub fn gap(&self, size: Chips) -> Chips {
        if size < self.min {
            self.min - size
        } else if size > self.max {
            size - self.max
        } else {
            0
        }
    }
    /// Clamps a size into the bounds.
    pub fn clamp(&self, size: Chips) -> Chips {
        size.clamp(self.min, self.max)
    }
    /// Realizes this entry as a concrete action. A missing size resolves to
    /// the minimum legal amount.
    pub fn realize(&self, size: Option<Chips>) -> Action {
        match self.kind {
            Kind::Bet | Kind::Raise => {
                Action::from_parts(self.kind, self.clamp(size.unwrap_or(self.min)))
            }
            Kind::Shove => Action::Shove(self.max),
            Kind::Call => Action::Call(self.min),
            kind => Action::from_parts(kind, 0),
        }
    }
}

impl std::fmt::Display for Legal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            Kind::Bet | Kind::Raise => write!(f, "{} [{}..{}]", self.kind, self.min, self.max),
            Kind::Call | Kind::Shove => write!(f, "{} {}", self.kind, self.max),
            kind => write!(f, "{}", kind),
        }
    }
}
