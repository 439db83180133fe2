use super::kind::Kind;
use tp_core::Chips;

/// A concrete betting decision with its chip amount.
///
/// # Amounts
///
/// `Call` and `Blind` carry the chips added by the action. `Bet`, `Raise`, and
/// `Shove` carry the player's total contribution for the street after the
/// action ("raise to 400"), which is how tables display them.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    Fold,
    Check,
    Call(Chips),
    Bet(Chips),
    Raise(Chips),
    Shove(Chips),
    Blind(Chips),
}

impl Action {
    pub fn kind(&self) -> Kind {
        match self {
            Action::Fold => Kind::Fold,
            Action::Check => Kind::Check,
            Action::Call(_) => Kind::Call,
            Action::Bet(_) => Kind::Bet,
            Action::Raise(_) => Kind::Raise,
            Action::Shove(_) => Kind::Shove,
            Action::Blind(_) => Kind::Blind,
        }
    }
    /// Extracts the chip amount from betting actions.
    pub fn amount(&self) -> Option<Chips> {
        match *self {
            Action::Call(n)
            | Action::Bet(n)
            | Action::Raise(n)
            | Action::Shove(n)
            | Action::Blind(n) => Some(n),
            Action::Fold | Action::Check => None,
        }
    }
    /// Rebuilds an action from its kind and amount.
    pub fn from_parts(kind: Kind, amount: Chips) -> Self {
        match kind {
            Kind::Fold => Action::Fold,
            Kind::Check => Action::Check,
            Kind::Call => Action::Call(amount),
            Kind::Bet => Action::Bet(amount),
            Kind::Raise => Action::Raise(amount),
            Kind::Shove => Action::Shove(amount),
            Kind::Blind => Action::Blind(amount),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl TryFrom<&str> for Action {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let parts = s.split_whitespace().collect::<Vec<_>>();
        let kind = parts
            .first()
            .ok_or_else(|| anyhow::anyhow!("empty action"))
            .and_then(|token| Kind::try_from(*token))?;
        match kind {
            Kind::Fold => Ok(Action::Fold),
            Kind::Check => Ok(Action::Check),
            kind => parts
                .get(1)
                .and_then(|n| n.parse::<Chips>().ok())
                .filter(|n| *n >= 0)
                .map(|n| Action::from_parts(kind, n))
                .ok_or_else(|| anyhow::anyhow!("invalid {} amount: {}", kind, s)),
        }
    }
}
impl TryFrom<String> for Action {
    type Error = anyhow::Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.amount() {
            Some(amount) => write!(f, "{} {}", self.kind(), amount),
            None => write!(f, "{}", self.kind()),
        }
    }
}
