/// Category of a betting decision, independent of sizing.
///
/// Legal action sets, cached strategies, and advisory opinions all agree on
/// kinds; sizes are resolved against the legal bounds at the very end.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    Shove,
    Blind,
}

impl Kind {
    pub const fn all() -> [Self; 7] {
        [
            Self::Fold,
            Self::Check,
            Self::Call,
            Self::Bet,
            Self::Raise,
            Self::Shove,
            Self::Blind,
        ]
    }
    /// Uppercase token used in action notation.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fold => "FOLD",
            Self::Check => "CHECK",
            Self::Call => "CALL",
            Self::Bet => "BET",
            Self::Raise => "RAISE",
            Self::Shove => "SHOVE",
            Self::Blind => "BLIND",
        }
    }
    /// Single-letter token used in fingerprint history.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Fold => "F",
            Self::Check => "X",
            Self::Call => "C",
            Self::Bet => "B",
            Self::Raise => "R",
            Self::Shove => "S",
            Self::Blind => "$",
        }
    }
    /// True if the acting player chooses the amount.
    pub const fn is_sized(&self) -> bool {
        matches!(self, Self::Bet | Self::Raise)
    }
    /// True if this is a bet, raise, or shove.
    pub const fn is_aggro(&self) -> bool {
        matches!(self, Self::Bet | Self::Raise | Self::Shove)
    }
    /// True if the action puts no chips in.
    pub const fn is_passive(&self) -> bool {
        matches!(self, Self::Fold | Self::Check)
    }
    /// Bet and raise are the same decision with or without a prior wager;
    /// sources often disagree on which word to use.
    pub const fn alias(&self) -> Option<Self> {
        match self {
            Self::Bet => Some(Self::Raise),
            Self::Raise => Some(Self::Bet),
            _ => None,
        }
    }
}

impl TryFrom<&str> for Kind {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_uppercase().as_str() {
            "ALLIN" | "ALL-IN" | "ALL_IN" => Ok(Self::Shove),
            token => Self::all()
                .into_iter()
                .find(|k| k.label() == token)
                .ok_or_else(|| anyhow::anyhow!("invalid action kind: {}", s)),
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
