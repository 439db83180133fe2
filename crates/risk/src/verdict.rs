use tp_core::Chips;
use tp_state::Action;

/// Why the gate refused an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rejection {
    Bankroll,
    Session,
    /// A previous bankroll breach stopped the session.
    Panic,
}

impl Rejection {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bankroll => "bankroll",
            Self::Session => "session",
            Self::Panic => "panic",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The breach that stopped the session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Panic {
    pub hand_id: String,
    pub action: Action,
}

impl std::fmt::Display for Panic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} on {}", self.action, self.hand_id)
    }
}

/// Risk counters at the moment of a check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub net: Chips,
    pub exposure: Chips,
    pub hands: usize,
    /// Net result if the live exposure were lost.
    pub projected: Chips,
    pub panic: Option<Panic>,
}

/// Gate decision for one candidate action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Verdict {
    pub reason: Option<Rejection>,
    /// Chips the candidate adds to live exposure.
    pub delta: Chips,
    pub snapshot: Snapshot,
}

impl Verdict {
    pub fn allowed(&self) -> bool {
        self.reason.is_none()
    }
}
