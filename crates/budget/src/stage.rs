/// A timed step of the per-hand pipeline, in execution order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// External game state extraction; only its latency is observed.
    Perception,
    /// Fingerprint and strategy cache lookup.
    Solver,
    /// Parallel advisory queries.
    Advisory,
    /// Blend, sample, and risk gate.
    Decision,
}

impl Stage {
    pub const fn all() -> [Self; 4] {
        [Self::Perception, Self::Solver, Self::Advisory, Self::Decision]
    }
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Perception => "perception",
            Self::Solver => "solver",
            Self::Advisory => "advisory",
            Self::Decision => "decision",
        }
    }
}

impl TryFrom<&str> for Stage {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("invalid stage: {}", s))
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
