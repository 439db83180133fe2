/// Named seat at a poker table relative to the dealer button.
///
/// Position names vary by table size:
/// - Heads-up (2): BTN (=SB), BB
/// - 6-max: BTN, SB, BB, UTG, HJ, CO
/// - 9-max: BTN, SB, BB, UTG, UTG1, MP, MP1, HJ, CO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Position {
    BTN,
    SB,
    BB,
    UTG,
    UTG1,
    MP,
    MP1,
    HJ,
    CO,
}

impl Position {
    pub const fn all() -> [Self; 9] {
        [
            Self::BTN,
            Self::SB,
            Self::BB,
            Self::UTG,
            Self::UTG1,
            Self::MP,
            Self::MP1,
            Self::HJ,
            Self::CO,
        ]
    }
    pub const fn label(&self) -> &'static str {
        match self {
            Self::BTN => "BTN",
            Self::SB => "SB",
            Self::BB => "BB",
            Self::UTG => "UTG",
            Self::UTG1 => "UTG1",
            Self::MP => "MP",
            Self::MP1 => "MP1",
            Self::HJ => "HJ",
            Self::CO => "CO",
        }
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("invalid position: {}", s))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(Position::try_from("btn").unwrap(), Position::BTN);
        assert_eq!(Position::try_from(" UTG1 ").unwrap(), Position::UTG1);
        assert!(Position::try_from("dealer").is_err());
    }
    #[test]
    fn every_label_parses_back() {
        for position in Position::all() {
            assert_eq!(Position::try_from(position.to_string().as_str()).unwrap(), position);
        }
    }
}
