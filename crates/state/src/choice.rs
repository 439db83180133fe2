use super::action::Action;
use super::kind::Kind;
use tp_core::Chips;

/// One support point of an action distribution: a kind plus a preferred size.
///
/// Sources may name a kind without a size ("raise") and leave the amount to
/// the legal bounds; amounts follow the same convention as [`Action`].
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Choice {
    kind: Kind,
    size: Option<Chips>,
}

impl Choice {
    pub fn new(kind: Kind, size: Option<Chips>) -> Self {
        Self { kind, size }
    }
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn size(&self) -> Option<Chips> {
        self.size
    }
}

impl From<Kind> for Choice {
    fn from(kind: Kind) -> Self {
        Self { kind, size: None }
    }
}
impl From<Action> for Choice {
    fn from(action: Action) -> Self {
        Self {
            kind: action.kind(),
            size: action.amount(),
        }
    }
}

impl TryFrom<&str> for Choice {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut parts = s.split_whitespace();
        let kind = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty choice"))
            .and_then(Kind::try_from)?;
        let size = parts
            .next()
            .map(|n| {
                n.parse::<Chips>()
                    .ok()
                    .filter(|n| *n >= 0)
                    .ok_or_else(|| anyhow::anyhow!("invalid size: {}", s))
            })
            .transpose()?;
        Ok(Self { kind, size })
    }
}
impl TryFrom<String> for Choice {
    type Error = anyhow::Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}
impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        choice.to_string()
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.size {
            Some(size) => write!(f, "{} {}", self.kind, size),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsized_choice() {
        let choice = Choice::try_from("raise").unwrap();
        assert_eq!(choice.kind(), Kind::Raise);
        assert_eq!(choice.size(), None);
    }
    #[test]
    fn sized_choice() {
        let choice = Choice::try_from("BET 300").unwrap();
        assert_eq!(choice, Choice::from(Action::Bet(300)));
        assert!(Choice::try_from("BET lots").is_err());
    }
}
