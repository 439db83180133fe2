use super::card::Card;
use tp_core::Chips;

/// The two private cards of a player, when perception could read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Hole(Card, Card);

impl Hole {
    pub fn new(a: Card, b: Card) -> Self {
        Self(a, b)
    }
    pub fn cards(&self) -> [Card; 2] {
        [self.0, self.1]
    }
}

impl TryFrom<&str> for Hole {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match Card::parse(s)?.as_slice() {
            [a, b] => Ok(Self(*a, *b)),
            _ => Err(anyhow::anyhow!("hole must be exactly 2 cards: {}", s)),
        }
    }
}

impl std::fmt::Display for Hole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

/// Stack behind and (optionally) known hole cards of one occupied seat.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Seat {
    stack: Chips,
    #[serde(default)]
    hole: Option<Hole>,
}

impl Seat {
    pub fn new(stack: Chips, hole: Option<Hole>) -> Self {
        Self { stack, hole }
    }
    pub fn stack(&self) -> Chips {
        self.stack
    }
    pub fn hole(&self) -> Option<&Hole> {
        self.hole.as_ref()
    }
}
