use super::rank::Rank;
use super::suit::Suit;
use tp_core::Arbitrary;

/// A playing card encoded as a single byte.
///
/// The 52 cards map bijectively to `0..52` via `rank * 4 + suit`, so cards
/// sort first by rank, then by suit within each rank.
///
/// # Parsing
///
/// Cards parse from two-character strings like `"As"` (ace of spades) or
/// `"Tc"` (ten of clubs). Perception emits this notation, and serde reads and
/// writes it directly.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card(u8);

impl Card {
    /// Extracts the rank component (2 through Ace).
    pub fn rank(&self) -> Rank {
        Rank::from(self.0 / 4)
    }
    /// Extracts the suit component (clubs, diamonds, hearts, spades).
    pub fn suit(&self) -> Suit {
        Suit::from(self.0 % 4)
    }
}

/// (Rank, Suit) isomorphism
impl From<(Rank, Suit)> for Card {
    fn from((r, s): (Rank, Suit)) -> Self {
        Self(u8::from(r) * 4 + u8::from(s))
    }
}

/// u8 isomorphism
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self(n % 52)
    }
}

/// str isomorphism
impl TryFrom<&str> for Card {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        match s.is_ascii() && s.len() == 2 {
            true => {
                let rank = Rank::try_from(&s[0..1])?;
                let suit = Suit::try_from(&s[1..2])?;
                Ok(Card::from((rank, suit)))
            }
            false => Err(anyhow::anyhow!("card notation must be 2 characters: {}", s)),
        }
    }
}
impl TryFrom<String> for Card {
    type Error = anyhow::Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}
impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl Card {
    /// Parses concatenated card notation (whitespace ignored) into cards.
    pub fn parse(s: &str) -> anyhow::Result<Vec<Self>> {
        s.replace(char::is_whitespace, "")
            .chars()
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .map(Card::try_from)
            .collect()
    }
}

impl Arbitrary for Card {
    fn random() -> Self {
        Self(rand::random_range(0..52))
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_str() {
        for n in 0..52u8 {
            let card = Card::from(n);
            assert_eq!(card, Card::try_from(card.to_string().as_str()).unwrap());
        }
    }
    #[test]
    fn parses_runs() {
        let cards = Card::parse("Ah Kd 7c").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].rank(), Rank::Ace);
        assert_eq!(cards[2].suit(), Suit::C);
    }
    #[test]
    fn rejects_garbage() {
        assert!(Card::try_from("Zz").is_err());
        assert!(Card::try_from("Ahh").is_err());
        assert!(Card::try_from("é").is_err());
        assert!(Card::try_from("Aé").is_err());
    }
    #[test]
    fn serde_notation() {
        let card = Card::try_from("Qs").unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"Qs\"");
        assert_eq!(serde_json::from_str::<Card>(&json).unwrap(), card);
    }
}
