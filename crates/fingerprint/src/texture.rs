use tp_state::*;

/// Suit distribution of the board, by the largest single-suit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suitedness {
    Rainbow,
    TwoTone,
    /// Three or more board cards share a suit.
    Monotone,
}

impl Suitedness {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Rainbow => "rainbow",
            Self::TwoTone => "twotone",
            Self::Monotone => "monotone",
        }
    }
}

impl From<&[Card]> for Suitedness {
    fn from(board: &[Card]) -> Self {
        let mut counts = [0usize; 4];
        board
            .iter()
            .for_each(|card| counts[u8::from(card.suit()) as usize] += 1);
        match counts.into_iter().max().unwrap_or(0) {
            0 | 1 => Self::Rainbow,
            2 => Self::TwoTone,
            _ => Self::Monotone,
        }
    }
}

/// Board texture bucket: pairing, suitedness, and ranks high to low.
///
/// Exact suits are discarded, so `Ah7d2c` and `As7h2d` share a texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Texture {
    None,
    Board {
        paired: bool,
        suits: Suitedness,
        ranks: Vec<Rank>,
    },
}

impl From<&[Card]> for Texture {
    fn from(board: &[Card]) -> Self {
        if board.is_empty() {
            return Self::None;
        }
        let mut ranks = board.iter().map(Card::rank).collect::<Vec<_>>();
        ranks.sort_by(|a, b| b.cmp(a));
        let paired = ranks.windows(2).any(|w| w[0] == w[1]);
        Self::Board {
            paired,
            suits: Suitedness::from(board),
            ranks,
        }
    }
}

impl std::fmt::Display for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Board {
                paired,
                suits,
                ranks,
            } => write!(
                f,
                "{}/{}/{}",
                if *paired { "paired" } else { "unpaired" },
                suits.label(),
                ranks.iter().map(Rank::symbol).collect::<String>()
            ),
        }
    }
}
