use super::*;
use std::collections::BTreeMap;
use tp_core::*;

/// Small and big blind amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

/// Which table positions currently hold the named roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Roles {
    pub hero: Position,
    pub button: Position,
    pub small_blind: Position,
    pub big_blind: Position,
}

/// Perception confidence, overall and per extracted element.
#[derive(Debug, Clone, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Confidence {
    pub overall: Probability,
    #[serde(default)]
    pub elements: BTreeMap<String, Probability>,
}

/// One entry of the ordered action history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Play {
    pub seat: Position,
    pub street: Street,
    pub action: Action,
}

/// Immutable snapshot of the table at the moment hero must act.
///
/// Built once by perception (usually deserialized from its JSON output) and
/// shared by reference with every stage of the decision. Nothing in the
/// decision loop mutates it.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GameState {
    hand_id: String,
    game: String,
    blinds: Blinds,
    roles: Roles,
    seats: BTreeMap<Position, Seat>,
    #[serde(default)]
    board: Vec<Card>,
    pot: Chips,
    street: Street,
    #[serde(default)]
    history: Vec<Play>,
    legal: Vec<Legal>,
    #[serde(default)]
    confidence: Confidence,
    #[serde(default)]
    latency_ms: Millis,
    #[serde(default)]
    perception_model: Option<String>,
}

impl GameState {
    /// Parses and validates a perception snapshot.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let state = serde_json::from_str::<Self>(json)?;
        state.validate()?;
        Ok(state)
    }
    /// Structural checks that make a snapshot well-formed enough to decide on.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.hand_id.trim().is_empty() {
            anyhow::bail!("empty hand id");
        }
        if self.blinds.big <= 0 {
            anyhow::bail!("big blind must be positive, got {}", self.blinds.big);
        }
        if self.legal.is_empty() {
            anyhow::bail!("hand {} has no legal actions", self.hand_id);
        }
        if let Some(bad) = self.legal.iter().find(|l| l.min() < 0 || l.min() > l.max()) {
            anyhow::bail!("malformed legal bounds {}", bad);
        }
        if self.board.len() != self.street.n_board() {
            anyhow::bail!(
                "{} expects {} board cards, got {}",
                self.street,
                self.street.n_board(),
                self.board.len()
            );
        }
        if !self.seats.contains_key(&self.roles.hero) {
            anyhow::bail!("hero position {} has no seat", self.roles.hero);
        }
        Ok(())
    }
}

impl GameState {
    pub fn hand_id(&self) -> &str {
        &self.hand_id
    }
    /// Game-type tag, e.g. `"nlhe-6max"`.
    pub fn game(&self) -> &str {
        &self.game
    }
    pub fn blinds(&self) -> Blinds {
        self.blinds
    }
    pub fn roles(&self) -> Roles {
        self.roles
    }
    pub fn seats(&self) -> &BTreeMap<Position, Seat> {
        &self.seats
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn history(&self) -> &[Play] {
        &self.history
    }
    pub fn legal(&self) -> &[Legal] {
        &self.legal
    }
    pub fn confidence(&self) -> &Confidence {
        &self.confidence
    }
    pub fn latency_ms(&self) -> Millis {
        self.latency_ms
    }
    pub fn perception_model(&self) -> Option<&str> {
        self.perception_model.as_deref()
    }
}

impl GameState {
    pub fn hero(&self) -> Position {
        self.roles.hero
    }
    pub fn hero_seat(&self) -> Option<&Seat> {
        self.seats.get(&self.roles.hero)
    }
    pub fn hero_hole(&self) -> Option<&Hole> {
        self.hero_seat().and_then(Seat::hole)
    }
    /// Big blind, floored at one chip so bb conversions never divide by zero.
    pub fn big_blind(&self) -> Chips {
        self.blinds.big.max(1)
    }
    /// Converts chips to big blinds.
    pub fn in_bb(&self, chips: Chips) -> f64 {
        chips as f64 / self.big_blind() as f64
    }
    /// Smaller of hero's stack and the deepest opponent stack.
    /// `None` when hero's seat is unknown.
    pub fn effective_stack(&self) -> Option<Chips> {
        let hero = self.hero_seat()?.stack();
        let deepest = self
            .seats
            .iter()
            .filter(|(pos, _)| **pos != self.roles.hero)
            .map(|(_, seat)| seat.stack())
            .max();
        Some(deepest.map_or(hero, |villain| hero.min(villain)))
    }
    /// Chips a position has already put in on a street.
    pub fn committed(&self, seat: Position, street: Street) -> Chips {
        self.history
            .iter()
            .filter(|play| play.seat == seat && play.street == street)
            .fold(0, |sum, play| match play.action {
                Action::Call(n) | Action::Blind(n) => sum + n,
                Action::Bet(n) | Action::Raise(n) | Action::Shove(n) => sum.max(n),
                Action::Fold | Action::Check => sum,
            })
    }
    /// Chips hero has already put in on the current street.
    pub fn hero_committed(&self) -> Chips {
        self.committed(self.roles.hero, self.street)
    }
}

impl Arbitrary for GameState {
    fn random() -> Self {
        let street = Street::random();
        let big = 100;
        let hero = Position::all()[rand::random_range(0..6)];
        let villain = if hero == Position::BB {
            Position::BTN
        } else {
            Position::BB
        };
        let seats = [
            (hero, Seat::new(rand::random_range(500..20_000), None)),
            (villain, Seat::new(rand::random_range(500..20_000), None)),
        ]
        .into_iter()
        .collect();
        Self {
            hand_id: format!("R-{}", rand::random::<u32>()),
            game: String::from("nlhe-6max"),
            blinds: Blinds { small: big / 2, big },
            roles: Roles {
                hero,
                button: Position::BTN,
                small_blind: Position::SB,
                big_blind: Position::BB,
            },
            seats,
            board: (0..street.n_board()).map(|_| Card::random()).collect(),
            pot: rand::random_range(150..5_000),
            street,
            history: vec![Play {
                seat: villain,
                street,
                action: Action::Raise(rand::random_range(2..10) * big),
            }],
            legal: vec![Legal::fold(), Legal::call(big * 2), Legal::raise(big * 4, big * 50)],
            confidence: Confidence {
                overall: 1.0,
                elements: BTreeMap::new(),
            },
            latency_ms: 0,
            perception_model: None,
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} pot {} board [{}]",
            self.hand_id,
            self.street,
            self.roles.hero,
            self.pot,
            self.board
                .iter()
                .map(Card::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> serde_json::Value {
        serde_json::json!({
            "hand_id": "H-7",
            "game": "nlhe-6max",
            "blinds": { "small": 50, "big": 100 },
            "roles": { "hero": "BTN", "button": "BTN", "small_blind": "SB", "big_blind": "BB" },
            "seats": {
                "BTN": { "stack": 9800, "hole": ["Ah", "Kh"] },
                "BB": { "stack": 6000 },
                "SB": { "stack": 12000 }
            },
            "board": ["7c", "7d", "2s"],
            "pot": 650,
            "street": "flop",
            "history": [
                { "seat": "BTN", "street": "preflop", "action": "RAISE 250" },
                { "seat": "BB", "street": "preflop", "action": "CALL 150" },
                { "seat": "BB", "street": "flop", "action": "BET 200" },
                { "seat": "BTN", "street": "flop", "action": "RAISE 600" }
            ],
            "legal": [
                { "kind": "fold" },
                { "kind": "call", "min": 400, "max": 400 },
                { "kind": "raise", "min": 1400, "max": 9800 }
            ],
            "confidence": { "overall": 0.97 },
            "latency_ms": 180
        })
    }

    #[test]
    fn parses_perception_json() {
        let state = GameState::from_json(&snapshot().to_string()).unwrap();
        assert_eq!(state.hand_id(), "H-7");
        assert_eq!(state.street(), Street::Flop);
        assert_eq!(state.hero(), Position::BTN);
        assert_eq!(state.hero_hole().unwrap().to_string(), "AhKh");
        assert_eq!(state.legal().len(), 3);
        assert_eq!(state.latency_ms(), 180);
    }
    #[test]
    fn effective_stack_uses_deepest_opponent() {
        let state = GameState::from_json(&snapshot().to_string()).unwrap();
        assert_eq!(state.effective_stack(), Some(9800));
    }
    #[test]
    fn street_commitment_counts_raise_totals_once() {
        let state = GameState::from_json(&snapshot().to_string()).unwrap();
        assert_eq!(state.hero_committed(), 600);
        assert_eq!(state.committed(Position::BTN, Street::Preflop), 250);
        assert_eq!(state.committed(Position::BB, Street::Preflop), 150);
    }
    #[test]
    fn rejects_board_street_mismatch() {
        let mut json = snapshot();
        json["street"] = serde_json::json!("turn");
        assert!(GameState::from_json(&json.to_string()).is_err());
    }
    #[test]
    fn rejects_empty_legal_set() {
        let mut json = snapshot();
        json["legal"] = serde_json::json!([]);
        assert!(GameState::from_json(&json.to_string()).is_err());
    }
    #[test]
    fn rejects_non_ascii_card() {
        let mut json = snapshot();
        json["board"][0] = serde_json::json!("é");
        assert!(GameState::from_json(&json.to_string()).is_err());
    }
}
