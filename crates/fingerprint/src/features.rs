use super::*;
use tp_core::*;
use tp_state::*;

/// The bucketed feature tuple a fingerprint hashes.
///
/// Every continuous quantity is floored to a fixed-width bucket measured in
/// big blinds, so two snapshots that differ only by a few chips collapse to
/// the same tuple. Missing inputs map to explicit `unknown` / `none` tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    game: String,
    stack: Option<f64>,
    pot: f64,
    texture: Texture,
    class: Class,
    history: Vec<Vec<String>>,
    spr: Option<f64>,
}

impl Features {
    /// Stable, human-readable serialization. Field order is part of the
    /// fingerprint format.
    pub fn canonical(&self) -> String {
        [
            format!("game={}", self.game),
            format!("stack={}", token(self.stack, 0)),
            format!("pot={}", token(Some(self.pot), 0)),
            format!("board={}", self.texture),
            format!("hole={}", self.class),
            format!("history={}", self.history()),
            format!("spr={}", token(self.spr, 1)),
        ]
        .join("|")
    }
    pub fn texture(&self) -> &Texture {
        &self.texture
    }
    pub fn class(&self) -> Class {
        self.class
    }
    fn history(&self) -> String {
        match self.history.is_empty() {
            true => String::from("none"),
            false => self
                .history
                .iter()
                .map(|street| street.join(","))
                .collect::<Vec<_>>()
                .join("/"),
        }
    }
}

impl From<&GameState> for Features {
    fn from(state: &GameState) -> Self {
        let stack = state.effective_stack().map(|s| state.in_bb(s));
        let pot = state.in_bb(state.pot().max(0));
        let spr = stack.filter(|_| pot > 0.).map(|s| s / pot);
        Self {
            game: match state.game().trim() {
                "" => String::from("unknown"),
                game => game.to_lowercase(),
            },
            stack: stack.map(|s| bucket(s, STACK_BUCKET_BB)),
            pot: bucket(pot, POT_BUCKET_BB),
            texture: Texture::from(state.board()),
            class: Class::from(state.hero_hole()),
            history: Street::all()
                .into_iter()
                .map(|street| {
                    state
                        .history()
                        .iter()
                        .filter(|play| play.street == street)
                        .map(|play| tokenize(play, state))
                        .collect::<Vec<_>>()
                })
                .filter(|tokens| !tokens.is_empty())
                .collect(),
            spr: spr.map(|r| bucket(r, SPR_BUCKET)),
        }
    }
}

impl std::fmt::Display for Features {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Floors a value to the lower edge of its bucket.
fn bucket(value: f64, width: f64) -> f64 {
    (value / width).floor() * width
}

fn token(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => String::from("unknown"),
    }
}

/// `BTN:R3` = button raised to three big blinds.
fn tokenize(play: &Play, state: &GameState) -> String {
    match play.action.amount() {
        Some(n) => format!(
            "{}:{}{}",
            play.seat,
            play.action.kind().symbol(),
            state.in_bb(n).round() as i64
        ),
        None => format!("{}:{}", play.seat, play.action.kind().symbol()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_to_bucket_edges() {
        assert_eq!(bucket(99.9, STACK_BUCKET_BB), 95.);
        assert_eq!(bucket(100.0, STACK_BUCKET_BB), 100.);
        assert_eq!(bucket(7.9, POT_BUCKET_BB), 6.);
        assert_eq!(bucket(1.49, SPR_BUCKET), 1.0);
    }
    #[test]
    fn missing_values_are_tokens() {
        assert_eq!(token(None, 0), "unknown");
        assert_eq!(token(Some(f64::INFINITY), 1), "unknown");
        assert_eq!(token(Some(2.5), 1), "2.5");
    }
}
