use tp_state::GameState;

/// An external advisory service.
///
/// Implementations own their transport: HTTP, a local model, a fixture file.
/// They return the raw payload; validation happens in [`crate::Advice`] so a
/// misbehaving service can never put untyped data into the blend. Deadlines
/// and retries are enforced by the caller.
#[async_trait::async_trait]
pub trait Oracle: Send + Sync {
    /// Model identifier recorded in decision metadata.
    fn model(&self) -> &str;
    /// Asks for an opinion on the snapshot.
    async fn advise(&self, state: &GameState) -> anyhow::Result<serde_json::Value>;
}

/// Answers every query with the same payload.
///
/// Backs the command line's `--advice` file and offline replays of recorded
/// advisory output.
#[derive(Debug, Clone)]
pub struct Canned {
    model: String,
    payload: serde_json::Value,
}

impl Canned {
    pub fn new(model: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            model: model.into(),
            payload,
        }
    }
    /// One oracle per entry of a `{ "<model>": <payload>, ... }` object.
    pub fn from_json(json: &str) -> anyhow::Result<Vec<Self>> {
        match serde_json::from_str::<serde_json::Value>(json)? {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(model, payload)| Self::new(model, payload))
                .collect()),
            _ => Err(anyhow::anyhow!("advice file must be an object keyed by model")),
        }
    }
}

#[async_trait::async_trait]
impl Oracle for Canned {
    fn model(&self) -> &str {
        &self.model
    }
    async fn advise(&self, _: &GameState) -> anyhow::Result<serde_json::Value> {
        Ok(self.payload.clone())
    }
}
