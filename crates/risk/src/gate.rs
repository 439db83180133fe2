use super::*;
use tp_core::*;
use tp_state::*;

/// Caller-supplied overrides for a single check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Hand id to attribute the check to instead of the snapshot's.
    pub hand_id: Option<String>,
    /// Chips hero already committed this street, if known better than the
    /// snapshot's history.
    pub committed: Option<Chips>,
}

/// Running bankroll and session exposure with a one-shot panic stop.
///
/// Checks are order-dependent: each approved action adds its delta to the
/// current hand's live exposure. Live exposure resets when a check arrives
/// for a different hand or an outcome is recorded. A bankroll breach sets
/// the panic flag, which rejects everything until [`Gate::reset_session`].
pub struct Gate {
    limits: Limits,
    net: Chips,
    hands: usize,
    exposure: Chips,
    hand: Option<String>,
    panic: Option<Panic>,
    callback: Option<Box<dyn FnMut(&Panic) + Send>>,
}

impl Gate {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            net: 0,
            hands: 0,
            exposure: 0,
            hand: None,
            panic: None,
            callback: None,
        }
    }
    /// Registers the function fired once per bankroll breach.
    pub fn on_panic(&mut self, callback: impl FnMut(&Panic) + Send + 'static) {
        self.callback = Some(Box::new(callback));
    }
    pub fn limits(&self) -> Limits {
        self.limits
    }
    pub fn panic(&self) -> Option<&Panic> {
        self.panic.as_ref()
    }
    pub fn is_panicked(&self) -> bool {
        self.panic.is_some()
    }
    pub fn exposure(&self) -> Chips {
        self.exposure
    }
    pub fn net(&self) -> Chips {
        self.net
    }
    pub fn hands(&self) -> usize {
        self.hands
    }
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            net: self.net,
            exposure: self.exposure,
            hands: self.hands,
            projected: self.net - self.exposure,
            panic: self.panic.clone(),
        }
    }
}

impl Gate {
    /// Approves or rejects a candidate action.
    pub fn check(&mut self, candidate: &Action, state: &GameState, context: Option<&Context>) -> Verdict {
        let hand_id = context
            .and_then(|c| c.hand_id.clone())
            .unwrap_or_else(|| state.hand_id().to_string());
        if self.hand.as_deref() != Some(hand_id.as_str()) {
            self.exposure = 0;
            self.hand = Some(hand_id.clone());
        }
        let committed = context
            .and_then(|c| c.committed)
            .unwrap_or_else(|| state.hero_committed());
        let delta = Self::delta(candidate, committed);
        if self.is_panicked() {
            log::warn!("{:<32}{:<32}", "risk gate panic-stopped", candidate);
            return self.reject(Rejection::Panic, delta);
        }
        if self.limits.session > 0 && self.hands >= self.limits.session {
            log::warn!("{:<32}{:<32}", "session limit reached", self.hands);
            return self.reject(Rejection::Session, delta);
        }
        let projected = self.net - (self.exposure + delta);
        if self.limits.bankroll > 0 && -projected > self.limits.bankroll {
            let panic = Panic {
                hand_id,
                action: *candidate,
            };
            log::error!("{:<32}{:<32}", "bankroll breached, panic stop", panic);
            if let Some(callback) = self.callback.as_mut() {
                callback(&panic);
            }
            self.panic = Some(panic);
            return self.reject(Rejection::Bankroll, delta);
        }
        self.exposure += delta;
        Verdict {
            reason: None,
            delta,
            snapshot: self.snapshot(),
        }
    }
    /// Chips a candidate adds on top of what hero already put in this street.
    pub fn delta(candidate: &Action, committed: Chips) -> Chips {
        match *candidate {
            Action::Bet(n) | Action::Raise(n) | Action::Shove(n) => (n - committed).max(0),
            Action::Call(n) | Action::Blind(n) => n.max(0),
            Action::Fold | Action::Check => 0,
        }
    }
    fn reject(&self, reason: Rejection, delta: Chips) -> Verdict {
        Verdict {
            reason: Some(reason),
            delta,
            snapshot: self.snapshot(),
        }
    }
}

impl Gate {
    /// Settles a finished hand.
    pub fn record_outcome(&mut self, result: Chips) {
        self.net += result;
        self.exposure = 0;
        self.hand = None;
    }
    pub fn increment_hand_count(&mut self) {
        self.hands += 1;
    }
    /// Clears the panic stop, exposure, and counters.
    pub fn reset_session(&mut self) {
        log::info!("{:<32}{:<32}", "risk session reset", self.hands);
        self.net = 0;
        self.hands = 0;
        self.exposure = 0;
        self.hand = None;
        self.panic = None;
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Gate")
            .field("limits", &self.limits)
            .field("net", &self.net)
            .field("hands", &self.hands)
            .field("exposure", &self.exposure)
            .field("hand", &self.hand)
            .field("panic", &self.panic)
            .finish_non_exhaustive()
    }
}
