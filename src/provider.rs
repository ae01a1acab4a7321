//! Decision providers: whatever picks the action for a non-human seat.
//!
//! The engine hands a provider a [`DecisionRequest`] describing only what the
//! seat may know, and gets back a [`Decision`]. Provider output is never
//! trusted as-is: [`normalize`] turns errors, malformed replies and
//! out-of-range raises into a fold before anything reaches the hand.

mod command;
mod heuristic;

pub use command::CommandProvider;
pub use heuristic::{HeuristicProfile, HeuristicProvider};

use crate::betting::Action;
use crate::cards::Card;
use crate::game::Hand;
use crate::seat::SeatId;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// What a provider seat is told when asked to act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct DecisionRequest {
    pub seat: SeatId,
    pub hole_cards: Vec<Card>,
    pub community_cards: Vec<Card>,
    /// Pot including bets still in front of seats.
    pub pot: u64,
    pub own_chips: u64,
    pub own_bet: u64,
    pub opponent_chips: Vec<(SeatId, u64)>,
    pub amount_to_call: u64,
    pub highest_bet: u64,
    pub min_raise_to: u64,
}

impl DecisionRequest {
    /// Build the request for `seat` from the hand as it stands.
    pub fn for_seat(hand: &Hand, seat: SeatId) -> Self {
        let me = hand.seat(seat);
        Self {
            seat,
            hole_cards: me.hole().map(|h| h.to_vec()).unwrap_or_default(),
            community_cards: hand.community().to_vec(),
            pot: hand.pot_total(),
            own_chips: me.chips(),
            own_bet: me.current_bet(),
            opponent_chips: hand
                .seats()
                .iter()
                .filter(|s| s.id() != seat)
                .map(|s| (s.id(), s.chips()))
                .collect(),
            amount_to_call: hand.to_call(seat),
            highest_bet: hand.round().highest_bet(),
            min_raise_to: hand.round().min_raise_to(),
        }
    }

    /// Largest raise-to total the seat can afford.
    pub fn max_raise_to(&self) -> u64 {
        self.own_chips + self.own_bet
    }
}

/// A provider's answer. `Raise` carries a raise-to total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Fold,
    Call,
    Raise(u64),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Fold => f.write_str("Fold"),
            Decision::Call => f.write_str("Call"),
            Decision::Raise(n) => write!(f, "Raise {n}"),
        }
    }
}

impl FromStr for Decision {
    type Err = ProviderError;

    /// Accepts exactly `Fold`, `Call` or `Raise <n>`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProviderError::Malformed(s.trim().to_string());
        let mut words = s.split_whitespace();
        let head = words.next().ok_or_else(malformed)?.to_ascii_lowercase();
        let decision = match (head.as_str(), words.next()) {
            ("fold", None) => Decision::Fold,
            ("call", None) => Decision::Call,
            ("raise", Some(n)) => Decision::Raise(n.parse().map_err(|_| malformed())?),
            _ => return Err(malformed()),
        };
        if words.next().is_some() {
            return Err(malformed());
        }
        Ok(decision)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("no decision within {0} ms")]
    Timeout(u64),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed decision: {0:?}")]
    Malformed(String),
    #[error("could not start provider: {0}")]
    Spawn(String),
}

/// Source of actions for a non-human seat.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Short name for logs and the UI.
    fn name(&self) -> &str;

    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, ProviderError>;
}

/// Turn raw provider output into an engine action. Errors, zero raises and
/// raises beyond the seat's stack all become `Fold`.
pub fn normalize(outcome: Result<Decision, ProviderError>, request: &DecisionRequest) -> Action {
    match outcome {
        Ok(Decision::Fold) | Err(_) => Action::Fold,
        Ok(Decision::Call) => Action::Call,
        Ok(Decision::Raise(0)) => Action::Fold,
        Ok(Decision::Raise(n)) if n > request.max_raise_to() => Action::Fold,
        Ok(Decision::Raise(n)) => Action::RaiseTo(n),
    }
}
