use crate::betting::{self, Action, ActionError, Applied, BettingRound};
use crate::cards::Card;
use crate::deck::{Deck, DeckError};
use crate::evaluator::{best_of, EvalError, HandRank};
use crate::seat::{Seat, SeatId, SeatStatus};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Stages of one hand, in the only order they may advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Init,
    PreflopBetting,
    PostflopBetting,
    PostturnBetting,
    PostriverBetting,
    Showdown,
}

impl Phase {
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Init => Some(Phase::PreflopBetting),
            Phase::PreflopBetting => Some(Phase::PostflopBetting),
            Phase::PostflopBetting => Some(Phase::PostturnBetting),
            Phase::PostturnBetting => Some(Phase::PostriverBetting),
            Phase::PostriverBetting => Some(Phase::Showdown),
            Phase::Showdown => None,
        }
    }

    pub const fn is_betting(self) -> bool {
        !matches!(self, Phase::Init | Phase::Showdown)
    }

    /// Community cards on the table once this phase has been entered.
    pub const fn community_len(self) -> usize {
        match self {
            Phase::Init | Phase::PreflopBetting => 0,
            Phase::PostflopBetting => 3,
            Phase::PostturnBetting => 4,
            Phase::PostriverBetting | Phase::Showdown => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Phase::Init => "Waiting",
            Phase::PreflopBetting => "Pre-flop",
            Phase::PostflopBetting => "Flop",
            Phase::PostturnBetting => "Turn",
            Phase::PostriverBetting => "River",
            Phase::Showdown => "Showdown",
        }
    }

    /// Prompt shown to the player while the phase is current.
    pub const fn message(self) -> &'static str {
        match self {
            Phase::Init => "Press Space to deal a new hand",
            Phase::PreflopBetting => "Pre-flop betting round: Call, raise, or fold",
            Phase::PostflopBetting => "Post-flop betting round: Call, raise, or fold",
            Phase::PostturnBetting => "Post-turn betting round: Call, raise, or fold",
            Phase::PostriverBetting => "Final betting round: Call, raise, or fold",
            Phase::Showdown => "Showdown! Best hand wins",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum HistoryVerb {
    Fold,
    Check,
    Call,
    RaiseTo,
    AllIn,
    Return,
    Win,
    Split,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::Fold => "Fold",
            HistoryVerb::Check => "Check",
            HistoryVerb::Call => "Call",
            HistoryVerb::RaiseTo => "Raise to",
            HistoryVerb::AllIn => "All-in",
            HistoryVerb::Return => "Uncalled",
            HistoryVerb::Win => "Win",
            HistoryVerb::Split => "Split",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct HistoryEntry {
    pub seat: SeatId,
    pub verb: HistoryVerb,
    pub amount: Option<u64>,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "seats", rename_all = "snake_case")]
pub enum Winner {
    Single(SeatId),
    /// Tied seats in roster order.
    Split(Vec<SeatId>),
}

impl Winner {
    pub fn seats(&self) -> Vec<SeatId> {
        match self {
            Winner::Single(s) => vec![*s],
            Winner::Split(v) => v.clone(),
        }
    }
}

/// How a finished hand was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Resolution {
    pub winner: Winner,
    /// Chips paid to each winning seat, roster order.
    pub payouts: Vec<(SeatId, u64)>,
    /// Best hand of every seat that reached showdown; empty after a fold-out.
    pub ranks: Vec<(SeatId, HandRank)>,
    pub by_fold: bool,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("chip total changed: expected {expected}, found {actual}")]
    ChipsNotConserved { expected: u64, actual: u64 },
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("expected 52 cards across deck, hands and board, found {0}")]
    CardCount(usize),
    #[error("{phase} expects {expected} community cards, found {actual}")]
    CommunityCount { phase: Phase, expected: usize, actual: usize },
    #[error("phase moved from {from} to {to}")]
    PhaseOrder { from: Phase, to: Phase },
    #[error("{0} is to act but cannot")]
    ActorNotActive(SeatId),
    #[error("no seat reached showdown")]
    NoContenders,
    #[error("could not evaluate {seat}'s hand: {source}")]
    Unevaluable { seat: SeatId, source: EvalError },
}

/// Engine bug or impossible state. Never caused by a player's choice.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FatalError {
    #[error("deck underflow: {0}")]
    Deck(#[from] DeckError),
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Rejected(#[from] ActionError),
    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// One hand of three-seat Hold'em. Every transition takes `&self` and
/// returns the next value; the receiver is never modified.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Hand {
    pub(crate) deck: Deck,
    pub(crate) seats: [Seat; 3],
    pub(crate) community: Vec<Card>,
    pub(crate) pot: u64,
    pub(crate) phase: Phase,
    pub(crate) round: BettingRound,
    pub(crate) big_blind: u64,
    pub(crate) resolution: Option<Resolution>,
    history: Vec<HistoryEntry>,
    chip_total: u64,
}

impl Hand {
    /// A table in `Init`, waiting for the first deal.
    pub fn new(stacks: [u64; 3], big_blind: u64) -> Self {
        Self {
            deck: Deck::standard(),
            seats: SeatId::ROSTER.map(|id| Seat::new(id, stacks[id.index()])),
            community: Vec::new(),
            pot: 0,
            phase: Phase::Init,
            round: BettingRound::closed(SeatId::User),
            big_blind,
            resolution: None,
            history: Vec::new(),
            chip_total: stacks.iter().sum(),
        }
    }

    /// Shorthand for `Hand::new(stacks, big_blind).start_new_hand(deck)`.
    pub fn start(stacks: [u64; 3], big_blind: u64, deck: Deck) -> Result<Hand, EngineError> {
        Hand::new(stacks, big_blind).start_new_hand(deck)
    }

    /// Deal a fresh hand from `deck`, carrying forward only chip stacks.
    ///
    /// A hand still in progress is abandoned: every seat gets back what it
    /// committed to it. Seats with no chips sit out as folded.
    pub fn start_new_hand(&self, deck: Deck) -> Result<Hand, EngineError> {
        let mut stacks = SeatId::ROSTER.map(|id| self.seats[id.index()].chips);
        if self.in_progress() {
            for s in &self.seats {
                stacks[s.id.index()] += s.contributed;
            }
        }
        let funded = stacks.iter().filter(|&&c| c > 0).count();
        if funded < 2 {
            return Err(ActionError::NotEnoughSeats.into());
        }

        let mut seats = SeatId::ROSTER.map(|id| Seat::new(id, stacks[id.index()]));
        let mut deck = deck;
        for seat in seats.iter_mut() {
            if seat.chips == 0 {
                seat.status = SeatStatus::Folded;
                continue;
            }
            let (hole, rest) = deck.deal(2).map_err(FatalError::from)?;
            seat.hole = Some([hole[0], hole[1]]);
            deck = rest;
        }

        let round = BettingRound::open(&seats, self.big_blind, self.big_blind);
        let next = Hand {
            deck,
            seats,
            community: Vec::new(),
            pot: 0,
            phase: Phase::PreflopBetting,
            round,
            big_blind: self.big_blind,
            resolution: None,
            history: Vec::new(),
            chip_total: self.chip_total,
        };
        Ok(next.checked(self)?)
    }

    /// Apply `action` for `seat`. Rejections leave `self` as it was and say why.
    pub fn apply(&self, seat: SeatId, action: Action) -> Result<Hand, EngineError> {
        match self.phase {
            Phase::Init => return Err(ActionError::NoHandInProgress.into()),
            Phase::Showdown => return Err(ActionError::HandOver.into()),
            _ if self.resolution.is_some() => return Err(ActionError::HandOver.into()),
            _ => {}
        }

        let mut next = self.clone();
        let applied = next.round.apply(&mut next.seats, seat, action)?;
        next.record_applied(seat, applied);

        if next.round.complete {
            next.close_round();
            let mut in_hand = next.seats.iter().filter(|s| !s.is_folded());
            if let (Some(last), None) = (in_hand.next(), in_hand.next()) {
                let last = last.id;
                next.award_fold_out(last);
            }
        }
        Ok(next.checked(self)?)
    }

    /// Move to the next phase once the current round is complete. Has no
    /// effect while betting is still open or after the hand is decided.
    pub fn advance_phase(&self) -> Result<Hand, FatalError> {
        if !self.phase.is_betting() || self.resolution.is_some() || !self.round.complete {
            return Ok(self.clone());
        }
        let mut next = self.clone();
        match self.phase {
            Phase::PreflopBetting => next.deal_community(3, Phase::PostflopBetting)?,
            Phase::PostflopBetting => next.deal_community(1, Phase::PostturnBetting)?,
            Phase::PostturnBetting => next.deal_community(1, Phase::PostriverBetting)?,
            Phase::PostriverBetting => {
                next.phase = Phase::Showdown;
                next.showdown()?;
            }
            Phase::Init | Phase::Showdown => {}
        }
        next.checked(self)
    }

    fn deal_community(&mut self, count: usize, phase: Phase) -> Result<(), FatalError> {
        let (cards, rest) = self.deck.deal(count)?;
        self.community.extend(cards);
        self.deck = rest;
        self.phase = phase;
        self.round = BettingRound::open(&self.seats, 0, self.big_blind);
        Ok(())
    }

    fn close_round(&mut self) {
        if let Some(refund) = betting::settle(&mut self.seats, &mut self.pot) {
            self.record(refund.seat, HistoryVerb::Return, Some(refund.amount));
        }
    }

    fn award_fold_out(&mut self, winner: SeatId) {
        let amount = self.pot;
        self.seats[winner.index()].chips += amount;
        self.pot = 0;
        self.record(winner, HistoryVerb::Win, Some(amount));
        self.round = BettingRound::closed(winner);
        self.resolution = Some(Resolution {
            winner: Winner::Single(winner),
            payouts: vec![(winner, amount)],
            ranks: Vec::new(),
            by_fold: true,
        });
    }

    fn showdown(&mut self) -> Result<(), FatalError> {
        let mut ranks: Vec<(SeatId, HandRank)> = Vec::new();
        for seat in self.seats.iter().filter(|s| !s.is_folded()) {
            let Some(hole) = seat.hole else { continue };
            let mut seven = self.community.clone();
            seven.extend_from_slice(&hole);
            let rank = best_of(&seven)
                .map_err(|source| InvariantViolation::Unevaluable { seat: seat.id, source })?;
            ranks.push((seat.id, rank));
        }

        let Some(best) = ranks.iter().map(|(_, r)| *r).max() else {
            return Err(InvariantViolation::NoContenders.into());
        };
        let winners: Vec<SeatId> =
            ranks.iter().filter(|(_, r)| *r == best).map(|(id, _)| *id).collect();

        let payouts = split_pot(self.pot, &winners);
        let verb = if winners.len() > 1 { HistoryVerb::Split } else { HistoryVerb::Win };
        for &(id, amount) in &payouts {
            self.seats[id.index()].chips += amount;
            self.record(id, verb, Some(amount));
        }
        self.pot = 0;
        self.round = BettingRound::closed(winners[0]);

        let winner = match winners.as_slice() {
            [only] => Winner::Single(*only),
            _ => Winner::Split(winners.clone()),
        };
        self.resolution = Some(Resolution { winner, payouts, ranks, by_fold: false });
        Ok(())
    }

    fn record_applied(&mut self, seat: SeatId, applied: Applied) {
        let (verb, amount) = match applied {
            Applied::Fold => (HistoryVerb::Fold, None),
            Applied::Check => (HistoryVerb::Check, None),
            Applied::Call { paid, all_in: false } => (HistoryVerb::Call, Some(paid)),
            Applied::RaiseTo { total, all_in: false } => (HistoryVerb::RaiseTo, Some(total)),
            Applied::Call { .. } | Applied::RaiseTo { .. } => {
                (HistoryVerb::AllIn, Some(self.seats[seat.index()].current_bet))
            }
        };
        self.record(seat, verb, amount);
    }

    fn record(&mut self, seat: SeatId, verb: HistoryVerb, amount: Option<u64>) {
        self.history.push(HistoryEntry { seat, verb, amount, phase: self.phase });
    }

    fn checked(self, prev: &Hand) -> Result<Hand, FatalError> {
        let result = prev.check_transition(&self).and_then(|()| self.verify());
        #[cfg(debug_assertions)]
        if let Err(violation) = &result {
            panic!("engine invariant violated: {violation}");
        }
        result?;
        Ok(self)
    }

    fn check_transition(&self, next: &Hand) -> Result<(), InvariantViolation> {
        let (from, to) = (self.phase, next.phase);
        let ok = from == to || from.next() == Some(to) || to == Phase::PreflopBetting;
        if ok {
            Ok(())
        } else {
            Err(InvariantViolation::PhaseOrder { from, to })
        }
    }

    /// Check chip conservation, card uniqueness, community count and the
    /// current actor. Runs after every transition in debug builds.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let actual: u64 =
            self.seats.iter().map(|s| s.chips + s.current_bet).sum::<u64>() + self.pot;
        if actual != self.chip_total {
            return Err(InvariantViolation::ChipsNotConserved {
                expected: self.chip_total,
                actual,
            });
        }

        let mut seen = HashSet::with_capacity(52);
        let holes = self.seats.iter().filter_map(|s| s.hole).flatten();
        let cards = self.deck.as_slice().iter().chain(self.community.iter()).copied().chain(holes);
        for card in cards {
            if !seen.insert(card) {
                return Err(InvariantViolation::DuplicateCard(card));
            }
        }
        if seen.len() != 52 {
            return Err(InvariantViolation::CardCount(seen.len()));
        }

        let expected = self.phase.community_len();
        if self.community.len() != expected {
            return Err(InvariantViolation::CommunityCount {
                phase: self.phase,
                expected,
                actual: self.community.len(),
            });
        }

        if !self.round.complete && !self.seats[self.round.current.index()].is_active() {
            return Err(InvariantViolation::ActorNotActive(self.round.current));
        }
        Ok(())
    }

    fn in_progress(&self) -> bool {
        self.phase.is_betting() && self.resolution.is_none()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seats(&self) -> &[Seat; 3] {
        &self.seats
    }

    pub fn seat(&self, id: SeatId) -> &Seat {
        &self.seats[id.index()]
    }

    pub fn community(&self) -> &[Card] {
        &self.community
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Chips swept from completed rounds.
    pub fn pot(&self) -> u64 {
        self.pot
    }

    /// Pot plus every bet still in front of a seat.
    pub fn pot_total(&self) -> u64 {
        self.pot + self.seats.iter().map(|s| s.current_bet).sum::<u64>()
    }

    pub fn round(&self) -> &BettingRound {
        &self.round
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.resolution.as_ref().map(|r| &r.winner)
    }

    pub fn is_over(&self) -> bool {
        self.resolution.is_some()
    }

    /// The seat whose action is awaited, if any.
    pub fn to_act(&self) -> Option<SeatId> {
        (self.in_progress() && !self.round.complete).then_some(self.round.current)
    }

    /// True when the round is closed and `advance_phase` would deal.
    pub fn can_advance(&self) -> bool {
        self.in_progress() && self.round.complete
    }

    /// Chips `seat` must add to call.
    pub fn to_call(&self, seat: SeatId) -> u64 {
        if !self.in_progress() {
            return 0;
        }
        self.round.owed(&self.seats[seat.index()])
    }

    /// Total chips at the table.
    pub fn chip_total(&self) -> u64 {
        self.chip_total
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

/// Even split with the remainder handed out one chip at a time in roster
/// order. `winners` must already be in roster order.
fn split_pot(pot: u64, winners: &[SeatId]) -> Vec<(SeatId, u64)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u64;
    let per = pot / n;
    let mut rem = pot % n;
    winners
        .iter()
        .map(|&id| {
            let extra = u64::from(rem > 0);
            rem -= extra;
            (id, per + extra)
        })
        .collect()
}
