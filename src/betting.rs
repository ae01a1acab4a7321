use crate::seat::{Seat, SeatId, SeatStatus};
use serde::Serialize;
use std::fmt;

/// A validated seat action. Amounts are raise-*to* totals for the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum Action {
    Fold,
    /// Match the highest bet (a check when nothing is owed).
    Call,
    RaiseTo(u64),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("Fold"),
            Action::Call => f.write_str("Call"),
            Action::RaiseTo(n) => write!(f, "Raise to {n}"),
        }
    }
}

/// Why an action or command was refused. State is unchanged whenever one of
/// these is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("it is {expected}'s turn, not {got}'s")]
    NotYourTurn { expected: SeatId, got: SeatId },
    #[error("{0} cannot act: folded or all-in")]
    SeatNotActive(SeatId),
    #[error("raise to {amount} does not exceed the current bet of {highest}")]
    BelowCurrentBet { highest: u64, amount: u64 },
    #[error("raise to {amount} is below the minimum of {min}")]
    BelowMinimum { min: u64, amount: u64 },
    #[error("raise to {amount} exceeds the {max} chips available")]
    ExceedsChips { max: u64, amount: u64 },
    #[error("the betting round is closed")]
    BettingClosed,
    #[error("the hand is over")]
    HandOver,
    #[error("no hand in progress")]
    NoHandInProgress,
    #[error("at least two seats need chips to start a hand")]
    NotEnoughSeats,
    #[error("waiting for {0} to decide")]
    DecisionPending(SeatId),
}

/// What an accepted action did, for the move history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Applied {
    Fold,
    Check,
    Call { paid: u64, all_in: bool },
    RaiseTo { total: u64, all_in: bool },
}

/// Chips handed back to the sole top bettor when a round closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refund {
    pub seat: SeatId,
    pub amount: u64,
}

/// State of one betting phase: whose turn it is and what has to be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct BettingRound {
    pub(crate) current: SeatId,
    pub(crate) complete: bool,
    pub(crate) highest_bet: u64,
    pub(crate) last_raise: u64,
}

impl BettingRound {
    /// Open a round. `seed_bet` is the amount everyone owes before acting
    /// (the big blind preflop, zero afterwards); `min_raise` is the opening
    /// raise increment.
    pub(crate) fn open(seats: &[Seat; 3], seed_bet: u64, min_raise: u64) -> Self {
        let current = SeatId::ROSTER
            .into_iter()
            .find(|id| seats[id.index()].is_active())
            .unwrap_or(SeatId::User);
        let complete = round_complete(seats, seed_bet);
        Self { current, complete, highest_bet: seed_bet, last_raise: min_raise.max(1) }
    }

    /// A round that accepts no actions, used once the hand is decided.
    pub(crate) fn closed(current: SeatId) -> Self {
        Self { current, complete: true, highest_bet: 0, last_raise: 0 }
    }

    pub fn current(&self) -> SeatId {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn highest_bet(&self) -> u64 {
        self.highest_bet
    }

    /// Smallest legal non-all-in raise-to total.
    pub fn min_raise_to(&self) -> u64 {
        self.highest_bet + self.last_raise
    }

    /// What `seat` still owes to stay in.
    pub fn owed(&self, seat: &Seat) -> u64 {
        self.highest_bet.saturating_sub(seat.current_bet)
    }

    /// Validate and apply one action. Every check happens before the first
    /// mutation, so a rejection leaves `self` and `seats` untouched.
    pub(crate) fn apply(
        &mut self,
        seats: &mut [Seat; 3],
        who: SeatId,
        action: Action,
    ) -> Result<Applied, ActionError> {
        if self.complete {
            return Err(ActionError::BettingClosed);
        }
        if who != self.current {
            return Err(ActionError::NotYourTurn { expected: self.current, got: who });
        }
        if !seats[who.index()].is_active() {
            return Err(ActionError::SeatNotActive(who));
        }

        let applied = match action {
            Action::Fold => self.fold(seats, who),
            Action::Call => self.call(seats, who),
            Action::RaiseTo(amount) => self.raise_to(seats, who, amount)?,
        };

        self.complete = round_complete(seats, self.highest_bet);
        if !self.complete {
            if let Some(next) = next_actor(seats, who, self.highest_bet) {
                self.current = next;
            } else {
                self.complete = true;
            }
        }
        Ok(applied)
    }

    fn fold(&mut self, seats: &mut [Seat; 3], who: SeatId) -> Applied {
        let seat = &mut seats[who.index()];
        seat.status = SeatStatus::Folded;
        seat.has_acted = true;
        Applied::Fold
    }

    fn call(&mut self, seats: &mut [Seat; 3], who: SeatId) -> Applied {
        let owed = self.owed(&seats[who.index()]);
        let seat = &mut seats[who.index()];
        seat.has_acted = true;
        if owed == 0 {
            return Applied::Check;
        }
        let before = seat.chips;
        seat.commit(owed);
        Applied::Call { paid: before - seat.chips, all_in: seat.status == SeatStatus::AllIn }
    }

    fn raise_to(
        &mut self,
        seats: &mut [Seat; 3],
        who: SeatId,
        amount: u64,
    ) -> Result<Applied, ActionError> {
        let seat = &seats[who.index()];
        let max = seat.chips + seat.current_bet;
        if amount <= self.highest_bet {
            return Err(ActionError::BelowCurrentBet { highest: self.highest_bet, amount });
        }
        if amount > max {
            return Err(ActionError::ExceedsChips { max, amount });
        }
        let all_in = amount == max;
        let min = self.min_raise_to();
        if amount < min && !all_in {
            return Err(ActionError::BelowMinimum { min, amount });
        }

        let seat = &mut seats[who.index()];
        seat.commit(amount - seat.current_bet);
        seat.has_acted = true;
        // a short all-in raise does not grow the raise increment
        let increment = amount - self.highest_bet;
        if increment >= self.last_raise {
            self.last_raise = increment;
        }
        self.highest_bet = amount;
        Ok(Applied::RaiseTo { total: amount, all_in })
    }
}

/// Round-completion predicate.
///
/// Complete when at most one seat is still in the hand, when every ACTIVE
/// seat has acted and matched `highest_bet`, or when at most one ACTIVE seat
/// is left and it already matches (there is nobody left to bet against).
pub fn round_complete(seats: &[Seat; 3], highest_bet: u64) -> bool {
    let in_hand = seats.iter().filter(|s| !s.is_folded()).count();
    if in_hand <= 1 {
        return true;
    }
    let active: Vec<&Seat> = seats.iter().filter(|s| s.is_active()).collect();
    if active.iter().all(|s| s.has_acted && s.current_bet == highest_bet) {
        return true;
    }
    matches!(active.as_slice(), [only] if only.current_bet == highest_bet)
}

/// First seat after `from` (wrapping, roster order) that is ACTIVE and
/// either has not acted this round or still owes chips.
pub(crate) fn next_actor(seats: &[Seat; 3], from: SeatId, highest_bet: u64) -> Option<SeatId> {
    (1..=3).map(|step| SeatId::from_index(from.index() + step)).find(|id| {
        let s = &seats[id.index()];
        s.is_active() && (!s.has_acted || s.current_bet < highest_bet)
    })
}

/// Close out a completed round: hand back any uncalled excess to the sole
/// top bettor, sweep every current bet into `pot`, clear `has_acted`.
pub(crate) fn settle(seats: &mut [Seat; 3], pot: &mut u64) -> Option<Refund> {
    let refund = uncalled_excess(seats);
    if let Some(r) = refund {
        let seat = &mut seats[r.seat.index()];
        seat.current_bet -= r.amount;
        seat.contributed -= r.amount;
        seat.chips += r.amount;
        if seat.status == SeatStatus::AllIn {
            seat.status = SeatStatus::Active;
        }
    }
    for seat in seats.iter_mut() {
        *pot += seat.current_bet;
        seat.current_bet = 0;
        seat.has_acted = false;
    }
    refund
}

fn uncalled_excess(seats: &[Seat; 3]) -> Option<Refund> {
    let mut bets: Vec<(u64, SeatId)> = seats.iter().map(|s| (s.current_bet, s.id)).collect();
    bets.sort_by(|a, b| b.0.cmp(&a.0));
    let (top, seat) = bets[0];
    let second = bets[1].0;
    (top > second).then_some(Refund { seat, amount: top - second })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(chips: [u64; 3]) -> [Seat; 3] {
        SeatId::ROSTER.map(|id| Seat::new(id, chips[id.index()]))
    }

    #[test]
    fn all_in_seat_is_settled_for_completion() {
        let mut s = seats([980, 980, 0]);
        s[0].current_bet = 20;
        s[1].current_bet = 20;
        s[0].has_acted = true;
        s[1].has_acted = true;
        s[2].status = SeatStatus::AllIn;
        assert!(round_complete(&s, 20));

        s[1].has_acted = false;
        assert!(!round_complete(&s, 20));
    }

    #[test]
    fn one_seat_left_completes() {
        let mut s = seats([1000; 3]);
        s[1].status = SeatStatus::Folded;
        s[2].status = SeatStatus::Folded;
        assert!(round_complete(&s, 20));
    }

    #[test]
    fn lone_active_seat_must_still_match() {
        let mut s = seats([1000, 0, 1000]);
        s[1].status = SeatStatus::AllIn;
        s[1].current_bet = 300;
        s[2].status = SeatStatus::Folded;
        s[0].current_bet = 100;
        s[0].has_acted = true;
        assert!(!round_complete(&s, 300));
        s[0].current_bet = 300;
        assert!(round_complete(&s, 300));
    }

    #[test]
    fn open_round_starts_with_first_active_seat() {
        let mut s = seats([1000; 3]);
        s[0].status = SeatStatus::Folded;
        let round = BettingRound::open(&s, 20, 20);
        assert_eq!(round.current(), SeatId::OpenAi);
        assert!(!round.is_complete());
        assert_eq!(round.min_raise_to(), 40);
    }

    #[test]
    fn rejected_action_leaves_state_unchanged() {
        let mut s = seats([1000; 3]);
        let mut round = BettingRound::open(&s, 20, 20);
        let before = (round.clone(), s.clone());

        let err = round.apply(&mut s, SeatId::Claude, Action::Call).unwrap_err();
        assert_eq!(err, ActionError::NotYourTurn { expected: SeatId::User, got: SeatId::Claude });
        let err = round.apply(&mut s, SeatId::User, Action::RaiseTo(20)).unwrap_err();
        assert_eq!(err, ActionError::BelowCurrentBet { highest: 20, amount: 20 });
        let err = round.apply(&mut s, SeatId::User, Action::RaiseTo(30)).unwrap_err();
        assert_eq!(err, ActionError::BelowMinimum { min: 40, amount: 30 });
        let err = round.apply(&mut s, SeatId::User, Action::RaiseTo(1001)).unwrap_err();
        assert_eq!(err, ActionError::ExceedsChips { max: 1000, amount: 1001 });

        assert_eq!((round, s), before);
    }

    #[test]
    fn short_all_in_raise_is_allowed_but_keeps_increment() {
        let mut s = seats([1000, 35, 1000]);
        let mut round = BettingRound::open(&s, 20, 20);
        round.apply(&mut s, SeatId::User, Action::Call).unwrap();
        let applied = round.apply(&mut s, SeatId::OpenAi, Action::RaiseTo(35)).unwrap();
        assert_eq!(applied, Applied::RaiseTo { total: 35, all_in: true });
        assert_eq!(round.highest_bet(), 35);
        assert_eq!(round.min_raise_to(), 55);
        assert_eq!(s[1].status(), SeatStatus::AllIn);
    }

    #[test]
    fn partial_call_goes_all_in() {
        let mut s = seats([1000, 1000, 15]);
        let mut round = BettingRound::open(&s, 20, 20);
        round.apply(&mut s, SeatId::User, Action::Call).unwrap();
        round.apply(&mut s, SeatId::OpenAi, Action::Call).unwrap();
        let applied = round.apply(&mut s, SeatId::Claude, Action::Call).unwrap();
        assert_eq!(applied, Applied::Call { paid: 15, all_in: true });
        assert!(round.is_complete());
    }

    #[test]
    fn raise_reopens_action_for_earlier_callers() {
        let mut s = seats([1000; 3]);
        let mut round = BettingRound::open(&s, 20, 20);
        round.apply(&mut s, SeatId::User, Action::Call).unwrap();
        round.apply(&mut s, SeatId::OpenAi, Action::RaiseTo(60)).unwrap();
        round.apply(&mut s, SeatId::Claude, Action::Call).unwrap();
        assert!(!round.is_complete());
        assert_eq!(round.current(), SeatId::User);
        round.apply(&mut s, SeatId::User, Action::Call).unwrap();
        assert!(round.is_complete());
    }

    #[test]
    fn settle_returns_uncalled_excess_and_sweeps() {
        let mut s = seats([1000, 1000, 1000]);
        s[0].commit(60);
        s[1].commit(40);
        s[1].status = SeatStatus::Folded;
        s[2].commit(20);
        let mut pot = 0;
        let refund = settle(&mut s, &mut pot);
        assert_eq!(refund, Some(Refund { seat: SeatId::User, amount: 20 }));
        assert_eq!(pot, 40 + 40 + 20);
        assert_eq!(s[0].chips(), 960);
        assert!(s.iter().all(|seat| seat.current_bet() == 0 && !seat.has_acted()));
    }

    #[test]
    fn refunded_all_in_seat_becomes_active() {
        let mut s = seats([100, 1000, 1000]);
        s[0].commit(100);
        s[1].commit(40);
        s[2].status = SeatStatus::Folded;
        assert_eq!(s[0].status(), SeatStatus::AllIn);
        let mut pot = 0;
        settle(&mut s, &mut pot);
        assert_eq!(s[0].status(), SeatStatus::Active);
        assert_eq!(s[0].chips(), 60);
        assert_eq!(pot, 80);
    }
}
