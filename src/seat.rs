use crate::cards::Card;
use serde::Serialize;
use std::fmt;

/// The three fixed participants, in roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatId {
    User,
    OpenAi,
    Claude,
}

impl SeatId {
    /// Fixed roster order. Turn order, scans and odd-chip awards all follow it.
    pub const ROSTER: [SeatId; 3] = [SeatId::User, SeatId::OpenAi, SeatId::Claude];

    pub const fn index(self) -> usize {
        match self {
            SeatId::User => 0,
            SeatId::OpenAi => 1,
            SeatId::Claude => 2,
        }
    }

    pub const fn from_index(i: usize) -> SeatId {
        SeatId::ROSTER[i % 3]
    }

    /// Seat after this one, wrapping.
    pub const fn next(self) -> SeatId {
        SeatId::from_index(self.index() + 1)
    }

    pub const fn is_human(self) -> bool {
        matches!(self, SeatId::User)
    }

    pub const fn name(self) -> &'static str {
        match self {
            SeatId::User => "You",
            SeatId::OpenAi => "OpenAI",
            SeatId::Claude => "Claude",
        }
    }

    /// Short key used in config files and logs.
    pub const fn key(self) -> &'static str {
        match self {
            SeatId::User => "user",
            SeatId::OpenAi => "openai",
            SeatId::Claude => "claude",
        }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SeatStatus {
    Active,
    Folded,
    AllIn,
}

/// One participant's state within a hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Seat {
    pub(crate) id: SeatId,
    pub(crate) chips: u64,
    pub(crate) hole: Option<[Card; 2]>,
    pub(crate) current_bet: u64,
    /// Everything committed this hand, including chips already swept.
    pub(crate) contributed: u64,
    pub(crate) status: SeatStatus,
    pub(crate) has_acted: bool,
}

impl Seat {
    pub(crate) fn new(id: SeatId, chips: u64) -> Self {
        Self {
            id,
            chips,
            hole: None,
            current_bet: 0,
            contributed: 0,
            status: SeatStatus::Active,
            has_acted: false,
        }
    }

    pub fn id(&self) -> SeatId {
        self.id
    }

    /// Chips behind, not counting the current bet.
    pub fn chips(&self) -> u64 {
        self.chips
    }

    pub fn hole(&self) -> Option<[Card; 2]> {
        self.hole
    }

    /// Chips put in front of the seat during the current betting round.
    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn contributed(&self) -> u64 {
        self.contributed
    }

    pub fn status(&self) -> SeatStatus {
        self.status
    }

    pub fn has_acted(&self) -> bool {
        self.has_acted
    }

    pub fn is_active(&self) -> bool {
        self.status == SeatStatus::Active
    }

    pub fn is_folded(&self) -> bool {
        self.status == SeatStatus::Folded
    }

    /// Move `amount` from chips to the current bet. Goes all-in when the
    /// stack runs out.
    pub(crate) fn commit(&mut self, amount: u64) {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.current_bet += paid;
        self.contributed += paid;
        if self.chips == 0 && self.status == SeatStatus::Active {
            self.status = SeatStatus::AllIn;
        }
    }
}
