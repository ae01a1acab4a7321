use crate::cards::Card;
use crate::evaluator::Category;
use crate::game::{Hand, HistoryEntry, Phase, Winner};
use crate::seat::{SeatId, SeatStatus};
use serde::Serialize;

/// A hole card as a UI collaborator is allowed to see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardView {
    FaceUp(Card),
    FaceDown,
}

impl CardView {
    pub fn card(self) -> Option<Card> {
        match self {
            CardView::FaceUp(c) => Some(c),
            CardView::FaceDown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct SeatView {
    pub id: SeatId,
    pub name: &'static str,
    pub is_human: bool,
    pub chips: u64,
    pub current_bet: u64,
    pub status: SeatStatus,
    pub hole: Option<[CardView; 2]>,
    pub to_call: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct ShownHand {
    pub seat: SeatId,
    pub category: Category,
    pub best_five: [Card; 5],
}

/// Everything about a hand that may be rendered. Non-human hole cards are
/// face down in every phase except `Showdown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct PublicState {
    pub hand_id: u64,
    pub phase: Phase,
    pub message: &'static str,
    pub seats: Vec<SeatView>,
    pub community: Vec<Card>,
    pub pot: u64,
    pub pot_total: u64,
    pub to_act: Option<SeatId>,
    pub highest_bet: u64,
    pub min_raise_to: u64,
    pub can_advance: bool,
    pub winner: Option<Winner>,
    pub payouts: Vec<(SeatId, u64)>,
    pub shown: Vec<ShownHand>,
    pub history: Vec<HistoryEntry>,
}

impl PublicState {
    pub fn of(hand: &Hand, hand_id: u64) -> Self {
        let reveal = hand.phase() == Phase::Showdown;
        let seats = hand
            .seats()
            .iter()
            .map(|s| {
                let visible = reveal || s.id().is_human();
                let hole = s.hole().map(|cards| {
                    cards.map(|c| if visible { CardView::FaceUp(c) } else { CardView::FaceDown })
                });
                SeatView {
                    id: s.id(),
                    name: s.id().name(),
                    is_human: s.id().is_human(),
                    chips: s.chips(),
                    current_bet: s.current_bet(),
                    status: s.status(),
                    hole,
                    to_call: hand.to_call(s.id()),
                }
            })
            .collect();

        let (payouts, shown) = match hand.resolution() {
            Some(res) => (
                res.payouts.clone(),
                res.ranks
                    .iter()
                    .map(|(seat, rank)| ShownHand {
                        seat: *seat,
                        category: rank.category,
                        best_five: rank.best_five,
                    })
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            hand_id,
            phase: hand.phase(),
            message: hand.phase().message(),
            seats,
            community: hand.community().to_vec(),
            pot: hand.pot(),
            pot_total: hand.pot_total(),
            to_act: hand.to_act(),
            highest_bet: hand.round().highest_bet(),
            min_raise_to: hand.round().min_raise_to(),
            can_advance: hand.can_advance(),
            winner: hand.winner().cloned(),
            payouts,
            shown,
            history: hand.history().to_vec(),
        }
    }

    pub fn seat(&self, id: SeatId) -> &SeatView {
        &self.seats[id.index()]
    }
}
