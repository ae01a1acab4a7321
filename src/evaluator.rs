pub(crate) mod analysis;
pub(crate) mod combinations;

use crate::cards::{Card, Rank};
use analysis::HandAnalysis;
use combinations::Combinations7Choose5;
use core::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ranks that break ties inside a category, most significant first.
/// Only compared against keys of the same category, so lengths always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TiebreakKey {
    ranks: [Rank; 5],
    len: u8,
}

impl TiebreakKey {
    fn from_ranks(ranks: &[Rank]) -> Self {
        let mut out = [Rank::Two; 5];
        let len = ranks.len().min(5);
        out[..len].copy_from_slice(&ranks[..len]);
        Self { ranks: out, len: len as u8 }
    }

    pub fn as_slice(&self) -> &[Rank] {
        &self.ranks[..self.len as usize]
    }
}

impl Ord for TiebreakKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl PartialOrd for TiebreakKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of evaluating a hand. Ordering and equality look only at
/// `(category, tiebreak)`; `best_five` is carried for display.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct HandRank {
    pub category: Category,
    pub tiebreak: TiebreakKey,
    pub best_five: [Card; 5],
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category.cmp(&other.category).then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HandRank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HandRank {}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.category)?;
        for (i, c) in self.best_five.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", c.pretty())?;
        }
        f.write_str(")")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("expected {expected} cards, got {got}")]
    WrongCardCount { expected: usize, got: usize },
    #[error("duplicate card: {0}")]
    DuplicateCard(Card),
}

/// Evaluate exactly five cards: category plus tiebreak key.
pub fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    let a = HandAnalysis::new(cards);
    let best_five = a.display_order();
    let desc: Vec<Rank> = a.sorted.iter().map(|c| c.rank()).collect();

    let (category, key): (Category, Vec<Rank>) = match (a.is_flush, a.straight_top) {
        (true, Some(Rank::Ace)) => (Category::RoyalFlush, vec![Rank::Ace]),
        (true, Some(top)) => (Category::StraightFlush, vec![top]),
        _ => match a.groups.as_slice() {
            [(quad, 4), (kicker, 1)] => (Category::FourOfAKind, vec![*quad, *kicker]),
            [(trips, 3), (pair, 2)] => (Category::FullHouse, vec![*trips, *pair]),
            _ if a.is_flush => (Category::Flush, desc),
            _ if a.straight_top.is_some() => {
                (Category::Straight, a.straight_top.into_iter().collect())
            }
            [(trips, 3), ..] => {
                let mut key = vec![*trips];
                key.extend(a.ranks_with_count(1));
                (Category::ThreeOfAKind, key)
            }
            [(hi, 2), (lo, 2), (kicker, 1)] => (Category::TwoPair, vec![*hi, *lo, *kicker]),
            [(pair, 2), ..] => {
                let mut key = vec![*pair];
                key.extend(a.ranks_with_count(1));
                (Category::OnePair, key)
            }
            _ => (Category::HighCard, desc),
        },
    };

    HandRank { category, tiebreak: TiebreakKey::from_ranks(&key), best_five }
}

/// Best five-card hand out of seven: all 21 subsets, keep the maximum.
pub fn evaluate_seven(cards: &[Card; 7]) -> HandRank {
    let mut best: Option<HandRank> = None;
    for idx in Combinations7Choose5::new() {
        let hand = [cards[idx[0]], cards[idx[1]], cards[idx[2]], cards[idx[3]], cards[idx[4]]];
        let rank = evaluate_five(&hand);
        if best.as_ref().map_or(true, |b| rank > *b) {
            best = Some(rank);
        }
    }
    // the iterator always yields 21 subsets
    best.unwrap_or_else(|| evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]))
}

fn check_cards(cards: &[Card], expected: usize) -> Result<(), EvalError> {
    if cards.len() != expected {
        return Err(EvalError::WrongCardCount { expected, got: cards.len() });
    }
    let mut seen = HashSet::with_capacity(expected);
    for c in cards {
        if !seen.insert(*c) {
            return Err(EvalError::DuplicateCard(*c));
        }
    }
    Ok(())
}

/// Evaluate a hand of exactly five distinct cards.
///
/// ```
/// use holdem_trio::cards::parse_cards;
/// use holdem_trio::evaluator::{evaluate_hand, Category};
///
/// let royal = evaluate_hand(&parse_cards("As Ks Qs Js Ts").unwrap()).unwrap();
/// assert_eq!(royal.category, Category::RoyalFlush);
/// ```
pub fn evaluate_hand(cards: &[Card]) -> Result<HandRank, EvalError> {
    check_cards(cards, 5)?;
    Ok(evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]))
}

/// Best hand obtainable from exactly seven distinct cards.
///
/// ```
/// use holdem_trio::cards::parse_cards;
/// use holdem_trio::evaluator::{best_of, Category};
///
/// let seven = parse_cards("Ah Ad Qc Jd 9h 3s 2c").unwrap();
/// assert_eq!(best_of(&seven).unwrap().category, Category::OnePair);
/// ```
pub fn best_of(cards: &[Card]) -> Result<HandRank, EvalError> {
    check_cards(cards, 7)?;
    Ok(evaluate_seven(&[cards[0], cards[1], cards[2], cards[3], cards[4], cards[5], cards[6]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn eval(s: &str) -> HandRank {
        evaluate_hand(&parse_cards(s).unwrap()).unwrap()
    }

    #[test]
    fn categories_are_detected() {
        assert_eq!(eval("As Ks Qs Js Ts").category, Category::RoyalFlush);
        assert_eq!(eval("9s Ks Qs Js Ts").category, Category::StraightFlush);
        assert_eq!(eval("Kc Kd Kh Ks 2s").category, Category::FourOfAKind);
        assert_eq!(eval("Tc Td Th 2s 2h").category, Category::FullHouse);
        assert_eq!(eval("Ah 9h 7h 3h 2h").category, Category::Flush);
        assert_eq!(eval("Ac 2d 3h 4s 5c").category, Category::Straight);
        assert_eq!(eval("Qc Qd Qh 9s 2c").category, Category::ThreeOfAKind);
        assert_eq!(eval("Jc Jd 9c 9h 2s").category, Category::TwoPair);
        assert_eq!(eval("Ah Ad Ts 9c 2d").category, Category::OnePair);
        assert_eq!(eval("Ah Kd 7s 5c 2d").category, Category::HighCard);
    }

    #[test]
    fn tiebreak_keys_follow_category_shape() {
        assert_eq!(
            eval("Jc Jd 9c 9h 2s").tiebreak.as_slice(),
            &[Rank::Jack, Rank::Nine, Rank::Two]
        );
        assert_eq!(eval("9h 9d 9c Ks Kh").tiebreak.as_slice(), &[Rank::Nine, Rank::King]);
        assert_eq!(
            eval("Ah Ad Ts 9c 2d").tiebreak.as_slice(),
            &[Rank::Ace, Rank::Ten, Rank::Nine, Rank::Two]
        );
        assert_eq!(eval("Ac 2d 3h 4s 5c").tiebreak.as_slice(), &[Rank::Five]);
    }

    #[test]
    fn wheel_is_the_lowest_straight() {
        let wheel = eval("Ac 2d 3h 4s 5c");
        let six_high = eval("2c 3d 4h 5s 6c");
        assert!(wheel < six_high);
        assert!(wheel > eval("Ah Ad Ac Kd Qs"));
    }

    #[test]
    fn wheel_best_five_shows_ace_last() {
        let wheel = eval("Ac 2d 3h 4s 5c");
        assert_eq!(wheel.best_five[0].rank(), Rank::Five);
        assert_eq!(wheel.best_five[4].rank(), Rank::Ace);
    }

    #[test]
    fn equal_ranks_compare_equal_across_suits() {
        assert_eq!(eval("Ah Kd 7s 5c 2d"), eval("As Kh 7d 5h 2c"));
    }

    #[test]
    fn slice_entry_points_validate_input() {
        let four = parse_cards("As Ks Qs Js").unwrap();
        assert_eq!(
            evaluate_hand(&four).unwrap_err(),
            EvalError::WrongCardCount { expected: 5, got: 4 }
        );
        let dup = parse_cards("As As Qs Js Ts").unwrap();
        assert!(matches!(evaluate_hand(&dup), Err(EvalError::DuplicateCard(_))));
        let five = parse_cards("As Ks Qs Js Ts").unwrap();
        assert!(matches!(best_of(&five), Err(EvalError::WrongCardCount { expected: 7, .. })));
    }

    #[test]
    fn best_of_finds_the_board_straight() {
        let seven = parse_cards("2c 7d 9h Ts Jc Qd Kh").unwrap();
        let best = best_of(&seven).unwrap();
        assert_eq!(best.category, Category::Straight);
        assert_eq!(best.tiebreak.as_slice(), &[Rank::King]);
    }
}
