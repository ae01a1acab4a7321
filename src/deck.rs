use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Cards drawn per hand at most: three seats of hole cards plus the board.
pub const MAX_CARDS_PER_HAND: usize = 3 * 2 + 5;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("insufficient cards: requested {requested}, {remaining} remaining")]
    InsufficientCards { requested: usize, remaining: usize },
}

/// Ordered sequence of the cards not yet dealt this hand. Dealing takes
/// from the front and yields a new, shorter deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The 52 distinct cards in a fixed, unshuffled order.
    ///
    /// ```
    /// use holdem_trio::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &s in &Suit::ALL {
            for &r in &Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        Self { cards }
    }

    /// A freshly shuffled 52-card deck.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        // Fisher-Yates via SliceRandom
        deck.cards.shuffle(rng);
        deck
    }

    /// Reproducible shuffle for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Build a deck whose front is `top` (in order), followed by the rest of
    /// the standard deck. Used to stack deals in tests and replays.
    /// A card repeated in `top` keeps only its first position.
    pub fn stacked(top: &[Card]) -> Self {
        let mut cards: Vec<Card> = Vec::with_capacity(52);
        for &card in top {
            if !cards.contains(&card) {
                cards.push(card);
            }
        }
        let rest: Vec<Card> =
            Self::standard().cards.into_iter().filter(|c| !cards.contains(c)).collect();
        cards.extend(rest);
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Take `count` cards from the front. The receiver is untouched; the
    /// remaining deck is returned alongside the dealt cards.
    ///
    /// ```
    /// use holdem_trio::deck::Deck;
    ///
    /// let deck = Deck::seeded(7);
    /// let (flop, rest) = deck.deal(3).unwrap();
    /// assert_eq!(flop.len(), 3);
    /// assert_eq!(rest.len(), 49);
    /// assert_eq!(&deck.as_slice()[..3], flop.as_slice());
    /// ```
    pub fn deal(&self, count: usize) -> Result<(Vec<Card>, Deck), DeckError> {
        if count > self.cards.len() {
            return Err(DeckError::InsufficientCards {
                requested: count,
                remaining: self.cards.len(),
            });
        }
        let dealt = self.cards[..count].to_vec();
        let rest = Deck { cards: self.cards[count..].to_vec() };
        Ok((dealt, rest))
    }
}
