use super::{Decision, DecisionProvider, DecisionRequest, ProviderError};
use crate::cards::{Card, Rank};
use crate::evaluator::{evaluate_five, evaluate_seven, Category, HandRank};
use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;

/// Tunables for the local provider.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct HeuristicProfile {
    /// A call is cheap at or below this share of the stack.
    pub cheap_call: f64,
    /// A bet is large above this share of the stack.
    pub large_bet: f64,
    /// Raise size as a share of the pot, on top of the current bet.
    pub raise_pot: f64,
    /// Chance of playing a hand two points stronger than it is.
    pub bluff: f64,
    pub rng_seed: Option<u64>,
}

impl HeuristicProfile {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_bluff(mut self, bluff: f64) -> Self {
        self.bluff = bluff.clamp(0.0, 1.0);
        self
    }
}

impl Default for HeuristicProfile {
    fn default() -> Self {
        Self { cheap_call: 0.05, large_bet: 0.25, raise_pot: 0.5, bluff: 0.05, rng_seed: None }
    }
}

/// Decides from a 1-10 hand-strength score:
/// 1-3 fold unless the call is cheap, 4-6 call unless the bet is large,
/// 7-10 raise by about half the pot.
pub struct HeuristicProvider {
    name: String,
    profile: HeuristicProfile,
    rng: Mutex<ChaCha8Rng>,
}

impl HeuristicProvider {
    pub fn new(name: impl Into<String>, profile: HeuristicProfile) -> Self {
        let seed = profile.rng_seed.unwrap_or_else(|| rand::rng().random());
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self { name: name.into(), profile, rng: Mutex::new(rng) }
    }

    fn choose(&self, req: &DecisionRequest, score: u8) -> Decision {
        let stack = req.own_chips.max(1) as f64;
        let cheap = req.amount_to_call == 0
            || (req.amount_to_call as f64) <= stack * self.profile.cheap_call;
        let large = (req.amount_to_call as f64) > stack * self.profile.large_bet;

        match score {
            0..=3 if cheap => Decision::Call,
            0..=3 => Decision::Fold,
            4..=6 if large => Decision::Fold,
            4..=6 => Decision::Call,
            _ => match raise_target(req, self.profile.raise_pot) {
                Some(target) => Decision::Raise(target),
                None => Decision::Call,
            },
        }
    }
}

#[async_trait]
impl DecisionProvider for HeuristicProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, ProviderError> {
        let mut score = strength_score(&request.hole_cards, &request.community_cards);
        let bluff = {
            let mut rng = self.rng.lock().map_err(|e| ProviderError::Transport(e.to_string()))?;
            rng.random::<f64>() < self.profile.bluff
        };
        if bluff {
            score = (score + 2).min(10);
        }
        tracing::debug!(provider = %self.name, score, bluff, "heuristic decision");
        Ok(self.choose(request, score))
    }
}

fn raise_target(req: &DecisionRequest, pot_share: f64) -> Option<u64> {
    let max = req.max_raise_to();
    if max <= req.highest_bet {
        return None;
    }
    let sized = req.highest_bet + ((req.pot as f64) * pot_share).round() as u64;
    Some(sized.max(req.min_raise_to).min(max))
}

/// Hand strength from 1 (trash) to 10 (near the nuts).
pub fn strength_score(hole: &[Card], board: &[Card]) -> u8 {
    let mut cards = hole.to_vec();
    cards.extend_from_slice(board);
    match best_available(&cards) {
        Some(rank) => made_hand_score(&rank),
        None => preflop_score(hole),
    }
}

fn preflop_score(hole: &[Card]) -> u8 {
    let [a, b] = match hole {
        [a, b] => [*a, *b],
        _ => return 1,
    };
    let (hi, lo) = if a.rank() >= b.rank() { (a.rank(), b.rank()) } else { (b.rank(), a.rank()) };
    if hi == lo {
        return (5 + (hi.value() - 2) / 3).min(10);
    }
    let mut score = 1 + (hi.value() - 2) / 4;
    if a.suit() == b.suit() {
        score += 1;
    }
    if hi.value() - lo.value() == 1 {
        score += 1;
    }
    if hi.is_broadway() && lo.is_broadway() {
        score += 1;
    }
    score.clamp(1, 10)
}

fn made_hand_score(rank: &HandRank) -> u8 {
    let top = rank.tiebreak.as_slice().first().copied().unwrap_or(Rank::Two);
    match rank.category {
        Category::HighCard if top >= Rank::Queen => 2,
        Category::HighCard => 1,
        Category::OnePair if top >= Rank::Jack => 5,
        Category::OnePair => 4,
        Category::TwoPair => 6,
        Category::ThreeOfAKind => 7,
        Category::Straight | Category::Flush => 8,
        Category::FullHouse => 9,
        _ => 10,
    }
}

fn best_available(cards: &[Card]) -> Option<HandRank> {
    match cards.len() {
        5 => {
            let arr: [Card; 5] = cards.try_into().ok()?;
            Some(evaluate_five(&arr))
        }
        6 => (0..6)
            .map(|skip| {
                let mut five = [cards[0]; 5];
                let rest = cards.iter().enumerate().filter(|&(i, _)| i != skip);
                for (slot, (_, card)) in rest.enumerate() {
                    five[slot] = *card;
                }
                evaluate_five(&five)
            })
            .max(),
        7 => {
            let arr: [Card; 7] = cards.try_into().ok()?;
            Some(evaluate_seven(&arr))
        }
        _ => None,
    }
}
