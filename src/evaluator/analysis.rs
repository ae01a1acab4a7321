use crate::cards::{Card, Rank};

/// Facts about a five-card hand that every category check needs. Built once
/// per hand.
#[derive(Debug, Clone)]
pub(crate) struct HandAnalysis {
    /// Cards by rank descending, suit descending.
    pub sorted: [Card; 5],
    /// `(rank, count)` ordered by count descending, then rank descending.
    pub groups: Vec<(Rank, u8)>,
    pub is_flush: bool,
    /// Top rank of the straight, `Five` for the wheel.
    pub straight_top: Option<Rank>,
}

impl HandAnalysis {
    pub fn new(cards: &[Card; 5]) -> Self {
        let mut sorted = *cards;
        sorted.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));

        let mut counts = [0u8; 15];
        for c in &sorted {
            counts[c.rank().value() as usize] += 1;
        }
        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .rev()
            .filter_map(|&r| {
                let n = counts[r.value() as usize];
                (n > 0).then_some((r, n))
            })
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        let is_flush = sorted.iter().all(|c| c.suit() == sorted[0].suit());
        let straight_top = straight_top(&sorted);

        Self { sorted, groups, is_flush, straight_top }
    }

    /// Ranks appearing exactly `n` times, highest first.
    pub fn ranks_with_count(&self, n: u8) -> Vec<Rank> {
        self.groups.iter().filter(|(_, c)| *c == n).map(|(r, _)| *r).collect()
    }

    /// Cards ordered for display: the wheel shows the ace last.
    pub fn display_order(&self) -> [Card; 5] {
        if self.straight_top == Some(Rank::Five) {
            let mut out = self.sorted;
            out.rotate_left(1);
            return out;
        }
        self.sorted
    }
}

// Naive `max - min == 4` misses A-2-3-4-5, so the wheel is matched explicitly.
fn straight_top(sorted: &[Card; 5]) -> Option<Rank> {
    let r: Vec<u8> = sorted.iter().map(|c| c.rank().value()).collect();
    if r.windows(2).all(|w| w[0] == w[1] + 1) {
        return Some(sorted[0].rank());
    }
    if r == [14, 5, 4, 3, 2] {
        return Some(Rank::Five);
    }
    None
}
