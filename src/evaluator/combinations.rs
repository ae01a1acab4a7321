/// Iterator over all C(7,5) = 21 ways of choosing 5 indices out of 7, in
/// lexicographic order.
pub struct Combinations7Choose5 {
    indices: [usize; 5],
    yielded: usize,
    done: bool,
}

impl Combinations7Choose5 {
    pub const COUNT: usize = 21;

    pub fn new() -> Self {
        Self { indices: [0, 1, 2, 3, 4], yielded: 0, done: false }
    }
}

impl Default for Combinations7Choose5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Combinations7Choose5 {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.indices;
        self.yielded += 1;

        // Bump the rightmost index that still has room, then reset everything
        // to its right to the smallest ascending run.
        let mut i = 4;
        loop {
            if self.indices[i] < 7 - (5 - i) {
                self.indices[i] += 1;
                for j in (i + 1)..5 {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
        }

        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = if self.done { 0 } else { Self::COUNT - self.yielded };
        (left, Some(left))
    }
}

impl ExactSizeIterator for Combinations7Choose5 {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_21_distinct_ascending_combinations() {
        let combos: Vec<[usize; 5]> = Combinations7Choose5::new().collect();
        assert_eq!(combos.len(), Combinations7Choose5::COUNT);
        let mut seen = HashSet::new();
        for combo in &combos {
            assert!(combo.iter().all(|&i| i < 7));
            assert!(combo.windows(2).all(|w| w[0] < w[1]));
            assert!(seen.insert(*combo), "duplicate: {combo:?}");
        }
    }

    #[test]
    fn first_and_last_combinations() {
        let combos: Vec<[usize; 5]> = Combinations7Choose5::new().collect();
        assert_eq!(combos.first(), Some(&[0, 1, 2, 3, 4]));
        assert_eq!(combos.last(), Some(&[2, 3, 4, 5, 6]));
    }

    #[test]
    fn order_is_lexicographic() {
        let combos: Vec<[usize; 5]> = Combinations7Choose5::new().collect();
        assert!(combos.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn exact_size_tracks_progress() {
        let mut iter = Combinations7Choose5::new();
        assert_eq!(iter.len(), 21);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 19);
        for _ in 0..19 {
            assert!(iter.next().is_some());
        }
        assert_eq!(iter.len(), 0);
        assert!(iter.next().is_none());
    }
}
