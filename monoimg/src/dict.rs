use std::cmp::Reverse;

use crate::{Dictionary, DICTIONARY_MAX_LEN};

/// Byte-value counts over every packed frame of a run, plus the order in
/// which distinct values were first seen. That order breaks count ties, so
/// the whole run has to visit its inputs deterministically for the
/// dictionary to be reproducible.
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: [u64; 256],
    order: Vec<u8>,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            counts: [0; 256],
            order: Vec::new(),
        }
    }

    pub fn accumulate(&mut self, packed: &[u8]) {
        for b in packed {
            if self.counts[*b as usize] == 0 {
                self.order.push(*b);
            }

            self.counts[*b as usize] += 1;
        }
    }

    pub fn count(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Distinct values sorted by descending count, first-encounter ties.
    pub fn by_frequency(&self) -> Vec<u8> {
        let mut values = self.order.clone();

        // stable sort keeps first-encounter order within equal counts
        values.sort_by_key(|v| Reverse(self.count(*v)));

        values
    }
}

impl Dictionary {
    /// The first `min(12, distinct)` values of the frequency ordering.
    pub fn build(histogram: &Histogram) -> Self {
        let mut values = histogram.by_frequency();

        values.truncate(DICTIONARY_MAX_LEN);

        Self::from_values(values)
    }
}
