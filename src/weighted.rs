//! Cumulative-weight table sampled with a single uniform draw.

use rand::Rng;

#[derive(Clone, Debug)]
pub struct WeightedTable<T> {
    /// `(running total including this entry, value)`, zero weights dropped.
    entries: Vec<(u64, T)>,
    total: u64,
}

impl<T> WeightedTable<T> {
    /// Build from `(weight, value)` pairs. Returns `None` when every weight
    /// is zero.
    pub fn new(items: impl IntoIterator<Item = (u32, T)>) -> Option<Self> {
        let mut total = 0u64;
        let mut entries = Vec::new();
        for (weight, value) in items {
            if weight == 0 {
                continue;
            }
            total += u64::from(weight);
            entries.push((total, value));
        }
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries, total })
        }
    }

    /// A table that always yields `value`.
    pub fn single(value: T) -> Self {
        Self {
            entries: vec![(1, value)],
            total: 1,
        }
    }

    /// Map a draw in `[0, 1)` onto an entry. Out-of-range draws are clamped.
    pub fn pick(&self, unit: f64) -> &T {
        let target = (unit.clamp(0.0, 1.0) * self.total as f64) as u64;
        let idx = self
            .entries
            .partition_point(|(cumulative, _)| *cumulative <= target)
            .min(self.entries.len() - 1);
        &self.entries[idx].1
    }

    pub fn sample(&self, rng: &mut impl Rng) -> &T {
        self.pick(rng.gen::<f64>())
    }
}
