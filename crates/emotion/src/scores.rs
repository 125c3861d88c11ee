//! Per-record mood accumulator.

/// Position of a mood in the catalog (and in every vector)
pub type MoodIndex = usize;

/// Sparse weights already resolved to catalog positions
pub type IndexedWeights = Vec<(MoodIndex, f64)>;

/// Dense mood scores, positionally aligned with the mood catalog.
///
/// Every sub-scorer returns one of these, and the aggregator sums them into a
/// fresh one per record. Nothing here is shared between records.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodScores {
    values: Vec<f64>,
}

impl MoodScores {
    /// All-zero scores for a catalog of `len` moods
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, mood: MoodIndex) -> f64 {
        self.values[mood]
    }

    pub fn add(&mut self, mood: MoodIndex, amount: f64) {
        self.values[mood] += amount;
    }

    /// Add `weight * scale` for every entry of a sparse weight map
    pub fn add_weights(&mut self, weights: &[(MoodIndex, f64)], scale: f64) {
        for &(mood, weight) in weights {
            self.values[mood] += weight * scale;
        }
    }

    /// Add another score vector, multiplied by `scale`
    pub fn merge(&mut self, other: &MoodScores, scale: f64) {
        for (acc, value) in self.values.iter_mut().zip(&other.values) {
            *acc += value * scale;
        }
    }

    /// Copy scaled by `scale`
    pub fn scaled(&self, scale: f64) -> MoodScores {
        MoodScores {
            values: self.values.iter().map(|v| v * scale).collect(),
        }
    }

    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Index and value of the highest score (first one on ties)
    pub fn argmax(&self) -> Option<(MoodIndex, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (idx, value)| match best {
                Some((_, top)) if top >= value => best,
                _ => Some((idx, value)),
            })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}
