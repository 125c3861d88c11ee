//! Raw score normalization.
//!
//! ## Algorithm
//! 1. An all-zero vector stays all zero
//! 2. If every component is equal (and non-zero), apply the [`TieBreak`]
//!    policy
//! 3. Standardize with the population mean and standard deviation
//!    (a zero deviation is treated as 1)
//! 4. Map through the logistic sigmoid, scale to 0-10, round to 2 decimals
//!
//! The sigmoid is monotonic, so the mood ordering of the raw vector is
//! preserved (up to rounding).

use serde::{Deserialize, Serialize};

/// Upper bound of a normalized component
pub const SCALE_MAX: f64 = 10.0;

/// What to do with a non-zero vector whose components are all equal
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum TieBreak {
    /// Leave the vector alone; every component normalizes to 5.0
    #[default]
    Flat,
    /// Add `epsilon * index` to each component so earlier moods rank lower
    IndexRamp { epsilon: f64 },
}

impl TieBreak {
    /// Default epsilon used by `IndexRamp` when none is configured
    pub const DEFAULT_EPSILON: f64 = 0.001;

    pub fn ramp() -> Self {
        TieBreak::IndexRamp {
            epsilon: Self::DEFAULT_EPSILON,
        }
    }

    fn apply(self, raw: &[f64]) -> Vec<f64> {
        match self {
            TieBreak::Flat => raw.to_vec(),
            TieBreak::IndexRamp { epsilon } => raw
                .iter()
                .enumerate()
                .map(|(i, v)| v + epsilon * i as f64)
                .collect(),
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Normalize a raw score vector onto the 0-10 scale
///
/// Example: `[0.0, 0.0]` -> `[0.0, 0.0]`,
///          `[1.0, 1.0]` (flat) -> `[5.0, 5.0]`
pub fn normalize(raw: &[f64], tie_break: TieBreak) -> Vec<f64> {
    if raw.is_empty() || raw.iter().all(|v| *v == 0.0) {
        return vec![0.0; raw.len()];
    }

    let all_equal = raw.windows(2).all(|w| w[0] == w[1]);
    let values = if all_equal {
        tie_break.apply(raw)
    } else {
        raw.to_vec()
    };

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = match variance.sqrt() {
        s if s == 0.0 => 1.0,
        s => s,
    };

    values
        .iter()
        .map(|v| round2(sigmoid((v - mean) / std) * SCALE_MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vector_stays_zero() {
        assert_eq!(normalize(&[0.0; 4], TieBreak::Flat), vec![0.0; 4]);
        assert_eq!(normalize(&[0.0; 4], TieBreak::ramp()), vec![0.0; 4]);
        assert!(normalize(&[], TieBreak::Flat).is_empty());
    }

    #[test]
    fn test_flat_tie_break() {
        assert_eq!(normalize(&[0.7, 0.7, 0.7], TieBreak::Flat), vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_index_ramp_tie_break() {
        let out = normalize(&[0.7, 0.7, 0.7], TieBreak::IndexRamp { epsilon: 0.01 });
        assert!(out[0] < out[1] && out[1] < out[2]);
        assert_eq!(out[1], 5.0);

        // Only applied to exact ties
        let distinct = [0.1, 0.5, 0.3];
        assert_eq!(
            normalize(&distinct, TieBreak::IndexRamp { epsilon: 1.0 }),
            normalize(&distinct, TieBreak::Flat)
        );
    }

    #[test]
    fn test_order_preserved_and_bounded() {
        let raw = [0.0, 2.5, 0.3, 1.1, 0.05, 7.0];
        let out = normalize(&raw, TieBreak::Flat);
        assert_eq!(out.len(), raw.len());

        for v in &out {
            assert!(*v > 0.0 && *v < SCALE_MAX, "{v} out of range");
        }
        for i in 0..raw.len() {
            for j in 0..raw.len() {
                if raw[i] > raw[j] {
                    assert!(out[i] >= out[j]);
                }
            }
        }
    }

    #[test]
    fn test_known_values() {
        // mean 1, std 1 -> z = -1, 1
        let out = normalize(&[0.0, 2.0], TieBreak::Flat);
        assert_eq!(out, vec![2.69, 7.31]);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(7.3105857), 7.31);
        assert_eq!(round2(2.689414), 2.69);
        assert_eq!(round2(5.0), 5.0);
    }
}
