//! # Mood Recommender
//!
//! Ranks scored movies against a user's current mood.
//!
//! ## Algorithm
//! 1. Validate the query (known moods, intensities in [0, 10], page >= 1)
//! 2. In `Change` mode invert every intensity (`10 - v`)
//! 3. For every movie vector, compute a weighted cosine similarity:
//!    - user component = intensity / 10 for selected moods, 0 otherwise
//!    - movie component = score / 10
//!    - weight 2.5 for selected moods, 0.3 otherwise, halved again for an
//!      unselected mood the movie scores above 0.6
//! 4. Multiply by the opposite-mood penalty
//! 5. Blend with the audience rating: `0.7 * similarity + 0.3 * rating / 10`
//! 6. Keep similarity > 0.5, sort, paginate
//!
//! Ranking is deterministic: no shuffling or sampling.

use std::collections::BTreeMap;

use emotion::{EmotionRecord, MoodCatalog, MoodIndex};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound of a mood intensity
pub const MAX_INTENSITY: f64 = 10.0;

/// Results per page
pub const PAGE_SIZE: usize = 20;

/// Movies must be at least this similar to be recommended
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

const SELECTED_WEIGHT: f64 = 2.5;
const UNSELECTED_WEIGHT: f64 = 0.3;
const UNSELECTED_HIGH_VALUE: f64 = 0.6;
const OPPOSITE_THRESHOLD: f64 = 0.5;

const EMOTION_SHARE: f64 = 0.7;
const RATING_SHARE: f64 = 0.3;
const DEFAULT_RATING: f64 = 5.0;

/// Mood pairs where a strong second mood works against the first
const OPPOSITE_MOODS: [(&str, &str); 6] = [
    ("happy", "sad"),
    ("sad", "happy"),
    ("excited", "peaceful"),
    ("peaceful", "excited"),
    ("angry", "peaceful"),
    ("romantic", "angry"),
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("No moods selected")]
    EmptyMoodSet,

    #[error("Unknown mood '{0}'")]
    UnknownMood(String),

    #[error("Intensity for '{mood}' must be between 0 and 10, got {value}")]
    IntensityOutOfRange { mood: String, value: f64 },

    #[error("Page numbers start at 1")]
    InvalidPage,
}

pub type Result<T> = std::result::Result<T, RecommendError>;

/// Whether to match the user's mood or move them away from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMode {
    #[default]
    Match,
    Change,
}

/// A user's mood selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodQuery {
    /// Mood id to intensity in [0, 10]
    pub moods: BTreeMap<String, f64>,
    #[serde(default)]
    pub mode: RecommendationMode,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

impl MoodQuery {
    pub fn new(moods: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            moods: moods.into_iter().collect(),
            mode: RecommendationMode::Match,
            page: 1,
        }
    }

    pub fn with_mode(mut self, mode: RecommendationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

/// A scored movie, as read back from the scorer's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieVector {
    pub title: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    pub emotion_vector: Vec<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl From<EmotionRecord> for MovieVector {
    fn from(record: EmotionRecord) -> Self {
        Self {
            title: record.title,
            release_year: record.release_year,
            emotion_vector: record.emotion_vector,
            vote_average: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodRecommendation {
    pub title: String,
    pub release_year: Option<i32>,
    pub similarity: f64,
    pub final_score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationPage {
    pub page: usize,
    pub items: Vec<MoodRecommendation>,
    /// Matches above the threshold across all pages
    pub total_matches: usize,
    pub has_more: bool,
}

/// Validated query, resolved to catalog positions
struct ResolvedQuery {
    /// Per mood: `Some(intensity / 10)` when selected
    user: Vec<Option<f64>>,
    /// Opposites of the selected moods
    opposites: Vec<MoodIndex>,
}

/// Ranks movie vectors against mood queries
pub struct MoodRecommender {
    mood_ids: Vec<String>,
    /// Opposite mood for each mood that has one
    opposite_of: Vec<Option<MoodIndex>>,
    page_size: usize,
}

impl MoodRecommender {
    pub fn new(catalog: &MoodCatalog) -> Self {
        let mood_ids: Vec<String> = catalog.iter().map(|m| m.id.clone()).collect();
        let opposite_of = mood_ids
            .iter()
            .map(|id| {
                OPPOSITE_MOODS
                    .iter()
                    .find(|(mood, _)| mood == id)
                    .and_then(|(_, opposite)| catalog.index_of(opposite))
            })
            .collect();

        Self {
            mood_ids,
            opposite_of,
            page_size: PAGE_SIZE,
        }
    }

    /// Configure results per page (default: 20)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn mood_ids(&self) -> &[String] {
        &self.mood_ids
    }

    fn resolve(&self, query: &MoodQuery) -> Result<ResolvedQuery> {
        if query.page == 0 {
            return Err(RecommendError::InvalidPage);
        }
        if query.moods.is_empty() {
            return Err(RecommendError::EmptyMoodSet);
        }

        let mut user = vec![None; self.mood_ids.len()];
        let mut opposites = Vec::new();
        for (mood, &value) in &query.moods {
            let idx = self
                .mood_ids
                .iter()
                .position(|id| id == mood)
                .ok_or_else(|| RecommendError::UnknownMood(mood.clone()))?;
            if !(0.0..=MAX_INTENSITY).contains(&value) {
                return Err(RecommendError::IntensityOutOfRange {
                    mood: mood.clone(),
                    value,
                });
            }

            let value = match query.mode {
                RecommendationMode::Match => value,
                RecommendationMode::Change => MAX_INTENSITY - value,
            };
            user[idx] = Some(value / MAX_INTENSITY);
            if let Some(opposite) = self.opposite_of[idx] {
                opposites.push(opposite);
            }
        }
        Ok(ResolvedQuery { user, opposites })
    }

    /// Weighted cosine similarity between a resolved query and one movie,
    /// after the opposite-mood penalty
    fn similarity(&self, query: &ResolvedQuery, movie: &[f64]) -> f64 {
        let mut dot = 0.0;
        let mut user_mag = 0.0;
        let mut movie_mag = 0.0;

        for (selected, &score) in query.user.iter().zip(movie) {
            let m = score / MAX_INTENSITY;
            let (u, weight) = match selected {
                Some(u) => (*u, SELECTED_WEIGHT),
                None if m > UNSELECTED_HIGH_VALUE => (0.0, UNSELECTED_WEIGHT * 0.5),
                None => (0.0, UNSELECTED_WEIGHT),
            };
            dot += u * m * weight;
            user_mag += u * u * weight;
            movie_mag += m * m * weight;
        }

        let (user_mag, movie_mag) = (user_mag.sqrt(), movie_mag.sqrt());
        if user_mag == 0.0 || movie_mag == 0.0 {
            return 0.0;
        }
        dot / (user_mag * movie_mag) * self.opposite_penalty(query, movie)
    }

    fn opposite_penalty(&self, query: &ResolvedQuery, movie: &[f64]) -> f64 {
        query
            .opposites
            .iter()
            .map(|&idx| movie[idx] / MAX_INTENSITY)
            .filter(|o| *o > OPPOSITE_THRESHOLD)
            .fold(1.0, |penalty, o| penalty * (1.0 - (o - OPPOSITE_THRESHOLD)))
    }

    /// Rank `movies` for `query` and return the requested page
    pub fn recommend(
        &self,
        query: &MoodQuery,
        movies: &[MovieVector],
    ) -> Result<RecommendationPage> {
        let resolved = self.resolve(query)?;
        let expected = self.mood_ids.len();

        let skipped = movies
            .iter()
            .filter(|m| m.emotion_vector.len() != expected)
            .count();
        if skipped > 0 {
            warn!(
                "Skipping {} movie vectors without {} components",
                skipped, expected
            );
        }

        let mut matches: Vec<(f64, f64, &MovieVector)> = movies
            .par_iter()
            .filter(|m| m.emotion_vector.len() == expected)
            .filter_map(|movie| {
                let similarity = self.similarity(&resolved, &movie.emotion_vector);
                if similarity <= SIMILARITY_THRESHOLD {
                    return None;
                }
                let rating = movie.vote_average.unwrap_or(DEFAULT_RATING);
                let final_score =
                    similarity * EMOTION_SHARE + rating / MAX_INTENSITY * RATING_SHARE;
                Some((similarity, final_score, movie))
            })
            .collect();

        matches.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.total_cmp(&a.1)));
        debug!("{} of {} movies above threshold", matches.len(), movies.len());

        let total_matches = matches.len();
        let start = (query.page - 1).saturating_mul(self.page_size);
        let items = matches
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .map(|(similarity, final_score, movie)| MoodRecommendation {
                title: movie.title.clone(),
                release_year: movie.release_year,
                similarity,
                final_score,
                reason: recommendation_reason(
                    similarity,
                    query.mode,
                    movie.vote_average.unwrap_or(0.0),
                ),
            })
            .collect();

        Ok(RecommendationPage {
            page: query.page,
            items,
            total_matches,
            has_more: start.saturating_add(self.page_size) < total_matches,
        })
    }
}

/// Human-readable reason for a recommendation
///
/// Example: (0.93, Match, 7.8) -> "Perfect emotional match! (Highly Rated!)"
pub fn recommendation_reason(similarity: f64, mode: RecommendationMode, rating: f64) -> String {
    let percentage = (similarity * 100.0).round();
    let rating_text = if rating >= 7.5 {
        " (Highly Rated!)"
    } else if rating >= 6.5 {
        " (Well Rated)"
    } else {
        ""
    };

    let base = match mode {
        RecommendationMode::Match => {
            if percentage > 90.0 {
                "Perfect emotional match!"
            } else if percentage > 80.0 {
                "Strong emotional resonance"
            } else if percentage > 70.0 {
                "Matches your emotional state"
            } else if percentage > 60.0 {
                "Similar emotional tone"
            } else {
                "Emotionally aligned"
            }
        }
        RecommendationMode::Change => {
            if percentage > 90.0 {
                "Will transform your mood completely!"
            } else if percentage > 80.0 {
                "Perfect for mood change"
            } else if percentage > 70.0 {
                "Will shift your emotions"
            } else if percentage > 60.0 {
                "Can change your perspective"
            } else {
                "May alter your mood"
            }
        }
    };
    format!("{base}{rating_text}")
}
