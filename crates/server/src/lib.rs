//! Server crate for the mood vector engine.
//!
//! This crate contains the orchestrator that runs filtering and scoring on
//! the blocking pool, and the recommender that ranks scored movies against
//! a user's mood.

pub mod orchestrator;
pub mod recommend;

pub use orchestrator::{BatchReport, MoodOrchestrator};
pub use recommend::{
    MoodQuery, MoodRecommendation, MoodRecommender, MovieVector, RecommendError,
    RecommendationMode, RecommendationPage,
};
