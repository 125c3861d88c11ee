//! # Mood Vector Orchestrator
//!
//! This module coordinates a full scoring run:
//! 1. Optionally drop low-quality records with the filter pipeline
//! 2. Score the survivors into mood vectors
//! 3. Report counts and timings
//!
//! Input lines that failed to parse are scored as fallbacks in their
//! original position. The filters only see parsed records, so with
//! filtering on, malformed lines are dropped with the rest of the rejects.
//!
//! It also serves mood queries over an already-scored catalog.
//!
//! Both stages are CPU-bound (rayon inside), so they run on tokio's blocking
//! pool and never stall the async runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};

use data_loader::{MovieRecord, RecordLine};
use emotion::{BatchSummary, EmotionEngine, ScoredRecord};
use pipeline::FilterPipeline;

use crate::recommend::{MoodQuery, MoodRecommender, MovieVector, RecommendationPage};

/// Outcome of one scoring run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Lines received, malformed ones included
    pub input_count: usize,
    /// Records that reached the scorer
    pub scored_input_count: usize,
    pub summary: BatchSummary,
    pub filter_time: Duration,
    pub score_time: Duration,
    /// One entry per scored input record, in input order
    pub results: Vec<ScoredRecord>,
}

impl BatchReport {
    pub fn filtered_out(&self) -> usize {
        self.input_count - self.scored_input_count
    }
}

/// Main orchestrator that wires the filter pipeline, the engine and the
/// recommender together
#[derive(Clone)]
pub struct MoodOrchestrator {
    engine: Arc<EmotionEngine>,
    filter_pipeline: Arc<FilterPipeline>,
    recommender: Arc<MoodRecommender>,
}

impl MoodOrchestrator {
    /// Create an orchestrator with the standard pre-scoring filters
    pub fn new(engine: Arc<EmotionEngine>) -> Self {
        Self::with_filters(engine, Arc::new(FilterPipeline::upstream_defaults()))
    }

    pub fn with_filters(engine: Arc<EmotionEngine>, filter_pipeline: Arc<FilterPipeline>) -> Self {
        let recommender = Arc::new(MoodRecommender::new(engine.catalog()));
        Self {
            engine,
            filter_pipeline,
            recommender,
        }
    }

    pub fn engine(&self) -> &EmotionEngine {
        &self.engine
    }

    /// Filter (optionally) and score a batch of records
    pub async fn process(
        &self,
        records: Vec<MovieRecord>,
        apply_filter: bool,
    ) -> Result<BatchReport> {
        self.process_lines(records.into_iter().map(Ok).collect(), apply_filter).await
    }

    /// Filter (optionally) and score parsed input lines
    ///
    /// Without filtering, every line yields exactly one result.
    pub async fn process_lines(
        &self,
        lines: Vec<RecordLine>,
        apply_filter: bool,
    ) -> Result<BatchReport> {
        let input_count = lines.len();
        info!("Processing {} records (filter: {})", input_count, apply_filter);

        let filter_start = Instant::now();
        let lines: Vec<RecordLine> = if apply_filter {
            let (records, malformed): (Vec<_>, Vec<_>) =
                lines.into_iter().partition(|line| line.is_ok());
            if !malformed.is_empty() {
                warn!("Dropping {} malformed lines before filtering", malformed.len());
            }
            let records = records.into_iter().filter_map(|line| line.ok()).collect();
            self.apply_filters(records)
                .await?
                .into_iter()
                .map(Ok)
                .collect()
        } else {
            lines
        };
        let filter_time = filter_start.elapsed();
        let scored_input_count = lines.len();

        let score_start = Instant::now();
        let results = tokio::task::spawn_blocking({
            let engine = self.engine.clone();
            move || engine.score_lines(&lines)
        })
        .await
        .context("Scoring task panicked")?;
        let score_time = score_start.elapsed();

        let summary = BatchSummary::from_results(&results);
        info!(
            "Scored {} records ({} fallback) in {:.2?}",
            summary.total, summary.fallback, score_time
        );

        Ok(BatchReport {
            input_count,
            scored_input_count,
            summary,
            filter_time,
            score_time,
            results,
        })
    }

    async fn apply_filters(&self, records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>> {
        let input = records.len();
        let filtered = tokio::task::spawn_blocking({
            let pipeline = self.filter_pipeline.clone();
            move || pipeline.apply(records)
        })
        .await
        .context("Filter task panicked")?
        .context("Failed to apply filters")?;

        info!("Filtering complete, {} of {} records remain", filtered.len(), input);
        Ok(filtered)
    }

    /// Rank a scored catalog against a mood query
    pub async fn recommend(
        &self,
        query: MoodQuery,
        movies: Arc<Vec<MovieVector>>,
    ) -> Result<RecommendationPage> {
        let start = Instant::now();
        let page = tokio::task::spawn_blocking({
            let recommender = self.recommender.clone();
            move || recommender.recommend(&query, &movies)
        })
        .await
        .context("Recommendation task panicked")?
        .context("Invalid mood query")?;

        info!(
            "Found {} matches, returning page {} ({} items) in {:.2?}",
            page.total_matches,
            page.page,
            page.items.len(),
            start.elapsed()
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orchestrator() -> MoodOrchestrator {
        let engine = EmotionEngine::with_default_rules()
            .unwrap()
            .with_reference_year(2025);
        MoodOrchestrator::new(Arc::new(engine))
    }

    fn record(title: &str, genres: &str, vote_count: u64) -> MovieRecord {
        MovieRecord {
            genres: Some(genres.to_string()),
            vote_average: Some(7.0),
            vote_count: Some(vote_count),
            popularity: Some(20.0),
            runtime: Some(100.0),
            release_date: Some("2001-05-05".to_string()),
            ..MovieRecord::titled(title)
        }
    }

    #[tokio::test]
    async fn test_process_without_filter() {
        let orchestrator = orchestrator();
        let records = vec![
            record("A", "Comedy", 10),
            record("B", "Horror", 1000),
            MovieRecord::default(),
        ];

        let report = orchestrator.process(records, false).await.unwrap();
        assert_eq!(report.input_count, 3);
        assert_eq!(report.filtered_out(), 0);
        assert_eq!(report.summary.scored, 3);
        assert_eq!(report.results[1].record.title, "B");
    }

    #[tokio::test]
    async fn test_process_with_filter() {
        let orchestrator = orchestrator();
        let records = vec![
            record("Too Few Votes", "Comedy", 10),
            record("Kept", "Horror", 1000),
        ];

        let report = orchestrator.process(records, true).await.unwrap();
        assert_eq!(report.input_count, 2);
        assert_eq!(report.scored_input_count, 1);
        assert_eq!(report.results[0].record.title, "Kept");
    }

    #[tokio::test]
    async fn test_process_lines_keeps_malformed_in_place() {
        let orchestrator = orchestrator();
        let lines = data_loader::parse_record_lines(
            "{\"title\": \"First\", \"genres\": \"Comedy\"}\n\
             {\"title\": \"Second\", \"genres\":\n\
             {\"title\": \"Third\", \"genres\": \"Drama\"}\n",
        );

        let report = orchestrator.process_lines(lines, false).await.unwrap();
        assert_eq!(report.input_count, 3);
        assert_eq!(report.summary.scored, 2);
        assert_eq!(report.summary.fallback, 1);
        assert_eq!(report.results[0].record.title, "First");
        assert!(report.results[1].is_fallback());
        assert_eq!(report.results[2].record.title, "Third");
    }

    #[tokio::test]
    async fn test_filter_drops_malformed_lines() {
        let orchestrator = orchestrator();
        let mut lines = data_loader::parse_record_lines("not json\n");
        lines.push(Ok(record("Kept", "Horror", 1000)));

        let report = orchestrator.process_lines(lines, true).await.unwrap();
        assert_eq!(report.input_count, 2);
        assert_eq!(report.filtered_out(), 1);
        assert_eq!(report.summary.fallback, 0);
        assert_eq!(report.results[0].record.title, "Kept");
    }

    #[tokio::test]
    async fn test_recommend_uses_the_scoring_catalog() {
        let mut rules = emotion::EmotionRules::default();
        rules.moods.push(emotion::rules::MoodSpec {
            id: "wistful".to_string(),
            weight: Some(0.5),
            keywords: Some(vec!["longing".to_string()]),
            genres: Some(vec![18]),
        });
        let engine = EmotionEngine::new(&rules).unwrap().with_reference_year(2025);
        let custom = MoodOrchestrator::new(Arc::new(engine));

        let cheerful = MovieRecord {
            genres: Some("Comedy".to_string()),
            ..MovieRecord::titled("Cheerful")
        };
        let report = custom.process(vec![cheerful], false).await.unwrap();
        let vectors: Vec<MovieVector> = report
            .results
            .into_iter()
            .map(|r| MovieVector::from(r.record))
            .collect();
        assert_eq!(vectors[0].emotion_vector.len(), 13);
        let vectors = Arc::new(vectors);

        let query = MoodQuery::new([("happy".to_string(), 9.0)]);
        let page = custom.recommend(query.clone(), vectors.clone()).await.unwrap();
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.items[0].title, "Cheerful");

        // A recommender over the built-in catalog cannot read 13-mood vectors
        let page = orchestrator().recommend(query, vectors).await.unwrap();
        assert_eq!(page.total_matches, 0);
    }

    #[tokio::test]
    async fn test_recommend_rejects_bad_query() {
        let orchestrator = orchestrator();
        let query = MoodQuery::new([("bored".to_string(), 5.0)]);
        let result = orchestrator.recommend(query, Arc::new(Vec::new())).await;
        assert!(result.is_err());
    }
}
