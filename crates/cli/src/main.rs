use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{MovieRecord, RecordLine, load_json_lines, load_record_lines, write_json_lines};
use emotion::{EmotionEngine, EmotionRecord, EmotionRules, ScoreOutcome, TieBreak};
use pipeline::FilterPipeline;
use server::recommend::PAGE_SIZE;
use server::{MoodOrchestrator, MoodQuery, MovieVector, RecommendationMode, RecommendationPage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Mood Vectors - movie emotion scoring engine
#[derive(Parser)]
#[command(name = "mood-vectors")]
#[command(about = "Scores movies into mood vectors and recommends by mood", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreakArg {
    /// All-equal vectors normalize to 5.0 everywhere
    Flat,
    /// All-equal vectors get a small index ramp
    Ramp,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::Flat => TieBreak::Flat,
            TieBreakArg::Ramp => TieBreak::ramp(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score movie records into mood vectors
    Score {
        /// Input JSON Lines file of movie records
        #[arg(long)]
        input: PathBuf,

        /// Output JSON Lines file of mood vectors
        #[arg(long)]
        output: PathBuf,

        /// Drop low-quality records before scoring
        #[arg(long)]
        filter: bool,

        /// Custom rules file (JSON); defaults to the built-in rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Year used for the nostalgia boost (default: current year)
        #[arg(long)]
        reference_year: Option<i32>,

        /// How to normalize vectors whose raw scores are all equal
        #[arg(long, value_enum, default_value = "flat")]
        tie_break: TieBreakArg,
    },

    /// Apply the quality filters only
    Filter {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },

    /// Recommend movies for a mood from scored vectors
    Recommend {
        /// JSON Lines file produced by `score`
        #[arg(long)]
        vectors: PathBuf,

        /// Mood and intensity (0-10), e.g. --mood happy=8 (repeatable)
        #[arg(long = "mood", value_parser = parse_mood, required = true)]
        moods: Vec<(String, f64)>,

        /// Recommend movies that change the mood instead of matching it
        #[arg(long)]
        change: bool,

        #[arg(long, default_value = "1")]
        page: usize,

        /// Rules file used when scoring the vectors; defaults to the built-in rules
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// List the mood catalog
    Moods {
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Print the full rule set as JSON
        #[arg(long)]
        dump: bool,
    },

    /// Show the per-signal breakdown for one record
    Explain {
        #[arg(long)]
        input: PathBuf,

        /// Title to look for (case-insensitive substring match)
        #[arg(long)]
        title: String,

        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

/// Parse a `mood=intensity` pair
fn parse_mood(s: &str) -> std::result::Result<(String, f64), String> {
    let (mood, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MOOD=VALUE, got '{s}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid intensity '{value}'"))?;
    Ok((mood.trim().to_lowercase(), value))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            input,
            output,
            filter,
            rules,
            reference_year,
            tie_break,
        } => {
            let mut engine = load_engine(rules.as_deref())?.with_tie_break(tie_break.into());
            if let Some(year) = reference_year {
                engine = engine.with_reference_year(year);
            }
            handle_score(engine, &input, &output, filter).await?
        }
        Commands::Filter { input, output } => handle_filter(&input, &output)?,
        Commands::Recommend {
            vectors,
            moods,
            change,
            page,
            rules,
        } => handle_recommend(&vectors, moods, change, page, rules.as_deref()).await?,
        Commands::Moods { rules, dump } => handle_moods(rules.as_deref(), dump)?,
        Commands::Explain {
            input,
            title,
            rules,
        } => handle_explain(&input, &title, rules.as_deref())?,
    }

    Ok(())
}

fn load_rules(path: Option<&Path>) -> Result<EmotionRules> {
    match path {
        Some(path) => EmotionRules::from_json_file(path)
            .with_context(|| format!("Failed to load rules from {}", path.display())),
        None => Ok(EmotionRules::default()),
    }
}

fn load_engine(rules: Option<&Path>) -> Result<EmotionEngine> {
    let rules = load_rules(rules)?;
    EmotionEngine::new(&rules).context("Invalid rules")
}

fn load_lines(input: &Path) -> Result<Vec<RecordLine>> {
    println!("Loading movie records from {}...", input.display());
    let start = Instant::now();
    let lines = load_record_lines(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let malformed = lines.iter().filter(|l| l.is_err()).count();
    println!(
        "{} Loaded {} records in {:?}",
        "✓".green(),
        lines.len() - malformed,
        start.elapsed()
    );
    if malformed > 0 {
        println!("{}Malformed lines: {}", "• ".yellow(), malformed);
    }
    Ok(lines)
}

/// Load only the lines that parsed as records
fn load_records(input: &Path) -> Result<Vec<MovieRecord>> {
    let records = load_lines(input)?
        .into_iter()
        .filter_map(|line| match line {
            Ok(record) => Some(record),
            Err(bad) => {
                warn!("Skipping line {}: {}", bad.line, bad.reason);
                None
            }
        })
        .collect();
    Ok(records)
}

/// Handle the 'score' command
async fn handle_score(
    engine: EmotionEngine,
    input: &Path,
    output: &Path,
    filter: bool,
) -> Result<()> {
    let lines = load_lines(input)?;
    let orchestrator = MoodOrchestrator::new(Arc::new(engine));

    let report = orchestrator.process_lines(lines, filter).await?;

    let vectors: Vec<EmotionRecord> = report.results.iter().map(|r| r.record.clone()).collect();
    write_json_lines(output, &vectors)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{}", "Scoring summary:".bold().blue());
    println!("{}Input records: {}", "• ".green(), report.input_count);
    if filter {
        println!(
            "{}Filtered out: {} ({:?})",
            "• ".green(),
            report.filtered_out(),
            report.filter_time
        );
    }
    println!(
        "{}Scored: {} ({:?})",
        "• ".green(),
        report.summary.scored,
        report.score_time
    );
    if report.summary.fallback > 0 {
        println!("{}Fallbacks: {}", "• ".yellow(), report.summary.fallback);
        for result in &report.results {
            if let ScoreOutcome::Fallback { reason } = &result.outcome {
                println!("  - {}: {}", result.record.title, reason);
            }
        }
    }
    println!("{} Wrote {} vectors to {}", "✓".green(), vectors.len(), output.display());
    Ok(())
}

/// Handle the 'filter' command
fn handle_filter(input: &Path, output: &Path) -> Result<()> {
    let records = load_records(input)?;
    let total = records.len();

    let pipeline = FilterPipeline::upstream_defaults();
    let kept = pipeline.apply(records).context("Failed to apply filters")?;
    write_json_lines(output, &kept)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Kept {} of {} records ({})",
        "✓".green(),
        kept.len(),
        total,
        pipeline.filter_names().join(" → ")
    );
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    vectors: &Path,
    moods: Vec<(String, f64)>,
    change: bool,
    page: usize,
    rules: Option<&Path>,
) -> Result<()> {
    let movies: Vec<MovieVector> = load_json_lines(vectors)
        .with_context(|| format!("Failed to load {}", vectors.display()))?;
    info!("Loaded {} movie vectors", movies.len());

    let engine = load_engine(rules)?;
    let orchestrator = MoodOrchestrator::new(Arc::new(engine));

    let mode = if change {
        RecommendationMode::Change
    } else {
        RecommendationMode::Match
    };
    let query = MoodQuery::new(moods).with_mode(mode).with_page(page);

    let result = orchestrator.recommend(query, Arc::new(movies)).await?;
    print_recommendations(&result);
    Ok(())
}

/// Handle the 'moods' command
fn handle_moods(rules: Option<&Path>, dump: bool) -> Result<()> {
    let rules = load_rules(rules)?;
    if dump {
        println!("{}", rules.to_json_pretty()?);
        return Ok(());
    }

    let engine = EmotionEngine::new(&rules).context("Invalid rules")?;
    println!("{}", "Mood catalog:".bold().blue());
    for (i, mood) in engine.catalog().iter().enumerate() {
        println!(
            "{:>2}. {} (weight {:.2}, {} keywords, genres {:?})",
            i,
            mood.id.green(),
            mood.base_weight,
            mood.keywords.len(),
            mood.genre_ids
        );
    }
    Ok(())
}

/// Handle the 'explain' command
fn handle_explain(input: &Path, title: &str, rules: Option<&Path>) -> Result<()> {
    let engine = load_engine(rules)?;
    let records = load_records(input)?;

    let needle = title.to_lowercase();
    let record = records
        .iter()
        .find(|r| r.display_title().to_lowercase().contains(&needle))
        .ok_or_else(|| anyhow!("No record matching '{}'", title))?;

    let breakdown = engine.breakdown(record);
    let scored = engine.score_one(record);
    let moods = engine.catalog().ids();

    println!(
        "{}",
        format!("{} ({:?})", scored.record.title, scored.record.release_year)
            .bold()
            .blue()
    );
    for (name, contribution) in breakdown.signals() {
        if contribution.is_all_zero() {
            continue;
        }
        let parts: Vec<String> = moods
            .iter()
            .zip(contribution.as_slice())
            .filter(|(_, v)| **v != 0.0)
            .map(|(m, v)| format!("{m} {v:.3}"))
            .collect();
        println!("{}{}: {}", "• ".cyan(), name, parts.join(", "));
    }

    let raw = breakdown.raw();
    println!("{}", "Final vector:".bold());
    for ((mood, raw), value) in moods
        .iter()
        .zip(raw.as_slice())
        .zip(&scored.record.emotion_vector)
    {
        println!("  {:<12} raw {:>7.3} → {:>5.2}", mood, raw, value);
    }
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(page: &RecommendationPage) {
    println!(
        "{}",
        format!(
            "Mood Recommendations (page {}, {} matches):",
            page.page, page.total_matches
        )
        .bold()
        .blue()
    );
    if page.items.is_empty() {
        println!("No movies matched this mood.");
        return;
    }

    let offset = (page.page - 1) * PAGE_SIZE;
    for (i, rec) in page.items.iter().enumerate() {
        println!(
            "{}. {} ({}) - Similarity: {:.2}, Score: {:.2}",
            (offset + i + 1).to_string().green(),
            rec.title,
            rec.release_year.map(|y| y.to_string()).unwrap_or("????".to_string()),
            rec.similarity,
            rec.final_score
        );
        println!("   {}", rec.reason);
    }
    if page.has_more {
        println!("More results on page {}", page.page + 1);
    }
}
