//! Validated, index-resolved rule tables.
//!
//! [`RuleSet::compile`] is the single place where rules are checked. After
//! it succeeds every mood reference is a catalog position and every weight is
//! finite, so the scorers can index without further checks. A `RuleSet` is
//! never mutated afterwards; the engine shares it read-only across threads.

use crate::error::{ConfigError, Result};
use crate::rules::{ContentWeights, EmotionRules, MoodWeights, SignalMultipliers};
use crate::scores::{IndexedWeights, MoodIndex};
use data_loader::{Genre, GenreId};
use std::collections::HashMap;
use tracing::debug;

/// One dimension of the emotion vector
#[derive(Debug, Clone, PartialEq)]
pub struct MoodDefinition {
    pub id: String,
    pub base_weight: f64,
    /// Lower-cased keywords, repeats preserved
    pub keywords: Vec<String>,
    pub genre_ids: Vec<GenreId>,
}

/// Ordered set of moods; the order is the output vector layout
#[derive(Debug, Clone)]
pub struct MoodCatalog {
    moods: Vec<MoodDefinition>,
    positions: HashMap<String, MoodIndex>,
}

impl MoodCatalog {
    pub fn len(&self) -> usize {
        self.moods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }

    /// Catalog position of a mood id
    pub fn index_of(&self, id: &str) -> Option<MoodIndex> {
        self.positions.get(id).copied()
    }

    pub fn get(&self, index: MoodIndex) -> Option<&MoodDefinition> {
        self.moods.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoodDefinition> {
        self.moods.iter()
    }

    /// Mood ids in catalog order
    pub fn ids(&self) -> Vec<&str> {
        self.moods.iter().map(|m| m.id.as_str()).collect()
    }

    fn resolve(&self, context: &str, mood: &str) -> Result<MoodIndex> {
        self.index_of(mood).ok_or_else(|| ConfigError::UnknownMood {
            context: context.to_string(),
            mood: mood.to_string(),
        })
    }

    fn resolve_weights(&self, context: &str, weights: &MoodWeights) -> Result<IndexedWeights> {
        weights
            .iter()
            .map(|(mood, &weight)| {
                check_finite(context, weight)?;
                Ok((self.resolve(context, mood)?, weight))
            })
            .collect()
    }
}

/// Bonus applied when every required genre is present
#[derive(Debug, Clone, PartialEq)]
pub struct GenreCombo {
    pub name: String,
    pub required: Vec<GenreId>,
    pub bonuses: IndexedWeights,
}

impl GenreCombo {
    /// True when all required genres appear in `genre_ids`
    pub fn matches(&self, genre_ids: &[GenreId]) -> bool {
        self.required.iter().all(|id| genre_ids.contains(id))
    }
}

/// Inclusive year range with its weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraRange {
    pub start: i32,
    pub end: i32,
    pub weight: f64,
}

impl EraRange {
    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// Era ranges grouped by mood, each group sorted and non-overlapping
#[derive(Debug, Clone, Default)]
pub struct EraWeightTable {
    by_mood: Vec<(MoodIndex, Vec<EraRange>)>,
}

impl EraWeightTable {
    pub fn iter(&self) -> impl Iterator<Item = (MoodIndex, &[EraRange])> {
        self.by_mood.iter().map(|(mood, ranges)| (*mood, ranges.as_slice()))
    }
}

/// Theme phrases for one mood
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeList {
    pub mood: MoodIndex,
    pub phrases: Vec<String>,
}

/// Keyword theme group fanning out to several moods
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordGroup {
    pub name: String,
    pub triggers: Vec<String>,
    pub moods: Vec<MoodIndex>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeTable {
    pub short: IndexedWeights,
    pub standard: IndexedWeights,
    pub long: IndexedWeights,
    pub epic: IndexedWeights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingTable {
    pub high: IndexedWeights,
    pub mid_high: IndexedWeights,
    pub mid: IndexedWeights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopularityTable {
    pub very_popular: IndexedWeights,
    pub moderately_popular: IndexedWeights,
    pub less_popular: IndexedWeights,
}

/// Every table the scorers read, validated and resolved to catalog indices
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub catalog: MoodCatalog,
    pub genre_emotions: HashMap<GenreId, IndexedWeights>,
    pub combinations: Vec<GenreCombo>,
    pub era: EraWeightTable,
    pub age_boost_mood: MoodIndex,
    pub text_themes: Vec<ThemeList>,
    pub keyword_themes: Vec<KeywordGroup>,
    pub runtime: RuntimeTable,
    pub rating: RatingTable,
    pub popularity: PopularityTable,
    pub content_weights: ContentWeights,
    pub multipliers: SignalMultipliers,
}

fn check_finite(context: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFiniteWeight {
            context: context.to_string(),
            value,
        })
    }
}

fn genre_id(context: &str, id: i64) -> Result<GenreId> {
    if id <= 0 {
        return Err(ConfigError::InvalidGenreId {
            context: context.to_string(),
            id,
        });
    }
    GenreId::try_from(id).map_err(|_| ConfigError::InvalidGenreId {
        context: context.to_string(),
        id,
    })
}

fn lowercased(list: &[String]) -> Vec<String> {
    list.iter().map(|s| s.to_lowercase()).collect()
}

fn build_catalog(rules: &EmotionRules) -> Result<MoodCatalog> {
    if rules.moods.is_empty() {
        return Err(ConfigError::EmptyCatalog);
    }

    let mut moods = Vec::with_capacity(rules.moods.len());
    let mut positions = HashMap::with_capacity(rules.moods.len());

    for spec in &rules.moods {
        let missing = |field: &'static str| ConfigError::MissingField {
            mood: spec.id.clone(),
            field,
        };
        let weight = spec.weight.ok_or_else(|| missing("weight"))?;
        let keywords = spec.keywords.as_ref().ok_or_else(|| missing("keywords"))?;
        let genres = spec.genres.as_ref().ok_or_else(|| missing("genres"))?;

        let context = format!("mood '{}'", spec.id);
        check_finite(&context, weight)?;
        let genre_ids = genres
            .iter()
            .map(|&id| genre_id(&context, id))
            .collect::<Result<Vec<_>>>()?;

        if positions.insert(spec.id.clone(), moods.len()).is_some() {
            return Err(ConfigError::DuplicateMood(spec.id.clone()));
        }
        moods.push(MoodDefinition {
            id: spec.id.clone(),
            base_weight: weight,
            keywords: lowercased(keywords),
            genre_ids,
        });
    }

    Ok(MoodCatalog { moods, positions })
}

fn build_era_table(rules: &EmotionRules, catalog: &MoodCatalog) -> Result<EraWeightTable> {
    let mut grouped: Vec<(MoodIndex, Vec<EraRange>)> = Vec::new();

    for entry in &rules.era_weights {
        let mood = catalog.resolve("era weights", &entry.mood)?;
        if entry.start > entry.end {
            return Err(ConfigError::InvalidEraRange {
                mood: entry.mood.clone(),
                start: entry.start,
                end: entry.end,
            });
        }
        check_finite("era weights", entry.weight)?;

        let range = EraRange {
            start: entry.start,
            end: entry.end,
            weight: entry.weight,
        };
        match grouped.iter_mut().find(|(m, _)| *m == mood) {
            Some((_, ranges)) => ranges.push(range),
            None => grouped.push((mood, vec![range])),
        }
    }

    for (mood, ranges) in &mut grouped {
        ranges.sort_by_key(|r| r.start);
        for pair in ranges.windows(2) {
            if pair[1].start <= pair[0].end {
                let name = catalog.get(*mood).map(|m| m.id.clone()).unwrap_or_default();
                return Err(ConfigError::OverlappingEraRanges {
                    mood: name,
                    first: (pair[0].start, pair[0].end),
                    second: (pair[1].start, pair[1].end),
                });
            }
        }
    }

    Ok(EraWeightTable { by_mood: grouped })
}

impl RuleSet {
    /// Validate rules and resolve every mood and genre reference
    ///
    /// Fails on the first problem found; see [`ConfigError`] for the checks.
    pub fn compile(rules: &EmotionRules) -> Result<Self> {
        let catalog = build_catalog(rules)?;

        let mut genre_emotions = HashMap::with_capacity(rules.genre_emotions.len());
        for (name, profile) in &rules.genre_emotions {
            let genre =
                Genre::from_name(name).ok_or_else(|| ConfigError::UnknownGenre(name.clone()))?;
            let context = format!("genre '{name}'");
            genre_emotions.insert(genre.id(), catalog.resolve_weights(&context, profile)?);
        }

        let combinations = rules
            .genre_combinations
            .iter()
            .map(|combo| {
                let context = format!("combination '{}'", combo.name);
                let required = combo
                    .genres
                    .iter()
                    .map(|&id| genre_id(&context, id))
                    .collect::<Result<Vec<_>>>()?;
                Ok(GenreCombo {
                    name: combo.name.clone(),
                    required,
                    bonuses: catalog.resolve_weights(&context, &combo.bonuses)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let era = build_era_table(rules, &catalog)?;
        let age_boost_mood = catalog.resolve("age boost", &rules.age_boost_mood)?;

        let text_themes = rules
            .text_themes
            .iter()
            .map(|theme| {
                Ok(ThemeList {
                    mood: catalog.resolve("text themes", &theme.mood)?,
                    phrases: lowercased(&theme.phrases),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let keyword_themes = rules
            .keyword_themes
            .iter()
            .map(|theme| {
                let context = format!("keyword theme '{}'", theme.name);
                Ok(KeywordGroup {
                    name: theme.name.clone(),
                    triggers: lowercased(&theme.triggers),
                    moods: theme
                        .moods
                        .iter()
                        .map(|m| catalog.resolve(&context, m))
                        .collect::<Result<Vec<_>>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let runtime = RuntimeTable {
            short: catalog.resolve_weights("runtime", &rules.runtime.short)?,
            standard: catalog.resolve_weights("runtime", &rules.runtime.standard)?,
            long: catalog.resolve_weights("runtime", &rules.runtime.long)?,
            epic: catalog.resolve_weights("runtime", &rules.runtime.epic)?,
        };
        let rating = RatingTable {
            high: catalog.resolve_weights("rating", &rules.rating.high)?,
            mid_high: catalog.resolve_weights("rating", &rules.rating.mid_high)?,
            mid: catalog.resolve_weights("rating", &rules.rating.mid)?,
        };
        let popularity = PopularityTable {
            very_popular: catalog.resolve_weights("popularity", &rules.popularity.very_popular)?,
            moderately_popular: catalog
                .resolve_weights("popularity", &rules.popularity.moderately_popular)?,
            less_popular: catalog.resolve_weights("popularity", &rules.popularity.less_popular)?,
        };

        let cw = rules.content_weights;
        for value in [cw.genre, cw.keyword, cw.atmosphere, cw.year] {
            check_finite("content weights", value)?;
        }
        let m = rules.multipliers;
        for value in [
            m.overview_keywords,
            m.overview_themes,
            m.tagline_keywords,
            m.tagline_themes,
            m.genre,
            m.keyword_theme,
            m.runtime,
            m.rating,
            m.popularity,
            m.age_boost,
        ] {
            check_finite("multipliers", value)?;
        }

        debug!(
            "Compiled {} moods, {} genre profiles, {} combinations",
            catalog.len(),
            genre_emotions.len(),
            combinations.len()
        );

        Ok(Self {
            catalog,
            genre_emotions,
            combinations,
            era,
            age_boost_mood,
            text_themes,
            keyword_themes,
            runtime,
            rating,
            popularity,
            content_weights: cw,
            multipliers: m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{EraWeightEntry, GenreCombination};

    #[test]
    fn test_reference_rules_compile() {
        let rules = RuleSet::compile(&EmotionRules::default()).unwrap();

        assert_eq!(rules.catalog.len(), 12);
        assert_eq!(rules.catalog.index_of("happy"), Some(0));
        assert_eq!(rules.catalog.index_of("energetic"), Some(11));
        assert_eq!(rules.genre_emotions.len(), 18);
        assert_eq!(rules.combinations.len(), 11);
        assert_eq!(rules.age_boost_mood, 7);
    }

    #[test]
    fn test_missing_mood_field() {
        let mut rules = EmotionRules::default();
        rules.moods[2].keywords = None;

        let err = RuleSet::compile(&rules).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingField {
                mood: "excited".to_string(),
                field: "keywords",
            }
        );
    }

    #[test]
    fn test_non_positive_genre_id() {
        let mut rules = EmotionRules::default();
        rules.moods[0].genres = Some(vec![35, 0]);
        assert!(matches!(
            RuleSet::compile(&rules),
            Err(ConfigError::InvalidGenreId { id: 0, .. })
        ));

        let mut rules = EmotionRules::default();
        rules.genre_combinations.push(GenreCombination {
            name: "broken".to_string(),
            genres: vec![28, -12],
            bonuses: MoodWeights::new(),
        });
        assert!(matches!(
            RuleSet::compile(&rules),
            Err(ConfigError::InvalidGenreId { id: -12, .. })
        ));
    }

    #[test]
    fn test_inverted_era_range() {
        let mut rules = EmotionRules::default();
        rules.era_weights.push(EraWeightEntry {
            mood: "happy".to_string(),
            start: 2000,
            end: 1990,
            weight: 0.1,
        });
        assert!(matches!(
            RuleSet::compile(&rules),
            Err(ConfigError::InvalidEraRange { start: 2000, end: 1990, .. })
        ));
    }

    #[test]
    fn test_overlapping_era_ranges() {
        let mut rules = EmotionRules::default();
        rules.era_weights.push(EraWeightEntry {
            mood: "sad".to_string(),
            start: 1975,
            end: 1990,
            weight: 0.1,
        });
        let err = RuleSet::compile(&rules).unwrap_err();
        assert_eq!(
            err,
            ConfigError::OverlappingEraRanges {
                mood: "sad".to_string(),
                first: (1961, 1980),
                second: (1975, 1990),
            }
        );
    }

    #[test]
    fn test_unknown_mood_reference() {
        let mut rules = EmotionRules::default();
        rules
            .runtime
            .short
            .insert("bored".to_string(), 0.2);
        assert!(matches!(
            RuleSet::compile(&rules),
            Err(ConfigError::UnknownMood { mood, .. }) if mood == "bored"
        ));
    }

    #[test]
    fn test_unknown_genre_and_duplicate_mood() {
        let mut rules = EmotionRules::default();
        rules
            .genre_emotions
            .insert("Sci-Fi".to_string(), MoodWeights::new());
        assert_eq!(
            RuleSet::compile(&rules).unwrap_err(),
            ConfigError::UnknownGenre("Sci-Fi".to_string())
        );

        let mut rules = EmotionRules::default();
        let copy = rules.moods[0].clone();
        rules.moods.push(copy);
        assert_eq!(
            RuleSet::compile(&rules).unwrap_err(),
            ConfigError::DuplicateMood("happy".to_string())
        );
    }

    #[test]
    fn test_empty_catalog_and_non_finite_weight() {
        let mut rules = EmotionRules::default();
        rules.moods.clear();
        assert_eq!(RuleSet::compile(&rules).unwrap_err(), ConfigError::EmptyCatalog);

        let mut rules = EmotionRules::default();
        rules.multipliers.genre = f64::NAN;
        assert!(matches!(
            RuleSet::compile(&rules),
            Err(ConfigError::NonFiniteWeight { .. })
        ));
    }

    #[test]
    fn test_combo_requires_all_genres() {
        let combo = GenreCombo {
            name: "epic_adventure".to_string(),
            required: vec![12, 28, 14],
            bonuses: vec![],
        };
        assert!(!combo.matches(&[12, 28]));
        assert!(combo.matches(&[14, 28, 12, 35]));
    }
}
