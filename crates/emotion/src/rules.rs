//! Hand-authored scoring rules.
//!
//! [`EmotionRules`] is the serializable description of every table the
//! engine reads: the mood catalog, genre profiles, combination bonuses, era
//! weights, text themes, keyword theme groups, the scalar buckets and the
//! merge multipliers. `EmotionRules::default()` is the reference rule set.
//!
//! Rules are plain data. Nothing here is validated; that happens once when
//! the rules are compiled into a [`RuleSet`](crate::catalog::RuleSet).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Sparse mood → weight map, keyed by mood id
pub type MoodWeights = BTreeMap<String, f64>;

/// One entry of the mood catalog.
///
/// The three payload fields are optional at the serde level so that a rules
/// file missing one of them is reported as a [`ConfigError::MissingField`]
/// naming the mood, instead of a bare JSON error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSpec {
    pub id: String,
    /// Base weight applied to keyword matches in free text
    pub weight: Option<f64>,
    /// Keywords searched for (as substrings) in overview and tagline
    pub keywords: Option<Vec<String>>,
    /// Genre ids associated with the mood
    pub genres: Option<Vec<i64>>,
}

/// A bonus that fires when every genre in `genres` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCombination {
    pub name: String,
    pub genres: Vec<i64>,
    pub bonuses: MoodWeights,
}

/// Inclusive year range contributing `weight` to `mood`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraWeightEntry {
    pub mood: String,
    pub start: i32,
    pub end: i32,
    pub weight: f64,
}

/// Theme phrases counted in overview and tagline text for one mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextTheme {
    pub mood: String,
    pub phrases: Vec<String>,
}

/// A keyword theme group: keyword entries containing any trigger count
/// towards every mood in `moods`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTheme {
    pub name: String,
    pub triggers: Vec<String>,
    pub moods: Vec<String>,
}

/// Runtime bucket weights (`<80`, `80-120`, `121-150`, `>150` minutes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeRules {
    pub short: MoodWeights,
    pub standard: MoodWeights,
    pub long: MoodWeights,
    pub epic: MoodWeights,
}

/// Effective-rating bucket weights (`>=6.5`, `[6.2, 6.5)`, `[6.0, 6.2)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRules {
    pub high: MoodWeights,
    pub mid_high: MoodWeights,
    pub mid: MoodWeights,
}

/// Popularity bucket weights (`>=100`, `[50, 100)`, below 50)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularityRules {
    pub very_popular: MoodWeights,
    pub moderately_popular: MoodWeights,
    pub less_popular: MoodWeights,
}

/// Per-content-type weights used inside the sub-scorers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentWeights {
    pub genre: f64,
    pub keyword: f64,
    pub atmosphere: f64,
    pub year: f64,
}

impl Default for ContentWeights {
    fn default() -> Self {
        Self {
            genre: 0.45,
            keyword: 0.35,
            atmosphere: 0.2,
            year: 0.4,
        }
    }
}

/// Multipliers applied when a signal is merged into the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalMultipliers {
    pub overview_keywords: f64,
    pub overview_themes: f64,
    pub tagline_keywords: f64,
    pub tagline_themes: f64,
    pub genre: f64,
    pub keyword_theme: f64,
    pub runtime: f64,
    pub rating: f64,
    pub popularity: f64,
    /// Maximum nostalgia boost for a film 100 or more years old
    pub age_boost: f64,
}

impl Default for SignalMultipliers {
    fn default() -> Self {
        Self {
            overview_keywords: 1.2,
            overview_themes: 0.35,
            tagline_keywords: 0.8,
            tagline_themes: 0.25,
            genre: 1.3,
            keyword_theme: 0.2,
            runtime: 0.4,
            rating: 0.5,
            popularity: 0.3,
            age_boost: 0.5,
        }
    }
}

/// The complete rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionRules {
    /// Ordered mood catalog; defines the output vector layout
    pub moods: Vec<MoodSpec>,
    /// Genre name → mood weights
    pub genre_emotions: BTreeMap<String, MoodWeights>,
    pub genre_combinations: Vec<GenreCombination>,
    pub era_weights: Vec<EraWeightEntry>,
    /// Mood receiving the age-based nostalgia boost
    pub age_boost_mood: String,
    pub text_themes: Vec<TextTheme>,
    pub keyword_themes: Vec<KeywordTheme>,
    pub runtime: RuntimeRules,
    pub rating: RatingRules,
    pub popularity: PopularityRules,
    #[serde(default)]
    pub content_weights: ContentWeights,
    #[serde(default)]
    pub multipliers: SignalMultipliers,
}

impl EmotionRules {
    /// Parse rules from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Load rules from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Pretty JSON rendering, handy as a starting point for an override file
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}

// =============================================================================
// Reference rules
// =============================================================================

fn weights(pairs: &[(&str, f64)]) -> MoodWeights {
    pairs.iter().map(|&(mood, w)| (mood.to_string(), w)).collect()
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn mood(id: &str, weight: f64, keywords: &[&str], genres: &[i64]) -> MoodSpec {
    MoodSpec {
        id: id.to_string(),
        weight: Some(weight),
        keywords: Some(words(keywords)),
        genres: Some(genres.to_vec()),
    }
}

fn combination(name: &str, genres: &[i64], bonuses: &[(&str, f64)]) -> GenreCombination {
    GenreCombination {
        name: name.to_string(),
        genres: genres.to_vec(),
        bonuses: weights(bonuses),
    }
}

fn era(mood: &str, start: i32, end: i32, weight: f64) -> EraWeightEntry {
    EraWeightEntry {
        mood: mood.to_string(),
        start,
        end,
        weight,
    }
}

fn keyword_theme(name: &str, triggers: &[&str], moods: &[&str]) -> KeywordTheme {
    KeywordTheme {
        name: name.to_string(),
        triggers: words(triggers),
        moods: words(moods),
    }
}

fn reference_moods() -> Vec<MoodSpec> {
    // Keyword lists are kept exactly as authored, repeats included.
    vec![
        mood(
            "happy",
            0.4,
            &[
                "joy", "happiness", "cheerful", "uplifting", "fun", "comedy", "laugh",
                "celebration", "triumph", "delight", "pleasure", "jubilant", "merry",
                "optimistic", "playful", "joyous", "festive", "entertaining", "amusing",
                "light-hearted",
            ],
            &[35, 16, 10751],
        ),
        mood(
            "sad",
            0.45,
            &[
                "sorrow", "grief", "melancholy", "tragic", "emotional", "drama",
                "heartbreak", "loss", "depression", "despair", "suffering", "pain",
                "loneliness", "regret", "mourning", "bittersweet", "tearjerker",
                "devastating", "poignant", "moving", "death", "sacrifice", "farewell",
                "goodbye", "crying", "tears", "sadness", "tragedy", "holocaust",
                "dying", "terminal", "illness", "separation", "divorce",
                "funeral", "grieving", "trauma", "ptsd", "suicide", "depression",
                "abandonment", "orphan", "widow", "bereavement", "misery",
                "heartache", "anguish", "desolation", "melancholy", "somber",
            ],
            &[18, 10752, 36],
        ),
        mood(
            "excited",
            0.4,
            &[
                "thrill", "suspense", "action", "intense", "epic", "spectacular",
                "adrenaline", "explosive", "dynamic", "gripping", "shocking",
                "surprising", "dramatic", "climactic", "exhilarating", "riveting",
                "heart-pounding", "breathtaking", "electrifying", "stunning",
            ],
            &[28, 53],
        ),
        mood(
            "romantic",
            0.4,
            &[
                "love", "romance", "passion", "relationship", "emotional",
                "affection", "intimate", "tender", "heartwarming", "chemistry",
                "romantic comedy", "love story", "soulmate", "destiny", "attraction",
                "romantic drama", "dating", "marriage", "courtship", "devotion",
            ],
            &[10749],
        ),
        mood(
            "angry",
            0.3,
            &[
                "violence", "conflict", "intense", "dark", "gritty",
                "revenge", "rage", "hatred", "brutal", "aggressive",
                "vengeance", "fury", "confrontation", "hostile", "fierce",
                "ruthless", "violent", "savage", "merciless", "vindictive",
            ],
            &[10752, 27],
        ),
        mood(
            "peaceful",
            0.3,
            &[
                "calm", "gentle", "relaxing", "soothing", "harmony",
                "tranquil", "serene", "peaceful", "meditative", "quiet",
                "contemplative", "zen", "balanced", "natural", "comforting",
                "healing", "spiritual", "mindful", "therapeutic", "restful",
            ],
            &[10751, 10402],
        ),
        mood(
            "curious",
            0.4,
            &[
                "mystery", "discovery", "exploration", "science", "wonder",
                "investigation", "research", "experiment", "quest", "search",
                "revelation", "enigma", "puzzle", "intrigue", "fascinating",
                "mysterious", "unknown", "secrets", "discovery", "learning",
            ],
            &[9648, 878],
        ),
        mood(
            "nostalgic",
            0.35,
            &[
                "classic", "retro", "memory", "historical", "vintage",
                "reminiscent", "throwback", "childhood", "tradition", "heritage",
                "old-fashioned", "timeless", "memorable", "sentimental", "retrospective",
                "bygone era", "nostalgia", "remembrance", "past", "legacy",
            ],
            &[36, 37],
        ),
        mood(
            "adventurous",
            0.4,
            &[
                "adventure", "journey", "quest", "exploration", "discovery",
                "expedition", "voyage", "travel", "wilderness", "survival",
                "challenge", "daring", "heroic", "brave", "bold",
                "risk-taking", "courageous", "intrepid", "fearless", "valiant",
            ],
            &[12, 14],
        ),
        mood(
            "hopeful",
            0.3,
            &[
                "inspiring", "optimistic", "uplifting", "motivational",
                "encouraging", "positive", "aspiring", "promising", "faith",
                "determination", "perseverance", "triumph", "achievement", "dream",
                "ambition", "success", "overcome", "inspiration", "courage", "belief",
            ],
            &[],
        ),
        mood(
            "thoughtful",
            0.35,
            &[
                "philosophical", "deep", "meaningful", "thought-provoking",
                "intellectual", "complex", "profound", "analytical", "reflective",
                "contemplative", "insightful", "psychological", "perspective",
                "understanding", "wisdom", "moral", "ethical", "introspective",
                "enlightening", "consciousness",
            ],
            &[99, 18],
        ),
        mood(
            "energetic",
            0.35,
            &[
                "dynamic", "fast-paced", "action", "lively", "vibrant",
                "energetic", "powerful", "active", "animated", "spirited",
                "high-energy", "intense", "vigorous", "enthusiastic", "passionate",
                "driven", "dynamic", "forceful", "strong", "determined",
            ],
            &[28, 10402],
        ),
    ]
}

fn reference_genre_emotions() -> BTreeMap<String, MoodWeights> {
    [
        (
            "Action",
            weights(&[
                ("excited", 0.85),
                ("energetic", 0.75),
                ("adventurous", 0.65),
                ("curious", 0.3),
            ]),
        ),
        (
            "Adventure",
            weights(&[
                ("adventurous", 0.9),
                ("excited", 0.65),
                ("curious", 0.6),
                ("hopeful", 0.4),
            ]),
        ),
        (
            "Animation",
            weights(&[
                ("happy", 0.7),
                ("peaceful", 0.5),
                ("curious", 0.4),
                ("sad", 0.3),
            ]),
        ),
        (
            "Comedy",
            weights(&[
                ("happy", 0.85),
                ("energetic", 0.65),
                ("peaceful", 0.3),
                ("hopeful", 0.3),
            ]),
        ),
        (
            "Crime",
            weights(&[
                ("curious", 0.75),
                ("thoughtful", 0.65),
                ("excited", 0.4),
                ("sad", 0.3),
            ]),
        ),
        (
            "Documentary",
            weights(&[
                ("curious", 0.85),
                ("thoughtful", 0.8),
                ("sad", 0.4),
                ("nostalgic", 0.4),
            ]),
        ),
        (
            "Drama",
            weights(&[
                ("thoughtful", 0.85),
                ("sad", 0.6),
                ("romantic", 0.5),
                ("hopeful", 0.4),
                ("nostalgic", 0.3),
            ]),
        ),
        ("Family", weights(&[("happy", 0.7), ("peaceful", 0.6), ("sad", 0.3), ("hopeful", 0.5)])),
        (
            "Fantasy",
            weights(&[
                ("curious", 0.75),
                ("adventurous", 0.7),
                ("excited", 0.5),
                ("peaceful", 0.3),
            ]),
        ),
        (
            "History",
            weights(&[
                ("nostalgic", 0.9),
                ("thoughtful", 0.75),
                ("sad", 0.5),
                ("curious", 0.4),
                ("romantic", 0.3),
            ]),
        ),
        ("Horror", weights(&[("excited", 0.8), ("angry", 0.7), ("sad", 0.3), ("thoughtful", 0.3)])),
        (
            "Music",
            weights(&[
                ("happy", 0.8),
                ("energetic", 0.7),
                ("peaceful", 0.5),
                ("romantic", 0.4),
            ]),
        ),
        (
            "Mystery",
            weights(&[
                ("curious", 0.85),
                ("thoughtful", 0.7),
                ("excited", 0.5),
                ("sad", 0.2),
            ]),
        ),
        (
            "Romance",
            weights(&[
                ("romantic", 0.9),
                ("peaceful", 0.6),
                ("sad", 0.4),
                ("happy", 0.4),
                ("nostalgic", 0.3),
            ]),
        ),
        (
            "Science Fiction",
            weights(&[
                ("curious", 0.85),
                ("adventurous", 0.75),
                ("thoughtful", 0.5),
                ("sad", 0.3),
            ]),
        ),
        (
            "Thriller",
            weights(&[
                ("excited", 0.85),
                ("curious", 0.7),
                ("thoughtful", 0.5),
                ("sad", 0.2),
            ]),
        ),
        (
            "War",
            weights(&[
                ("sad", 0.5),
                ("angry", 0.6),
                ("thoughtful", 0.6),
                ("adventurous", 0.5),
                ("excited", 0.4),
                ("hopeful", 0.3),
            ]),
        ),
        (
            "Western",
            weights(&[
                ("adventurous", 0.8),
                ("nostalgic", 0.7),
                ("excited", 0.5),
                ("thoughtful", 0.4),
            ]),
        ),
    ]
    .into_iter()
    .map(|(genre, profile)| (genre.to_string(), profile))
    .collect()
}

fn reference_combinations() -> Vec<GenreCombination> {
    vec![
        combination("epic_adventure", &[12, 28, 14], &[("adventurous", 0.4), ("excited", 0.3)]),
        combination("romantic_comedy", &[35, 10749], &[("happy", 0.3), ("romantic", 0.4)]),
        combination(
            "romantic_drama",
            &[18, 10749],
            &[("romantic", 0.5), ("sad", 0.3), ("nostalgic", 0.3)],
        ),
        combination("historical_romance", &[36, 10749], &[("romantic", 0.4), ("nostalgic", 0.5)]),
        combination("sci_fi_thriller", &[878, 53], &[("curious", 0.3), ("excited", 0.3)]),
        combination("historical_drama", &[36, 18], &[("thoughtful", 0.3), ("nostalgic", 0.4)]),
        combination("family_adventure", &[10751, 12], &[("happy", 0.3), ("adventurous", 0.3)]),
        combination(
            "war_drama",
            &[10752, 18],
            &[("thoughtful", 0.3), ("sad", 0.3), ("nostalgic", 0.3)],
        ),
        combination(
            "war_action",
            &[10752, 28],
            &[("excited", 0.4), ("adventurous", 0.3), ("energetic", 0.3)],
        ),
        combination("mystery_thriller", &[9648, 53], &[("curious", 0.3), ("excited", 0.3)]),
        combination("animated_family", &[16, 10751], &[("happy", 0.3), ("peaceful", 0.3)]),
    ]
}

fn reference_era_weights() -> Vec<EraWeightEntry> {
    vec![
        era("nostalgic", 1900, 1960, 0.9),
        era("nostalgic", 1961, 1980, 0.7),
        era("nostalgic", 1981, 2000, 0.5),
        era("nostalgic", 2001, 2010, 0.3),
        era("nostalgic", 2011, 2024, 0.1),
        era("romantic", 1900, 1960, 0.4),
        era("romantic", 1961, 1980, 0.3),
        era("romantic", 1981, 2000, 0.2),
        era("sad", 1900, 1960, 0.3),
        era("sad", 1961, 1980, 0.2),
    ]
}

fn reference_text_themes() -> Vec<TextTheme> {
    vec![
        TextTheme {
            mood: "sad".to_string(),
            phrases: words(&[
                "death", "loss", "sacrifice", "holocaust", "tragedy",
                "terminal illness", "farewell", "heartbreak", "grief",
                "loneliness", "depression", "suffering", "separation",
                "mourning", "tears", "sorrow", "regret",
            ]),
        },
        TextTheme {
            mood: "romantic".to_string(),
            phrases: words(&[
                "love", "romance", "relationship", "passion", "heart",
                "destiny", "soulmate", "kiss", "wedding", "marriage",
                "affection", "embrace", "romantic", "date", "lovers",
                "chemistry", "attraction", "courtship",
            ]),
        },
        TextTheme {
            mood: "nostalgic".to_string(),
            phrases: words(&[
                "memory", "past", "childhood", "remember", "history",
                "classic", "vintage", "retro", "tradition", "heritage",
                "old days", "memories", "throwback", "reminisce",
                "bygone era", "golden age", "timeless", "legacy",
            ]),
        },
    ]
}

fn reference_keyword_themes() -> Vec<KeywordTheme> {
    vec![
        keyword_theme(
            "action",
            &["fight", "battle", "chase", "explosion", "combat"],
            &["excited", "energetic"],
        ),
        keyword_theme(
            "emotion",
            &["love", "hate", "fear", "joy", "sorrow"],
            &["sad", "happy", "romantic"],
        ),
        keyword_theme(
            "adventure",
            &["quest", "journey", "expedition", "discovery"],
            &["adventurous", "curious"],
        ),
        keyword_theme(
            "drama",
            &["tragedy", "conflict", "relationship", "struggle"],
            &["thoughtful", "sad"],
        ),
        keyword_theme(
            "mystery",
            &["secret", "conspiracy", "investigation", "mystery"],
            &["curious", "thoughtful"],
        ),
    ]
}

impl Default for EmotionRules {
    fn default() -> Self {
        Self {
            moods: reference_moods(),
            genre_emotions: reference_genre_emotions(),
            genre_combinations: reference_combinations(),
            era_weights: reference_era_weights(),
            age_boost_mood: "nostalgic".to_string(),
            text_themes: reference_text_themes(),
            keyword_themes: reference_keyword_themes(),
            runtime: RuntimeRules {
                short: weights(&[("energetic", 0.6), ("happy", 0.4), ("excited", 0.3)]),
                standard: weights(&[("energetic", 0.4), ("excited", 0.3), ("happy", 0.3)]),
                long: weights(&[("thoughtful", 0.5), ("curious", 0.4), ("adventurous", 0.4)]),
                epic: weights(&[
                    ("thoughtful", 0.7),
                    ("nostalgic", 0.5),
                    ("sad", 0.4),
                    ("adventurous", 0.6),
                ]),
            },
            rating: RatingRules {
                high: weights(&[("thoughtful", 0.6), ("hopeful", 0.5), ("curious", 0.4)]),
                mid_high: weights(&[("happy", 0.5), ("excited", 0.4), ("peaceful", 0.3)]),
                mid: weights(&[("energetic", 0.4), ("excited", 0.3)]),
            },
            popularity: PopularityRules {
                very_popular: weights(&[("excited", 0.5), ("energetic", 0.4), ("happy", 0.3)]),
                moderately_popular: weights(&[
                    ("excited", 0.3),
                    ("energetic", 0.3),
                    ("adventurous", 0.3),
                ]),
                less_popular: weights(&[("thoughtful", 0.4), ("curious", 0.3), ("peaceful", 0.3)]),
            },
            content_weights: ContentWeights::default(),
            multipliers: SignalMultipliers::default(),
        }
    }
}
