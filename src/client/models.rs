//! Recommendation service request and response models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wizard::{Domain, Preferences};

/// CDN hosts that serve stale image URLs, paired with their replacement.
const IMAGE_HOST_REWRITES: &[(&str, &str)] =
    &[("myanimelist.cdn-dena.com", "cdn.myanimelist.net")];

/// Rewrite known dead CDN hostnames in an image URL.
pub fn rewrite_image_host(url: &str) -> String {
    IMAGE_HOST_REWRITES
        .iter()
        .fold(url.to_string(), |acc, (from, to)| acc.replacen(from, to, 1))
}

// ============================================================================
// Requests
// ============================================================================

/// Body for the unified recommendation endpoints.
///
/// Books use `book_titles`, the other domains use `titles`. Unset preferences
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendationRequest {
    Books(BookRequest),
    Titles(TitlesRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRequest {
    pub book_titles: Vec<String>,
    #[serde(flatten)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitlesRequest {
    pub titles: Vec<String>,
    #[serde(flatten)]
    pub preferences: Preferences,
}

impl RecommendationRequest {
    pub fn new(domain: Domain, titles: Vec<String>, preferences: Preferences) -> Self {
        match domain {
            Domain::Books => Self::Books(BookRequest {
                book_titles: titles,
                preferences,
            }),
            Domain::Anime | Domain::Movies => Self::Titles(TitlesRequest {
                titles,
                preferences,
            }),
        }
    }
}

/// Body for the legacy `POST /recommend` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyRecommendRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub favorites: Vec<String>,
    pub preferences: LegacyPreferences,
}

/// Legacy preferences send empty strings instead of `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LegacyPreferences {
    pub genre: String,
    pub mood: String,
    pub era: String,
}

impl From<&Preferences> for LegacyPreferences {
    fn from(prefs: &Preferences) -> Self {
        Self {
            genre: prefs.genre.clone().unwrap_or_default(),
            mood: prefs.mood.clone().unwrap_or_default(),
            era: prefs.era.clone().unwrap_or_default(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Success body of the unified endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse<T> {
    #[serde(default = "Vec::new")]
    pub recommendations: Vec<T>,
}

/// Error body. FastAPI-style services put a string in `detail`, validation
/// failures put a list there instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The detail as a message, if the body carried a usable one.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Item identifiers are numeric for the sample data and free-form strings
/// (IMDb ids, dataset keys) from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl Default for ItemId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A recommended book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecommendation {
    #[serde(default)]
    pub id: ItemId,
    pub title: String,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub image: Option<String>,
}

/// A recommended anime. The service reports the studio in `author`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecommendation {
    #[serde(default)]
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "author", alias = "studio")]
    pub studio: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub genre: Option<String>,
}

/// A recommended movie or TV series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecommendation {
    #[serde(default)]
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "type", default = "default_media_type")]
    pub media_type: String,
    pub year: Option<i32>,
    pub rating: f64,
    /// Comma-separated genre list
    pub genre: Option<String>,
    pub image: Option<String>,
}

fn default_media_type() -> String {
    String::from("movie")
}

/// A show returned by the legacy TV service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
    #[serde(default)]
    pub id: ItemId,
    pub title: String,
    pub rating: Option<f64>,
    pub network: Option<String>,
    pub year: Option<i32>,
    pub seasons: Option<u32>,
    pub image: Option<String>,
}

/// A recommendation from any flow, normalized for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Book(BookRecommendation),
    Anime(AnimeRecommendation),
    Movie(MovieRecommendation),
    Show(TvShow),
}

impl Recommendation {
    pub fn id(&self) -> &ItemId {
        match self {
            Self::Book(b) => &b.id,
            Self::Anime(a) => &a.id,
            Self::Movie(m) => &m.id,
            Self::Show(s) => &s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Book(b) => &b.title,
            Self::Anime(a) => &a.title,
            Self::Movie(m) => &m.title,
            Self::Show(s) => &s.title,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Self::Book(b) => b.year,
            Self::Anime(a) => a.year,
            Self::Movie(m) => m.year,
            Self::Show(s) => s.year,
        }
    }

    /// Rating as shown on the card. Movies always show one decimal place.
    pub fn rating_label(&self) -> Option<String> {
        match self {
            Self::Book(b) => b.rating.map(|r| r.to_string()),
            Self::Anime(a) => a.rating.map(|r| r.to_string()),
            Self::Movie(m) => Some(format!("{:.1}", m.rating)),
            Self::Show(s) => s.rating.map(|r| r.to_string()),
        }
    }

    /// Secondary line: author, studio, media type or network.
    pub fn byline(&self) -> Option<String> {
        match self {
            Self::Book(b) => b.author.clone(),
            Self::Anime(a) => a.studio.as_ref().map(|s| format!("Studio: {}", s)),
            Self::Movie(m) => Some(m.media_label().to_string()),
            Self::Show(s) => s.network.clone(),
        }
    }

    /// Year line. Legacy shows append their season count.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Show(s) => match (s.year, s.seasons) {
                (Some(y), Some(n)) => Some(format!("{} • {} seasons", y, n)),
                (Some(y), None) => Some(y.to_string()),
                (None, Some(n)) => Some(format!("{} seasons", n)),
                (None, None) => None,
            },
            other => other.year().map(|y| y.to_string()),
        }
    }

    /// Genre badges. Movie genres arrive comma-separated.
    pub fn genre_badges(&self) -> Vec<String> {
        match self {
            Self::Movie(m) => m
                .genre
                .as_deref()
                .map(|g| {
                    g.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            Self::Anime(a) => a
                .genre
                .as_deref()
                .filter(|g| !g.is_empty())
                .map(|g| vec![g.to_string()])
                .unwrap_or_default(),
            Self::Book(_) | Self::Show(_) => Vec::new(),
        }
    }

    /// Cover image URL ready to fetch. Book and anime URLs get host rewriting.
    pub fn image_url(&self) -> Option<String> {
        let url = match self {
            Self::Book(b) => b.image.as_deref().map(rewrite_image_host),
            Self::Anime(a) => a.image.as_deref().map(rewrite_image_host),
            Self::Movie(m) => m.image.clone(),
            Self::Show(s) => s.image.clone(),
        };
        url.filter(|url| !url.is_empty())
    }
}

impl MovieRecommendation {
    /// Whether the title is a series rather than a film.
    pub fn is_series(&self) -> bool {
        matches!(self.media_type.as_str(), "TV Series" | "tvSeries")
    }

    pub fn media_label(&self) -> &str {
        if self.is_series() {
            "📺 TV Series"
        } else if self.media_type == "movie" {
            "🎬 Movie"
        } else {
            &self.media_type
        }
    }
}
