//! Domain descriptors: labels, endpoints and preference vocabularies.

use serde::{Deserialize, Serialize};

use super::PreferenceField;

/// A selectable preference value and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

impl Choice {
    const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Recommendation category served by the unified `/recommendations/` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    Books,
    Anime,
    Movies,
}

impl Domain {
    /// Endpoint path relative to the server base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Books => "/recommendations/",
            Self::Anime => "/recommendations/anime/",
            Self::Movies => "/recommendations/movies/",
        }
    }

    /// Label used in log lines ("Error getting anime recommendations").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Books => "book",
            Self::Anime => "anime",
            Self::Movies => "movie",
        }
    }
}

/// A wizard flow as shown in the tab bar. The three unified domains share one
/// backend contract; the legacy TV flow talks to a different service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flow {
    #[default]
    Books,
    Anime,
    Movies,
    LegacyTv,
}

impl From<Domain> for Flow {
    fn from(domain: Domain) -> Self {
        match domain {
            Domain::Books => Self::Books,
            Domain::Anime => Self::Anime,
            Domain::Movies => Self::Movies,
        }
    }
}

impl Flow {
    pub fn all() -> &'static [Flow] {
        &[Self::Books, Self::Anime, Self::Movies, Self::LegacyTv]
    }

    /// The unified domain behind this flow, if any.
    pub fn domain(&self) -> Option<Domain> {
        match self {
            Self::Books => Some(Domain::Books),
            Self::Anime => Some(Domain::Anime),
            Self::Movies => Some(Domain::Movies),
            Self::LegacyTv => None,
        }
    }

    /// Next flow among `enabled` (wraps around).
    pub fn next_in(&self, enabled: &[Flow]) -> Flow {
        self.step_in(enabled, 1)
    }

    /// Previous flow among `enabled` (wraps around).
    pub fn prev_in(&self, enabled: &[Flow]) -> Flow {
        self.step_in(enabled, enabled.len().saturating_sub(1))
    }

    fn step_in(&self, enabled: &[Flow], offset: usize) -> Flow {
        if enabled.is_empty() {
            return *self;
        }
        let pos = enabled.iter().position(|f| f == self).unwrap_or(0);
        enabled[(pos + offset) % enabled.len()]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Books => "Books",
            Self::Anime => "Anime",
            Self::Movies => "Movies & TV",
            Self::LegacyTv => "TV (legacy)",
        }
    }

    /// Singular noun used in prompts ("Enter book title").
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Books => "book",
            Self::Anime => "anime",
            Self::Movies => "movie or TV show",
            Self::LegacyTv => "TV show",
        }
    }

    /// Heading for the collected list ("Your Books (2/5)").
    pub fn collection_heading(&self) -> &'static str {
        match self {
            Self::Books => "Your Books",
            Self::Anime => "Your Anime",
            Self::Movies => "Your Movies & Shows",
            Self::LegacyTv => "Your TV Shows",
        }
    }

    /// Options offered for a preference slot, in display order.
    pub fn choices(&self, field: PreferenceField) -> &'static [Choice] {
        match (self, field) {
            (Self::Books, PreferenceField::Genre) => BOOK_GENRES,
            (Self::Anime, PreferenceField::Genre) => ANIME_GENRES,
            (Self::Movies, PreferenceField::Genre) => MOVIE_GENRES,
            (Self::LegacyTv, PreferenceField::Genre) => TV_GENRES,
            (Self::Books, PreferenceField::Era) => BOOK_ERAS,
            (Self::Anime, PreferenceField::Era) => ANIME_ERAS,
            (Self::Movies, PreferenceField::Era) => MOVIE_ERAS,
            (Self::LegacyTv, PreferenceField::Era) => TV_ERAS,
            (Self::LegacyTv, PreferenceField::Mood) => TV_MOODS,
            (_, PreferenceField::Mood) => MOODS,
        }
    }

    /// Display label for a stored value, falling back to the raw value.
    pub fn choice_label(&self, field: PreferenceField, value: &str) -> String {
        self.choices(field)
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.to_string())
            .unwrap_or_else(|| value.to_string())
    }

    /// Cycle a preference value through the unset state and every choice.
    pub fn cycle_choice(
        &self,
        field: PreferenceField,
        current: Option<&str>,
        forward: bool,
    ) -> &'static str {
        let choices = self.choices(field);
        // Position 0 is the unset state, choices follow at 1..=len.
        let positions = choices.len() + 1;
        let current_pos = current
            .and_then(|v| choices.iter().position(|c| c.value == v))
            .map(|i| i + 1)
            .unwrap_or(0);
        let next_pos = if forward {
            (current_pos + 1) % positions
        } else {
            (current_pos + positions - 1) % positions
        };

        if next_pos == 0 {
            ""
        } else {
            choices[next_pos - 1].value
        }
    }
}

const BOOK_GENRES: &[Choice] = &[
    Choice::new("fiction", "Fiction"),
    Choice::new("fantasy", "Fantasy"),
    Choice::new("scifi", "Science Fiction"),
    Choice::new("mystery", "Mystery/Thriller"),
    Choice::new("romance", "Romance"),
    Choice::new("historical", "Historical Fiction"),
    Choice::new("biography", "Biography/Memoir"),
    Choice::new("nonfiction", "Non-Fiction"),
];

const ANIME_GENRES: &[Choice] = &[
    Choice::new("action", "Action"),
    Choice::new("adventure", "Adventure"),
    Choice::new("comedy", "Comedy"),
    Choice::new("drama", "Drama"),
    Choice::new("fantasy", "Fantasy"),
    Choice::new("scifi", "Science Fiction"),
    Choice::new("romance", "Romance"),
    Choice::new("slice", "Slice of Life"),
    Choice::new("sports", "Sports"),
    Choice::new("mystery", "Mystery"),
    Choice::new("horror", "Horror"),
    Choice::new("supernatural", "Supernatural"),
];

const MOVIE_GENRES: &[Choice] = &[
    Choice::new("action", "Action"),
    Choice::new("comedy", "Comedy"),
    Choice::new("drama", "Drama"),
    Choice::new("fantasy", "Fantasy"),
    Choice::new("horror", "Horror"),
    Choice::new("mystery", "Mystery"),
    Choice::new("romance", "Romance"),
    Choice::new("scifi", "Science Fiction"),
    Choice::new("thriller", "Thriller"),
    Choice::new("western", "Western"),
    Choice::new("documentary", "Documentary"),
    Choice::new("family", "Family"),
];

const TV_GENRES: &[Choice] = &[
    Choice::new("drama", "Drama"),
    Choice::new("comedy", "Comedy"),
    Choice::new("thriller", "Thriller"),
    Choice::new("sci-fi", "Sci-Fi"),
    Choice::new("fantasy", "Fantasy"),
    Choice::new("crime", "Crime"),
    Choice::new("action", "Action"),
    Choice::new("animated", "Animated"),
];

const BOOK_ERAS: &[Choice] = &[
    Choice::new("classic", "Classics (pre-1950s)"),
    Choice::new("mid-century", "Mid-Century (1950-1980)"),
    Choice::new("modern", "Modern (1980-2010)"),
    Choice::new("contemporary", "Contemporary (2010+)"),
    Choice::new("any", "Any era"),
];

const ANIME_ERAS: &[Choice] = &[
    Choice::new("classic", "Classic (1960-1990)"),
    Choice::new("mid-century", "90s Anime (1990-2000)"),
    Choice::new("modern", "2000s Anime (2000-2010)"),
    Choice::new("contemporary", "Modern Anime (2010+)"),
    Choice::new("any", "Any era"),
];

const MOVIE_ERAS: &[Choice] = &[
    Choice::new("classic", "Classic (pre-1970s)"),
    Choice::new("mid-century", "70s-80s"),
    Choice::new("modern", "90s-2000s"),
    Choice::new("contemporary", "Modern (2010+)"),
    Choice::new("any", "Any era"),
];

const TV_ERAS: &[Choice] = &[
    Choice::new("classic", "Classic (pre-1980s)"),
    Choice::new("80s-90s", "80s-90s"),
    Choice::new("2000s", "2000s"),
    Choice::new("modern", "Modern (2010s+)"),
    Choice::new("any", "Any era"),
];

const MOODS: &[Choice] = &[
    Choice::new("light", "Light & Easy"),
    Choice::new("thought-provoking", "Thought-Provoking"),
    Choice::new("escape", "Escapism"),
    Choice::new("learn", "Learning Something New"),
    Choice::new("emotional", "Emotional Journey"),
    Choice::new("adventurous", "Adventure"),
];

const TV_MOODS: &[Choice] = &[
    Choice::new("happy", "Happy"),
    Choice::new("relaxed", "Relaxed"),
    Choice::new("thoughtful", "Thoughtful"),
    Choice::new("excited", "Excited"),
    Choice::new("nostalgic", "Nostalgic"),
    Choice::new("adventurous", "Adventurous"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(Domain::Books.endpoint(), "/recommendations/");
        assert_eq!(Domain::Anime.endpoint(), "/recommendations/anime/");
        assert_eq!(Domain::Movies.endpoint(), "/recommendations/movies/");
    }

    #[test]
    fn test_cycle_choice_wraps_through_unset() {
        let flow = Flow::Books;
        let first = flow.cycle_choice(PreferenceField::Era, None, true);
        assert_eq!(first, "classic");

        let last = flow.cycle_choice(PreferenceField::Era, None, false);
        assert_eq!(last, "any");

        assert_eq!(flow.cycle_choice(PreferenceField::Era, Some("any"), true), "");
    }

    #[test]
    fn test_cycle_choice_from_unknown_value_restarts() {
        let next = Flow::Anime.cycle_choice(PreferenceField::Genre, Some("western"), true);
        assert_eq!(next, "action");
    }

    #[test]
    fn test_choice_label() {
        assert_eq!(
            Flow::Movies.choice_label(PreferenceField::Era, "mid-century"),
            "70s-80s"
        );
        assert_eq!(Flow::Books.choice_label(PreferenceField::Genre, "weird"), "weird");
    }

    #[test]
    fn test_flow_cycling_wraps() {
        let enabled = Flow::all();
        assert_eq!(Flow::Books.next_in(enabled), Flow::Anime);
        assert_eq!(Flow::LegacyTv.next_in(enabled), Flow::Books);
        assert_eq!(Flow::Books.prev_in(enabled), Flow::LegacyTv);
    }

    #[test]
    fn test_flow_cycling_skips_disabled() {
        let enabled = [Flow::Books, Flow::Anime, Flow::Movies];
        assert_eq!(Flow::Movies.next_in(&enabled), Flow::Books);
        assert_eq!(Flow::Books.prev_in(&enabled), Flow::Movies);
        assert_eq!(Flow::LegacyTv.next_in(&enabled), Flow::Anime);
    }

    #[test]
    fn test_legacy_flow_has_no_domain() {
        assert_eq!(Flow::LegacyTv.domain(), None);
        assert_eq!(Flow::from(Domain::Anime).domain(), Some(Domain::Anime));
    }
}
