//! Optional taste preferences collected on the details step.

use serde::Serialize;

/// One of the three preference slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferenceField {
    #[default]
    Genre,
    Era,
    Mood,
}

impl PreferenceField {
    pub fn all() -> &'static [PreferenceField] {
        &[Self::Genre, Self::Era, Self::Mood]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Genre => "Preferred Genre",
            Self::Era => "Preferred Era",
            Self::Mood => "Current Mood",
        }
    }

    /// Next field, stopping at the last one.
    pub fn next(&self) -> PreferenceField {
        match self {
            Self::Genre => Self::Era,
            Self::Era | Self::Mood => Self::Mood,
        }
    }

    /// Previous field, stopping at the first one.
    pub fn prev(&self) -> PreferenceField {
        match self {
            Self::Genre | Self::Era => Self::Genre,
            Self::Mood => Self::Era,
        }
    }
}

/// Genre, era and mood selections. `None` means the user left the slot unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub genre: Option<String>,
    pub era: Option<String>,
    pub mood: Option<String>,
}

impl Preferences {
    /// Overwrite one slot. An empty value clears it.
    pub fn set(&mut self, field: PreferenceField, value: impl Into<String>) {
        let value = value.into();
        let slot = self.slot_mut(field);
        *slot = if value.is_empty() { None } else { Some(value) };
    }

    pub fn get(&self, field: PreferenceField) -> Option<&str> {
        match field {
            PreferenceField::Genre => self.genre.as_deref(),
            PreferenceField::Era => self.era.as_deref(),
            PreferenceField::Mood => self.mood.as_deref(),
        }
    }

    fn slot_mut(&mut self, field: PreferenceField) -> &mut Option<String> {
        match field {
            PreferenceField::Genre => &mut self.genre,
            PreferenceField::Era => &mut self.era,
            PreferenceField::Mood => &mut self.mood,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_single_slot() {
        let mut prefs = Preferences::default();
        prefs.set(PreferenceField::Genre, "scifi");
        prefs.set(PreferenceField::Mood, "light");
        prefs.set(PreferenceField::Genre, "fantasy");

        assert_eq!(prefs.get(PreferenceField::Genre), Some("fantasy"));
        assert_eq!(prefs.get(PreferenceField::Era), None);
        assert_eq!(prefs.get(PreferenceField::Mood), Some("light"));
    }

    #[test]
    fn test_empty_value_unsets() {
        let mut prefs = Preferences::default();
        prefs.set(PreferenceField::Era, "modern");
        prefs.set(PreferenceField::Era, "");

        assert_eq!(prefs.era, None);
    }

    #[test]
    fn test_unknown_values_are_accepted() {
        let mut prefs = Preferences::default();
        prefs.set(PreferenceField::Mood, "melancholic");
        assert_eq!(prefs.mood.as_deref(), Some("melancholic"));
    }

    #[test]
    fn test_field_navigation_clamps() {
        assert_eq!(PreferenceField::Genre.prev(), PreferenceField::Genre);
        assert_eq!(PreferenceField::Genre.next(), PreferenceField::Era);
        assert_eq!(PreferenceField::Mood.next(), PreferenceField::Mood);
    }
}
