//! Ordered collection of the titles a user already likes.

use super::WizardError;

/// Maximum number of titles a wizard accepts.
pub const MAX_TITLES: usize = 5;

/// Titles in insertion order, capped at [`MAX_TITLES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleList {
    titles: Vec<String>,
}

impl TitleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trimmed title. Returns the new count.
    pub fn push(&mut self, candidate: &str) -> Result<usize, WizardError> {
        let title = candidate.trim();
        if title.is_empty() {
            return Err(WizardError::EmptyInput);
        }
        if self.is_full() {
            return Err(WizardError::CapacityExceeded);
        }

        self.titles.push(title.to_string());
        Ok(self.titles.len())
    }

    /// Remove the title at `index`, if there is one.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.titles.len() {
            Some(self.titles.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.titles.len() >= MAX_TITLES
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.titles.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.titles.clone()
    }
}
