//! Title collection step.

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::wizard::{WizardError, WizardState, MAX_TITLES};

/// Debounce delay in milliseconds.
const DEBOUNCE_MS: u128 = 300;

/// Minimum query length to trigger a title search.
const MIN_QUERY_LENGTH: usize = 2;

/// Collection step view state.
#[derive(Debug, Default)]
pub struct CollectState {
    /// Selection in the collected titles list
    pub list_state: ListState,

    /// Title suggestions for the current draft
    pub suggestions: Vec<String>,

    /// Highlighted suggestion
    pub suggestion: usize,

    /// A suggestion search is in flight
    pub searching: bool,

    /// Last time the draft was modified (for debouncing)
    last_draft_change: Option<Instant>,

    /// The query that was last searched
    last_searched_query: String,
}

impl CollectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that the draft changed.
    pub fn draft_changed(&mut self) {
        self.last_draft_change = Some(Instant::now());
    }

    /// Check if a debounced suggestion search should run for `draft`.
    pub fn should_search(&self, draft: &str) -> bool {
        let query = draft.trim();
        if query.chars().count() < MIN_QUERY_LENGTH || self.searching {
            return false;
        }
        if query == self.last_searched_query {
            return false;
        }

        self.last_draft_change
            .is_some_and(|changed| changed.elapsed().as_millis() >= DEBOUNCE_MS)
    }

    pub fn mark_search_started(&mut self, query: &str) {
        self.last_searched_query = query.trim().to_string();
        self.searching = true;
    }

    /// Store suggestions if they answer the latest search.
    pub fn set_suggestions(&mut self, query: &str, titles: Vec<String>) {
        if query != self.last_searched_query {
            return;
        }
        self.searching = false;
        self.suggestions = titles;
        self.suggestion = 0;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestion = 0;
        self.searching = false;
        self.last_searched_query.clear();
        self.last_draft_change = None;
    }

    pub fn next_suggestion(&mut self) {
        if !self.suggestions.is_empty() {
            self.suggestion = (self.suggestion + 1) % self.suggestions.len();
        }
    }

    pub fn prev_suggestion(&mut self) {
        if !self.suggestions.is_empty() {
            self.suggestion =
                (self.suggestion + self.suggestions.len() - 1) % self.suggestions.len();
        }
    }

    pub fn selected_suggestion(&self) -> Option<&str> {
        self.suggestions.get(self.suggestion).map(String::as_str)
    }

    /// Move selection up.
    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            Some(_) => len - 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Move selection down.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Keep the selection inside a list of `len` items.
    pub fn clamp_selection(&mut self, len: usize) {
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
    }
}

/// Inline message for a rejected add/continue.
pub fn input_error_message(error: &WizardError, noun: &str) -> String {
    match error {
        WizardError::EmptyInput => format!("Please enter a {} title", noun),
        WizardError::CapacityExceeded => {
            format!("You can add up to {} titles", MAX_TITLES)
        }
        WizardError::NoTitlesProvided => {
            format!("Please add at least one {} before continuing", noun)
        }
        other => other.to_string(),
    }
}

/// The end of `text` that fits in `width` terminal columns.
fn visible_tail(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }

    let mut used = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = i;
    }
    &text[start..]
}

/// Render the title collection step.
pub fn render_collect(
    frame: &mut Frame,
    area: Rect,
    wizard: &WizardState,
    state: &mut CollectState,
) {
    let noun = wizard.flow.noun();
    let has_suggestions = !state.suggestions.is_empty();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status line
            Constraint::Length(if has_suggestions {
                state.suggestions.len().min(5) as u16 + 2
            } else {
                0
            }),
            Constraint::Min(3), // Titles
        ])
        .split(area);

    // Input line
    let (input_text, input_style) = if wizard.capacity_reached {
        (
            String::from("Maximum reached, remove a title to add another"),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        // Borders and cursor take three columns.
        let room = chunks[0].width.saturating_sub(3) as usize;
        (
            format!("{}█", visible_tail(&wizard.draft, room)),
            Style::default().fg(Color::White),
        )
    };
    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Enter {} title", noun))
            .border_style(Style::default().fg(if wizard.capacity_reached {
                Color::DarkGray
            } else {
                Color::Cyan
            })),
    );
    frame.render_widget(input, chunks[0]);

    // Status line: inline error, capacity notice or key hints
    let status = if let Some(error) = &wizard.input_error {
        Line::from(Span::styled(
            input_error_message(error, noun),
            Style::default().fg(Color::Red),
        ))
    } else if wizard.capacity_reached {
        Line::from(Span::styled(
            format!("Maximum of {} titles reached", MAX_TITLES),
            Style::default().fg(Color::Yellow),
        ))
    } else if state.searching {
        Line::from(Span::styled(
            "Searching...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            "Enter add • Del remove • Ctrl+N continue",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(status), chunks[1]);

    // Suggestions
    if has_suggestions {
        let items: Vec<ListItem> = state
            .suggestions
            .iter()
            .take(5)
            .enumerate()
            .map(|(i, title)| {
                let style = if i == state.suggestion {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Span::styled(title.as_str(), style))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Suggestions (→ accept, PgUp/PgDn)")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(list, chunks[2]);
    }

    // Collected titles
    let items: Vec<ListItem> = wizard
        .titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(title.to_string()),
            ]))
        })
        .collect();

    let heading = format!(
        "{} ({}/{})",
        wizard.flow.collection_heading(),
        wizard.titles.len(),
        MAX_TITLES
    );

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled(
            format!("No {} titles added yet", noun),
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL).title(heading));
        frame.render_widget(empty, chunks[3]);
        return;
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(heading)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, chunks[3], &mut state.list_state);
}
