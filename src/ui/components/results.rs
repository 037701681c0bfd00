//! Recommendation results step.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol, StatefulImage};

use crate::client::models::Recommendation;
use crate::wizard::WizardState;

/// Results step view state.
pub struct ResultsState {
    /// Selected card
    pub list_state: ListState,

    /// Cover of the selected card (for Sixel/Kitty/etc.)
    pub cover: Option<StatefulProtocol>,

    /// URL of the cover currently shown or being fetched
    pub cover_url: Option<String>,
}

impl Default for ResultsState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsState {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            cover: None,
            cover_url: None,
        }
    }

    /// Reset for a fresh result list.
    pub fn reset(&mut self, len: usize) {
        self.list_state.select(if len == 0 { None } else { Some(0) });
        self.cover = None;
        self.cover_url = None;
    }

    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Point the cover at `url`. Returns true if it needs fetching.
    pub fn want_cover(&mut self, url: Option<String>) -> bool {
        if self.cover_url == url {
            return false;
        }
        self.cover = None;
        self.cover_url = url;
        self.cover_url.is_some()
    }

    /// Set the cover image data if it is still the wanted one.
    pub fn set_cover(&mut self, picker: &Picker, url: &str, image_data: &[u8]) {
        if self.cover_url.as_deref() != Some(url) {
            return;
        }
        match image::load_from_memory(image_data) {
            Ok(dyn_image) => {
                self.cover = Some(picker.new_resize_protocol(dyn_image));
            }
            Err(e) => {
                tracing::warn!("Failed to decode cover {}: {}", url, e);
            }
        }
    }
}

/// Render the results step.
pub fn render_results(
    frame: &mut Frame,
    area: Rect,
    wizard: &WizardState,
    state: &mut ResultsState,
    show_covers: bool,
) {
    let notice_height = if wizard.is_fallback() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(notice_height), // Service notice
            Constraint::Min(5),                // Cards
            Constraint::Length(1),             // Hints
        ])
        .split(area);

    if let Some(reason) = wizard.service_unavailable.as_deref().filter(|_| wizard.is_fallback()) {
        let text = if wizard.recommendations.is_empty() {
            format!("Recommendation service unavailable: {}", reason)
        } else {
            format!(
                "Recommendation service unavailable ({}). Showing sample picks.",
                reason
            )
        };
        let notice = Paragraph::new(text)
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(notice, chunks[0]);
    }

    let body = if show_covers && state.cover.is_some() {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(chunks[1])
    };

    let title = format!("Your {} Recommendations", wizard.flow.title());
    if wizard.recommendations.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No recommendations found. Try different titles.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, body[0]);
    } else {
        let items: Vec<ListItem> = wizard.recommendations.iter().map(card).collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, body[0], &mut state.list_state);
    }

    if body.len() > 1 {
        if let Some(ref mut protocol) = state.cover {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta));
            let inner = block.inner(body[1]);
            frame.render_widget(block, body[1]);
            frame.render_stateful_widget(StatefulImage::default(), inner, protocol);
        }
    }

    let hints = Paragraph::new(Span::styled(
        "↑/↓ browse • Enter or r start over",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(hints, chunks[2]);
}

/// One result card.
fn card(rec: &Recommendation) -> ListItem<'static> {
    let mut lines = vec![Line::from(Span::styled(
        rec.title().to_string(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];

    if let Some(byline) = rec.byline() {
        lines.push(Line::from(Span::styled(
            byline,
            Style::default().fg(Color::Cyan),
        )));
    }

    let mut meta = Vec::new();
    if let Some(details) = rec.details() {
        meta.push(Span::styled(details, Style::default().fg(Color::Gray)));
    }
    if let Some(rating) = rec.rating_label() {
        if !meta.is_empty() {
            meta.push(Span::raw("  "));
        }
        meta.push(Span::styled(
            format!("★ {}", rating),
            Style::default().fg(Color::Yellow),
        ));
    }
    if !meta.is_empty() {
        lines.push(Line::from(meta));
    }

    let badges = rec.genre_badges();
    if !badges.is_empty() {
        let mut spans = Vec::new();
        for badge in badges {
            spans.push(Span::styled(
                format!(" {} ", badge),
                Style::default().fg(Color::Black).bg(Color::Magenta),
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    ListItem::new(lines)
}
