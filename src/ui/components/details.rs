//! Preference entry step.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::wizard::{PreferenceField, WizardState};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Preference step view state.
#[derive(Debug, Default)]
pub struct DetailsState {
    /// Focused preference row
    pub field: PreferenceField,

    /// Spinner frame while loading
    spinner: usize,
}

impl DetailsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_next(&mut self) {
        self.field = self.field.next();
    }

    pub fn select_previous(&mut self) {
        self.field = self.field.prev();
    }

    pub fn tick(&mut self) {
        self.spinner = (self.spinner + 1) % SPINNER.len();
    }
}

/// Render the preference step.
pub fn render_details(frame: &mut Frame, area: Rect, wizard: &WizardState, state: &DetailsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Preference rows
            Constraint::Min(3),    // Summary and status
        ])
        .split(area);

    let lines: Vec<Line> = PreferenceField::all()
        .iter()
        .map(|&field| {
            let focused = field == state.field;
            let value = wizard
                .preferences
                .get(field)
                .map(|v| wizard.flow.choice_label(field, v))
                .unwrap_or_else(|| String::from("Any"));

            let label_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let value_style = if wizard.preferences.get(field).is_some() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            Line::from(vec![
                Span::styled(if focused { "▶ " } else { "  " }, label_style),
                Span::styled(format!("{:<16}", field.label()), label_style),
                Span::styled(if focused { "◀ " } else { "  " }, label_style),
                Span::styled(value, value_style),
                Span::styled(if focused { " ▶" } else { "" }, label_style),
            ])
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Tell us about your preferences (optional)")
            .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(form, chunks[0]);

    let mut status = vec![Line::from(vec![
        Span::styled("Based on: ", Style::default().fg(Color::Cyan)),
        Span::raw(wizard.titles.iter().collect::<Vec<_>>().join(", ")),
    ])];
    status.push(Line::from(""));

    if wizard.loading {
        status.push(Line::from(Span::styled(
            format!(
                "{} Getting {} recommendations...",
                SPINNER[state.spinner],
                wizard.flow.noun()
            ),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        if let Some(reason) = &wizard.service_unavailable {
            status.push(Line::from(Span::styled(
                format!("Error getting recommendations: {}", reason),
                Style::default().fg(Color::Red),
            )));
        }
        status.push(Line::from(Span::styled(
            "←/→ change • ↑/↓ field • x clear • Enter get recommendations • Esc back",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let summary = Paragraph::new(status)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(summary, chunks[1]);
}
