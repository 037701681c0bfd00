//! Main UI layout and rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::wizard::{Flow, Step};

pub mod components;

pub use components::*;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Main layout: [tabs] [steps] [content]
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(1), // Step indicator
            Constraint::Min(10),   // Content
        ])
        .split(area);

    render_tabs(frame, main_chunks[0], &app.flows, app.flow);

    let show_covers = app.config.ui.show_covers && app.picker.is_some();
    let panel = app.panels.get_mut(app.flow);
    render_steps(frame, main_chunks[1], panel.wizard.step);

    match panel.wizard.step {
        Step::Collecting => {
            render_collect(frame, main_chunks[2], &panel.wizard, &mut panel.collect)
        }
        Step::DetailsEntry => render_details(frame, main_chunks[2], &panel.wizard, &panel.details),
        Step::Results => render_results(
            frame,
            main_chunks[2],
            &panel.wizard,
            &mut panel.results,
            show_covers,
        ),
    }

    // Render help overlay if active
    if app.show_help {
        render_help(frame, area);
    }

    // Render error message if present
    if let Some(error) = &app.error_message {
        render_error(frame, area, error);
    }
}

/// Render the tab bar.
fn render_tabs(frame: &mut Frame, area: Rect, flows: &[Flow], current: Flow) {
    let titles: Vec<Line> = flows
        .iter()
        .map(|f| {
            let style = if *f == current {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(f.title(), style))
        })
        .collect();

    let selected = flows.iter().position(|f| *f == current).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("recs-tui")
                .border_style(Style::default().fg(Color::Blue)),
        )
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Render the "1 Favorites › 2 Preferences › 3 Results" indicator.
fn render_steps(frame: &mut Frame, area: Rect, current: Step) {
    let mut spans = vec![Span::raw(" ")];
    for (i, step) in Step::all().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if *step == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if step.number() < current.number() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!(" {} {} ", step.number(), step.title()),
            style,
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the help overlay.
fn render_help(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Favorites"),
        Line::from("  Type          Enter a title"),
        Line::from("  Enter         Add title"),
        Line::from("  ↑/↓           Select title"),
        Line::from("  Del/Ctrl+D    Remove selected title"),
        Line::from("  →             Accept suggestion (TV)"),
        Line::from("  PgUp/PgDn     Cycle suggestions (TV)"),
        Line::from("  Ctrl+N        Continue to preferences"),
        Line::from(""),
        heading("Preferences"),
        Line::from("  ↑/↓           Select field"),
        Line::from("  ←/→           Change value"),
        Line::from("  x             Clear value"),
        Line::from("  Enter         Get recommendations"),
        Line::from("  Esc           Back to favorites"),
        Line::from(""),
        heading("Results"),
        Line::from("  ↑/↓           Browse"),
        Line::from("  Enter/r       Start over"),
        Line::from(""),
        heading("Other"),
        Line::from("  Tab/Shift+Tab Switch category"),
        Line::from("  Ctrl+R        Start over"),
        Line::from("  F1            Show this help"),
        Line::from("  Ctrl+X        Clear error message"),
        Line::from("  Ctrl+C/Ctrl+Q Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or F1 to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Help")
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Render an error message overlay.
fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(60, 20, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Error (Ctrl+X to dismiss)")
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn rendered(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 20, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 10);
        assert_eq!(popup.x, 20);
    }

    #[test]
    fn test_renders_collect_step() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::default(), tx);
        app.panels.get_mut(Flow::Books).wizard.add("Dune").unwrap();

        let screen = rendered(&mut app);
        assert!(screen.contains("Your Books (1/5)"));
        assert!(screen.contains("Dune"));
        assert!(screen.contains("1 Favorites"));
    }

    #[test]
    fn test_renders_fallback_notice() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::default(), tx);
        let wizard = &mut app.panels.get_mut(Flow::Books).wizard;
        wizard.add("Dune").unwrap();
        wizard.proceed().unwrap();
        let request = wizard.submit().unwrap();
        wizard
            .resolve(
                request.request_id,
                crate::client::FetchOutcome::ServiceUnavailable {
                    reason: String::from("Failed to get recommendations"),
                    fallback: crate::client::fallback::sample_recommendations(
                        crate::wizard::Domain::Books,
                    ),
                },
            )
            .unwrap();

        let screen = rendered(&mut app);
        assert!(screen.contains("Showing sample picks"));
        assert!(screen.contains("The Great Gatsby"));
    }
}
