// ABOUTME: Loading widget: the blocking view shown until the service answers its liveness probe.
// ABOUTME: Also renders the terminal "service unavailable" view with its retry hint.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::ServiceStatus;
use crate::tui::widgets::chat::spinner_frame;

/// Lines for the not-ready screen. Empty once the service is ready.
pub fn loading_lines(
    status: &ServiceStatus,
    base_url: &str,
    max_attempts: u32,
    tick: usize,
) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    match status {
        ServiceStatus::Ready => Vec::new(),
        ServiceStatus::Loading { attempt } => {
            let mut lines = vec![Line::from(vec![
                Span::styled(spinner_frame(tick), Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!(" Loading service at {}...", base_url),
                    Style::default().fg(Color::White),
                ),
            ])];
            if *attempt > 0 {
                lines.push(Line::from(Span::styled(
                    format!("  retrying (attempt {} of {})", attempt + 1, max_attempts),
                    dim,
                )));
            }
            lines
        }
        ServiceStatus::Unavailable {
            attempts,
            last_error,
        } => vec![
            Line::from(Span::styled(
                format!("✕ Service unavailable at {}", base_url),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("  gave up after {} attempts: {}", attempts, last_error),
                dim,
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  press r to retry, q to quit",
                Style::default().fg(Color::White),
            )),
        ],
    }
}
