// ABOUTME: Status bar widget: service state, base URL, pair count, pending answers, and session time.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use std::path::Path;
use std::time::Instant;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::session::ServiceStatus;

pub struct StatusBarParams<'a> {
    pub service: &'a ServiceStatus,
    pub base_url: &'a str,
    pub pair_count: usize,
    pub asks_in_flight: usize,
    pub session_start: Instant,
    pub last_export: Option<&'a Path>,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let white = Style::default().fg(Color::White);

    let (marker, label, color) = match params.service {
        ServiceStatus::Loading { .. } => ("○", "connecting", Color::Yellow),
        ServiceStatus::Ready => ("●", "ready", Color::Green),
        ServiceStatus::Unavailable { .. } => ("✕", "unavailable", Color::Red),
    };

    let mut spans = vec![
        Span::styled(format!(" {} {} ", marker, label), Style::default().fg(color)),
        Span::styled("| ", dim),
        Span::styled(format!("{} ", params.base_url), Style::default().fg(Color::Cyan)),
        Span::styled("| ", dim),
        Span::styled(format!("{} Q&A ", params.pair_count), white),
    ];

    if params.asks_in_flight > 0 {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            format!("{} pending ", params.asks_in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(
        format!("{} ", format_elapsed(params.session_start.elapsed().as_secs())),
        white,
    ));

    if let Some(path) = params.last_export {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            format!("saved {} ", path.display()),
            Style::default().fg(Color::Green),
        ));
    }

    Line::from(spans)
}

/// Format a duration for display: `Xm YYs` under an hour, `Xh YYm` above.
pub fn format_elapsed(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    fn params<'a>(service: &'a ServiceStatus) -> StatusBarParams<'a> {
        StatusBarParams {
            service,
            base_url: "http://localhost:8000",
            pair_count: 3,
            asks_in_flight: 0,
            session_start: Instant::now(),
            last_export: None,
        }
    }

    #[test]
    fn format_elapsed_minutes_and_hours() {
        assert_eq!(format_elapsed(0), "0m 00s");
        assert_eq!(format_elapsed(65), "1m 05s");
        assert_eq!(format_elapsed(3599), "59m 59s");
        assert_eq!(format_elapsed(3600), "1h 00m");
        assert_eq!(format_elapsed(7380), "2h 03m");
    }

    #[test]
    fn status_line_shows_ready_service() {
        let line = status_line(&params(&ServiceStatus::Ready));
        let text = text(&line);
        assert!(text.contains("ready"));
        assert!(text.contains("http://localhost:8000"));
        assert!(text.contains("3 Q&A"));
        assert!(!text.contains("pending"));
        assert!(!text.contains("saved"));
    }

    #[test]
    fn status_line_shows_pending_and_export() {
        let status = ServiceStatus::Ready;
        let export = Path::new("/tmp/qa_summary.pdf");
        let line = status_line(&StatusBarParams {
            asks_in_flight: 2,
            last_export: Some(export),
            ..params(&status)
        });
        let text = text(&line);
        assert!(text.contains("2 pending"));
        assert!(text.contains("saved /tmp/qa_summary.pdf"));
    }

    #[test]
    fn status_line_shows_unavailable() {
        let status = ServiceStatus::Unavailable {
            attempts: 6,
            last_error: "refused".to_string(),
        };
        let line = status_line(&params(&status));
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
        assert!(text(&line).contains("unavailable"));
    }
}
