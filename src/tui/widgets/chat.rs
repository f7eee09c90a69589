// ABOUTME: Chat widget: renders the Q&A transcript into styled ratatui Lines.
// ABOUTME: Questions are bold; answers are rendered from Markdown under an "A:" prefix.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::service::QaPair;
use crate::tui::markdown::markdown_lines;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// Render the transcript, one block per pair in order.
pub fn render_transcript_lines(transcript: &[QaPair]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, pair) in transcript.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let bold = Style::default().add_modifier(Modifier::BOLD);
        lines.push(Line::from(vec![
            Span::styled("Q: ", bold.fg(Color::Green)),
            Span::styled(pair.question.clone(), bold),
        ]));

        let prefix_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let answer = markdown_lines(&pair.answer);
        if answer.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("A: ", prefix_style),
                Span::styled(
                    "(no answer)",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
            continue;
        }

        // First line gets the prefix, the rest hang under it.
        for (i, line) in answer.into_iter().enumerate() {
            let prefix = if i == 0 {
                Span::styled("A: ", prefix_style)
            } else {
                Span::raw("   ")
            };
            let mut spans = vec![prefix];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }
    }

    lines
}

/// Placeholder shown before any question has been answered.
pub fn empty_transcript_lines(has_document: bool) -> Vec<Line<'static>> {
    let hint = if has_document {
        "Ask a question about the document below."
    } else {
        "Upload a PDF with /upload <path> (or Ctrl+O) to get started."
    };
    vec![Line::from(Span::styled(
        hint,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))]
}

/// Spinner line while answers are pending.
pub fn pending_line(tick: usize, in_flight: usize) -> Line<'static> {
    let label = if in_flight > 1 {
        format!(" Waiting for {} answers...", in_flight)
    } else {
        " Waiting for the answer...".to_string()
    };
    Line::from(vec![
        Span::styled(spinner_frame(tick), Style::default().fg(Color::Yellow)),
        Span::styled(label, Style::default().fg(Color::DarkGray)),
    ])
}
