// ABOUTME: Main TUI rendering function: assembles header, transcript, notice, input, and status bar.
// ABOUTME: Before the service is ready only the loading view is drawn.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::TuiState;
use crate::tui::widgets::chat::{empty_transcript_lines, pending_line, render_transcript_lines};
use crate::tui::widgets::loading::loading_lines;
use crate::tui::widgets::notice::notice_lines;
use crate::tui::widgets::status::{StatusBarParams, status_line};

/// Tallest the notice area may grow, in terminal rows.
const MAX_NOTICE_HEIGHT: u16 = 10;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    if state.is_ready() {
        render_chat_screen(frame, state);
    } else {
        render_loading_screen(frame, state);
    }
}

fn render_loading_screen(frame: &mut Frame, state: &TuiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Spacer
            Constraint::Min(3),    // Loading view
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(header_line(None)), chunks[0]);

    let lines = loading_lines(
        state.session().service_status(),
        &state.base_url,
        state.max_attempts,
        state.tick,
    );
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        chunks[2],
    );

    render_status(frame, state, chunks[3]);
}

fn render_chat_screen(frame: &mut Frame, state: &mut TuiState) {
    let notice = state
        .current_notice()
        .map(|n| notice_lines(n, state.notices.len().saturating_sub(1)));

    let mut constraints = vec![
        Constraint::Length(1), // Header
        Constraint::Min(3),    // Chat area
    ];
    if let Some(ref lines) = notice {
        let height = (lines.len() as u16).clamp(2, MAX_NOTICE_HEIGHT);
        constraints.push(Constraint::Length(height)); // Notice area
    }
    constraints.push(Constraint::Length(3)); // Input area
    constraints.push(Constraint::Length(1)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(header_line(state.session().current_filename())),
        chunks[0],
    );

    render_transcript(frame, state, chunks[1]);

    let (input_chunk, status_chunk) = match notice {
        Some(lines) => {
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[2]);
            (chunks[3], chunks[4])
        }
        None => (chunks[2], chunks[3]),
    };

    render_input(frame, state, input_chunk);
    render_status(frame, state, status_chunk);
}

fn header_line(filename: Option<&str>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            " pdfchat",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
    ];
    match filename {
        Some(name) => spans.push(Span::styled(
            name.to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::styled(
            "no PDF loaded",
            Style::default().fg(Color::DarkGray),
        )),
    }
    Line::from(spans)
}

fn render_transcript(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    let session = state.controller.session();
    let mut lines = if session.transcript().is_empty() {
        empty_transcript_lines(session.current_filename().is_some())
    } else {
        render_transcript_lines(session.transcript())
    };
    if session.is_answer_loading() {
        lines.push(Line::from(""));
        lines.push(pending_line(state.tick, session.asks_in_flight()));
    }

    // Use ratatui's own line_count() so the scroll math matches its wrapping.
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total_lines = paragraph.line_count(area.width) as u16;
    let max_scroll = total_lines.saturating_sub(area.height);

    // The bound depends on the wrapped height, known only here.
    let scroll = state.clamp_scroll(max_scroll);
    frame.render_widget(paragraph.scroll((scroll, 0)), area);
}

fn render_input(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    let blocked = state.has_notice();
    let mut block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(if blocked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        });

    let title = match state.controller.queued_question() {
        Some(_) => Some(" question queued "),
        None if state.session().is_answer_loading() => Some(" waiting for answer... "),
        None => None,
    };
    if let Some(title) = title {
        block = block.title(Span::styled(title, Style::default().fg(Color::DarkGray)));
    }

    state.clamp_cursor();
    let width = area.width.saturating_sub(1) as usize;
    let (visible, cursor_col) = visible_input(state.input(), state.cursor_pos, width);

    let content = if state.input().is_empty() {
        Span::styled(
            "Ask your question",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::raw(visible)
    };
    frame.render_widget(Paragraph::new(content).block(block), area);

    if !blocked && area.width > 0 && area.height > 1 {
        let cursor_x = area.x.saturating_add(cursor_col as u16);
        // +1 for the top border.
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

/// The slice of a single-line input to show in `width` columns so the cursor stays visible.
/// Returns the text and the cursor's display column within it.
pub fn visible_input(input: &str, cursor_pos: usize, width: usize) -> (String, usize) {
    let chars: Vec<char> = input.chars().collect();
    let cursor_pos = cursor_pos.min(chars.len());

    let mut start = 0;
    loop {
        let before: String = chars[start..cursor_pos].iter().collect();
        let col = UnicodeWidthStr::width(before.as_str());
        if col <= width || start >= cursor_pos {
            let visible: String = chars[start..].iter().collect();
            return (visible, col.min(width));
        }
        start += 1;
    }
}

fn render_status(frame: &mut Frame, state: &TuiState, area: Rect) {
    let session = state.session();
    let status = status_line(&StatusBarParams {
        service: session.service_status(),
        base_url: &state.base_url,
        pair_count: session.transcript().len(),
        asks_in_flight: session.asks_in_flight(),
        session_start: state.session_start,
        last_export: state.controller.last_export(),
    });
    frame.render_widget(Paragraph::new(status), area);
}
