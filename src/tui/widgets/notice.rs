// ABOUTME: Notice widget: a blocking message shown above the input until dismissed.
// ABOUTME: Errors are red, informational notices cyan; a hint line explains how to dismiss.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::controller::{Notice, NoticeLevel};

/// Render a notice: the message (one Line per text line) and a dismiss hint.
pub fn notice_lines(notice: &Notice, queued: usize) -> Vec<Line<'static>> {
    let (label, color) = match notice.level {
        NoticeLevel::Error => ("ERROR ", Color::Red),
        NoticeLevel::Info => ("NOTE ", Color::Cyan),
    };
    let label_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(Color::White);

    let mut lines = Vec::new();
    for (i, text) in notice.message.lines().enumerate() {
        let lead = if i == 0 {
            Span::styled(label, label_style)
        } else {
            Span::raw(" ".repeat(label.len()))
        };
        lines.push(Line::from(vec![lead, Span::styled(text.to_string(), text_style)]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(label, label_style)));
    }

    let hint = if queued > 0 {
        format!("press Enter to dismiss ({} more)", queued)
    } else {
        "press Enter to dismiss".to_string()
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )));
    lines
}
