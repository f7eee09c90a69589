// ABOUTME: Keyboard input handling for the TUI: translates key events into actions.
// ABOUTME: Handles typing, slash commands, shortcuts, notices, and the not-ready screens.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::expand_home;
use crate::session::ServiceStatus;
use crate::tui::state::TuiState;

pub const HELP_TEXT: &str = "Type a question and press Enter to ask about the loaded PDF.\n\
/upload <path>  upload a PDF (Ctrl+O)\n\
/export         save the transcript as a PDF (Ctrl+E)\n\
/help           show this help\n\
/quit           exit (Ctrl+C)";

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// Ask the question in the input line.
    Submit,
    Upload(PathBuf),
    Export,
    /// Probe the service again after it was declared unavailable.
    Retry,
    Help,
    /// A malformed command; the message explains it.
    Invalid(String),
    DismissNotice,
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C and Ctrl+Q always quit
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return InputResult::Quit;
    }

    if !state.is_ready() {
        return handle_waiting_key(state, key.code);
    }

    // A notice blocks everything until it is dismissed.
    if state.has_notice() {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc => InputResult::DismissNotice,
            _ => InputResult::None,
        };
    }

    if handle_scroll_key(state, key.code) {
        return InputResult::None;
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('e') => InputResult::Export,
            KeyCode::Char('o') => {
                state.set_input("/upload ");
                InputResult::None
            }
            _ => InputResult::None,
        };
    }

    match key.code {
        KeyCode::Enter => submit(state),
        KeyCode::Char(c) => {
            state.insert_char_at_cursor(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            state.backspace_char();
            InputResult::None
        }
        KeyCode::Delete => {
            state.delete_char_at_cursor();
            InputResult::None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            state.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            state.move_cursor_end();
            InputResult::None
        }
        // Esc clears a draft first, then quits.
        KeyCode::Esc if !state.input().is_empty() => {
            state.clear_input();
            InputResult::None
        }
        KeyCode::Esc => InputResult::Quit,
        _ => InputResult::None,
    }
}

/// Keys accepted while the service is loading or unavailable.
fn handle_waiting_key(state: &TuiState, key: KeyCode) -> InputResult {
    let unavailable = matches!(
        state.session().service_status(),
        ServiceStatus::Unavailable { .. }
    );
    match key {
        KeyCode::Char('q') | KeyCode::Esc => InputResult::Quit,
        KeyCode::Char('r') if unavailable => InputResult::Retry,
        _ => InputResult::None,
    }
}

fn handle_scroll_key(state: &mut TuiState, key: KeyCode) -> bool {
    match key {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            true
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            true
        }
        KeyCode::Up => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
            true
        }
        KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
            true
        }
        _ => false,
    }
}

/// Enter: run a slash command, or ask the typed question.
fn submit(state: &mut TuiState) -> InputResult {
    let text = state.input().trim_start();
    if !is_command(text) {
        return InputResult::Submit;
    }
    let result = parse_command(text);
    state.clear_input();
    result
}

/// A command is a `/` followed by a bare word, so questions that start with
/// a path like `/etc/hosts` are still asked.
fn is_command(text: &str) -> bool {
    let name = text.split_whitespace().next().unwrap_or("");
    match name.strip_prefix('/') {
        Some(word) => !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

/// Parse a line starting with `/`.
pub fn parse_command(text: &str) -> InputResult {
    let text = text.trim();
    let (name, arg) = match text.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (text, ""),
    };

    match name {
        "/upload" => {
            let path = unquote(arg);
            if path.is_empty() {
                InputResult::Invalid("Usage: /upload <path-to-pdf>".to_string())
            } else {
                InputResult::Upload(expand_home(path))
            }
        }
        "/export" => InputResult::Export,
        "/help" => InputResult::Help,
        "/quit" | "/exit" => InputResult::Quit,
        other => InputResult::Invalid(format!(
            "Unknown command: {}. Type /help for the list of commands.",
            other
        )),
    }
}

/// Drop one pair of matching surrounding quotes, as terminals add when a file is dropped in.
fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    arg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AskOrdering;
    use crate::controller::{ChatController, Notice, ServiceEvent};

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn loading_state() -> TuiState {
        TuiState::new(
            ChatController::new(AskOrdering::Concurrent),
            "http://localhost:8000".to_string(),
            6,
        )
    }

    fn ready_state() -> TuiState {
        let mut state = loading_state();
        state.apply_event(ServiceEvent::Ready);
        state
    }

    fn type_text(state: &mut TuiState, text: &str) {
        for c in text.chars() {
            handle_key(state, make_key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_appends_to_input() {
        let mut state = ready_state();
        let result = handle_key(&mut state, make_key(KeyCode::Char('h')));
        assert_eq!(result, InputResult::None);
        assert_eq!(state.input(), "h");
        assert_eq!(state.cursor_pos, 1);

        handle_key(&mut state, make_key(KeyCode::Char('i')));
        assert_eq!(state.input(), "hi");
        assert_eq!(state.cursor_pos, 2);
    }

    #[test]
    fn enter_submits_question() {
        let mut state = ready_state();
        type_text(&mut state, "hello");
        let result = handle_key(&mut state, make_key(KeyCode::Enter));
        assert_eq!(result, InputResult::Submit);
        // The controller takes the text when the submission is applied.
        assert_eq!(state.input(), "hello");
    }

    #[test]
    fn backspace_deletes() {
        let mut state = ready_state();
        state.set_input("abc");
        let result = handle_key(&mut state, make_key(KeyCode::Backspace));
        assert_eq!(result, InputResult::None);
        assert_eq!(state.input(), "ab");
        assert_eq!(state.cursor_pos, 2);
    }

    #[test]
    fn ctrl_c_and_ctrl_q_quit() {
        let mut state = ready_state();
        assert_eq!(handle_key(&mut state, ctrl_key('c')), InputResult::Quit);
        assert_eq!(handle_key(&mut state, ctrl_key('q')), InputResult::Quit);
    }

    #[test]
    fn loading_ignores_typing() {
        let mut state = loading_state();
        let result = handle_key(&mut state, make_key(KeyCode::Char('x')));
        assert_eq!(result, InputResult::None);
        assert_eq!(state.input(), "");
        assert_eq!(handle_key(&mut state, make_key(KeyCode::Char('r'))), InputResult::None);
        assert_eq!(handle_key(&mut state, make_key(KeyCode::Char('q'))), InputResult::Quit);
    }

    #[test]
    fn unavailable_accepts_retry() {
        let mut state = loading_state();
        state.apply_event(ServiceEvent::Unavailable {
            attempts: 6,
            last_error: "refused".to_string(),
        });
        assert_eq!(
            handle_key(&mut state, make_key(KeyCode::Char('r'))),
            InputResult::Retry
        );
    }

    #[test]
    fn notice_blocks_input_until_dismissed() {
        let mut state = ready_state();
        state.push_notice(Notice::error("Please upload a PDF first."));

        assert_eq!(
            handle_key(&mut state, make_key(KeyCode::Char('x'))),
            InputResult::None
        );
        assert_eq!(state.input(), "");
        assert_eq!(handle_key(&mut state, ctrl_key('e')), InputResult::None);
        assert_eq!(
            handle_key(&mut state, make_key(KeyCode::Enter)),
            InputResult::DismissNotice
        );
        assert_eq!(
            handle_key(&mut state, make_key(KeyCode::Esc)),
            InputResult::DismissNotice
        );
        assert_eq!(handle_key(&mut state, ctrl_key('c')), InputResult::Quit);
    }

    #[test]
    fn scroll_keys_adjust_offset() {
        let mut state = ready_state();
        state.scroll_offset = 2;

        handle_key(&mut state, make_key(KeyCode::Up));
        assert_eq!(state.scroll_offset, 3);
        handle_key(&mut state, make_key(KeyCode::Down));
        assert_eq!(state.scroll_offset, 2);
        handle_key(&mut state, make_key(KeyCode::PageUp));
        assert_eq!(state.scroll_offset, 12);
        handle_key(&mut state, make_key(KeyCode::PageDown));
        handle_key(&mut state, make_key(KeyCode::PageDown));
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn shortcuts() {
        let mut state = ready_state();
        assert_eq!(handle_key(&mut state, ctrl_key('e')), InputResult::Export);

        assert_eq!(handle_key(&mut state, ctrl_key('o')), InputResult::None);
        assert_eq!(state.input(), "/upload ");
        assert_eq!(state.cursor_pos, 8);
    }

    #[test]
    fn esc_clears_draft_then_quits() {
        let mut state = ready_state();
        state.set_input("draft");
        assert_eq!(handle_key(&mut state, make_key(KeyCode::Esc)), InputResult::None);
        assert_eq!(state.input(), "");
        assert_eq!(handle_key(&mut state, make_key(KeyCode::Esc)), InputResult::Quit);
    }

    #[test]
    fn upload_command_clears_input() {
        let mut state = ready_state();
        type_text(&mut state, "/upload report.pdf");
        let result = handle_key(&mut state, make_key(KeyCode::Enter));
        assert_eq!(result, InputResult::Upload(PathBuf::from("report.pdf")));
        assert_eq!(state.input(), "");
        assert_eq!(state.cursor_pos, 0);
    }

    #[test]
    fn unicode_editing_through_key_events() {
        let mut state = ready_state();
        handle_key(&mut state, make_key(KeyCode::Char('🙂')));
        handle_key(&mut state, make_key(KeyCode::Char('é')));
        assert_eq!(state.input(), "🙂é");
        assert_eq!(state.cursor_pos, 2);

        handle_key(&mut state, make_key(KeyCode::Left));
        handle_key(&mut state, make_key(KeyCode::Delete));
        assert_eq!(state.input(), "🙂");
        assert_eq!(state.cursor_pos, 1);

        handle_key(&mut state, make_key(KeyCode::Backspace));
        assert_eq!(state.input(), "");
        assert_eq!(state.cursor_pos, 0);
    }

    #[test]
    fn parse_commands() {
        assert_eq!(parse_command("/export"), InputResult::Export);
        assert_eq!(parse_command("/help"), InputResult::Help);
        assert_eq!(parse_command("/quit"), InputResult::Quit);
        assert_eq!(parse_command("/exit"), InputResult::Quit);
        assert_eq!(
            parse_command("/upload   docs/a b.pdf  "),
            InputResult::Upload(PathBuf::from("docs/a b.pdf"))
        );
        assert_eq!(
            parse_command("/upload '/tmp/My Report.pdf'"),
            InputResult::Upload(PathBuf::from("/tmp/My Report.pdf"))
        );
    }

    #[test]
    fn upload_without_path_is_invalid() {
        assert!(matches!(parse_command("/upload"), InputResult::Invalid(_)));
        assert!(matches!(parse_command("/upload   "), InputResult::Invalid(_)));
    }

    #[test]
    fn unknown_command_is_invalid() {
        match parse_command("/frobnicate now") {
            InputResult::Invalid(message) => assert!(message.contains("/frobnicate")),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn question_starting_with_a_path_is_submitted() {
        let mut state = ready_state();
        type_text(&mut state, "/etc/hosts: what does this list?");
        let result = handle_key(&mut state, make_key(KeyCode::Enter));
        assert_eq!(result, InputResult::Submit);
        assert_eq!(state.input(), "/etc/hosts: what does this list?");

        assert!(is_command("/export"));
        assert!(is_command("/upload a.pdf"));
        assert!(!is_command("/"));
        assert!(!is_command("/2024 figures?"));
    }

    #[test]
    fn upload_expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                parse_command("/upload ~/a.pdf"),
                InputResult::Upload(home.join("a.pdf"))
            );
        }
    }
}
