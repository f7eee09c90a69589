// ABOUTME: TUI state: the chat controller plus cursor, scroll, and the queue of blocking notices.
// ABOUTME: Bridges key-level input results and dispatcher events to controller operations.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

use crate::controller::{ChatController, Notice, Request, ServiceEvent};
use crate::session::Session;
use crate::tui::input::{HELP_TEXT, InputResult};

/// Full TUI application state.
pub struct TuiState {
    pub controller: ChatController,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    /// Blocking notices, oldest first. Only the front one is shown.
    pub notices: VecDeque<Notice>,
    pub base_url: String,
    pub max_attempts: u32,
    pub session_start: Instant,
    /// Render ticks since start; drives spinners.
    pub tick: usize,
}

impl TuiState {
    pub fn new(controller: ChatController, base_url: String, max_attempts: u32) -> Self {
        Self {
            controller,
            cursor_pos: 0,
            scroll_offset: 0,
            notices: VecDeque::new(),
            base_url,
            max_attempts,
            session_start: Instant::now(),
            tick: 0,
        }
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    pub fn is_ready(&self) -> bool {
        self.session().is_service_ready()
    }

    /// The text in the input line.
    pub fn input(&self) -> &str {
        self.controller.question()
    }

    /// Replace the input line and put the cursor at its end.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.controller.set_question(text);
        self.move_cursor_end();
    }

    pub fn clear_input(&mut self) {
        self.controller.question_mut().clear();
        self.cursor_pos = 0;
    }

    pub fn has_notice(&self) -> bool {
        !self.notices.is_empty()
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        tracing::debug!(message = %notice.message, "notice shown");
        self.notices.push_back(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Cap `scroll_offset` at the top of the content and return the row the
    /// viewport starts at. `scroll_offset` counts lines up from the bottom.
    pub fn clamp_scroll(&mut self, max_scroll: u16) -> u16 {
        self.scroll_offset = self.scroll_offset.min(max_scroll);
        max_scroll - self.scroll_offset
    }

    /// Carry out a command produced by key handling. Returns work for the dispatcher.
    pub fn apply_input(&mut self, result: InputResult) -> Option<Request> {
        match result {
            InputResult::None | InputResult::Quit => None,
            InputResult::Submit => match self.controller.request_ask() {
                Ok(request) => {
                    self.cursor_pos = 0;
                    self.scroll_offset = 0;
                    request
                }
                Err(err) => {
                    self.push_notice(err.into());
                    None
                }
            },
            InputResult::Upload(path) => self.request_upload(&path),
            InputResult::Export => self.controller.request_export(),
            InputResult::Retry => self.controller.retry_readiness(),
            InputResult::Help => {
                self.push_notice(Notice::info(HELP_TEXT));
                None
            }
            InputResult::Invalid(message) => {
                self.push_notice(Notice::error(message));
                None
            }
            InputResult::DismissNotice => {
                self.dismiss_notice();
                None
            }
        }
    }

    fn request_upload(&mut self, path: &Path) -> Option<Request> {
        match self.controller.request_upload(path) {
            Ok(request) => Some(request),
            Err(err) => {
                self.push_notice(err.into());
                None
            }
        }
    }

    /// Apply a dispatcher result. Returns follow-up work, if any.
    pub fn apply_event(&mut self, event: ServiceEvent) -> Option<Request> {
        let scrolls = matches!(
            event,
            ServiceEvent::AskFinished { .. } | ServiceEvent::UploadFinished { .. }
        );
        let reaction = self.controller.apply(event);
        if scrolls {
            self.scroll_offset = 0;
        }
        if let Some(notice) = reaction.notice {
            self.push_notice(notice);
        }
        reaction.follow_up
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(self.input(), self.cursor_pos)
    }

    /// Return the total number of characters in the input buffer.
    pub fn input_char_len(&self) -> usize {
        self.input().chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.controller.question_mut().insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Insert pasted text at the cursor. Line breaks become spaces; the input is one line.
    pub fn insert_str_at_cursor(&mut self, text: &str) {
        self.clamp_cursor();
        let cleaned: String = text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let byte_index = self.cursor_byte_index();
        self.controller
            .question_mut()
            .insert_str(byte_index, &cleaned);
        self.cursor_pos += cleaned.chars().count();
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(self.input(), self.cursor_pos - 1);
        self.controller.question_mut().replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(self.input(), self.cursor_pos + 1);
        self.controller.question_mut().replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
