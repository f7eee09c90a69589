// ABOUTME: TUI widget sub-modules for the transcript, notices, loading view, and status bar.
// ABOUTME: Each widget is a pure function producing styled ratatui Lines.

pub mod chat;
pub mod loading;
pub mod notice;
pub mod status;
