// ABOUTME: TUI module: ratatui full-screen interface for pdfchat.
// ABOUTME: Transcript display, input handling, notices, loading view, and status bar.

pub mod input;
pub mod markdown;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
