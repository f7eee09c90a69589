// ABOUTME: Library root for pdfchat: re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod logging;
pub mod service;
pub mod session;
pub mod tui;
