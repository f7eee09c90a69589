// ABOUTME: Export module: turns a fetched Q&A transcript into a paginated summary PDF.
// ABOUTME: Layout (wrapping, pagination) is separate from PDF serialization.

pub mod layout;
pub mod pdf;

pub use layout::{LineStyle, Page, PlacedLine, SummaryLayout, wrap_text};
pub use pdf::render_pdf;
