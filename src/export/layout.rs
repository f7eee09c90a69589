// ABOUTME: Summary layout: word-wraps Q&A pairs and paginates them onto fixed-size pages.
// ABOUTME: Pure geometry; the PDF writer only draws what this module places.

use crate::service::QaPair;

/// Horizontal advance of a Courier glyph as a fraction of the font size.
pub const COURIER_ADVANCE: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Question,
    Answer,
}

/// One line of text at a baseline offset measured from the top of its page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: LineStyle,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Page geometry in PDF points. Defaults to A4 portrait.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    /// No baseline is placed further than this from the top of a page.
    pub content_limit: f32,
    pub title_size: f32,
    pub body_size: f32,
    pub line_height: f32,
    pub pair_spacing: f32,
}

impl Default for SummaryLayout {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin_left: 40.0,
            margin_top: 56.0,
            content_limit: 790.0,
            title_size: 16.0,
            body_size: 11.0,
            line_height: 15.0,
            pair_spacing: 10.0,
        }
    }
}

impl SummaryLayout {
    /// Characters per body line.
    pub fn wrap_width(&self) -> usize {
        self.columns(self.body_size)
    }

    fn columns(&self, font_size: f32) -> usize {
        let usable = self.page_width - 2.0 * self.margin_left;
        ((usable / (font_size * COURIER_ADVANCE)).floor() as usize).max(1)
    }

    /// Lay out a title followed by a `Q{n}` / `A{n}` block per pair, in order.
    pub fn layout(&self, title: &str, pairs: &[QaPair]) -> Vec<Page> {
        let mut cursor = Cursor::new(self);

        for line in wrap_text(title, self.columns(self.title_size)) {
            cursor.place(line, LineStyle::Title, self.title_size + 6.0);
        }
        cursor.skip(self.pair_spacing);

        let width = self.wrap_width();
        for (idx, pair) in pairs.iter().enumerate() {
            let n = idx + 1;
            for line in wrap_text(&format!("Q{}: {}", n, pair.question), width) {
                cursor.place(line, LineStyle::Question, self.line_height);
            }
            for line in wrap_text(&format!("A{}: {}", n, pair.answer), width) {
                cursor.place(line, LineStyle::Answer, self.line_height);
            }
            cursor.skip(self.pair_spacing);
        }

        cursor.pages
    }
}

struct Cursor<'a> {
    layout: &'a SummaryLayout,
    pages: Vec<Page>,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(layout: &'a SummaryLayout) -> Self {
        Self {
            layout,
            pages: vec![Page::default()],
            y: layout.margin_top,
        }
    }

    fn place(&mut self, text: String, style: LineStyle, advance: f32) {
        if self.y > self.layout.content_limit {
            self.pages.push(Page::default());
            self.y = self.layout.margin_top;
        }
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                text,
                style,
                y: self.y,
            });
        }
        self.y += advance;
    }

    fn skip(&mut self, amount: f32) {
        self.y += amount;
    }
}

/// Greedy word wrap to at most `width` characters per line. Explicit newlines
/// start a new line; words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if word_len > width {
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(width).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece: String = chunk.iter().collect();
                    if chunks.peek().is_some() {
                        lines.push(piece);
                    } else {
                        current_len = chunk.len();
                        current = piece;
                    }
                }
                continue;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        lines.push(current);
    }

    lines
}
