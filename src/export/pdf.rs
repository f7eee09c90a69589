// ABOUTME: PDF writer for transcript summaries, built on lopdf.
// ABOUTME: Draws laid-out pages with the standard Courier fonts; bold for questions and the title.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::export::layout::{LineStyle, Page, SummaryLayout};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Serialize laid-out pages into a PDF document.
pub fn render_pdf(pages: &[Page], layout: &SummaryLayout) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Courier"));
    let bold_id = doc.add_object(font("Courier-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let blank = [Page::default()];
    let pages = if pages.is_empty() { &blank[..] } else { pages };

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page, layout);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0i64.into(),
        0i64.into(),
        points(layout.page_width).into(),
        points(layout.page_height).into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let info_id = add_info(&mut doc, pages);
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    Ok(bytes)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_info(doc: &mut Document, pages: &[Page]) -> ObjectId {
    let title = pages
        .first()
        .and_then(|p| p.lines.iter().find(|l| l.style == LineStyle::Title))
        .map(|l| l.text.as_str())
        .unwrap_or_default();
    let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
    doc.add_object(dictionary! {
        "Title" => Object::String(encode_text(title), StringFormat::Literal),
        "Producer" => Object::string_literal("pdfchat"),
        "CreationDate" => Object::string_literal(created),
    })
}

fn page_content(page: &Page, layout: &SummaryLayout) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        let (font, size) = match line.style {
            LineStyle::Title => (BOLD_FONT, layout.title_size),
            LineStyle::Question => (BOLD_FONT, layout.body_size),
            LineStyle::Answer => (REGULAR_FONT, layout.body_size),
        };
        // PDF space grows upward from the bottom edge.
        let baseline = layout.page_height - line.y;

        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![font.into(), points(size).into()]));
        operations.push(Operation::new(
            "Td",
            vec![points(layout.margin_left).into(), points(baseline).into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_text(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

fn points(value: f32) -> i64 {
    value.round() as i64
}

/// Encode text for a WinAnsi standard font. Characters with no WinAnsi
/// code become `?`; carriage returns are dropped.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| match c {
            '\t' => b' ',
            c if (c as u32) < 0x20 => b'?',
            c if (0x7f..0xa0).contains(&(c as u32)) => b'?',
            c if (c as u32) <= 0xff => c as u32 as u8,
            c => win_ansi_byte(c).unwrap_or(b'?'),
        })
        .collect()
}

/// WinAnsiEncoding places these characters in 0x80..=0x9F.
fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::QaPair;

    fn render(pairs: &[QaPair]) -> (Vec<u8>, usize) {
        let layout = SummaryLayout::default();
        let pages = layout.layout("PDF Q&A Summary", pairs);
        let page_count = pages.len();
        (render_pdf(&pages, &layout).unwrap(), page_count)
    }

    #[test]
    fn renders_loadable_document() {
        let (bytes, _) = render(&[QaPair::new("What is the summary?", "It is a quarterly report.")]);
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("Q1: What is the summary?"));
        assert!(raw.contains("A1: It is a quarterly report."));
        assert!(raw.contains("Courier-Bold"));
    }

    #[test]
    fn page_count_matches_layout() {
        let long = "lorem ipsum ".repeat(300);
        let pairs: Vec<QaPair> = (0..8).map(|i| QaPair::new(format!("q{i}"), long.clone())).collect();
        let (bytes, expected) = render(&pairs);
        assert!(expected > 1);

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), expected);
    }

    #[test]
    fn empty_page_list_still_produces_a_page() {
        let layout = SummaryLayout::default();
        let bytes = render_pdf(&[], &layout).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn encode_text_maps_to_latin1() {
        assert_eq!(encode_text("café"), b"caf\xe9".to_vec());
        assert_eq!(encode_text("a\tb"), b"a b".to_vec());
        assert_eq!(encode_text("日本"), b"??".to_vec());
        assert_eq!(encode_text("\u{1}"), b"?".to_vec());
    }

    #[test]
    fn encode_text_maps_typographic_punctuation() {
        let bytes = encode_text("it\u{2019}s \u{201C}ok\u{201D} \u{2014} \u{2022} item \u{20AC}5\u{2026}");
        assert_eq!(
            bytes,
            vec![
                b'i', b't', 0x92, b's', b' ', 0x93, b'o', b'k', 0x94, b' ', 0x97, b' ', 0x95,
                b' ', b'i', b't', b'e', b'm', b' ', 0x80, b'5', 0x85,
            ]
        );
        assert_eq!(encode_text("\u{2018}a\u{2013}b"), vec![0x91, b'a', 0x96, b'b']);
    }

    #[test]
    fn encode_text_drops_carriage_returns() {
        assert_eq!(encode_text("line one\r"), b"line one".to_vec());
        assert_eq!(encode_text("\u{80}"), b"?".to_vec());
    }
}
