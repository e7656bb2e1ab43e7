//! Deterministic multi-page PDF layout over lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// A4 page width in points.
const PAGE_WIDTH: f32 = 595.0;

/// A4 page height in points.
const PAGE_HEIGHT: f32 = 842.0;

/// Page margin in points.
const MARGIN: f32 = 56.0;

/// Vertical space added below each text line.
const LINE_GAP: f32 = 4.0;

/// Approximate average glyph width as a fraction of the font size, used for
/// word wrapping with the built-in Helvetica faces.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// Font face selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FontFace {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
}

impl FontFace {
    fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Accumulates text lines into pages, breaking when the current page runs
/// out of vertical room.
pub(crate) struct PdfBuilder {
    finished_pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PdfBuilder {
    /// Creates a builder positioned at the top of the first page.
    pub(crate) fn new() -> Self {
        Self {
            finished_pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Width available for text at the given indent, in characters.
    pub(crate) fn max_chars(size: f32, indent: f32) -> usize {
        let usable = PAGE_WIDTH - 2.0 * MARGIN - indent;
        (usable / (size * GLYPH_WIDTH_RATIO)).max(1.0) as usize
    }

    /// Starts a new page.
    fn break_page(&mut self) {
        self.finished_pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Breaks the page if fewer than `needed` points of room remain.
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            self.break_page();
        }
    }

    /// Emits one text line at the given indent.
    pub(crate) fn line(&mut self, face: FontFace, size: f32, indent: f32, text: &str) {
        let advance = size + LINE_GAP;
        self.ensure_room(advance);
        self.y -= size;

        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![face.resource_name().into(), size.into()],
        ));
        self.ops.push(Operation::new(
            "Td",
            vec![(MARGIN + indent).into(), self.y.into()],
        ));
        self.ops
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.ops.push(Operation::new("ET", vec![]));

        self.y -= LINE_GAP;
    }

    /// Emits a wrapped paragraph.
    pub(crate) fn paragraph(&mut self, face: FontFace, size: f32, indent: f32, text: &str) {
        for line in wrap_text(text, Self::max_chars(size, indent)) {
            self.line(face, size, indent, &line);
        }
    }

    /// Emits a horizontal rule across the text width.
    pub(crate) fn rule(&mut self) {
        self.ensure_room(10.0);
        self.y -= 5.0;

        self.ops.push(Operation::new("w", vec![Object::Real(0.5)]));
        self.ops
            .push(Operation::new("m", vec![MARGIN.into(), self.y.into()]));
        self.ops.push(Operation::new(
            "l",
            vec![(PAGE_WIDTH - MARGIN).into(), self.y.into()],
        ));
        self.ops.push(Operation::new("S", vec![]));

        self.y -= 5.0;
    }

    /// Adds vertical spacing.
    pub(crate) fn gap(&mut self, points: f32) {
        if self.y - points > MARGIN {
            self.y -= points;
        }
    }

    /// Assembles the accumulated pages into a PDF document.
    pub(crate) fn finish(mut self) -> Result<Vec<u8>, lopdf::Error> {
        if !self.ops.is_empty() || self.finished_pages.is_empty() {
            self.finished_pages.push(std::mem::take(&mut self.ops));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let font_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_regular,
                "F2" => font_bold,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in self.finished_pages {
            let content = Content { operations };
            let stream_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => stream_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// Greedy word wrap to a maximum line width in characters.
///
/// Words longer than the width are split hard rather than overflowing.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(index, _)| index)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text("hello world", 40), vec!["hello world"]);
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn wrap_splits_oversized_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn empty_builder_produces_single_page_document() {
        let builder = PdfBuilder::new();
        let bytes = builder.finish().expect("finish");

        let doc = Document::load_mem(&bytes).expect("load");
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_content_spans_multiple_pages() {
        let mut builder = PdfBuilder::new();
        for i in 0..200 {
            builder.line(FontFace::Regular, 11.0, 0.0, &format!("line {i}"));
        }
        let bytes = builder.finish().expect("finish");

        let doc = Document::load_mem(&bytes).expect("load");
        assert!(doc.get_pages().len() > 1);
    }
}
