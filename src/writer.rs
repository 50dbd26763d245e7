//! Length-prefixed line protocol.
//!
//! One value per line. Every sequence is preceded by its length, and every
//! polygon is written as a vertex count followed by `x` and `y` on separate
//! lines. Text is written verbatim: a newline inside a token is not escaped.

use std::fmt::Display;
use std::io::{self, Write};

use crate::proto::{
    AnnotateImageResponse, BoundingPoly, EntityAnnotation, TextAnnotation, vertices_of,
};

pub struct LineWriter<W> {
    out: W,
}

impl<W: Write> LineWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn value(&mut self, value: impl Display) -> io::Result<()> {
        writeln!(self.out, "{value}")
    }

    pub fn polygon(&mut self, poly: Option<&BoundingPoly>) -> io::Result<()> {
        let vertices = vertices_of(poly);
        self.value(vertices.len())?;
        for v in vertices {
            self.value(v.x)?;
            self.value(v.y)?;
        }
        Ok(())
    }

    /// Flat variant. The first annotation covers the whole image and is
    /// skipped; the count written is that of the remaining tokens.
    pub fn annotations(&mut self, annotations: &[EntityAnnotation]) -> io::Result<()> {
        let tokens = annotations.get(1..).unwrap_or_default();
        self.value(tokens.len())?;
        for annotation in tokens {
            self.polygon(annotation.bounding_poly.as_ref())?;
            self.value(&annotation.description)?;
        }
        Ok(())
    }

    /// Hierarchical variant, pre-order: pages, blocks, paragraphs, words.
    pub fn document(&mut self, document: &TextAnnotation) -> io::Result<()> {
        self.value(document.pages.len())?;
        for page in &document.pages {
            self.value(page.blocks.len())?;
            for block in &page.blocks {
                self.polygon(block.bounding_box.as_ref())?;
                self.value(block.paragraphs.len())?;
                for paragraph in &block.paragraphs {
                    self.polygon(paragraph.bounding_box.as_ref())?;
                    self.value(paragraph.words.len())?;
                    for word in &paragraph.words {
                        self.polygon(word.bounding_box.as_ref())?;
                        self.value(word.text())?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Renders the flat variant of a response.
pub fn render_annotations(response: &AnnotateImageResponse) -> io::Result<String> {
    render(|w| w.annotations(&response.text_annotations))
}

/// Renders the hierarchical variant of a response. A response without a
/// full-text annotation renders as a document with no pages.
pub fn render_document(response: &AnnotateImageResponse) -> io::Result<String> {
    let empty = TextAnnotation::default();
    let document = response.full_text_annotation.as_ref().unwrap_or(&empty);
    render(|w| w.document(document))
}

fn render(
    f: impl FnOnce(&mut LineWriter<Vec<u8>>) -> io::Result<()>,
) -> io::Result<String> {
    let mut writer = LineWriter::new(Vec::new());
    f(&mut writer)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{Block, Page, Paragraph, Symbol, Word};

    fn annotation(text: &str, points: &[(i32, i32)]) -> EntityAnnotation {
        EntityAnnotation {
            locale: String::new(),
            description: text.to_string(),
            bounding_poly: Some(BoundingPoly::from_points(points)),
        }
    }

    fn word(text: &str, points: &[(i32, i32)]) -> Word {
        Word {
            bounding_box: Some(BoundingPoly::from_points(points)),
            symbols: text
                .chars()
                .map(|c| Symbol {
                    bounding_box: None,
                    text: c.to_string(),
                })
                .collect(),
        }
    }

    fn flat(annotations: Vec<EntityAnnotation>) -> String {
        render_annotations(&AnnotateImageResponse {
            text_annotations: annotations,
            ..Default::default()
        })
        .unwrap()
    }

    fn hierarchical(pages: Vec<Page>) -> String {
        render_document(&AnnotateImageResponse {
            full_text_annotation: Some(TextAnnotation {
                pages,
                text: String::new(),
            }),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn flat_skips_whole_image_summary() {
        let out = flat(vec![
            annotation("HELLO WORLD", &[(0, 0), (30, 0), (30, 5), (0, 5)]),
            annotation("HELLO", &[(0, 0), (10, 0), (10, 5), (0, 5)]),
        ]);
        assert_eq!(out, "1\n4\n0\n0\n10\n0\n10\n5\n0\n5\nHELLO\n");
    }

    #[test]
    fn flat_empty_is_single_zero() {
        assert_eq!(flat(vec![]), "0\n");
    }

    #[test]
    fn flat_summary_only() {
        assert_eq!(flat(vec![annotation("X", &[(1, 1)])]), "0\n");
    }

    #[test]
    fn flat_keeps_service_order_and_missing_polygons() {
        let out = flat(vec![
            annotation("B A", &[]),
            annotation("B", &[(5, 6)]),
            EntityAnnotation {
                locale: String::new(),
                description: "A".into(),
                bounding_poly: None,
            },
        ]);
        assert_eq!(out, "2\n1\n5\n6\nB\n0\nA\n");
    }

    #[test]
    fn flat_does_not_escape_newlines() {
        let out = flat(vec![annotation("", &[]), annotation("a\nb", &[])]);
        assert_eq!(out, "1\n0\na\nb\n");
    }

    #[test]
    fn document_single_empty_page() {
        assert_eq!(hierarchical(vec![Page::default()]), "1\n0\n");
    }

    #[test]
    fn document_without_full_text_has_no_pages() {
        assert_eq!(render_document(&AnnotateImageResponse::default()).unwrap(), "0\n");
    }

    #[test]
    fn document_is_pre_order_and_length_prefixed() {
        let square = [(0, 0), (2, 0), (2, 2), (0, 2)];
        let page = Page {
            width: 100,
            height: 100,
            blocks: vec![Block {
                bounding_box: Some(BoundingPoly::from_points(&square)),
                paragraphs: vec![
                    Paragraph {
                        bounding_box: Some(BoundingPoly::from_points(&[(1, 2), (3, 4)])),
                        words: vec![word("Hi", &[(7, 8)]), word("yo", &[])],
                    },
                    Paragraph {
                        bounding_box: None,
                        words: vec![],
                    },
                ],
            }],
        };

        let expected = [
            "1", // pages
            "1", // blocks
            "4", "0", "0", "2", "0", "2", "2", "0", "2", //
            "2", // paragraphs
            "2", "1", "2", "3", "4", //
            "2", // words
            "1", "7", "8", "Hi", //
            "0", "yo", //
            "0", "0", // empty paragraph
        ];
        let out = hierarchical(vec![page]);
        assert_eq!(out.lines().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn output_is_deterministic() {
        let annotations = vec![annotation("ab", &[(0, 0)]), annotation("a", &[(1, 1)])];
        assert_eq!(flat(annotations.clone()), flat(annotations));
    }

    #[test]
    fn writes_through_any_sink() {
        let mut writer = LineWriter::new(Vec::new());
        writer.value(-3).unwrap();
        writer.polygon(None).unwrap();
        assert_eq!(writer.into_inner(), b"-3\n0\n");
    }

    /// Accepts `budget` bytes, then fails every write.
    struct ShortSink {
        budget: usize,
    }

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "sink full"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_errors_are_propagated() {
        let annotations = vec![annotation("ab", &[(0, 0)]), annotation("a", &[(1, 1)])];
        let mut writer = LineWriter::new(ShortSink { budget: 4 });
        let err = writer.annotations(&annotations).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);

        let document = TextAnnotation {
            pages: vec![Page::default()],
            text: String::new(),
        };
        let mut writer = LineWriter::new(ShortSink { budget: 2 });
        assert!(writer.document(&document).is_err());
    }
}
