//! Reader for the line protocol produced by [`crate::writer`].

use std::str::Lines;

use thiserror::Error;

use crate::proto::Vertex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unexpected end of input")]
    UnexpectedEof { line: usize },
    #[error("line {line}: expected an integer, found {found:?}")]
    NotAnInteger { line: usize, found: String },
    #[error("line {line}: negative count {value}")]
    NegativeCount { line: usize, value: i64 },
}

/// A region with its polygon and text, as read back from the flat output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedText {
    pub vertices: Vec<Vertex>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DetectedText {
    /// Mean of the vertices; the origin when there are none.
    pub fn center(&self) -> (f64, f64) {
        if self.vertices.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.vertices.len() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x as f64, sy + v.y as f64));
        (sx / n, sy / n)
    }

    pub fn x_range(&self) -> Option<(i32, i32)> {
        min_max(self.vertices.iter().map(|v| v.x))
    }

    pub fn y_range(&self) -> Option<(i32, i32)> {
        min_max(self.vertices.iter().map(|v| v.y))
    }

    /// Axis-aligned rectangle enclosing every vertex.
    pub fn bounds(&self) -> Option<Rect> {
        let (min_x, max_x) = self.x_range()?;
        let (min_y, max_y) = self.y_range()?;
        Some(Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

fn min_max(values: impl Iterator<Item = i32>) -> Option<(i32, i32)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLayout {
    pub blocks: Vec<BlockLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    pub vertices: Vec<Vertex>,
    pub paragraphs: Vec<ParagraphLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphLayout {
    pub vertices: Vec<Vertex>,
    pub words: Vec<DetectedText>,
}

struct LineReader<'a> {
    lines: Lines<'a>,
    line: usize,
}

impl<'a> LineReader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
            line: 0,
        }
    }

    fn text(&mut self) -> Result<&'a str, ParseError> {
        self.line += 1;
        let line = self
            .lines
            .next()
            .ok_or(ParseError::UnexpectedEof { line: self.line })?;
        Ok(line.strip_suffix('\r').unwrap_or(line))
    }

    fn int(&mut self) -> Result<i64, ParseError> {
        let raw = self.text()?;
        raw.trim().parse().map_err(|_| ParseError::NotAnInteger {
            line: self.line,
            found: raw.to_string(),
        })
    }

    fn coordinate(&mut self) -> Result<i32, ParseError> {
        let value = self.int()?;
        i32::try_from(value).map_err(|_| ParseError::NotAnInteger {
            line: self.line,
            found: value.to_string(),
        })
    }

    fn count(&mut self) -> Result<usize, ParseError> {
        let value = self.int()?;
        usize::try_from(value).map_err(|_| ParseError::NegativeCount {
            line: self.line,
            value,
        })
    }

    fn vertices(&mut self) -> Result<Vec<Vertex>, ParseError> {
        let n = self.count()?;
        let mut vertices = Vec::with_capacity(n.min(16));
        for _ in 0..n {
            let x = self.coordinate()?;
            let y = self.coordinate()?;
            vertices.push(Vertex { x, y });
        }
        Ok(vertices)
    }

    fn detected_text(&mut self) -> Result<DetectedText, ParseError> {
        let vertices = self.vertices()?;
        let text = self.text()?.to_string();
        Ok(DetectedText { vertices, text })
    }

    fn sequence<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let n = self.count()?;
        let mut items = Vec::with_capacity(n.min(256));
        for _ in 0..n {
            items.push(item(self)?);
        }
        Ok(items)
    }
}

/// Reads the flat variant. Lines may end with `\r\n`.
pub fn read_annotations(input: &str) -> Result<Vec<DetectedText>, ParseError> {
    LineReader::new(input).sequence(LineReader::detected_text)
}

/// Reads the hierarchical variant.
pub fn read_document(input: &str) -> Result<Vec<PageLayout>, ParseError> {
    LineReader::new(input).sequence(|r| {
        let blocks = r.sequence(|r| {
            let vertices = r.vertices()?;
            let paragraphs = r.sequence(|r| {
                let vertices = r.vertices()?;
                let words = r.sequence(LineReader::detected_text)?;
                Ok(ParagraphLayout { vertices, words })
            })?;
            Ok(BlockLayout {
                vertices,
                paragraphs,
            })
        })?;
        Ok(PageLayout { blocks })
    })
}
