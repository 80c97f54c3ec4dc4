//! Geometric page primitives supplied by a document backend
//!
//! Coordinates follow the PDF-text convention used by most extractors:
//! `x` grows to the right and `top`/`bottom` grow downwards from the top
//! edge of the page.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub top: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub bottom: f64,
}

impl Rect {
    /// Create a rectangle from its four edges
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self { x0, top, x1, bottom }
    }

    /// Horizontal size
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Vertical size
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Surface area
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Horizontal midpoint
    pub fn mid_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.x0 - margin,
            self.top - margin,
            self.x1 + margin,
            self.bottom + margin,
        )
    }

    /// True if `other` lies entirely within this rectangle (edges inclusive)
    pub fn contains(&self, other: &Rect) -> bool {
        other.x0 >= self.x0
            && other.x1 <= self.x1
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// True if the two rectangles share any area or touch
    pub fn intersects(&self, other: &Rect) -> bool {
        other.x0 <= self.x1 && other.x1 >= self.x0 && other.top <= self.bottom && other.bottom >= self.top
    }
}

/// A positioned word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text as decoded
    pub text: String,

    /// Bounding box
    #[serde(flatten)]
    pub rect: Rect,
}

impl Word {
    /// Create a word at the given position
    pub fn new(text: impl Into<String>, x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            text: text.into(),
            rect: Rect::new(x0, top, x1, bottom),
        }
    }
}

/// A painted line segment between two endpoints
///
/// `(x0, top)` is the first endpoint and `(x1, bottom)` the second; the
/// pairs are not guaranteed to be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeomLine {
    /// First endpoint x
    pub x0: f64,
    /// First endpoint y
    pub top: f64,
    /// Second endpoint x
    pub x1: f64,
    /// Second endpoint y
    pub bottom: f64,
}

impl GeomLine {
    /// Create a segment from its endpoints
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self { x0, top, x1, bottom }
    }

    /// Absolute horizontal extent
    pub fn horizontal_span(&self) -> f64 {
        (self.x1 - self.x0).abs()
    }

    /// Absolute vertical extent
    pub fn vertical_span(&self) -> f64 {
        (self.bottom - self.top).abs()
    }

    /// Mean vertical position of the two endpoints
    pub fn mid_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Normalised bounding box of the segment
    pub fn bbox(&self) -> Rect {
        Rect::new(
            self.x0.min(self.x1),
            self.top.min(self.bottom),
            self.x0.max(self.x1),
            self.top.max(self.bottom),
        )
    }
}

/// One cell of a detected table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Text as reported by the backend (`None` for merged/empty cells)
    #[serde(default)]
    pub text: Option<String>,

    /// Cell bounding box, when the backend reports one
    #[serde(default)]
    pub bbox: Option<Rect>,
}

impl TableCell {
    /// A cell carrying only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            bbox: None,
        }
    }
}

/// A table located on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedTable {
    /// Bounding box of the whole table
    pub bbox: Rect,

    /// Row-major cell grid; row 0 is the header
    pub rows: Vec<Vec<TableCell>>,
}

/// One decoded page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Zero-based page index within its document
    #[serde(default)]
    pub number: usize,

    /// Words in backend order
    #[serde(default)]
    pub words: Vec<Word>,

    /// Painted line segments
    #[serde(default)]
    pub lines: Vec<GeomLine>,

    /// Tables found on the page
    #[serde(default)]
    pub tables: Vec<DetectedTable>,

    /// Image bounding boxes
    #[serde(default)]
    pub images: Vec<Rect>,

    /// Plain-text rendering of the page
    #[serde(default)]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_and_contains() {
        let table = Rect::new(10.0, 10.0, 100.0, 50.0);
        let word = Rect::new(9.0, 9.5, 20.0, 15.0);

        assert!(!table.contains(&word));
        assert!(table.expand(2.0).contains(&word));
    }

    #[test]
    fn test_line_spans_ignore_endpoint_order() {
        let line = GeomLine::new(50.0, 200.0, 48.0, 100.0);
        assert_eq!(line.horizontal_span(), 2.0);
        assert_eq!(line.vertical_span(), 100.0);
        assert_eq!(line.bbox(), Rect::new(48.0, 100.0, 50.0, 200.0));
    }

    #[test]
    fn test_word_json_is_flat() {
        let word = Word::new("Q:", 1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(json["x0"], 1.0);
        assert_eq!(json["bottom"], 4.0);

        let parsed: Word = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, word);
    }
}
