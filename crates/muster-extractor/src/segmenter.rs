//! Geometric page segmentation
//!
//! Turns a decoded [`Page`] into ordered text lines: struck-through words
//! are removed, words are split between tables and free text, and FAQ
//! pages are further split into a left and right column around a detected
//! boundary.

use std::cmp::Ordering;
use std::sync::LazyLock;

use muster_domain::{DetectedTable, GeomLine, Page, Rect, Table, Word};
use regex::Regex;
use tracing::debug;

use crate::config::ExtractorConfig;

static FAQ_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)Q:.*A:").unwrap());

/// True if `text` holds a question marker followed later by an answer marker
pub fn contains_faq(text: &str) -> bool {
    FAQ_RE.is_match(text)
}

/// Line streams of a two-column FAQ page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqLayout {
    /// Lines above or below the column boundary (headers, titles)
    pub outside: Vec<String>,
    /// Left column lines, top to bottom
    pub left: Vec<String>,
    /// Right column lines, top to bottom
    pub right: Vec<String>,
}

impl FaqLayout {
    /// Column text in reading order: left column then right column
    pub fn column_lines(&self) -> Vec<String> {
        self.left.iter().chain(self.right.iter()).cloned().collect()
    }
}

/// Free text and tables of a battle-profile page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableLayout {
    /// Lines of words that fall outside every table
    pub outside: Vec<String>,
    /// Tables as cell-text grids
    pub tables: Vec<Table>,
}

/// Splits pages into line streams according to the configured tolerances
#[derive(Debug, Clone)]
pub struct PageSegmenter {
    config: ExtractorConfig,
}

impl PageSegmenter {
    /// Create a segmenter
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Segment a two-column FAQ page
    pub fn faq_layout(&self, page: &Page) -> FaqLayout {
        let words = self.visible_words(page);

        let Some(boundary) = self.find_column_boundary(&words, &page.images, &page.lines) else {
            debug!("Page {}: no column boundary, reading as one stream", page.number);
            let all: Vec<&Word> = words.iter().collect();
            return FaqLayout {
                outside: Vec::new(),
                left: group_lines(all, self.config.column_line_tolerance),
                right: Vec::new(),
            };
        };

        debug!("Page {}: column boundary {:?}", page.number, boundary);

        let midpoint = boundary.mid_x();
        let mut outside = Vec::new();
        let mut left = Vec::new();
        let mut right = Vec::new();
        for word in &words {
            if word.rect.top < boundary.top || word.rect.bottom > boundary.bottom {
                outside.push(word);
            } else if word.rect.x0 < midpoint {
                left.push(word);
            } else {
                right.push(word);
            }
        }

        FaqLayout {
            outside: group_lines(outside, self.config.outside_line_tolerance),
            left: group_lines(left, self.config.column_line_tolerance),
            right: group_lines(right, self.config.column_line_tolerance),
        }
    }

    /// Segment a battle-profile page into free text and tables
    pub fn table_layout(&self, page: &Page) -> TableLayout {
        let words = self.visible_words(page);
        let margin = self.config.table_margin;
        let regions: Vec<Rect> = page.tables.iter().map(|t| t.bbox.expand(margin)).collect();

        let outside: Vec<&Word> = words
            .iter()
            .filter(|w| !regions.iter().any(|r| r.contains(&w.rect)))
            .collect();

        let tables = page
            .tables
            .iter()
            .map(|table| self.table_text(table, &words))
            .collect();

        TableLayout {
            outside: group_lines(outside, self.config.outside_line_tolerance),
            tables,
        }
    }

    /// Words that survive strike-through removal
    fn visible_words(&self, page: &Page) -> Vec<Word> {
        let strikes: Vec<&GeomLine> = page
            .lines
            .iter()
            .filter(|l| l.vertical_span() <= self.config.strike_tolerance)
            .collect();

        page.words
            .iter()
            .filter(|word| !is_struck(word, &strikes))
            .cloned()
            .collect()
    }

    /// Pick the region that separates header text from the two columns.
    ///
    /// The largest image whose text looks like FAQ content wins; failing
    /// that, the longest near-vertical divider whose surroundings do.
    fn find_column_boundary(&self, words: &[Word], images: &[Rect], lines: &[GeomLine]) -> Option<Rect> {
        let image = images
            .iter()
            .filter(|image| contains_faq(&crop_text(words, image)))
            .max_by(|a, b| a.area().partial_cmp(&b.area()).unwrap_or(Ordering::Equal));
        if let Some(image) = image {
            return Some(*image);
        }

        lines
            .iter()
            .filter(|l| {
                l.horizontal_span() < self.config.divider_max_width
                    && l.vertical_span() > self.config.divider_min_height
            })
            .filter(|l| contains_faq(&crop_text(words, &l.bbox().expand(self.config.boundary_buffer))))
            .max_by(|a, b| {
                a.vertical_span()
                    .partial_cmp(&b.vertical_span())
                    .unwrap_or(Ordering::Equal)
            })
            .map(GeomLine::bbox)
    }

    /// Cell-text grid of a table; cells with a bounding box are rebuilt from
    /// the visible words inside them.
    fn table_text(&self, table: &DetectedTable, words: &[Word]) -> Table {
        table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell.bbox {
                        Some(bbox) => {
                            let inside: Vec<&Word> = words
                                .iter()
                                .filter(|w| bbox.contains(&center(&w.rect)))
                                .collect();
                            group_lines(inside, self.config.column_line_tolerance).join("\n")
                        }
                        None => cell.text.clone().unwrap_or_default(),
                    })
                    .collect()
            })
            .collect()
    }
}

/// A word is struck through when a flat line covers its full width at a
/// height inside the word's box.
fn is_struck(word: &Word, strikes: &[&GeomLine]) -> bool {
    strikes.iter().any(|line| {
        let span = line.bbox();
        let y = line.mid_y();
        span.x0 <= word.rect.x0
            && span.x1 >= word.rect.x1
            && y >= word.rect.top
            && y <= word.rect.bottom
    })
}

/// Space-joined text of the words touching `region`
fn crop_text(words: &[Word], region: &Rect) -> String {
    words
        .iter()
        .filter(|w| region.intersects(&w.rect))
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn center(rect: &Rect) -> Rect {
    let x = rect.mid_x();
    let y = (rect.top + rect.bottom) / 2.0;
    Rect::new(x, y, x, y)
}

/// Group words into text lines.
///
/// Words are ordered by (top, x0); a word joins the current line while its
/// top is within `tolerance` of the line's first word.
pub fn group_lines(mut words: Vec<&Word>, tolerance: f64) -> Vec<String> {
    words.sort_by(|a, b| {
        a.rect
            .top
            .partial_cmp(&b.rect.top)
            .unwrap_or(Ordering::Equal)
            .then(a.rect.x0.partial_cmp(&b.rect.x0).unwrap_or(Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<&Word> = Vec::new();
    let mut current_top = f64::NAN;

    for word in words {
        if current.is_empty() || (word.rect.top - current_top).abs() > tolerance {
            flush_line(&mut current, &mut lines);
            current_top = word.rect.top;
        }
        current.push(word);
    }
    flush_line(&mut current, &mut lines);

    lines
}

fn flush_line(current: &mut Vec<&Word>, lines: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    current.sort_by(|a, b| a.rect.x0.partial_cmp(&b.rect.x0).unwrap_or(Ordering::Equal));
    lines.push(
        current
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    );
    current.clear();
}
