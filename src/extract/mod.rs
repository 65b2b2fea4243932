//! Contribution calendar extraction from profile markup
//!
//! Extraction is written against the small [`MarkupDocument`] capability
//! (query by selector, read attribute, read text) so any HTML parser can back
//! it. [`HtmlDocument`] is the `scraper`-based implementation.

mod html;
pub mod tooltip;

pub use html::{HtmlDocument, HtmlNode};
pub use tooltip::{resolve_tooltip, TooltipIndex, TooltipSource};

use chrono::NaiveDate;

use crate::types::{ActivityLevel, DayRecord, ExtractionResult};

/// Headings scanned for the contribution total
pub const HEADING_SELECTOR: &str = "h2";

/// Calendar day cells; cells without a date are not part of the calendar
pub const DAY_CELL_SELECTOR: &str = "td.ContributionCalendar-day[data-date]";

/// Substring identifying the summary heading
const HEADING_KEYWORD: &str = "contributions";

/// A parsed document that can be queried with CSS selectors
pub trait MarkupDocument {
    type Node<'a>: MarkupNode<'a>
    where
        Self: 'a;

    /// All matching elements in document order
    fn select_all(&self, selector: &str) -> Vec<Self::Node<'_>>;
}

/// An element inside a `MarkupDocument`
pub trait MarkupNode<'a>: Sized {
    /// Matching descendants in document order
    fn select_all(&self, selector: &str) -> Vec<Self>;

    /// Raw attribute value
    fn attr(&self, name: &str) -> Option<&'a str>;

    /// Text content, trimmed with internal whitespace collapsed
    fn text(&self) -> String;
}

/// Parse markup and extract the calendar. Never fails; unusable input yields
/// an empty result.
pub fn extract(markup: &str) -> ExtractionResult {
    extract_from(&HtmlDocument::parse(markup))
}

/// Extract the calendar from an already parsed document
pub fn extract_from<D: MarkupDocument>(doc: &D) -> ExtractionResult {
    let total_label = find_total_label(doc);
    let index = TooltipIndex::build(doc);

    let records: Vec<DayRecord> = doc
        .select_all(DAY_CELL_SELECTOR)
        .iter()
        .filter_map(|cell| read_day_cell(cell, &index))
        .collect();

    log::debug!(
        "extracted {} day records ({} tooltip elements), total label {:?}",
        records.len(),
        index.len(),
        total_label
    );

    ExtractionResult {
        total_label,
        records,
    }
}

/// Text of the first `h2` mentioning contributions, or empty
pub fn find_total_label<D: MarkupDocument>(doc: &D) -> String {
    doc.select_all(HEADING_SELECTOR)
        .iter()
        .map(|h| h.text())
        .find(|text| text.contains(HEADING_KEYWORD))
        .unwrap_or_default()
}

/// Build a record from one day cell. Cells with an unparseable date are skipped.
fn read_day_cell<'a, N: MarkupNode<'a>>(cell: &N, index: &TooltipIndex) -> Option<DayRecord> {
    let raw_date = cell.attr("data-date")?;
    let date = match NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            log::warn!("skipping day cell with invalid date {:?}: {}", raw_date, e);
            return None;
        }
    };

    let level = ActivityLevel::from_attr(cell.attr("data-level"));
    let (_, tooltip_text) = resolve_tooltip(cell, date, index);

    Some(DayRecord {
        date,
        level,
        tooltip_text,
    })
}

/// Trim and collapse runs of whitespace into single spaces
pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
