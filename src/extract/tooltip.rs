//! Tooltip text resolution for calendar day cells
//!
//! Each source is tried in order; the first non-empty text wins. The date
//! fallback always produces text, so every cell ends up with a tooltip.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{MarkupDocument, MarkupNode};

/// Selector for the screen-reader label nested inside a cell
pub const SR_LABEL_SELECTOR: &str = "span.sr-only";

/// Selector for detached tooltip elements that reference a cell by id
pub const TOOLTIP_SELECTOR: &str = "tool-tip[for]";

/// en-US short form: "Sun, Jan 7, 2024"
const DATE_FALLBACK_FORMAT: &str = "%a, %b %-d, %Y";

/// Tooltip text of every `tool-tip[for]` element, keyed by the referenced id
#[derive(Debug, Default)]
pub struct TooltipIndex {
    by_target: HashMap<String, String>,
}

impl TooltipIndex {
    /// Index the document's tooltip elements. The first element for an id wins.
    pub fn build<D: MarkupDocument>(doc: &D) -> Self {
        let mut by_target = HashMap::new();
        for node in doc.select_all(TOOLTIP_SELECTOR) {
            if let Some(target) = node.attr("for") {
                by_target
                    .entry(target.to_string())
                    .or_insert_with(|| node.text());
            }
        }
        Self { by_target }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.by_target.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

/// Where a cell's tooltip text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipSource {
    ScreenReaderLabel,
    ReferencedTooltip,
    DateFallback,
}

impl TooltipSource {
    /// Resolution order
    pub const ORDER: [TooltipSource; 3] = [
        Self::ScreenReaderLabel,
        Self::ReferencedTooltip,
        Self::DateFallback,
    ];

    /// Try this source for a cell
    pub fn resolve<'a, N: MarkupNode<'a>>(
        self,
        cell: &N,
        date: NaiveDate,
        index: &TooltipIndex,
    ) -> Option<String> {
        match self {
            Self::ScreenReaderLabel => screen_reader_label(cell),
            Self::ReferencedTooltip => referenced_tooltip(cell.attr("id"), index),
            Self::DateFallback => Some(date_fallback(date)),
        }
    }
}

/// Text of the first nested screen-reader label
pub fn screen_reader_label<'a, N: MarkupNode<'a>>(cell: &N) -> Option<String> {
    cell.select_all(SR_LABEL_SELECTOR)
        .first()
        .map(|label| label.text())
}

/// Text of the tooltip element that points at `cell_id`
pub fn referenced_tooltip(cell_id: Option<&str>, index: &TooltipIndex) -> Option<String> {
    let id = cell_id.filter(|id| !id.is_empty())?;
    index.get(id).map(str::to_string)
}

/// Locale-style long date, e.g. "Sun, Jan 7, 2024"
pub fn date_fallback(date: NaiveDate) -> String {
    date.format(DATE_FALLBACK_FORMAT).to_string()
}

/// Resolve a cell's tooltip text, returning the winning source alongside it
pub fn resolve_tooltip<'a, N: MarkupNode<'a>>(
    cell: &N,
    date: NaiveDate,
    index: &TooltipIndex,
) -> (TooltipSource, String) {
    TooltipSource::ORDER
        .iter()
        .find_map(|&source| {
            source
                .resolve(cell, date, index)
                .filter(|text| !text.is_empty())
                .map(|text| (source, text))
        })
        .unwrap_or_else(|| (TooltipSource::DateFallback, date_fallback(date)))
}
