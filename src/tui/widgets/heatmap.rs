//! Contribution grid: week columns turned into a 7-row heatmap
//!
//! [`GridSurface`] is the presentation state (summary text plus one column of
//! slots per week) and [`GridView`] draws it. [`GridGeometry`] maps slots to
//! screen cells and back, so drawing and hover hit-testing share one layout.

use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;
use crate::types::{ActivityLevel, DayRecord, WeekColumn};

/// Rows per column (Sun-Sat)
pub const GRID_ROWS: usize = 7;

/// Cell dimensions for grid layout
pub const CELL_WIDTH: u16 = 3; // 2 glyphs + 1 gap
const CELL_GLYPHS: u16 = 2;
const LABEL_WIDTH: u16 = 4; // "Mon " prefix

/// Summary line, blank line, month labels, then the 7 grid rows
const SUMMARY_ROWS: u16 = 2;
const MONTH_ROWS: u16 = 1;
pub const GRID_HEIGHT: u16 = SUMMARY_ROWS + MONTH_ROWS + GRID_ROWS as u16;

const CELL_GLYPH: &str = "██";

/// Weekday labels by row; GitHub labels alternate rows only
const WEEKDAY_LABELS: [&str; GRID_ROWS] = ["", "Mon", "", "Wed", "", "Fri", ""];

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One position in a grid column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridSlot {
    /// Invisible padding before the first day; no hover target
    Placeholder,
    /// A real day with its hover text
    Day {
        date: NaiveDate,
        level: ActivityLevel,
        tooltip: String,
    },
}

impl GridSlot {
    /// Tooltip text shown while hovering this slot
    pub fn hover_text(&self) -> Option<&str> {
        match self {
            Self::Placeholder => None,
            Self::Day { tooltip, .. } => Some(tooltip),
        }
    }

    pub fn is_day(&self) -> bool {
        matches!(self, Self::Day { .. })
    }
}

impl From<&DayRecord> for GridSlot {
    fn from(record: &DayRecord) -> Self {
        Self::Day {
            date: record.date,
            level: record.level,
            tooltip: record.tooltip_text.clone(),
        }
    }
}

/// Rendered grid state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridSurface {
    summary: String,
    columns: Vec<Vec<GridSlot>>,
}

impl GridSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all content with `weeks`.
    ///
    /// The first column is padded with placeholders up to its first weekday so
    /// every column lines up with Sunday on row 0.
    pub fn render(&mut self, total_label: &str, weeks: &[WeekColumn]) {
        self.clear();
        self.summary = total_label.to_string();

        for (week_idx, week) in weeks.iter().enumerate() {
            let mut column = Vec::with_capacity(GRID_ROWS);
            if week_idx == 0 {
                if let Some(first) = week.days.first() {
                    let padding = first.date.weekday().num_days_from_sunday() as usize;
                    column.extend(std::iter::repeat_n(GridSlot::Placeholder, padding));
                }
            }
            column.extend(week.days.iter().map(GridSlot::from));
            self.columns.push(column);
        }
    }

    pub fn clear(&mut self) {
        self.summary.clear();
        self.columns.clear();
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn columns(&self) -> &[Vec<GridSlot>] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn slot(&self, col: usize, row: usize) -> Option<&GridSlot> {
        self.columns.get(col).and_then(|c| c.get(row))
    }

    /// Position of the most recent day
    pub fn last_day(&self) -> Option<(usize, usize)> {
        let col = self.columns.len().checked_sub(1)?;
        let row = self.columns[col].iter().rposition(GridSlot::is_day)?;
        Some((col, row))
    }

    /// Row of the day in `col` closest to `row`
    pub fn nearest_day_row(&self, col: usize, row: usize) -> Option<usize> {
        self.columns
            .get(col)?
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_day())
            .min_by_key(|(r, _)| r.abs_diff(row))
            .map(|(r, _)| r)
    }

    /// Plain-text grid (summary plus one line per weekday) for non-interactive output
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        if !self.summary.is_empty() {
            out.push_str(&self.summary);
            out.push_str("\n\n");
        }
        for row in 0..GRID_ROWS {
            out.push_str(&format!("{:<4}", WEEKDAY_LABELS[row]));
            for column in &self.columns {
                let ch = match column.get(row) {
                    Some(GridSlot::Day { level, .. }) => level.to_char(),
                    Some(GridSlot::Placeholder) | None => ' ',
                };
                out.push(ch);
            }
            out.truncate(out.trim_end().len());
            out.push('\n');
        }
        out
    }
}

/// Screen layout of a grid inside an area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    area: Rect,
    /// x of the first visible column's glyphs
    origin_x: u16,
    /// y of the Sunday row
    origin_y: u16,
    /// Index of the leftmost visible column
    first_column: usize,
    visible_columns: usize,
}

impl GridGeometry {
    /// Fit `column_count` columns into `area`, keeping the most recent weeks
    /// when the area is too narrow, centered horizontally.
    pub fn new(area: Rect, column_count: usize) -> Self {
        let available = area.width.saturating_sub(LABEL_WIDTH);
        let visible_columns = ((available / CELL_WIDTH) as usize).min(column_count);
        let first_column = column_count - visible_columns;

        let grid_width = LABEL_WIDTH + visible_columns as u16 * CELL_WIDTH;
        let x_offset = area.width.saturating_sub(grid_width) / 2;

        Self {
            area,
            origin_x: area.x + x_offset + LABEL_WIDTH,
            origin_y: area.y + SUMMARY_ROWS + MONTH_ROWS,
            first_column,
            visible_columns,
        }
    }

    pub fn first_column(&self) -> usize {
        self.first_column
    }

    pub fn visible_columns(&self) -> usize {
        self.visible_columns
    }

    pub fn is_visible(&self, col: usize) -> bool {
        col >= self.first_column && col < self.first_column + self.visible_columns
    }

    /// x where the weekday labels and summary start
    fn label_x(&self) -> u16 {
        self.origin_x - LABEL_WIDTH
    }

    fn month_y(&self) -> u16 {
        self.origin_y - MONTH_ROWS
    }

    fn column_x(&self, col: usize) -> u16 {
        self.origin_x + (col - self.first_column) as u16 * CELL_WIDTH
    }

    /// Screen rect of a slot's glyphs, if the slot is on screen
    pub fn slot_rect(&self, col: usize, row: usize) -> Option<Rect> {
        if !self.is_visible(col) || row >= GRID_ROWS {
            return None;
        }
        let rect = Rect::new(
            self.column_x(col),
            self.origin_y + row as u16,
            CELL_GLYPHS,
            1,
        );
        (rect.right() <= self.area.right() && rect.bottom() <= self.area.bottom()).then_some(rect)
    }

    /// Slot under a screen position. Gaps between cells hit nothing.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let row = (y - self.origin_y) as usize;
        let rel_x = x - self.origin_x;
        let col = self.first_column + (rel_x / CELL_WIDTH) as usize;
        if rel_x % CELL_WIDTH >= CELL_GLYPHS {
            return None;
        }
        self.slot_rect(col, row).map(|_| (col, row))
    }
}

/// Heatmap widget for ratatui
pub struct GridView<'a> {
    surface: &'a GridSurface,
    theme: Theme,
    selected: Option<(usize, usize)>,
}

impl<'a> GridView<'a> {
    pub fn new(surface: &'a GridSurface, theme: Theme) -> Self {
        Self {
            surface,
            theme,
            selected: None,
        }
    }

    /// Highlight one slot
    pub fn with_selected(mut self, selected: Option<(usize, usize)>) -> Self {
        self.selected = selected;
        self
    }

    fn render_summary(&self, geometry: &GridGeometry, buf: &mut Buffer) {
        let area = geometry.area;
        let x = geometry.label_x();
        let max_width = area.right().saturating_sub(x) as usize;
        buf.set_stringn(
            x,
            area.y,
            self.surface.summary(),
            max_width,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );
    }

    /// Month name above the first visible column of each month
    fn render_month_labels(&self, geometry: &GridGeometry, buf: &mut Buffer) {
        let style = Style::default().fg(self.theme.muted());
        let right = geometry.area.right();
        let mut last_month: Option<u32> = None;
        let mut next_free_x = 0u16;

        for col in geometry.first_column()..geometry.first_column() + geometry.visible_columns() {
            let first_day = self.surface.columns()[col].iter().find_map(|slot| match slot {
                GridSlot::Day { date, .. } => Some(*date),
                GridSlot::Placeholder => None,
            });
            let Some(date) = first_day else {
                continue;
            };

            let month = date.month();
            if last_month.is_none_or(|m| m != month) {
                last_month = Some(month);
                let x = geometry.column_x(col);
                let label = MONTH_NAMES[date.month0() as usize];
                if x >= next_free_x && x + label.len() as u16 <= right {
                    buf.set_string(x, geometry.month_y(), label, style);
                    next_free_x = x + label.len() as u16 + 1;
                }
            }
        }
    }

    fn render_weekday_labels(&self, geometry: &GridGeometry, buf: &mut Buffer) {
        let style = Style::default().fg(self.theme.muted());
        for (row, label) in WEEKDAY_LABELS.iter().enumerate() {
            let y = geometry.origin_y + row as u16;
            if y >= geometry.area.bottom() {
                break;
            }
            if !label.is_empty() {
                buf.set_string(geometry.label_x(), y, label, style);
            }
        }
    }

    fn render_cells(&self, geometry: &GridGeometry, buf: &mut Buffer) {
        for col in geometry.first_column()..geometry.first_column() + geometry.visible_columns() {
            for (row, slot) in self.surface.columns()[col].iter().enumerate() {
                let GridSlot::Day { level, .. } = slot else {
                    continue;
                };
                let Some(rect) = geometry.slot_rect(col, row) else {
                    continue;
                };
                let color = if self.selected == Some((col, row)) {
                    self.theme.accent()
                } else {
                    self.theme.level_color(*level)
                };
                buf.set_string(rect.x, rect.y, CELL_GLYPH, Style::default().fg(color));
            }
        }
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let geometry = GridGeometry::new(area, self.surface.columns().len());

        self.render_summary(&geometry, buf);
        if area.height > SUMMARY_ROWS {
            self.render_month_labels(&geometry, buf);
        }
        self.render_weekday_labels(&geometry, buf);
        self.render_cells(&geometry, buf);
    }
}
