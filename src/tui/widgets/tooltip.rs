//! Hover tooltip: placement and single-instance lifecycle
//!
//! Placement is plain integer geometry so it can be tested without a
//! terminal. The popup is centered over its anchor, clamped horizontally to
//! the viewport, and flipped below the anchor when there is no room above.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Axis-aligned rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Convert to a terminal rect, clipped to `area`. None if nothing is visible.
    pub fn to_rect(&self, area: Rect) -> Option<Rect> {
        let left = self.x.max(area.x as i32);
        let top = self.y.max(area.y as i32);
        let right = self.right().min(area.right() as i32);
        let bottom = self.bottom().min(area.bottom() as i32);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self::new(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
        )
    }
}

/// Visible area the popup must stay within
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl From<Rect> for Viewport {
    fn from(rect: Rect) -> Self {
        Self {
            width: rect.right() as i32,
            height: rect.bottom() as i32,
        }
    }
}

/// Measured popup size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Spacing rules for popup placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Minimum distance between the popup and the viewport edges
    pub edge_margin: i32,
    /// Distance between the popup and its anchor
    pub gap: i32,
}

impl Placement {
    /// Character-cell spacing for terminal popups
    pub const TERMINAL: Placement = Placement {
        edge_margin: 1,
        gap: 0,
    };
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            edge_margin: 4,
            gap: 8,
        }
    }
}

/// Position a popup of `size` relative to `anchor`
pub fn place(anchor: Bounds, size: Size, viewport: Viewport, placement: Placement) -> Bounds {
    let margin = placement.edge_margin;

    let mut left = anchor.center_x() - size.width / 2;
    if left < margin {
        left = margin;
    }
    if left + size.width > viewport.width - margin {
        left = viewport.width - size.width - margin;
    }

    let mut top = anchor.y - size.height - placement.gap;
    if top < margin {
        top = anchor.bottom() + placement.gap;
    }

    Bounds::new(left, top, size.width, size.height)
}

/// A live popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub text: String,
    pub bounds: Bounds,
}

/// Measures the popup that would hold `text`
pub type MeasureFn = fn(&str) -> Size;

/// Terminal popup size: text plus one column of padding and a border each side
pub fn measure_terminal(text: &str) -> Size {
    Size {
        width: Line::from(text).width() as i32 + 4,
        height: 3,
    }
}

/// Owns at most one live tooltip
pub struct TooltipController {
    placement: Placement,
    measure: MeasureFn,
    active: Option<Tooltip>,
}

impl TooltipController {
    pub fn new(placement: Placement, measure: MeasureFn) -> Self {
        Self {
            placement,
            measure,
            active: None,
        }
    }

    /// Controller sized for terminal cells
    pub fn terminal() -> Self {
        Self::new(Placement::TERMINAL, measure_terminal)
    }

    /// Replace any live tooltip with one for `text` next to `anchor`
    pub fn show(&mut self, anchor: Bounds, text: &str, viewport: Viewport) {
        self.hide();

        let size = (self.measure)(text);
        let bounds = place(anchor, size, viewport, self.placement);
        self.active = Some(Tooltip {
            text: text.to_string(),
            bounds,
        });
    }

    /// Remove the live tooltip, if any
    pub fn hide(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&Tooltip> {
        self.active.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.active.is_some()
    }
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::terminal()
    }
}

/// Bordered popup drawing a tooltip
pub struct TooltipPopup<'a> {
    tooltip: &'a Tooltip,
    theme: Theme,
}

impl<'a> TooltipPopup<'a> {
    pub fn new(tooltip: &'a Tooltip, theme: Theme) -> Self {
        Self { tooltip, theme }
    }
}

impl Widget for TooltipPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(popup) = self.tooltip.bounds.to_rect(area) else {
            return;
        };

        // Clear the area first (for overlay effect)
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        Paragraph::new(Line::from(self.tooltip.text.as_str()))
            .style(Style::default().fg(self.theme.text()))
            .alignment(Alignment::Center)
            .block(block)
            .render(popup, buf);
    }
}
