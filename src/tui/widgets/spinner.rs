//! Loading spinner widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// App branding
const APP_NAME: &str = "contribgraph";
const LOADING_MESSAGE: &str = "Fetching contributions...";

/// Loading spinner widget
pub struct Spinner {
    frame: usize,
    theme: Theme,
}

impl Spinner {
    pub fn new(frame: usize, theme: Theme) -> Self {
        Self { frame, theme }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }
}

impl Widget for Spinner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 30 {
            return;
        }

        // 3 lines: name, empty, spinner
        let name_y = area.y + (area.height / 2).saturating_sub(1);
        let name_x = area.x + (area.width.saturating_sub(APP_NAME.len() as u16)) / 2;
        buf.set_string(
            name_x,
            name_y,
            APP_NAME,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        let spinner_text = format!("{} {}", self.current_char(), LOADING_MESSAGE);
        let spinner_y = name_y + 2;
        if spinner_y >= area.bottom() {
            return;
        }
        let width = spinner_text.chars().count() as u16;
        let spinner_x = area.x + (area.width.saturating_sub(width)) / 2;
        buf.set_string(
            spinner_x,
            spinner_y,
            &spinner_text,
            Style::default().fg(self.theme.accent()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_frames() {
        assert_eq!(SPINNER_FRAMES.len(), 10);
    }

    #[test]
    fn test_spinner_current_char() {
        let spinner = Spinner::new(0, Theme::Dark);
        assert_eq!(spinner.current_char(), '⠋');

        let spinner = Spinner::new(5, Theme::Dark);
        assert_eq!(spinner.current_char(), '⠴');
    }

    #[test]
    fn test_spinner_wraps() {
        let spinner = Spinner::new(10, Theme::Dark);
        assert_eq!(spinner.current_char(), '⠋'); // 10 % 10 = 0
    }

    #[test]
    fn test_next_frame() {
        assert_eq!(Spinner::next_frame(0), 1);
        assert_eq!(Spinner::next_frame(9), 0);
    }

    #[test]
    fn test_spinner_renders_message() {
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        Spinner::new(0, Theme::Dark).render(area, &mut buf);

        let row: String = (0..40)
            .map(|x| buf.cell((x, 3)).unwrap().symbol().to_string())
            .collect();
        assert!(row.contains("Fetching contributions..."));
        assert!(row.contains('⠋'));
    }

    #[test]
    fn test_spinner_skips_tiny_area() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        Spinner::new(0, Theme::Dark).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
