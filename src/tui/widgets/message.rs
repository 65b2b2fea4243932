//! Centered message box for the error and configuration states

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::tui::theme::Theme;

const BOX_WIDTH: u16 = 56;
const SET_USER_COMMAND: &str = "contribgraph config set-user <name>";

/// What the message box is reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind<'a> {
    /// Load failed; `retry` shows the retry hint
    Error { message: &'a str, retry: bool },
    /// No username configured
    ConfigPrompt,
}

pub struct MessageBox<'a> {
    kind: MessageKind<'a>,
    theme: Theme,
}

impl<'a> MessageBox<'a> {
    pub fn new(kind: MessageKind<'a>, theme: Theme) -> Self {
        Self { kind, theme }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            MessageKind::Error { .. } => " Error ",
            MessageKind::ConfigPrompt => " Setup ",
        }
    }

    fn border_color(&self) -> Color {
        match self.kind {
            MessageKind::Error { .. } => self.theme.error(),
            MessageKind::ConfigPrompt => self.theme.warn(),
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let text = Style::default().fg(self.theme.text());
        let key = Style::default()
            .fg(self.theme.accent())
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.theme.muted());

        match self.kind {
            MessageKind::Error { message, retry } => {
                let mut lines = vec![Line::from(Span::styled(message, text)), Line::default()];
                if retry {
                    lines.push(Line::from(vec![
                        Span::styled("Press ", muted),
                        Span::styled("r", key),
                        Span::styled(" to retry", muted),
                    ]));
                }
                lines
            }
            MessageKind::ConfigPrompt => vec![
                Line::from(Span::styled("No GitHub username configured.", text)),
                Line::default(),
                Line::from(Span::styled("Set one with:", muted)),
                Line::from(Span::styled(SET_USER_COMMAND, key)),
                Line::from(Span::styled("or pass --user <name>", muted)),
            ],
        }
    }

    fn paragraph(&self) -> Paragraph<'a> {
        Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }

    /// Centered box sized to its content after wrapping
    pub fn centered_area(&self, area: Rect) -> Rect {
        let width = BOX_WIDTH.min(area.width);
        let inner_width = width.saturating_sub(2);
        let rows = self.paragraph().line_count(inner_width);
        let height = u16::try_from(rows)
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}

impl Widget for MessageBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        let popup = self.centered_area(area);

        let block = Block::default()
            .title(self.title())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color()));

        self.paragraph().block(block).render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(kind: MessageKind) -> String {
        let area = Rect::new(0, 0, 70, 12);
        let mut buf = Buffer::empty(area);
        MessageBox::new(kind, Theme::Dark).render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn test_error_with_retry() {
        let text = render(MessageKind::Error {
            message: "HTTP 404: Not Found",
            retry: true,
        });
        assert!(text.contains("Error"));
        assert!(text.contains("HTTP 404: Not Found"));
        assert!(text.contains("Press r to retry"));
    }

    #[test]
    fn test_error_without_retry() {
        let text = render(MessageKind::Error {
            message: "boom",
            retry: false,
        });
        assert!(text.contains("boom"));
        assert!(!text.contains("retry"));
    }

    #[test]
    fn test_config_prompt() {
        let text = render(MessageKind::ConfigPrompt);
        assert!(text.contains("No GitHub username configured."));
        assert!(text.contains(SET_USER_COMMAND));
        assert!(!text.contains("retry"));
    }

    #[test]
    fn test_long_error_keeps_retry_hint() {
        let message = "HTTP request failed: error sending request for url \
                       (https://github.com/users/octocat/contributions)";
        assert!(message.len() > (BOX_WIDTH - 4) as usize);

        let area = Rect::new(0, 0, 100, 30);
        let kind = MessageKind::Error {
            message,
            retry: true,
        };
        // two wrapped message rows, blank, hint, borders
        let rect = MessageBox::new(kind, Theme::Dark).centered_area(area);
        assert_eq!(rect.height, 6);

        let text = render(kind);
        assert!(text.contains("error sending request"));
        assert!(text.contains("to retry"));
    }

    #[test]
    fn test_centered_area_fits() {
        let area = Rect::new(0, 0, 30, 4);
        let rect = MessageBox::new(MessageKind::ConfigPrompt, Theme::Dark).centered_area(area);
        assert_eq!(rect.width, 30);
        assert_eq!(rect.height, 4);

        let area = Rect::new(0, 0, 100, 40);
        let rect = MessageBox::new(MessageKind::ConfigPrompt, Theme::Dark).centered_area(area);
        assert_eq!(rect, Rect::new(22, 16, BOX_WIDTH, 7));
    }
}
