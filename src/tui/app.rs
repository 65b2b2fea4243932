//! Application state and event loop

use std::io;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::services::{load_calendar, ContributionFetcher, GenerationCounter, SettingsStore, ViewState};
use crate::types::{CalendarData, Result};

use super::theme::Theme;
use super::widgets::{
    heatmap::{GridGeometry, GridSlot, GridSurface, GridView, GRID_HEIGHT},
    message::{MessageBox, MessageKind},
    spinner::Spinner,
    tooltip::{Bounds, TooltipController, TooltipPopup, Viewport},
};

const FOOTER_HEIGHT: u16 = 2;

/// Result of one background pipeline run, tagged with its generation
type LoadMessage = (u64, Result<CalendarData>);

/// Main application
pub struct App {
    state: ViewState,
    surface: GridSurface,
    tooltip: TooltipController,
    /// Selected slot (column, row), set by keyboard or mouse hover
    cursor: Option<(usize, usize)>,
    generations: GenerationCounter,
    spinner_frame: usize,
    theme: Theme,
    /// Terminal area at the last draw or resize
    viewport: Rect,
    should_quit: bool,
    retry_requested: bool,
}

impl App {
    /// Create a new app in loading state
    pub fn new(theme: Theme) -> Self {
        Self {
            state: ViewState::Loading,
            surface: GridSurface::new(),
            tooltip: TooltipController::terminal(),
            cursor: None,
            generations: GenerationCounter::new(),
            spinner_frame: 0,
            theme,
            viewport: Rect::default(),
            should_quit: false,
            retry_requested: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Enter the loading state and return the generation of the new run
    pub fn begin_load(&mut self) -> u64 {
        self.state = ViewState::Loading;
        self.spinner_frame = 0;
        self.clear_selection();
        self.generations.next()
    }

    /// Apply a finished run. Results from superseded runs are dropped.
    pub fn apply_result(&mut self, generation: u64, result: Result<CalendarData>) -> bool {
        if !self.generations.is_current(generation) {
            log::debug!(
                "dropping result of generation {} (current {})",
                generation,
                self.generations.current()
            );
            return false;
        }

        if let Err(e) = &result {
            log::warn!("load failed: {}", e);
        }
        self.clear_selection();
        self.state = ViewState::from_result(result);
        match &self.state {
            ViewState::Graph(data) => self.surface.render(&data.total_label, &data.weeks),
            _ => self.surface.clear(),
        }
        true
    }

    /// Handle keyboard, mouse and resize events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    if self.state.allows_retry() {
                        self.retry_requested = true;
                    }
                }
                KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
                KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
                KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
                KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
                _ => {}
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                self.hover(mouse.column, mouse.row);
            }
            Event::Resize(width, height) => {
                self.viewport = Rect::new(0, 0, width, height);
                // Layout moved; re-anchor the popup
                if let Some(pos) = self.cursor {
                    self.select(pos);
                }
            }
            _ => {}
        }
    }

    /// Consume a pending retry request
    pub fn take_retry_request(&mut self) -> bool {
        std::mem::take(&mut self.retry_requested)
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if matches!(self.state, ViewState::Loading) {
            self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&mut self, frame: &mut Frame) {
        self.viewport = frame.area();
        frame.render_widget(&*self, frame.area());
    }

    /// Split the screen into grid and footer areas
    fn layout(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
            .split(area);
        let body = chunks[0];
        let height = GRID_HEIGHT.min(body.height);
        let grid = Rect {
            y: body.y + (body.height - height) / 2,
            height,
            ..body
        };
        (grid, chunks[1])
    }

    fn grid_geometry(&self) -> GridGeometry {
        let (grid, _) = Self::layout(self.viewport);
        GridGeometry::new(grid, self.surface.columns().len())
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        if !matches!(self.state, ViewState::Graph(_)) {
            return;
        }
        let target = match self.cursor {
            None => self.surface.last_day(),
            Some((col, row)) if dx != 0 => {
                let geometry = self.grid_geometry();
                col.checked_add_signed(dx)
                    .filter(|c| geometry.is_visible(*c))
                    .and_then(|c| self.surface.nearest_day_row(c, row).map(|r| (c, r)))
            }
            Some((col, row)) => row
                .checked_add_signed(dy)
                .filter(|r| self.surface.slot(col, *r).is_some_and(GridSlot::is_day))
                .map(|r| (col, r)),
        };
        if let Some(pos) = target {
            self.select(pos);
        }
    }

    fn hover(&mut self, x: u16, y: u16) {
        if !matches!(self.state, ViewState::Graph(_)) {
            return;
        }
        match self.grid_geometry().hit_test(x, y) {
            Some(pos) if self.surface.slot(pos.0, pos.1).is_some_and(GridSlot::is_day) => {
                if self.cursor != Some(pos) || !self.tooltip.is_visible() {
                    self.select(pos);
                }
            }
            _ => self.clear_selection(),
        }
    }

    /// Select a day slot and show its tooltip
    fn select(&mut self, (col, row): (usize, usize)) {
        let Some(text) = self.surface.slot(col, row).and_then(GridSlot::hover_text) else {
            self.clear_selection();
            return;
        };
        self.cursor = Some((col, row));
        match self.grid_geometry().slot_rect(col, row) {
            Some(rect) => self
                .tooltip
                .show(Bounds::from(rect), text, Viewport::from(self.viewport)),
            None => self.tooltip.hide(),
        }
    }

    fn clear_selection(&mut self) {
        self.cursor = None;
        self.tooltip.hide();
    }

    fn render_footer(&self, data: &CalendarData, area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(self.theme.muted());
        let accent = Style::default().fg(self.theme.accent());
        let text = Style::default().fg(self.theme.text());

        let profile = Line::from(vec![
            Span::styled(format!("@{}", data.username), accent),
            Span::styled(" on GitHub", text),
            Span::styled(" · ", muted),
            Span::styled(data.profile_url.as_str(), muted),
        ]);
        let hints = Line::from(vec![
            Span::styled("←↓↑→", accent),
            Span::styled(" select  ", muted),
            Span::styled("r", accent),
            Span::styled(" refresh  ", muted),
            Span::styled("q", accent),
            Span::styled(" quit", muted),
        ]);
        Paragraph::new(vec![profile, hints])
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            ViewState::Loading => {
                Spinner::new(self.spinner_frame, self.theme).render(area, buf);
            }
            ViewState::ConfigPrompt => {
                MessageBox::new(MessageKind::ConfigPrompt, self.theme).render(area, buf);
            }
            ViewState::Error { message, retry } => {
                let kind = MessageKind::Error {
                    message: message.as_str(),
                    retry: *retry,
                };
                MessageBox::new(kind, self.theme).render(area, buf);
            }
            ViewState::Graph(data) => {
                let (grid, footer) = App::layout(area);
                GridView::new(&self.surface, self.theme)
                    .with_selected(self.cursor)
                    .render(grid, buf);
                self.render_footer(data, footer, buf);

                // Popup goes last so it sits above the grid
                if let Some(tooltip) = self.tooltip.active() {
                    TooltipPopup::new(tooltip, self.theme).render(area, buf);
                }
            }
        }
    }
}

/// Run the TUI application
pub fn run(
    store: Arc<dyn SettingsStore>,
    fetcher: Arc<dyn ContributionFetcher>,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let result = crossterm::execute!(io::stdout(), EnableMouseCapture)
        .map_err(anyhow::Error::from)
        .and_then(|_| run_app(&mut terminal, store, fetcher, theme));
    let _ = crossterm::execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

/// Run the pipeline on a background thread under a new generation
fn spawn_load(
    app: &mut App,
    tx: &Sender<LoadMessage>,
    store: &Arc<dyn SettingsStore>,
    fetcher: &Arc<dyn ContributionFetcher>,
) {
    let generation = app.begin_load();
    log::debug!("starting load generation {}", generation);

    let tx = tx.clone();
    let store = Arc::clone(store);
    let fetcher = Arc::clone(fetcher);
    thread::spawn(move || {
        let result = load_calendar(store.as_ref(), fetcher.as_ref());
        let _ = tx.send((generation, result));
    });
}

fn run_app(
    terminal: &mut DefaultTerminal,
    store: Arc<dyn SettingsStore>,
    fetcher: Arc<dyn ContributionFetcher>,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut app = App::new(theme);
    let (tx, rx) = mpsc::channel();
    spawn_load(&mut app, &tx, &store, &fetcher);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Check for load completion (non-blocking)
        while let Ok((generation, result)) = rx.try_recv() {
            app.apply_result(generation, result);
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }

        if app.take_retry_request() {
            spawn_load(&mut app, &tx, &store, &fetcher);
        }
    }

    Ok(())
}
