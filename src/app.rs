use anyhow::Result;
use crossterm::event::{KeyEventKind, MouseEventKind};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::time::Duration;

use crate::event_source::{Event, EventSource, KeyCode, KeyEvent, KeyModifiers};
use crate::raster::RasterImage;
use crate::settings::Settings;
use crate::viewer::ImageViewer;

pub const APP_TITLE: &str = "vimg";

const HELP_TEXT: &str =
    "W/↑ Up  S/↓ Down  A/← Left  D/→ Right  Q/+ Zoom In  E/- Zoom Out  ^C Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

pub struct App {
    viewer: ImageViewer,
    subtitle: String,
    settings: Settings,
}

impl App {
    pub fn new(image: RasterImage, subtitle: impl Into<String>, settings: Settings) -> Self {
        let viewer = ImageViewer::new(image).with_maintain_center(settings.maintain_center_on_resize);
        Self {
            viewer,
            subtitle: subtitle.into(),
            settings,
        }
    }

    pub fn viewer(&self) -> &ImageViewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut ImageViewer {
        &mut self.viewer
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Image
                Constraint::Length(1), // Help bar
            ])
            .split(f.area());

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                APP_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::raw(self.subtitle.as_str()),
        ]))
        .centered()
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        f.render_widget(header, chunks[0]);

        f.render_widget(&mut self.viewer, chunks[1]);

        let view = self.viewer.view();
        let (w, h) = view.zoomed_size();
        let status = format!(" zoom {} · {w}x{h} px ", view.zoom_level());
        let footer = Paragraph::new(Line::from(vec![
            Span::styled(HELP_TEXT, Style::default().fg(Color::Yellow)),
            Span::styled(status, Style::default().fg(Color::Gray)),
        ]))
        .style(Style::default().bg(Color::Black));
        f.render_widget(footer, chunks[2]);
    }

    pub fn handle_event(&mut self, event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Mouse(mouse) => {
                if !matches!(
                    mouse.kind,
                    MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight
                ) {
                    self.viewer.handle_mouse(mouse);
                }
                None
            }
            Event::Resize(cols, rows) => {
                // The viewer picks up its new area on the next draw
                debug!("Terminal resized to {cols}x{rows}");
                None
            }
            _ => None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppAction> {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let pan = |fast: bool| {
            if fast {
                self.settings.fast_pan_step
            } else {
                self.settings.pan_step
            }
        };
        let zoom_step = self.settings.zoom_step;
        let fast_zoom_step = self.settings.fast_zoom_step;

        let view = self.viewer.view_mut();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(AppAction::Quit);
            }
            KeyCode::Char('w') => view.move_by(0, pan(false)),
            KeyCode::Char('W') => view.move_by(0, pan(true)),
            KeyCode::Up => view.move_by(0, pan(shift)),
            KeyCode::Char('s') => view.move_by(0, -pan(false)),
            KeyCode::Char('S') => view.move_by(0, -pan(true)),
            KeyCode::Down => view.move_by(0, -pan(shift)),
            KeyCode::Char('a') => view.move_by(pan(false), 0),
            KeyCode::Char('A') => view.move_by(pan(true), 0),
            KeyCode::Left => view.move_by(pan(shift), 0),
            KeyCode::Char('d') => view.move_by(-pan(false), 0),
            KeyCode::Char('D') => view.move_by(-pan(true), 0),
            KeyCode::Right => view.move_by(-pan(shift), 0),
            KeyCode::Char('q') | KeyCode::Char('=') => view.zoom(-zoom_step, None),
            KeyCode::Char('e') | KeyCode::Char('-') => view.zoom(zoom_step, None),
            KeyCode::Char('E') | KeyCode::Char('+') => view.zoom(-fast_zoom_step, None),
            KeyCode::Char('Q') | KeyCode::Char('_') => view.zoom(fast_zoom_step, None),
            _ => {}
        }
        None
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(50);

    loop {
        terminal.draw(|f| app.draw(f))?;

        if !event_source.poll(tick_rate)? {
            continue;
        }

        // Drain bursts (drags, wheel spins) before the next redraw
        let mut events_processed = 0;
        loop {
            let event = event_source.read()?;
            events_processed += 1;
            if app.handle_event(event) == Some(AppAction::Quit) {
                info!("Quit requested");
                return Ok(());
            }
            if events_processed >= 50 || !event_source.poll(Duration::from_millis(0))? {
                break;
            }
        }
    }
}
