use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::tui::{InteractionRegistry, Renderer, Theme};
use crate::window::{Backend, WindowEvent, WindowSession};

/// Duplicate non-character keys inside this window are dropped.
const DEDUP_WINDOW_MS: u128 = 10;

/// Turns raw crossterm input into window events.
#[derive(Debug, Default)]
struct InputTranslator {
    last_key: Option<(KeyEvent, Instant)>,
}

impl InputTranslator {
    fn is_duplicate(&mut self, key: &KeyEvent, now: Instant) -> bool {
        let duplicate = !matches!(key.code, KeyCode::Char(_))
            && self.last_key.is_some_and(|(last, at)| {
                now.duration_since(at).as_millis() < DEDUP_WINDOW_MS
                    && last.code == key.code
                    && last.modifiers == key.modifiers
            });
        self.last_key = Some((*key, now));
        duplicate
    }

    /// Map one terminal event to a window event, if it means anything.
    fn translate(
        &mut self,
        event: Event,
        registry: &InteractionRegistry,
        now: Instant,
    ) -> Option<WindowEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.is_duplicate(&key, now) {
                    debug!("Skipping duplicate key event: {:?}", key.code);
                    return None;
                }
                match key.code {
                    KeyCode::Esc => Some(WindowEvent::closed()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(WindowEvent::closed())
                    }
                    KeyCode::Char('q') => Some(WindowEvent::closed()),
                    KeyCode::Char(c) => registry.find_hotkey(c).map(|id| WindowEvent::element(id)),
                    _ => None,
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => registry
                .find_click(mouse.column, mouse.row)
                .map(|id| WindowEvent::element(id)),
            // Blocking windows would otherwise keep the stale frame
            Event::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
                Some(WindowEvent::redraw())
            }
            _ => None,
        }
    }
}

/// Full-screen crossterm terminal. Taps and clicks hit-test the buttons
/// drawn in the last frame.
pub struct TerminalBackend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
    registry: InteractionRegistry,
    input: InputTranslator,
    restored: bool,
}

impl TerminalBackend {
    pub fn new(theme: Theme) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            theme,
            registry: InteractionRegistry::new(),
            input: InputTranslator::default(),
            restored: false,
        })
    }

    /// Hand the terminal back to the shell. Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Backend for TerminalBackend {
    fn read(&mut self, timeout: Option<Duration>) -> Result<WindowEvent> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if !event::poll(remaining).context("Failed to poll terminal events")? {
                    return Ok(WindowEvent::timeout());
                }
            }

            let raw = event::read().context("Failed to read terminal event")?;
            if let Some(event) = self.input.translate(raw, &self.registry, Instant::now()) {
                return Ok(event);
            }
        }
    }

    fn present(&mut self, session: &dyn WindowSession) -> Result<()> {
        let view = session.view();
        let surface = session.surface();
        let Self {
            terminal,
            theme,
            registry,
            ..
        } = self;

        registry.clear();
        terminal
            .draw(|frame| {
                let area = frame.area();
                Renderer::render(frame, theme, registry, surface, &view, area);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal: {:#}", e);
        }
    }
}
