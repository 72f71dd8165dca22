use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};

use super::{Backend, ControllerState, SessionFactory, Signal, WindowKind, WindowSession};
use crate::error::DeskClockError;
use crate::feature::FeatureConfig;
use crate::settings::{Settings, SettingsStore, default_layout, or_default_layout};

/// Owns every live window and routes the event loop to the active one.
pub struct WindowController<F: SessionFactory> {
    factory: F,
    settings: Settings,
    store: Option<SettingsStore>,
    sessions: HashMap<WindowKind, Box<dyn WindowSession>>,
    active: Option<WindowKind>,
    state: ControllerState,
    main_layout: Vec<FeatureConfig>,
    background_recreated: bool,
}

impl<F: SessionFactory> WindowController<F> {
    pub fn new(factory: F, settings: Settings) -> Self {
        Self {
            factory,
            settings,
            store: None,
            sessions: HashMap::new(),
            active: None,
            state: ControllerState::BackgroundOnly,
            main_layout: Vec::new(),
            background_recreated: false,
        }
    }

    /// Persist settings through `store` whenever a new layout is applied.
    pub fn with_settings_store(mut self, store: SettingsStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    pub fn into_factory(self) -> F {
        self.factory
    }

    /// Layout the current or most recent main window was built from.
    pub fn main_layout(&self) -> &[FeatureConfig] {
        &self.main_layout
    }

    pub fn active_kind(&self) -> Option<WindowKind> {
        self.active
    }

    pub fn session(&self, kind: WindowKind) -> Option<&dyn WindowSession> {
        self.sessions.get(&kind).map(|session| session.as_ref())
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions.values().filter(|s| s.is_open()).count()
    }

    /// Create the background window, then the main window from the stored
    /// layout. A stored layout that cannot be built falls back to the
    /// default one; any other failure aborts startup.
    pub fn start(&mut self) -> crate::error::Result<()> {
        info!("Starting window controller");
        let background = self.factory.background()?;
        self.sessions.insert(WindowKind::Background, background);
        self.active = Some(WindowKind::Background);
        self.state = ControllerState::BackgroundOnly;

        let layout = self.settings.main_layout();
        match self.open_main(layout) {
            Ok(()) => Ok(()),
            Err(e) if e.is_layout_fault() => {
                warn!("Stored layout rejected ({}), using the default layout", e);
                self.open_main(default_layout())
            }
            Err(e) => Err(e),
        }
    }

    /// Run one iteration: present the active window, read one event with its
    /// timeout and act on it. Returns `false` once the controller shut down.
    pub fn dispatch<B: Backend>(&mut self, backend: &mut B) -> Result<bool> {
        if self.state == ControllerState::ShutDown {
            return Ok(false);
        }

        let kind = self.active.context("No active window")?;
        let session = self
            .sessions
            .get_mut(&kind)
            .with_context(|| format!("Active {} window is missing", kind))?;

        backend.present(session.as_ref())?;
        let event = backend.read(session.timeout())?;

        let signal = session
            .handle_event(&event)?
            .or_else(|| Signal::from_event(&event));

        match signal {
            None => {
                session.finalize();
                Ok(true)
            }
            Some(Signal::Tick) => {
                session.update()?;
                session.finalize();
                Ok(true)
            }
            Some(Signal::ToggleHourFormat) => {
                session.finalize();
                self.settings.enable_24_hour = !self.settings.enable_24_hour;
                info!("24-hour format set to {}", self.settings.enable_24_hour);
                Ok(true)
            }
            Some(Signal::OpenEditor) => {
                self.open_editor()?;
                Ok(true)
            }
            Some(Signal::Apply(layout)) => {
                self.apply(layout)?;
                Ok(true)
            }
            Some(Signal::Close) => self.close_active(),
        }
    }

    /// Dispatch until shutdown.
    pub fn run<B: Backend>(&mut self, backend: &mut B) -> Result<()> {
        while self.dispatch(backend)? {}
        info!("Window controller stopped");
        Ok(())
    }

    fn open_main(&mut self, layout: Vec<FeatureConfig>) -> crate::error::Result<()> {
        let session = self.factory.main(&layout, &self.settings)?;
        self.sessions.insert(WindowKind::Main, session);
        self.active = Some(WindowKind::Main);
        self.state = ControllerState::MainActive;
        self.main_layout = layout;
        debug!("Main window active");
        Ok(())
    }

    fn close_session(&mut self, kind: WindowKind) {
        if let Some(mut session) = self.sessions.remove(&kind) {
            session.close();
        }
        if self.active == Some(kind) {
            self.active = None;
        }
    }

    /// Fall back to the background window, recreating it once if it was
    /// closed behind the controller's back.
    fn ensure_background(&mut self) -> Result<()> {
        let open = self
            .sessions
            .get(&WindowKind::Background)
            .is_some_and(|session| session.is_open());

        if !open {
            if self.background_recreated {
                warn!("Background window lost again, continuing without it");
                self.sessions.remove(&WindowKind::Background);
                return Ok(());
            }
            warn!("Background window lost, recreating it");
            let background = self.factory.background()?;
            self.sessions.insert(WindowKind::Background, background);
            self.background_recreated = true;
        }

        self.active = Some(WindowKind::Background);
        self.state = ControllerState::BackgroundOnly;
        Ok(())
    }

    fn open_editor(&mut self) -> Result<()> {
        info!("Opening layout editor");
        self.close_session(WindowKind::Main);
        self.ensure_background()?;

        let editor = self.factory.editor(&self.settings)?;
        self.sessions.insert(WindowKind::Editor, editor);
        self.active = Some(WindowKind::Editor);
        self.state = ControllerState::EditorActive;
        Ok(())
    }

    /// Close the editor and rebuild the main window from `layout`. An empty
    /// layout becomes the default one; a layout that cannot be built leaves
    /// the previous one in place.
    fn apply(&mut self, layout: Vec<FeatureConfig>) -> Result<()> {
        if layout.is_empty() {
            info!("Editor saved no features, applying the default layout");
        }
        let layout = or_default_layout(layout);
        info!("Applying layout with {} features", layout.len());
        self.close_session(WindowKind::Editor);
        self.ensure_background()?;

        match self.open_main(layout.clone()) {
            Ok(()) => {
                self.settings.layout = Some(layout);
                self.persist_settings();
                Ok(())
            }
            Err(e) if e.is_layout_fault() => {
                error!("New layout rejected: {}", e);
                self.restore_main()
            }
            Err(e) => Err(e.into()),
        }
    }

    fn restore_main(&mut self) -> Result<()> {
        let previous = self.main_layout.clone();
        self.open_main(previous)
            .map_err(|e: DeskClockError| anyhow::Error::new(e).context("Failed to restore previous layout"))
    }

    fn close_active(&mut self) -> Result<bool> {
        match self.active {
            Some(WindowKind::Editor) => {
                info!("Editor closed without saving, returning to main window");
                self.close_session(WindowKind::Editor);
                self.ensure_background()?;
                self.restore_main()?;
                Ok(true)
            }
            kind => {
                info!("Shutting down from {:?} window", kind);
                self.close_all();
                Ok(false)
            }
        }
    }

    fn close_all(&mut self) {
        for (kind, mut session) in self.sessions.drain() {
            debug!("Closing {} window", kind);
            session.close();
        }
        self.active = None;
        self.state = ControllerState::ShutDown;
    }

    fn persist_settings(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.settings) {
                warn!("Failed to save settings: {:#}", e);
            }
        }
    }
}
