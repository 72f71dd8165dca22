//! Stand-alone window for trying one feature type in isolation.
//!
//! The harness fills a `rows` x `cols` grid with instances of a single
//! variant, ticks them on a short timeout and logs how long each instance
//! took to handle the first tick and every user event.

use std::time::{Duration, Instant};

use log::{debug, info};

use super::{
    BackgroundWindow, EventId, SessionFactory, Signal, Surface, WindowEvent, WindowKind, WindowSession,
    events,
};
use crate::error::{DeskClockError, Result};
use crate::feature::{FeatureConfig, FeatureContext, FeatureRegistry};
use crate::keys::KeyNamespace;
use crate::layout::{GridLayout, GridLayoutEngine};
use crate::settings::Settings;
use crate::tui::Element;

/// Read wait between harness ticks.
pub const HARNESS_TIMEOUT: Duration = Duration::from_millis(50);

/// Handling times measured for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlingReport {
    pub event: EventId,
    pub per_instance: Vec<Duration>,
    pub total: Duration,
}

/// Main-window stand-in holding a grid of one feature variant.
pub struct FeatureHarness {
    type_id: String,
    layout: GridLayout,
    surface: Surface,
    ticks: u64,
    last_report: Option<HandlingReport>,
    closed: bool,
}

impl FeatureHarness {
    pub fn build(
        type_id: &str,
        rows: usize,
        cols: usize,
        registry: &FeatureRegistry,
        context: &FeatureContext,
        namespace: &mut KeyNamespace,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(DeskClockError::construction(
                "harness",
                format!("grid of {}x{} has no slots", rows, cols),
            ));
        }

        let instances = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .map(|(row, col)| registry.instantiate(&FeatureConfig::new(type_id, row, col), context, namespace))
            .collect::<Result<Vec<_>>>()?;

        let mut layout = GridLayoutEngine.arrange(instances)?;
        let mut surface = Surface::new();
        for instance in layout.instances_mut() {
            instance.attach(&mut surface);
        }
        surface.finalize();

        info!("Trying feature '{}' on a {}x{} grid", type_id, rows, cols);

        Ok(Self {
            type_id: type_id.to_string(),
            layout,
            surface,
            ticks: 0,
            last_report: None,
            closed: false,
        })
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Timeout ticks handled so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Timing of the most recent logged event.
    pub fn last_report(&self) -> Option<&HandlingReport> {
        self.last_report.as_ref()
    }

    fn record(&mut self, report: HandlingReport) {
        for (index, elapsed) in report.per_instance.iter().enumerate() {
            info!(
                "{} instance {} handled {:?} in {:?}",
                self.type_id, index, report.event, elapsed
            );
        }
        info!(
            "{} instances of {} handled {:?} in {:?}",
            report.per_instance.len(),
            self.type_id,
            report.event,
            report.total
        );
        self.last_report = Some(report);
    }
}

impl WindowSession for FeatureHarness {
    fn kind(&self) -> WindowKind {
        WindowKind::Main
    }

    fn timeout(&self) -> Option<Duration> {
        Some(HARNESS_TIMEOUT)
    }

    fn handle_event(&mut self, event: &WindowEvent) -> anyhow::Result<Option<Signal>> {
        let started = Instant::now();
        let mut per_instance = Vec::with_capacity(self.layout.instances().len());
        for instance in self.layout.instances_mut() {
            let begun = Instant::now();
            instance.handle_event(event, &mut self.surface)?;
            per_instance.push(begun.elapsed());
        }

        if event.id != EventId::Timeout {
            self.record(HandlingReport {
                event: event.id.clone(),
                per_instance,
                total: started.elapsed(),
            });
        }

        if event.is_element(events::MAIN_EXIT) {
            return Ok(Some(Signal::Close));
        }
        Ok(None)
    }

    fn update(&mut self) -> anyhow::Result<()> {
        let started = Instant::now();
        let mut per_instance = Vec::with_capacity(self.layout.instances().len());
        for instance in self.layout.instances_mut() {
            let begun = Instant::now();
            instance.tick(&mut self.surface)?;
            per_instance.push(begun.elapsed());
        }
        self.ticks += 1;

        if self.ticks == 1 {
            self.record(HandlingReport {
                event: EventId::Timeout,
                per_instance,
                total: started.elapsed(),
            });
        }
        Ok(())
    }

    fn finalize(&mut self) -> usize {
        self.surface.finalize()
    }

    fn view(&self) -> Element {
        let controls = Element::row(vec![Element::button(events::MAIN_EXIT, "Exit").hotkey('x').build()]).build();
        self.layout.view(controls)
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn is_open(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        debug!("Harness for {} closed", self.type_id);
        self.closed = true;
    }
}

/// Sessions for `try-feature`: the stored layout is ignored and no editor
/// is offered.
pub struct HarnessSessions {
    registry: FeatureRegistry,
    namespace: KeyNamespace,
    type_id: String,
    rows: usize,
    cols: usize,
}

impl HarnessSessions {
    pub fn new(registry: FeatureRegistry, type_id: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            registry,
            namespace: KeyNamespace::new(),
            type_id: type_id.into(),
            rows,
            cols,
        }
    }

    pub fn namespace(&self) -> &KeyNamespace {
        &self.namespace
    }
}

impl SessionFactory for HarnessSessions {
    fn background(&mut self) -> Result<Box<dyn WindowSession>> {
        Ok(Box::new(BackgroundWindow::new()))
    }

    fn main(&mut self, _layout: &[FeatureConfig], settings: &Settings) -> Result<Box<dyn WindowSession>> {
        if !self.registry.contains(&self.type_id) {
            return Err(DeskClockError::construction(
                "harness",
                format!("unknown feature type '{}'", self.type_id),
            ));
        }
        let context = FeatureContext {
            enable_24_hour: settings.enable_24_hour,
        };
        let harness = FeatureHarness::build(
            &self.type_id,
            self.rows,
            self.cols,
            &self.registry,
            &context,
            &mut self.namespace,
        )?;
        Ok(Box::new(harness))
    }

    fn editor(&mut self, _settings: &Settings) -> Result<Box<dyn WindowSession>> {
        Err(DeskClockError::construction("editor", "not available while trying a feature"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn build(rows: usize, cols: usize, namespace: &mut KeyNamespace) -> Result<FeatureHarness> {
        FeatureHarness::build(
            "Clock",
            rows,
            cols,
            &FeatureRegistry::with_builtin(),
            &FeatureContext::default(),
            namespace,
        )
    }

    #[test]
    fn test_grid_instances_get_distinct_keys() {
        let mut namespace = KeyNamespace::new();
        let harness = build(2, 3, &mut namespace).unwrap();

        assert_eq!(harness.layout().rows(), 2);
        assert_eq!(harness.layout().cols(), 3);
        assert_eq!(harness.layout().instances().len(), 6);

        let keys: HashSet<String> = harness
            .layout()
            .instances()
            .iter()
            .flat_map(|instance| instance.keys().iter().map(|(_, key)| key.as_str().to_string()))
            .collect();
        let minted: usize = harness.layout().instances().iter().map(|i| i.keys().len()).sum();
        assert_eq!(keys.len(), minted);
        assert_eq!(namespace.len(), minted);
    }

    #[test]
    fn test_every_instance_is_ticked() {
        let mut namespace = KeyNamespace::new();
        let mut harness = build(2, 2, &mut namespace).unwrap();

        harness.update().unwrap();
        assert!(harness.finalize() > 0);
        assert_eq!(harness.ticks(), 1);

        for instance in harness.layout().instances() {
            let key = instance.keys().get("time").unwrap();
            assert!(harness.surface().content(key).is_some());
        }

        let report = harness.last_report().unwrap();
        assert_eq!(report.event, EventId::Timeout);
        assert_eq!(report.per_instance.len(), 4);
    }

    #[test]
    fn test_only_first_tick_and_user_events_are_reported() {
        let mut namespace = KeyNamespace::new();
        let mut harness = build(1, 2, &mut namespace).unwrap();

        assert_eq!(harness.handle_event(&WindowEvent::timeout()).unwrap(), None);
        assert!(harness.last_report().is_none());

        harness.update().unwrap();
        harness.update().unwrap();
        assert_eq!(harness.ticks(), 2);
        assert_eq!(harness.last_report().unwrap().event, EventId::Timeout);

        let exit = harness.handle_event(&WindowEvent::element(events::MAIN_EXIT)).unwrap();
        assert_eq!(exit, Some(Signal::Close));
        let report = harness.last_report().unwrap();
        assert_eq!(report.event, EventId::Element(events::MAIN_EXIT.to_string()));
        assert_eq!(report.per_instance.len(), 2);
        assert_eq!(harness.view().button_ids(), vec![events::MAIN_EXIT]);
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let mut namespace = KeyNamespace::new();
        let err = build(0, 3, &mut namespace).err().unwrap();
        assert!(matches!(err, DeskClockError::Construction { .. }));
    }

    #[test]
    fn test_sessions_refuse_unknown_types_and_the_editor() {
        let settings = Settings::default();
        let mut sessions = HarnessSessions::new(FeatureRegistry::with_builtin(), "Nope", 1, 1);
        assert!(matches!(
            sessions.main(&[], &settings).err().unwrap(),
            DeskClockError::Construction { .. }
        ));
        assert!(sessions.editor(&settings).is_err());
    }
}
