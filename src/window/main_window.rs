use std::time::Duration;

use log::{debug, info};

use super::{Signal, Surface, WindowEvent, WindowKind, WindowSession, events};
use crate::error::Result;
use crate::feature::{FeatureConfig, FeatureContext, FeatureRegistry};
use crate::keys::KeyNamespace;
use crate::layout::{GridLayout, GridLayoutEngine};
use crate::tui::Element;

/// The clock display: feature grid plus a row of controls.
pub struct MainWindow {
    configs: Vec<FeatureConfig>,
    layout: GridLayout,
    surface: Surface,
    timeout: Duration,
    enable_24_hour: bool,
    closed: bool,
}

impl MainWindow {
    /// Instantiate every configured feature, arrange them and attach them
    /// to a fresh surface. Nothing is kept if any step fails.
    pub fn build(
        configs: &[FeatureConfig],
        registry: &FeatureRegistry,
        context: &FeatureContext,
        namespace: &mut KeyNamespace,
        timeout: Duration,
    ) -> Result<Self> {
        let instances = configs
            .iter()
            .map(|config| registry.instantiate(config, context, namespace))
            .collect::<Result<Vec<_>>>()?;

        let mut layout = GridLayoutEngine.arrange(instances)?;
        let mut surface = Surface::new();
        for instance in layout.instances_mut() {
            instance.attach(&mut surface);
        }
        surface.finalize();

        info!(
            "Main window built with {} features ({}x{})",
            configs.len(),
            layout.rows(),
            layout.cols()
        );

        Ok(Self {
            configs: configs.to_vec(),
            layout,
            surface,
            timeout,
            enable_24_hour: context.enable_24_hour,
            closed: false,
        })
    }

    pub fn configs(&self) -> &[FeatureConfig] {
        &self.configs
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    fn controls(&self) -> Element {
        Element::row(vec![
            Element::button(events::MAIN_LAYOUT, "Layout").hotkey('l').build(),
            Element::button(events::MAIN_TOGGLE_24H, "24h")
                .hotkey('h')
                .highlighted(self.enable_24_hour)
                .build(),
            Element::button(events::MAIN_EXIT, "Exit").hotkey('x').build(),
        ])
        .build()
    }
}

impl WindowSession for MainWindow {
    fn kind(&self) -> WindowKind {
        WindowKind::Main
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }

    fn handle_event(&mut self, event: &WindowEvent) -> anyhow::Result<Option<Signal>> {
        for instance in self.layout.instances_mut() {
            instance.handle_event(event, &mut self.surface)?;
        }

        let Some(id) = event.element_id() else {
            return Ok(None);
        };

        let signal = match id {
            events::MAIN_LAYOUT => Some(Signal::OpenEditor),
            events::MAIN_TOGGLE_24H => {
                self.enable_24_hour = !self.enable_24_hour;
                Some(Signal::ToggleHourFormat)
            }
            events::MAIN_EXIT => Some(Signal::Close),
            other => {
                debug!("Main window ignoring event '{}'", other);
                None
            }
        };
        Ok(signal)
    }

    fn update(&mut self) -> anyhow::Result<()> {
        for instance in self.layout.instances_mut() {
            instance.tick(&mut self.surface)?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> usize {
        self.surface.finalize()
    }

    fn view(&self) -> Element {
        self.layout.view(self.controls())
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn is_open(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        debug!("Main window closed");
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskClockError;
    use crate::settings::default_layout;

    fn build(configs: &[FeatureConfig], namespace: &mut KeyNamespace) -> Result<MainWindow> {
        MainWindow::build(
            configs,
            &FeatureRegistry::with_builtin(),
            &FeatureContext::default(),
            namespace,
            Duration::from_millis(100),
        )
    }

    #[test]
    fn test_default_layout_builds_two_clocks() {
        let mut namespace = KeyNamespace::new();
        let window = build(&default_layout(), &mut namespace).unwrap();

        assert_eq!(window.layout().rows(), 1);
        assert_eq!(window.layout().cols(), 2);
        assert_eq!(window.timeout(), Some(Duration::from_millis(100)));
        assert_eq!(
            window.view().button_ids(),
            vec![events::MAIN_LAYOUT, events::MAIN_TOGGLE_24H, events::MAIN_EXIT]
        );
    }

    #[test]
    fn test_control_buttons_raise_signals() {
        let mut namespace = KeyNamespace::new();
        let mut window = build(&default_layout(), &mut namespace).unwrap();

        let open = window.handle_event(&WindowEvent::element(events::MAIN_LAYOUT)).unwrap();
        assert_eq!(open, Some(Signal::OpenEditor));

        let toggle = window
            .handle_event(&WindowEvent::element(events::MAIN_TOGGLE_24H))
            .unwrap();
        assert_eq!(toggle, Some(Signal::ToggleHourFormat));

        let exit = window.handle_event(&WindowEvent::element(events::MAIN_EXIT)).unwrap();
        assert_eq!(exit, Some(Signal::Close));

        assert_eq!(window.handle_event(&WindowEvent::timeout()).unwrap(), None);
    }

    #[test]
    fn test_tick_then_finalize_commits_clock_text() {
        let mut namespace = KeyNamespace::new();
        let mut window = build(&default_layout(), &mut namespace).unwrap();

        window.update().unwrap();
        assert!(window.finalize() > 0);

        let instance = &window.layout().instances()[0];
        let key = instance.keys().get("time").unwrap();
        assert!(window.surface().content(key).is_some());
    }

    #[test]
    fn test_colliding_layout_fails_to_build() {
        let mut namespace = KeyNamespace::new();
        let configs = vec![FeatureConfig::new("Clock", 0, 0), FeatureConfig::new("Clock", 0, 0)];

        let err = build(&configs, &mut namespace).err().unwrap();
        assert!(matches!(err, DeskClockError::Layout { .. }));
    }
}
