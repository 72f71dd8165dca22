use std::time::Duration;

use log::debug;
use serde::Deserialize;
use tokio::runtime::Handle;

use super::refresh::PeriodicJob;
use super::{Feature, FeatureConfig, FeatureContext, element_key};
use crate::error::Result;
use crate::keys::ElementKeys;
use crate::services::network::{self, Interfaces, NO_CONNECTION};
use crate::tui::{Element, LayoutConstraint};
use crate::tui::element::ColumnBuilder;
use crate::window::Surface;

pub const TYPE_ID: &str = "Network";
pub const DESCRIPTION: &str = "Network interfaces and their addresses.";

const KEYS: &[&str] = &["netTitle", "interfaces"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkOptions {
    pub refresh_secs: u64,
    /// Ping each interface's gateway after listing it.
    pub probe: bool,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            refresh_secs: 30,
            probe: true,
        }
    }
}

pub struct Network {
    probe: bool,
    job: PeriodicJob<Interfaces>,
    shown: Option<String>,
}

pub fn create(config: &FeatureConfig, _context: &FeatureContext) -> Result<Box<dyn Feature>> {
    let options: NetworkOptions = config.options()?;
    Ok(Box::new(Network::new(options)))
}

fn scan(probe: bool) -> Interfaces {
    let interfaces = network::list_interfaces();
    if probe {
        network::probe_reachability(interfaces)
    } else {
        interfaces
    }
}

/// One `name: address` line per interface.
pub fn render_interfaces(interfaces: &Interfaces) -> String {
    if interfaces.is_empty() {
        return NO_CONNECTION.to_string();
    }
    interfaces
        .iter()
        .map(|(name, address)| format!("{}: {}", name, address))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Network {
    pub fn new(options: NetworkOptions) -> Self {
        Self {
            probe: options.probe,
            job: PeriodicJob::new(Duration::from_secs(options.refresh_secs)),
            shown: None,
        }
    }

    fn show(&mut self, interfaces: &Interfaces, keys: &ElementKeys, surface: &mut Surface) -> anyhow::Result<()> {
        let text = render_interfaces(interfaces);
        if self.shown.as_deref() != Some(text.as_str()) {
            surface.update(element_key(keys, "interfaces")?, text.clone());
            self.shown = Some(text);
        }
        Ok(())
    }
}

impl Feature for Network {
    fn local_keys(&self) -> &'static [&'static str] {
        KEYS
    }

    fn attach(&mut self, keys: &ElementKeys, surface: &mut Surface) {
        if let Some(key) = keys.get("netTitle") {
            surface.update(key, "Network");
        }
    }

    fn fragment(&self, keys: &ElementKeys) -> Element {
        let mut column = ColumnBuilder::new();
        if let Some(key) = keys.get("netTitle") {
            column = column.add(Element::keyed(key, "Network"), LayoutConstraint::Length(1));
        }
        if let Some(key) = keys.get("interfaces") {
            column = column.add(Element::keyed(key, "Scanning..."), LayoutConstraint::Min(1));
        }
        column.build()
    }

    fn tick(&mut self, keys: &ElementKeys, surface: &mut Surface) -> anyhow::Result<()> {
        if let Some(interfaces) = self.job.poll_finished() {
            self.show(&interfaces, keys, surface)?;
        }

        if !self.job.is_due() {
            return Ok(());
        }

        let probe = self.probe;
        match Handle::try_current() {
            Ok(runtime) => {
                debug!("Refreshing network interfaces in the background");
                self.job.started(Some(runtime.spawn_blocking(move || scan(probe))));
            }
            Err(_) => {
                debug!("No async runtime, refreshing network interfaces inline");
                self.job.started(None);
                let interfaces = scan(probe);
                self.show(&interfaces, keys, surface)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_interfaces() {
        let mut interfaces = Interfaces::new();
        interfaces.insert("wlan0".to_string(), "192.168.1.23".to_string());
        interfaces.insert("eth0".to_string(), NO_CONNECTION.to_string());

        assert_eq!(
            render_interfaces(&interfaces),
            "eth0: No Connection\nwlan0: 192.168.1.23"
        );
    }

    #[test]
    fn test_no_interfaces_render_as_no_connection() {
        assert_eq!(render_interfaces(&Interfaces::new()), NO_CONNECTION);
    }

    #[test]
    fn test_options_defaults() {
        let options: NetworkOptions = FeatureConfig::new(TYPE_ID, 0, 0).options().unwrap();
        assert_eq!(options.refresh_secs, 30);
        assert!(options.probe);
    }

    #[test]
    fn test_inline_refresh_without_runtime_writes_once_per_interval() {
        let mut feature = Network::new(NetworkOptions {
            refresh_secs: 3600,
            probe: false,
        });
        let keys = crate::keys::KeyNamespace::new().allocate_all(KEYS).unwrap();
        let mut surface = Surface::new();

        feature.tick(&keys, &mut surface).unwrap();
        assert_eq!(surface.finalize(), 1);
        assert!(surface.content(keys.get("interfaces").unwrap()).is_some());

        feature.tick(&keys, &mut surface).unwrap();
        assert_eq!(surface.finalize(), 0);
    }
}
