use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use tokio::runtime::Handle;

use super::refresh::PeriodicJob;
use super::{Feature, FeatureConfig, FeatureContext, element_key};
use crate::error::Result;
use crate::keys::ElementKeys;
use crate::services::network::NO_CONNECTION;
use crate::services::web::{self, IpData};
use crate::tui::Element;
use crate::window::Surface;

pub const TYPE_ID: &str = "PublicIp";
pub const DESCRIPTION: &str = "Public IP address and its location.";

const KEYS: &[&str] = &["publicIp", "location"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicIpOptions {
    pub refresh_secs: u64,
}

impl Default for PublicIpOptions {
    fn default() -> Self {
        Self { refresh_secs: 900 }
    }
}

type Lookup = anyhow::Result<Option<IpData>>;

pub struct PublicIp {
    job: PeriodicJob<Lookup>,
}

pub fn create(config: &FeatureConfig, _context: &FeatureContext) -> Result<Box<dyn Feature>> {
    let options: PublicIpOptions = config.options()?;
    Ok(Box::new(PublicIp::new(options)))
}

/// Address line and location line for a lookup result.
pub fn describe(lookup: &Lookup) -> (String, String) {
    match lookup {
        Ok(Some(data)) => (
            data.ip.clone(),
            format!("{}, {} ({})", data.city, data.region, data.country_code),
        ),
        Ok(None) => (NO_CONNECTION.to_string(), String::new()),
        Err(e) => {
            warn!("Public IP lookup failed: {:#}", e);
            (NO_CONNECTION.to_string(), String::new())
        }
    }
}

impl PublicIp {
    pub fn new(options: PublicIpOptions) -> Self {
        Self {
            job: PeriodicJob::new(Duration::from_secs(options.refresh_secs)),
        }
    }
}

impl Feature for PublicIp {
    fn local_keys(&self) -> &'static [&'static str] {
        KEYS
    }

    fn fragment(&self, keys: &ElementKeys) -> Element {
        let lines = KEYS
            .iter()
            .filter_map(|local| keys.get(local))
            .map(|key| Element::keyed(key, ""))
            .collect();
        Element::panel(Element::column(lines).build())
            .title("Public IP")
            .build()
    }

    fn tick(&mut self, keys: &ElementKeys, surface: &mut Surface) -> anyhow::Result<()> {
        if let Some(lookup) = self.job.poll_finished() {
            let (address, location) = describe(&lookup);
            surface.update(element_key(keys, "publicIp")?, address);
            surface.update(element_key(keys, "location")?, location);
        }

        if !self.job.is_due() {
            return Ok(());
        }

        match Handle::try_current() {
            Ok(runtime) => {
                debug!("Looking up public IP address");
                self.job
                    .started(Some(runtime.spawn(web::fetch_public_ip_data())));
            }
            Err(_) => {
                // HTTP needs the runtime; show the sentinel until one exists.
                self.job.started(None);
                surface.update(element_key(keys, "publicIp")?, NO_CONNECTION);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_successful_lookup() {
        let data = IpData {
            ip: "203.0.113.7".to_string(),
            city: "Portland".to_string(),
            region: "Oregon".to_string(),
            country_code: "US".to_string(),
            ..IpData::default()
        };
        let (address, location) = describe(&Ok(Some(data)));
        assert_eq!(address, "203.0.113.7");
        assert_eq!(location, "Portland, Oregon (US)");
    }

    #[test]
    fn test_failed_lookup_shows_no_connection() {
        let (address, location) = describe(&Err(anyhow::anyhow!("offline")));
        assert_eq!(address, NO_CONNECTION);
        assert!(location.is_empty());

        let (address, _) = describe(&Ok(None));
        assert_eq!(address, NO_CONNECTION);
    }

    #[test]
    fn test_tick_without_runtime_shows_sentinel() {
        let mut feature = PublicIp::new(PublicIpOptions::default());
        let keys = crate::keys::KeyNamespace::new().allocate_all(KEYS).unwrap();
        let mut surface = Surface::new();

        feature.tick(&keys, &mut surface).unwrap();
        surface.finalize();

        assert_eq!(surface.content(keys.get("publicIp").unwrap()), Some(NO_CONNECTION));
    }
}
