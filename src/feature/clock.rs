use chrono::Timelike;
use log::debug;
use ratatui::style::{Modifier, Style};
use serde::Deserialize;

use super::{Feature, FeatureConfig, FeatureContext, element_key};
use crate::error::Result;
use crate::keys::ElementKeys;
use crate::services::time::{self, LocalTime, TimeSource};
use crate::tui::Element;
use crate::window::{Surface, WindowEvent, events};

pub const TYPE_ID: &str = "Clock";
pub const DESCRIPTION: &str = "Simple clock.";

const KEYS: &[&str] = &["time", "timeSpecs", "timeZone", "ampm"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClockOptions {
    /// Falls back to the global hour format when unset.
    pub use_24_hour: Option<bool>,
    pub blink: bool,
    pub utc_offset_hours: i32,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            use_24_hour: None,
            blink: true,
            utc_offset_hours: 0,
        }
    }
}

/// Digital clock shifted by a whole number of hours from local time.
pub struct Clock {
    use_24_hour: bool,
    blink: bool,
    utc_offset_hours: i32,
    time_source: Box<dyn TimeSource>,
    last_drawn: Option<u32>,
}

pub fn create(config: &FeatureConfig, context: &FeatureContext) -> Result<Box<dyn super::Feature>> {
    let options: ClockOptions = config.options()?;
    Ok(Box::new(Clock::new(options, context, Box::new(LocalTime))))
}

impl Clock {
    pub fn new(options: ClockOptions, context: &FeatureContext, time_source: Box<dyn TimeSource>) -> Self {
        Self {
            use_24_hour: options.use_24_hour.unwrap_or(context.enable_24_hour),
            blink: options.blink,
            utc_offset_hours: options.utc_offset_hours,
            time_source,
            last_drawn: None,
        }
    }

    pub fn uses_24_hour(&self) -> bool {
        self.use_24_hour
    }

    fn offset_label(&self) -> String {
        match self.utc_offset_hours {
            0 => "local".to_string(),
            h => format!("local {:+}h", h),
        }
    }
}

impl Feature for Clock {
    fn local_keys(&self) -> &'static [&'static str] {
        KEYS
    }

    fn attach(&mut self, keys: &ElementKeys, surface: &mut Surface) {
        if let Some(key) = keys.get("timeZone") {
            surface.update(key, time::time_zone_abbreviation());
        }
        if let Some(key) = keys.get("timeSpecs") {
            surface.update(key, self.offset_label());
        }
        if let Some(key) = keys.get("ampm") {
            surface.set_visible(key, !self.use_24_hour);
        }
    }

    fn fragment(&self, keys: &ElementKeys) -> Element {
        let mut specs = Vec::new();
        for local in ["timeZone", "ampm", "timeSpecs"] {
            if let Some(key) = keys.get(local) {
                specs.push(Element::keyed(key, ""));
            }
        }

        let time = match keys.get("time") {
            Some(key) => Element::Keyed {
                key: key.clone(),
                initial: "00:00".to_string(),
                style: Some(Style::default().add_modifier(Modifier::BOLD)),
            },
            None => Element::None,
        };

        Element::row(vec![time, Element::column(specs).build()]).build()
    }

    fn tick(&mut self, keys: &ElementKeys, surface: &mut Surface) -> anyhow::Result<()> {
        let now = self.time_source.now();
        let stamp = now.num_seconds_from_midnight();
        if self.last_drawn == Some(stamp) {
            return Ok(());
        }

        let reading = time::format_time(now, self.use_24_hour, self.utc_offset_hours);
        surface.update(element_key(keys, "time")?, reading.display(self.blink));
        surface.update(element_key(keys, "ampm")?, reading.meridiem.as_str());
        self.last_drawn = Some(stamp);
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: &WindowEvent,
        keys: &ElementKeys,
        surface: &mut Surface,
    ) -> anyhow::Result<()> {
        if event.is_element(events::MAIN_TOGGLE_24H) {
            self.use_24_hour = !self.use_24_hour;
            debug!("Clock switched to {}-hour format", if self.use_24_hour { 24 } else { 12 });
            surface.set_visible(element_key(keys, "ampm")?, !self.use_24_hour);
            self.last_drawn = None;
        }
        Ok(())
    }
}
