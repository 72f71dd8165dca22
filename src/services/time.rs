use std::fmt;

use chrono::{Local, NaiveTime, Timelike, Utc};
use log::debug;

/// Half of the day a 12-hour reading falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wall-clock time already shifted and converted for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub meridiem: Meridiem,
}

impl ClockReading {
    /// `h:mm:ss`
    pub fn formatted(&self) -> String {
        format!("{}:{:02}:{:02}", self.hour, self.minute, self.second)
    }

    /// Hours and minutes. With `blink` the separator is a colon on even
    /// seconds and a space on odd ones.
    pub fn display(&self, blink: bool) -> String {
        let separator = if blink && self.second % 2 != 0 { ' ' } else { ':' };
        format!("{}{}{:02}", self.hour, separator, self.minute)
    }
}

/// Source of the current local time, swappable in tests.
pub trait TimeSource {
    fn now(&self) -> NaiveTime;
}

/// Reads the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTime;

impl TimeSource for LocalTime {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTime(pub NaiveTime);

impl TimeSource for FixedTime {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// Shift an hour of the day by whole hours, wrapping around midnight.
///
/// The offset is reduced to a single day first, so any `i32` is accepted.
pub fn adjust_hour(hour: u32, offset_hours: i32) -> u32 {
    let hour = (hour % 24) as i32;
    (hour + offset_hours.rem_euclid(24)).rem_euclid(24) as u32
}

pub fn format_time(time: NaiveTime, use_24_hour: bool, offset_hours: i32) -> ClockReading {
    let hour = adjust_hour(time.hour(), offset_hours);
    let meridiem = if hour >= 12 { Meridiem::Pm } else { Meridiem::Am };

    let display_hour = if use_24_hour {
        hour
    } else if hour > 12 {
        hour - 12
    } else if hour == 0 {
        12
    } else {
        hour
    };

    ClockReading {
        hour: display_hour,
        minute: time.minute(),
        second: time.second(),
        meridiem,
    }
}

/// Current local time as `h:mm:ss` plus its meridiem.
pub fn current_time(use_24_hour: bool, offset_hours: i32) -> (String, Meridiem) {
    let reading = format_time(LocalTime.now(), use_24_hour, offset_hours);
    (reading.formatted(), reading.meridiem)
}

/// Abbreviation of the local time zone.
///
/// `$TZ` wins when it names an IANA zone; otherwise the local offset is
/// used. Multi-word names collapse to their initials.
pub fn time_zone_abbreviation() -> String {
    if let Ok(name) = std::env::var("TZ") {
        match name.trim_start_matches(':').parse::<chrono_tz::Tz>() {
            Ok(tz) => {
                return abbreviate(&Utc::now().with_timezone(&tz).format("%Z").to_string());
            }
            Err(e) => debug!("TZ='{}' is not an IANA zone: {}", name, e),
        }
    }
    abbreviate(&Local::now().format("%Z").to_string())
}

pub fn abbreviate(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > 1 {
        words
            .iter()
            .filter_map(|word| word.chars().next())
            .collect::<String>()
            .to_uppercase()
    } else {
        name.trim().to_string()
    }
}
