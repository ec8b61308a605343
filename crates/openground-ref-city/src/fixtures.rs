//! Simulated city data for the Open Ground reference runtime.
//!
//! All data in this module is hardcoded and fictional. No external systems
//! are contacted. The fixtures stand in for real geocoding, weather, clock
//! and places APIs.

use openground_contracts::tool::{NearbyPlaces, Place, TimeOfDay, WeatherReport};

// ── Location ─────────────────────────────────────────────────────────────────

pub const MISSION_DISTRICT_LAT: f64 = 37.7749;
pub const MISSION_DISTRICT_LNG: f64 = -122.4194;
pub const DEFAULT_ADDRESS: &str = "Mission District, San Francisco, CA";

// ── Weather ──────────────────────────────────────────────────────────────────

/// Raw weather readings. Safety is derived, never configured.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherFixture {
    pub condition: String,
    pub temperature: i32,
    pub humidity: u8,
}

impl WeatherFixture {
    pub fn new(condition: &str, temperature: i32, humidity: u8) -> Self {
        Self {
            condition: condition.to_string(),
            temperature,
            humidity,
        }
    }

    pub fn sunny() -> Self {
        Self::new("sunny", 21, 45)
    }

    pub fn light_rain() -> Self {
        Self::new("light_rain", 14, 85)
    }

    /// Outdoor activity is safe unless it is raining or 10°C and below.
    pub fn report(&self) -> WeatherReport {
        WeatherReport {
            condition: self.condition.clone(),
            temperature: self.temperature,
            is_outdoor_safe: self.condition != "light_rain" && self.temperature > 10,
            humidity: self.humidity,
        }
    }
}

impl Default for WeatherFixture {
    fn default() -> Self {
        Self::sunny()
    }
}

// ── Time ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFixture {
    /// 0–23.
    pub hour: u8,
    pub minute: u8,
    pub is_weekend: bool,
}

impl TimeFixture {
    pub fn new(hour: u8, minute: u8, is_weekend: bool) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
            is_weekend,
        }
    }

    pub fn report(&self) -> TimeOfDay {
        TimeOfDay {
            hour: self.hour,
            is_daytime: (6..=20).contains(&self.hour),
            is_weekend: self.is_weekend,
            formatted_time: format_12h(self.hour, self.minute),
        }
    }
}

impl Default for TimeFixture {
    /// A weekday afternoon.
    fn default() -> Self {
        Self::new(15, 0, false)
    }
}

/// The value served while the clock service is out: noon on a weekday.
pub fn fallback_time() -> TimeOfDay {
    TimeFixture::new(12, 0, false).report()
}

fn format_12h(hour: u8, minute: u8) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:{minute:02} {suffix}")
}

// ── Places ───────────────────────────────────────────────────────────────────

pub fn mission_district_places() -> NearbyPlaces {
    NearbyPlaces {
        places: vec![
            place("Dolores Park", "0.3 mi", "park"),
            place("Community Garden", "0.5 mi", "garden"),
            place("Valencia Street Mural", "0.2 mi", "art"),
        ],
    }
}

/// The value served while the places service is out: no anchors at all.
pub fn fallback_places() -> NearbyPlaces {
    NearbyPlaces::default()
}

fn place(name: &str, distance: &str, kind: &str) -> Place {
    Place {
        name: name.to_string(),
        distance: distance.to_string(),
        kind: kind.to_string(),
    }
}
