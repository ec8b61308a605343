//! Deterministic tool registry backed by the city fixtures.
//!
//! Two switches simulate trouble:
//!
//! - a **fault** makes a tool reject its call with `MissionError::ToolFailed`;
//! - an **outage** on `get_time` or `search_nearby` makes the tool serve its
//!   deterministic fallback instead. Location and weather have no fallback,
//!   so an outage on them behaves like a fault.

use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use tracing::{debug, warn};

use openground_contracts::{
    error::{MissionError, MissionResult},
    tool::{Location, NearbyPlaces, TimeOfDay, ToolName, WeatherReport},
};
use openground_core::traits::ToolRegistry;

use crate::fixtures::{
    fallback_places, fallback_time, mission_district_places, TimeFixture, WeatherFixture,
    DEFAULT_ADDRESS, MISSION_DISTRICT_LAT, MISSION_DISTRICT_LNG,
};

#[derive(Default)]
struct StubState {
    weather: WeatherFixture,
    time: TimeFixture,
    faults: HashSet<ToolName>,
    outages: HashSet<ToolName>,
    calls: Vec<ToolName>,
}

/// Mission District tools with configurable weather, time, and failures.
///
/// Fixtures can be changed while a mission runs, which is how scenarios
/// simulate rain starting halfway through.
#[derive(Default)]
pub struct StubToolRegistry {
    state: Mutex<StubState>,
    latency: Duration,
}

impl StubToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weather(self, weather: WeatherFixture) -> Self {
        self.set_weather(weather);
        self
    }

    pub fn with_time(self, time: TimeFixture) -> Self {
        self.lock().time = time;
        self
    }

    /// Make `tool` reject every call.
    pub fn with_fault(self, tool: ToolName) -> Self {
        self.lock().faults.insert(tool);
        self
    }

    /// Take `tool`'s upstream service offline.
    pub fn with_outage(self, tool: ToolName) -> Self {
        self.lock().outages.insert(tool);
        self
    }

    /// Delay every call, so concurrent missions interleave.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_weather(&self, weather: WeatherFixture) {
        self.lock().weather = weather;
    }

    /// Every tool invoked so far, in call order.
    pub fn calls(&self) -> Vec<ToolName> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call, wait out the latency, and report whether the tool's
    /// service is reachable.
    async fn enter(&self, tool: ToolName) -> MissionResult<Reachability> {
        let reachability = {
            let mut state = self.lock();
            state.calls.push(tool);
            if state.faults.contains(&tool) {
                Err(MissionError::ToolFailed {
                    tool,
                    reason: "stub fault injected".to_string(),
                })
            } else if state.outages.contains(&tool) {
                Ok(Reachability::Outage)
            } else {
                Ok(Reachability::Up)
            }
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        debug!(tool = %tool, "stub tool called");
        reachability
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reachability {
    Up,
    Outage,
}

fn unavailable(tool: ToolName) -> MissionError {
    MissionError::ToolFailed {
        tool,
        reason: "upstream service unavailable".to_string(),
    }
}

#[async_trait]
impl ToolRegistry for StubToolRegistry {
    async fn get_location(&self, query: Option<&str>) -> MissionResult<Location> {
        if self.enter(ToolName::GetLocation).await? == Reachability::Outage {
            return Err(unavailable(ToolName::GetLocation));
        }
        let address = query
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(DEFAULT_ADDRESS)
            .to_string();
        Ok(Location {
            lat: MISSION_DISTRICT_LAT,
            lng: MISSION_DISTRICT_LNG,
            address,
        })
    }

    async fn get_weather(&self, _lat: f64, _lng: f64) -> MissionResult<WeatherReport> {
        if self.enter(ToolName::GetWeather).await? == Reachability::Outage {
            return Err(unavailable(ToolName::GetWeather));
        }
        Ok(self.lock().weather.report())
    }

    async fn get_time(&self, timezone: Option<&str>) -> MissionResult<TimeOfDay> {
        if self.enter(ToolName::GetTime).await? == Reachability::Outage {
            warn!(timezone = ?timezone, "clock service unavailable; serving fallback time");
            return Ok(fallback_time());
        }
        Ok(self.lock().time.report())
    }

    async fn search_nearby(&self, _lat: f64, _lng: f64, query: &str) -> MissionResult<NearbyPlaces> {
        if self.enter(ToolName::SearchNearby).await? == Reachability::Outage {
            warn!(%query, "places service unavailable; serving no anchors");
            return Ok(fallback_places());
        }
        Ok(mission_district_places())
    }
}
