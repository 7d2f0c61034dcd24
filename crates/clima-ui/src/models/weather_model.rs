//! Refresh orchestration for the weather screen.
//!
//! `WeatherModel` owns the display state. Cycles run on the tokio runtime
//! and report back through a channel; `handle_message` is the only place
//! completions touch the state.
//!
//! Every dispatched cycle takes the next sequence number. A completion from
//! an older cycle than the latest dispatched one is dropped, so a manual
//! refresh or picker selection always wins over a slower cycle started
//! before it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clima_core::{AppError, Config, ConfigError, LocationError, ProviderFailure, RegionError};
use clima_weather::{regions, LocationSource, Region, WeatherReading, WeatherSource};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::services::{
    request_location_cycle, request_region_fetch, AutoRefreshTimer, WeatherServiceMessage,
};

/// Where the current reading came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingOrigin {
    /// Placeholder shown before the first completion
    Initial,
    /// Parsed provider response
    Live,
    /// Fixed reading substituted after a provider failure
    Fallback(ProviderFailure),
}

impl ReadingOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ReadingOrigin::Fallback(_))
    }
}

/// Step of the latest dispatched cycle.
///
/// Region resolution is synchronous inside the cycle task, so it has no phase
/// of its own: `RegionResolved` moves the state straight to `Fetching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    #[default]
    Idle,
    AcquiringLocation,
    Fetching,
}

/// What started a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleTrigger {
    Mount,
    Manual,
    Timer,
    Picker,
}

/// Something the screen should react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// State changed; re-render
    StateChanged,
    /// Location failed and the default region is used. The screen shows an
    /// acknowledgement; the fetch proceeds regardless.
    LocationNotice(LocationError),
}

/// Display state. Read through `WeatherModel::state`; only the model mutates it.
#[derive(Debug, Clone)]
pub struct RefreshState {
    pub current: WeatherReading,
    pub is_loading: bool,
    pub auto_refresh_enabled: bool,
    pub selected_region: &'static Region,
    pub phase: CyclePhase,
    pub origin: ReadingOrigin,
    pub last_updated: Option<DateTime<Utc>>,
}

impl RefreshState {
    fn new(default_region: &'static Region, auto_refresh_enabled: bool) -> Self {
        Self {
            current: WeatherReading::initial(default_region.name),
            is_loading: false,
            auto_refresh_enabled,
            selected_region: default_region,
            phase: CyclePhase::Idle,
            origin: ReadingOrigin::Initial,
            last_updated: None,
        }
    }
}

pub struct WeatherModel {
    state: RefreshState,
    default_region: &'static Region,
    interval: Duration,
    location: Arc<dyn LocationSource>,
    weather: Arc<dyn WeatherSource>,
    runtime: Handle,
    tx: UnboundedSender<WeatherServiceMessage>,
    rx: UnboundedReceiver<WeatherServiceMessage>,
    latest_seq: u64,
    timer: Option<AutoRefreshTimer>,
    timer_generation: u64,
}

impl WeatherModel {
    /// Build a model from configuration. Must be called inside a tokio runtime.
    ///
    /// Fails when the configured default region is not in the region table
    /// or the refresh interval is zero.
    pub fn new(
        config: &Config,
        location: Arc<dyn LocationSource>,
        weather: Arc<dyn WeatherSource>,
    ) -> Result<Self, AppError> {
        let default_region = regions::find(&config.refresh.default_region)
            .ok_or_else(|| RegionError::Unknown(config.refresh.default_region.clone()))?;
        if config.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh.interval_secs: Interval must be greater than 0".to_string(),
            )
            .into());
        }
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            state: RefreshState::new(default_region, config.refresh.auto_refresh),
            default_region,
            interval: config.refresh.interval(),
            location,
            weather,
            runtime: Handle::current(),
            tx,
            rx,
            latest_seq: 0,
            timer: None,
            timer_generation: 0,
        })
    }

    pub fn state(&self) -> &RefreshState {
        &self.state
    }

    /// Sequence number of the most recently dispatched cycle (0 before any).
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Screen appeared: run a location cycle and start the timer if enabled.
    pub fn mount(&mut self) -> u64 {
        let seq = self.start_location_cycle(CycleTrigger::Mount);
        if self.state.auto_refresh_enabled {
            self.start_timer();
        }
        seq
    }

    /// Manual "update location" action.
    pub fn refresh(&mut self) -> u64 {
        self.start_location_cycle(CycleTrigger::Manual)
    }

    /// Picker action. Skips location entirely and fetches the region's own
    /// coordinates.
    pub fn select_region(&mut self, name: &str) -> Result<u64, RegionError> {
        let region = regions::find(name).ok_or_else(|| RegionError::Unknown(name.to_string()))?;

        let seq = self.dispatch(CycleTrigger::Picker);
        self.state.selected_region = region;
        self.state.phase = CyclePhase::Fetching;
        request_region_fetch(&self.runtime, &self.tx, seq, self.weather.clone(), region);
        Ok(seq)
    }

    /// Turn auto-refresh on or off. Turning it on (re)starts the timer, so
    /// the next timed cycle fires one interval later.
    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.state.auto_refresh_enabled = enabled;
        self.stop_timer();
        if enabled {
            self.start_timer();
        }
        tracing::info!("Auto-refresh {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Flip auto-refresh and return the new setting.
    pub fn toggle_auto_refresh(&mut self) -> bool {
        let enabled = !self.state.auto_refresh_enabled;
        self.set_auto_refresh(enabled);
        enabled
    }

    /// Wait for the next message that affects the display and apply it.
    pub async fn next_event(&mut self) -> Option<DisplayEvent> {
        loop {
            let message = self.rx.recv().await?;
            if let Some(event) = self.handle_message(message) {
                return Some(event);
            }
        }
    }

    /// Apply one message. Returns `None` when it was stale or irrelevant.
    pub fn handle_message(&mut self, message: WeatherServiceMessage) -> Option<DisplayEvent> {
        match message {
            WeatherServiceMessage::TimerTick { generation } => {
                let current = self.timer.as_ref().map(AutoRefreshTimer::generation);
                if !self.state.auto_refresh_enabled || current != Some(generation) {
                    tracing::debug!("Ignoring tick from timer {}", generation);
                    return None;
                }
                self.start_location_cycle(CycleTrigger::Timer);
                Some(DisplayEvent::StateChanged)
            }
            WeatherServiceMessage::RegionResolved {
                seq,
                region,
                location_error,
            } => {
                if self.is_stale(seq) {
                    return None;
                }
                self.state.selected_region = region;
                self.state.phase = CyclePhase::Fetching;
                match location_error {
                    Some(e) => Some(DisplayEvent::LocationNotice(e)),
                    None => Some(DisplayEvent::StateChanged),
                }
            }
            WeatherServiceMessage::FetchDone {
                seq,
                region,
                result,
            } => {
                if self.is_stale(seq) {
                    return None;
                }
                let (reading, origin) = match result {
                    Ok(observation) => (
                        WeatherReading::from_observation(&observation, region.name),
                        ReadingOrigin::Live,
                    ),
                    Err(failure) => {
                        tracing::warn!(
                            "Showing fallback reading for {}: {}",
                            region.name,
                            failure
                        );
                        (
                            WeatherReading::fallback(region.name),
                            ReadingOrigin::Fallback(failure),
                        )
                    }
                };
                self.state.current = reading;
                self.state.origin = origin;
                self.state.is_loading = false;
                self.state.phase = CyclePhase::Idle;
                self.state.last_updated = Some(Utc::now());
                Some(DisplayEvent::StateChanged)
            }
        }
    }

    /// Stop the timer. In-flight cycles still complete.
    pub fn shutdown(&mut self) {
        self.stop_timer();
        tracing::info!("Weather screen torn down");
    }

    fn dispatch(&mut self, trigger: CycleTrigger) -> u64 {
        self.latest_seq += 1;
        self.state.is_loading = true;
        tracing::info!("Starting cycle {} ({:?})", self.latest_seq, trigger);
        self.latest_seq
    }

    fn start_location_cycle(&mut self, trigger: CycleTrigger) -> u64 {
        let seq = self.dispatch(trigger);
        self.state.phase = CyclePhase::AcquiringLocation;
        request_location_cycle(
            &self.runtime,
            &self.tx,
            seq,
            self.location.clone(),
            self.weather.clone(),
            self.default_region,
        );
        seq
    }

    fn is_stale(&self, seq: u64) -> bool {
        let stale = seq < self.latest_seq;
        if stale {
            tracing::debug!(
                "Discarding result of cycle {} (latest is {})",
                seq,
                self.latest_seq
            );
        }
        stale
    }

    fn start_timer(&mut self) {
        self.timer_generation += 1;
        self.timer = Some(AutoRefreshTimer::start(
            &self.runtime,
            &self.tx,
            self.interval,
            self.timer_generation,
        ));
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }
}

impl Drop for WeatherModel {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
