//! Weather backend: async location and weather fetching.
//! All network work runs off the model's task; results are sent via mpsc.

use std::sync::Arc;

use clima_weather::{
    locate, resolve_nearest, Coordinates, LocationError, LocationSource, Observation,
    ProviderFailure, Region, WeatherSource,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Messages sent from async operations back to the model
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Location step of cycle `seq` finished. `location_error` is set when
    /// the default region was substituted.
    RegionResolved {
        seq: u64,
        region: &'static Region,
        location_error: Option<LocationError>,
    },
    /// Provider call of cycle `seq` finished
    FetchDone {
        seq: u64,
        region: &'static Region,
        result: Result<Observation, ProviderFailure>,
    },
    /// Auto-refresh timer fired
    TimerTick { generation: u64 },
}

/// Acquire location, resolve the nearest region and fetch its weather.
///
/// On any location failure the `default_region` coordinates are fetched
/// instead. Sends `RegionResolved` then `FetchDone`.
pub fn request_location_cycle(
    runtime: &Handle,
    tx: &UnboundedSender<WeatherServiceMessage>,
    seq: u64,
    location: Arc<dyn LocationSource>,
    weather: Arc<dyn WeatherSource>,
    default_region: &'static Region,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let (region, coordinates, location_error) = match locate(location.as_ref()).await {
            Ok(position) => {
                let region = resolve_nearest(position.latitude, position.longitude);
                tracing::info!("Cycle {}: nearest region {}", seq, region.name);
                (region, position, None)
            }
            Err(e) => {
                tracing::warn!(
                    "Cycle {}: {}; using {} by default",
                    seq,
                    e,
                    default_region.name
                );
                (default_region, default_region.coordinates(), Some(e))
            }
        };

        let _ = tx.send(WeatherServiceMessage::RegionResolved {
            seq,
            region,
            location_error,
        });

        fetch(&tx, seq, weather.as_ref(), region, coordinates).await;
    });
}

/// Fetch weather for a picked region at its fixed coordinates.
/// Sends `FetchDone` when complete.
pub fn request_region_fetch(
    runtime: &Handle,
    tx: &UnboundedSender<WeatherServiceMessage>,
    seq: u64,
    weather: Arc<dyn WeatherSource>,
    region: &'static Region,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        fetch(&tx, seq, weather.as_ref(), region, region.coordinates()).await;
    });
}

async fn fetch(
    tx: &UnboundedSender<WeatherServiceMessage>,
    seq: u64,
    weather: &dyn WeatherSource,
    region: &'static Region,
    coordinates: Coordinates,
) {
    let result = weather.current(coordinates).await;
    if let Err(e) = &result {
        tracing::error!("Cycle {}: fetching weather for {} failed: {}", seq, region.name, e);
    }
    let _ = tx.send(WeatherServiceMessage::FetchDone {
        seq,
        region,
        result,
    });
}
