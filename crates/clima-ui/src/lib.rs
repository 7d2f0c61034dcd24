//! Screen model for Clima: refresh orchestration, display state and text
//! rendering. Network work runs on the tokio runtime; results come back to
//! the model over a channel and are applied in one place.

pub mod models;
pub mod render;
pub mod services;

pub use models::weather_model::{
    CyclePhase, CycleTrigger, DisplayEvent, ReadingOrigin, RefreshState, WeatherModel,
};
pub use services::{AutoRefreshTimer, WeatherServiceMessage};
