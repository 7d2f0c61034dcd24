pub mod auto_refresh;
pub mod weather_service;

pub use auto_refresh::AutoRefreshTimer;
pub use weather_service::{
    request_location_cycle, request_region_fetch, WeatherServiceMessage,
};
