//! Weather data for the Clima screen
//!
//! Provides the fixed department table with nearest-region lookup, the
//! Weatherbit current-conditions client and the device location sources.

pub mod location;
pub mod provider;
pub mod regions;
pub mod types;

pub use location::{locate, DisabledLocation, FixedLocation, IpLocator, LocationSource, Permission};
pub use provider::{WeatherSource, WeatherbitProvider};
pub use regions::{resolve_nearest, Region};
pub use types::*;
