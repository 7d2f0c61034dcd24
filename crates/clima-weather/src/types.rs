use serde::{Deserialize, Serialize};

pub use clima_core::{LocationError, ProviderFailure};

/// Temperature shown when a provider call fails
pub const FALLBACK_TEMPERATURE: &str = "25.53";
/// Humidity shown when a provider call fails
pub const FALLBACK_HUMIDITY: &str = "60";
/// Condition shown when a provider call fails
pub const FALLBACK_CONDITION: &str = "Cielo claro";

/// Condition shown before the first reading arrives
pub const UNKNOWN_CONDITION: &str = "Desconocido";

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Raw current conditions as reported by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Air temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub relative_humidity: f64,
    /// Localized textual condition
    pub description: String,
}

/// What the screen displays for one region.
///
/// Values are pre-formatted strings; a new reading always replaces the
/// previous one as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_celsius: String,
    pub relative_humidity_percent: String,
    pub condition_description: String,
    pub region_name: String,
}

impl WeatherReading {
    /// Placeholder shown before any fetch has completed.
    pub fn initial(region_name: impl Into<String>) -> Self {
        Self {
            temperature_celsius: "0".to_string(),
            relative_humidity_percent: "0".to_string(),
            condition_description: UNKNOWN_CONDITION.to_string(),
            region_name: region_name.into(),
        }
    }

    /// Fixed reading substituted when the provider fails.
    pub fn fallback(region_name: impl Into<String>) -> Self {
        Self {
            temperature_celsius: FALLBACK_TEMPERATURE.to_string(),
            relative_humidity_percent: FALLBACK_HUMIDITY.to_string(),
            condition_description: FALLBACK_CONDITION.to_string(),
            region_name: region_name.into(),
        }
    }

    /// Format a provider observation for display.
    ///
    /// Temperature always carries two decimals; humidity uses the shortest
    /// decimal form (`55.0` renders as `55`).
    pub fn from_observation(observation: &Observation, region_name: impl Into<String>) -> Self {
        Self {
            temperature_celsius: two_decimals(observation.temperature),
            relative_humidity_percent: observation.relative_humidity.to_string(),
            condition_description: observation.description.clone(),
            region_name: region_name.into(),
        }
    }
}

/// Format with two decimals, rounding an exact half away from zero.
///
/// `{:.2}` alone breaks ties to even, so `22.125` would render as `22.12`.
fn two_decimals(value: f64) -> String {
    // Only odd multiples of 1/8 end in 5 at the third decimal
    let eighths = value * 8.0;
    let is_tie = eighths.fract() == 0.0 && (eighths / 2.0).fract() != 0.0;
    if is_tie {
        format!("{:.2}", (value * 100.0).round() / 100.0)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(temperature: f64, relative_humidity: f64, description: &str) -> Observation {
        Observation {
            temperature,
            relative_humidity,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_reading_from_observation() {
        let reading = WeatherReading::from_observation(&observation(22.3, 55.0, "Lluvia"), "La Paz");
        assert_eq!(reading.temperature_celsius, "22.30");
        assert_eq!(reading.relative_humidity_percent, "55");
        assert_eq!(reading.condition_description, "Lluvia");
        assert_eq!(reading.region_name, "La Paz");
    }

    #[test]
    fn test_fractional_humidity_keeps_decimals() {
        let reading = WeatherReading::from_observation(&observation(30.0, 61.5, "Nublado"), "Sonsonate");
        assert_eq!(reading.temperature_celsius, "30.00");
        assert_eq!(reading.relative_humidity_percent, "61.5");
    }

    #[test]
    fn test_negative_temperature_rounds_to_two_places() {
        let reading = WeatherReading::from_observation(&observation(-3.456, 90.0, "Niebla"), "Morazán");
        assert_eq!(reading.temperature_celsius, "-3.46");
    }

    #[test]
    fn test_exact_half_rounds_away_from_zero() {
        let cases = [
            (22.125, "22.13"),
            (0.125, "0.13"),
            (-0.125, "-0.13"),
            (18.375, "18.38"),
            (25.5, "25.50"),
            (1.005, "1.00"),
        ];
        for (temperature, expected) in cases {
            let reading =
                WeatherReading::from_observation(&observation(temperature, 50.0, "x"), "La Paz");
            assert_eq!(reading.temperature_celsius, expected, "temperature {temperature}");
        }
    }

    #[test]
    fn test_fallback_reading() {
        let reading = WeatherReading::fallback("Usulután");
        assert_eq!(
            reading,
            WeatherReading {
                temperature_celsius: "25.53".to_string(),
                relative_humidity_percent: "60".to_string(),
                condition_description: "Cielo claro".to_string(),
                region_name: "Usulután".to_string(),
            }
        );
    }

    #[test]
    fn test_initial_reading() {
        let reading = WeatherReading::initial("San Salvador");
        assert_eq!(reading.temperature_celsius, "0");
        assert_eq!(reading.relative_humidity_percent, "0");
        assert_eq!(reading.condition_description, "Desconocido");
    }

    #[test]
    fn test_coordinates_display() {
        assert_eq!(Coordinates::new(13.6929, -89.2182).to_string(), "13.6929, -89.2182");
    }
}
