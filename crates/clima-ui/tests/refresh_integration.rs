//! End-to-end refresh cycles against a mock Weatherbit server.

use std::sync::Arc;
use std::time::Duration;

use clima_core::{Config, ProviderFailure};
use clima_ui::{DisplayEvent, ReadingOrigin, WeatherModel};
use clima_weather::{Coordinates, DisabledLocation, FixedLocation, WeatherbitProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(mock_server: &MockServer) -> Config {
    let mut config = Config::default();
    config.weather.base_url = mock_server.uri();
    config.weather.api_key = "test-key".to_string();
    config.weather.timeout_secs = Some(5);
    config.refresh.auto_refresh = false;
    config
}

async fn run_until_idle(model: &mut WeatherModel) -> Vec<DisplayEvent> {
    let mut events = Vec::new();
    while model.state().is_loading {
        match tokio::time::timeout(Duration::from_secs(10), model.next_event()).await {
            Ok(Some(event)) => events.push(event),
            _ => break,
        }
    }
    events
}

#[tokio::test]
async fn test_live_reading_from_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "temp": 22.3, "rh": 55, "weather": { "description": "Lluvia" } }]
        })))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server);
    let provider = WeatherbitProvider::new(&config.weather).unwrap();
    let location = FixedLocation::new(Coordinates::new(13.51, -88.87));
    let mut model = WeatherModel::new(&config, Arc::new(location), Arc::new(provider)).unwrap();

    model.mount();
    run_until_idle(&mut model).await;

    let state = model.state();
    assert_eq!(state.origin, ReadingOrigin::Live);
    assert_eq!(state.current.temperature_celsius, "22.30");
    assert_eq!(state.current.relative_humidity_percent, "55");
    assert_eq!(state.current.condition_description, "Lluvia");
    assert_eq!(state.current.region_name, "La Paz");
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server);
    let provider = WeatherbitProvider::new(&config.weather).unwrap();
    let mut model =
        WeatherModel::new(&config, Arc::new(DisabledLocation), Arc::new(provider)).unwrap();

    model.mount();
    let events = run_until_idle(&mut model).await;

    assert!(matches!(events.first(), Some(DisplayEvent::LocationNotice(_))));
    let state = model.state();
    assert_eq!(state.current.temperature_celsius, "25.53");
    assert_eq!(state.current.relative_humidity_percent, "60");
    assert_eq!(state.current.condition_description, "Cielo claro");
    assert_eq!(state.current.region_name, "San Salvador");
    assert_eq!(
        state.origin,
        ReadingOrigin::Fallback(ProviderFailure::Status(500))
    );
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_picker_fetches_region_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .and(query_param("lat", "13.35"))
        .and(query_param("lon", "-88.45"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "temp": 33.456, "rh": 48.5, "weather": { "description": "Soleado" } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server);
    let provider = WeatherbitProvider::new(&config.weather).unwrap();
    let mut model =
        WeatherModel::new(&config, Arc::new(DisabledLocation), Arc::new(provider)).unwrap();

    model.select_region("Usulután").unwrap();
    let events = run_until_idle(&mut model).await;

    assert_eq!(events, vec![DisplayEvent::StateChanged]);
    let state = model.state();
    assert_eq!(state.current.region_name, "Usulután");
    assert_eq!(state.current.temperature_celsius, "33.46");
    assert_eq!(state.current.relative_humidity_percent, "48.5");
}
