//! Device location sources.
//!
//! A desktop process has no GPS, so "device location" is one of: an IP
//! geolocation lookup, a configured coordinate snapshot, or a source that
//! always denies permission.

use std::sync::Arc;

use async_trait::async_trait;
use clima_core::{LocationConfig, LocationMode};
use reqwest::Client;
use serde::Deserialize;

use crate::types::{Coordinates, LocationError};

/// Outcome of a foreground permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Provider of the device position.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Ask for foreground location permission. Repeated calls are harmless.
    async fn request_permission(&self) -> Permission;

    /// Take a single position snapshot. Only called after permission is granted.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Request permission, then take one snapshot.
pub async fn locate(source: &dyn LocationSource) -> Result<Coordinates, LocationError> {
    if source.request_permission().await == Permission::Denied {
        tracing::warn!("Location permission denied");
        return Err(LocationError::PermissionDenied);
    }

    let position = source.current_position().await?;
    tracing::info!("Device location: {}, {}", position.latitude, position.longitude);
    Ok(position)
}

/// Build the source selected by configuration.
pub fn from_config(config: &LocationConfig) -> Result<Arc<dyn LocationSource>, LocationError> {
    match config.mode {
        LocationMode::Ip => Ok(Arc::new(IpLocator::new(&config.ip_api_url)?)),
        LocationMode::Fixed => match (config.latitude, config.longitude) {
            (Some(lat), Some(lon)) => Ok(Arc::new(FixedLocation::new(Coordinates::new(lat, lon)))),
            _ => Err(LocationError::Unavailable(
                "fixed location requires latitude and longitude".to_string(),
            )),
        },
        LocationMode::Disabled => Ok(Arc::new(DisabledLocation)),
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate position from an ip-api.com compatible endpoint.
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: Client,
    base_url: String,
}

impl IpLocator {
    pub fn new(base_url: &str) -> Result<Self, LocationError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LocationSource for IpLocator {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let url = format!("{}/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("IP geolocation request failed: {}", e);
                LocationError::Unavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(LocationError::Unavailable(format!(
                "geolocation returned status {}",
                response.status()
            )));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::Unavailable(
                body.message
                    .unwrap_or_else(|| format!("geolocation status {}", body.status)),
            )),
        }
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    position: Coordinates,
}

impl FixedLocation {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.position)
    }
}

/// Never grants permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLocation;

#[async_trait]
impl LocationSource for DisabledLocation {
    async fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}
