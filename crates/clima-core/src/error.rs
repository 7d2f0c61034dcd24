//! Centralized error types for Clima.
//!
//! The screen never shows these as an error state. Location failures fall
//! back to the default region and provider failures fall back to a fixed
//! reading, so the types mostly exist to keep the failure kind visible to
//! logs and tests. Use `user_message()` for the acknowledgement text.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Region error: {0}")]
    Region(#[from] RegionError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display on the screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Region(e) => e.user_message(),
        }
    }
}

/// Failures of the device location collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "Permiso denegado. Usando San Salvador por defecto.",
            LocationError::Unavailable(_) => {
                "No se pudo obtener la ubicacion. Usando San Salvador por defecto."
            }
        }
    }

    /// Short title for the acknowledgement prompt.
    pub fn title(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "Permiso Denegado",
            LocationError::Unavailable(_) => "Error de Ubicacion",
        }
    }
}

/// Failures of a weather provider call.
///
/// Every variant is recovered locally by substituting the fallback reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderFailure {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("Provider unreachable: {0}")]
    Unreachable(String),

    /// The provider answered with a non-success status.
    #[error("Provider returned HTTP {0}")]
    Status(u16),

    /// The body did not contain a usable reading.
    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Region lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("Unknown region: {0}")]
    Unknown(String),
}

impl RegionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            RegionError::Unknown(_) => "Departamento desconocido.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No user config directory on this platform.
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound => "No se encontro el directorio de configuracion.",
            ConfigError::Read { .. } => "No se pudo leer el archivo de configuracion.",
            ConfigError::ParseError(_) => "El archivo de configuracion esta mal formado.",
            ConfigError::Invalid(_) => "Configuracion invalida. Revise sus ajustes.",
        }
    }
}

/// Extension trait for converting reqwest errors to provider failures.
pub trait ReqwestErrorExt {
    fn into_provider_failure(self) -> ProviderFailure;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_provider_failure(self) -> ProviderFailure {
        if let Some(status) = self.status() {
            ProviderFailure::Status(status.as_u16())
        } else if self.is_decode() {
            ProviderFailure::Malformed(self.to_string())
        } else {
            ProviderFailure::Unreachable(self.to_string())
        }
    }
}
