use anyhow::Result;

use crate::{AppError, Config};

/// Application configuration and lifecycle.
pub struct App {
    config: Config,
}

impl App {
    /// Create an application from the validated user configuration.
    pub fn new() -> Result<Self, AppError> {
        let (config, validation) = Config::load_validated()?;
        tracing::info!(
            "Configuration loaded with {} warning(s)",
            validation.warnings.len()
        );
        Ok(Self::with_config(config))
    }

    /// Create an application from an already loaded configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }
}
