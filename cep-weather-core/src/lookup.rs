use std::sync::Arc;

use crate::{
    Config, LookupError, PostalCode, WeatherResponse,
    provider::{LocalityProvider, WeatherProvider, providers_from_config},
};

/// The postal code to temperature pipeline.
///
/// Stages run strictly in order and the first failure ends the request:
/// validate, resolve locality, fetch weather, derive units.
#[derive(Debug, Clone)]
pub struct Lookup {
    locality: Arc<dyn LocalityProvider>,
    weather: Arc<dyn WeatherProvider>,
}

impl Lookup {
    pub fn new(locality: Arc<dyn LocalityProvider>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { locality, weather }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (locality, weather) = providers_from_config(config)?;
        Ok(Self::new(locality, weather))
    }

    pub async fn handle_lookup(&self, raw: &str) -> Result<WeatherResponse, LookupError> {
        let postal_code = PostalCode::parse(raw).inspect_err(|_| {
            tracing::debug!(input = raw, "rejected malformed postal code");
        })?;

        let found = match self.locality.resolve_locality(&postal_code).await {
            Ok(result) if result.found => result,
            Ok(_) => {
                tracing::info!(cep = %postal_code, "postal code not found upstream");
                return Err(LookupError::LocalityNotFound);
            }
            Err(e) => {
                tracing::warn!(cep = %postal_code, error = %format!("{e:#}"), "locality lookup failed");
                return Err(LookupError::LocalityNotFound);
            }
        };

        let reading = self.weather.current_weather(&found.locality).await.map_err(|e| {
            tracing::warn!(
                cep = %postal_code,
                locality = %found.locality,
                error = %format!("{e:#}"),
                "weather lookup failed"
            );
            LookupError::WeatherUnavailable
        })?;

        let response = WeatherResponse::from_celsius(reading.temperature_celsius);
        if !response.is_finite() {
            tracing::warn!(
                cep = %postal_code,
                locality = %found.locality,
                temp_c = reading.temperature_celsius,
                "weather reading out of range"
            );
            return Err(LookupError::WeatherUnavailable);
        }

        tracing::info!(
            cep = %postal_code,
            locality = %found.locality,
            temp_c = response.temp_c,
            "lookup complete"
        );

        Ok(response)
    }
}
