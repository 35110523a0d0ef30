use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::{
    Config, LocalityLookupResult, PostalCode, WeatherReading,
    provider::{viacep::ViaCepProvider, weatherapi::WeatherApiProvider},
};

pub mod viacep;
pub mod weatherapi;

const USER_AGENT: &str = concat!("cep-weather/", env!("CARGO_PKG_VERSION"));

/// Resolves a postal code to the name of its locality.
#[async_trait]
pub trait LocalityProvider: Send + Sync + Debug {
    /// `Err` means the upstream could not be reached or answered with
    /// something unreadable; a clean "no such code" is `Ok` with `found == false`.
    async fn resolve_locality(&self, postal_code: &PostalCode) -> anyhow::Result<LocalityLookupResult>;
}

/// Reports the current temperature for a locality name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, locality: &str) -> anyhow::Result<WeatherReading>;
}

/// Shared HTTP client for the upstream collaborators, bounded by the
/// configured request timeout.
pub fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    use anyhow::Context;

    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Construct both collaborators from config.
pub fn providers_from_config(
    config: &Config,
) -> anyhow::Result<(Arc<dyn LocalityProvider>, Arc<dyn WeatherProvider>)> {
    let api_key = config.weather_api_key()?;
    let http = http_client(config.request_timeout())?;

    let locality: Arc<dyn LocalityProvider> =
        Arc::new(ViaCepProvider::new(http.clone(), &config.viacep_base_url));
    let weather: Arc<dyn WeatherProvider> = Arc::new(WeatherApiProvider::new(
        http,
        &config.weatherapi_base_url,
        api_key.to_owned(),
    ));

    Ok((locality, weather))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = providers_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No WeatherAPI key configured"));
    }

    #[test]
    fn providers_from_config_works_when_key_set() {
        let cfg = Config { weather_api_key: Some("KEY".into()), ..Config::default() };
        assert!(providers_from_config(&cfg).is_ok());
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("{}"), "{}");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "ã".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
