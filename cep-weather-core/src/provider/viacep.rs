use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::{LocalityLookupResult, PostalCode, provider::truncate_body};

use super::LocalityProvider;

/// Address lookup backed by ViaCEP (`/ws/{cep}/json/`).
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    base_url: String,
    http: Client,
}

impl ViaCepProvider {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), http }
    }
}

#[derive(Debug, Deserialize)]
struct VcResponse {
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default, deserialize_with = "error_flag")]
    erro: bool,
}

/// ViaCEP has sent the miss marker both as `true` and as `"true"`.
fn error_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

#[async_trait]
impl LocalityProvider for ViaCepProvider {
    async fn resolve_locality(&self, postal_code: &PostalCode) -> Result<LocalityLookupResult> {
        let url = format!("{}/ws/{}/json/", self.base_url, postal_code);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to ViaCEP")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read ViaCEP response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "ViaCEP request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: VcResponse =
            serde_json::from_str(&body).context("Failed to parse ViaCEP JSON")?;

        let locality = parsed.localidade.map(|l| l.trim().to_string()).unwrap_or_default();

        if parsed.erro || locality.is_empty() {
            tracing::debug!(cep = %postal_code, "ViaCEP reported no locality");
            return Ok(LocalityLookupResult::not_found());
        }

        Ok(LocalityLookupResult::found(locality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cep() -> PostalCode {
        PostalCode::parse("01001000").unwrap()
    }

    async fn provider_answering(template: ResponseTemplate) -> (ViaCepProvider, MockServer) {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ws/01001000/json/"))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        let provider = ViaCepProvider::new(Client::new(), &mock_server.uri());
        (provider, mock_server)
    }

    #[tokio::test]
    async fn resolves_locality() {
        let (provider, _server) = provider_answering(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({
                "cep": "01001-000",
                "logradouro": "Praça da Sé",
                "localidade": "São Paulo",
                "uf": "SP"
            }),
        ))
        .await;

        let result = provider.resolve_locality(&cep()).await.unwrap();
        assert_eq!(result, LocalityLookupResult::found("São Paulo"));
    }

    #[tokio::test]
    async fn boolean_error_flag_means_not_found() {
        let (provider, _server) = provider_answering(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": true })),
        )
        .await;

        let result = provider.resolve_locality(&cep()).await.unwrap();
        assert!(!result.found);
    }

    #[tokio::test]
    async fn string_error_flag_means_not_found() {
        let (provider, _server) = provider_answering(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": "true" })),
        )
        .await;

        let result = provider.resolve_locality(&cep()).await.unwrap();
        assert!(!result.found);
    }

    #[tokio::test]
    async fn blank_locality_means_not_found() {
        let (provider, _server) = provider_answering(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "localidade": "  " })),
        )
        .await;

        let result = provider.resolve_locality(&cep()).await.unwrap();
        assert_eq!(result, LocalityLookupResult::not_found());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (provider, _server) =
            provider_answering(ResponseTemplate::new(400).set_body_string("Bad Request")).await;

        let err = provider.resolve_locality(&cep()).await.unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let (provider, _server) =
            provider_answering(ResponseTemplate::new(200).set_body_string("<html>")).await;

        let err = provider.resolve_locality(&cep()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse ViaCEP JSON"));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_an_error() {
        let provider = ViaCepProvider::new(Client::new(), "http://127.0.0.1:1");
        assert!(provider.resolve_locality(&cep()).await.is_err());
    }
}
