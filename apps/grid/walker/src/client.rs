use async_trait::async_trait;
use domain_grid::{Coordinate, DomainResponse, ResolveRequest};
use eyre::{Result, WrapErr, eyre};
use reqwest::Client;
use std::time::Duration;

/// The subset of the grid API the walker needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GridClient: Send + Sync {
    /// `POST /coordinates` with `source` as the expansion point.
    async fn resolve(&self, target: Coordinate, source: Coordinate) -> Result<String>;

    /// `POST /seed`
    async fn seed(&self) -> Result<String>;
}

/// reqwest-backed client rooted at the API base URL (e.g. `http://localhost:8080/api`).
pub struct HttpGridClient {
    client: Client,
    base_url: String,
}

impl HttpGridClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_domain(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("{} - {}", status, body));
        }

        let body: DomainResponse = response
            .json()
            .await
            .wrap_err("Failed to decode domain response")?;
        Ok(body.domain)
    }
}

#[async_trait]
impl GridClient for HttpGridClient {
    async fn resolve(&self, target: Coordinate, source: Coordinate) -> Result<String> {
        let payload = ResolveRequest {
            x: target.x,
            y: target.y,
            source_x: source.x,
            source_y: source.y,
        };

        let response = self
            .client
            .post(self.url("/coordinates"))
            .json(&payload)
            .send()
            .await
            .wrap_err_with(|| format!("Request for {} failed", target))?;

        Self::read_domain(response).await
    }

    async fn seed(&self) -> Result<String> {
        let response = self
            .client
            .post(self.url("/seed"))
            .send()
            .await
            .wrap_err("Seed request failed")?;

        Self::read_domain(response).await
    }
}
