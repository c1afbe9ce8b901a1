use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, ClientBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::models::{ScrapeForm, SupportedSite};
use crate::api::response::SitesResponse;
use crate::config::Config;
use crate::error::{PresenterError, Result};
use crate::export::ExportFormat;

/// Raw outcome of `POST /scrape`: the HTTP status plus the JSON body, if the
/// body parsed at all.
#[derive(Debug, Clone)]
pub struct ScrapeReply {
    pub http_status: StatusCode,
    pub body: Option<Value>,
}

/// HTTP access to the scraping backend.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: Url, connect_timeout: Duration) -> Result<Self> {
        let http = ClientBuilder::new()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| PresenterError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(BackendClient { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url.clone(), config.connect_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PresenterError::Config(format!("Invalid endpoint {}: {}", path, e)))
    }

    /// Submits the form as multipart data. A non-OK status is not an error
    /// here; the caller decides based on status and payload together.
    pub async fn scrape(&self, form: &ScrapeForm) -> Result<ScrapeReply> {
        let url = self.endpoint("scrape")?;

        let mut multipart = Form::new().text("url", form.url.clone());
        if let Some(scraper_type) = form.scraper_type {
            multipart = multipart.text("scraper_type", scraper_type.as_str());
        }

        debug!(%url, target_url = %form.url, "POST scrape");
        let response = self.http.post(url).multipart(multipart).send().await?;
        let http_status = response.status();
        let bytes = response.bytes().await?;

        let body = match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Some(value),
            Err(e) if http_status.is_success() => {
                return Err(PresenterError::Transport(format!(
                    "Malformed response body: {}",
                    e
                )));
            }
            Err(e) => {
                warn!(status = %http_status, error = %e, "Non-OK response without JSON body");
                None
            }
        };

        Ok(ScrapeReply { http_status, body })
    }

    /// Fetches an export as opaque bytes.
    pub async fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let url = self.endpoint(&format!("export/{}", format.as_str()))?;
        debug!(%url, "GET export");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PresenterError::Export(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PresenterError::Export(format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PresenterError::Export(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    pub async fn supported_sites(&self) -> Result<Vec<SupportedSite>> {
        let url = self.endpoint("supported-sites")?;
        debug!(%url, "GET supported sites");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PresenterError::Transport(format!("HTTP {}", status)));
        }

        let sites: SitesResponse = response.json().await?;
        if sites.status != crate::api::response::STATUS_SUCCESS {
            return Err(PresenterError::Application(
                sites
                    .message
                    .unwrap_or_else(|| "Failed to load supported sites".to_string()),
            ));
        }
        Ok(sites.data)
    }
}
