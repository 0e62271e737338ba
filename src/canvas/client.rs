//! Blocking Canvas REST client.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{CoursePages, NewPage};
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("bbcanvas/", env!("CARGO_PKG_VERSION"));

/// Where the Canvas instance lives and how to authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Instance root, e.g. `https://school.instructure.com`.
    pub base_url: String,
    /// API access token, sent as a bearer token.
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl CanvasConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Creates pages through `POST /api/v1/courses/:id/pages`.
pub struct CanvasClient {
    http: Client,
    config: CanvasConfig,
}

impl CanvasClient {
    pub fn new(config: CanvasConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(Error::Config("Canvas API token is empty".to_string()));
        }
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Api(format!("build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }
}

impl CoursePages for CanvasClient {
    fn create_page(&mut self, page: &NewPage) -> Result<()> {
        let url = self
            .config
            .api_url(&format!("/courses/{}/pages", page.course_id));
        let published = if page.published { "true" } else { "false" };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .form(&[
                ("wiki_page[title]", page.title.as_str()),
                ("wiki_page[body]", page.body.as_str()),
                ("wiki_page[published]", published),
            ])
            .send()
            .map_err(|e| Error::Api(format!("POST {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Api(format!(
                "POST {url} returned HTTP {status}: {}",
                body.trim()
            )));
        }

        info!(course = %page.course_id, title = %page.title, "created Canvas page");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_cleanly() {
        let config = CanvasConfig::new("https://canvas.example.edu/", "t0ken");
        assert_eq!(
            config.api_url("/courses/1126/pages"),
            "https://canvas.example.edu/api/v1/courses/1126/pages"
        );
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let err = CanvasClient::new(CanvasConfig::new("https://canvas.example.edu", ""))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
