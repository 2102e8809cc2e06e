//! Fetch the task document over HTTP(S).

use anyhow::{Context, Result};
use tally_core::TaskSource;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TaskSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()
            .with_context(|| format!("GET {}", self.url))?;

        let text = resp
            .text()
            .await
            .with_context(|| format!("read body from {}", self.url))?;
        debug!(url = %self.url, bytes = text.len(), "fetched task document");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_an_error_naming_the_url() {
        // Port 9 (discard) on loopback: nothing listens, connection is refused.
        let src = HttpSource::new("http://127.0.0.1:9/tasks.json");
        let err = src.fetch().await.unwrap_err();
        assert!(format!("{err:#}").contains("127.0.0.1:9"));
    }
}
