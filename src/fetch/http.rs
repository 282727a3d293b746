use std::time::Duration;

use reqwest::blocking::Client;

use crate::errors::{CounterError, CounterResult, FetchFailure};
use crate::fetch::request::{FetchRequest, FetchResponse};
use crate::fetch::traits::Fetcher;

/// Blocking reqwest client; safe to share between threads
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> CounterResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CounterError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn failure(url: &str, err: reqwest::Error) -> CounterError {
        let reason = if err.is_timeout() {
            FetchFailure::Timeout
        } else {
            FetchFailure::Transport(err.to_string())
        };

        CounterError::FetchFailed {
            url: url.to_string(),
            reason,
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, request: &FetchRequest) -> CounterResult<FetchResponse> {
        let mut builder = self.client.get(&request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.login, Some(&auth.password));
        }

        tracing::debug!(url = %request.url, "fetching");

        let response = builder
            .send()
            .map_err(|e| Self::failure(&request.url, e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| Self::failure(&request.url, e))?;

        tracing::debug!(url = %request.url, status, bytes = body.len(), "fetched");

        Ok(FetchResponse::new(status, body.to_vec()))
    }
}
