use std::sync::Arc;

use crate::config::ScraperConfig;
use crate::domain::SourceType;
use crate::errors::{CounterError, CounterResult};
use crate::fetch::{FetchRequest, Fetcher, HttpFetcher};
use crate::services::script_filter::ScriptFilter;
use crate::sources::{ArticleSource, Dispatcher, MediumSource, WordPressSource};

/// Counts the characters of the configured script in an article.
///
/// Holds no per-call state, so one instance can serve many threads at once.
pub struct SymbolCounter {
    dispatcher: Dispatcher,
    medium: MediumSource,
    wordpress: WordPressSource,
    filter: ScriptFilter,
}

impl SymbolCounter {
    pub fn new(config: &ScraperConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            dispatcher: Dispatcher::new(&config.medium_host, &config.wordpress_host),
            medium: MediumSource::new(fetcher.clone()),
            wordpress: WordPressSource::new(
                fetcher,
                &config.wordpress_api,
                &config.wordpress_login,
                &config.wordpress_password,
            ),
            filter: ScriptFilter::new(config.script),
        }
    }

    /// Counter backed by a real HTTP client with the configured timeout
    pub fn from_config(config: &ScraperConfig) -> CounterResult<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn source(&self, source_type: SourceType) -> &dyn ArticleSource {
        match source_type {
            SourceType::Medium => &self.medium,
            SourceType::WordPress => &self.wordpress,
        }
    }

    /// Which source a link belongs to and the request that would be sent for it
    pub fn plan(&self, url: &str) -> CounterResult<(SourceType, FetchRequest)> {
        let source_type = self.dispatcher.resolve(url)?;
        let request = self.source(source_type).build_request(url)?;
        Ok((source_type, request))
    }

    pub fn count_symbols(&self, url: &str) -> CounterResult<usize> {
        let source_type = self.dispatcher.resolve(url)?;
        tracing::debug!(%url, source = %source_type, "dispatched");

        let text = self
            .source(source_type)
            .fetch(url)
            .map_err(|e| CounterError::Retrieval(Box::new(e)))?;

        let count = self.filter.count(&text);
        tracing::info!(%url, source = %source_type, script = %self.filter.script(), count, "counted");

        Ok(count)
    }
}
