use crate::domain::SourceType;
use crate::errors::{CounterError, CounterResult};

const SCHEME_SEPARATOR: &str = "://";

/// Picks the source for a link by its host label, the part of the host
/// before the first dot (`medium` in `https://medium.com/...`)
#[derive(Debug, Clone)]
pub struct Dispatcher {
    medium_host: String,
    wordpress_host: String,
}

impl Dispatcher {
    pub fn new(medium_host: impl Into<String>, wordpress_host: impl Into<String>) -> Self {
        Self {
            medium_host: medium_host.into(),
            wordpress_host: wordpress_host.into(),
        }
    }

    pub fn host_label(url: &str) -> CounterResult<&str> {
        let parts: Vec<&str> = url.split(SCHEME_SEPARATOR).collect();
        if parts.len() != 2 {
            return Err(CounterError::MalformedUrl(url.to_string()));
        }

        Ok(parts[1].split('.').next().unwrap_or_default())
    }

    pub fn resolve(&self, url: &str) -> CounterResult<SourceType> {
        let label = Self::host_label(url)?;

        if label == self.medium_host {
            Ok(SourceType::Medium)
        } else if label == self.wordpress_host {
            Ok(SourceType::WordPress)
        } else {
            Err(CounterError::NoMatchingSource(url.to_string()))
        }
    }

    /// Cheap check used before any network work
    pub fn is_supported(&self, url: &str) -> bool {
        self.resolve(url).is_ok()
    }
}
