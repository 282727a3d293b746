use crate::domain::SourceType;
use crate::errors::CounterResult;
use crate::fetch::{FetchRequest, Fetcher};

pub trait ArticleSource: Send + Sync {
    /// Identifies this source type
    fn source_type(&self) -> SourceType;

    /// Build the request that retrieves the article behind a user-supplied URL
    fn build_request(&self, url: &str) -> CounterResult<FetchRequest>;

    /// Extract the article text from a successful response body
    fn extract_text(&self, body: &[u8]) -> CounterResult<String>;

    fn fetcher(&self) -> &dyn Fetcher;

    /// Fetch the article and return its plain text
    fn fetch(&self, url: &str) -> CounterResult<String> {
        let request = self.build_request(url)?;
        let response = self.fetcher().fetch(&request)?;
        let body = response.into_success_body(&request.url)?;

        self.extract_text(&body)
    }
}
