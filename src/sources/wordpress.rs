use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;

use crate::domain::SourceType;
use crate::errors::{CounterError, CounterResult};
use crate::fetch::{FetchRequest, Fetcher};
use crate::sources::traits::ArticleSource;

static POST_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

#[derive(Debug, Deserialize)]
struct PostResponse {
    content: RenderedContent,
}

#[derive(Debug, Deserialize)]
struct RenderedContent {
    rendered: String,
}

/// Reads posts through the WordPress REST API (`.../wp-json/wp/v2/posts/`)
pub struct WordPressSource {
    fetcher: Arc<dyn Fetcher>,
    api_base: String,
    login: String,
    password: String,
}

impl WordPressSource {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        api_base: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            api_base: api_base.into(),
            login: login.into(),
            password: password.into(),
        }
    }

    /// First run of digits anywhere in the link
    fn extract_post_id(url: &str) -> CounterResult<&str> {
        POST_ID
            .find(url)
            .map(|m| m.as_str())
            .ok_or_else(|| CounterError::InvalidUrl(format!("no post id in {}", url)))
    }

    /// API endpoint for the post behind a public link
    pub fn fetch_target(&self, url: &str) -> CounterResult<String> {
        let id = Self::extract_post_id(url)?;
        Ok(format!("{}{}", self.api_base, id))
    }
}

impl ArticleSource for WordPressSource {
    fn source_type(&self) -> SourceType {
        SourceType::WordPress
    }

    fn build_request(&self, url: &str) -> CounterResult<FetchRequest> {
        let target = self.fetch_target(url)?;

        Ok(FetchRequest::get(target)
            .with_header("Content-Type", "application/json")
            .with_basic_auth(self.login.as_str(), self.password.as_str()))
    }

    // Markup in `rendered` is returned as-is.
    fn extract_text(&self, body: &[u8]) -> CounterResult<String> {
        let response: PostResponse = serde_json::from_slice(body)?;
        Ok(response.content.rendered)
    }

    fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::traits::MockFetcher;
    use crate::fetch::FetchResponse;

    const API: &str = "https://myblog.ru/wp-json/wp/v2/posts/";

    fn source_with(fetcher: MockFetcher) -> WordPressSource {
        WordPressSource::new(Arc::new(fetcher), API, "editor", "s3cret")
    }

    #[test]
    fn test_extract_post_id() {
        assert_eq!(
            WordPressSource::extract_post_id("https://myblog.ru/posts/42-my-article").unwrap(),
            "42"
        );
        assert_eq!(
            WordPressSource::extract_post_id("https://myblog.ru/?p=1234&page=2").unwrap(),
            "1234"
        );
    }

    #[test]
    fn test_fetch_target_appends_id_to_api_base() {
        let source = source_with(MockFetcher::new());
        let target = source.fetch_target("https://myblog.ru/posts/42-my-article").unwrap();
        assert_eq!(target, format!("{}42", API));
    }

    #[test]
    fn test_no_digits_is_invalid_and_skips_request() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().never();

        let err = source_with(fetcher)
            .fetch("https://myblog.ru/posts/my-article")
            .unwrap_err();
        assert!(matches!(err, CounterError::InvalidUrl(_)));
    }

    #[test]
    fn test_request_carries_basic_auth_and_content_type() {
        let source = source_with(MockFetcher::new());
        let request = source.build_request("https://myblog.ru/posts/7").unwrap();

        assert_eq!(request.url, format!("{}7", API));
        assert_eq!(request.header("Content-Type"), Some("application/json"));

        let auth = request.basic_auth.unwrap();
        assert_eq!(auth.login, "editor");
        assert_eq!(auth.password, "s3cret");
    }

    #[test]
    fn test_rendered_returned_verbatim() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|req| req.url.ends_with("/posts/42"))
            .times(1)
            .returning(|_| {
                Ok(FetchResponse::new(
                    200,
                    r#"{"id":42,"content":{"rendered":"<p>Привет, <b>мир</b></p>\n","protected":false}}"#,
                ))
            });

        let text = source_with(fetcher).fetch("https://myblog.ru/posts/42-my-article").unwrap();
        assert_eq!(text, "<p>Привет, <b>мир</b></p>\n");
    }

    #[test]
    fn test_missing_rendered_fails_decode() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(FetchResponse::new(200, r#"{"content":{}}"#)));

        let err = source_with(fetcher).fetch("https://myblog.ru/posts/1").unwrap_err();
        assert!(matches!(err, CounterError::DecodeFailed(_)));
    }

    #[test]
    fn test_unauthorized_is_fetch_failure() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().returning(|_| {
            Ok(FetchResponse::new(
                401,
                r#"{"code":"rest_forbidden","message":"Sorry"}"#,
            ))
        });

        let err = source_with(fetcher).fetch("https://myblog.ru/posts/1").unwrap_err();
        assert!(matches!(err, CounterError::FetchFailed { .. }));
    }
}
