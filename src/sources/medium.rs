use std::sync::Arc;

use serde::Deserialize;

use crate::domain::SourceType;
use crate::errors::{CounterError, CounterResult};
use crate::fetch::{FetchRequest, Fetcher};
use crate::sources::traits::ArticleSource;

/// Editor links are the published link plus this suffix
const EDIT_SUFFIX: &str = "edit";

/// Length of the anti-hijacking marker (`])}while(1);</x>`) that precedes
/// the JSON payload
pub const JSON_PREFIX_LEN: usize = 16;

#[derive(Debug, Deserialize)]
struct PostResponse {
    payload: Payload,
}

#[derive(Debug, Deserialize)]
struct Payload {
    value: PostValue,
}

#[derive(Debug, Deserialize)]
struct PostValue {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    content: PostContent,
}

#[derive(Debug, Deserialize)]
struct PostContent {
    #[serde(rename = "bodyModel")]
    body_model: BodyModel,
}

#[derive(Debug, Deserialize)]
struct BodyModel {
    #[serde(default)]
    paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Deserialize)]
struct Paragraph {
    #[serde(default)]
    text: Option<String>,
}

pub struct MediumSource {
    fetcher: Arc<dyn Fetcher>,
}

impl MediumSource {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    fn normalize_url(url: &str) -> &str {
        url.strip_suffix(EDIT_SUFFIX).unwrap_or(url)
    }

    fn parse_body(body: &[u8]) -> CounterResult<String> {
        if body.len() <= JSON_PREFIX_LEN {
            return Err(CounterError::DecodeFailed(format!(
                "response of {} bytes has no payload after the {}-byte prefix",
                body.len(),
                JSON_PREFIX_LEN
            )));
        }

        let response: PostResponse = serde_json::from_slice(&body[JSON_PREFIX_LEN..])?;
        let post = response.payload.value;

        tracing::debug!(
            id = post.id.as_deref().unwrap_or_default(),
            title = post.title.as_deref().unwrap_or_default(),
            paragraphs = post.content.body_model.paragraphs.len(),
            "decoded medium post"
        );

        Ok(post
            .content
            .body_model
            .paragraphs
            .into_iter()
            .filter_map(|p| p.text)
            .collect())
    }
}

impl ArticleSource for MediumSource {
    fn source_type(&self) -> SourceType {
        SourceType::Medium
    }

    fn build_request(&self, url: &str) -> CounterResult<FetchRequest> {
        Ok(FetchRequest::get(Self::normalize_url(url)).with_header("Accept", "application/json"))
    }

    fn extract_text(&self, body: &[u8]) -> CounterResult<String> {
        Self::parse_body(body)
    }

    fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }
}
