use crate::errors::CounterResult;
use crate::fetch::request::{FetchRequest, FetchResponse};

/// Performs a single GET and hands back the raw response.
///
/// Implementations report transport problems and timeouts as
/// `CounterError::FetchFailed`; status codes are left for the caller to judge.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    fn fetch(&self, request: &FetchRequest) -> CounterResult<FetchResponse>;
}
