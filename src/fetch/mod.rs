pub mod request;
pub mod traits;
pub mod http;

pub use http::HttpFetcher;
pub use request::{BasicAuth, FetchRequest, FetchResponse};
pub use traits::Fetcher;
