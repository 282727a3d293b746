pub mod traits;
pub mod dispatcher;
pub mod medium;
pub mod wordpress;

pub use traits::ArticleSource;
pub use dispatcher::Dispatcher;
pub use medium::MediumSource;
pub use wordpress::WordPressSource;
