pub mod source;
pub mod script;
pub mod message;

pub use source::SourceType;
pub use script::Script;
pub use message::{IncomingMessage, IncomingUpdate, Reply};
