use crate::domain::{IncomingUpdate, Reply};
use crate::errors::CounterResult;

#[cfg_attr(test, mockall::automock)]
pub trait Messenger: Send + Sync {
    /// Prepare the transport for polling and return the bot's account name
    fn connect(&self) -> CounterResult<String>;

    /// Wait for updates with an id of at least `offset`
    fn poll(&self, offset: i64) -> CounterResult<Vec<IncomingUpdate>>;

    fn send(&self, reply: &Reply) -> CounterResult<()>;
}
