//! Counts the Cyrillic characters of Medium and WordPress articles and serves
//! the result through a Telegram bot.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fetch;
pub mod logging;
pub mod messaging;
pub mod services;
pub mod sources;

pub use errors::{CounterError, CounterResult};
pub use services::SymbolCounter;
