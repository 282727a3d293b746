pub mod script_filter;
pub mod counter_service;
pub mod bot_service;

pub use script_filter::ScriptFilter;
pub use counter_service::SymbolCounter;
pub use bot_service::BotService;
