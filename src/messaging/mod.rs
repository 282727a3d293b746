pub mod traits;
pub mod telegram;

pub use self::telegram::TelegramMessenger;
pub use traits::Messenger;
