use std::time::Duration;

use crate::config::BotTexts;
use crate::domain::{IncomingMessage, Reply};
use crate::errors::CounterResult;
use crate::messaging::Messenger;
use crate::services::counter_service::SymbolCounter;

const START_COMMAND: &str = "start";

/// Pause after a failed poll before trying again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

pub struct BotService<M: Messenger> {
    messenger: M,
    counter: SymbolCounter,
    access_users: Vec<String>,
    texts: BotTexts,
}

impl<M: Messenger> BotService<M> {
    pub fn new(messenger: M, counter: SymbolCounter, access_users: Vec<String>, texts: BotTexts) -> Self {
        Self {
            messenger,
            counter,
            access_users,
            texts,
        }
    }

    /// Users without a username are never authorized
    fn is_authorized(&self, username: Option<&str>) -> bool {
        username.is_some_and(|name| self.access_users.iter().any(|u| u == name))
    }

    /// Build the reply for a single message
    pub fn handle(&self, message: &IncomingMessage) -> Reply {
        let chat_id = message.chat_id;

        if !self.is_authorized(message.username.as_deref()) {
            tracing::warn!(user = ?message.username, "unauthorized user");
            return Reply::new(chat_id, &self.texts.unauthorized);
        }

        if let Some(command) = &message.command {
            let text = if command == START_COMMAND {
                &self.texts.start
            } else {
                &self.texts.unknown
            };
            return Reply::new(chat_id, text);
        }

        let link = message.text.trim();
        if link.is_empty() || !self.counter.dispatcher().is_supported(link) {
            return Reply::new(chat_id, &self.texts.wrong_link);
        }

        match self.counter.count_symbols(link) {
            Ok(count) => Reply::new(chat_id, count.to_string()),
            Err(e) => {
                tracing::warn!(%link, error = %e, "count failed");
                Reply::new(chat_id, format!("error: {}", e))
            }
        }
    }

    /// Poll one batch, answer every message in it and return the next offset
    pub fn poll_once(&self, offset: i64) -> CounterResult<i64> {
        let updates = self.messenger.poll(offset)?;
        let next_offset = updates
            .iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(offset);

        let messages: Vec<&IncomingMessage> = updates.iter().filter_map(|u| u.message.as_ref()).collect();

        // Each message may block on a fetch, so they are handled side by side.
        let replies: Vec<Reply> = std::thread::scope(|scope| {
            let handles: Vec<_> = messages
                .iter()
                .map(|message| scope.spawn(move || self.handle(message)))
                .collect();

            handles
                .into_iter()
                .zip(&messages)
                .filter_map(|(handle, message)| match handle.join() {
                    Ok(reply) => Some(reply),
                    Err(_) => {
                        tracing::error!(chat_id = message.chat_id, "message handler panicked, no reply sent");
                        None
                    }
                })
                .collect()
        });

        for reply in &replies {
            if let Err(e) = self.messenger.send(reply) {
                tracing::warn!(chat_id = reply.chat_id, error = %e, "failed to send reply");
            }
        }

        Ok(next_offset)
    }

    /// Connect and serve messages until the process stops
    pub fn run(&self) -> CounterResult<()> {
        let account = self.messenger.connect()?;
        tracing::info!(%account, "authorized, polling for updates");

        let mut offset = 0;
        loop {
            match self.poll_once(offset) {
                Ok(next) => offset = next,
                Err(e) => {
                    tracing::error!(error = %e, "polling failed");
                    std::thread::sleep(POLL_RETRY_DELAY);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::ScraperConfig;
    use crate::domain::{IncomingUpdate, Script};
    use crate::errors::CounterError;
    use crate::fetch::traits::{Fetcher, MockFetcher};
    use crate::fetch::{FetchRequest, FetchResponse};
    use crate::messaging::traits::MockMessenger;

    fn scraper_config() -> ScraperConfig {
        ScraperConfig {
            medium_host: "medium".to_string(),
            wordpress_host: "myblog".to_string(),
            wordpress_api: "https://myblog.ru/wp-json/wp/v2/posts/".to_string(),
            wordpress_login: String::new(),
            wordpress_password: String::new(),
            script: Script::Cyrillic,
            fetch_timeout: Duration::from_secs(5),
        }
    }

    fn counter_returning(rendered: &'static str) -> SymbolCounter {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().returning(move |_| {
            let body = serde_json::json!({"content": {"rendered": rendered}}).to_string();
            Ok(FetchResponse::new(200, body))
        });
        SymbolCounter::new(&scraper_config(), Arc::new(fetcher))
    }

    fn counter_never_fetching() -> SymbolCounter {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().never();
        SymbolCounter::new(&scraper_config(), Arc::new(fetcher))
    }

    fn service(messenger: MockMessenger, counter: SymbolCounter) -> BotService<MockMessenger> {
        BotService::new(messenger, counter, vec!["alice".to_string()], BotTexts::default())
    }

    fn from_alice(text: &str) -> IncomingMessage {
        IncomingMessage::new(1, text).with_username("alice")
    }

    #[test]
    fn test_unauthorized_user_rejected() {
        let bot = service(MockMessenger::new(), counter_never_fetching());

        let reply = bot.handle(&IncomingMessage::new(2, "https://myblog.ru/posts/1").with_username("mallory"));
        assert_eq!(reply, Reply::new(2, "401 unauthorized"));

        let reply = bot.handle(&IncomingMessage::new(3, "/start").with_command("start"));
        assert_eq!(reply.text, "401 unauthorized");
    }

    #[test]
    fn test_commands() {
        let bot = service(MockMessenger::new(), counter_never_fetching());
        let texts = BotTexts::default();

        let reply = bot.handle(&from_alice("/start").with_command("start"));
        assert_eq!(reply.text, texts.start);

        let reply = bot.handle(&from_alice("/stats").with_command("stats"));
        assert_eq!(reply.text, texts.unknown);
    }

    #[test]
    fn test_wrong_links_are_rejected_without_fetching() {
        let bot = service(MockMessenger::new(), counter_never_fetching());
        let wrong_link = BotTexts::default().wrong_link;

        for text in ["", "   ", "hello", "https://example.com/post/1"] {
            assert_eq!(bot.handle(&from_alice(text)).text, wrong_link, "text {:?}", text);
        }
    }

    #[test]
    fn test_link_is_counted() {
        let bot = service(MockMessenger::new(), counter_returning("<p>Привет, world</p>"));
        let reply = bot.handle(&from_alice("https://myblog.ru/posts/42-my-article"));
        assert_eq!(reply, Reply::new(1, "6"));
    }

    #[test]
    fn test_link_with_surrounding_whitespace_is_counted() {
        let bot = service(MockMessenger::new(), counter_returning("мир"));
        let reply = bot.handle(&from_alice("  https://myblog.ru/posts/42\n"));
        assert_eq!(reply, Reply::new(1, "3"));
    }

    #[test]
    fn test_count_failure_is_reported() {
        let bot = service(MockMessenger::new(), counter_never_fetching());
        let reply = bot.handle(&from_alice("https://myblog.ru/about"));
        assert!(reply.text.starts_with("error: Retrieval failed"), "{}", reply.text);
    }

    #[test]
    fn test_poll_once_answers_messages_and_advances_offset() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sent_clone = sent.clone();

        let mut messenger = MockMessenger::new();
        messenger.expect_poll().withf(|offset| *offset == 10).times(1).returning(|_| {
            Ok(vec![
                IncomingUpdate {
                    update_id: 10,
                    message: Some(IncomingMessage::new(1, "https://myblog.ru/posts/5").with_username("alice")),
                },
                IncomingUpdate {
                    update_id: 11,
                    message: None,
                },
                IncomingUpdate {
                    update_id: 12,
                    message: Some(IncomingMessage::new(2, "https://myblog.ru/posts/6").with_username("eve")),
                },
            ])
        });
        messenger.expect_send().times(2).returning(move |reply| {
            sent_clone.lock().unwrap().push(reply.clone());
            Ok(())
        });

        let bot = service(messenger, counter_returning("мир"));
        assert_eq!(bot.poll_once(10).unwrap(), 13);

        let sent = sent.lock().unwrap();
        assert_eq!(*sent, vec![Reply::new(1, "3"), Reply::new(2, "401 unauthorized")]);
    }

    #[test]
    fn test_empty_poll_keeps_offset() {
        let mut messenger = MockMessenger::new();
        messenger.expect_poll().returning(|_| Ok(Vec::new()));
        messenger.expect_send().never();

        let bot = service(messenger, counter_never_fetching());
        assert_eq!(bot.poll_once(42).unwrap(), 42);
    }

    #[test]
    fn test_send_failure_does_not_stop_batch() {
        let mut messenger = MockMessenger::new();
        messenger.expect_poll().returning(|_| {
            Ok(vec![
                IncomingUpdate {
                    update_id: 1,
                    message: Some(IncomingMessage::new(1, "/start").with_username("alice").with_command("start")),
                },
                IncomingUpdate {
                    update_id: 2,
                    message: Some(IncomingMessage::new(2, "/start").with_username("alice").with_command("start")),
                },
            ])
        });
        messenger
            .expect_send()
            .times(2)
            .returning(|_| Err(CounterError::Telegram("chat not found".to_string())));

        let bot = service(messenger, counter_never_fetching());
        assert_eq!(bot.poll_once(0).unwrap(), 3);
    }

    #[test]
    fn test_panicking_handler_does_not_stop_batch() {
        struct ExplodingFetcher;

        impl Fetcher for ExplodingFetcher {
            fn fetch(&self, _request: &FetchRequest) -> CounterResult<FetchResponse> {
                panic!("fetcher exploded");
            }
        }

        let counter = SymbolCounter::new(&scraper_config(), Arc::new(ExplodingFetcher));

        let sent = Arc::new(Mutex::new(Vec::new()));
        let sent_clone = sent.clone();

        let mut messenger = MockMessenger::new();
        messenger.expect_poll().returning(|_| {
            Ok(vec![
                IncomingUpdate {
                    update_id: 4,
                    message: Some(from_alice("https://myblog.ru/posts/9")),
                },
                IncomingUpdate {
                    update_id: 5,
                    message: Some(IncomingMessage::new(2, "/start").with_username("alice").with_command("start")),
                },
            ])
        });
        messenger.expect_send().times(1).returning(move |reply| {
            sent_clone.lock().unwrap().push(reply.clone());
            Ok(())
        });

        let bot = service(messenger, counter);
        assert_eq!(bot.poll_once(4).unwrap(), 6);
        assert_eq!(*sent.lock().unwrap(), vec![Reply::new(2, BotTexts::default().start)]);
    }

    #[test]
    fn test_poll_error_propagates() {
        let mut messenger = MockMessenger::new();
        messenger
            .expect_poll()
            .returning(|_| Err(CounterError::Telegram("Bad Gateway".to_string())));

        let bot = service(messenger, counter_never_fetching());
        assert!(matches!(bot.poll_once(0), Err(CounterError::Telegram(_))));
    }
}
