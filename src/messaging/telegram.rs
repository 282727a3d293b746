use std::time::Duration;

use telegram::{TelegramClient, Update};

use crate::config::Config;
use crate::domain::{IncomingMessage, IncomingUpdate, Reply};
use crate::errors::CounterResult;
use crate::messaging::traits::Messenger;

/// Long-polling transport over the Telegram Bot API
pub struct TelegramMessenger {
    client: TelegramClient,
    poll_timeout: Duration,
}

impl TelegramMessenger {
    pub fn new(config: &Config) -> CounterResult<Self> {
        let client = TelegramClient::new(
            &config.telegram_api_url,
            config.require_token()?,
            config.poll_timeout,
        )?;

        Ok(Self {
            client,
            poll_timeout: config.poll_timeout,
        })
    }

    fn to_incoming(update: Update) -> IncomingUpdate {
        let message = update.message.map(|msg| IncomingMessage {
            chat_id: msg.chat.id,
            username: msg.from.as_ref().and_then(|u| u.username.clone()),
            command: msg.command().map(str::to_string),
            text: msg.text.unwrap_or_default(),
        });

        IncomingUpdate {
            update_id: update.update_id,
            message,
        }
    }
}

impl Messenger for TelegramMessenger {
    fn connect(&self) -> CounterResult<String> {
        self.client.delete_webhook()?;
        let me = self.client.get_me()?;
        Ok(me.username.unwrap_or(me.first_name))
    }

    fn poll(&self, offset: i64) -> CounterResult<Vec<IncomingUpdate>> {
        let updates = self.client.get_updates(offset, self.poll_timeout)?;
        Ok(updates.into_iter().map(Self::to_incoming).collect())
    }

    fn send(&self, reply: &Reply) -> CounterResult<()> {
        self.client.send_message(reply.chat_id, &reply.text)?;
        Ok(())
    }
}
