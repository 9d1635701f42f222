use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

/// Best-effort Telegram notifications to the admin chat.
///
/// Disabled unless both TELEGRAM_BOT_TOKEN and TELEGRAM_ADMIN_CHAT_ID are
/// set. Sends never block the request path and never fail the caller;
/// delivery problems go to the log so operators can spot a dead bot.
#[derive(Clone)]
pub struct Notifier {
    http: reqwest::Client,
    target: Option<(String, String)>,
}

impl Notifier {
    pub fn from_env() -> Self {
        let target = match (
            std::env::var("TELEGRAM_BOT_TOKEN"),
            std::env::var("TELEGRAM_ADMIN_CHAT_ID"),
        ) {
            (Ok(token), Ok(chat_id)) if !token.is_empty() && !chat_id.is_empty() => {
                Some((token, chat_id))
            }
            _ => None,
        };
        Self {
            http: reqwest::Client::new(),
            target,
        }
    }

    pub fn disabled() -> Self {
        Self {
            http: reqwest::Client::new(),
            target: None,
        }
    }

    pub fn send(&self, text: String) {
        let Some((token, chat_id)) = self.target.clone() else {
            debug!("Telegram notifications disabled, dropping: {}", text);
            return;
        };

        let http = self.http.clone();
        tokio::spawn(async move {
            let url = format!("https://api.telegram.org/bot{token}/sendMessage");
            let body = json!({ "chat_id": chat_id, "text": text });

            match http
                .post(&url)
                .json(&body)
                .timeout(Duration::from_secs(5))
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => warn!("Telegram notification rejected: {}", resp.status()),
                Err(e) => warn!("Telegram notification failed: {}", e),
            }
        });
    }
}
