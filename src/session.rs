/* ── 即時連線：進出 + 聊天 ── */
use chrono::Local;
use tokio::sync::mpsc;
use tracing::debug;

use crate::hub::{BroadcastHub, Event, Session, SessionId};

pub const ANONYMOUS: &str = "Anonymous";
pub const MAX_USER_CHARS: usize = 64;

#[derive(Clone)]
pub struct Lifecycle {
    hub: BroadcastHub,
    max_message_chars: usize,
}

impl Lifecycle {
    pub fn new(hub: BroadcastHub, max_message_chars: usize) -> Self {
        Self { hub, max_message_chars }
    }

    // hub 踢掉 session 時 rx 會關閉
    pub async fn on_connect(&self) -> (Session, mpsc::Receiver<Event>) {
        self.hub.register().await
    }

    pub async fn on_disconnect(&self, id: SessionId) {
        self.hub.unregister(id).await;
    }

    // 時間以伺服器為準；發送者自己也收得到
    pub async fn on_chat_message(&self, id: SessionId, user: &str, message: &str) {
        let message = truncate(message.trim(), self.max_message_chars);
        if message.is_empty() {
            debug!(session = %id, "empty chat message dropped");
            return;
        }
        let user = match truncate(user.trim(), MAX_USER_CHARS) {
            u if u.is_empty() => ANONYMOUS.to_string(),
            u => u,
        };

        self.hub
            .publish(Event::Chat { user, message, sent_at: Local::now() })
            .await;
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
