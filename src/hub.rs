/* ── 連線表 + 廣播：每個 session 一條有界佇列，滿了就踢掉 ── */
use chrono::{DateTime, Local};
use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};
use tokio::sync::{
    mpsc::{self, error::TrySendError},
    Mutex,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::store::UploadedFile;

pub type SessionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Upload(UploadedFile),
    Chat {
        user: String,
        message: String,
        sent_at: DateTime<Local>,
    },
    Presence {
        kind: PresenceKind,
        session_id: SessionId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub connected_at: DateTime<Local>,
}

struct Subscriber {
    session: Session,
    tx: mpsc::Sender<Event>,
}

#[derive(Clone)]
pub struct BroadcastHub {
    sessions: Arc<Mutex<HashMap<SessionId, Subscriber>>>,
    queue_capacity: usize,
}

impl BroadcastHub {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            sessions: Arc::default(),
            queue_capacity: queue_capacity.max(1),
        }
    }

    // 新人自己也會收到 Connected
    pub async fn register(&self) -> (Session, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let session = Session { id: Uuid::new_v4(), connected_at: Local::now() };

        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.id, Subscriber { session: session.clone(), tx });
        info!(session = %session.id, total = sessions.len(), "session registered");
        fan_out(
            &mut sessions,
            Event::Presence { kind: PresenceKind::Connected, session_id: session.id },
        );

        (session, rx)
    }

    // 已被踢掉（太慢）的回 false
    pub async fn unregister(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        let Some(sub) = sessions.remove(&id) else {
            return false;
        };
        let alive_for = Local::now() - sub.session.connected_at;
        info!(
            session = %id,
            total = sessions.len(),
            secs = alive_for.num_seconds(),
            "session unregistered"
        );
        fan_out(
            &mut sessions,
            Event::Presence { kind: PresenceKind::Disconnected, session_id: id },
        );
        true
    }

    // 回傳實際收下的 session 數
    pub async fn publish(&self, event: Event) -> usize {
        let mut sessions = self.sessions.lock().await;
        fan_out(&mut sessions, event)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn fan_out(sessions: &mut HashMap<SessionId, Subscriber>, event: Event) -> usize {
    let mut delivered = None;
    let mut pending = VecDeque::from([event]);

    while let Some(ev) = pending.pop_front() {
        let mut dead = Vec::new();
        let mut count = 0;
        for (id, sub) in sessions.iter() {
            match sub.tx.try_send(ev.clone()) {
                Ok(()) => count += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(session = %id, "outbound queue full, dropping session");
                    dead.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(session = %id, "receiver gone, dropping session");
                    dead.push(*id);
                }
            }
        }
        delivered.get_or_insert(count);

        for id in dead {
            sessions.remove(&id);
            pending.push_back(Event::Presence { kind: PresenceKind::Disconnected, session_id: id });
        }
    }

    delivered.unwrap_or(0)
}
