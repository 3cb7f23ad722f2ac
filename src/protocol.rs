/* ── WebSocket 文字框格式：{"event": "...", "data": {...}} ── */
use serde::{Deserialize, Serialize};

use crate::hub::{Event, PresenceKind};

pub const CHAT_TIME_FMT: &str = "%H:%M:%S";
pub const UPLOAD_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMsg {
    SendMessage {
        #[serde(default)]
        user: String,
        #[serde(default)]
        message: String,
    },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMsg {
    ReceiveMessage { user: String, message: String, time: String },
    UserConnected { message: String },
    UserDisconnected { message: String },
    FileUploaded { name: String, size: u64, time: String },
}

impl From<&Event> for ServerMsg {
    fn from(ev: &Event) -> Self {
        match ev {
            Event::Upload(f) => ServerMsg::FileUploaded {
                name: f.name.clone(),
                size: f.size,
                time: f.uploaded_at.format(UPLOAD_TIME_FMT).to_string(),
            },
            Event::Chat { user, message, sent_at } => ServerMsg::ReceiveMessage {
                user: user.clone(),
                message: message.clone(),
                time: sent_at.format(CHAT_TIME_FMT).to_string(),
            },
            Event::Presence { kind: PresenceKind::Connected, .. } => {
                ServerMsg::UserConnected { message: "A user connected".into() }
            }
            Event::Presence { kind: PresenceKind::Disconnected, .. } => {
                ServerMsg::UserDisconnected { message: "A user disconnected".into() }
            }
        }
    }
}

pub fn encode(ev: &Event) -> serde_json::Result<String> {
    serde_json::to_string(&ServerMsg::from(ev))
}

pub fn decode(raw: &str) -> serde_json::Result<ClientMsg> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UploadedFile;
    use chrono::{Local, TimeZone};
    use serde_json::{json, Value};

    #[test]
    fn decode_ignores_client_time() {
        let raw = r#"{"event":"send_message","data":{"user":"alice","message":"hi","time":"01:02:03"}}"#;
        assert_eq!(
            decode(raw).unwrap(),
            ClientMsg::SendMessage { user: "alice".into(), message: "hi".into() }
        );
    }

    #[test]
    fn decode_rejects_unknown_events() {
        assert!(decode(r#"{"event":"drop_tables","data":{}}"#).is_err());
        assert!(decode("plain text").is_err());
    }

    #[test]
    fn encode_shapes() {
        let at = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let upload = Event::Upload(UploadedFile { name: "a.txt".into(), size: 3, uploaded_at: at });
        let chat = Event::Chat { user: "bob".into(), message: "yo".into(), sent_at: at };
        let hello = Event::Presence { kind: PresenceKind::Connected, session_id: uuid::Uuid::nil() };

        let v: Value = serde_json::from_str(&encode(&upload).unwrap()).unwrap();
        assert_eq!(
            v,
            json!({"event":"file_uploaded","data":{"name":"a.txt","size":3,"time":"2024-05-06 07:08:09"}})
        );

        let v: Value = serde_json::from_str(&encode(&chat).unwrap()).unwrap();
        assert_eq!(
            v,
            json!({"event":"receive_message","data":{"user":"bob","message":"yo","time":"07:08:09"}})
        );

        let v: Value = serde_json::from_str(&encode(&hello).unwrap()).unwrap();
        assert_eq!(v, json!({"event":"user_connected","data":{"message":"A user connected"}}));
    }
}
