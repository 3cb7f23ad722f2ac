use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    protocol::{self, ClientMsg},
    session::Lifecycle,
    state::AppState,
};

// 單一 client 寫入卡住多久就放棄
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub fn router() -> Router {
    Router::new().route("/ws", get(ws_handler))
}

async fn ws_handler(ws: WebSocketUpgrade, Extension(st): Extension<AppState>) -> impl IntoResponse {
    let online = st.hub.len().await;
    debug!(online, "ws upgrade");
    ws.on_upgrade(move |sock| user_ws(sock, st.lifecycle))
}

/* ---------------- per user ---------------- */
async fn user_ws(sock: WebSocket, life: Lifecycle) {
    let (session, mut rx) = life.on_connect().await;
    let id = session.id;
    let (mut sink, mut stream) = sock.split();

    // hub → socket；hub 把我們踢掉時 rx 會關閉
    let mut send_task = tokio::spawn(async move {
        while let Some(ev) = rx.recv().await {
            let text = match protocol::encode(&ev) {
                Ok(t) => t,
                Err(e) => {
                    warn!(session = %id, error = %e, "encode failed");
                    continue;
                }
            };
            match tokio::time::timeout(SEND_TIMEOUT, sink.send(Message::Text(text))).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!(session = %id, error = %e, "socket write failed");
                    return;
                }
                Err(_) => {
                    warn!(session = %id, "socket write timed out");
                    return;
                }
            }
        }
        let _ = sink.close().await;
    });

    // socket → hub
    let chat = life.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(raw) => match protocol::decode(&raw) {
                    Ok(ClientMsg::SendMessage { user, message }) => {
                        chat.on_chat_message(id, &user, &message).await;
                    }
                    Err(e) => debug!(session = %id, error = %e, "ignoring frame"),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    life.on_disconnect(id).await;
}
