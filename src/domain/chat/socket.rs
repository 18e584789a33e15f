use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, Instrument};

use super::dto::{ClientEvent, ServerEvent};
use super::session::ChatSession;
use crate::domain::user::service::UserService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;

/// 실시간 채팅 WebSocket
///
/// 표시 이름은 토큰의 사용자 id로 조회한 username을 사용한다.
pub async fn chat_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let user_id = user.user_id()?;
    let account = UserService::find(&state.db, user_id)
        .await
        .map_err(|_| AppError::Unauthorized("유효하지 않은 사용자입니다.".to_string()))?;

    let span = tracing::info_span!("chat_socket", user_id, username = %account.username);
    Ok(ws.on_upgrade(move |socket| {
        run_socket(socket, state, account.user_id, account.username).instrument(span)
    }))
}

async fn run_socket(socket: WebSocket, state: AppState, user_id: i64, username: String) {
    info!("chat connection opened");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(state.config.chat_channel_capacity);

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to serialize chat event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    let mut session = ChatSession::new(state, user_id, username, tx);

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => session.handle(event).await,
                Err(e) => {
                    session
                        .reject(AppError::BadRequest(format!("잘못된 메시지 형식입니다: {}", e)))
                        .await
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("chat connection error: {}", e);
                break;
            }
        }
    }

    session.close().await;
    let _ = writer.await;

    info!("chat connection closed");
}
