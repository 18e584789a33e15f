use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity::{chat_room, message};

/// 메시지 표시 시각 형식 (UTC)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 시스템 메시지 발신자 표시 이름
pub const SYSTEM_DISPLAY_NAME: &str = "System";

// ============== 실시간 이벤트 ==============

/// 입장 알림 payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusEvent {
    pub msg: String,
}

impl StatusEvent {
    pub fn joined(display_name: &str) -> Self {
        Self {
            msg: format!("{} has joined the room.", display_name),
        }
    }
}

/// 메시지 전달 payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryEvent {
    pub username: String,
    pub message: String,
    pub timestamp: String,
}

/// 전송 실패 응답 (발신 커넥션에만 전달)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryFailure {
    pub code: String,
    pub reason: String,
}

/// 서버 → 클라이언트 프레임
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Status(StatusEvent),
    ReceiveMessage(DeliveryEvent),
    DeliveryFailed(DeliveryFailure),
}

/// 클라이언트 → 서버 프레임
///
/// 표시 이름은 인증된 사용자에게서 가져오므로 프레임에 포함하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Join { room: String },
    SendMessage { room: String, message: String },
    Leave { room: String },
}

// ============== HTTP ==============

/// 메시지 표시용 projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: i64,
    pub content: String,
    pub sender_id: i64,
    pub sender_display_name: String,
    #[schema(example = "2024-05-01 13:45:00")]
    pub timestamp: String,
    pub is_system_message: bool,
    pub read: bool,
}

impl MessageView {
    /// `sender_username`은 시스템 메시지일 경우 무시된다.
    pub fn render(message: &message::Model, sender_username: &str) -> Self {
        let sender_display_name = if message.is_system_message {
            SYSTEM_DISPLAY_NAME.to_string()
        } else {
            sender_username.to_string()
        };

        Self {
            id: message.message_id,
            content: message.content.clone(),
            sender_id: message.sender_id,
            sender_display_name,
            timestamp: message.created_at.format(TIMESTAMP_FORMAT).to_string(),
            is_system_message: message.is_system_message,
            read: message.read,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomSummary {
    pub chat_room_id: i64,
    pub project_id: i64,
    pub initiator_id: i64,
    pub uploader_id: i64,
    pub channel_name: String,
    pub created_at: String,
}

impl From<chat_room::Model> for ChatRoomSummary {
    fn from(room: chat_room::Model) -> Self {
        Self {
            channel_name: room.channel_name(),
            chat_room_id: room.chat_room_id,
            project_id: room.project_id,
            initiator_id: room.initiator_id,
            uploader_id: room.uploader_id,
            created_at: room.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// 채팅방 화면 응답 (방 정보 + 기존 메시지)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomDetailResponse {
    pub room: ChatRoomSummary,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub updated_count: u64,
}
