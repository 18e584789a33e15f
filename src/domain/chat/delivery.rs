use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::dto::{DeliveryEvent, ServerEvent, TIMESTAMP_FORMAT};
use super::entity::chat_room::private_channel_name;
use super::hub::ChatHub;
use super::service::ChatService;
use crate::domain::user::entity::user;
use crate::utils::error::AppError;

/// `"<작은 id>_<큰 id>"` 채널 이름을 두 사용자 id로 분해
///
/// 허브는 채널 이름 문자열을 키로 쓰므로 `"9_3"`, `"+3_9"`, `"03_9"` 같은 별칭은 거부한다.
pub fn parse_channel(channel: &str) -> Result<(i64, i64), AppError> {
    let malformed = || AppError::MalformedChannel(format!("잘못된 채널 이름입니다: {}", channel));

    let (a, b) = channel.split_once('_').ok_or_else(malformed)?;
    let a = a.parse::<i64>().map_err(|_| malformed())?;
    let b = b.parse::<i64>().map_err(|_| malformed())?;

    if a >= b || private_channel_name(a, b) != channel {
        return Err(malformed());
    }

    Ok((a, b))
}

/// 실시간 전달: 채널 입장과 메시지 전송
pub struct ChatDelivery;

impl ChatDelivery {
    pub async fn join(
        hub: &ChatHub,
        channel: &str,
        display_name: &str,
    ) -> broadcast::Receiver<ServerEvent> {
        hub.join(channel, display_name).await
    }

    /// 메시지를 저장하고 채널 구독자 전체에 브로드캐스트
    ///
    /// 실패는 발신자에게 그대로 반환된다. 브로드캐스트는 저장이 끝난 뒤에만 일어난다.
    pub async fn send(
        db: &DatabaseConnection,
        hub: &ChatHub,
        channel: &str,
        sender_display_name: &str,
        content: &str,
    ) -> Result<DeliveryEvent, AppError> {
        let result = Self::persist(db, channel, sender_display_name, content).await;

        let event = match result {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    channel,
                    sender = sender_display_name,
                    code = %e.error_code(),
                    "chat delivery rejected: {}",
                    e
                );
                return Err(e);
            }
        };

        let delivered = hub
            .publish(channel, ServerEvent::ReceiveMessage(event.clone()))
            .await;
        info!(channel, sender = sender_display_name, delivered, "chat message delivered");

        Ok(event)
    }

    async fn persist(
        db: &DatabaseConnection,
        channel: &str,
        sender_display_name: &str,
        content: &str,
    ) -> Result<DeliveryEvent, AppError> {
        let (a, b) = parse_channel(channel)?;

        let sender = user::Entity::find()
            .filter(user::Column::Username.eq(sender_display_name))
            .one(db)
            .await?
            .ok_or_else(|| {
                AppError::UnknownSender(format!(
                    "존재하지 않는 사용자입니다: {}",
                    sender_display_name
                ))
            })?;

        let room = ChatService::find_by_pair(db, a, b)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 채팅방입니다.".to_string()))?;

        if !room.has_participant(sender.user_id) {
            return Err(AppError::Forbidden(
                "채팅방 참여자만 메시지를 보낼 수 있습니다.".to_string(),
            ));
        }

        let message = ChatService::append(db, room.chat_room_id, sender.user_id, content).await?;

        Ok(DeliveryEvent {
            username: sender_display_name.to_string(),
            message: message.content,
            timestamp: message.created_at.format(TIMESTAMP_FORMAT).to_string(),
        })
    }
}
