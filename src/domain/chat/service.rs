use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::{info, warn};

use super::dto::MessageView;
use super::entity::{chat_room, message};
use crate::domain::project::entity::project;
use crate::domain::user::entity::user;
use crate::utils::error::AppError;

pub struct ChatService;

impl ChatService {
    // ============== 채팅방 ==============

    /// (프로젝트, 시작 사용자, 업로더)에 해당하는 채팅방을 조회하거나 생성
    ///
    /// 참여자 쌍은 순서와 무관하게 같은 방으로 매핑된다. 동시에 최초 접촉이 일어나도
    /// `(project_id, participant_low, participant_high)` 유니크 인덱스에 막혀 방은 하나만 생긴다.
    pub async fn resolve_or_create(
        db: &DatabaseConnection,
        project_id: i64,
        initiator_id: i64,
        uploader_id: i64,
    ) -> Result<chat_room::Model, AppError> {
        if initiator_id == uploader_id {
            return Err(AppError::InvalidParticipants(
                "자기 자신과는 채팅할 수 없습니다.".to_string(),
            ));
        }

        project::Entity::find_by_id(project_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 프로젝트입니다.".to_string()))?;

        let (low, high) = (initiator_id.min(uploader_id), initiator_id.max(uploader_id));

        if let Some(room) = Self::find_room(db, project_id, low, high).await? {
            return Ok(room);
        }

        let room_model = chat_room::ActiveModel {
            project_id: Set(project_id),
            initiator_id: Set(initiator_id),
            uploader_id: Set(uploader_id),
            participant_low: Set(low),
            participant_high: Set(high),
            is_private: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        match room_model.insert(db).await {
            Ok(room) => {
                info!(
                    chat_room_id = room.chat_room_id,
                    project_id, initiator_id, uploader_id, "chat room created"
                );
                Ok(room)
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                // 상대방 요청이 먼저 방을 만든 경우
                warn!(project_id, low, high, "chat room creation raced, reusing existing room");
                Self::find_room(db, project_id, low, high)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError("채팅방 생성 충돌 후 조회에 실패했습니다.".into())
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_room(
        db: &DatabaseConnection,
        project_id: i64,
        low: i64,
        high: i64,
    ) -> Result<Option<chat_room::Model>, AppError> {
        Ok(chat_room::Entity::find()
            .filter(chat_room::Column::ProjectId.eq(project_id))
            .filter(chat_room::Column::ParticipantLow.eq(low))
            .filter(chat_room::Column::ParticipantHigh.eq(high))
            .one(db)
            .await?)
    }

    /// 채널 이름의 두 id로 채팅방 조회
    ///
    /// 채널 이름에는 프로젝트가 없으므로 같은 쌍의 방이 여럿이면 가장 먼저 만든 방을 쓴다.
    pub async fn find_by_pair(
        db: &DatabaseConnection,
        a: i64,
        b: i64,
    ) -> Result<Option<chat_room::Model>, AppError> {
        Ok(chat_room::Entity::find()
            .filter(chat_room::Column::ParticipantLow.eq(a.min(b)))
            .filter(chat_room::Column::ParticipantHigh.eq(a.max(b)))
            .order_by_asc(chat_room::Column::ChatRoomId)
            .one(db)
            .await?)
    }

    pub async fn get_room(
        db: &DatabaseConnection,
        chat_room_id: i64,
    ) -> Result<chat_room::Model, AppError> {
        chat_room::Entity::find_by_id(chat_room_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 채팅방입니다.".to_string()))
    }

    /// 참여자만 접근 가능한 채팅방 조회
    pub async fn get_room_for_participant(
        db: &DatabaseConnection,
        chat_room_id: i64,
        caller_id: i64,
    ) -> Result<chat_room::Model, AppError> {
        let room = Self::get_room(db, chat_room_id).await?;
        if !room.has_participant(caller_id) {
            return Err(AppError::Forbidden(
                "채팅방 참여자만 접근할 수 있습니다.".to_string(),
            ));
        }
        Ok(room)
    }

    /// 업로더 본인 프로젝트의 채팅방 목록
    pub async fn rooms_for_uploader(
        db: &DatabaseConnection,
        project_id: i64,
        uploader_id: i64,
    ) -> Result<Vec<chat_room::Model>, AppError> {
        Ok(chat_room::Entity::find()
            .filter(chat_room::Column::ProjectId.eq(project_id))
            .filter(chat_room::Column::UploaderId.eq(uploader_id))
            .order_by_asc(chat_room::Column::ChatRoomId)
            .all(db)
            .await?)
    }

    /// 업로더가 기존 채팅방에 입장
    pub async fn room_for_uploader(
        db: &DatabaseConnection,
        project_id: i64,
        chat_room_id: i64,
        caller_id: i64,
    ) -> Result<chat_room::Model, AppError> {
        let project = project::Entity::find_by_id(project_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 프로젝트입니다.".to_string()))?;

        if project.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "이 채팅방에 접근할 권한이 없습니다.".to_string(),
            ));
        }

        chat_room::Entity::find_by_id(chat_room_id)
            .filter(chat_room::Column::ProjectId.eq(project_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 채팅방입니다.".to_string()))
    }

    // ============== 메시지 ==============

    /// 메시지 저장 (읽지 않음, 일반 메시지)
    pub async fn append(
        db: &DatabaseConnection,
        chat_room_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<message::Model, AppError> {
        Self::insert_message(db, chat_room_id, sender_id, content, false).await
    }

    /// 시스템 메시지 저장. 발신자 컬럼은 방의 업로더로 채운다.
    pub async fn append_system(
        db: &DatabaseConnection,
        chat_room_id: i64,
        content: &str,
    ) -> Result<message::Model, AppError> {
        let room = Self::get_room(db, chat_room_id).await?;
        Self::insert_message(db, chat_room_id, room.uploader_id, content, true).await
    }

    async fn insert_message(
        db: &DatabaseConnection,
        chat_room_id: i64,
        sender_id: i64,
        content: &str,
        is_system_message: bool,
    ) -> Result<message::Model, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::EmptyContent(
                "메시지 내용을 입력해주세요.".to_string(),
            ));
        }

        chat_room::Entity::find_by_id(chat_room_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 채팅방입니다.".to_string()))?;

        let message_model = message::ActiveModel {
            content: Set(content.to_string()),
            chat_room_id: Set(chat_room_id),
            sender_id: Set(sender_id),
            created_at: Set(Utc::now().naive_utc()),
            is_system_message: Set(is_system_message),
            read: Set(false),
            ..Default::default()
        };

        Ok(message_model.insert(db).await?)
    }

    /// 채팅방의 전체 메시지 (저장 순서)
    pub async fn list_for_room(
        db: &DatabaseConnection,
        chat_room_id: i64,
    ) -> Result<Vec<message::Model>, AppError> {
        // TODO: 메시지가 많은 방은 커서 기반 페이지네이션 필요
        Ok(message::Entity::find()
            .filter(message::Column::ChatRoomId.eq(chat_room_id))
            .order_by_asc(message::Column::MessageId)
            .all(db)
            .await?)
    }

    /// 상대방이 보낸 읽지 않은 메시지를 읽음 처리. 변경된 건수를 반환한다.
    pub async fn mark_read(
        db: &DatabaseConnection,
        chat_room_id: i64,
        reader_id: i64,
    ) -> Result<u64, AppError> {
        let result = message::Entity::update_many()
            .col_expr(message::Column::Read, Expr::value(true))
            .filter(message::Column::ChatRoomId.eq(chat_room_id))
            .filter(message::Column::SenderId.ne(reader_id))
            .filter(message::Column::Read.eq(false))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }

    /// 발신자 이름을 채워 표시용으로 변환
    pub async fn render_messages(
        db: &DatabaseConnection,
        messages: &[message::Model],
    ) -> Result<Vec<MessageView>, AppError> {
        let mut sender_ids: Vec<i64> = messages.iter().map(|m| m.sender_id).collect();
        sender_ids.sort_unstable();
        sender_ids.dedup();

        let usernames: HashMap<i64, String> = if sender_ids.is_empty() {
            HashMap::new()
        } else {
            user::Entity::find()
                .filter(user::Column::UserId.is_in(sender_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|u| (u.user_id, u.username))
                .collect()
        };

        Ok(messages
            .iter()
            .map(|m| {
                let name = usernames
                    .get(&m.sender_id)
                    .map(String::as_str)
                    .unwrap_or_default();
                MessageView::render(m, name)
            })
            .collect())
    }
}
