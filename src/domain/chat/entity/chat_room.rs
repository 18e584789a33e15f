use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat_room")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub chat_room_id: i64,
    pub project_id: i64,
    /// 대화를 시작한 사용자
    pub initiator_id: i64,
    /// 프로젝트 업로더
    pub uploader_id: i64,
    /// min(initiator_id, uploader_id)
    pub participant_low: i64,
    /// max(initiator_id, uploader_id)
    pub participant_high: i64,
    pub is_private: bool,
    pub created_at: DateTime,
}

impl Model {
    /// 실시간 전송 채널 이름
    ///
    /// 비공개 방은 참여자 쌍 `"<작은 id>_<큰 id>"`로, 양쪽이 조회 없이 같은 이름을 계산할 수 있다.
    pub fn channel_name(&self) -> String {
        if self.is_private {
            private_channel_name(self.participant_low, self.participant_high)
        } else {
            format!("room_{}", self.chat_room_id)
        }
    }

    pub fn has_participant(&self, user_id: i64) -> bool {
        self.participant_low == user_id || self.participant_high == user_id
    }
}

/// 참여자 순서와 무관한 채널 이름
pub fn private_channel_name(a: i64, b: i64) -> String {
    format!("{}_{}", a.min(b), a.max(b))
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message::Entity")]
    Message,
    #[sea_orm(
        belongs_to = "crate::domain::user::entity::user::Entity",
        from = "Column::InitiatorId",
        fk_name = "fk_chat_room_initiator",
        to = "crate::domain::user::entity::user::Column::UserId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Initiator,
    #[sea_orm(
        belongs_to = "crate::domain::user::entity::user::Entity",
        from = "Column::UploaderId",
        fk_name = "fk_chat_room_uploader",
        to = "crate::domain::user::entity::user::Column::UserId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Uploader,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Message.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
