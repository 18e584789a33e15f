use chrono::Utc;
use rand::seq::SliceRandom;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::dto::{CreateProjectRequest, ProjectDetailResponse, ProjectItem, DISCOVER_LIMIT};
use super::entity::project;
use crate::domain::chat::dto::ChatRoomSummary;
use crate::domain::chat::service::ChatService;
use crate::domain::review::service::ReviewService;
use crate::utils::error::AppError;

pub struct ProjectService;

impl ProjectService {
    /// 프로젝트 등록
    pub async fn create(
        db: &DatabaseConnection,
        owner_id: i64,
        req: CreateProjectRequest,
    ) -> Result<project::Model, AppError> {
        let project_model = project::ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            price: Set(req.price),
            image_path: Set(req.image_path),
            room_type: Set(req.room_type),
            owner_id: Set(owner_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let created = project_model.insert(db).await?;
        info!(project_id = created.project_id, owner_id, "project created");

        Ok(created)
    }

    pub async fn find(
        db: &DatabaseConnection,
        project_id: i64,
    ) -> Result<project::Model, AppError> {
        project::Entity::find_by_id(project_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 프로젝트입니다.".to_string()))
    }

    /// 프로젝트 상세 (리뷰 + 업로더 본인일 경우 채팅방 목록)
    pub async fn detail(
        db: &DatabaseConnection,
        caller_id: i64,
        project_id: i64,
    ) -> Result<ProjectDetailResponse, AppError> {
        let project = Self::find(db, project_id).await?;
        let reviews = ReviewService::list_for_project(db, project_id).await?;

        let is_owner = project.owner_id == caller_id;
        let chat_rooms = if is_owner {
            ChatService::rooms_for_uploader(db, project_id, caller_id)
                .await?
                .into_iter()
                .map(ChatRoomSummary::from)
                .collect()
        } else {
            Vec::new()
        };

        Ok(ProjectDetailResponse {
            project: project.into(),
            reviews,
            is_owner,
            chat_rooms,
        })
    }

    pub async fn list_by_owner(
        db: &DatabaseConnection,
        owner_id: i64,
    ) -> Result<Vec<project::Model>, AppError> {
        Ok(project::Entity::find()
            .filter(project::Column::OwnerId.eq(owner_id))
            .order_by_asc(project::Column::ProjectId)
            .all(db)
            .await?)
    }

    /// 방 종류 필터 (정확히 일치, 비어 있으면 전체)
    pub async fn filter(
        db: &DatabaseConnection,
        room_types: &[String],
    ) -> Result<Vec<project::Model>, AppError> {
        let mut query = project::Entity::find();
        if !room_types.is_empty() {
            query = query.filter(project::Column::RoomType.is_in(room_types.iter().cloned()));
        }

        Ok(query
            .order_by_asc(project::Column::ProjectId)
            .all(db)
            .await?)
    }

    /// 필터링된 프로젝트 중 최대 10개를 무작위(비복원)로 추출
    pub async fn discover(
        db: &DatabaseConnection,
        room_types: &[String],
    ) -> Result<Vec<ProjectItem>, AppError> {
        let candidates = Self::filter(db, room_types).await?;
        Ok(sample(candidates, DISCOVER_LIMIT)
            .into_iter()
            .map(ProjectItem::from)
            .collect())
    }

    /// 업로더 본인만 삭제 가능
    ///
    /// 리뷰와 채팅방은 함께 삭제하지 않는다. 남은 채팅방마다 삭제 안내 시스템 메시지를 남긴다.
    pub async fn delete(
        db: &DatabaseConnection,
        caller_id: i64,
        project_id: i64,
    ) -> Result<(), AppError> {
        let project = Self::find(db, project_id).await?;

        if project.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "본인이 등록한 프로젝트만 삭제할 수 있습니다.".to_string(),
            ));
        }

        let rooms = ChatService::rooms_for_uploader(db, project_id, caller_id).await?;

        project::Entity::delete_by_id(project_id).exec(db).await?;
        info!(project_id, owner_id = caller_id, "project deleted");

        let notice = format!("'{}' 프로젝트가 삭제되었습니다.", project.name);
        for room in &rooms {
            ChatService::append_system(db, room.chat_room_id, &notice).await?;
        }

        Ok(())
    }
}

fn sample(candidates: Vec<project::Model>, limit: usize) -> Vec<project::Model> {
    let mut rng = rand::thread_rng();
    candidates
        .choose_multiple(&mut rng, limit.min(candidates.len()))
        .cloned()
        .collect()
}
