use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::dto::ReviewItem;
use super::entity::review;
use crate::domain::project::entity::project;
use crate::domain::user::entity::user;
use crate::utils::error::AppError;

pub struct ReviewService;

impl ReviewService {
    /// 리뷰 등록
    pub async fn submit(
        db: &DatabaseConnection,
        project_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<ReviewItem, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::EmptyContent("리뷰 내용을 입력해주세요.".to_string()));
        }

        project::Entity::find_by_id(project_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 프로젝트입니다.".to_string()))?;

        let author = user::Entity::find_by_id(author_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 사용자입니다.".to_string()))?;

        let review_model = review::ActiveModel {
            content: Set(content.to_string()),
            project_id: Set(project_id),
            author_id: Set(author_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let created = review_model.insert(db).await?;
        info!(review_id = created.review_id, project_id, author_id, "review submitted");

        Ok(ReviewItem::new(created, author.username))
    }

    /// 프로젝트의 리뷰 목록 (작성 순)
    pub async fn list_for_project(
        db: &DatabaseConnection,
        project_id: i64,
    ) -> Result<Vec<ReviewItem>, AppError> {
        let rows = review::Entity::find()
            .filter(review::Column::ProjectId.eq(project_id))
            .order_by_asc(review::Column::ReviewId)
            .find_also_related(user::Entity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(review, author)| {
                let username = author.map(|a| a.username).unwrap_or_default();
                ReviewItem::new(review, username)
            })
            .collect())
    }
}
