use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entity::project;
use crate::domain::chat::dto::ChatRoomSummary;
use crate::domain::review::dto::ReviewItem;

/// 추천 피드 최대 개수
pub const DISCOVER_LIMIT: usize = 10;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 100, message = "프로젝트 이름은 1~100자여야 합니다."))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "가격은 0 이상이어야 합니다."))]
    pub price: f64,

    /// 업로드 처리 후 저장된 이미지 경로
    #[validate(length(max = 255, message = "이미지 경로는 255자를 초과할 수 없습니다."))]
    pub image_path: Option<String>,

    #[validate(length(min = 1, max = 50, message = "방 종류는 1~50자여야 합니다."))]
    pub room_type: String,
}

/// 방 종류 필터 (`?roomTypes=Kitchen,Bedroom`)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RoomTypeFilter {
    /// 쉼표로 구분한 방 종류. 비어 있으면 전체
    pub room_types: Option<String>,
}

impl RoomTypeFilter {
    pub fn room_types(&self) -> Vec<String> {
        self.room_types
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_path: Option<String>,
    pub room_type: String,
    pub owner_id: i64,
}

impl From<project::Model> for ProjectItem {
    fn from(model: project::Model) -> Self {
        Self {
            project_id: model.project_id,
            name: model.name,
            description: model.description,
            price: model.price,
            image_path: model.image_path,
            room_type: model.room_type,
            owner_id: model.owner_id,
        }
    }
}

/// 프로젝트 상세
///
/// `chat_rooms`는 조회자가 업로더일 때만 채워진다.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailResponse {
    pub project: ProjectItem,
    pub reviews: Vec<ReviewItem>,
    pub is_owner: bool,
    pub chat_rooms: Vec<ChatRoomSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectResponse {
    pub project_id: i64,
}
