use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    CreateProjectRequest, DeleteProjectResponse, ProjectDetailResponse, ProjectItem,
    RoomTypeFilter,
};
use super::service::ProjectService;
use crate::global::ValidatedJson;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 프로젝트 등록 API
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProjectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "프로젝트 등록 성공", body = ProjectItem),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Project"
)]
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> Result<Json<BaseResponse<ProjectItem>>, AppError> {
    let owner_id = user.user_id()?;
    let created = ProjectService::create(&state.db, owner_id, req).await?;

    Ok(Json(BaseResponse::success_with_message(
        created.into(),
        "프로젝트가 등록되었습니다.",
    )))
}

/// 프로젝트 목록 API (방 종류 필터)
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    params(RoomTypeFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "목록 조회 성공", body = [ProjectItem]),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Project"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<RoomTypeFilter>,
) -> Result<Json<BaseResponse<Vec<ProjectItem>>>, AppError> {
    let projects = ProjectService::filter(&state.db, &filter.room_types()).await?;

    Ok(Json(BaseResponse::success(
        projects.into_iter().map(ProjectItem::from).collect(),
    )))
}

/// 추천 피드 API
///
/// 필터 조건에 맞는 프로젝트 중 최대 10개를 무작위로 반환합니다.
#[utoipa::path(
    get,
    path = "/api/v1/projects/discover",
    params(RoomTypeFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "추천 조회 성공", body = [ProjectItem]),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Project"
)]
pub async fn discover_projects(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<RoomTypeFilter>,
) -> Result<Json<BaseResponse<Vec<ProjectItem>>>, AppError> {
    let projects = ProjectService::discover(&state.db, &filter.room_types()).await?;

    Ok(Json(BaseResponse::success(projects)))
}

/// 프로젝트 상세 API
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}",
    params(("projectId" = i64, Path, description = "프로젝트 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "상세 조회 성공", body = ProjectDetailResponse),
        (status = 404, description = "존재하지 않는 프로젝트", body = ErrorResponse)
    ),
    tag = "Project"
)]
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<BaseResponse<ProjectDetailResponse>>, AppError> {
    let caller_id = user.user_id()?;
    let detail = ProjectService::detail(&state.db, caller_id, project_id).await?;

    Ok(Json(BaseResponse::success(detail)))
}

/// 프로젝트 삭제 API
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{projectId}",
    params(("projectId" = i64, Path, description = "프로젝트 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공", body = DeleteProjectResponse),
        (status = 403, description = "본인 프로젝트가 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프로젝트", body = ErrorResponse)
    ),
    tag = "Project"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<BaseResponse<DeleteProjectResponse>>, AppError> {
    let caller_id = user.user_id()?;
    ProjectService::delete(&state.db, caller_id, project_id).await?;

    Ok(Json(BaseResponse::success_with_message(
        DeleteProjectResponse { project_id },
        "프로젝트가 삭제되었습니다.",
    )))
}
