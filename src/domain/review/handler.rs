use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{ReviewItem, SubmitReviewRequest};
use super::service::ReviewService;
use crate::global::ValidatedJson;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 리뷰 등록 API
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/reviews",
    params(("projectId" = i64, Path, description = "프로젝트 ID")),
    request_body = SubmitReviewRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "리뷰 등록 성공", body = ReviewItem),
        (status = 400, description = "빈 리뷰", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프로젝트", body = ErrorResponse)
    ),
    tag = "Review"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<SubmitReviewRequest>,
) -> Result<Json<BaseResponse<ReviewItem>>, AppError> {
    let author_id = user.user_id()?;
    let review = ReviewService::submit(&state.db, project_id, author_id, &req.content).await?;

    Ok(Json(BaseResponse::success_with_message(
        review,
        "리뷰가 등록되었습니다.",
    )))
}

/// 리뷰 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/reviews",
    params(("projectId" = i64, Path, description = "프로젝트 ID")),
    responses(
        (status = 200, description = "리뷰 조회 성공", body = [ReviewItem])
    ),
    tag = "Review"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<ReviewItem>>>, AppError> {
    let reviews = ReviewService::list_for_project(&state.db, project_id).await?;

    Ok(Json(BaseResponse::success(reviews)))
}
