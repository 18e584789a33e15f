use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{
    LoginRequest, LoginResponse, PublicProfileResponse, RegisterRequest, RegisterResponse,
    UpdateBioRequest, UserProfileResponse,
};
use super::service::UserService;
use crate::global::ValidatedJson;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 회원가입 API
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "회원가입 성공", body = RegisterResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 409, description = "아이디/이메일 중복", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<BaseResponse<RegisterResponse>>, AppError> {
    let result = UserService::register(&state.db, req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "회원가입이 완료되었습니다.",
    )))
}

/// 로그인 API
///
/// 아이디/비밀번호를 확인하고 Access Token을 발급합니다.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 401, description = "아이디 또는 비밀번호 불일치", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<BaseResponse<LoginResponse>>, AppError> {
    let result = UserService::login(&state.db, &state.config, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 내 프로필 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/members/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "프로필 조회 성공", body = UserProfileResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 사용자", body = ErrorResponse)
    ),
    tag = "Member"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<BaseResponse<UserProfileResponse>>, AppError> {
    let user_id = user.user_id()?;
    let profile = UserService::get_profile(&state.db, user_id).await?;

    Ok(Json(BaseResponse::success(profile)))
}

/// 소개글 수정 API
#[utoipa::path(
    patch,
    path = "/api/v1/members/me/bio",
    request_body = UpdateBioRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "소개글 수정 성공", body = UserProfileResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Member"
)]
pub async fn update_bio(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateBioRequest>,
) -> Result<Json<BaseResponse<UserProfileResponse>>, AppError> {
    let user_id = user.user_id()?;
    let profile = UserService::update_bio(&state.db, user_id, req.bio).await?;

    Ok(Json(BaseResponse::success_with_message(
        profile,
        "프로필이 수정되었습니다.",
    )))
}

/// 업로더 공개 프로필 API
#[utoipa::path(
    get,
    path = "/api/v1/members/{userId}",
    params(("userId" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "프로필 조회 성공", body = PublicProfileResponse),
        (status = 404, description = "존재하지 않는 사용자", body = ErrorResponse)
    ),
    tag = "Member"
)]
pub async fn public_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<BaseResponse<PublicProfileResponse>>, AppError> {
    let profile = UserService::public_profile(&state.db, user_id).await?;

    Ok(Json(BaseResponse::success(profile)))
}
