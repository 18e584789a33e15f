use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::user;
use crate::domain::project::dto::ProjectItem;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150, message = "아이디는 3~150자여야 합니다."))]
    pub username: String,

    #[validate(email(message = "유효한 이메일 형식이 아닙니다."))]
    pub email: String,

    #[validate(length(min = 8, max = 150, message = "비밀번호는 8~150자여야 합니다."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "아이디를 입력해주세요."))]
    pub username: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub access_token: String,
}

/// 내 프로필
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub rating: Option<f64>,
    pub is_admin: bool,
}

impl From<user::Model> for UserProfileResponse {
    fn from(user: user::Model) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            rating: user.rating,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBioRequest {
    #[validate(length(max = 1000, message = "소개는 1000자를 초과할 수 없습니다."))]
    pub bio: String,
}

/// 업로더 공개 프로필 (로그인 불필요)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub user_id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub rating: Option<f64>,
    pub projects: Vec<ProjectItem>,
}
