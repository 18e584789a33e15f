use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::jwt::{decode_access_token, Claims};

/// WebSocket 핸드셰이크는 헤더를 지정할 수 없는 클라이언트가 있어 쿼리 파라미터도 허용
const TOKEN_QUERY_KEY: &str = "token";

/// 인증된 사용자 정보를 담는 Extractor
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// JWT Claims에서 사용자 ID를 추출합니다.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("유효하지 않은 사용자 ID입니다.".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. Authorization 헤더에서 토큰 추출 시도
        let token = if let Some(auth_header) = parts.headers.get(AUTHORIZATION) {
            let auth_header_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("잘못된 헤더 형식입니다.".to_string()))?;

            auth_header_str
                .strip_prefix("Bearer ")
                .ok_or_else(|| {
                    AppError::Unauthorized("토큰 형식이 올바르지 않습니다.".to_string())
                })?
                .to_string()
        } else {
            // 2. 쿼리 파라미터에서 토큰 추출 시도
            extract_token_from_query(parts)?
        };

        let claims = decode_access_token(&token, &state.config.jwt_secret)?;

        Ok(AuthUser(claims))
    }
}

/// `?token=...` 쿼리에서 access token 추출
fn extract_token_from_query(parts: &Parts) -> Result<String, AppError> {
    let query = parts
        .uri
        .query()
        .ok_or_else(|| AppError::Unauthorized("로그인이 필요합니다.".to_string()))?;

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, value)| *key == TOKEN_QUERY_KEY && !value.is_empty())
        .map(|(_, value)| value.to_string())
        .ok_or_else(|| AppError::Unauthorized("로그인이 필요합니다.".to_string()))
}
