use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, Set, SqlErr,
};
use tracing::info;

use super::dto::{
    LoginRequest, LoginResponse, PublicProfileResponse, RegisterRequest, RegisterResponse,
    UserProfileResponse,
};
use super::entity::user;
use crate::config::AppConfig;
use crate::domain::project::dto::ProjectItem;
use crate::domain::project::service::ProjectService;
use crate::utils::error::AppError;
use crate::utils::jwt::encode_token;
use crate::utils::password::{hash_password, verify_password};

pub struct UserService;

impl UserService {
    /// 회원가입
    pub async fn register(
        db: &DatabaseConnection,
        req: RegisterRequest,
    ) -> Result<RegisterResponse, AppError> {
        // 1. 아이디/이메일 중복 확인
        let existing = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(&req.username))
                    .add(user::Column::Email.eq(&req.email)),
            )
            .one(db)
            .await?;

        if existing.is_some() {
            return Err(Self::duplicate_account());
        }

        // 2. 저장
        let now = Utc::now().naive_utc();
        let user_model = user::ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(hash_password(&req.password)?),
            bio: Set(None),
            rating: Set(None),
            is_admin: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = user_model.insert(db).await.map_err(|e| {
            // 동시 가입으로 유니크 제약에 걸린 경우
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Self::duplicate_account(),
                _ => e.into(),
            }
        })?;

        info!(user_id = created.user_id, "user registered");

        Ok(RegisterResponse {
            user_id: created.user_id,
            username: created.username,
        })
    }

    fn duplicate_account() -> AppError {
        AppError::Conflict("이미 사용 중인 아이디 또는 이메일입니다.".to_string())
    }

    /// 아이디/비밀번호 로그인
    pub async fn login(
        db: &DatabaseConnection,
        config: &AppConfig,
        req: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let invalid = || AppError::Unauthorized("아이디 또는 비밀번호가 올바르지 않습니다.".into());

        let account = Self::find_by_username(db, &req.username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&req.password, &account.password_hash) {
            return Err(invalid());
        }

        let access_token =
            encode_token(account.user_id, &config.jwt_secret, config.jwt_expiration)?;

        Ok(LoginResponse {
            user_id: account.user_id,
            username: account.username,
            access_token,
        })
    }

    pub async fn find(db: &DatabaseConnection, user_id: i64) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("존재하지 않는 사용자입니다.".to_string()))
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?)
    }

    pub async fn get_profile(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<UserProfileResponse, AppError> {
        Ok(Self::find(db, user_id).await?.into())
    }

    /// 소개글 수정 (아이디는 변경 불가)
    pub async fn update_bio(
        db: &DatabaseConnection,
        caller_id: i64,
        bio: String,
    ) -> Result<UserProfileResponse, AppError> {
        let mut account = Self::find(db, caller_id).await?.into_active_model();
        account.bio = Set(Some(bio));
        account.updated_at = Set(Utc::now().naive_utc());

        Ok(account.update(db).await?.into())
    }

    pub async fn public_profile(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<PublicProfileResponse, AppError> {
        let account = Self::find(db, user_id).await?;
        let projects = ProjectService::list_by_owner(db, user_id).await?;

        Ok(PublicProfileResponse {
            user_id: account.user_id,
            username: account.username,
            bio: account.bio,
            rating: account.rating,
            projects: projects.into_iter().map(ProjectItem::from).collect(),
        })
    }
}
