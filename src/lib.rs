pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod utils;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::{chat, health, project, review, user};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handler::health_check,
        user::handler::register,
        user::handler::login,
        user::handler::get_profile,
        user::handler::update_bio,
        user::handler::public_profile,
        project::handler::create_project,
        project::handler::list_projects,
        project::handler::discover_projects,
        project::handler::get_project,
        project::handler::delete_project,
        review::handler::submit_review,
        review::handler::list_reviews,
        chat::handler::open_chat,
        chat::handler::uploader_chat,
        chat::handler::list_messages,
        chat::handler::mark_read,
    ),
    components(
        schemas(
            health::dto::HealthStatus,
            health::dto::HealthState,
            health::dto::DatabaseCheck,
            health::dto::ChatCheck,
            user::dto::RegisterRequest,
            user::dto::RegisterResponse,
            user::dto::LoginRequest,
            user::dto::LoginResponse,
            user::dto::UserProfileResponse,
            user::dto::UpdateBioRequest,
            user::dto::PublicProfileResponse,
            project::dto::CreateProjectRequest,
            project::dto::ProjectItem,
            project::dto::ProjectDetailResponse,
            project::dto::DeleteProjectResponse,
            review::dto::SubmitReviewRequest,
            review::dto::ReviewItem,
            chat::dto::MessageView,
            chat::dto::ChatRoomSummary,
            chat::dto::ChatRoomDetailResponse,
            chat::dto::MarkReadResponse,
            chat::dto::StatusEvent,
            chat::dto::DeliveryEvent,
            chat::dto::DeliveryFailure,
            utils::response::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "헬스체크 API"),
        (name = "Auth", description = "회원가입/로그인 API"),
        (name = "Member", description = "회원 프로필 API"),
        (name = "Project", description = "프로젝트 API"),
        (name = "Review", description = "리뷰 API"),
        (name = "Chat", description = "1:1 채팅 API")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        // 회원
        .route("/api/v1/auth/register", post(user::handler::register))
        .route("/api/v1/auth/login", post(user::handler::login))
        .route("/api/v1/members/me", get(user::handler::get_profile))
        .route("/api/v1/members/me/bio", patch(user::handler::update_bio))
        .route("/api/v1/members/:user_id", get(user::handler::public_profile))
        // 프로젝트
        .route(
            "/api/v1/projects",
            post(project::handler::create_project).get(project::handler::list_projects),
        )
        .route(
            "/api/v1/projects/discover",
            get(project::handler::discover_projects),
        )
        .route(
            "/api/v1/projects/:project_id",
            get(project::handler::get_project).delete(project::handler::delete_project),
        )
        // 리뷰
        .route(
            "/api/v1/projects/:project_id/reviews",
            post(review::handler::submit_review).get(review::handler::list_reviews),
        )
        // 채팅
        .route(
            "/api/v1/projects/:project_id/chat",
            post(chat::handler::open_chat),
        )
        .route(
            "/api/v1/projects/:project_id/chat-rooms/:chat_room_id",
            get(chat::handler::uploader_chat),
        )
        .route(
            "/api/v1/chat-rooms/:chat_room_id/messages",
            get(chat::handler::list_messages),
        )
        .route(
            "/api/v1/chat-rooms/:chat_room_id/read",
            post(chat::handler::mark_read),
        )
        .route("/ws/chat", get(chat::socket::chat_socket));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::handler::health_check))
        .merge(api)
        .layer(middleware::from_fn(global::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
