use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{ChatRoomDetailResponse, ChatRoomSummary, MarkReadResponse, MessageView};
use super::entity::chat_room;
use super::service::ChatService;
use crate::domain::project::service::ProjectService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

async fn room_detail(
    state: &AppState,
    room: chat_room::Model,
) -> Result<ChatRoomDetailResponse, AppError> {
    let messages = ChatService::list_for_room(&state.db, room.chat_room_id).await?;
    let messages = ChatService::render_messages(&state.db, &messages).await?;

    Ok(ChatRoomDetailResponse {
        room: ChatRoomSummary::from(room),
        messages,
    })
}

/// 업로더와 채팅 시작 API
///
/// 프로젝트 업로더와의 1:1 채팅방을 조회하거나 최초 접촉 시 생성합니다.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chat",
    params(("projectId" = i64, Path, description = "프로젝트 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "채팅방 조회/생성 성공", body = ChatRoomDetailResponse),
        (status = 400, description = "자기 자신과의 채팅", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프로젝트", body = ErrorResponse)
    ),
    tag = "Chat"
)]
pub async fn open_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<BaseResponse<ChatRoomDetailResponse>>, AppError> {
    let caller_id = user.user_id()?;
    let project = ProjectService::find(&state.db, project_id).await?;

    let room =
        ChatService::resolve_or_create(&state.db, project_id, caller_id, project.owner_id).await?;
    let detail = room_detail(&state, room).await?;

    Ok(Json(BaseResponse::success(detail)))
}

/// 업로더용 채팅방 입장 API
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/chat-rooms/{chatRoomId}",
    params(
        ("projectId" = i64, Path, description = "프로젝트 ID"),
        ("chatRoomId" = i64, Path, description = "채팅방 ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "채팅방 조회 성공", body = ChatRoomDetailResponse),
        (status = 403, description = "업로더가 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프로젝트/채팅방", body = ErrorResponse)
    ),
    tag = "Chat"
)]
pub async fn uploader_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, chat_room_id)): Path<(i64, i64)>,
) -> Result<Json<BaseResponse<ChatRoomDetailResponse>>, AppError> {
    let caller_id = user.user_id()?;
    let room =
        ChatService::room_for_uploader(&state.db, project_id, chat_room_id, caller_id).await?;
    let detail = room_detail(&state, room).await?;

    Ok(Json(BaseResponse::success(detail)))
}

/// 채팅방 메시지 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/chat-rooms/{chatRoomId}/messages",
    params(("chatRoomId" = i64, Path, description = "채팅방 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "메시지 조회 성공", body = [MessageView]),
        (status = 403, description = "참여자가 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 채팅방", body = ErrorResponse)
    ),
    tag = "Chat"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(chat_room_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<MessageView>>>, AppError> {
    let caller_id = user.user_id()?;
    let room = ChatService::get_room_for_participant(&state.db, chat_room_id, caller_id).await?;

    let messages = ChatService::list_for_room(&state.db, room.chat_room_id).await?;
    let views = ChatService::render_messages(&state.db, &messages).await?;

    Ok(Json(BaseResponse::success(views)))
}

/// 메시지 읽음 처리 API
///
/// 상대방이 보낸 읽지 않은 메시지를 모두 읽음으로 표시합니다.
#[utoipa::path(
    post,
    path = "/api/v1/chat-rooms/{chatRoomId}/read",
    params(("chatRoomId" = i64, Path, description = "채팅방 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "읽음 처리 성공", body = MarkReadResponse),
        (status = 403, description = "참여자가 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 채팅방", body = ErrorResponse)
    ),
    tag = "Chat"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(chat_room_id): Path<i64>,
) -> Result<Json<BaseResponse<MarkReadResponse>>, AppError> {
    let caller_id = user.user_id()?;
    let room = ChatService::get_room_for_participant(&state.db, chat_room_id, caller_id).await?;

    let updated_count = ChatService::mark_read(&state.db, room.chat_room_id, caller_id).await?;

    Ok(Json(BaseResponse::success(MarkReadResponse { updated_count })))
}
