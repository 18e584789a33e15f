use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::review;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    #[validate(length(max = 2000, message = "리뷰는 2000자를 초과할 수 없습니다."))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub review_id: i64,
    pub content: String,
    pub author_id: i64,
    pub author_username: String,
    pub created_at: String,
}

impl ReviewItem {
    pub fn new(review: review::Model, author_username: String) -> Self {
        Self {
            review_id: review.review_id,
            content: review.content,
            author_id: review.author_id,
            author_username,
            created_at: review.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
