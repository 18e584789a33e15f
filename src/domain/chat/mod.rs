//! 1:1 채팅
//!
//! - `service`: 채팅방 조회/생성, 메시지 저장
//! - `hub`, `delivery`: 채널 단위 실시간 전달
//! - `session`, `socket`: WebSocket 커넥션 처리

pub mod delivery;
pub mod dto;
pub mod entity;
pub mod handler;
pub mod hub;
pub mod service;
pub mod session;
pub mod socket;

pub use delivery::{parse_channel, ChatDelivery};
pub use hub::ChatHub;
pub use service::ChatService;
