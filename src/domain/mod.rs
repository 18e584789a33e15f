pub mod chat;
pub mod health;
pub mod project;
pub mod review;
pub mod user;
