pub mod chat;
pub mod sheets;
