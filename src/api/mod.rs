pub mod drive_api;
pub mod gemini_api;
pub mod sheets_api;
