pub mod chat_request;
