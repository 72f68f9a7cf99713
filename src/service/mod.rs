pub mod context;
pub mod fanout;
pub mod pipeline;
pub mod prompt;
