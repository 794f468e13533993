// gab library - ask an llm, keep the conversation

pub mod cli;
mod config;
mod core;
mod error;
mod input;
mod logging;
mod output;
mod progress;

pub use config::{Config, DEFAULT_BASE_URL, DEFAULT_MODEL, default_database_url};
pub use crate::core::{
    AskOptions, ChatMessage, Completion, DEFAULT_SESSION, Db, Message, OpenAi, Role, Session,
    SessionSummary, Store, ask, assemble,
};
pub use error::Error;
pub use input::{read as read_question, read_from};
pub use progress::{Progress, Spinner};
