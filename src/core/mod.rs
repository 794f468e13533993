// core logic - message ordering, the completion call, and session storage

mod ai;
mod ask;
mod assemble;
mod message;
mod store;

pub use ai::{Completion, OpenAi};
pub use ask::{AskOptions, ask};
pub use assemble::assemble;
pub use message::{ChatMessage, Message, Role, Session, SessionSummary};
pub use store::{DEFAULT_SESSION, Db, Store};
