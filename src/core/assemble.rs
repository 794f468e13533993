// put messages in the order the api reads them:
//   1. the session history, oldest first
//   2. the session hint as a system message
//   3. the new question
// the api builds context from oldest to newest, so the hint lands right
// before the question it should steer

use crate::core::message::{ChatMessage, Message, Role};

pub fn assemble(prior: &[Message], hint: &str, question: &str) -> Vec<ChatMessage> {
    let mut messages: Vec<ChatMessage> = Vec::with_capacity(prior.len() + 2);
    messages.extend(prior.iter().map(Message::pack));

    // an empty hint still goes out as an empty system message
    messages.push(ChatMessage::new(Role::System, hint));
    messages.push(ChatMessage::new(Role::User, question));

    messages
}
