// one question, one answer
//
// order matters here: the question is saved before the api call and the
// answer after it, so a failed call leaves the question in history but
// never an answer without its question

use crate::Error;
use crate::core::ai::Completion;
use crate::core::assemble::assemble;
use crate::core::message::{Message, Role, Session};
use crate::core::store::Store;
use crate::progress::Progress;

#[derive(Debug, Clone, Copy)]
pub struct AskOptions<'a> {
    pub model: &'a str,
    /// don't write the question or the answer to the store
    pub ephemeral: bool,
}

pub async fn ask<S, C, P>(
    store: &S,
    client: &C,
    progress: &P,
    session: &Session,
    question: &str,
    opts: AskOptions<'_>,
) -> Result<Message, Error>
where
    S: Store + ?Sized,
    C: Completion + ?Sized,
    P: Progress + ?Sized,
{
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::EmptyQuestion);
    }

    let user = Message::new(Role::User, question, session.id);
    if !opts.ephemeral {
        store
            .append(&user)
            .await
            .map_err(|e| Error::persist("user message", e))?;
    }

    let messages = assemble(&session.messages, &session.hint, question);

    tracing::info!(
        session = %session.name,
        model = opts.model,
        history = session.messages.len(),
        ephemeral = opts.ephemeral,
        "asking"
    );

    progress.start(&format!("Querying {}", opts.model));
    let reply = client.complete(opts.model, &messages).await;
    progress.stop();

    let answer = Message::new(Role::Assistant, reply?, session.id);
    if !opts.ephemeral {
        store
            .append(&answer)
            .await
            .map_err(|e| Error::persist("response message", e))?;
    }

    Ok(answer)
}
