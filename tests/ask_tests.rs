// tests for the ask pipeline, with the store and the api faked out

use async_trait::async_trait;
use gab::{
    AskOptions, ChatMessage, Completion, Error, Message, Progress, Role, Session, Store, ask,
};
use std::sync::Mutex;

#[derive(Default)]
struct FakeStore {
    writes: Mutex<Vec<Message>>,
    fail: bool,
    // succeed this many appends, then fail the rest
    fail_after: Option<usize>,
}

#[async_trait]
impl Store for FakeStore {
    async fn session(&self, name: &str) -> Result<Session, Error> {
        Err(Error::SessionNotFound(name.to_string()))
    }

    async fn append(&self, message: &Message) -> Result<(), Error> {
        let mut writes = self.writes.lock().unwrap();
        if self.fail || self.fail_after.is_some_and(|n| writes.len() >= n) {
            return Err(Error::Database(sqlx::Error::PoolClosed));
        }
        writes.push(message.clone());
        Ok(())
    }
}

struct FakeClient {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl FakeClient {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for FakeClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        self.reply.clone().map_err(Error::Api)
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Progress for Recorder {
    fn start(&self, label: &str) {
        self.events.lock().unwrap().push(format!("start {label}"));
    }

    fn stop(&self) {
        self.events.lock().unwrap().push("stop".to_string());
    }
}

fn session() -> Session {
    Session {
        id: 3,
        name: "math".to_string(),
        hint: "Be terse.".to_string(),
        messages: vec![
            Message::new(Role::User, "1+1?", 3),
            Message::new(Role::Assistant, "2", 3),
        ],
    }
}

fn opts(ephemeral: bool) -> AskOptions<'static> {
    AskOptions {
        model: "gpt-3.5-turbo",
        ephemeral,
    }
}

#[tokio::test]
async fn test_sends_history_hint_then_question() {
    let store = FakeStore::default();
    let client = FakeClient::replying("4");

    ask(&store, &client, &(), &session(), "2+2?", opts(false))
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    let (model, messages) = &calls[0];
    assert_eq!(model, "gpt-3.5-turbo");
    assert_eq!(
        messages,
        &vec![
            ChatMessage::new(Role::User, "1+1?"),
            ChatMessage::new(Role::Assistant, "2"),
            ChatMessage::new(Role::System, "Be terse."),
            ChatMessage::new(Role::User, "2+2?"),
        ]
    );
}

#[tokio::test]
async fn test_saves_question_and_answer() {
    let store = FakeStore::default();
    let client = FakeClient::replying("4");

    let answer = ask(&store, &client, &(), &session(), "2+2?", opts(false))
        .await
        .unwrap();

    assert_eq!(answer.role, Role::Assistant);
    assert_eq!(answer.content, "4");
    assert_eq!(answer.session_id, 3);

    let writes = store.writes.lock().unwrap();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].role, Role::User);
    assert_eq!(writes[0].content, "2+2?");
    assert_eq!(writes[1].role, Role::Assistant);
    assert_eq!(writes[1].content, "4");
    assert!(writes.iter().all(|m| m.session_id == 3));
}

#[tokio::test]
async fn test_ephemeral_writes_nothing() {
    let store = FakeStore::default();
    let client = FakeClient::replying("4");

    let answer = ask(&store, &client, &(), &session(), "2+2?", opts(true))
        .await
        .unwrap();

    assert_eq!(answer.content, "4");
    assert_eq!(client.calls().len(), 1);
    assert!(store.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_ephemeral_api_error_writes_nothing() {
    let store = FakeStore::default();
    let client = FakeClient::failing("boom");

    let result = ask(&store, &client, &(), &session(), "2+2?", opts(true)).await;

    assert!(matches!(result, Err(Error::Api(_))));
    assert!(store.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_api_error_keeps_only_the_question() {
    let store = FakeStore::default();
    let client = FakeClient::failing("rate limited");

    let err = ask(&store, &client, &(), &session(), "2+2?", opts(false))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("rate limited"));
    let writes = store.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].role, Role::User);
}

#[tokio::test]
async fn test_empty_question_never_calls_api() {
    let store = FakeStore::default();
    let client = FakeClient::replying("unused");

    let result = ask(&store, &client, &(), &session(), "  \n\t ", opts(false)).await;

    assert!(matches!(result, Err(Error::EmptyQuestion)));
    assert!(client.calls().is_empty());
    assert!(store.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_save_aborts_before_api() {
    let store = FakeStore {
        fail: true,
        ..FakeStore::default()
    };
    let client = FakeClient::replying("4");

    let err = ask(&store, &client, &(), &session(), "2+2?", opts(false))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Persist { what: "user message", .. }));
    assert!(err.to_string().starts_with("failed to save user message"));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_failed_answer_save_is_fatal() {
    let store = FakeStore {
        fail_after: Some(1),
        ..FakeStore::default()
    };
    let client = FakeClient::replying("4");

    let err = ask(&store, &client, &(), &session(), "2+2?", opts(false))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Persist { what: "response message", .. }));
    assert!(err.to_string().starts_with("failed to save response message"));
    assert_eq!(client.calls().len(), 1);

    let writes = store.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].role, Role::User);
    assert_eq!(writes[0].content, "2+2?");
}

#[tokio::test]
async fn test_empty_hint_still_sent() {
    let store = FakeStore::default();
    let client = FakeClient::replying("hi");
    let session = Session {
        id: 1,
        name: "default".to_string(),
        hint: String::new(),
        messages: vec![],
    };

    ask(&store, &client, &(), &session, "hello", opts(true))
        .await
        .unwrap();

    let (_, messages) = &client.calls()[0];
    assert_eq!(
        messages,
        &vec![
            ChatMessage::new(Role::System, ""),
            ChatMessage::new(Role::User, "hello"),
        ]
    );
}

#[tokio::test]
async fn test_spinner_wraps_the_call() {
    let store = FakeStore::default();
    let client = FakeClient::failing("down");
    let progress = Recorder::default();

    let _ = ask(&store, &client, &progress, &session(), "2+2?", opts(true)).await;

    assert_eq!(
        *progress.events.lock().unwrap(),
        vec!["start Querying gpt-3.5-turbo".to_string(), "stop".to_string()]
    );
}
