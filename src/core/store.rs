// session storage - sqlite holds every session and its messages

use crate::Error;
use crate::core::message::{Message, Session, SessionSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

pub const DEFAULT_SESSION: &str = "default";

/// Read a session's history, append new messages.
#[async_trait]
pub trait Store {
    async fn session(&self, name: &str) -> Result<Session, Error>;
    async fn append(&self, message: &Message) -> Result<(), Error>;
}

pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // make sure the parent directory is there for file databases
        let path = options.get_filename();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        // an in-memory database lives and dies with its one connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        tracing::debug!(url, "session store ready");
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), Error> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                hint TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("INSERT OR IGNORE INTO sessions (name, hint, created_at) VALUES (?, '', ?)")
            .bind(DEFAULT_SESSION)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn create_session(&self, name: &str, hint: &str) -> Result<(), Error> {
        if self.session_id(name).await?.is_some() {
            return Err(Error::SessionExists(name.to_string()));
        }

        sqlx::query("INSERT INTO sessions (name, hint, created_at) VALUES (?, ?, ?)")
            .bind(name)
            .bind(hint)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        tracing::info!(session = name, "created session");
        Ok(())
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, Error> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            r#"SELECT s.name, s.hint, COUNT(m.id)
               FROM sessions s
               LEFT JOIN messages m ON m.session_id = s.id
               GROUP BY s.id
               ORDER BY s.name"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, hint, message_count)| SessionSummary {
                name,
                hint,
                message_count,
            })
            .collect())
    }

    pub async fn set_hint(&self, name: &str, hint: &str) -> Result<(), Error> {
        let result = sqlx::query("UPDATE sessions SET hint = ? WHERE name = ?")
            .bind(hint)
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::SessionNotFound(name.to_string()));
        }
        Ok(())
    }

    // drop the history but keep the session and its hint
    pub async fn clear_session(&self, name: &str) -> Result<u64, Error> {
        let id = self.require_session_id(name).await?;

        let result = sqlx::query("DELETE FROM messages WHERE session_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_session(&self, name: &str) -> Result<(), Error> {
        if name == DEFAULT_SESSION {
            return Err(Error::DefaultSession);
        }

        let id = self.require_session_id(name).await?;

        // foreign keys cascade, but be explicit in case they are off
        sqlx::query("DELETE FROM messages WHERE session_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(session = name, "deleted session");
        Ok(())
    }

    async fn session_id(&self, name: &str) -> Result<Option<i64>, Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM sessions WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id,)| id))
    }

    async fn require_session_id(&self, name: &str) -> Result<i64, Error> {
        self.session_id(name)
            .await?
            .ok_or_else(|| Error::SessionNotFound(name.to_string()))
    }
}

#[async_trait]
impl Store for Db {
    async fn session(&self, name: &str) -> Result<Session, Error> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, hint FROM sessions WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        let (id, hint) = row.ok_or_else(|| Error::SessionNotFound(name.to_string()))?;

        // insertion order is conversation order
        let rows: Vec<(String, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT role, content, created_at FROM messages WHERE session_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let messages = rows
            .into_iter()
            .map(|(role, content, date)| {
                Ok(Message {
                    content,
                    date,
                    role: role.parse()?,
                    session_id: id,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        tracing::debug!(session = name, messages = messages.len(), "loaded session");

        Ok(Session {
            id,
            name: name.to_string(),
            hint,
            messages,
        })
    }

    async fn append(&self, message: &Message) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO messages (session_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(message.session_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
