use crate::db::traits::CredentialStore;
use crate::types::{AppError, NewUser, Result, User};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database, Row, Value};
use std::path::Path;

/// libSQL-backed credential store (local SQLite file or in-memory).
///
/// A single connection is kept for the lifetime of the client: an in-memory
/// database only exists on the connection that created it.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Open (or create) a local database file. `":memory:"` gives an
    /// ephemeral database.
    pub async fn new_local(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// Ephemeral database, used by tests and `url = ":memory:"`.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_name TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    full_name TEXT NOT NULL DEFAULT '',
                    expense_manager_data TEXT,
                    created_at INTEGER NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }

    /// Replace the expense document of a user. Returns false if no such user.
    pub async fn set_expense_manager_data(
        &self,
        user_name: &str,
        data: &serde_json::Value,
    ) -> Result<bool> {
        let affected = self
            .conn
            .execute(
                "UPDATE users SET expense_manager_data = ? WHERE user_name = ?",
                (data.to_string(), user_name),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update user data: {}", e)))?;

        Ok(affected > 0)
    }

    fn row_to_user(row: &Row) -> Result<User> {
        let text = |idx: i32| -> Result<String> {
            match row
                .get_value(idx)
                .map_err(|e| AppError::Database(e.to_string()))?
            {
                Value::Text(s) => Ok(s),
                other => Err(AppError::Database(format!(
                    "Unexpected value in column {}: {:?}",
                    idx, other
                ))),
            }
        };

        let expense_manager_data = match row
            .get_value(3)
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Value::Text(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
                AppError::Database(format!("Corrupt expense data: {}", e))
            })?),
            _ => None,
        };

        let created_at = match row
            .get_value(4)
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Value::Integer(ts) => ts,
            _ => 0,
        };

        Ok(User {
            user_name: text(0)?,
            password_hash: text(1)?,
            full_name: text(2)?,
            expense_manager_data,
            created_at,
        })
    }
}

#[async_trait]
impl CredentialStore for TursoClient {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let now = Utc::now().timestamp();

        self.conn
            .execute(
                "INSERT INTO users (user_name, password_hash, full_name, created_at)
                 VALUES (?, ?, ?, ?)",
                (
                    user.user_name.as_str(),
                    user.password_hash.as_str(),
                    user.full_name.as_str(),
                    now,
                ),
            )
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    AppError::validation("Username already taken", "userName")
                } else {
                    AppError::Database(format!("Failed to create user: {}", e))
                }
            })?;

        Ok(User {
            user_name: user.user_name.clone(),
            password_hash: user.password_hash.clone(),
            full_name: user.full_name.clone(),
            expense_manager_data: None,
            created_at: now,
        })
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT user_name, password_hash, full_name, expense_manager_data, created_at
                 FROM users WHERE user_name = ?",
                [user_name],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT user_name, password_hash, full_name, expense_manager_data, created_at
                 FROM users ORDER BY id ASC",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            users.push(Self::row_to_user(&row)?);
        }

        Ok(users)
    }
}
