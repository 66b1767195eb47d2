use account_core::{AccountError, User};
use account_ports::Storage;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Postgres, Sqlite};
use std::borrow::Cow;
use std::path::PathBuf;

#[derive(Clone, Debug)]
enum DatabasePool {
    Sqlite(Pool<Sqlite>),
    Postgres(Pool<Postgres>),
}

/// SQL-backed storage implementation (SQLite/Postgres) using SQLx.
pub struct SqlxStorage {
    pool: DatabasePool,
}

impl SqlxStorage {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = if database_url.starts_with("postgres") {
            DatabasePool::Postgres(PgPoolOptions::new().connect(database_url).await?)
        } else if database_url.starts_with("sqlite::memory:") {
            // Every SQLite in-memory connection is its own database, so pin the
            // pool to a single connection that is never recycled.
            DatabasePool::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect(database_url)
                    .await?,
            )
        } else {
            // Best-effort: if we can't create it (permissions, etc.), sqlx will surface the
            // underlying error on connect.
            if let Some(path) = sqlite_db_path(database_url) {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        let _ = std::fs::create_dir_all(parent);
                    }
                }
            }

            let connect_url = sqlite_url_with_create_mode(database_url);
            DatabasePool::Sqlite(
                SqlitePoolOptions::new()
                    .connect(connect_url.as_ref())
                    .await?,
            )
        };

        Ok(Self { pool })
    }

    async fn bootstrap_schema(&self) -> Result<(), sqlx::Error> {
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS users (
                        id TEXT PRIMARY KEY,
                        username TEXT NOT NULL UNIQUE,
                        password_hash TEXT NOT NULL,
                        email TEXT NOT NULL,
                        name TEXT NOT NULL DEFAULT '',
                        admin INTEGER NOT NULL DEFAULT 0,
                        created_at TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    );
                    "#,
                )
                .execute(pool)
                .await?;

                sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);"#)
                    .execute(pool)
                    .await?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS users (
                        id TEXT PRIMARY KEY,
                        username TEXT NOT NULL UNIQUE,
                        password_hash TEXT NOT NULL,
                        email TEXT NOT NULL,
                        name TEXT NOT NULL DEFAULT '',
                        admin BOOLEAN NOT NULL DEFAULT FALSE,
                        created_at TIMESTAMPTZ NOT NULL,
                        updated_at TIMESTAMPTZ NOT NULL
                    );
                    "#,
                )
                .execute(pool)
                .await?;

                sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);"#)
                    .execute(pool)
                    .await?;
            }
        }

        Ok(())
    }

    async fn drop_schema(&self) -> Result<(), sqlx::Error> {
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query("DROP TABLE IF EXISTS users").execute(pool).await?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query("DROP TABLE IF EXISTS users CASCADE")
                    .execute(pool)
                    .await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Storage for SqlxStorage {
    async fn init(&self) -> Result<(), AccountError> {
        self.bootstrap_schema().await.map_err(Into::into)
    }

    async fn reset(&self) -> Result<(), AccountError> {
        self.drop_schema().await?;
        self.bootstrap_schema().await?;
        Ok(())
    }

    async fn healthcheck(&self) -> Result<(), AccountError> {
        // Keep readiness/liveness cheap: don't run bootstrap.
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
        }

        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<(), AccountError> {
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO users (id, username, password_hash, email, name, admin, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&user.id)
                .bind(&user.username)
                .bind(&user.password_hash)
                .bind(&user.email)
                .bind(&user.name)
                .bind(user.admin)
                .bind(user.created_at)
                .bind(user.updated_at)
                .execute(pool)
                .await?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO users (id, username, password_hash, email, name, admin, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(&user.id)
                .bind(&user.username)
                .bind(&user.password_hash)
                .bind(&user.email)
                .bind(&user.name)
                .bind(user.admin)
                .bind(user.created_at)
                .bind(user.updated_at)
                .execute(pool)
                .await?;
            }
        }

        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AccountError> {
        let user = match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
                    .bind(username)
                    .fetch_optional(pool)
                    .await?
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
                    .bind(username)
                    .fetch_optional(pool)
                    .await?
            }
        };

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AccountError> {
        let user = match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
                    .bind(id)
                    .fetch_optional(pool)
                    .await?
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(pool)
                    .await?
            }
        };

        Ok(user)
    }
}

fn sqlite_db_path(database_url: &str) -> Option<PathBuf> {
    if !database_url.starts_with("sqlite:") {
        return None;
    }
    if database_url.starts_with("sqlite::memory:") {
        return None;
    }

    let mut rest = &database_url["sqlite:".len()..];

    // Normalize URL-ish forms into a filesystem-ish path by reducing multiple
    // leading slashes to a single leading slash.
    if rest.starts_with("///") {
        rest = &rest[2..];
    } else if rest.starts_with("//") {
        rest = &rest[1..];
    }

    // Drop any query string.
    let path_part = rest.split('?').next().unwrap_or(rest);
    if path_part.is_empty() {
        return None;
    }

    Some(PathBuf::from(path_part))
}

fn sqlite_url_with_create_mode(database_url: &str) -> Cow<'_, str> {
    if !database_url.starts_with("sqlite:") {
        return Cow::Borrowed(database_url);
    }
    if database_url.starts_with("sqlite::memory:") {
        return Cow::Borrowed(database_url);
    }

    // Without mode=rwc SQLite refuses to create a missing database file.
    if database_url.contains("mode=") {
        return Cow::Borrowed(database_url);
    }

    let sep = if database_url.contains('?') { '&' } else { '?' };
    Cow::Owned(format!("{database_url}{sep}mode=rwc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_path_parsing() {
        assert_eq!(
            sqlite_db_path("sqlite:data/account.db?mode=rwc"),
            Some(PathBuf::from("data/account.db"))
        );
        assert_eq!(
            sqlite_db_path("sqlite:///var/lib/account.db"),
            Some(PathBuf::from("/var/lib/account.db"))
        );
        assert_eq!(sqlite_db_path("sqlite::memory:"), None);
        assert_eq!(sqlite_db_path("postgres://localhost/db"), None);
    }

    #[test]
    fn create_mode_is_appended_once() {
        assert_eq!(
            sqlite_url_with_create_mode("sqlite:account.db"),
            "sqlite:account.db?mode=rwc"
        );
        assert_eq!(
            sqlite_url_with_create_mode("sqlite:account.db?cache=shared"),
            "sqlite:account.db?cache=shared&mode=rwc"
        );
        assert_eq!(
            sqlite_url_with_create_mode("sqlite:account.db?mode=ro"),
            "sqlite:account.db?mode=ro"
        );
        assert_eq!(
            sqlite_url_with_create_mode("sqlite::memory:"),
            "sqlite::memory:"
        );
    }

    #[tokio::test]
    async fn file_backed_sqlite_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("nested/account.db").display());

        let storage = SqlxStorage::new(&url).await.unwrap();
        storage.init().await.unwrap();

        let user = User::new(
            "jane".to_string(),
            "hash".to_string(),
            "jane@example.com".to_string(),
            "Jane".to_string(),
            false,
        );
        storage.save_user(&user).await.unwrap();

        let by_id = storage.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "jane");
        assert!(!by_id.admin);

        storage.reset().await.unwrap();
        assert!(storage.get_user_by_username("jane").await.unwrap().is_none());
    }
}
