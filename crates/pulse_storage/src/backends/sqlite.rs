use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pulse_core::{Error, NewsRecord, NewsStore, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::StorageBackend;

const DEFAULT_DB_PATH: &str = "pulse_ai.db";
const MEMORY_PATH: &str = ":memory:";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS news (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        topic TEXT NOT NULL,
        date TEXT NOT NULL,
        title TEXT NOT NULL,
        summary_short TEXT NOT NULL,
        summary_medium TEXT NOT NULL,
        summary_full TEXT NOT NULL,
        audio_short TEXT,
        audio_medium TEXT,
        audio_full TEXT,
        url TEXT NOT NULL,
        source TEXT NOT NULL,
        timestamp_ms INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_news_topic_timestamp ON news (topic, timestamp_ms)",
    "DROP TRIGGER IF EXISTS expire_news",
];

/// Milliseconds since the epoch according to the database clock.
const NOW_MS: &str = "(CAST(strftime('%s', 'now') AS INTEGER) * 1000)";

// Rows past retention are deleted by the database itself after every insert.
fn expiry_trigger(retention: Duration) -> String {
    format!(
        "CREATE TRIGGER expire_news AFTER INSERT ON news BEGIN \
         DELETE FROM news WHERE timestamp_ms < {} - {}; \
         END",
        NOW_MS,
        retention.as_millis()
    )
}

/// Runs the migrations and rebuilds the expiry trigger under one write lock,
/// so processes opening the same file at once never interleave.
async fn install_schema(pool: &SqlitePool, retention: Duration) -> Result<()> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| Error::Database(format!("Failed to acquire connection: {}", e)))?;

    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to lock database for migrations: {}", e)))?;

    let trigger = expiry_trigger(retention);
    let mut statements: Vec<&str> = MIGRATIONS.to_vec();
    statements.push(&trigger);
    for (i, statement) in statements.into_iter().enumerate() {
        if let Err(e) = sqlx::query(statement).execute(&mut *conn).await {
            if let Err(rollback) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                debug!(error = %rollback, "Rollback after failed migration failed");
            }
            return Err(Error::Database(format!("Failed to run migration {}: {}", i, e)));
        }
    }

    sqlx::query("COMMIT")
        .execute(&mut *conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to commit migrations: {}", e)))?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct NewsRow {
    topic: String,
    date: String,
    title: String,
    summary_short: String,
    summary_medium: String,
    summary_full: String,
    audio_short: Option<String>,
    audio_medium: Option<String>,
    audio_full: Option<String>,
    url: String,
    source: String,
    timestamp_ms: i64,
}

impl TryFrom<NewsRow> for NewsRecord {
    type Error = Error;

    fn try_from(row: NewsRow) -> Result<Self> {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(row.timestamp_ms)
            .ok_or_else(|| Error::Database(format!("Invalid timestamp: {}", row.timestamp_ms)))?;
        Ok(NewsRecord {
            topic: row.topic,
            date: row.date,
            title: row.title,
            summary_short: row.summary_short,
            summary_medium: row.summary_medium,
            summary_full: row.summary_full,
            audio_short: row.audio_short,
            audio_medium: row.audio_medium,
            audio_full: row.audio_full,
            url: row.url,
            source: row.source,
            timestamp,
        })
    }
}

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
    retention: Duration,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be writable at the configured path (default ./pulse_ai.db)"
    }

    async fn open(url: Option<&str>, retention: Duration) -> Result<Self> {
        let path = url
            .map(|u| u.trim_start_matches("sqlite://").trim_start_matches("sqlite:"))
            .unwrap_or(DEFAULT_DB_PATH);
        if path == MEMORY_PATH {
            return Self::new_in_memory(retention).await;
        }
        Self::new_with_path(Path::new(path), retention).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path, retention: Duration) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        Self::initialize(pool, db_path.to_path_buf(), retention).await
    }

    /// A private database that lives as long as the store. The pool holds a
    /// single connection that never expires, since every new connection to
    /// `:memory:` would see an empty database.
    pub async fn new_in_memory(retention: Duration) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| Error::Database(format!("Invalid in-memory options: {}", e)))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to open in-memory database: {}", e)))?;

        Self::initialize(pool, PathBuf::from(MEMORY_PATH), retention).await
    }

    async fn initialize(pool: SqlitePool, db_path: PathBuf, retention: Duration) -> Result<Self> {
        install_schema(&pool, retention).await?;
        debug!(
            path = %db_path.display(),
            retention_secs = retention.as_secs(),
            "SQLite store ready"
        );

        Ok(Self {
            pool,
            db_path,
            retention,
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Closes every pooled connection; later calls fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn retention_ms(&self) -> i64 {
        i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX)
    }
}

#[async_trait]
impl NewsStore for SQLiteStorage {
    async fn insert(&self, record: &NewsRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO news
            (topic, date, title, summary_short, summary_medium, summary_full,
             audio_short, audio_medium, audio_full, url, source, timestamp_ms)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.topic)
        .bind(&record.date)
        .bind(&record.title)
        .bind(&record.summary_short)
        .bind(&record.summary_medium)
        .bind(&record.summary_full)
        .bind(record.audio_short.as_deref())
        .bind(record.audio_medium.as_deref())
        .bind(record.audio_full.as_deref())
        .bind(&record.url)
        .bind(&record.source)
        .bind(record.timestamp.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to store record: {}", e)))?;

        Ok(())
    }

    async fn recent_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<NewsRecord>> {
        let query = format!(
            r#"
            SELECT topic, date, title, summary_short, summary_medium, summary_full,
                   audio_short, audio_medium, audio_full, url, source, timestamp_ms
            FROM news
            WHERE topic = ? AND timestamp_ms >= {} - ?
            ORDER BY timestamp_ms DESC, id DESC
            LIMIT ?
            "#,
            NOW_MS
        );
        let rows: Vec<NewsRow> = sqlx::query_as(&query)
            .bind(topic)
            .bind(self.retention_ms())
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to query topic {}: {}", topic, e)))?;

        rows.into_iter().map(NewsRecord::try_from).collect()
    }

    async fn topics(&self) -> Result<Vec<String>> {
        let query = format!(
            "SELECT DISTINCT topic FROM news WHERE timestamp_ms >= {} - ? ORDER BY topic",
            NOW_MS
        );
        let topics: Vec<(String,)> = sqlx::query_as(&query)
            .bind(self.retention_ms())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list topics: {}", e)))?;

        Ok(topics.into_iter().map(|(topic,)| topic).collect())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Database unreachable: {}", e)))?;
        Ok(())
    }
}
