// Postgres persistence for news records. One row per URL; analysis columns
// are written independently by the application layer's fan-out calls.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use newslens_common::{error::Result, FactCheckItem, NewsLensError, NewsRecord};

/// A row from the news_records table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct NewsRow {
    id: Uuid,
    url: String,
    title: String,
    content: String,
    sentiment_result: Option<serde_json::Value>,
    emotion_result: Option<serde_json::Value>,
    propaganda_result: Option<serde_json::Value>,
    factcheck_result: Option<serde_json::Value>,
    summarise_result: Option<String>,
    data_summary: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl From<NewsRow> for NewsRecord {
    fn from(row: NewsRow) -> Self {
        // Malformed fact-check payloads (from older writes) degrade to None
        // rather than failing the whole read.
        let factcheck_result = row
            .factcheck_result
            .and_then(|v| serde_json::from_value::<Vec<FactCheckItem>>(v).ok());

        NewsRecord {
            id: Some(row.id),
            url: row.url,
            title: row.title,
            content: row.content,
            sentiment_result: row.sentiment_result,
            emotion_result: row.emotion_result,
            propaganda_result: row.propaganda_result,
            factcheck_result,
            summarise_result: row.summarise_result,
            data_summary: row.data_summary,
            created_at: Some(row.created_at),
        }
    }
}

#[derive(Clone)]
pub struct NewsStore {
    pool: PgPool,
}

impl NewsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert a new record for a URL. If the URL is already present, the
    /// existing record is returned untouched.
    pub async fn create(&self, url: &str, title: &str, content: &str) -> Result<NewsRecord> {
        if let Some(existing) = self.get_by_url(url).await? {
            return Ok(existing);
        }

        let row = sqlx::query_as::<_, NewsRow>(
            r#"
            INSERT INTO news_records (url, title, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(url)
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| NewsLensError::Database(e.to_string()))?;

        Ok(row.into())
    }

    pub async fn url_exists(&self, url: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM news_records WHERE url = $1")
                .bind(url)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    pub async fn id_exists(&self, id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news_records WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    pub async fn get_by_url(&self, url: &str) -> Result<Option<NewsRecord>> {
        let row = sqlx::query_as::<_, NewsRow>("SELECT * FROM news_records WHERE url = $1")
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(row.map(Into::into))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<NewsRecord>> {
        let row = sqlx::query_as::<_, NewsRow>("SELECT * FROM news_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(row.map(Into::into))
    }

    pub async fn get_all(&self) -> Result<Vec<NewsRecord>> {
        let rows =
            sqlx::query_as::<_, NewsRow>("SELECT * FROM news_records ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update_sentiment(&self, url: &str, value: &serde_json::Value) -> Result<bool> {
        self.update_json_column("sentiment_result", url, value).await
    }

    pub async fn update_emotion(&self, url: &str, value: &serde_json::Value) -> Result<bool> {
        self.update_json_column("emotion_result", url, value).await
    }

    pub async fn update_propaganda(&self, url: &str, value: &serde_json::Value) -> Result<bool> {
        self.update_json_column("propaganda_result", url, value).await
    }

    pub async fn update_factcheck(&self, url: &str, items: &[FactCheckItem]) -> Result<bool> {
        let value = serde_json::to_value(items)
            .map_err(|e| NewsLensError::Database(e.to_string()))?;
        self.update_json_column("factcheck_result", url, &value).await
    }

    pub async fn update_data_summary(&self, url: &str, value: &serde_json::Value) -> Result<bool> {
        self.update_json_column("data_summary", url, value).await
    }

    pub async fn update_summary(&self, url: &str, summary: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE news_records SET summarise_result = $1 WHERE url = $2")
                .bind(summary)
                .bind(url)
                .execute(&self.pool)
                .await
                .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_url(&self, url: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news_records WHERE url = $1")
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Column names are fixed at the call sites above; never interpolate
    /// caller-supplied strings here.
    async fn update_json_column(
        &self,
        column: &'static str,
        url: &str,
        value: &serde_json::Value,
    ) -> Result<bool> {
        let sql = format!("UPDATE news_records SET {column} = $1 WHERE url = $2");
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(|e| NewsLensError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
