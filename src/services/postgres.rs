use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{CaseRecord, Verdict};
use crate::services::store::{CaseStore, StoreError};

/// PostgreSQL-backed case repository.
///
/// Holds the searchable `cases` table: approved user submissions land here
/// through the (external) moderation workflow and the pipeline appends
/// synthesized records to it in the background.
pub struct PgCaseStore {
    pool: PgPool,
}

impl PgCaseStore {
    /// Connect and run migrations.
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL case repository");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    fn row_to_case(row: &sqlx::postgres::PgRow) -> CaseRecord {
        let verdict: String = row.get("verdict");
        CaseRecord {
            disease_type: row.get("disease_type"),
            product_name: row.get("product_name"),
            company: row.get("company"),
            verdict: Verdict::from_loose(&verdict),
            content: row.get("content"),
            summary: row.get("summary"),
            created_at: row.get("created_at"),
            source: row.get("source"),
        }
    }
}

#[async_trait]
impl CaseStore for PgCaseStore {
    /// Broad retrieval: forward containment of the term in disease label /
    /// content / product name, plus the reverse match (a disease label longer
    /// than one character contained in the term), newest first.
    async fn search_cases(&self, term: &str) -> Result<Vec<CaseRecord>, StoreError> {
        let query = r#"
            SELECT disease_type, product_name, company, verdict, content, summary, created_at, source
            FROM cases
            WHERE disease_type ILIKE '%' || $1 || '%'
               OR content ILIKE '%' || $1 || '%'
               OR product_name ILIKE '%' || $1 || '%'
               OR (char_length(disease_type) > 1 AND $1 ILIKE '%' || disease_type || '%')
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query).bind(term).fetch_all(&self.pool).await?;
        let cases = rows.iter().map(Self::row_to_case).collect::<Vec<_>>();

        tracing::debug!("Repository returned {} cases for term '{}'", cases.len(), term);

        Ok(cases)
    }

    async fn insert_cases(&self, records: Vec<CaseRecord>) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO cases (disease_type, product_name, company, verdict, content, summary, created_at, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#;

        for record in &records {
            sqlx::query(query)
                .bind(&record.disease_type)
                .bind(&record.product_name)
                .bind(&record.company)
                .bind(record.verdict.as_str())
                .bind(&record.content)
                .bind(&record.summary)
                .bind(record.created_at)
                .bind(&record.source)
                .execute(&self.pool)
                .await?;
        }

        tracing::debug!("Inserted {} case records", records.len());

        Ok(())
    }

    async fn count_cases(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM cases")
            .fetch_one(&self.pool)
            .await?;
        let total: i64 = row.get("total");
        Ok(total.max(0) as u64)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
