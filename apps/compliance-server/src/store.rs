//! SQLite-backed rule store

use anyhow::Result;
use async_trait::async_trait;
use compliance_engine::{evaluate, PersistenceMode, RuleStore, StoreError};
use shared_types::{BusinessProfile, ComplianceRule};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub struct SqliteRuleStore {
    db: SqlitePool,
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl SqliteRuleStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Connecting to database: {}", database_url);

        // Every connection to an in-memory database sees its own empty database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Self::run_migrations(&pool).await?;
        Ok(Self { db: pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS compliance_rules (
                id TEXT PRIMARY KEY,
                level TEXT NOT NULL,
                jurisdiction TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                rule_json TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_compliance_rules_hash ON compliance_rules(content_hash)
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<ComplianceRule>, StoreError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, rule_json FROM compliance_rules ORDER BY id")
                .fetch_all(&self.db)
                .await
                .map_err(backend)?;

        // An undecodable row is skipped so it cannot hide the rest
        let rules: Vec<ComplianceRule> = rows
            .into_iter()
            .filter_map(|(id, json)| match serde_json::from_str(&json) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    tracing::warn!("Skipping stored rule {}: {}", id, StoreError::from(e));
                    None
                }
            })
            .collect();
        Ok(rules)
    }
}

#[async_trait]
impl RuleStore for SqliteRuleStore {
    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Sqlite
    }

    async fn get_matching_rules(
        &self,
        profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, StoreError> {
        let rules = self.load_all().await?;
        Ok(rules
            .into_iter()
            .filter(|rule| evaluate(rule, profile).applies)
            .collect())
    }

    async fn store_rules(&self, rules: &[ComplianceRule]) -> Result<usize, StoreError> {
        let mut tx = self.db.begin().await.map_err(backend)?;

        for rule in rules {
            let json = serde_json::to_string(rule)?;
            sqlx::query(
                r#"
                INSERT INTO compliance_rules
                    (id, level, jurisdiction, content_hash, rule_json, updated_at)
                VALUES (?, ?, ?, ?, ?, datetime('now'))
                ON CONFLICT(id) DO UPDATE SET
                    level = excluded.level,
                    jurisdiction = excluded.jurisdiction,
                    content_hash = excluded.content_hash,
                    rule_json = excluded.rule_json,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&rule.id)
            .bind(rule.level.to_string())
            .bind(&rule.jurisdiction)
            .bind(rule.content_hash())
            .bind(json)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        }

        tx.commit().await.map_err(backend)?;
        tracing::debug!("Stored {} rules", rules.len());
        Ok(rules.len())
    }

    async fn get_all_rules(&self) -> Result<Vec<ComplianceRule>, StoreError> {
        self.load_all().await
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
