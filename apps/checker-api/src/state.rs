//! Application state for the checker API.

use anyhow::Result;
use llm_judge::{GroqClient, StructureJudge};
use shared_types::FormatRuleSet;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct AppState {
    pub db: SqlitePool,
    pub rules: Arc<FormatRuleSet>,
    /// Absent when no API key is configured; checks then run on the rule
    /// evaluator alone.
    pub judge: Option<StructureJudge>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        let data_dir = PathBuf::from(
            std::env::var("CHECKER_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        );
        std::fs::create_dir_all(&data_dir)?;

        let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            format!("sqlite:{}/checker.db?mode=rwc", data_dir.display())
        });
        tracing::info!("Connecting to database: {}", db_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;
        Self::run_migrations(&pool).await?;

        let rules = match std::env::var("FORMAT_RULES_PATH") {
            Ok(path) => FormatRuleSet::load(Path::new(&path)),
            Err(_) => FormatRuleSet::default(),
        };

        let judge = match GroqClient::from_env() {
            Ok(client) => {
                tracing::info!("Model judgments enabled ({})", client.model());
                Some(StructureJudge::new(Arc::new(client)))
            }
            Err(e) => {
                tracing::warn!("Model judgments disabled: {}", e);
                None
            }
        };

        let upload_dir = data_dir.join("uploads");
        std::fs::create_dir_all(&upload_dir)?;

        Ok(Self {
            db: pool,
            rules: Arc::new(rules),
            judge,
            upload_dir,
        })
    }

    pub(crate) async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS check_results (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                student_info_json TEXT,
                validation_json TEXT NOT NULL,
                report_json TEXT,
                template_comparison TEXT,
                status TEXT NOT NULL,
                score INTEGER NOT NULL DEFAULT 0,
                source TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_check_results_status ON check_results(status)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS templates (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                text TEXT NOT NULL,
                page_count INTEGER NOT NULL,
                uploaded_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}
