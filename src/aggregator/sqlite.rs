use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::Aggregator;
use crate::error::Result;
use crate::submission::{CheckContext, MetricSample};

/// Persistent recorder backed by sqlite. One row per submitted
/// observation; no eviction or flush cadence.
pub struct SqliteAggregator {
    db_path: String,
}

#[derive(Debug, Clone)]
pub struct AggregatorStats {
    pub total_samples: i64,
    pub distinct_checks: i64,
    pub latest_sample: Option<MetricSample>,
    pub database_size_bytes: Option<u64>,
}

impl SqliteAggregator {
    pub fn new(db_path: Option<String>) -> Self {
        let path = db_path.unwrap_or_else(|| {
            let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            format!("{}/.mimir/mimir.db", home_dir)
        });

        Self { db_path: path }
    }

    pub fn initialize(&self) -> Result<()> {
        self.ensure_db_directory()?;
        self.create_tables()?;
        Ok(())
    }

    fn ensure_db_directory(&self) -> Result<()> {
        let db_path = Path::new(&self.db_path);
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn get_connection(&self) -> SqliteResult<Connection> {
        Connection::open(&self.db_path)
    }

    fn create_tables(&self) -> Result<()> {
        let conn = self.get_connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS samples (
                id TEXT PRIMARY KEY,
                check_id TEXT NOT NULL,
                metric_type TEXT NOT NULL,
                name TEXT NOT NULL,
                value REAL NOT NULL,
                tags TEXT NOT NULL,
                hostname TEXT NOT NULL,
                context TEXT,
                timestamp TEXT NOT NULL
            )",
            [],
        )?;

        // Indexes for the latest-per-check and per-name queries
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_samples_check_timestamp
             ON samples(check_id, timestamp)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_samples_name
             ON samples(name)",
            [],
        )?;

        Ok(())
    }

    pub fn latest_for_check(&self, check_id: &str) -> Result<Option<MetricSample>> {
        let conn = self.get_connection()?;

        let sample = conn
            .query_row(
                "SELECT check_id, metric_type, name, value, tags, hostname, timestamp
                 FROM samples
                 WHERE check_id = ?1
                 ORDER BY timestamp DESC LIMIT 1",
                params![check_id],
                |row| Self::row_to_sample(row),
            )
            .optional()?;

        Ok(sample)
    }

    pub fn get_stats(&self) -> Result<AggregatorStats> {
        let conn = self.get_connection()?;

        let total_samples: i64 =
            conn.query_row("SELECT COUNT(*) FROM samples", [], |row| row.get(0))?;

        let distinct_checks: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT check_id) FROM samples",
            [],
            |row| row.get(0),
        )?;

        let latest_sample = conn
            .query_row(
                "SELECT check_id, metric_type, name, value, tags, hostname, timestamp
                 FROM samples
                 ORDER BY timestamp DESC LIMIT 1",
                [],
                |row| Self::row_to_sample(row),
            )
            .optional()?;

        let database_size_bytes = fs::metadata(&self.db_path)
            .map(|metadata| metadata.len())
            .ok();

        Ok(AggregatorStats {
            total_samples,
            distinct_checks,
            latest_sample,
            database_size_bytes,
        })
    }

    fn row_to_sample(row: &rusqlite::Row<'_>) -> SqliteResult<MetricSample> {
        let metric_type_str: String = row.get(1)?;
        let metric_type = metric_type_str.parse().map_err(|_e| {
            rusqlite::Error::InvalidColumnType(1, "metric_type".to_string(), rusqlite::types::Type::Text)
        })?;

        let tags_json: String = row.get(4)?;
        let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let timestamp_str: String = row.get(6)?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|_e| {
                rusqlite::Error::InvalidColumnType(6, "timestamp".to_string(), rusqlite::types::Type::Text)
            })?
            .with_timezone(&Utc);

        Ok(MetricSample {
            check_id: row.get(0)?,
            metric_type,
            name: row.get(2)?,
            value: row.get(3)?,
            tags,
            hostname: row.get(5)?,
            timestamp,
        })
    }
}

impl Aggregator for SqliteAggregator {
    fn submit_metric(&self, context: Option<&CheckContext>, sample: MetricSample) -> Result<()> {
        let conn = self.get_connection()?;

        let tags_json = serde_json::to_string(&sample.tags)?;
        let context_json = context.map(serde_json::to_string).transpose()?;

        conn.execute(
            "INSERT INTO samples (id, check_id, metric_type, name, value, tags, hostname, context, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                Uuid::new_v4().to_string(),
                sample.check_id,
                sample.metric_type.as_str(),
                sample.name,
                sample.value,
                tags_json,
                sample.hostname,
                context_json,
                sample.timestamp.to_rfc3339(),
            ],
        )?;

        Ok(())
    }
}
