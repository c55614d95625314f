use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    FromRow, PgPool,
};
use time::OffsetDateTime;

use crate::config::MetricsConfig;

/// One sample of host load written by the external collector.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SystemMetric {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub memory_used_mb: f64,
    pub memory_total_mb: f64,
    pub disk_percent: f64,
    pub disk_used_gb: f64,
    pub disk_total_gb: f64,
    pub load_1m: f64,
    pub load_5m: f64,
    pub load_15m: f64,
}

#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Newest `limit` samples, newest first.
    async fn recent(&self, limit: i64) -> anyhow::Result<Vec<SystemMetric>>;
}

pub struct PgMetrics {
    pool: PgPool,
}

impl PgMetrics {
    /// Builds a lazy pool; nothing connects until the first query.
    pub fn connect_lazy(database_url: &str, auth_token: Option<&str>) -> anyhow::Result<Self> {
        let mut options = PgConnectOptions::from_str(database_url)?;
        if let Some(token) = auth_token {
            options = options.password(token);
        }
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy_with(options);
        Ok(Self { pool })
    }
}

#[async_trait]
impl MetricsSource for PgMetrics {
    async fn recent(&self, limit: i64) -> anyhow::Result<Vec<SystemMetric>> {
        let rows = sqlx::query_as::<_, SystemMetric>(
            r#"
            SELECT timestamp, cpu_percent, memory_percent, memory_used_mb, memory_total_mb,
                   disk_percent, disk_used_gb, disk_total_gb, load_1m, load_5m, load_15m
            FROM system_metrics
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Stands in when no metrics database is configured; every query fails.
pub struct Unconfigured;

#[async_trait]
impl MetricsSource for Unconfigured {
    async fn recent(&self, _limit: i64) -> anyhow::Result<Vec<SystemMetric>> {
        anyhow::bail!("metrics database not configured (METRICS_DATABASE_URL)")
    }
}

pub fn from_config(config: &MetricsConfig) -> anyhow::Result<Box<dyn MetricsSource>> {
    match &config.database_url {
        Some(url) => Ok(Box::new(PgMetrics::connect_lazy(
            url,
            config.auth_token.as_deref(),
        )?)),
        None => Ok(Box::new(Unconfigured)),
    }
}
