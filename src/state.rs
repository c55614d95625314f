use crate::config::AppConfig;
use crate::metrics::{repo, MetricsSource};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub metrics: Arc<dyn MetricsSource>,
    pub started_at: Instant,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        if config.auth.is_none() {
            warn!("no dashboard password configured; data routes are open");
        }
        if config.metrics.database_url.is_none() {
            warn!("METRICS_DATABASE_URL not set; /api/system-metrics will fail");
        }
        let metrics: Arc<dyn MetricsSource> = Arc::from(repo::from_config(&config.metrics)?);
        Ok(Self::from_parts(config, metrics))
    }

    pub fn from_parts(config: Arc<AppConfig>, metrics: Arc<dyn MetricsSource>) -> Self {
        Self {
            config,
            metrics,
            started_at: Instant::now(),
        }
    }

    /// Open dashboard over `root/local` and `root/workspace`, no metrics database.
    #[cfg(test)]
    pub fn fake(root: &std::path::Path) -> Self {
        use crate::config::{DataConfig, DayDefaults, Goals, MetricsConfig, ProfileConfig};

        let config = Arc::new(AppConfig {
            environment: "test".into(),
            data: DataConfig {
                local_dir: root.join("local"),
                workspace_dir: root.join("workspace"),
            },
            auth: None,
            metrics: MetricsConfig::default(),
            profile: ProfileConfig::default(),
            defaults: DayDefaults::default(),
            goals: Goals::default(),
        });
        Self::from_parts(config, Arc::new(repo::Unconfigured))
    }
}
