use std::path::PathBuf;

use anyhow::Context;

use crate::auth::services::hash_password;

/// File name looked up in every data directory of the source chain.
pub const TRACKING_FILE: &str = "fitness-tracking.json";

#[derive(Debug, Clone)]
pub struct DataConfig {
    pub local_dir: PathBuf,
    pub workspace_dir: PathBuf,
}

impl DataConfig {
    pub fn local_file(&self) -> PathBuf {
        self.local_dir.join(TRACKING_FILE)
    }

    pub fn workspace_file(&self) -> PathBuf {
        self.workspace_dir.join(TRACKING_FILE)
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub password_hash: String,
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsConfig {
    pub database_url: Option<String>,
    pub auth_token: Option<String>,
}

/// Who the dashboard belongs to. Body measurements feed BMI and goal maths.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub name: String,
    pub age: u32,
    pub height_cm: f64,
    pub start_weight: f64,
    pub target_range: (f64, f64),
    pub location: String,
}

impl ProfileConfig {
    pub fn target_weight(&self) -> f64 {
        (self.target_range.0 + self.target_range.1) / 2.0
    }

    pub fn height_m(&self) -> f64 {
        self.height_cm / 100.0
    }

    pub fn bmi(&self, weight: f64) -> f64 {
        weight / self.height_m().powi(2)
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "owner".into(),
            age: 66,
            height_cm: 190.0,
            start_weight: 108.0,
            target_range: (80.0, 88.0),
            location: "Pellendorf/Maishofen".into(),
        }
    }
}

/// Values substituted into the day snapshot when a domain has no entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayDefaults {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub water_glasses: f64,
    pub steps: u32,
    pub weight: f64,
    pub previous_weight: f64,
}

impl Default for DayDefaults {
    fn default() -> Self {
        Self {
            calories: 1233.0,
            protein: 64.2,
            carbs: 110.0,
            fat: 50.0,
            water_glasses: 7.4,
            steps: 5000,
            weight: 106.9,
            previous_weight: 107.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goals {
    pub calories: f64,
    pub protein: f64,
    pub water_glasses: f64,
    pub steps: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 90.0,
            water_glasses: 8.0,
            steps: 8000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub data: DataConfig,
    /// `None` leaves the data routes open.
    pub auth: Option<AuthConfig>,
    pub metrics: MetricsConfig,
    pub profile: ProfileConfig,
    pub defaults: DayDefaults,
    pub goals: Goals,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let local_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let workspace_dir = match std::env::var("WORKSPACE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".openclaw").join("workspace"))
                .unwrap_or_else(|_| PathBuf::from(".")),
        };

        let password_hash = match (
            std::env::var("DASHBOARD_PASSWORD_HASH").ok(),
            std::env::var("DASHBOARD_PASSWORD").ok(),
        ) {
            (Some(hash), _) => Some(hash),
            (None, Some(plain)) => Some(hash_password(&plain)?),
            (None, None) => None,
        };
        let auth = match password_hash {
            Some(password_hash) => Some(AuthConfig {
                password_hash,
                secret: std::env::var("JWT_SECRET")
                    .context("JWT_SECRET is required when a dashboard password is set")?,
                issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "pulseboard".into()),
                audience: std::env::var("JWT_AUDIENCE")
                    .unwrap_or_else(|_| "pulseboard-dashboard".into()),
                ttl_minutes: std::env::var("AUTH_TTL_MINUTES")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok())
                    .unwrap_or(60 * 24),
            }),
            None => None,
        };

        let metrics = MetricsConfig {
            database_url: std::env::var("METRICS_DATABASE_URL").ok(),
            auth_token: std::env::var("METRICS_AUTH_TOKEN").ok(),
        };

        let mut profile = ProfileConfig::default();
        if let Ok(name) = std::env::var("DASHBOARD_OWNER") {
            profile.name = name;
        }

        Ok(Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            data: DataConfig {
                local_dir,
                workspace_dir,
            },
            auth,
            metrics,
            profile,
            defaults: DayDefaults::default(),
            goals: Goals::default(),
        })
    }
}
