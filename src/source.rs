use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::model::{LogBook, TrackingStore};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{}: unavailable: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: not valid JSON: {source}", path.display())]
    Unparseable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: missing {shape} structure", path.display())]
    ShapeInvalid { path: PathBuf, shape: &'static str },
    #[error("{}: malformed {shape} entries: {source}", path.display())]
    Malformed {
        path: PathBuf,
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("no data source available")]
    Exhausted,
}

/// Where a resolved store came from. Reported to clients, never an error by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceLabel {
    #[serde(rename = "Local Data Directory")]
    Local,
    #[serde(rename = "Workspace")]
    Workspace,
    #[serde(rename = "Embedded Defaults")]
    Embedded,
}

impl std::fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SourceLabel::Local => "Local Data Directory",
            SourceLabel::Workspace => "Workspace",
            SourceLabel::Embedded => "Embedded Defaults",
        })
    }
}

/// A document layout the chain can validate and extract.
pub trait Shape: DeserializeOwned {
    const NAME: &'static str;

    /// The part of the document to deserialize, or `None` when the expected
    /// structure is missing.
    fn locate(doc: Value) -> Option<Value>;
}

impl Shape for TrackingStore {
    const NAME: &'static str = "data.data";

    fn locate(mut doc: Value) -> Option<Value> {
        let inner = doc.get_mut("data")?.get_mut("data")?.take();
        inner.is_object().then_some(inner)
    }
}

impl Shape for LogBook {
    const NAME: &'static str = "daily_logs";

    fn locate(doc: Value) -> Option<Value> {
        doc.get("daily_logs").is_some_and(Value::is_array).then_some(doc)
    }
}

#[derive(Debug)]
pub struct Resolved<T> {
    pub data: T,
    pub source: SourceLabel,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub label: SourceLabel,
    pub path: PathBuf,
}

/// Ordered list of files tried until one yields a valid document.
#[derive(Debug, Clone)]
pub struct SourceChain {
    candidates: Vec<Candidate>,
}

impl SourceChain {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Local data directory first, then the workspace.
    pub fn from_config(data: &DataConfig) -> Self {
        Self::new(vec![
            Candidate {
                label: SourceLabel::Local,
                path: data.local_file(),
            },
            Candidate {
                label: SourceLabel::Workspace,
                path: data.workspace_file(),
            },
        ])
    }

    pub async fn resolve<T: Shape>(&self) -> Result<Resolved<T>, SourceError> {
        for candidate in &self.candidates {
            debug!(path = %candidate.path.display(), source = %candidate.label, "trying source");
            match load::<T>(&candidate.path).await {
                Ok(data) => {
                    info!(source = %candidate.label, shape = T::NAME, "source resolved");
                    return Ok(Resolved {
                        data,
                        source: candidate.label,
                    });
                }
                Err(e) => warn!(error = %e, source = %candidate.label, "source skipped"),
            }
        }
        Err(SourceError::Exhausted)
    }

    /// Like [`SourceChain::resolve`] but ends in an always-available embedded store.
    pub async fn resolve_or_embedded<T: Shape>(&self, embedded: impl FnOnce() -> T) -> Resolved<T> {
        match self.resolve().await {
            Ok(resolved) => resolved,
            Err(_) => {
                warn!(shape = T::NAME, "all file sources failed, using embedded defaults");
                Resolved {
                    data: embedded(),
                    source: SourceLabel::Embedded,
                }
            }
        }
    }
}

pub async fn load<T: Shape>(path: &Path) -> Result<T, SourceError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
    let doc: Value = serde_json::from_str(&raw).map_err(|source| SourceError::Unparseable {
        path: path.to_path_buf(),
        source,
    })?;
    let located = T::locate(doc).ok_or_else(|| SourceError::ShapeInvalid {
        path: path.to_path_buf(),
        shape: T::NAME,
    })?;
    serde_json::from_value(located).map_err(|source| SourceError::Malformed {
        path: path.to_path_buf(),
        shape: T::NAME,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn tracking_doc(calories: u32) -> String {
        json!({
            "data": { "data": { "tracking": { "nutrition": { "meals": [
                { "date": "2026-02-21", "name": "Skyr", "calories": calories, "protein_g": 11 }
            ] } } } }
        })
        .to_string()
    }

    fn chain(local: PathBuf, workspace: PathBuf) -> SourceChain {
        SourceChain::new(vec![
            Candidate {
                label: SourceLabel::Local,
                path: local,
            },
            Candidate {
                label: SourceLabel::Workspace,
                path: workspace,
            },
        ])
    }

    #[tokio::test]
    async fn primary_wins_when_valid() {
        let dir = TempDir::new().unwrap();
        let local = write(&dir, "local.json", &tracking_doc(100));
        let workspace = write(&dir, "workspace.json", &tracking_doc(200));

        let resolved = chain(local, workspace).resolve::<TrackingStore>().await.unwrap();
        assert_eq!(resolved.source, SourceLabel::Local);
        assert_eq!(resolved.data.tracking.nutrition.meals[0].calories, 100.0);
    }

    #[tokio::test]
    async fn missing_primary_falls_through_to_secondary() {
        let dir = TempDir::new().unwrap();
        let workspace = write(&dir, "workspace.json", &tracking_doc(200));

        let resolved = chain(dir.path().join("absent.json"), workspace)
            .resolve::<TrackingStore>()
            .await
            .unwrap();
        assert_eq!(resolved.source, SourceLabel::Workspace);
        let meals = &resolved.data.tracking.nutrition.meals;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].name.as_deref(), Some("Skyr"));
        assert_eq!(meals[0].calories, 200.0);
    }

    #[tokio::test]
    async fn unparseable_and_misshapen_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let broken = write(&dir, "broken.json", "{ not json");
        let wrong_shape = write(&dir, "shape.json", r#"{"data": {"tracking": {}}}"#);

        let err = chain(broken.clone(), wrong_shape.clone())
            .resolve::<TrackingStore>()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Exhausted));

        assert!(matches!(
            load::<TrackingStore>(&broken).await,
            Err(SourceError::Unparseable { .. })
        ));
        assert!(matches!(
            load::<TrackingStore>(&wrong_shape).await,
            Err(SourceError::ShapeInvalid { shape: "data.data", .. })
        ));
    }

    #[tokio::test]
    async fn embedded_store_always_succeeds() {
        let dir = TempDir::new().unwrap();
        let resolved = chain(dir.path().join("a.json"), dir.path().join("b.json"))
            .resolve_or_embedded(TrackingStore::default)
            .await;
        assert_eq!(resolved.source, SourceLabel::Embedded);
        assert_eq!(resolved.data, TrackingStore::default());
    }

    #[tokio::test]
    async fn logbook_requires_daily_logs_array() {
        let dir = TempDir::new().unwrap();
        let tracking_only = write(&dir, "local.json", &tracking_doc(100));
        let logbook = write(
            &dir,
            "workspace.json",
            r#"{"daily_logs": [{"date": "2026-10-18", "steps": 4200}]}"#,
        );

        let resolved = chain(tracking_only, logbook).resolve::<LogBook>().await.unwrap();
        assert_eq!(resolved.source, SourceLabel::Workspace);
        assert_eq!(resolved.data.daily_logs.len(), 1);
    }

    #[tokio::test]
    async fn tracking_document_tolerates_nulls_and_float_counts() {
        let dir = TempDir::new().unwrap();
        let local = write(
            &dir,
            "local.json",
            &json!({ "data": { "data": { "tracking": {
                "nutrition": { "meals": [
                    { "date": "2026-02-21", "name": "Skyr", "calories": null, "protein_g": 11 }
                ] },
                "steps": [ { "date": "2026-02-21", "steps": 5234.0 } ],
                "water": null,
                "weight": [ { "date": "2026-02-21" } ],
                "workouts": [ { "equipment": null, "duration": null } ]
            } } } })
            .to_string(),
        );

        let resolved = chain(local, dir.path().join("absent.json"))
            .resolve_or_embedded(TrackingStore::default)
            .await;
        assert_eq!(resolved.source, SourceLabel::Local);
        let tracking = &resolved.data.tracking;
        assert_eq!(tracking.nutrition.meals[0].calories, 0.0);
        assert_eq!(tracking.steps[0].steps, 5234);
        assert!(tracking.water.is_empty());
        assert_eq!(tracking.weight[0].weight, None);
        assert_eq!(tracking.workouts[0].duration_minutes, 0.0);
    }

    #[tokio::test]
    async fn logbook_tolerates_null_lists() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "log.json",
            r#"{"daily_logs": [{"date": "2026-10-18", "meals": null, "cardio_sessions": null, "steps": 4200.4}]}"#,
        );
        let book = load::<LogBook>(&path).await.unwrap();
        assert!(book.daily_logs[0].meals.is_empty());
        assert_eq!(book.daily_logs[0].steps, Some(4200));
    }

    #[tokio::test]
    async fn type_mismatch_is_reported_as_malformed() {
        let dir = TempDir::new().unwrap();
        let tracking = write(
            &dir,
            "local.json",
            r#"{"data": {"data": {"tracking": {"nutrition": {"meals": "lots"}}}}}"#,
        );
        let logbook = write(&dir, "log.json", r#"{"daily_logs": [{"date": "yesterday"}]}"#);

        let err = load::<TrackingStore>(&tracking).await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed { shape: "data.data", .. }));
        assert!(err.to_string().contains("malformed data.data entries"));

        let err = load::<LogBook>(&logbook).await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed { shape: "daily_logs", .. }));
    }

    #[test]
    fn labels_serialize_as_display_text() {
        for label in [SourceLabel::Local, SourceLabel::Workspace, SourceLabel::Embedded] {
            assert_eq!(serde_json::to_value(label).unwrap(), json!(label.to_string()));
        }
    }
}
