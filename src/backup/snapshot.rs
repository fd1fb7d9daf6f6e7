//! The portable snapshot format
//!
//! A snapshot is a single UTF-8 JSON object holding the whole exercise
//! catalog and, optionally, the workout log. Keys are camelCase so files
//! produced by earlier releases keep loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IronlogError, IronlogResult};
use crate::models::{Category, Exercise, Workout};

/// Snapshot file format version written by this build
pub const SNAPSHOT_FORMAT_VERSION: &str = "1.0";

/// Storage schema version written by this build
pub const SCHEMA_VERSION: &str = "1.0.0";

/// A versioned, timestamped bundle of every backed-up entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub exercises: Vec<Exercise>,

    pub categories: Vec<Category>,

    /// Absent in catalog-only backups
    #[serde(default)]
    pub workouts: Vec<Workout>,

    /// When the snapshot was built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Snapshot file format version
    #[serde(default)]
    pub version: String,

    /// Storage schema version the data was exported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
}

impl Snapshot {
    /// Bundle entities, stamped with the given instant and the current versions
    pub fn new(
        categories: Vec<Category>,
        exercises: Vec<Exercise>,
        workouts: Vec<Workout>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            exercises,
            categories,
            workouts,
            timestamp: Some(timestamp),
            version: SNAPSHOT_FORMAT_VERSION.to_string(),
            schema_version: Some(SCHEMA_VERSION.to_string()),
        }
    }

    /// Parse snapshot bytes
    ///
    /// Fails with a validation error when `exercises` or `categories` is
    /// missing. A null `workouts` is treated as absent.
    pub fn parse(bytes: &[u8]) -> IronlogResult<Self> {
        let mut value: Value = serde_json::from_slice(bytes)
            .map_err(|e| IronlogError::Json(format!("Backup is not valid JSON: {}", e)))?;

        let object = value.as_object_mut().ok_or_else(|| {
            IronlogError::Validation("Backup must be a JSON object".to_string())
        })?;

        for key in ["exercises", "categories"] {
            if object.get(key).map_or(true, Value::is_null) {
                return Err(IronlogError::Validation(format!(
                    "Backup is missing required field '{}'",
                    key
                )));
            }
        }

        if object.get("workouts").is_some_and(Value::is_null) {
            object.remove("workouts");
        }

        serde_json::from_value(value)
            .map_err(|e| IronlogError::Validation(format!("Backup has an unexpected shape: {}", e)))
    }

    /// Serialize to JSON bytes
    pub fn to_json(&self, pretty: bool) -> IronlogResult<Vec<u8>> {
        let bytes = if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        };
        bytes.map_err(|e| IronlogError::Json(format!("Failed to serialize backup: {}", e)))
    }

    /// True when there is nothing worth backing up
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.exercises.is_empty() && self.workouts.is_empty()
    }

    /// File name derived from the creation instant: `backup-YYYYMMDD-HHMMSS-mmm.json`
    pub fn file_name(&self) -> String {
        let at = self.timestamp.unwrap_or_else(Utc::now);
        format!(
            "backup-{}-{:03}.json",
            at.format("%Y%m%d-%H%M%S"),
            at.timestamp_subsec_millis()
        )
    }

    /// Decide whether this build can restore the snapshot
    ///
    /// A missing schema version is read as the current one. Older or equal
    /// major versions load unchanged; a newer major version is refused.
    pub fn check_schema_version(&self) -> IronlogResult<()> {
        let Some(declared) = self.schema_version.as_deref() else {
            return Ok(());
        };

        let declared_major = major_version(declared).ok_or_else(|| {
            IronlogError::Validation(format!("Unrecognised schema version '{}'", declared))
        })?;
        let supported_major = major_version(SCHEMA_VERSION).unwrap_or(1);

        match declared_major.cmp(&supported_major) {
            std::cmp::Ordering::Greater => Err(IronlogError::Validation(format!(
                "Backup schema version {} is newer than supported version {}",
                declared, SCHEMA_VERSION
            ))),
            // v1 is the only layout so far; older majors need no conversion
            _ => Ok(()),
        }
    }

    /// Describe the snapshot without restoring it
    pub fn inspect(&self) -> SnapshotSummary {
        SnapshotSummary {
            version: self.version.clone(),
            schema_version: self.schema_version.clone(),
            timestamp: self.timestamp,
            category_count: self.categories.len(),
            exercise_count: self.exercises.len(),
            workout_count: self.workouts.len(),
            set_count: self.workouts.iter().map(Workout::set_count).sum(),
            restorable: self.check_schema_version().is_ok(),
        }
    }
}

fn major_version(version: &str) -> Option<u64> {
    version
        .trim()
        .trim_start_matches('v')
        .split('.')
        .next()?
        .parse()
        .ok()
}

/// What a snapshot contains
#[derive(Debug, Clone)]
pub struct SnapshotSummary {
    pub version: String,
    pub schema_version: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub category_count: usize,
    pub exercise_count: usize,
    pub workout_count: usize,
    pub set_count: usize,
    /// Whether this build accepts the declared schema version
    pub restorable: bool,
}

impl SnapshotSummary {
    /// One-line description of the contents
    pub fn summary(&self) -> String {
        let scope = if self.workout_count == 0 {
            "catalog only"
        } else {
            "catalog and workouts"
        };
        format!(
            "{} categories, {} exercises, {} workouts, {} sets ({})",
            self.category_count, self.exercise_count, self.workout_count, self.set_count, scope
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Snapshot {
        let category = Category::new("Chest", "#ff0000");
        let exercise = Exercise::new("Bench").in_category(category.id);
        Snapshot::new(
            vec![category],
            vec![exercise],
            Vec::new(),
            Utc.with_ymd_and_hms(2025, 11, 27, 14, 30, 22).unwrap(),
        )
    }

    #[test]
    fn test_parse_requires_categories() {
        let err = Snapshot::parse(br#"{"exercises": [], "workouts": []}"#).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("categories"));
    }

    #[test]
    fn test_parse_requires_exercises() {
        let err = Snapshot::parse(br#"{"categories": []}"#).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("exercises"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(Snapshot::parse(b"[1, 2, 3]").unwrap_err().is_validation());
        assert!(matches!(
            Snapshot::parse(b"not json"),
            Err(IronlogError::Json(_))
        ));
    }

    #[test]
    fn test_workouts_are_optional() {
        let snapshot = Snapshot::parse(br#"{"exercises": [], "categories": [], "workouts": null}"#).unwrap();
        assert!(snapshot.workouts.is_empty());
        assert!(snapshot.timestamp.is_none());
        assert!(snapshot.schema_version.is_none());
    }

    #[test]
    fn test_wire_keys() {
        let json: Value = serde_json::from_slice(&sample().to_json(false).unwrap()).unwrap();
        assert_eq!(json["version"], SNAPSHOT_FORMAT_VERSION);
        assert_eq!(json["schemaVersion"], SCHEMA_VERSION);
        assert!(json["timestamp"].is_string());
        assert!(json["workouts"].is_array());
    }

    #[test]
    fn test_accepts_javascript_timestamp() {
        let snapshot = Snapshot::parse(
            br#"{"exercises": [], "categories": [], "timestamp": "2024-05-01T08:15:30.250Z", "version": "1.0"}"#,
        )
        .unwrap();
        assert_eq!(snapshot.timestamp.unwrap().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_file_name_embeds_timestamp() {
        assert_eq!(sample().file_name(), "backup-20251127-143022-000.json");
    }

    #[test]
    fn test_schema_version_dispatch() {
        let mut snapshot = sample();
        assert!(snapshot.check_schema_version().is_ok());

        snapshot.schema_version = None;
        assert!(snapshot.check_schema_version().is_ok());

        snapshot.schema_version = Some("0.9".into());
        assert!(snapshot.check_schema_version().is_ok());

        snapshot.schema_version = Some("2.0.0".into());
        assert!(snapshot.check_schema_version().unwrap_err().is_validation());
        assert!(!snapshot.inspect().restorable);

        snapshot.schema_version = Some("latest".into());
        assert!(snapshot.check_schema_version().is_err());
    }

    #[test]
    fn test_inspect_counts() {
        let summary = sample().inspect();
        assert_eq!(summary.category_count, 1);
        assert_eq!(summary.exercise_count, 1);
        assert!(summary.summary().contains("catalog only"));
    }
}
