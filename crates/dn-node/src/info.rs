//! Persisted boot metadata.
//!
//! The info record is a small JSON document owned by this process:
//!
//! ```json
//! {
//!   "InfoVersion": 1,
//!   "Commit": "a1b2c3d",
//!   "Start": "2024-05-01T12:00:00.000Z"
//! }
//! ```
//!
//! It is read at boot and on every `/Uptime` and `/Version` request, and is
//! rewritten with a fresh `Start` on every boot.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{NodeError, NodeResult};

/// Default location of the info file, relative to the working directory.
pub const DEFAULT_INFO_PATH: &str = "./Info.json";

/// Boot metadata persisted in the info file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InfoRecord {
    /// Schema version of this record.
    pub info_version: i64,
    /// Commit identifier of the deployed build.
    pub commit: String,
    /// Time of the latest boot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Fields this service does not interpret; kept across rewrites.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InfoRecord {
    /// Create a record with no start time.
    #[must_use]
    pub fn new(info_version: i64, commit: impl Into<String>) -> Self {
        Self {
            info_version,
            commit: commit.into(),
            start: None,
            extra: Map::new(),
        }
    }

    /// Set the start time.
    #[must_use]
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Stamp the record with `now`, truncated to millisecond precision.
    pub fn stamp_start(&mut self, now: DateTime<Utc>) {
        self.start = Some(now.trunc_subsecs(3));
    }

    /// Whether the schema version is below `minimum`.
    #[must_use]
    pub const fn is_outdated(&self, minimum: i64) -> bool {
        self.info_version < minimum
    }
}

/// File-backed store for the [`InfoRecord`].
#[derive(Debug, Clone)]
pub struct InfoStore {
    path: PathBuf,
}

impl InfoStore {
    /// Create a store for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the record.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::InfoRead`] if the file cannot be read and
    /// [`NodeError::InfoParse`] if it is not a valid record.
    pub async fn load(&self) -> NodeResult<InfoRecord> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| NodeError::InfoRead {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| NodeError::InfoParse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file contents with `record`, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub async fn save(&self, record: &InfoRecord) -> NodeResult<()> {
        let json = serde_json::to_string_pretty(record).map_err(NodeError::InfoEncode)?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| NodeError::InfoWrite {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), "info record written");
        Ok(())
    }
}

impl Default for InfoStore {
    fn default() -> Self {
        Self::new(DEFAULT_INFO_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_info(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("failed to write temp file");
        file
    }

    #[tokio::test]
    async fn test_load_full_record() {
        let file = create_temp_info(
            r#"{ "InfoVersion": 2, "Commit": "abc123", "Start": "2024-05-01T12:00:00.000Z" }"#,
        );
        let store = InfoStore::new(file.path());

        let record = store.load().await.expect("should load");
        assert_eq!(record.info_version, 2);
        assert_eq!(record.commit, "abc123");
        assert_eq!(
            record.start,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        );
        assert!(record.extra.is_empty());
    }

    #[tokio::test]
    async fn test_load_without_start() {
        let file = create_temp_info(r#"{ "InfoVersion": 1, "Commit": "abc" }"#);
        let record = InfoStore::new(file.path()).load().await.expect("should load");
        assert!(record.start.is_none());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let store = InfoStore::new("/nonexistent/path/Info.json");
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, NodeError::InfoRead { .. }));
    }

    #[tokio::test]
    async fn test_load_malformed_json() {
        let file = create_temp_info("this is not json {{{");
        let err = InfoStore::new(file.path()).load().await.unwrap_err();
        assert!(matches!(err, NodeError::InfoParse { .. }));
    }

    #[tokio::test]
    async fn test_load_missing_version() {
        let file = create_temp_info(r#"{ "Commit": "abc" }"#);
        let err = InfoStore::new(file.path()).load().await.unwrap_err();
        assert!(err.to_string().contains("InfoVersion"));
    }

    #[tokio::test]
    async fn test_save_overwrites_and_keeps_extra_fields() {
        let file = create_temp_info(
            r#"{ "InfoVersion": 1, "Commit": "abc", "Owner": "ops", "Start": "2020-01-01T00:00:00Z" }"#,
        );
        let store = InfoStore::new(file.path());

        let mut record = store.load().await.expect("should load");
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        record.stamp_start(now);
        store.save(&record).await.expect("should save");

        let reloaded = store.load().await.expect("should reload");
        assert_eq!(reloaded.start, Some(now));
        assert_eq!(reloaded.extra.get("Owner"), Some(&Value::from("ops")));

        let raw = std::fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("\n  \"InfoVersion\": 1"));
        assert_eq!(raw.matches("\"Start\"").count(), 1);
    }

    #[tokio::test]
    async fn test_save_to_missing_directory_fails() {
        let store = InfoStore::new("/nonexistent/dir/Info.json");
        let err = store.save(&InfoRecord::new(1, "abc")).await.unwrap_err();
        assert!(matches!(err, NodeError::InfoWrite { .. }));
    }

    #[test]
    fn test_stamp_start_truncates_to_millis() {
        let mut record = InfoRecord::new(1, "abc");
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        record.stamp_start(now);
        assert_eq!(
            record.start.unwrap().timestamp_subsec_nanos(),
            123_000_000
        );
    }

    #[test]
    fn test_is_outdated() {
        assert!(InfoRecord::new(0, "abc").is_outdated(1));
        assert!(!InfoRecord::new(1, "abc").is_outdated(1));
        assert!(!InfoRecord::new(3, "abc").is_outdated(1));
    }

    #[test]
    fn test_default_store_path() {
        assert_eq!(InfoStore::default().path(), Path::new("./Info.json"));
    }
}
