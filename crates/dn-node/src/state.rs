//! Shared node context injected into the HTTP layer.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{NodeError, NodeResult};
use crate::health::{HealthCell, HealthEvent, HealthState};
use crate::info::InfoStore;
use crate::uptime::UptimeReport;
use crate::version::VersionInfo;

/// Health cell and info store shared by the node and its handlers.
///
/// Cloning is cheap; all clones observe the same health state.
#[derive(Debug, Clone)]
pub struct NodeContext {
    health: Arc<HealthCell>,
    info: InfoStore,
}

impl NodeContext {
    /// Create a context in the `Starting` state backed by `info`.
    #[must_use]
    pub fn new(info: InfoStore) -> Self {
        Self {
            health: Arc::new(HealthCell::new()),
            info,
        }
    }

    /// Current health state.
    #[must_use]
    pub fn health(&self) -> HealthState {
        self.health.get()
    }

    /// Apply a health transition and return the resulting state.
    pub fn apply(&self, event: HealthEvent) -> HealthState {
        self.health.apply(event)
    }

    /// The info store.
    #[must_use]
    pub const fn info_store(&self) -> &InfoStore {
        &self.info
    }

    /// Uptime since the `Start` recorded in the info file.
    ///
    /// The record is read fresh on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or has no start time.
    pub async fn uptime(&self) -> NodeResult<UptimeReport> {
        let record = self.info.load().await?;
        let start = record.start.ok_or(NodeError::MissingStart)?;
        Ok(UptimeReport::between(start, Utc::now()))
    }

    /// Version projection of the info file.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read.
    pub async fn version(&self) -> NodeResult<VersionInfo> {
        let record = self.info.load().await?;
        Ok(VersionInfo::from_record(&record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::InfoRecord;
    use chrono::Duration;

    #[tokio::test]
    async fn test_clones_share_health() {
        let context = NodeContext::new(InfoStore::default());
        let clone = context.clone();

        clone.apply(HealthEvent::Listening);
        assert_eq!(context.health(), HealthState::Healthy);
    }

    #[tokio::test]
    async fn test_uptime_reads_start_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = InfoStore::new(dir.path().join("Info.json"));
        let start = Utc::now() - Duration::hours(3) - Duration::seconds(5);
        store
            .save(&InfoRecord::new(1, "abc").with_start(start))
            .await
            .expect("save");

        let uptime = NodeContext::new(store).uptime().await.expect("uptime");
        assert_eq!(uptime.days, 0);
        assert_eq!(uptime.hours, 3);
        assert_eq!(uptime.minutes, 0);
    }

    #[tokio::test]
    async fn test_uptime_without_start_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = InfoStore::new(dir.path().join("Info.json"));
        store.save(&InfoRecord::new(1, "abc")).await.expect("save");

        let err = NodeContext::new(store).uptime().await.unwrap_err();
        assert!(matches!(err, NodeError::MissingStart));
    }

    #[tokio::test]
    async fn test_version_reads_fresh_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = InfoStore::new(dir.path().join("Info.json"));
        store.save(&InfoRecord::new(1, "first")).await.expect("save");
        let context = NodeContext::new(store.clone());

        assert_eq!(context.version().await.expect("version").commit, "first");

        store.save(&InfoRecord::new(2, "second")).await.expect("save");
        let version = context.version().await.expect("version");
        assert_eq!(version.commit, "second");
        assert_eq!(version.info_version, 2);
    }

    #[tokio::test]
    async fn test_version_missing_file_fails() {
        let context = NodeContext::new(InfoStore::new("/nonexistent/Info.json"));
        assert!(matches!(
            context.version().await,
            Err(NodeError::InfoRead { .. })
        ));
    }
}
