//! Compiled-in version constants and the `/Version` projection.

use serde::Serialize;

use crate::info::InfoRecord;

/// Version of the node service.
pub const SERVICE_VERSION: f64 = 1.5;

/// Oldest info schema version this service accepts as healthy.
pub const MINIMUM_INFO_VERSION: i64 = 1;

/// Read-only projection of the service version and the info record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionInfo {
    /// Compiled-in service version.
    pub service_version: f64,
    /// Compiled-in minimum info schema version.
    pub minimum_info_version: i64,
    /// Commit from the info record.
    pub commit: String,
    /// Schema version from the info record.
    pub info_version: i64,
}

impl VersionInfo {
    /// Combine the compiled-in constants with `record`.
    #[must_use]
    pub fn from_record(record: &InfoRecord) -> Self {
        Self {
            service_version: SERVICE_VERSION,
            minimum_info_version: MINIMUM_INFO_VERSION,
            commit: record.commit.clone(),
            info_version: record.info_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record() {
        let record = InfoRecord::new(3, "deadbeef");
        let version = VersionInfo::from_record(&record);

        assert!((version.service_version - 1.5).abs() < f64::EPSILON);
        assert_eq!(version.minimum_info_version, 1);
        assert_eq!(version.commit, "deadbeef");
        assert_eq!(version.info_version, 3);
    }

    #[test]
    fn test_serialized_field_names() {
        let version = VersionInfo::from_record(&InfoRecord::new(1, "abc"));
        let json = serde_json::to_value(&version).unwrap();

        assert_eq!(json["ServiceVersion"], 1.5);
        assert_eq!(json["MinimumInfoVersion"], 1);
        assert_eq!(json["Commit"], "abc");
        assert_eq!(json["InfoVersion"], 1);
    }
}
