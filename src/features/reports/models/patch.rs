use chrono::{DateTime, Utc};
use serde::Serialize;

use super::report::ReportSeverity;
use super::status::ReportStatus;

/// Partial report update sent to the platform (`updateReportDynamic`).
///
/// Only the fields that are set are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<ReportSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_worker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_note: Option<String>,
}

impl ReportPatch {
    /// Patch for a status change, stamping the matching lifecycle timestamp
    pub fn status_change(target: ReportStatus, note: Option<String>, now: DateTime<Utc>) -> Self {
        let mut patch = Self {
            status: Some(target),
            status_note: note,
            ..Default::default()
        };
        patch.stamp_lifecycle(now);
        patch
    }

    /// Set `resolvedAt`/`rejectedAt` when the patch enters a final status
    pub fn stamp_lifecycle(&mut self, now: DateTime<Utc>) {
        match self.status {
            Some(ReportStatus::Resolved) => self.resolved_at = Some(now),
            Some(ReportStatus::Rejected) => self.rejected_at = Some(now),
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_change_stamps_final_statuses() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

        let resolved = ReportPatch::status_change(ReportStatus::Resolved, None, now);
        assert_eq!(resolved.resolved_at, Some(now));
        assert_eq!(resolved.rejected_at, None);

        let rejected =
            ReportPatch::status_change(ReportStatus::Rejected, Some("Duplicate".into()), now);
        assert_eq!(rejected.rejected_at, Some(now));

        let verified = ReportPatch::status_change(ReportStatus::Verified, None, now);
        assert_eq!(verified.resolved_at, None);
        assert_eq!(verified.rejected_at, None);
    }

    #[test]
    fn test_only_set_fields_are_serialized() {
        let patch = ReportPatch {
            severity: Some(ReportSeverity::High),
            assigned_to_worker: Some("w1".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "severity": "HIGH", "assignedToWorker": "w1" })
        );
        assert!(ReportPatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}
