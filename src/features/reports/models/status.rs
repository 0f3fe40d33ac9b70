use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Report lifecycle status as used by the platform API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Verified,
    NeedsMoreInfo,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 6] = [
        ReportStatus::Pending,
        ReportStatus::Verified,
        ReportStatus::NeedsMoreInfo,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
        ReportStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::Verified => "VERIFIED",
            ReportStatus::NeedsMoreInfo => "NEEDS_MORE_INFO",
            ReportStatus::InProgress => "IN_PROGRESS",
            ReportStatus::Resolved => "RESOLVED",
            ReportStatus::Rejected => "REJECTED",
        }
    }

    /// Statuses reachable from this one in a single step
    pub fn allowed_transitions(&self) -> &'static [ReportStatus] {
        use ReportStatus::*;
        match self {
            Pending => &[Verified, NeedsMoreInfo, Rejected],
            NeedsMoreInfo => &[Pending, Verified, Rejected],
            Verified => &[InProgress, Rejected],
            InProgress => &[Resolved, Rejected],
            Resolved | Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, target: ReportStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Check a requested status change against the transition table.
///
/// A report whose current status is unknown cannot be moved: there is no
/// safe edge to assume.
pub fn validate_transition(
    current: Option<ReportStatus>,
    target: ReportStatus,
) -> Result<(), AppError> {
    let current = current.ok_or_else(|| {
        AppError::InvalidTransition(format!(
            "Report has no recognised status; cannot move it to {}",
            target
        ))
    })?;

    if current == target {
        return Err(AppError::InvalidTransition(format!(
            "Report is already {}",
            current
        )));
    }

    if !current.can_transition_to(target) {
        let allowed: Vec<&str> = current
            .allowed_transitions()
            .iter()
            .map(ReportStatus::as_str)
            .collect();
        return Err(AppError::InvalidTransition(if current.is_terminal() {
            format!("{} is a final status; it cannot change to {}", current, target)
        } else {
            format!(
                "{} cannot change to {} (allowed: {})",
                current,
                target,
                allowed.join(", ")
            )
        }));
    }

    Ok(())
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    /// Accepts `IN_PROGRESS`, `in_progress`, `in-progress` and `In Progress`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(&['-', ' '][..], "_");
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown report status: {}", s))
    }
}
