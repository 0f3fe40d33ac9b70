use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// Which platform list a view is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportScope {
    /// Reports submitted by the caller (citizen activity screen)
    Mine,
    /// Field tasks assigned to the calling worker
    Assigned,
    /// Critical alerts dashboard
    Critical,
    /// Every report (archive table)
    All,
}

impl ReportScope {
    pub fn authorize(&self, user: &AuthenticatedUser) -> Result<(), AppError> {
        let allowed = match self {
            ReportScope::Mine => true,
            ReportScope::Assigned => user.has_worker_access(),
            ReportScope::Critical | ReportScope::All => user.has_official_access(),
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "The '{}' report list is not available for role {}",
                self, user.role
            )))
        }
    }
}

impl std::fmt::Display for ReportScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportScope::Mine => write!(f, "mine"),
            ReportScope::Assigned => write!(f, "assigned"),
            ReportScope::Critical => write!(f, "critical"),
            ReportScope::All => write!(f, "all"),
        }
    }
}
