use std::sync::Arc;

use chrono::Utc;

use super::ReportViewService;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::models::{validate_transition, Report, ReportPatch, ReportStatus};
use crate::modules::platform::ReportBackend;

/// Service for single-report operations
pub struct ReportService {
    backend: Arc<dyn ReportBackend>,
    views: Arc<ReportViewService>,
}

/// Whether the caller's role may move a report into `target` at all.
///
/// Workers handle field tasks only; triage (verify, reject, ask for more info)
/// is for officials and admins.
fn may_target(user: &AuthenticatedUser, target: ReportStatus) -> bool {
    if user.has_official_access() {
        return true;
    }
    user.has_worker_access()
        && matches!(target, ReportStatus::InProgress | ReportStatus::Resolved)
}

impl ReportService {
    pub fn new(backend: Arc<dyn ReportBackend>, views: Arc<ReportViewService>) -> Self {
        Self { backend, views }
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: &str) -> Result<Report> {
        self.backend.get_report(user.access_token(), id).await
    }

    /// Move a report to `target` after checking the role and the transition table
    pub async fn transition_status(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        target: ReportStatus,
        note: Option<String>,
    ) -> Result<Report> {
        if !may_target(user, target) {
            return Err(AppError::Forbidden(format!(
                "Role {} cannot move reports to {}",
                user.role, target
            )));
        }

        let current = self.get(user, id).await?;
        validate_transition(current.status, target)?;

        let patch = ReportPatch::status_change(target, note, Utc::now());
        let updated = self
            .backend
            .update_report(user.access_token(), id, &patch)
            .await?;

        tracing::info!(
            "Report {} moved to {} by {} ({})",
            id,
            target,
            user.sub,
            user.role
        );

        self.views.upsert_everywhere(&updated).await;
        Ok(updated)
    }

    /// Partial update. A status inside the patch goes through the same checks as
    /// a dedicated transition.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        mut patch: ReportPatch,
    ) -> Result<Report> {
        if !user.has_official_access() {
            return Err(AppError::Forbidden("Official access required".to_string()));
        }
        if patch.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        if let Some(target) = patch.status {
            let current = self.get(user, id).await?;
            validate_transition(current.status, target)?;
            patch.stamp_lifecycle(Utc::now());
        }

        let updated = self
            .backend
            .update_report(user.access_token(), id, &patch)
            .await?;

        tracing::info!("Report {} updated by {}", id, user.sub);

        self.views.upsert_everywhere(&updated).await;
        Ok(updated)
    }

    /// Current status and the statuses this caller may move the report to
    pub async fn allowed_transitions(
        &self,
        user: &AuthenticatedUser,
        id: &str,
    ) -> Result<(Option<ReportStatus>, Vec<ReportStatus>)> {
        let report = self.get(user, id).await?;
        let allowed = report
            .status
            .map(|status| {
                status
                    .allowed_transitions()
                    .iter()
                    .copied()
                    .filter(|target| may_target(user, *target))
                    .collect()
            })
            .unwrap_or_default();

        Ok((report.status, allowed))
    }
}
