use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::Result;
use crate::features::reports::models::{Report, ReportPatch, ReportScope};

/// Operations the gateway needs from the platform.
///
/// Report operations take the caller's bearer token; OTP operations are public.
#[async_trait]
pub trait ReportBackend: Send + Sync {
    async fn list_reports(&self, token: &str, scope: ReportScope) -> Result<Vec<Report>>;

    async fn get_report(&self, token: &str, id: &str) -> Result<Report>;

    /// Partial update (`updateReportDynamic`). Returns the updated report.
    async fn update_report(&self, token: &str, id: &str, patch: &ReportPatch) -> Result<Report>;

    async fn delete_report(&self, token: &str, id: &str) -> Result<()>;

    async fn delete_feedback(&self, token: &str, id: &str) -> Result<()>;

    async fn send_otp(&self, identifier: &str) -> Result<()>;

    async fn resend_otp(&self, identifier: &str) -> Result<()>;

    /// Returns the platform's verification payload (session data) untouched
    async fn verify_otp(&self, identifier: &str, code: &str) -> Result<Value>;
}
