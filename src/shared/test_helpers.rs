use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::reports::models::{Report, ReportPatch, ReportScope};
use crate::modules::platform::ReportBackend;

pub const VALID_OTP: &str = "123456";
/// The fake platform fails every OTP delivery to this identifier
pub const UNDELIVERABLE: &str = "+620000000000";

/// Sign an HS256 token the way the platform does, valid for one hour
pub fn issue_token(secret: &str, sub: &str, role: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    let claims = json!({ "sub": sub, "role": role, "exp": exp, "name": "Test User" });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn user(sub: &str, role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser::new(sub, Some("Test User".to_string()), role, format!("token-{}", sub))
}

/// Put a fixed session into every request, standing in for the JWT middleware
pub fn with_user(router: Router, session: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let session = session.clone();
            async move {
                request.extensions_mut().insert(session);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

pub fn report(id: &str) -> Report {
    Report {
        id: id.to_string(),
        ..Default::default()
    }
}

/// In-memory platform. Every scope lists the same reports.
#[derive(Default)]
pub struct FakePlatform {
    reports: Mutex<Vec<Report>>,
    failing_deletes: Mutex<HashSet<String>>,
    list_calls: AtomicUsize,
    otp_calls: AtomicUsize,
    list_unavailable: std::sync::atomic::AtomicBool,
}

impl FakePlatform {
    pub fn with_reports(reports: Vec<Report>) -> Arc<Self> {
        Arc::new(Self {
            reports: Mutex::new(reports),
            ..Default::default()
        })
    }

    pub fn fail_delete(&self, id: &str) {
        self.failing_deletes.lock().unwrap().insert(id.to_string());
    }

    pub fn set_list_unavailable(&self, unavailable: bool) {
        self.list_unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn insert(&self, report: Report) {
        self.reports.lock().unwrap().push(report);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn otp_calls(&self) -> usize {
        self.otp_calls.load(Ordering::SeqCst)
    }

    fn deliver_otp(&self, identifier: &str) -> Result<()> {
        if identifier == UNDELIVERABLE {
            return Err(AppError::ExternalServiceError(
                "SMS gateway rejected the number".to_string(),
            ));
        }
        self.otp_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub fn stored_ids(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn stored(&self, id: &str) -> Option<Report> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

#[async_trait]
impl ReportBackend for FakePlatform {
    async fn list_reports(&self, _token: &str, _scope: ReportScope) -> Result<Vec<Report>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.list_unavailable.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError(
                "platform unreachable".to_string(),
            ));
        }
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn get_report(&self, _token: &str, id: &str) -> Result<Report> {
        self.stored(id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    async fn update_report(&self, _token: &str, id: &str, patch: &ReportPatch) -> Result<Report> {
        let mut reports = self.reports.lock().unwrap();
        let report = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        if let Some(title) = &patch.title {
            report.title = title.clone();
        }
        if let Some(description) = &patch.description {
            report.description = description.clone();
        }
        if patch.status.is_some() {
            report.status = patch.status;
        }
        if patch.severity.is_some() {
            report.severity = patch.severity;
        }
        if let Some(tags) = &patch.tags {
            report.tags = tags.clone();
        }
        if patch.resolved_at.is_some() {
            report.resolved_at = patch.resolved_at;
        }
        if patch.rejected_at.is_some() {
            report.rejected_at = patch.rejected_at;
        }
        Ok(report.clone())
    }

    async fn delete_report(&self, _token: &str, id: &str) -> Result<()> {
        if self.failing_deletes.lock().unwrap().contains(id) {
            return Err(AppError::ExternalServiceError(format!(
                "delete of {} failed",
                id
            )));
        }
        let mut reports = self.reports.lock().unwrap();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        if reports.len() == before {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }
        Ok(())
    }

    async fn delete_feedback(&self, _token: &str, id: &str) -> Result<()> {
        if id == "missing" {
            return Err(AppError::NotFound("Feedback not found".to_string()));
        }
        Ok(())
    }

    async fn send_otp(&self, identifier: &str) -> Result<()> {
        self.deliver_otp(identifier)
    }

    async fn resend_otp(&self, identifier: &str) -> Result<()> {
        self.deliver_otp(identifier)
    }

    async fn verify_otp(&self, identifier: &str, code: &str) -> Result<Value> {
        if code == VALID_OTP {
            Ok(json!({ "identifier": identifier, "token": "session-token" }))
        } else {
            Err(AppError::BadRequest("Invalid OTP".to_string()))
        }
    }
}
