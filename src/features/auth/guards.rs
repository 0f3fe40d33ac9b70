//! Role-based authorization guards.
//!
//! Role hierarchy (from highest to lowest): admin, official, worker, citizen.
//! Each higher role includes the permissions of the lower ones.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn session(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for official level access (official or admin).
///
/// Use this for triage: editing reports, the critical and archive lists, feedback moderation.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireOfficial(user): RequireOfficial) { ... }
/// ```
pub struct RequireOfficial(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireOfficial
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session(parts)?;

        if !user.has_official_access() {
            return Err(AppError::Forbidden("Official access required".to_string()));
        }

        Ok(RequireOfficial(user.clone()))
    }
}

/// Guard for worker level access (worker, official or admin).
///
/// Use this for field task operations such as moving a report into progress.
pub struct RequireWorker(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireWorker
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session(parts)?;

        if !user.has_worker_access() {
            return Err(AppError::Forbidden("Worker access required".to_string()));
        }

        Ok(RequireWorker(user.clone()))
    }
}
