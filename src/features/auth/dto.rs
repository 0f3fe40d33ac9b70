use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::{AuthenticatedUser, UserRole};

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub id: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub can_triage: bool,
    pub can_work_tasks: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            can_triage: user.has_official_access(),
            can_work_tasks: user.has_worker_access(),
            id: user.sub,
            name: user.name,
            role: user.role,
        }
    }
}
