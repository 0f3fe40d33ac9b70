use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Platform roles, ordered from least to most privileged
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Citizen,
    Worker,
    Official,
    Admin,
}

impl UserRole {
    /// Map a role claim issued by the platform onto a known role.
    ///
    /// The platform has used several spellings over time (`ADMIN`, `super_admin`,
    /// `authority`); anything unrecognised is treated as a citizen.
    pub fn from_claim(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" | "super_admin" | "superadmin" => UserRole::Admin,
            "official" | "authority" | "officer" => UserRole::Official,
            "worker" | "field_worker" => UserRole::Worker,
            _ => UserRole::Citizen,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Citizen => write!(f, "citizen"),
            UserRole::Worker => write!(f, "worker"),
            UserRole::Official => write!(f, "official"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Immutable per-request session.
///
/// Built once by the auth middleware and handed to handlers through request
/// extensions. The raw bearer token is kept so calls to the platform API run
/// with the caller's own credentials.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub name: Option<String>,
    pub role: UserRole,
    access_token: String,
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("sub", &self.sub)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedUser {
    pub fn new(
        sub: impl Into<String>,
        name: Option<String>,
        role: UserRole,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            sub: sub.into(),
            name,
            role,
            access_token: access_token.into(),
        }
    }

    /// Bearer token to forward to the platform API
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Officials and admins triage reports and see the critical/archive lists
    pub fn has_official_access(&self) -> bool {
        self.role >= UserRole::Official
    }

    /// Workers (and everyone above them) execute field tasks
    pub fn has_worker_access(&self) -> bool {
        self.role >= UserRole::Worker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_claim_spellings() {
        assert_eq!(UserRole::from_claim("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::from_claim("super_admin"), UserRole::Admin);
        assert_eq!(UserRole::from_claim("authority"), UserRole::Official);
        assert_eq!(UserRole::from_claim(" Worker "), UserRole::Worker);
        assert_eq!(UserRole::from_claim("user"), UserRole::Citizen);
        assert_eq!(UserRole::from_claim(""), UserRole::Citizen);
    }

    #[test]
    fn test_access_levels_follow_role_order() {
        let worker = AuthenticatedUser::new("w1", None, UserRole::Worker, "t");
        assert!(worker.has_worker_access());
        assert!(!worker.has_official_access());

        let official = AuthenticatedUser::new("o1", None, UserRole::Official, "t");
        assert!(official.has_worker_access());
        assert!(official.has_official_access());
        assert!(official.role < UserRole::Admin);
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let user = AuthenticatedUser::new("u1", None, UserRole::Citizen, "secret-token");
        assert!(!format!("{:?}", user).contains("secret-token"));
    }
}
