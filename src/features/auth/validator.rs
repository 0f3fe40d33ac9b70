use super::model::{AuthenticatedUser, UserRole};
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;

/// Validates bearer tokens issued by the platform API (HS256, shared secret)
pub struct JwtValidator {
    decoding_key: DecodingKey,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // Subject may arrive under any of these; several can be present at once
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default, rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

impl Claims {
    fn subject(&self) -> Option<&str> {
        [&self.sub, &self.id, &self.mongo_id, &self.user_id]
            .into_iter()
            .filter_map(|claim| claim.as_deref().map(str::trim))
            .find(|claim| !claim.is_empty())
    }

    /// Highest role found in either the `role` or the `roles` claim
    fn effective_role(&self) -> UserRole {
        self.role
            .iter()
            .chain(self.roles.iter())
            .map(|r| UserRole::from_claim(r))
            .max()
            .unwrap_or(UserRole::Citizen)
    }
}

impl JwtValidator {
    pub fn new(secret: &str, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        validation.validate_aud = false;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;
        let sub = claims
            .subject()
            .ok_or_else(|| AppError::Auth("Token has an empty subject".to_string()))?
            .to_string();

        let role = claims.effective_role();
        Ok(AuthenticatedUser::new(sub, claims.name, role, token))
    }
}
