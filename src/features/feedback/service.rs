use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::modules::platform::ReportBackend;

pub struct FeedbackService {
    backend: Arc<dyn ReportBackend>,
}

impl FeedbackService {
    pub fn new(backend: Arc<dyn ReportBackend>) -> Self {
        Self { backend }
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: &str) -> Result<()> {
        self.backend.delete_feedback(user.access_token(), id).await?;
        tracing::info!("Feedback {} deleted by {}", id, user.sub);
        Ok(())
    }
}
