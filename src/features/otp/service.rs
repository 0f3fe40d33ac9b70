use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::countdown::Countdown;
use super::timer_registry::ResendTimerRegistry;
use crate::core::error::{AppError, Result};
use crate::modules::platform::ReportBackend;

/// OTP delivery through the platform, with a resend cooldown per identifier
pub struct OtpService {
    backend: Arc<dyn ReportBackend>,
    timers: ResendTimerRegistry,
}

/// Phone numbers are kept as typed; emails compare case-insensitively
fn normalize(identifier: &str) -> String {
    let identifier = identifier.trim();
    if identifier.contains('@') {
        identifier.to_lowercase()
    } else {
        identifier.to_string()
    }
}

impl OtpService {
    pub fn new(backend: Arc<dyn ReportBackend>, cooldown: Duration) -> Self {
        Self {
            backend,
            timers: ResendTimerRegistry::new(cooldown),
        }
    }

    /// Send a code and start the cooldown
    pub async fn send(&self, identifier: &str) -> Result<Countdown> {
        let identifier = normalize(identifier);
        let countdown = self.reserve(&identifier).await?;
        if let Err(e) = self.backend.send_otp(&identifier).await {
            self.timers.stop(&identifier).await;
            return Err(e);
        }
        tracing::info!("OTP sent to {}", identifier);
        Ok(countdown)
    }

    /// Send a fresh code once the cooldown has run out
    pub async fn resend(&self, identifier: &str) -> Result<Countdown> {
        let identifier = normalize(identifier);
        let countdown = self.reserve(&identifier).await?;
        if let Err(e) = self.backend.resend_otp(&identifier).await {
            self.timers.stop(&identifier).await;
            return Err(e);
        }
        tracing::info!("OTP resent to {}", identifier);
        Ok(countdown)
    }

    /// Claim the cooldown before dispatching, so concurrent requests for one
    /// identifier cannot both reach the platform. A failed dispatch releases it.
    async fn reserve(&self, identifier: &str) -> Result<Countdown> {
        self.timers.try_start(identifier).await.map_err(|running| {
            AppError::RateLimitExceeded(format!(
                "Please wait {} seconds before requesting a new code",
                running.remaining()
            ))
        })
    }

    /// Cooldown state. No timer means a code may be requested right away.
    pub async fn status(&self, identifier: &str) -> Countdown {
        self.timers
            .status(&normalize(identifier))
            .await
            .unwrap_or_else(|| self.timers.idle())
    }

    /// Forward the code to the platform; a successful check ends the cooldown
    pub async fn verify(&self, identifier: &str, code: &str) -> Result<Value> {
        let identifier = normalize(identifier);
        let session = self.backend.verify_otp(&identifier, code.trim()).await?;
        self.timers.stop(&identifier).await;
        tracing::info!("OTP verified for {}", identifier);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{FakePlatform, UNDELIVERABLE, VALID_OTP};
    use tokio::time::sleep;

    fn service(platform: &Arc<FakePlatform>) -> OtpService {
        OtpService::new(platform.clone(), Duration::from_secs(60))
    }

    #[tokio::test(start_paused = true)]
    async fn test_resend_is_rate_limited_until_countdown_ends() {
        let platform = FakePlatform::with_reports(Vec::new());
        let otp = service(&platform);

        let started = otp.send("Citizen@Example.com").await.unwrap();
        assert_eq!(started.remaining(), 60);

        let early = otp.resend("citizen@example.com").await;
        assert!(matches!(early, Err(AppError::RateLimitExceeded(ref m)) if m.contains("60")));
        assert_eq!(platform.otp_calls(), 1);

        sleep(Duration::from_millis(60_500)).await;
        let status = otp.status("citizen@example.com").await;
        assert!(status.resend_enabled());

        let restarted = otp.resend("citizen@example.com").await.unwrap();
        assert_eq!(restarted.remaining(), 60);
        assert_eq!(platform.otp_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_cannot_bypass_the_cooldown() {
        let platform = FakePlatform::with_reports(Vec::new());
        let otp = service(&platform);

        otp.send("+628123456789").await.unwrap();
        assert!(matches!(
            otp.resend("+628123456789").await,
            Err(AppError::RateLimitExceeded(_))
        ));
        for _ in 0..5 {
            assert!(matches!(
                otp.send("+628123456789").await,
                Err(AppError::RateLimitExceeded(_))
            ));
        }
        assert_eq!(platform.otp_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_resends_dispatch_once() {
        let platform = FakePlatform::with_reports(Vec::new());
        let otp = service(&platform);

        let (first, second) = tokio::join!(
            otp.resend("+628123456789"),
            otp.resend("+628123456789")
        );
        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        assert_eq!(platform.otp_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_dispatch_releases_cooldown() {
        let platform = FakePlatform::with_reports(Vec::new());
        let otp = service(&platform);

        assert!(matches!(
            otp.send(UNDELIVERABLE).await,
            Err(AppError::ExternalServiceError(_))
        ));
        assert!(otp.status(UNDELIVERABLE).await.resend_enabled());
    }

    #[tokio::test]
    async fn test_status_without_timer_allows_resend() {
        let platform = FakePlatform::with_reports(Vec::new());
        let otp = service(&platform);

        let status = otp.status("+628123456789").await;
        assert_eq!(status.remaining(), 0);
        assert_eq!(status.duration(), 60);
        assert!(status.resend_enabled());
        assert!(otp.resend("+628123456789").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_stops_countdown_only_on_success() {
        let platform = FakePlatform::with_reports(Vec::new());
        let otp = service(&platform);
        otp.send("+628123456789").await.unwrap();

        assert!(otp.verify("+628123456789", "000000").await.is_err());
        assert!(!otp.status("+628123456789").await.resend_enabled());

        let session = otp.verify("+628123456789", VALID_OTP).await.unwrap();
        assert_eq!(session["token"], "session-token");
        assert!(otp.status("+628123456789").await.resend_enabled());
    }
}
