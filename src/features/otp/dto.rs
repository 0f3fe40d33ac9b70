use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::countdown::Countdown;
use crate::shared::validation::{validate_otp_code, validate_otp_identifier};

/// Phone number or email address to send the code to
#[derive(Debug, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OtpRequestDto {
    #[validate(custom(function = "validate_otp_identifier"))]
    pub identifier: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpDto {
    #[validate(custom(function = "validate_otp_identifier"))]
    pub identifier: String,
    #[validate(custom(function = "validate_otp_code"))]
    pub code: String,
}

/// Resend cooldown as seen by the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OtpStatusDto {
    pub remaining_secs: u64,
    pub resend_enabled: bool,
    /// Full cooldown length
    pub cooldown_secs: u64,
}

impl From<Countdown> for OtpStatusDto {
    fn from(countdown: Countdown) -> Self {
        Self {
            remaining_secs: countdown.remaining(),
            resend_enabled: countdown.resend_enabled(),
            cooldown_secs: countdown.duration(),
        }
    }
}
