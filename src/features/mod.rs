pub mod auth;
pub mod feedback;
pub mod otp;
pub mod reports;
