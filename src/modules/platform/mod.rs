//! ZenaNet platform REST API
//!
//! Every report and OTP operation is ultimately served by the platform. The
//! gateway only forwards the caller's bearer token; it never holds platform
//! credentials of its own.

mod backend;
mod envelope;
mod zena_client;

pub use backend::ReportBackend;
pub use zena_client::ZenaApiClient;
