//! Feedback moderation. Feedback itself lives on the platform; the gateway
//! only forwards deletes from officials.

pub mod handler;
pub mod routes;
mod service;

pub use service::FeedbackService;
