//! One-time-password login with a resend cooldown.
//!
//! Codes are issued and checked by the platform; this feature owns the
//! per-identifier countdown that gates the resend action.

pub mod countdown;
pub mod dto;
pub mod handler;
pub mod routes;
mod service;
mod timer_registry;

pub use service::OtpService;
