//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients for the services this gateway sits in front of.

pub mod platform;
