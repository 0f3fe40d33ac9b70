pub mod dtos;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod selection;
pub mod services;
pub mod view;

pub use services::{ReportService, ReportViewService};
