mod report_service;
mod view_service;

pub use report_service::ReportService;
pub use view_service::{BulkDeleteOutcome, FailedDelete, ReportViewService};
