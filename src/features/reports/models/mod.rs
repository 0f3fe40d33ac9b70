mod criteria;
mod lenient;
mod patch;
mod report;
mod scope;
mod status;

pub use criteria::{FilterCriteria, RawCriteria, SortOrder};
pub use patch::ReportPatch;
pub use report::{Category, Location, Report, ReportSeverity, UserRef};
pub use scope::ReportScope;
pub use status::{validate_transition, ReportStatus};
