/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Keyword clients send for "no filter on this axis"
pub const FILTER_ALL: &str = "All";

/// Maximum number of ids accepted in one bulk delete
pub const MAX_BULK_DELETE: usize = 100;
