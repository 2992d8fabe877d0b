//! HTTP route handlers.

mod root;
mod scan;

pub use root::root_handler;
pub use scan::{scan_handler, ApiError, ScanRequest};
