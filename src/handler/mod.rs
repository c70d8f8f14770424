//! Request handler module
//!
//! Responsible for method validation and dispatching requests to the resource table.

pub mod router;

// Re-export main entry points
pub use router::{dispatch, dispatch_with_policy, handle_request};
