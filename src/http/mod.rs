//! HTTP protocol layer module
//!
//! Range negotiation and response building, decoupled from the server loop.

pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{
    parse_range_header, parse_range_header_with, ByteWindow, RangeOutcome, RangePolicy,
};
pub use response::{
    build_404_reply, build_405_reply, build_416_reply, build_full_reply, build_partial_reply,
    build_reply, Reply,
};
