//! HTTP Range request parsing module
//!
//! Single-range `bytes=start-end` parsing, following RFC 7233 semantics for
//! clamping and unsatisfiable ranges.

use serde::Deserialize;

/// Inclusive byte window into a resource's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    /// First byte offset
    pub start: usize,
    /// Last byte offset (inclusive)
    pub end: usize,
}

impl ByteWindow {
    /// Number of bytes covered by the window
    ///
    /// # Panics
    ///
    /// Debug builds panic on underflow if `start > end`. Parsed windows never
    /// have that shape.
    #[inline]
    pub const fn span(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Range header parse result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No Range header or malformed (ignore, return full content)
    NoRangeRequested,
    /// Valid range, already clamped to the content length
    Satisfiable(ByteWindow),
    /// Range cannot be served - should return 416
    Unsatisfiable,
}

/// What to do when the requested start offset lies at or past the end of the content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Answer 416 Range Not Satisfiable
    #[default]
    Unsatisfiable,
    /// Legacy behaviour: serve the first byte as window `0-0`
    Collapse,
}

impl RangePolicy {
    fn start_past_end(self, content_length: usize) -> RangeOutcome {
        match self {
            Self::Collapse if content_length > 0 => {
                RangeOutcome::Satisfiable(ByteWindow { start: 0, end: 0 })
            }
            _ => RangeOutcome::Unsatisfiable,
        }
    }
}

/// Parse HTTP Range header with the default [`RangePolicy`]
///
/// # Examples
/// ```
/// use range_fixture::http::range::{parse_range_header, ByteWindow, RangeOutcome};
///
/// let outcome = parse_range_header(Some("bytes=0-99"), 1000);
/// assert_eq!(outcome, RangeOutcome::Satisfiable(ByteWindow { start: 0, end: 99 }));
///
/// assert_eq!(parse_range_header(None, 1000), RangeOutcome::NoRangeRequested);
/// ```
pub fn parse_range_header(range_header: Option<&str>, content_length: usize) -> RangeOutcome {
    parse_range_header_with(range_header, content_length, RangePolicy::default())
}

/// Parse HTTP Range header (single range only, bytes unit)
///
/// Supported formats:
/// - `bytes=start-end` - Specific range, `end` clamped to the last byte
/// - `bytes=start-` - From start to end of content
///
/// Anything else (suffix ranges, multi-range lists, other units) is treated
/// as if no Range header was sent.
pub fn parse_range_header_with(
    range_header: Option<&str>,
    content_length: usize,
    policy: RangePolicy,
) -> RangeOutcome {
    let Some((start, end)) = range_header.and_then(parse_byte_range_spec) else {
        return RangeOutcome::NoRangeRequested;
    };

    if start >= content_length {
        return policy.start_past_end(content_length);
    }

    let last = content_length - 1;
    let end = end.map_or(last, |e| e.min(last));

    if start > end {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Satisfiable(ByteWindow { start, end })
}

/// Split `bytes=<start>-<end>?` into its offsets
fn parse_byte_range_spec(header: &str) -> Option<(usize, Option<usize>)> {
    let spec = header.strip_prefix("bytes=")?;
    let (start_str, end_str) = spec.split_once('-')?;

    let start = parse_offset(start_str)?;
    let end = if end_str.is_empty() {
        None
    } else {
        Some(parse_offset(end_str)?)
    };

    Some((start, end))
}

/// Parse a non-empty run of ASCII digits, saturating on overflow
fn parse_offset(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.bytes().fold(0usize, |acc, b| {
        acc.saturating_mul(10).saturating_add(usize::from(b - b'0'))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: usize, end: usize) -> RangeOutcome {
        RangeOutcome::Satisfiable(ByteWindow { start, end })
    }

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeOutcome::NoRangeRequested);
    }

    #[test]
    fn test_standard_range() {
        assert_eq!(parse_range_header(Some("bytes=0-9"), 100), window(0, 9));
        assert_eq!(parse_range_header(Some("bytes=42-42"), 100), window(42, 42));
    }

    #[test]
    fn test_open_range() {
        assert_eq!(parse_range_header(Some("bytes=50-"), 100), window(50, 99));
    }

    #[test]
    fn test_end_clamped() {
        assert_eq!(parse_range_header(Some("bytes=5-999999"), 100), window(5, 99));
        assert_eq!(parse_range_header(Some("bytes=0-100"), 100), window(0, 99));
    }

    #[test]
    fn test_huge_offsets_saturate() {
        assert_eq!(
            parse_range_header(Some("bytes=5-99999999999999999999999999"), 100),
            window(5, 99)
        );
        assert_eq!(
            parse_range_header(Some("bytes=99999999999999999999999999-"), 100),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_start_after_end() {
        assert_eq!(
            parse_range_header(Some("bytes=10-5"), 100),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_start_past_end_unsatisfiable_by_default() {
        assert_eq!(
            parse_range_header(Some("bytes=1000-2000"), 18),
            RangeOutcome::Unsatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=18-"), 18),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_start_past_end_collapse_policy() {
        assert_eq!(
            parse_range_header_with(Some("bytes=1000-2000"), 18, RangePolicy::Collapse),
            window(0, 0)
        );
        // No window exists in empty content
        assert_eq!(
            parse_range_header_with(Some("bytes=0-"), 0, RangePolicy::Collapse),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(
            parse_range_header(Some("bytes=0-0"), 0),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_malformed_is_ignored() {
        for header in [
            "",
            "bytes=",
            "bytes=-",
            "bytes=-20",
            "bytes=a-b",
            "bytes=1-b",
            "bytes=0-9,20-29",
            "bytes= 0-9",
            "bytes=+1-2",
            "items=0-9",
            "Bytes=0-9",
            "bytes=0-9-",
        ] {
            assert_eq!(
                parse_range_header(Some(header), 100),
                RangeOutcome::NoRangeRequested,
                "header {header:?}"
            );
        }
    }

    #[test]
    fn test_window_span() {
        assert_eq!(ByteWindow { start: 0, end: 10 }.span(), 11);
        assert_eq!(ByteWindow { start: 7, end: 7 }.span(), 1);
    }
}
