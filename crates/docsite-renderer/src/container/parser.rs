//! Container fence parsing.

use crate::fence::MAX_INDENT;

/// Minimum number of colons in a container fence.
const MIN_COLONS: usize = 3;

/// A container fence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fence<'a> {
    /// `::: params` with the raw text after the colons.
    Open { colons: usize, params: &'a str },
    /// A line of colons only.
    Close { colons: usize },
}

/// Parse a line as a container fence.
///
/// Returns `None` if the line is not a fence.
pub(crate) fn parse_fence(line: &str) -> Option<Fence<'_>> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > MAX_INDENT {
        return None;
    }

    let marker = &line[indent..];
    let colons = marker.bytes().take_while(|&b| b == b':').count();
    if colons < MIN_COLONS {
        return None;
    }

    let params = &marker[colons..];
    if params.trim().is_empty() {
        Some(Fence::Close { colons })
    } else {
        Some(Fence::Open { colons, params })
    }
}
