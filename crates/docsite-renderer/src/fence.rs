//! Code fence tracking.
//!
//! Container syntax inside fenced code blocks is literal text and must not be
//! rendered, so line-based processing needs to know when it is inside one.

/// Maximum indentation before a fence; deeper lines are indented code.
pub(crate) const MAX_INDENT: usize = 3;

/// Tracks whether line-by-line processing is inside a fenced code block.
///
/// Fences open with three or more backticks or tildes indented by at most
/// three spaces; the closing fence must use the same character, be at least
/// as long, and carry nothing else.
#[derive(Debug, Default)]
pub(crate) struct CodeFences {
    open: Option<(char, usize)>,
}

impl CodeFences {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// True while inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` if it opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > MAX_INDENT {
            return false;
        }
        let trimmed = &line[indent..];
        let Some((ch, len)) = fence_marker(trimmed) else {
            return false;
        };

        match self.open {
            None => {
                self.open = Some((ch, len));
                true
            }
            Some((open_ch, open_len))
                if ch == open_ch && len >= open_len && trimmed[len..].trim().is_empty() =>
            {
                self.open = None;
                true
            }
            Some(_) => false,
        }
    }
}

/// Fence character and run length if `trimmed` starts with a code fence.
fn fence_marker(trimmed: &str) -> Option<(char, usize)> {
    let ch = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = trimmed.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}
