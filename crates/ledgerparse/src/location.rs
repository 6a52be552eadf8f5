//! Byte-offset to line-number translation for diagnostics and directives.

use ledgerparse_core::Location;
use std::sync::Arc;

/// Maps byte offsets into a source string to 1-based line numbers.
///
/// Built once per parse run from the full source text, then queried
/// for every token span the grammar driver produces.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line, in order.
    line_starts: Vec<usize>,
    filename: Arc<str>,
}

impl LineIndex {
    /// Build a line index over `source`, attributing locations to `filename`.
    #[must_use]
    pub fn new(source: &str, filename: impl Into<Arc<str>>) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            filename: filename.into(),
        }
    }

    /// The 1-based line number containing byte offset `pos`.
    #[must_use]
    pub fn line_at(&self, pos: usize) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(i) => (i + 1) as u32,
            Err(i) => i as u32,
        }
    }

    /// Build a [`Location`] for byte offset `pos`.
    #[must_use]
    pub fn location_at(&self, pos: usize) -> Location {
        Location::new(self.filename.clone(), self.line_at(pos))
    }
}
