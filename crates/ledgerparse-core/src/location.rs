//! Source locations attached to every directive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where a directive began in its source text.
///
/// `filename` is a sentinel such as `<string>` or `<stdin>` when the
/// input did not come from a real file on disk. `line` is the
/// 1-based line number of the directive's first token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Source file name, or a sentinel like `<string>`/`<stdin>`.
    pub filename: Arc<str>,
    /// 1-based line number.
    pub line: u32,
}

impl Location {
    /// The sentinel filename used when parsing an in-memory string
    /// without an explicit report filename.
    pub const STRING_SENTINEL: &'static str = "<string>";
    /// The sentinel filename used when parsing standard input.
    pub const STDIN_SENTINEL: &'static str = "<stdin>";

    /// Create a new location.
    #[must_use]
    pub fn new(filename: impl Into<Arc<str>>, line: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = Location::new("ledger.beancount", 42);
        assert_eq!(format!("{loc}"), "ledger.beancount:42");
    }

    #[test]
    fn test_location_sentinel() {
        let loc = Location::new(Location::STRING_SENTINEL, 1);
        assert_eq!(&*loc.filename, "<string>");
    }
}
