//! Parser for a plain-text double-entry ledger format, built on `chumsky`
//! parser combinators.
//!
//! Parsing never raises: every recoverable fault — an unknown option, a
//! duplicate metadata key, a cost spec on a `balance` directive — becomes
//! a [`Diagnostic`] appended to the result, and the parse continues to
//! the end of the file.
//!
//! # Example
//!
//! ```
//! use ledgerparse::parse_string;
//!
//! let source = r#"
//! 2024-01-15 * "Coffee Shop" "Morning coffee"
//!   Expenses:Food:Coffee  5.00 USD
//!   Assets:Cash
//! "#;
//!
//! let outcome = parse_string(source);
//! assert!(outcome.diagnostics.is_empty());
//! assert_eq!(outcome.directives.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod diagnostic;
mod location;
mod numeric;
mod options;
mod parser;
mod span;
mod state;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use options::Options;
pub use parser::ParseOutcome;
pub use span::{Span, Spanned};

use ledgerparse_core::Location;

/// Whether a negative per-unit or total cost/price is accepted without a
/// diagnostic. Off by default, matching the format's usual strictness;
/// set once at process start via [`set_allow_negative_prices`] before
/// parsing, since it applies uniformly to every parse run in the process.
static ALLOW_NEGATIVE_PRICES: AtomicBool = AtomicBool::new(false);

/// Allow (or forbid) negative costs and prices process-wide.
pub fn set_allow_negative_prices(allow: bool) {
    ALLOW_NEGATIVE_PRICES.store(allow, Ordering::Relaxed);
}

/// Whether negative costs and prices are currently allowed.
#[must_use]
pub fn allow_negative_prices() -> bool {
    ALLOW_NEGATIVE_PRICES.load(Ordering::Relaxed)
}

/// Parse source text that did not come from a named file.
///
/// Diagnostics and directive locations are attributed to
/// [`Location::STRING_SENTINEL`].
#[must_use]
pub fn parse_string(source: &str) -> ParseOutcome {
    let span = tracing::info_span!("parse_string", bytes = source.len());
    let _enter = span.enter();
    parser::parse(source, Location::STRING_SENTINEL)
}

/// Parse source text, attributing diagnostics and directive locations to
/// `name` instead of the default string sentinel.
#[must_use]
pub fn parse_string_named(source: &str, name: &str) -> ParseOutcome {
    let span = tracing::info_span!("parse_string_named", name, bytes = source.len());
    let _enter = span.enter();
    parser::parse(source, name.to_string())
}

/// Read and parse a ledger file from disk.
///
/// # Errors
///
/// Returns the underlying [`std::io::Error`] if `path` cannot be read.
pub fn parse_file(path: impl AsRef<Path>) -> std::io::Result<ParseOutcome> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let span = tracing::info_span!("parse_file", path = %path.display(), bytes = source.len());
    let _enter = span.enter();
    Ok(parser::parse(&source, path.display().to_string()))
}
