//! The recognized-options table and the `option` directive's semantics.

use ledgerparse_core::Location;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::diagnostic::Diagnostic;

/// Accumulated option state for one parse run.
///
/// Scalar options store the last assigned value; list-valued options
/// (`documents`, `include`, `plugin`) append in written order.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// `title` — free-form ledger title.
    pub title: String,
    /// `documents` — directories scanned for account documents.
    pub documents: Vec<String>,
    /// `include` — paths named by `include` directives or `option "include"`.
    pub include: Vec<String>,
    /// `plugin` — `(module name, config string)` pairs, from both the
    /// `plugin` directive and the deprecated `option "plugin"` form.
    pub plugin: Vec<(String, Option<String>)>,
    /// `render_commas` — whether downstream pretty-printers should group
    /// thousands with commas.
    pub render_commas: bool,
    /// `plugin_processing_mode` — `"default"` or `"raw"`.
    pub plugin_processing_mode: String,
    /// `tolerance` — deprecated scalar tolerance, default `0.015`.
    pub tolerance: Decimal,
    /// `default_tolerance` — ordered `currency -> tolerance` mapping;
    /// `"*"` is the wildcard key.
    pub default_tolerance: Vec<(String, Decimal)>,
    /// `filename` — read-only; set once by the caller, not by `option`.
    pub filename: String,
}

impl Options {
    /// Create the default option set (matches the canonical defaults table).
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: String::new(),
            documents: Vec::new(),
            include: Vec::new(),
            plugin: Vec::new(),
            render_commas: false,
            plugin_processing_mode: "default".to_string(),
            tolerance: Decimal::new(15, 3), // 0.015
            default_tolerance: Vec::new(),
            filename: String::new(),
        }
    }

    /// Apply an `option "name" "value"` directive.
    ///
    /// Returns any diagnostics raised: an unknown or read-only name
    /// yields a `ParserError` and leaves state unchanged; a deprecated
    /// name still applies but also yields a `DeprecatedWarning`.
    #[must_use]
    pub fn set(&mut self, name: &str, value: &str, location: Location) -> Vec<Diagnostic> {
        match name {
            "title" => {
                self.title = value.to_string();
                vec![]
            }
            "documents" => {
                self.documents.push(value.to_string());
                vec![]
            }
            "include" => {
                self.include.push(value.to_string());
                vec![]
            }
            "plugin" => {
                let (module, config) = match value.split_once(':') {
                    Some((m, c)) => (m.to_string(), Some(c.to_string())),
                    None => (value.to_string(), None),
                };
                self.plugin.push((module, config));
                vec![Diagnostic::deprecated(
                    location,
                    "option \"plugin\" is deprecated; use the plugin directive",
                )]
            }
            "render_commas" => match parse_bool(value) {
                Some(b) => {
                    self.render_commas = b;
                    vec![]
                }
                None => vec![Diagnostic::parser_error(
                    location,
                    format!("Error for option 'render_commas': invalid boolean '{value}'"),
                )],
            },
            "plugin_processing_mode" => {
                if value == "default" || value == "raw" {
                    self.plugin_processing_mode = value.to_string();
                    vec![]
                } else {
                    vec![Diagnostic::parser_error(
                        location,
                        format!(
                            "Error for option 'plugin_processing_mode': unrecognized value '{value}'"
                        ),
                    )]
                }
            }
            "tolerance" => match Decimal::from_str(value) {
                Ok(d) => {
                    self.tolerance = d;
                    vec![Diagnostic::deprecated(
                        location,
                        "option \"tolerance\" is deprecated; use default_tolerance",
                    )]
                }
                Err(_) => vec![Diagnostic::parser_error(
                    location,
                    format!("Error for option 'tolerance': invalid decimal '{value}'"),
                )],
            },
            "default_tolerance" => match value.split_once(':') {
                Some((currency, number)) => match Decimal::from_str(number) {
                    Ok(d) => {
                        self.default_tolerance.push((currency.to_string(), d));
                        vec![]
                    }
                    Err(_) => vec![Diagnostic::parser_error(
                        location,
                        format!("Error for option 'default_tolerance': invalid decimal '{number}'"),
                    )],
                },
                None => vec![Diagnostic::parser_error(
                    location,
                    format!(
                        "Error for option 'default_tolerance': expected 'CURRENCY:decimal', got '{value}'"
                    ),
                )],
            },
            "filename" => vec![Diagnostic::parser_error(
                location,
                "Option 'filename' is read-only",
            )],
            _ => vec![Diagnostic::parser_error(
                location,
                format!("Unknown option: '{name}'"),
            )],
        }
    }

    /// Record a `plugin` directive (distinct from `option "plugin"`, but
    /// appending to the same list — the open question says append
    /// twice rather than deduplicate).
    pub fn add_plugin_directive(&mut self, name: String, config: Option<String>) {
        self.plugin.push((name, config));
    }

    /// Record an `include` directive.
    pub fn add_include_directive(&mut self, path: String) {
        self.include.push(path);
    }
}

/// Parse a boolean option value: `1`/`TRUE` (case-insensitive) are
/// `true`; `0`/`FALSE` are `false`.
fn parse_bool(value: &str) -> Option<bool> {
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new("<string>", 1)
    }

    #[test]
    fn test_unknown_option_is_an_error() {
        let mut opts = Options::new();
        let diags = opts.set("bogus", "x", loc());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("Unknown option"));
    }

    #[test]
    fn test_filename_is_read_only() {
        let mut opts = Options::new();
        let diags = opts.set("filename", "foo.beancount", loc());
        assert_eq!(diags.len(), 1);
        assert!(opts.filename.is_empty());
    }

    #[test]
    fn test_documents_appends_in_order() {
        let mut opts = Options::new();
        opts.set("documents", "/path/docs/a", loc());
        opts.set("documents", "/path/docs/b", loc());
        opts.set("documents", "/path/docs/c", loc());
        assert_eq!(
            opts.documents,
            vec!["/path/docs/a", "/path/docs/b", "/path/docs/c"]
        );
    }

    #[test]
    fn test_deprecated_plugin_option_still_applies() {
        let mut opts = Options::new();
        let diags = opts.set("plugin", "beancount.plugins.auto:cfg", loc());
        assert_eq!(diags.len(), 1);
        assert_eq!(
            opts.plugin,
            vec![("beancount.plugins.auto".to_string(), Some("cfg".to_string()))]
        );
    }

    #[test]
    fn test_plugin_directive_and_option_both_append() {
        let mut opts = Options::new();
        opts.set("plugin", "foo", loc());
        opts.add_plugin_directive("foo".to_string(), None);
        assert_eq!(opts.plugin.len(), 2);
    }

    #[test]
    fn test_boolean_parses_one_and_true_case_insensitive() {
        let mut opts = Options::new();
        opts.set("render_commas", "TrUe", loc());
        assert!(opts.render_commas);
        opts.set("render_commas", "0", loc());
        assert!(!opts.render_commas);
    }

    #[test]
    fn test_enum_rejects_unrecognized_value() {
        let mut opts = Options::new();
        let diags = opts.set("plugin_processing_mode", "turbo", loc());
        assert!(diags[0].message.starts_with("Error for option"));
        assert_eq!(opts.plugin_processing_mode, "default");
    }

    #[test]
    fn test_default_tolerance_wildcard_key() {
        let mut opts = Options::new();
        opts.set("default_tolerance", "*:0.005", loc());
        assert_eq!(
            opts.default_tolerance,
            vec![("*".to_string(), Decimal::new(5, 3))]
        );
    }
}
