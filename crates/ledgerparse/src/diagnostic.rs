//! The four-kind diagnostic taxonomy the parser appends to instead of
//! raising: every recoverable fault becomes a [`Diagnostic`] and the
//! parse continues.

use ledgerparse_core::Location;
use std::fmt;

use crate::span::Span;

/// The kind of recoverable fault a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An unrecognized byte, malformed account, or other token-level fault.
    /// Recovery skips to the next newline.
    LexerError,
    /// The token stream did not match the grammar at this point (e.g. a
    /// cost specification on a `balance` directive). Recovery discards
    /// tokens up to the next directive-starting date or keyword.
    ParserSyntaxError,
    /// The grammar matched but a semantic rule failed (unknown option,
    /// duplicate metadata key, too many header strings, zero units with
    /// a cost, negative cost without the allow flag, ...). The offending
    /// directive is dropped; parsing continues.
    ParserError,
    /// Semantically accepted but flagged for the user's attention. Does
    /// not drop anything.
    DeprecatedWarning,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LexerError => "lexer error",
            Self::ParserSyntaxError => "syntax error",
            Self::ParserError => "parser error",
            Self::DeprecatedWarning => "deprecated",
        };
        write!(f, "{s}")
    }
}

/// A structured, non-fatal error or warning produced while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What kind of fault this is.
    pub kind: DiagnosticKind,
    /// Where in the source this diagnostic was raised.
    pub location: Location,
    /// Human-readable description.
    pub message: String,
    /// The token or entity the diagnostic concerns, for later correlation
    /// with the directive stream (e.g. an option name, an account).
    pub offending_entity: Option<String>,
    /// Byte span within the source, when known, used only for rendering.
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Construct a new diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            message: message.into(),
            offending_entity: None,
            span: None,
        }
    }

    /// Attach the offending entity's name for correlation.
    #[must_use]
    pub fn with_offending_entity(mut self, entity: impl Into<String>) -> Self {
        self.offending_entity = Some(entity.into());
        self
    }

    /// Attach the byte span that produced this diagnostic, for rendering.
    #[must_use]
    pub const fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Build a [`DiagnosticKind::LexerError`].
    #[must_use]
    pub fn lexer_error(location: Location, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::LexerError, location, message)
    }

    /// Build a [`DiagnosticKind::ParserSyntaxError`].
    #[must_use]
    pub fn syntax_error(location: Location, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ParserSyntaxError, location, message)
    }

    /// Build a [`DiagnosticKind::ParserError`].
    #[must_use]
    pub fn parser_error(location: Location, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::ParserError, location, message)
    }

    /// Build a [`DiagnosticKind::DeprecatedWarning`].
    #[must_use]
    pub fn deprecated(location: Location, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::DeprecatedWarning, location, message)
    }

    /// Whether this diagnostic's kind causes the containing directive to
    /// be dropped (`ParserSyntaxError` and `ParserError` do;
    /// `LexerError` recovers at the token level; `DeprecatedWarning`
    /// never drops anything).
    #[must_use]
    pub const fn drops_directive(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::ParserSyntaxError | DiagnosticKind::ParserError
        )
    }

    /// Render this diagnostic as a source-annotated report, given the
    /// original source text. Falls back to the plain [`Display`] form
    /// when no byte span was recorded.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        let Some(span) = self.span else {
            return self.to_string();
        };
        let mut buf = Vec::new();
        let filename = self.location.filename.to_string();
        let report = ariadne::Report::build(
            ariadne::ReportKind::Custom(
                match self.kind {
                    DiagnosticKind::LexerError => "lexer error",
                    DiagnosticKind::ParserSyntaxError => "syntax error",
                    DiagnosticKind::ParserError => "error",
                    DiagnosticKind::DeprecatedWarning => "warning",
                },
                ariadne::Color::Red,
            ),
            (filename.clone(), span.into_range()),
        )
        .with_message(&self.message)
        .with_label(
            ariadne::Label::new((filename.clone(), span.into_range())).with_message(&self.message),
        )
        .finish();

        let _ = report.write(
            (filename.clone(), ariadne::Source::from(source)),
            &mut buf,
        );
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.location, self.message, self.kind)
    }
}

impl std::error::Error for Diagnostic {}
