//! The ambient tag stack manipulated by `pushtag`/`poptag`.
//!
//! Process-local to one parse run: it is built fresh for every call to
//! [`crate::parse_string`] or [`crate::parse_file`] and never persists
//! across invocations.

use ledgerparse_core::Location;

use crate::diagnostic::Diagnostic;

/// Tracks currently-pushed tags for the duration of one parse.
#[derive(Debug, Clone, Default)]
pub struct TagStack {
    tags: Vec<String>,
}

impl TagStack {
    /// Create an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Push a tag onto the stack.
    pub fn push(&mut self, tag: String) {
        self.tags.push(tag);
    }

    /// Pop the most recent occurrence of `tag` from the stack.
    ///
    /// Returns a `ParserError "absent tag"` diagnostic if `tag` was not
    /// on the stack.
    pub fn pop(&mut self, tag: &str, location: Location) -> Option<Diagnostic> {
        if let Some(pos) = self.tags.iter().rposition(|t| t == tag) {
            self.tags.remove(pos);
            None
        } else {
            Some(Diagnostic::parser_error(
                location,
                format!("absent tag: '{tag}'"),
            ))
        }
    }

    /// The tags currently on the stack, in push order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Consume the stack at end of input, producing one
    /// `ParserError "Unbalanced tag"` diagnostic per tag left pushed.
    #[must_use]
    pub fn finish(self, location: Location) -> Vec<Diagnostic> {
        self.tags
            .into_iter()
            .map(|tag| {
                Diagnostic::parser_error(
                    location.clone(),
                    format!("Unbalanced tag: '{tag}' was never popped"),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new("<string>", 1)
    }

    #[test]
    fn test_push_then_pop_balances() {
        let mut stack = TagStack::new();
        stack.push("trip".to_string());
        assert!(stack.pop("trip", loc()).is_none());
        assert!(stack.tags().is_empty());
    }

    #[test]
    fn test_pop_absent_tag_emits_diagnostic() {
        let mut stack = TagStack::new();
        let diag = stack.pop("trip-to-nowhere", loc());
        assert!(diag.is_some());
        assert!(diag.unwrap().message.contains("absent tag"));
    }

    #[test]
    fn test_unbalanced_stack_at_finish() {
        let mut stack = TagStack::new();
        stack.push("trip-to-nowhere".to_string());
        let diags = stack.finish(loc());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("Unbalanced tag"));
    }
}
