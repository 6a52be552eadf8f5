//! Property-based tests for parser-level invariants.
//!
//! These check behavior that should hold for arbitrary inputs, not just
//! the handful of fixed fixtures in `parser_integration_test.rs`.
//!
//! Run with: cargo test -p ledgerparse --test property_tests

use ledgerparse::{parse_string, set_allow_negative_prices};
use proptest::prelude::*;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_account() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Assets:Cash".to_string()),
        Just("Assets:Checking".to_string()),
        Just("Expenses:Food".to_string()),
        Just("Expenses:Rent".to_string()),
        Just("Income:Salary".to_string()),
        Just("Liabilities:CreditCard".to_string()),
    ]
}

fn arb_currency() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("USD"), Just("EUR"), Just("GBP")]
}

fn arb_amount_number() -> impl Strategy<Value = i64> {
    1i64..100_000i64
}

fn arb_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("trip".to_string()),
        Just("work".to_string()),
        Just("recurring".to_string()),
    ]
}

/// Build a single balanced transaction directive as source text, pairing
/// an explicit debit with an automatic posting that absorbs the rest.
fn transaction_source(
    year: i32,
    month: u32,
    day: u32,
    narration: &str,
    account: &str,
    other_account: &str,
    cents: i64,
    currency: &str,
    tag: Option<&str>,
) -> String {
    let tag_suffix = tag.map(|t| format!(" #{t}")).unwrap_or_default();
    format!(
        "{year:04}-{month:02}-{day:02} * \"{narration}\"{tag_suffix}\n  {account}  {cents}.00 {currency}\n  {other_account}\n"
    )
}

fn arb_transaction_source() -> impl Strategy<Value = String> {
    (
        2000i32..2100i32,
        1u32..13u32,
        1u32..28u32,
        arb_account(),
        arb_account(),
        arb_amount_number(),
        arb_currency(),
        prop::option::of(arb_tag()),
    )
        .prop_filter_map("accounts must differ", |(y, m, d, a1, a2, cents, cur, tag)| {
            if a1 == a2 {
                return None;
            }
            Some(transaction_source(
                y,
                m,
                d,
                "Narration",
                &a1,
                &a2,
                cents,
                cur,
                tag.as_deref(),
            ))
        })
}

// ============================================================================
// Invariant 1: directive count is bounded by the number of headers, and
// order matches source order.
// ============================================================================

proptest! {
    #[test]
    fn prop_directive_count_bounded_by_headers(source in arb_transaction_source()) {
        let outcome = parse_string(&source);
        let header_count = source.lines().filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_digit())).count();
        prop_assert!(outcome.directives.len() <= header_count);
    }

    #[test]
    fn prop_directive_order_matches_source_order(sources in prop::collection::vec(arb_transaction_source(), 1..5)) {
        let combined = sources.concat();
        let outcome = parse_string(&combined);
        let linenos: Vec<_> = outcome.directives.iter().map(|d| d.location().line).collect();
        let mut sorted = linenos.clone();
        sorted.sort_unstable();
        // Each generated transaction occupies its own block of source
        // lines in the order it was concatenated, so surviving directives
        // must come back in non-decreasing line-number order.
        prop_assert_eq!(linenos, sorted);
    }
}

// ============================================================================
// Invariant 2: every directive's line number is within bounds, and
// distinct directives beginning on distinct lines get distinct locations.
// ============================================================================

proptest! {
    #[test]
    fn prop_directive_lineno_in_bounds(sources in prop::collection::vec(arb_transaction_source(), 1..5)) {
        let combined = sources.concat();
        let total_lines = combined.lines().count() as u32;
        let outcome = parse_string(&combined);
        for directive in &outcome.directives {
            prop_assert!(directive.location().line >= 1);
            prop_assert!(directive.location().line <= total_lines);
        }
    }

    #[test]
    fn prop_distinct_directives_have_distinct_locations(
        sources in prop::collection::vec(arb_transaction_source(), 2..5)
    ) {
        let combined = sources.concat();
        let outcome = parse_string(&combined);
        let mut seen = std::collections::HashSet::new();
        for directive in &outcome.directives {
            let key = (directive.location().filename.clone(), directive.location().line);
            prop_assert!(seen.insert(key), "duplicate directive location");
        }
    }
}

// ============================================================================
// Invariant 3: a transaction's tags are a superset of the ambient tag
// stack active at its parse point.
// ============================================================================

proptest! {
    #[test]
    fn prop_transaction_tags_include_ambient_tags(
        tag in arb_tag(),
        source in arb_transaction_source()
    ) {
        let wrapped = format!("pushtag #{tag}\n{source}poptag #{tag}\n");
        let outcome = parse_string(&wrapped);
        let txn = outcome.directives.iter().find_map(ledgerparse_core::Directive::as_transaction);
        if let Some(txn) = txn {
            prop_assert!(txn.tags.contains(&tag));
        }
    }
}

// ============================================================================
// Invariant 4: without the negative-price/cost flag, every kept posting's
// price and cost are non-negative.
// ============================================================================

proptest! {
    #[test]
    fn prop_no_negative_price_without_flag(cents in 1i64..100_000i64, currency in arb_currency()) {
        set_allow_negative_prices(false);
        let source = format!(
            "2024-01-15 * \"Buy\"\n  Assets:Investments  10 STOCK @ -{cents}.00 {currency}\n  Assets:Cash\n"
        );
        let outcome = parse_string(&source);
        for directive in &outcome.directives {
            if let Some(txn) = directive.as_transaction() {
                for posting in &txn.postings {
                    if let Some(price) = &posting.price {
                        if let Some(amount) = price.amount() {
                            prop_assert!(amount.number >= rust_decimal::Decimal::ZERO);
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Invariant 6: whitespace/comment-only input yields nothing.
// ============================================================================

proptest! {
    #[test]
    fn prop_blank_input_yields_empty_output(
        blank_lines in prop::collection::vec(prop_oneof![
            Just(String::new()),
            Just("   ".to_string()),
            Just("; a comment".to_string()),
            Just("  ; an indented comment".to_string()),
        ], 0..10)
    ) {
        let mut source = blank_lines.join("\n");
        source.push('\n');
        let outcome = parse_string(&source);
        prop_assert!(outcome.directives.is_empty());
        prop_assert!(outcome.diagnostics.is_empty());
    }
}

// ============================================================================
// Invariant 5: parsing, re-rendering via Display, and reparsing a
// transaction directive is idempotent on its structural fields.
// ============================================================================

proptest! {
    #[test]
    fn prop_transaction_reparse_idempotent(source in arb_transaction_source()) {
        let first = parse_string(&source);
        let Some(txn) = first.directives.iter().find_map(ledgerparse_core::Directive::as_transaction) else {
            return Ok(());
        };
        let rendered = format!("{txn}\n");
        let second = parse_string(&rendered);
        let Some(reparsed) = second.directives.iter().find_map(ledgerparse_core::Directive::as_transaction) else {
            prop_assert!(false, "re-rendered transaction failed to reparse: {rendered}");
            return Ok(());
        };
        prop_assert_eq!(&txn.date, &reparsed.date);
        prop_assert_eq!(&txn.narration, &reparsed.narration);
        prop_assert_eq!(&txn.tags, &reparsed.tags);
        prop_assert_eq!(txn.postings.len(), reparsed.postings.len());
    }
}
