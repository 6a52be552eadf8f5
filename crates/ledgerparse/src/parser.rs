//! Grammar driver and builder.
//!
//! Uses chumsky for parser combinators directly over the source text:
//! there is no separate token stream, so scanning and grammar-matching
//! are fused into one set of combinators, the way the teacher's
//! original parser worked. What changed is what happens once a
//! directive's shape has been recognized: every semantic rule that can
//! fail (duplicate metadata keys, a zero-unit cost, too many strings in
//! a transaction header, ...) now produces a [`Diagnostic`] instead of
//! a hard parser error, and the grammar keeps going.
//!
//! # Organization
//!
//! 1. Main driver (`parse`) and the tag/options/diagnostics plumbing
//! 2. File structure: entries, blank lines, special (non-dated) lines
//! 3. Primitives: strings, dates, numbers, accounts, tags, links, metadata
//! 4. Amounts, cost specs, price annotations
//! 5. Transactions and postings
//! 6. The other eleven directive bodies

use chumsky::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

use chrono::NaiveDate;
use ledgerparse_core::{
    Amount, Balance, Close, Commodity, CostSpec, Custom, Directive, Document, Event,
    IncompleteAmount, Location, MetaValue, Metadata, Note, Open, Pad, Posting, Price,
    PriceAnnotation, Query, Transaction,
};

use crate::diagnostic::Diagnostic;
use crate::location::LineIndex;
use crate::numeric::expr as numeric_expr;
use crate::options::Options;
use crate::span::Span;
use crate::state::TagStack;

type ParserInput<'a> = &'a str;
type ParserExtra<'a> = extra::Err<Rich<'a, char>>;

/// Everything the grammar driver produced from one source file.
#[derive(Debug)]
pub struct ParseOutcome {
    /// Directives that survived semantic validation, in source order.
    pub directives: Vec<Directive>,
    /// Accumulated option state, including `include`/`plugin` lists.
    pub options: Options,
    /// Every recoverable fault encountered while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Drive the grammar over `source`, attributing locations to `filename`.
pub fn parse(source: &str, filename: impl Into<Arc<str>>) -> ParseOutcome {
    let filename = filename.into();
    let line_index = LineIndex::new(source, filename.clone());

    let (items, errs) = file_parser().parse(source).into_output_errors();
    let items = items.unwrap_or_default();

    let mut directives = Vec::new();
    let mut options = Options::new();
    let mut diagnostics = Vec::new();
    let mut tag_stack = TagStack::new();

    for (item, span) in items {
        let location = line_index.location_at(span.start);
        match item {
            ParsedItem::Directive(build) => {
                let outcome = build(location.clone());
                diagnostics.extend(outcome.diagnostics);
                if let Some(directive) = outcome.directive {
                    let directive = apply_ambient_tags(directive, tag_stack.tags());
                    directives.push(directive);
                }
            }
            ParsedItem::Option(name, value) => {
                diagnostics.extend(options.set(&name, &value, location));
            }
            ParsedItem::Include(path) => options.add_include_directive(path),
            ParsedItem::Plugin(name, config) => options.add_plugin_directive(name, config),
            ParsedItem::Pushtag(tag) => tag_stack.push(tag),
            ParsedItem::Poptag(tag) => {
                if let Some(diag) = tag_stack.pop(&tag, location) {
                    diagnostics.push(diag);
                }
            }
            ParsedItem::InvalidDate(raw, span) => {
                diagnostics.push(
                    Diagnostic::lexer_error(location, format!("invalid date: '{raw}'"))
                        .with_span(span),
                );
            }
            ParsedItem::Skipped(span) => {
                diagnostics.push(
                    Diagnostic::syntax_error(location, "unrecognized input, line skipped")
                        .with_span(span),
                );
            }
        }
    }

    for e in &errs {
        let span = to_span(*e.span());
        let location = line_index.location_at(span.start);
        let message = e.to_string();
        let diagnostic = match message.strip_prefix("ParserError: ") {
            Some(rest) => Diagnostic::parser_error(location, rest.to_string()),
            None => Diagnostic::syntax_error(location, message),
        };
        diagnostics.push(diagnostic.with_span(span));
    }

    let eof_location = line_index.location_at(source.len());
    diagnostics.extend(tag_stack.finish(eof_location));

    ParseOutcome {
        directives,
        options,
        diagnostics,
    }
}

const fn to_span(s: SimpleSpan) -> Span {
    Span::new(s.start, s.end)
}

/// A directive is reduced from parsed pieces to a concrete value only
/// once its date is known, so that semantic failures (zero-unit cost,
/// too many header strings, ...) can be reported against the right
/// location and drop just that directive.
struct BuildOutcome {
    directive: Option<Directive>,
    diagnostics: Vec<Diagnostic>,
}

impl BuildOutcome {
    fn ok(directive: Directive) -> Self {
        Self {
            directive: Some(directive),
            diagnostics: Vec::new(),
        }
    }

    fn ok_with(directive: Directive, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            directive: Some(directive),
            diagnostics,
        }
    }

    fn dropped(diagnostic: Diagnostic) -> Self {
        Self {
            directive: None,
            diagnostics: vec![diagnostic],
        }
    }
}

type BuildFn<'a> = Box<dyn Fn(Location) -> BuildOutcome + 'a>;

fn apply_ambient_tags(directive: Directive, ambient: &[String]) -> Directive {
    match directive {
        Directive::Transaction(mut txn) => {
            for tag in ambient {
                txn.tags.insert(tag.clone());
            }
            Directive::Transaction(txn)
        }
        other => other,
    }
}

/// Items that can appear at the top level of a source file.
enum ParsedItem<'a> {
    Directive(BuildFn<'a>),
    Option(String, String),
    Include(String),
    Plugin(String, Option<String>),
    Pushtag(String),
    Poptag(String),
    InvalidDate(String, Span),
    Skipped(Span),
}

fn file_parser<'a>(
) -> impl Parser<'a, ParserInput<'a>, Vec<(ParsedItem<'a>, SimpleSpan)>, ParserExtra<'a>> {
    skip_blank_lines().ignore_then(
        entry_parser()
            .map_with(|item, e| (item, e.span()))
            .recover_with(via_parser(
                any()
                    .then(none_of("\r\n").repeated())
                    .then_ignore(newline().or_not())
                    .map_with(|_, e| ParsedItem::Skipped(to_span(e.span())))
                    .map_with(|item, e| (item, e.span())),
            ))
            .then_ignore(skip_blank_lines())
            .repeated()
            .collect::<Vec<_>>(),
    )
}

fn skip_blank_lines<'a>() -> impl Parser<'a, ParserInput<'a>, (), ParserExtra<'a>> + Clone {
    choice((
        ws().then_ignore(newline()),
        ws().then_ignore(just(';'))
            .then_ignore(none_of("\r\n").repeated())
            .then_ignore(newline()),
        just('*')
            .then(none_of("\r\n").repeated())
            .then_ignore(newline())
            .ignored(),
    ))
    .repeated()
    .ignored()
}

fn entry_parser<'a>() -> impl Parser<'a, ParserInput<'a>, ParsedItem<'a>, ParserExtra<'a>> {
    choice((
        dated_directive().map(ParsedItem::Directive),
        invalid_date_line(),
        option_directive(),
        include_directive(),
        plugin_directive(),
        pushtag_directive(),
        poptag_directive(),
        ws().ignore_then(just(';'))
            .then(none_of("\r\n").repeated())
            .map_with(|_, e| ParsedItem::Skipped(to_span(e.span()))),
    ))
}

fn ws<'a>() -> impl Parser<'a, ParserInput<'a>, (), ParserExtra<'a>> + Clone {
    one_of(" \t").repeated().ignored()
}

fn ws1<'a>() -> impl Parser<'a, ParserInput<'a>, (), ParserExtra<'a>> + Clone {
    one_of(" \t").repeated().at_least(1).ignored()
}

fn newline<'a>() -> impl Parser<'a, ParserInput<'a>, (), ParserExtra<'a>> + Clone {
    just('\n')
        .ignored()
        .or(just('\r').ignore_then(just('\n')).ignored())
}

fn comment_line<'a>() -> impl Parser<'a, ParserInput<'a>, (), ParserExtra<'a>> {
    ws().then(just(';').then(none_of("\r\n").repeated())).ignored()
}

fn option_directive<'a>() -> impl Parser<'a, ParserInput<'a>, ParsedItem<'a>, ParserExtra<'a>> {
    just("option")
        .ignore_then(ws1())
        .ignore_then(string_literal())
        .then_ignore(ws1())
        .then(string_literal())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(|(k, v)| ParsedItem::Option(k, v))
}

fn include_directive<'a>() -> impl Parser<'a, ParserInput<'a>, ParsedItem<'a>, ParserExtra<'a>> {
    just("include")
        .ignore_then(ws1())
        .ignore_then(string_literal())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(ParsedItem::Include)
}

fn plugin_directive<'a>() -> impl Parser<'a, ParserInput<'a>, ParsedItem<'a>, ParserExtra<'a>> {
    just("plugin")
        .ignore_then(ws1())
        .ignore_then(string_literal())
        .then(ws1().ignore_then(string_literal()).or_not())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(|(name, config)| ParsedItem::Plugin(name, config))
}

fn pushtag_directive<'a>() -> impl Parser<'a, ParserInput<'a>, ParsedItem<'a>, ParserExtra<'a>> {
    just("pushtag")
        .ignore_then(ws1())
        .ignore_then(just('#'))
        .ignore_then(tag_name())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(ParsedItem::Pushtag)
}

fn poptag_directive<'a>() -> impl Parser<'a, ParserInput<'a>, ParsedItem<'a>, ParserExtra<'a>> {
    just("poptag")
        .ignore_then(ws1())
        .ignore_then(just('#'))
        .ignore_then(tag_name())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(ParsedItem::Poptag)
}

fn tag_name<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    one_of("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_")
        .repeated()
        .at_least(1)
        .collect()
}

fn multiline_string<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    just("\"\"\"")
        .ignore_then(
            any()
                .and_is(just("\"\"\"").not())
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just("\"\"\""))
}

fn single_line_string<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    just('"')
        .ignore_then(
            none_of("\"\\")
                .or(just('\\').ignore_then(any()))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'))
}

fn string_literal<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    multiline_string().or(single_line_string())
}

fn date_digits<'a>() -> impl Parser<'a, ParserInput<'a>, &'a str, ParserExtra<'a>> + Clone {
    one_of("0123456789").repeated().at_least(1).to_slice()
}

fn date<'a>() -> impl Parser<'a, ParserInput<'a>, NaiveDate, ParserExtra<'a>> + Clone {
    date_digits()
        .then_ignore(just('-').or(just('/')))
        .then(date_digits())
        .then_ignore(just('-').or(just('/')))
        .then(date_digits())
        .try_map(|((year, month), day): ((&str, &str), &str), span| {
            let y: i32 = year.parse().map_err(|_| Rich::custom(span, "invalid year"))?;
            let m: u32 = month.parse().map_err(|_| Rich::custom(span, "invalid month"))?;
            let d: u32 = day.parse().map_err(|_| Rich::custom(span, "invalid day"))?;
            NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| Rich::custom(span, "invalid date"))
        })
}

/// Matches a structurally date-shaped prefix (`\d+[-/]\d+[-/]\d+`) whose
/// value failed to form a real calendar date, and swallows the rest of
/// the line. Tried only after [`dated_directive`] has already failed to
/// match, so it only fires on the invalid-date path.
fn invalid_date_line<'a>() -> impl Parser<'a, ParserInput<'a>, ParsedItem<'a>, ParserExtra<'a>> {
    date_digits()
        .then_ignore(just('-').or(just('/')))
        .then(date_digits())
        .then_ignore(just('-').or(just('/')))
        .then(date_digits())
        .then_ignore(none_of("\r\n").repeated())
        .map_with(|((y, m), d): ((&str, &str), &str), e| {
            ParsedItem::InvalidDate(format!("{y}-{m}-{d}"), to_span(e.span()))
        })
}

fn digits<'a>() -> impl Parser<'a, ParserInput<'a>, &'a str, ParserExtra<'a>> + Clone {
    one_of("0123456789").repeated().at_least(1).to_slice()
}

/// A decimal-valued number, built from an arithmetic expression tree so
/// that a division by zero is reported rather than panicking. A zero
/// divisor is tagged with a recognizable prefix so the caller that
/// collects parser-level diagnostics can promote it from a generic
/// syntax error to a semantic `ParserError`.
fn number<'a>() -> impl Parser<'a, ParserInput<'a>, Decimal, ParserExtra<'a>> + Clone {
    numeric_expr().try_map(|tree, span| {
        tree.eval()
            .map_err(|_| Rich::custom(span, "ParserError: Amount expression divides by zero"))
    })
}

fn currency<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    one_of("/ABCDEFGHIJKLMNOPQRSTUVWXYZ")
        .then(one_of("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789'._-/").repeated())
        .to_slice()
        .map(|s: &str| s.to_string())
}

fn amount<'a>() -> impl Parser<'a, ParserInput<'a>, Amount, ParserExtra<'a>> + Clone {
    number()
        .then_ignore(ws())
        .then(currency())
        .map(|(n, c)| Amount::new(n, c))
}

fn incomplete_amount<'a>(
) -> impl Parser<'a, ParserInput<'a>, IncompleteAmount, ParserExtra<'a>> + Clone {
    let complete = number()
        .then_ignore(ws())
        .then(currency())
        .map(|(n, c)| IncompleteAmount::Complete(Amount::new(n, c)));
    let number_only = number().map(IncompleteAmount::NumberOnly);
    let currency_only = currency().map(|c| IncompleteAmount::CurrencyOnly(c.into()));
    choice((complete, number_only, currency_only))
}

#[derive(Debug, Clone)]
enum CostComponent {
    Amount(Decimal, String),
    NumberOnly(Decimal),
    CurrencyOnly(String),
    Date(NaiveDate),
    Label(String),
    Merge,
    Hash,
}

fn cost_component<'a>() -> impl Parser<'a, ParserInput<'a>, CostComponent, ParserExtra<'a>> + Clone
{
    choice((
        date().map(CostComponent::Date),
        number()
            .then_ignore(ws())
            .then(currency())
            .map(|(n, c)| CostComponent::Amount(n, c)),
        number().map(CostComponent::NumberOnly),
        currency().map(CostComponent::CurrencyOnly),
        string_literal().map(CostComponent::Label),
        just('*').to(CostComponent::Merge),
        just('#').to(CostComponent::Hash),
    ))
}

fn cost_spec<'a>() -> impl Parser<'a, ParserInput<'a>, CostSpec, ParserExtra<'a>> + Clone {
    let delimiter = just(',').or(just('/')).to(None);
    let component_item = cost_component().map(Some);
    let cost_item = component_item.or(delimiter);

    let cost_components = cost_item
        .padded()
        .repeated()
        .collect::<Vec<_>>()
        .map(|v| v.into_iter().flatten().collect::<Vec<_>>());

    let single_brace = just('{')
        .ignore_then(cost_components.clone())
        .then_ignore(just('}'))
        .map(|components| build_cost_spec(components, false));

    let double_brace = just("{{")
        .ignore_then(cost_components)
        .then_ignore(just("}}"))
        .map(|components| build_cost_spec(components, true));

    double_brace.or(single_brace)
}

fn build_cost_spec(components: Vec<CostComponent>, is_total_brace: bool) -> CostSpec {
    let mut spec = CostSpec::default();

    let hash_pos = components
        .iter()
        .position(|c| matches!(c, CostComponent::Hash));

    let (per_unit_comps, total_comps): (Vec<_>, Vec<_>) = if let Some(pos) = hash_pos {
        let (before, after) = components.split_at(pos);
        (before.to_vec(), after[1..].to_vec())
    } else if is_total_brace {
        (vec![], components)
    } else {
        (components, vec![])
    };

    for comp in per_unit_comps {
        match comp {
            CostComponent::Amount(num, curr) => {
                spec.number_per = Some(num);
                spec.currency = Some(curr.into());
            }
            CostComponent::NumberOnly(num) => spec.number_per = Some(num),
            CostComponent::CurrencyOnly(curr) => {
                if spec.currency.is_none() {
                    spec.currency = Some(curr.into());
                }
            }
            CostComponent::Date(d) => spec.date = Some(d),
            CostComponent::Label(l) => spec.label = Some(l),
            CostComponent::Merge => spec.merge = true,
            CostComponent::Hash => {}
        }
    }

    for comp in total_comps {
        match comp {
            CostComponent::Amount(num, curr) => {
                spec.number_total = Some(num);
                spec.currency = Some(curr.into());
            }
            CostComponent::NumberOnly(num) => spec.number_total = Some(num),
            CostComponent::CurrencyOnly(curr) => {
                if spec.currency.is_none() {
                    spec.currency = Some(curr.into());
                }
            }
            CostComponent::Date(d) => {
                if spec.date.is_none() {
                    spec.date = Some(d);
                }
            }
            CostComponent::Label(l) => {
                if spec.label.is_none() {
                    spec.label = Some(l);
                }
            }
            CostComponent::Merge => spec.merge = true,
            CostComponent::Hash => {}
        }
    }

    spec
}

fn price_annotation<'a>(
) -> impl Parser<'a, ParserInput<'a>, PriceAnnotation, ParserExtra<'a>> + Clone {
    let price_amount = choice((
        amount().map(|a| Some(IncompleteAmount::Complete(a))),
        incomplete_amount().map(Some),
        empty().to(None),
    ));

    choice((
        just("@@")
            .ignore_then(ws())
            .ignore_then(price_amount.clone())
            .map(|opt_amount| match opt_amount {
                Some(IncompleteAmount::Complete(a)) => PriceAnnotation::Total(a),
                Some(ia) => PriceAnnotation::TotalIncomplete(ia),
                None => PriceAnnotation::TotalEmpty,
            }),
        just('@')
            .ignore_then(ws())
            .ignore_then(price_amount)
            .map(|opt_amount| match opt_amount {
                Some(IncompleteAmount::Complete(a)) => PriceAnnotation::Unit(a),
                Some(ia) => PriceAnnotation::UnitIncomplete(ia),
                None => PriceAnnotation::UnitEmpty,
            }),
    ))
}

fn account<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    let account_type = choice((
        just("Assets"),
        just("Liabilities"),
        just("Equity"),
        just("Income"),
        just("Expenses"),
    ));

    let component = one_of("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789")
        .then(one_of("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-").repeated())
        .to_slice();

    account_type
        .then(just(':').then(component).repeated().at_least(1))
        .to_slice()
        .map(|s: &str| s.to_string())
}

fn flag<'a>() -> impl Parser<'a, ParserInput<'a>, char, ParserExtra<'a>> + Clone {
    choice((one_of("*!"), just("txn").to('*')))
}

fn tag<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    just('#')
        .ignore_then(
            one_of("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_/.")
                .repeated()
                .at_least(1)
                .to_slice(),
        )
        .map(|s: &str| s.to_string())
}

fn link<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    just('^')
        .ignore_then(
            one_of("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_/.")
                .repeated()
                .at_least(1)
                .to_slice(),
        )
        .map(|s: &str| s.to_string())
}

fn metadata_key<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    one_of("abcdefghijklmnopqrstuvwxyz")
        .then(one_of("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_").repeated())
        .to_slice()
        .map(|s: &str| s.to_string())
}

/// A metadata value. Beancount's `MetaValue` has no link variant: a
/// bare `^link` in value position is read back as a tag-shaped token,
/// not specially recognized, matching the data model's nine cases.
fn metadata_value<'a>() -> impl Parser<'a, ParserInput<'a>, MetaValue, ParserExtra<'a>> + Clone {
    choice((
        string_literal().map(MetaValue::String),
        account().map(MetaValue::Account),
        tag().map(MetaValue::Tag),
        date().map(MetaValue::Date),
        amount().map(MetaValue::Amount),
        number().map(MetaValue::Number),
        bool_literal().map(MetaValue::Bool),
        currency().map(MetaValue::Currency),
    ))
}

fn bool_literal<'a>() -> impl Parser<'a, ParserInput<'a>, bool, ParserExtra<'a>> + Clone {
    choice((just("TRUE").to(true), just("FALSE").to(false)))
}

/// A metadata line at the directive's own indentation level.
fn metadata_line<'a>(
) -> impl Parser<'a, ParserInput<'a>, (String, MetaValue, Span), ParserExtra<'a>> {
    newline()
        .ignore_then(ws1())
        .ignore_then(metadata_key().map_with(|k, e| (k, to_span(e.span()))))
        .then_ignore(just(':'))
        .then_ignore(ws())
        .then(metadata_value().or_not())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(|((key, span), value)| (key, value.unwrap_or(MetaValue::None), span))
}

fn dated_directive<'a>() -> impl Parser<'a, ParserInput<'a>, BuildFn<'a>, ParserExtra<'a>> {
    date()
        .then_ignore(ws1())
        .then(choice((
            transaction_body(),
            balance_body(),
            open_body(),
            close_body(),
            commodity_body(),
            pad_body(),
            event_body(),
            query_body(),
            note_body(),
            document_body(),
            price_body(),
            custom_body(),
        )))
        .map(|(d, body_fn)| -> BuildFn<'a> { Box::new(move |loc: Location| body_fn(d, loc)) })
}

/// A posting's pieces, captured during grammar matching before its real
/// location (the containing transaction's) is known.
#[derive(Debug, Clone)]
struct RawPosting {
    flag: Option<char>,
    account: String,
    units: Option<IncompleteAmount>,
    cost: Option<CostSpec>,
    price: Option<PriceAnnotation>,
    metadata: Vec<(String, MetaValue, Span)>,
}

impl RawPosting {
    /// Build the concrete posting, or report why the entire transaction
    /// must be dropped: a cost specification only makes sense attached
    /// to a non-zero number of units, a total cost/price must resolve to
    /// a per-unit number, and neither may go negative unless the caller
    /// opted in via `set_allow_negative_prices`.
    fn into_posting(self, location: Location) -> Result<(Posting, Vec<Diagnostic>), Diagnostic> {
        let units_number = self.units.as_ref().and_then(IncompleteAmount::number);

        let cost = match self.cost {
            Some(cost) if !cost.is_empty() => {
                Some(resolve_cost(cost, units_number, &location)?)
            }
            other => other,
        };
        let price = match self.price {
            Some(price) => Some(resolve_price(price, units_number, &location)?),
            None => None,
        };

        let mut posting = match self.units {
            Some(units) => Posting::with_incomplete(&self.account, units, location.clone()),
            None => Posting::auto(&self.account, location.clone()),
        };
        posting.cost = cost;
        posting.price = price;
        posting.flag = self.flag;
        let (meta, diags) = build_metadata(&self.metadata, &location);
        posting.meta = meta;
        Ok((posting, diags))
    }
}

/// Resolve a cost specification: fold a total cost (`{{...}}`) into its
/// per-unit equivalent, and reject a zero-unit or (absent an allow flag)
/// negative result.
fn resolve_cost(
    cost: CostSpec,
    units_number: Option<Decimal>,
    location: &Location,
) -> Result<CostSpec, Diagnostic> {
    let Some(units) = units_number else {
        return Ok(cost);
    };
    if units.is_zero() {
        return Err(Diagnostic::parser_error(location.clone(), "Amount is zero"));
    }

    let mut resolved = cost;
    if let Some(total) = resolved.number_total.take() {
        resolved.number_per = Some(total / units.abs());
    }
    if let Some(number_per) = resolved.number_per {
        if number_per.is_sign_negative() && !crate::allow_negative_prices() {
            return Err(Diagnostic::parser_error(
                location.clone(),
                format!("Cost is negative: {number_per}"),
            ));
        }
    }
    Ok(resolved)
}

/// Resolve a price annotation: fold a total price (`@@`) into its
/// per-unit equivalent, and reject a (absent an allow flag) negative
/// result.
fn resolve_price(
    price: PriceAnnotation,
    units_number: Option<Decimal>,
    location: &Location,
) -> Result<PriceAnnotation, Diagnostic> {
    let Some(units) = units_number else {
        return Ok(price);
    };
    if matches!(&price, PriceAnnotation::Total(_)) && units.is_zero() {
        return Err(Diagnostic::parser_error(location.clone(), "Amount is zero"));
    }
    let resolved = match price {
        PriceAnnotation::Total(amount) => {
            PriceAnnotation::Unit(Amount::new(amount.number / units.abs(), amount.currency))
        }
        other => other,
    };
    if let Some(amount) = resolved.amount() {
        if amount.number.is_sign_negative() && !crate::allow_negative_prices() {
            return Err(Diagnostic::parser_error(
                location.clone(),
                format!("Negative prices are not allowed: {}", amount.number),
            ));
        }
    }
    Ok(resolved)
}

#[derive(Debug, Clone)]
enum PostingOrMeta {
    Posting(RawPosting),
    Meta(String, MetaValue, Span),
    TagsLinks(Vec<String>, Vec<String>),
}

#[derive(Clone)]
enum TxnHeaderItem {
    String(String),
    Tag(String),
    Link(String),
    /// A `|` separator between payee and narration.
    Pipe,
}

type DateBodyFn<'a> = Box<dyn Fn(NaiveDate, Location) -> BuildOutcome + 'a>;

fn transaction_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    let header_item = choice((
        string_literal().map(TxnHeaderItem::String),
        just('|').to(TxnHeaderItem::Pipe),
        tag().map(TxnHeaderItem::Tag),
        link().map(TxnHeaderItem::Link),
    ));

    flag()
        .then_ignore(ws())
        .then(header_item.separated_by(ws()).collect::<Vec<_>>())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(posting_or_meta().repeated().collect::<Vec<_>>())
        .map(move |((f, header_items), items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut diagnostics = Vec::new();
                let mut strings = Vec::new();
                let mut tags = Vec::new();
                let mut links = Vec::new();
                let mut saw_pipe = false;

                for item in &header_items {
                    match item {
                        TxnHeaderItem::String(s) => strings.push(s.clone()),
                        TxnHeaderItem::Tag(t) => tags.push(t.clone()),
                        TxnHeaderItem::Link(l) => links.push(l.clone()),
                        TxnHeaderItem::Pipe => saw_pipe = true,
                    }
                }

                if saw_pipe && strings.len() < 2 {
                    return BuildOutcome::dropped(Diagnostic::parser_error(
                        location,
                        "'|' in a transaction header must separate a payee and a narration",
                    ));
                }

                if strings.len() > 2 {
                    return BuildOutcome::dropped(Diagnostic::parser_error(
                        location,
                        format!(
                            "transaction header has {} strings, expected at most 2 (payee, narration)",
                            strings.len()
                        ),
                    ));
                }

                let (payee, narration) = match strings.len() {
                    0 => (None, String::new()),
                    1 => (None, strings[0].clone()),
                    _ => (Some(strings[0].clone()), strings[1].clone()),
                };

                let mut txn = Transaction::new(date, narration, location.clone()).with_flag(f);
                if let Some(p) = payee {
                    txn = txn.with_payee(p);
                }
                for t in tags {
                    txn = txn.with_tag(t);
                }
                for l in links {
                    txn = txn.with_link(l);
                }

                for item in items.clone().into_iter().flatten() {
                    match item {
                        PostingOrMeta::Posting(raw) => match raw.into_posting(location.clone()) {
                            Ok((posting, posting_diags)) => {
                                diagnostics.extend(posting_diags);
                                txn = txn.with_posting(posting);
                            }
                            Err(diag) => return BuildOutcome::dropped(diag),
                        },
                        PostingOrMeta::Meta(k, v, span) => {
                            if txn.meta.insert_first(k.clone(), v) {
                                diagnostics.push(
                                    Diagnostic::parser_error(
                                        location.clone(),
                                        format!("duplicate metadata key: '{k}'"),
                                    )
                                    .with_span(span),
                                );
                            }
                        }
                        PostingOrMeta::TagsLinks(t, l) => {
                            for tag in t {
                                txn = txn.with_tag(tag);
                            }
                            for link in l {
                                txn = txn.with_link(link);
                            }
                        }
                    }
                }

                BuildOutcome::ok_with(Directive::Transaction(txn), diagnostics)
            })
        })
}

fn posting_or_meta<'a>() -> impl Parser<'a, ParserInput<'a>, Option<PostingOrMeta>, ParserExtra<'a>>
{
    let meta_entry = newline()
        .ignore_then(ws1())
        .ignore_then(metadata_key().map_with(|k, e| (k, to_span(e.span()))))
        .then_ignore(just(':'))
        .then_ignore(ws())
        .then(metadata_value().or_not())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(|((k, span), v)| Some(PostingOrMeta::Meta(k, v.unwrap_or(MetaValue::None), span)));

    let tag_or_link = choice((
        tag().map(|t| (Some(t), None)),
        link().map(|l| (None, Some(l))),
    ));
    let tags_links_line = newline()
        .ignore_then(ws1())
        .ignore_then(
            tag_or_link
                .separated_by(ws())
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(|items| {
            let mut tags = Vec::new();
            let mut links = Vec::new();
            for (t, l) in items {
                if let Some(tag) = t {
                    tags.push(tag);
                }
                if let Some(link) = l {
                    links.push(link);
                }
            }
            Some(PostingOrMeta::TagsLinks(tags, links))
        });

    let comment_only = newline()
        .ignore_then(ws())
        .ignore_then(just(';'))
        .ignore_then(none_of("\n\r").repeated())
        .map(|()| None);

    choice((
        meta_entry,
        tags_links_line,
        posting().map(|p| Some(PostingOrMeta::Posting(p))),
        comment_only,
    ))
}

fn posting_metadata<'a>(
) -> impl Parser<'a, ParserInput<'a>, (String, MetaValue, Span), ParserExtra<'a>> {
    newline()
        .ignore_then(just("    ").or(just("\t\t")))
        .ignore_then(ws())
        .ignore_then(metadata_key().map_with(|k, e| (k, to_span(e.span()))))
        .then_ignore(just(':'))
        .then_ignore(ws())
        .then(metadata_value().or_not())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(|((k, span), v)| (k, v.unwrap_or(MetaValue::None), span))
}

fn posting<'a>() -> impl Parser<'a, ParserInput<'a>, RawPosting, ParserExtra<'a>> {
    let amount_with_cost_price = incomplete_amount()
        .then(ws().ignore_then(cost_spec()).or_not())
        .then(ws().ignore_then(price_annotation()).or_not())
        .map(|((units, cost), price)| (Some(units), cost, price));

    let just_cost = cost_spec()
        .then(ws().ignore_then(price_annotation()).or_not())
        .map(|(cost, price)| (None, Some(cost), price));

    let just_price = price_annotation().map(|price| (None, None, Some(price)));

    newline()
        .ignore_then(ws1())
        .ignore_then(flag().then_ignore(ws()).or_not())
        .then(account())
        .then_ignore(ws())
        .then(amount_with_cost_price.or(just_cost).or(just_price).or_not())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(posting_metadata().repeated().collect::<Vec<_>>())
        .map(|(((flag, account), amount_cost_price), metadata)| {
            let (units, cost, price) = match amount_cost_price {
                Some((units, cost, price)) => (units, cost, price),
                None => (None, None, None),
            };
            RawPosting {
                flag,
                account,
                units,
                cost,
                price,
                metadata,
            }
        })
}

fn balance_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    let tolerance = ws()
        .ignore_then(just('~'))
        .ignore_then(ws())
        .ignore_then(number());

    let amount_with_tolerance = number()
        .then(tolerance.or_not())
        .then_ignore(ws())
        .then(currency())
        .map(|((num, tol), curr)| (Amount::new(num, &curr), tol));

    just("balance")
        .ignore_then(ws1())
        .ignore_then(account())
        .then_ignore(ws1())
        .then(amount_with_tolerance)
        .then(ws().ignore_then(cost_spec()).or_not())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |(((acct, (amt, tol)), cost), meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                if cost.is_some() {
                    return BuildOutcome::dropped(Diagnostic::syntax_error(
                        location,
                        "a balance directive cannot carry a cost specification",
                    ));
                }
                let mut balance = Balance::new(date, acct.clone(), amt.clone(), location);
                if let Some(t) = tol {
                    balance = balance.with_tolerance(t);
                }
                let (meta, diags) = build_metadata(&meta_items, &balance.location);
                balance.meta = meta;
                BuildOutcome::ok_with(Directive::Balance(balance), diags)
            })
        })
}

fn open_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("open")
        .ignore_then(ws1())
        .ignore_then(account())
        .then_ignore(ws())
        .then(
            currency()
                .separated_by(just(',').then(ws()))
                .collect::<Vec<_>>(),
        )
        .then_ignore(ws())
        .then(string_literal().or_not())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |(((acct, currencies), booking), meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut open = Open::new(date, acct.clone(), location);
                open = open.with_currencies(currencies.clone());
                if let Some(b) = &booking {
                    open = open.with_booking(b.clone());
                }
                let (meta, diags) = build_metadata(&meta_items, &open.location);
                open.meta = meta;
                BuildOutcome::ok_with(Directive::Open(open), diags)
            })
        })
}

fn close_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("close")
        .ignore_then(ws1())
        .ignore_then(account())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |(acct, meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut close = Close::new(date, acct.clone(), location);
                let (meta, diags) = build_metadata(&meta_items, &close.location);
                close.meta = meta;
                BuildOutcome::ok_with(Directive::Close(close), diags)
            })
        })
}

fn commodity_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("commodity")
        .ignore_then(ws1())
        .ignore_then(currency())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |(curr, meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut commodity = Commodity::new(date, curr.clone(), location);
                let (meta, diags) = build_metadata(&meta_items, &commodity.location);
                commodity.meta = meta;
                BuildOutcome::ok_with(Directive::Commodity(commodity), diags)
            })
        })
}

fn pad_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("pad")
        .ignore_then(ws1())
        .ignore_then(account())
        .then_ignore(ws1())
        .then(account())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |((acct, source), meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut pad = Pad::new(date, acct.clone(), source.clone(), location);
                let (meta, diags) = build_metadata(&meta_items, &pad.location);
                pad.meta = meta;
                BuildOutcome::ok_with(Directive::Pad(pad), diags)
            })
        })
}

fn event_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("event")
        .ignore_then(ws1())
        .ignore_then(string_literal())
        .then_ignore(ws1())
        .then(string_literal())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |((name, value), meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut event = Event::new(date, name.clone(), value.clone(), location);
                let (meta, diags) = build_metadata(&meta_items, &event.location);
                event.meta = meta;
                BuildOutcome::ok_with(Directive::Event(event), diags)
            })
        })
}

fn query_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("query")
        .ignore_then(ws1())
        .ignore_then(string_literal())
        .then_ignore(ws1())
        .then(string_literal())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |((name, query_string), meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut query = Query::new(date, name.clone(), query_string.clone(), location);
                let (meta, diags) = build_metadata(&meta_items, &query.location);
                query.meta = meta;
                BuildOutcome::ok_with(Directive::Query(query), diags)
            })
        })
}

fn note_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("note")
        .ignore_then(ws1())
        .ignore_then(account())
        .then_ignore(ws1())
        .then(string_literal())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |((acct, comment), meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut note = Note::new(date, acct.clone(), comment.clone(), location);
                let (meta, diags) = build_metadata(&meta_items, &note.location);
                note.meta = meta;
                BuildOutcome::ok_with(Directive::Note(note), diags)
            })
        })
}

fn document_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    let tag_or_link = choice((
        tag().map(|t| (Some(t), None)),
        link().map(|l| (None, Some(l))),
    ));

    just("document")
        .ignore_then(ws1())
        .ignore_then(account())
        .then_ignore(ws1())
        .then(string_literal())
        .then_ignore(ws())
        .then(tag_or_link.separated_by(ws()).collect::<Vec<_>>())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |(((acct, path), tags_links), meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut document = Document::new(date, acct.clone(), path.clone(), location);
                for (t, l) in &tags_links {
                    if let Some(t) = t {
                        document.tags.insert(t.clone());
                    }
                    if let Some(l) = l {
                        document.links.insert(l.clone());
                    }
                }
                let (meta, diags) = build_metadata(&meta_items, &document.location);
                document.meta = meta;
                BuildOutcome::ok_with(Directive::Document(document), diags)
            })
        })
}

fn price_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("price")
        .ignore_then(ws1())
        .ignore_then(currency())
        .then_ignore(ws1())
        .then(amount())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .then(metadata_line().repeated().collect::<Vec<_>>())
        .map(move |((curr, amt), meta_items)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut price = Price::new(date, curr.clone(), amt.clone(), location);
                let (meta, diags) = build_metadata(&meta_items, &price.location);
                price.meta = meta;
                BuildOutcome::ok_with(Directive::Price(price), diags)
            })
        })
}

fn custom_body<'a>() -> impl Parser<'a, ParserInput<'a>, DateBodyFn<'a>, ParserExtra<'a>> {
    just("custom")
        .ignore_then(ws1())
        .ignore_then(string_literal())
        .then_ignore(ws())
        .then(metadata_value().separated_by(ws1()).collect::<Vec<_>>())
        .then_ignore(ws())
        .then_ignore(comment_line().or_not())
        .map(move |(name, values)| -> DateBodyFn<'a> {
            Box::new(move |date: NaiveDate, location: Location| {
                let mut custom = Custom::new(date, name.clone(), location);
                for v in values.clone() {
                    custom = custom.with_value(v);
                }
                BuildOutcome::ok(Directive::Custom(custom))
            })
        })
}

/// Build a directive's metadata map, enforcing the first-value-wins
/// duplicate rule and emitting one diagnostic per duplicate key.
fn build_metadata(
    items: &[(String, MetaValue, Span)],
    location: &Location,
) -> (Metadata, Vec<Diagnostic>) {
    let mut meta = Metadata::new();
    let mut diagnostics = Vec::new();
    for (key, value, span) in items {
        if meta.insert_first(key.clone(), value.clone()) {
            diagnostics.push(
                Diagnostic::parser_error(location.clone(), format!("duplicate metadata key: '{key}'"))
                    .with_span(*span),
            );
        }
    }
    (meta, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn directives(source: &str) -> (Vec<Directive>, Vec<Diagnostic>) {
        let outcome = parse(source, Location::STRING_SENTINEL);
        (outcome.directives, outcome.diagnostics)
    }

    #[test]
    fn test_parse_empty() {
        let (d, diags) = directives("");
        assert!(d.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_parse_comment_only() {
        let (d, diags) = directives("; just a comment\n");
        assert!(d.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_basic_transaction_with_automatic_posting() {
        let source = "2024-01-15 * \"Coffee Shop\" \"Morning coffee\"\n  Expenses:Food:Coffee  5.00 USD\n  Assets:Cash\n";
        let (d, diags) = directives(source);
        assert!(diags.is_empty(), "diagnostics: {diags:?}");
        assert_eq!(d.len(), 1);
        let txn = d[0].as_transaction().unwrap();
        assert_eq!(txn.postings.len(), 2);
        assert!(txn.postings[1].automatic);
    }

    #[test]
    fn test_invalid_date_recovers_with_diagnostic() {
        let source = "2013-05-40 * \"Bad date\"\n  Assets:Cash  1 USD\n  Equity:Open\n";
        let (d, diags) = directives(source);
        assert!(d.is_empty());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("invalid date"));
    }

    #[test]
    fn test_transaction_tags_and_links() {
        let source = "2024-01-15 * \"Trip\" #trip ^610fa7f17e7a\n  Expenses:Travel  10 USD\n  Assets:Cash\n";
        let (d, _diags) = directives(source);
        let txn = d[0].as_transaction().unwrap();
        assert!(txn.tags.contains("trip"));
        assert!(txn.links.contains("610fa7f17e7a"));
    }

    #[test]
    fn test_three_header_strings_is_an_error() {
        let source = "2024-01-15 * \"A\" \"B\" \"C\"\n  Assets:Cash  1 USD\n  Equity:Open\n";
        let (d, diags) = directives(source);
        assert!(d.is_empty());
        assert!(diags.iter().any(|diag| diag.message.contains("strings")));
    }

    #[test]
    fn test_dangling_pipe_is_an_error() {
        let source = "2024-01-15 * \"Payee\" |\n  Assets:Cash  1 USD\n  Equity:Open\n";
        let (d, diags) = directives(source);
        assert!(d.is_empty());
        assert!(diags.iter().any(|diag| diag.message.contains('|')));
    }

    #[test]
    fn test_total_price_converts_to_per_unit() {
        // the division uses |units|, so a negative unit count does not
        // flip the sign of the resolved per-unit price.
        let source = "2024-01-15 * \"Sell\"\n  Assets:Brokerage  -10 MSFT @@ 2000.00 USD\n  Assets:Cash\n";
        let (d, diags) = directives(source);
        assert!(diags.is_empty(), "diagnostics: {diags:?}");
        let txn = d[0].as_transaction().unwrap();
        let price = txn.postings[0].price.as_ref().unwrap();
        match price {
            PriceAnnotation::Unit(amt) => assert_eq!(amt.number, dec!(200.00)),
            other => panic!("expected a resolved per-unit price, got {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_pushtag_at_eof() {
        let source = "pushtag #trip-to-nowhere\n";
        let (d, diags) = directives(source);
        assert!(d.is_empty());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("Unbalanced tag"));
    }

    #[test]
    fn test_multiline_narration_preserves_newlines() {
        let source = "2024-01-15 * \"Payee\" \"\"\"line one\nline two\"\"\"\n  Assets:Cash  1 USD\n  Equity:Open\n";
        let (d, _diags) = directives(source);
        let txn = d[0].as_transaction().unwrap();
        assert!(txn.narration.contains('\n'));
        assert!(txn.narration.contains("line one"));
    }

    #[test]
    fn test_arithmetic_in_postings() {
        let source = "2024-01-15 * \"Test\"\n  Expenses:Food  12 / 3 USD\n  Assets:Cash  -4 USD\n";
        let (d, diags) = directives(source);
        assert!(diags.is_empty(), "diagnostics: {diags:?}");
        let txn = d[0].as_transaction().unwrap();
        let units = txn.postings[0].units.as_ref().unwrap();
        assert_eq!(units.number(), Some(dec!(4)));
    }

    #[test]
    fn test_division_by_zero_drops_directive_as_parser_error() {
        let source = "2024-01-15 * \"Test\"\n  Expenses:Food  1 / 0 USD\n  Assets:Cash\n";
        let (d, diags) = directives(source);
        assert!(d.is_empty());
        assert!(diags.iter().any(|diag| diag.message.contains("divides by zero")
            && diag.kind == crate::diagnostic::DiagnosticKind::ParserError));
    }

    #[test]
    fn test_total_price_converts_to_per_unit_value() {
        let source = "2024-01-15 * \"Buy\"\n  Assets:Investments:MSFT  10 MSFT @@ 2000.00 USD\n  Assets:Cash\n";
        let (d, diags) = directives(source);
        assert!(diags.is_empty());
        let txn = d[0].as_transaction().unwrap();
        let price = txn.postings[0].price.as_ref().unwrap();
        assert_eq!(price.amount().unwrap().number, Decimal::new(200, 0));
        assert!(txn.postings[0].cost.is_none());
    }

    #[test]
    fn test_negative_total_cost_is_rejected_by_default() {
        let source = "2024-01-15 * \"Buy\"\n  Assets:Investments:MSFT  -10 MSFT {{-200.00 USD}}\n  Assets:Cash\n";
        let (d, diags) = directives(source);
        assert!(d.is_empty());
        assert!(diags.iter().any(|diag| diag.message.contains("negative")));
    }

    #[test]
    fn test_negative_price_rejected_unless_allowed() {
        let source = "2024-01-15 * \"Buy\"\n  Assets:Investments:MSFT  -10 MSFT @ -200.00 USD\n  Assets:Cash\n";
        let (d, diags) = directives(source);
        assert!(d.is_empty());
        assert!(diags
            .iter()
            .any(|diag| diag.message.contains("Negative") && diag.message.contains("not allowed")));
    }

    #[test]
    fn test_balance_with_cost_is_a_syntax_error() {
        let source = "2024-01-15 balance Assets:Brokerage  10 AAPL {150 USD}\n";
        let (d, diags) = directives(source);
        assert!(d.is_empty());
        assert!(diags.iter().any(|diag| diag.message.contains("cost")));
    }

    #[test]
    fn test_duplicate_metadata_key_keeps_first() {
        let source = "2024-01-15 open Assets:Cash\n  category: \"a\"\n  category: \"b\"\n";
        let (d, diags) = directives(source);
        assert_eq!(d.len(), 1);
        let open = match &d[0] {
            Directive::Open(o) => o,
            _ => panic!("expected open"),
        };
        assert_eq!(open.meta.get("category"), Some(&MetaValue::String("a".to_string())));
        assert!(diags.iter().any(|diag| diag.message.contains("duplicate metadata key")));
    }

    #[test]
    fn test_option_documents_append_in_order() {
        let outcome = parse(
            "option \"documents\" \"a\"\noption \"documents\" \"b\"\noption \"documents\" \"c\"\n",
            Location::STRING_SENTINEL,
        );
        assert_eq!(outcome.options.documents, vec!["a", "b", "c"]);
    }
}
