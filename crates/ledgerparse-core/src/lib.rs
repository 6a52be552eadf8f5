//! Core data types for ledgerparse.
//!
//! This crate provides the fundamental types produced by parsing a
//! plain-text double-entry ledger file:
//!
//! - [`Amount`] - A decimal number with a currency
//! - [`CostSpec`] - As-written cost specification from a posting's braces
//! - [`Directive`] - All directive types (Transaction, Balance, Open, etc.)
//! - [`Location`] - The `(filename, line)` every directive carries
//! - [`Metadata`] - The ordered key/value map attached to directives and postings
//!
//! Inventory management, lot booking, and pretty-printing are not part
//! of this crate: they are concerns of downstream collaborators that
//! consume the directive stream this crate's types describe.
//!
//! # Example
//!
//! ```
//! use ledgerparse_core::{Amount, Directive, Location, Posting, Transaction};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let location = Location::new("ledger.beancount", 1);
//! let txn = Transaction::new(date, "Coffee", location.clone())
//!     .with_flag('*')
//!     .with_posting(Posting::new(
//!         "Expenses:Food:Coffee",
//!         Amount::new(5.into(), "USD"),
//!         location.clone(),
//!     ))
//!     .with_posting(Posting::auto("Assets:Cash", location));
//!
//! let directive = Directive::Transaction(txn);
//! assert!(directive.is_transaction());
//! assert_eq!(directive.as_transaction().unwrap().postings.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod cost;
pub mod directive;
pub mod intern;
pub mod location;
pub mod metadata;

pub use amount::{Amount, IncompleteAmount};
pub use cost::CostSpec;
pub use directive::{
    Balance, Close, Commodity, Custom, Directive, Document, Event, Note, Open, Pad, Posting,
    Price, PriceAnnotation, Query, Transaction,
};
pub use intern::InternedStr;
pub use location::Location;
pub use metadata::{MetaValue, Metadata};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
