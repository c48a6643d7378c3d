//! Classification, rule evaluation, and the validation report.
//!
//! Classifies a [`TransactionContext`](crate::core::TransactionContext) as
//! domestic, intra-region or export, runs the ordered rule set, and
//! summarises the result into an immutable [`ValidationReport`].
//!
//! # Example
//!
//! ```
//! use vat_advisor::core::*;
//! use vat_advisor::rules::*;
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let ctx = TransactionContextBuilder::new("ESP", "FRA")
//!     .seller_establishment("est-madrid-01")
//!     .buyer_type(BuyerType::Consumer)
//!     .transaction_amount(dec!(800))
//!     .transaction_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let report = validate(&ctx);
//! assert_eq!(report.transaction_type(), Some(TransactionType::IntraRegion));
//! assert_eq!(report.distance_selling_threshold(), Some(dec!(35_000)));
//! assert_eq!(report.summary().status, Status::Warning);
//! ```

mod classify;
mod engine;
mod evaluators;
mod report;

pub use classify::{
    Classification, TransactionType, is_cross_border, is_digital_services, is_export_transaction,
    is_region_transaction,
};
pub use engine::{RuleEngine, validate};
pub use evaluators::{RULES, Rule, RuleInput};
pub use report::{Findings, Status, Summary, ValidationEntry, ValidationReport};
