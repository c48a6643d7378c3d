//! # vat-advisor
//!
//! Advisory VAT treatment for a single commercial transaction spanning one
//! or two jurisdictions: classification (domestic, intra-region, export),
//! reverse charge and destination-registration checks, plus the warnings,
//! recommendations and supporting documents that follow from them.
//!
//! The engine is advisory, not an authoritative tax calculator. All monetary
//! values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use vat_advisor::core::*;
//! use vat_advisor::rules::*;
//! use rust_decimal_macros::dec;
//!
//! let ctx = TransactionContextBuilder::new("ESP", "FRA")
//!     .seller_establishment("est-madrid-01")
//!     .buyer_type(BuyerType::Business)
//!     .product_type("goods")
//!     .add_line(
//!         InvoiceLineBuilder::new("Steel beams", dec!(10), dec!(250))
//!             .tax_rate(dec!(21))
//!             .build(),
//!     )
//!     .transaction_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let report = RuleEngine::default().validate(&ctx);
//! assert!(report.is_valid());
//! assert!(report.reverse_charge_required());
//! assert!(report.tax_exemption_applicable());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Context types, builder, configuration tables |
//! | `rules` (default) | Classifier, rule engine, validation report |
//! | `json` | JSON configuration loading, JSON input and report export |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "rules")]
pub mod rules;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
