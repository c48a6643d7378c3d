//! Jurisdiction classification of a transaction context.

use serde::{Deserialize, Serialize};

use crate::core::{TaxConfig, TransactionContext};

/// How a transaction is treated geographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Seller and buyer share a jurisdiction.
    Domestic,
    /// Cross-border, both sides inside the regional bloc.
    IntraRegion,
    /// Cross-border, at least one side outside the regional bloc.
    Export,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domestic => "domestic",
            Self::IntraRegion => "intra_region",
            Self::Export => "export",
        }
    }
}

/// Result of classifying a context against a [`TaxConfig`].
///
/// `region_transaction` and `export_transaction` are mutually exclusive and
/// both imply `cross_border`. A code outside the bloc is classified as export
/// even when it is merely unsupported and no customs event takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub cross_border: bool,
    pub region_transaction: bool,
    pub export_transaction: bool,
    pub digital_services: bool,
}

impl Classification {
    pub fn of(ctx: &TransactionContext, config: &TaxConfig) -> Self {
        let classification = Self {
            cross_border: is_cross_border(ctx),
            region_transaction: is_region_transaction(ctx, config),
            export_transaction: is_export_transaction(ctx, config),
            digital_services: is_digital_services(ctx, config),
        };
        tracing::trace!(?classification, "classified transaction");
        classification
    }

    pub fn transaction_type(&self) -> TransactionType {
        if self.region_transaction {
            TransactionType::IntraRegion
        } else if self.export_transaction {
            TransactionType::Export
        } else {
            TransactionType::Domestic
        }
    }
}

/// Seller and buyer jurisdictions differ.
pub fn is_cross_border(ctx: &TransactionContext) -> bool {
    ctx.seller_jurisdiction() != ctx.buyer_jurisdiction()
}

fn both_in_region(ctx: &TransactionContext, config: &TaxConfig) -> bool {
    config.is_region_member(ctx.seller_jurisdiction())
        && config.is_region_member(ctx.buyer_jurisdiction())
}

/// Cross-border with both sides inside the bloc.
pub fn is_region_transaction(ctx: &TransactionContext, config: &TaxConfig) -> bool {
    is_cross_border(ctx) && both_in_region(ctx, config)
}

/// Cross-border with at least one side outside the bloc.
pub fn is_export_transaction(ctx: &TransactionContext, config: &TaxConfig) -> bool {
    is_cross_border(ctx) && !both_in_region(ctx, config)
}

/// A digital product type is declared, or a line description contains a
/// digital-service keyword (case-insensitive).
pub fn is_digital_services(ctx: &TransactionContext, config: &TaxConfig) -> bool {
    config
        .digital_product_types
        .iter()
        .any(|p| ctx.has_product_type(p))
        || ctx
            .invoice_lines()
            .iter()
            .any(|line| config.matches_digital_keyword(&line.description))
}
