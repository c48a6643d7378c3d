use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::AdviceError;

/// Three-letter jurisdiction code keying every rule table (e.g. "ESP", "DEU").
///
/// Always upper-case ASCII. Construct with [`JurisdictionCode::parse`] or
/// `str::parse`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JurisdictionCode(String);

impl JurisdictionCode {
    /// Parse a code, trimming whitespace and upper-casing it.
    pub fn parse(code: &str) -> Result<Self, AdviceError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 {
            return Err(AdviceError::Jurisdiction {
                code: code.into(),
                reason: "must be exactly 3 letters".into(),
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AdviceError::Jurisdiction {
                code: code.into(),
                reason: "must contain only letters".into(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Wrap a code from a built-in table that is known to be well-formed.
    pub(crate) fn from_static(code: &str) -> Self {
        debug_assert!(code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()));
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JurisdictionCode {
    type Err = AdviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for JurisdictionCode {
    type Error = AdviceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<JurisdictionCode> for String {
    fn from(code: JurisdictionCode) -> Self {
        code.0
    }
}

impl AsRef<str> for JurisdictionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Who is buying: a VAT-registered business or a private consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyerType {
    /// B2B: the buyer is a taxable person.
    Business,
    /// B2C: the buyer is a final consumer.
    Consumer,
}

impl BuyerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Consumer => "consumer",
        }
    }
}

/// A single invoice line as seen by the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Free-text description; scanned for digital-service keywords.
    pub description: String,
    pub quantity: Decimal,
    /// Net price per unit before discount.
    pub unit_price: Decimal,
    /// Tax rate percentage (0–100).
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Line discount percentage (0–100).
    #[serde(default)]
    pub discount_percentage: Decimal,
}

impl InvoiceLine {
    /// Net line amount after the line discount, rounded to cents.
    ///
    /// `quantity × unit_price × (1 − discount / 100)`
    ///
    /// # Panics
    ///
    /// Panics if the multiplication overflows; see [`checked_net_amount`](Self::checked_net_amount).
    pub fn net_amount(&self) -> Decimal {
        let gross = self.quantity * self.unit_price;
        let discount = gross * self.discount_percentage / Decimal::ONE_HUNDRED;
        (gross - discount).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Like [`net_amount`](Self::net_amount), but `None` on overflow.
    pub fn checked_net_amount(&self) -> Option<Decimal> {
        let gross = self.quantity.checked_mul(self.unit_price)?;
        let discount = gross
            .checked_mul(self.discount_percentage)?
            .checked_div(Decimal::ONE_HUNDRED)?;
        let net = gross.checked_sub(discount)?;
        Some(net.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// Input to one validation run.
///
/// Built through [`TransactionContextBuilder`](super::TransactionContextBuilder),
/// which enforces the input contract. Once built the context cannot be
/// mutated, so a report derived from it never goes stale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionContext {
    pub(crate) seller_jurisdiction: JurisdictionCode,
    pub(crate) buyer_jurisdiction: JurisdictionCode,
    pub(crate) seller_establishment: String,
    pub(crate) buyer_location: String,
    pub(crate) transaction_amount: Decimal,
    pub(crate) product_types: BTreeSet<String>,
    pub(crate) buyer_type: BuyerType,
    pub(crate) invoice_lines: Vec<InvoiceLine>,
    pub(crate) transaction_date: NaiveDate,
}

impl TransactionContext {
    pub fn seller_jurisdiction(&self) -> &JurisdictionCode {
        &self.seller_jurisdiction
    }

    pub fn buyer_jurisdiction(&self) -> &JurisdictionCode {
        &self.buyer_jurisdiction
    }

    /// Opaque identifier of the seller's establishment.
    pub fn seller_establishment(&self) -> &str {
        &self.seller_establishment
    }

    pub fn buyer_location(&self) -> &str {
        &self.buyer_location
    }

    /// Net transaction amount (never negative).
    pub fn transaction_amount(&self) -> Decimal {
        self.transaction_amount
    }

    pub fn product_types(&self) -> &BTreeSet<String> {
        &self.product_types
    }

    pub fn has_product_type(&self, product_type: &str) -> bool {
        self.product_types.contains(product_type)
    }

    pub fn buyer_type(&self) -> BuyerType {
        self.buyer_type
    }

    pub fn invoice_lines(&self) -> &[InvoiceLine] {
        &self.invoice_lines
    }

    pub fn transaction_date(&self) -> NaiveDate {
        self.transaction_date
    }
}
