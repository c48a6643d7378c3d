//! Plain deserialisable input for callers that receive contexts as JSON.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::builder::TransactionContextBuilder;
use super::error::AdviceError;
use super::types::{BuyerType, InvoiceLine, TransactionContext};

/// Unvalidated transaction context as it arrives over the wire.
///
/// Convert with [`into_context`](Self::into_context), which applies the same
/// contract checks as the builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub seller_jurisdiction_code: String,
    pub buyer_jurisdiction_code: String,
    pub seller_establishment: String,
    #[serde(default)]
    pub buyer_location: String,
    /// Derived from the invoice lines when absent.
    #[serde(default)]
    pub transaction_amount: Option<Decimal>,
    #[serde(default)]
    pub product_types: BTreeSet<String>,
    pub buyer_type: BuyerType,
    #[serde(default)]
    pub invoice_lines: Vec<InvoiceLine>,
    /// Today's local date when absent.
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
}

impl TransactionInput {
    pub fn from_json(json: &str) -> Result<Self, AdviceError> {
        serde_json::from_str(json).map_err(|e| AdviceError::Json(e.to_string()))
    }

    pub fn into_context(self) -> Result<TransactionContext, AdviceError> {
        let mut builder = TransactionContextBuilder::new(
            self.seller_jurisdiction_code,
            self.buyer_jurisdiction_code,
        )
        .seller_establishment(self.seller_establishment)
        .buyer_location(self.buyer_location)
        .buyer_type(self.buyer_type)
        .product_types(self.product_types);

        if let Some(amount) = self.transaction_amount {
            builder = builder.transaction_amount(amount);
        }
        if let Some(date) = self.transaction_date {
            builder = builder.transaction_date(date);
        }
        for line in self.invoice_lines {
            builder = builder.add_line(line);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "seller_jurisdiction_code": "esp",
        "buyer_jurisdiction_code": "FRA",
        "seller_establishment": "est-madrid-01",
        "buyer_location": "Lyon",
        "product_types": ["goods"],
        "buyer_type": "business",
        "invoice_lines": [
            {"description": "Steel beams", "quantity": "10", "unit_price": "250", "tax_rate": "21"},
            {"description": "Delivery", "quantity": "1", "unit_price": "100", "discount_percentage": "50"}
        ],
        "transaction_date": "2024-06-15"
    }"#;

    #[test]
    fn json_input_builds_context() {
        let ctx = TransactionInput::from_json(SAMPLE)
            .unwrap()
            .into_context()
            .unwrap();
        assert_eq!(ctx.seller_jurisdiction().as_str(), "ESP");
        assert_eq!(ctx.transaction_amount(), dec!(2550));
        assert_eq!(ctx.invoice_lines().len(), 2);
        assert_eq!(
            ctx.transaction_date(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }

    #[test]
    fn unknown_buyer_type_rejected() {
        let json = SAMPLE.replace("\"business\"", "\"government\"");
        assert!(matches!(
            TransactionInput::from_json(&json),
            Err(AdviceError::Json(_))
        ));
    }

    #[test]
    fn contract_still_enforced() {
        let json = SAMPLE.replace(
            "\"discount_percentage\": \"50\"",
            "\"discount_percentage\": \"150\"",
        );
        let err = TransactionInput::from_json(&json)
            .unwrap()
            .into_context()
            .unwrap_err();
        assert!(err.to_string().contains("discount"));
    }
}
