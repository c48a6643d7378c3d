use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::config::TaxConfig;
use super::error::{AdviceError, ContractViolation};
use super::types::*;

/// Upper bound on invoice lines accepted in one context.
pub const MAX_INVOICE_LINES: usize = 10_000;

/// Builder enforcing the input contract of [`TransactionContext`].
///
/// ```
/// use vat_advisor::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let ctx = TransactionContextBuilder::new("ESP", "FRA")
///     .seller_establishment("est-madrid-01")
///     .buyer_location("Lyon, France")
///     .buyer_type(BuyerType::Business)
///     .product_type("goods")
///     .add_line(
///         InvoiceLineBuilder::new("Steel beams", dec!(10), dec!(250))
///             .tax_rate(dec!(21))
///             .build(),
///     )
///     .transaction_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(ctx.transaction_amount(), dec!(2500.00));
/// ```
pub struct TransactionContextBuilder {
    seller_jurisdiction: String,
    buyer_jurisdiction: String,
    seller_establishment: Option<String>,
    buyer_location: String,
    transaction_amount: Option<Decimal>,
    product_types: BTreeSet<String>,
    buyer_type: Option<BuyerType>,
    invoice_lines: Vec<InvoiceLine>,
    transaction_date: Option<NaiveDate>,
}

impl TransactionContextBuilder {
    pub fn new(
        seller_jurisdiction: impl Into<String>,
        buyer_jurisdiction: impl Into<String>,
    ) -> Self {
        Self {
            seller_jurisdiction: seller_jurisdiction.into(),
            buyer_jurisdiction: buyer_jurisdiction.into(),
            seller_establishment: None,
            buyer_location: String::new(),
            transaction_amount: None,
            product_types: BTreeSet::new(),
            buyer_type: None,
            invoice_lines: Vec::new(),
            transaction_date: None,
        }
    }

    pub fn seller_establishment(mut self, id: impl Into<String>) -> Self {
        self.seller_establishment = Some(id.into());
        self
    }

    pub fn buyer_location(mut self, location: impl Into<String>) -> Self {
        self.buyer_location = location.into();
        self
    }

    /// Set the amount explicitly. When unset, the sum of line net amounts is used.
    pub fn transaction_amount(mut self, amount: Decimal) -> Self {
        self.transaction_amount = Some(amount);
        self
    }

    pub fn product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_types.insert(product_type.into());
        self
    }

    pub fn product_types<I, S>(mut self, product_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_types
            .extend(product_types.into_iter().map(Into::into));
        self
    }

    pub fn buyer_type(mut self, buyer_type: BuyerType) -> Self {
        self.buyer_type = Some(buyer_type);
        self
    }

    pub fn add_line(mut self, line: InvoiceLine) -> Self {
        self.invoice_lines.push(line);
        self
    }

    /// Pin the transaction date. When unset, `build()` uses today's local date.
    pub fn transaction_date(mut self, date: NaiveDate) -> Self {
        self.transaction_date = Some(date);
        self
    }

    /// Build the context, rejecting any input contract violation.
    /// Line-level problems are all reported together.
    pub fn build(self) -> Result<TransactionContext, AdviceError> {
        let seller_jurisdiction = JurisdictionCode::parse(&self.seller_jurisdiction)?;
        let buyer_jurisdiction = JurisdictionCode::parse(&self.buyer_jurisdiction)?;

        let seller_establishment = self
            .seller_establishment
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AdviceError::Context("seller establishment is required".into()))?;

        let buyer_type = self
            .buyer_type
            .ok_or_else(|| AdviceError::Context("buyer type is required".into()))?;

        if self.invoice_lines.len() > MAX_INVOICE_LINES {
            return Err(AdviceError::Context(format!(
                "context cannot have more than {MAX_INVOICE_LINES} invoice lines"
            )));
        }

        let mut violations = Vec::new();
        for (i, line) in self.invoice_lines.iter().enumerate() {
            validate_line(line, i, &mut violations);
        }

        let transaction_amount = self.transaction_amount.or_else(|| {
            self.invoice_lines
                .iter()
                .try_fold(Decimal::ZERO, |sum, line| {
                    sum.checked_add(line.checked_net_amount()?)
                })
        });
        match transaction_amount {
            None => violations.push(ContractViolation::new(
                "transaction_amount",
                "sum of line net amounts overflows",
            )),
            Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
                violations.push(ContractViolation::new(
                    "transaction_amount",
                    format!("amount {amount} must not be negative"),
                ))
            }
            Some(_) => {}
        }

        if !violations.is_empty() {
            let msg = violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AdviceError::Context(msg));
        }

        let transaction_amount = transaction_amount.unwrap_or_default();

        let product_types = self
            .product_types
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(TransactionContext {
            seller_jurisdiction,
            buyer_jurisdiction,
            seller_establishment,
            buyer_location: self.buyer_location,
            transaction_amount,
            product_types,
            buyer_type,
            invoice_lines: self.invoice_lines,
            transaction_date: self
                .transaction_date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        })
    }
}

fn validate_line(line: &InvoiceLine, index: usize, violations: &mut Vec<ContractViolation>) {
    let prefix = format!("invoice_lines.{index}");
    let percent = Decimal::ZERO..=Decimal::ONE_HUNDRED;

    if line.quantity.is_sign_negative() && !line.quantity.is_zero() {
        violations.push(ContractViolation::new(
            format!("{prefix}.quantity"),
            "quantity must not be negative",
        ));
    }
    if line.unit_price.is_sign_negative() && !line.unit_price.is_zero() {
        violations.push(ContractViolation::new(
            format!("{prefix}.unit_price"),
            "unit price must not be negative",
        ));
    }
    if !percent.contains(&line.tax_rate) {
        violations.push(ContractViolation::new(
            format!("{prefix}.tax_rate"),
            format!("tax rate {} must be between 0 and 100", line.tax_rate),
        ));
    }
    if !percent.contains(&line.discount_percentage) {
        violations.push(ContractViolation::new(
            format!("{prefix}.discount_percentage"),
            format!(
                "discount {} must be between 0 and 100",
                line.discount_percentage
            ),
        ));
    }
}

/// Builder for [`InvoiceLine`]. Tax rate and discount default to zero.
pub struct InvoiceLineBuilder {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
    discount_percentage: Decimal,
}

impl InvoiceLineBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            tax_rate: Decimal::ZERO,
            discount_percentage: Decimal::ZERO,
        }
    }

    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn discount(mut self, percentage: Decimal) -> Self {
        self.discount_percentage = percentage;
        self
    }

    pub fn build(self) -> InvoiceLine {
        InvoiceLine {
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            tax_rate: self.tax_rate,
            discount_percentage: self.discount_percentage,
        }
    }
}

/// Infer product types from line descriptions.
///
/// Returns `{"digital_services"}` if any description contains a configured
/// digital keyword, otherwise `{"goods"}`. Callers without structured product
/// data use this to fill [`TransactionContextBuilder::product_types`].
pub fn infer_product_types(lines: &[InvoiceLine], config: &TaxConfig) -> BTreeSet<String> {
    let digital = lines
        .iter()
        .any(|l| config.matches_digital_keyword(&l.description));
    let inferred = if digital { "digital_services" } else { "goods" };
    BTreeSet::from([inferred.to_string()])
}
