use crate::core::{AdviceError, TaxConfig, TransactionContext};

use super::classify::Classification;
use super::evaluators::{RULES, RuleInput};
use super::report::{Findings, ValidationReport};

/// Evaluates every rule against a context and summarises the outcome.
///
/// The engine only holds its configuration. Each call to [`validate`](Self::validate)
/// folds the rules over a fresh, empty [`Findings`], so nothing carries over
/// between calls and a shared engine can be used from many threads.
///
/// ```
/// use vat_advisor::core::*;
/// use vat_advisor::rules::RuleEngine;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let ctx = TransactionContextBuilder::new("DEU", "USA")
///     .seller_establishment("est-hamburg")
///     .buyer_type(BuyerType::Business)
///     .transaction_amount(dec!(15_000))
///     .transaction_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .build()
///     .unwrap();
///
/// let report = RuleEngine::default().validate(&ctx);
/// assert!(report.export_exemption_applicable());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: TaxConfig,
}

impl RuleEngine {
    /// Create an engine with the given tables, trusting them as-is.
    pub fn new(config: TaxConfig) -> Self {
        Self { config }
    }

    /// Create an engine after checking the tables for consistency.
    pub fn try_new(config: TaxConfig) -> Result<Self, AdviceError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    pub fn classify(&self, ctx: &TransactionContext) -> Classification {
        Classification::of(ctx, &self.config)
    }

    /// Run all rules in order and return the report.
    ///
    /// Deterministic: identical contexts (including the transaction date)
    /// yield identical reports.
    pub fn validate(&self, ctx: &TransactionContext) -> ValidationReport {
        let span = tracing::debug_span!(
            "validate",
            seller = %ctx.seller_jurisdiction(),
            buyer = %ctx.buyer_jurisdiction(),
            buyer_type = ctx.buyer_type().as_str(),
        );
        let _guard = span.enter();

        let input = RuleInput {
            context: ctx,
            classification: self.classify(ctx),
            config: &self.config,
        };

        let findings = RULES
            .iter()
            .fold(Findings::default(), |acc, (name, rule)| {
                let own = rule(&input, &acc);
                tracing::debug!(
                    rule = *name,
                    entries = own.entries.len(),
                    warnings = own.warnings.len(),
                    "rule evaluated"
                );
                acc.merge(own)
            });

        let report = ValidationReport::from_findings(findings, ctx.transaction_date());
        tracing::debug!(
            status = %report.summary().status,
            checks = report.summary().total_checks,
            "validation complete"
        );
        report
    }
}

/// Validate `ctx` against the built-in tables.
pub fn validate(ctx: &TransactionContext) -> ValidationReport {
    RuleEngine::default().validate(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn context() -> TransactionContext {
        TransactionContextBuilder::new("ESP", "FRA")
            .seller_establishment("est-1")
            .buyer_type(BuyerType::Consumer)
            .product_type("digital_services")
            .transaction_amount(dec!(500))
            .transaction_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn repeated_calls_do_not_accumulate() {
        let engine = RuleEngine::default();
        let first = engine.validate(&context());
        let second = engine.validate(&context());
        assert_eq!(first, second);
        assert_eq!(first.warnings().len(), second.warnings().len());
    }

    #[test]
    fn report_carries_transaction_date() {
        let report = validate(&context());
        assert_eq!(
            report.transaction_date(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }

    #[test]
    fn try_new_rejects_inconsistent_config() {
        let mut config = TaxConfig::default();
        config.digital_keywords.clear();
        assert!(RuleEngine::try_new(config).is_err());
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleEngine>();
    }
}
