//! Property-based tests for classification and report invariants.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "rules")]

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use vat_advisor::core::jurisdictions::{REGION_MEMBERS, SUPPORTED_JURISDICTIONS};
use vat_advisor::core::*;
use vat_advisor::rules::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build(
    seller: &str,
    buyer: &str,
    amount: Decimal,
    buyer_type: BuyerType,
    digital: bool,
) -> TransactionContext {
    let mut builder = TransactionContextBuilder::new(seller, buyer)
        .seller_establishment("est-prop")
        .buyer_type(buyer_type)
        .transaction_amount(amount)
        .transaction_date(date(2024, 6, 15));
    if digital {
        builder = builder.product_type("digital_services");
    }
    builder.build().unwrap()
}

// ── Proptest Strategies ─────────────────────────────────────────────────────

fn arb_region_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(REGION_MEMBERS)
}

fn arb_non_region_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["USA", "GBR", "CHE", "NOR", "ZZZ", "JPN"])
}

fn arb_any_code() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        prop::sample::select(SUPPORTED_JURISDICTIONS),
        Just("ZZZ"),
        Just("QQQ")
    ]
}

/// Amounts from 0.00 to 199999.99.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0u64..20_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn arb_buyer_type() -> impl Strategy<Value = BuyerType> {
    prop_oneof![Just(BuyerType::Business), Just(BuyerType::Consumer)]
}

proptest! {
    /// Same jurisdiction on both sides is always domestic.
    #[test]
    fn same_code_is_domestic(
        code in arb_any_code(),
        amount in arb_amount(),
        bt in arb_buyer_type(),
    ) {
        let ctx = build(code, code, amount, bt, false);
        let engine = RuleEngine::default();
        let c = engine.classify(&ctx);
        prop_assert!(!c.cross_border);
        prop_assert!(!c.region_transaction);
        prop_assert!(!c.export_transaction);
        prop_assert_eq!(engine.validate(&ctx).transaction_type(), Some(TransactionType::Domestic));
    }

    /// Two different bloc members always form an intra-region transaction.
    #[test]
    fn two_region_members_are_intra_region(a in arb_region_code(), b in arb_region_code()) {
        prop_assume!(a != b);
        let ctx = build(a, b, Decimal::ONE, BuyerType::Business, false);
        let c = RuleEngine::default().classify(&ctx);
        prop_assert!(c.region_transaction);
        prop_assert!(!c.export_transaction);
    }

    /// Exactly one side inside the bloc is always an export.
    #[test]
    fn one_region_member_is_export(
        inside in arb_region_code(),
        outside in arb_non_region_code(),
        flip in any::<bool>(),
    ) {
        let (seller, buyer) = if flip { (outside, inside) } else { (inside, outside) };
        let ctx = build(seller, buyer, Decimal::ONE, BuyerType::Consumer, false);
        let c = RuleEngine::default().classify(&ctx);
        prop_assert!(c.export_transaction);
        prop_assert!(!c.region_transaction);
    }

    /// The built-in rules never produce an error entry.
    #[test]
    fn reports_are_always_valid(
        seller in arb_any_code(),
        buyer in arb_any_code(),
        amount in arb_amount(),
        bt in arb_buyer_type(),
        digital in any::<bool>(),
    ) {
        let report = validate(&build(seller, buyer, amount, bt, digital));
        prop_assert!(report.is_valid());
        prop_assert_eq!(report.summary().error_count, 0);
        prop_assert_eq!(report.warnings().len(), report.summary().warning_count);
    }

    /// Validation is deterministic for a pinned date.
    #[test]
    fn validation_is_idempotent(
        seller in arb_any_code(),
        buyer in arb_any_code(),
        amount in arb_amount(),
        bt in arb_buyer_type(),
        digital in any::<bool>(),
    ) {
        let ctx = build(seller, buyer, amount, bt, digital);
        let engine = RuleEngine::default();
        prop_assert_eq!(engine.validate(&ctx), engine.validate(&ctx));
    }

    /// Threshold entries appear exactly for thresholds the amount reaches.
    #[test]
    fn threshold_entries_match_table(amount in arb_amount()) {
        let ctx = build("DEU", "DEU", amount, BuyerType::Business, false);
        let engine = RuleEngine::default();
        let report = engine.validate(&ctx);
        for (code, threshold) in &engine.config().registration_thresholds {
            let present = report.entry(&format!("threshold_{code}")).is_some();
            prop_assert_eq!(present, *threshold <= amount);
        }
    }
}
