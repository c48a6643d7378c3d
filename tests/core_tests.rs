use chrono::NaiveDate;
use rust_decimal_macros::dec;
use vat_advisor::core::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- Context construction ---

#[test]
fn full_context_roundtrips_through_accessors() {
    let ctx = TransactionContextBuilder::new("esp", "fra")
        .seller_establishment("est-madrid-01")
        .buyer_location("12 Rue de la République, Lyon")
        .buyer_type(BuyerType::Consumer)
        .product_types(["goods", "digital_services"])
        .add_line(
            InvoiceLineBuilder::new("Ebook download", dec!(3), dec!(9.99))
                .tax_rate(dec!(5.5))
                .build(),
        )
        .add_line(
            InvoiceLineBuilder::new("Printed atlas", dec!(1), dec!(40))
                .tax_rate(dec!(5.5))
                .discount(dec!(10))
                .build(),
        )
        .transaction_date(date(2024, 3, 1))
        .build()
        .unwrap();

    assert_eq!(ctx.seller_jurisdiction().as_str(), "ESP");
    assert_eq!(ctx.buyer_jurisdiction().as_str(), "FRA");
    assert_eq!(ctx.seller_establishment(), "est-madrid-01");
    assert_eq!(ctx.buyer_location(), "12 Rue de la République, Lyon");
    assert_eq!(ctx.buyer_type(), BuyerType::Consumer);
    assert!(ctx.has_product_type("digital_services"));
    assert_eq!(ctx.invoice_lines().len(), 2);
    // 29.97 + 36.00
    assert_eq!(ctx.transaction_amount(), dec!(65.97));
    assert_eq!(ctx.transaction_date(), date(2024, 3, 1));
}

#[test]
fn unpinned_date_defaults_to_today() {
    let ctx = TransactionContextBuilder::new("DEU", "DEU")
        .seller_establishment("est")
        .buyer_type(BuyerType::Business)
        .build()
        .unwrap();
    let today = chrono::Local::now().date_naive();
    // Allow for a midnight rollover between the two reads.
    assert!(ctx.transaction_date() <= today);
    assert!(today - ctx.transaction_date() <= chrono::Duration::days(1));
}

#[test]
fn too_many_lines_rejected() {
    let mut builder = TransactionContextBuilder::new("DEU", "DEU")
        .seller_establishment("est")
        .buyer_type(BuyerType::Business)
        .buyer_type(BuyerType::Business);
    let line = InvoiceLineBuilder::new("Bolt", dec!(1), dec!(0.10)).build();
    for _ in 0..=MAX_INVOICE_LINES {
        builder = builder.add_line(line.clone());
    }
    let err = builder.build().unwrap_err();
    assert!(err.to_string().contains("invoice lines"));
}

#[test]
fn zero_amount_is_accepted() {
    let ctx = TransactionContextBuilder::new("DEU", "DEU")
        .seller_establishment("est")
        .buyer_type(BuyerType::Business)
        .transaction_amount(dec!(0))
        .transaction_date(date(2024, 1, 1))
        .build()
        .unwrap();
    assert_eq!(ctx.transaction_amount(), dec!(0));
}

#[test]
fn negative_unit_price_rejected() {
    let err = TransactionContextBuilder::new("DEU", "DEU")
        .seller_establishment("est")
        .buyer_type(BuyerType::Business)
        .add_line(InvoiceLineBuilder::new("Refund", dec!(1), dec!(-10)).build())
        .build()
        .unwrap_err();
    assert!(matches!(err, AdviceError::Context(_)));
    assert!(err.to_string().contains("invoice_lines.0.unit_price"));
}

#[test]
fn jurisdiction_code_parse_via_fromstr() {
    let code: JurisdictionCode = "usa".parse().unwrap();
    assert_eq!(code.to_string(), "USA");
    assert!("U.S".parse::<JurisdictionCode>().is_err());
}

// --- Configuration ---

#[test]
fn default_tables_cover_region_and_partners() {
    let config = TaxConfig::default();
    let deu = JurisdictionCode::parse("DEU").unwrap();
    let usa = JurisdictionCode::parse("USA").unwrap();
    assert!(config.is_region_member(&deu));
    assert!(config.is_supported(&usa));
    assert!(!config.is_region_member(&usa));
    assert_eq!(config.region_members.len(), 27);
    assert_eq!(config.documentation_amount_limit, dec!(1_000));
    assert_eq!(config.export_registration_limit, dec!(10_000));
}

#[test]
fn config_collects_all_violations() {
    let mut config = TaxConfig::default();
    config.default_distance_selling_threshold = dec!(-5);
    config.export_registration_limit = dec!(-1);
    config.digital_keywords.push("Download".into());
    assert_eq!(config.violations().len(), 3);
    assert!(matches!(config.validate(), Err(AdviceError::Config(_))));
}

#[test]
fn inferred_product_types_feed_the_builder() {
    let config = TaxConfig::default();
    let lines = vec![InvoiceLineBuilder::new("SaaS seat", dec!(5), dec!(20)).build()];
    let ctx = TransactionContextBuilder::new("DEU", "AUT")
        .seller_establishment("est")
        .buyer_type(BuyerType::Business)
        .product_types(infer_product_types(&lines, &config))
        .add_line(lines[0].clone())
        .build()
        .unwrap();
    assert!(ctx.has_product_type("digital_services"));
}
