//! The individual rules, in evaluation order.
//!
//! Each rule sees the context, its classification and the configuration,
//! plus a read-only view of what earlier rules produced. It returns only its
//! own contribution; the engine merges contributions in [`RULES`] order.

use crate::core::{BuyerType, JurisdictionCode, TaxConfig, TransactionContext};

use super::classify::{Classification, TransactionType};
use super::report::{Findings, Status, ValidationEntry};

/// Everything a rule may look at besides earlier findings.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub context: &'a TransactionContext,
    pub classification: Classification,
    pub config: &'a TaxConfig,
}

impl RuleInput<'_> {
    fn seller(&self) -> &JurisdictionCode {
        self.context.seller_jurisdiction()
    }

    fn buyer(&self) -> &JurisdictionCode {
        self.context.buyer_jurisdiction()
    }
}

/// A rule: `(input, findings so far) -> own findings`.
pub type Rule = fn(&RuleInput<'_>, &Findings) -> Findings;

/// All rules in evaluation order. Order only affects presentation.
pub const RULES: &[(&str, Rule)] = &[
    ("jurisdiction_support", jurisdiction_support),
    ("transaction_type", transaction_type),
    ("region_rules", region_rules),
    ("export_rules", export_rules),
    ("digital_services_rules", digital_services_rules),
    ("threshold_requirements", threshold_requirements),
    ("documentation_requirements", documentation_requirements),
    ("tax_registration_requirements", tax_registration_requirements),
];

/// Flag seller/buyer codes outside the supported set.
pub fn jurisdiction_support(input: &RuleInput<'_>, _prior: &Findings) -> Findings {
    let mut out = Findings::default();

    let mut unsupported: Vec<JurisdictionCode> = Vec::new();
    for code in [input.seller(), input.buyer()] {
        if !input.config.is_supported(code) && !unsupported.contains(code) {
            unsupported.push(code.clone());
        }
    }

    if unsupported.is_empty() {
        out.record(ValidationEntry::new(
            "jurisdiction_support",
            Status::Success,
            "All jurisdictions are supported",
        ));
    } else {
        let list = unsupported
            .iter()
            .map(JurisdictionCode::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        out.record(
            ValidationEntry::new(
                "jurisdiction_support",
                Status::Warning,
                format!("Unsupported jurisdiction(s): {list}. Tax rules may be incomplete"),
            )
            .jurisdictions(unsupported),
        );
    }

    out
}

/// Classify the transaction as domestic, intra-region or export.
pub fn transaction_type(input: &RuleInput<'_>, _prior: &Findings) -> Findings {
    let mut out = Findings::default();
    let kind = input.classification.transaction_type();
    let (seller, buyer) = (input.seller(), input.buyer());

    let message = match kind {
        TransactionType::Domestic => format!("Domestic transaction within {seller}"),
        TransactionType::IntraRegion => {
            format!("Intra-region transaction from {seller} to {buyer}")
        }
        TransactionType::Export => format!("Export transaction from {seller} to {buyer}"),
    };
    out.record(
        ValidationEntry::new("transaction_type", Status::Info, message).transaction_type(kind),
    );
    out
}

/// Reverse charge for businesses, distance selling and OSS for consumers.
pub fn region_rules(input: &RuleInput<'_>, _prior: &Findings) -> Findings {
    let mut out = Findings::default();
    if !input.classification.region_transaction {
        return out;
    }
    let (seller, buyer) = (input.seller(), input.buyer());

    match input.context.buyer_type() {
        BuyerType::Business => {
            out.record(
                ValidationEntry::new(
                    "reverse_charge",
                    Status::Info,
                    format!("Reverse charge applies: the buyer accounts for VAT in {buyer}"),
                )
                .required(true),
            );
            out.record(
                ValidationEntry::new(
                    "tax_exemption",
                    Status::Success,
                    format!("Intra-region supply is exempt from VAT in {seller}"),
                )
                .applicable(true),
            );

            out.require_document("Buyer VAT number verification record");
            out.require_document("Proof of intra-region transport or delivery");
            out.require_document("Invoice stating reverse charge and both VAT numbers");

            out.recommend(
                "Verify the buyer's VAT number in the regional VAT registry before invoicing",
            );
            out.recommend(format!(
                "Keep proof that the goods or services moved from {seller} to {buyer}"
            ));
            out.recommend(
                "Include the reverse-charge wording and both parties' VAT numbers on the invoice",
            );
        }
        BuyerType::Consumer => {
            let threshold = input.config.distance_selling_threshold(buyer);
            out.record(
                ValidationEntry::new(
                    "distance_selling",
                    Status::Warning,
                    format!(
                        "Distance selling to consumers in {buyer}: VAT registration in {buyer} is required above {threshold}"
                    ),
                )
                .threshold(threshold),
            );

            if input.classification.digital_services {
                out.record(
                    ValidationEntry::new(
                        "oss_requirement",
                        Status::Info,
                        "Digital services to consumers in another member state: register for the One-Stop-Shop scheme",
                    )
                    .required(true),
                );
            }

            out.recommend(format!(
                "Monitor cumulative sales to {buyer} against the distance-selling threshold"
            ));
            out.recommend(format!(
                "Charge VAT at the {buyer} rate once the threshold is exceeded"
            ));
            out.recommend(
                "Consider the One-Stop-Shop scheme to declare cross-border consumer sales",
            );
        }
    }

    out
}

/// Export exemption and its evidence.
pub fn export_rules(input: &RuleInput<'_>, _prior: &Findings) -> Findings {
    let mut out = Findings::default();
    if !input.classification.export_transaction {
        return out;
    }
    let (seller, buyer) = (input.seller(), input.buyer());

    out.record(
        ValidationEntry::new(
            "export_exemption",
            Status::Success,
            format!("Export from {seller} to {buyer} is exempt from VAT"),
        )
        .applicable(true),
    );

    out.require_document("Export customs declaration");
    out.require_document("Proof of export (transport document or bill of lading)");
    out.require_document("Commercial invoice referencing the export exemption");

    out.recommend("Obtain the export customs declaration confirmed at the point of exit");
    out.recommend("Retain transport documents proving the goods left the regional bloc");
    out.recommend(format!("Check import duties and VAT due in {buyer}"));

    if input.classification.digital_services {
        out.record(ValidationEntry::new(
            "digital_services_export",
            Status::Warning,
            format!(
                "Digital services supplied to {buyer} may be taxable under the destination's rules"
            ),
        ));
    }

    out
}

/// Place-of-supply rules for digital services.
pub fn digital_services_rules(input: &RuleInput<'_>, _prior: &Findings) -> Findings {
    let mut out = Findings::default();
    if !input.classification.digital_services {
        return out;
    }

    out.record(ValidationEntry::new(
        "digital_services",
        Status::Info,
        "Transaction includes digital services",
    ));

    if input.classification.cross_border {
        let buyer = input.buyer();
        out.record(ValidationEntry::new(
            "digital_services_vat_location",
            Status::Warning,
            format!("Digital services are taxed where the customer is located ({buyer})"),
        ));

        out.recommend(
            "Collect two non-contradictory pieces of evidence of the customer's location",
        );
        out.recommend(format!("Apply the VAT rate of {buyer} to the digital services"));
        out.recommend(
            "Confirm for each digital sale whether the buyer is a business or a consumer",
        );
    }

    out
}

/// Registration thresholds reached by this transaction.
///
/// Compares the single transaction amount, not cumulative annual turnover.
pub fn threshold_requirements(input: &RuleInput<'_>, _prior: &Findings) -> Findings {
    let mut out = Findings::default();
    let amount = input.context.transaction_amount();

    for (code, threshold) in &input.config.registration_thresholds {
        if *threshold <= amount {
            out.record(
                ValidationEntry::new(
                    format!("threshold_{code}"),
                    Status::Warning,
                    format!(
                        "Transaction amount {amount} reaches the VAT registration threshold of {threshold} in {code}"
                    ),
                )
                .threshold(*threshold),
            );
        }
    }

    out
}

/// Supporting documents; the entry carries a snapshot of every document required so far.
pub fn documentation_requirements(input: &RuleInput<'_>, prior: &Findings) -> Findings {
    let mut out = Findings::default();

    out.require_document("Commercial invoice");
    out.require_document("Proof of payment");
    if input.classification.cross_border {
        out.require_document("Transport or service delivery evidence");
    }
    if input.context.transaction_amount() > input.config.documentation_amount_limit {
        out.require_document("Signed contract or purchase order");
    }

    let snapshot: Vec<String> = prior
        .required_documents
        .iter()
        .chain(&out.required_documents)
        .cloned()
        .collect();
    out.record(
        ValidationEntry::new(
            "documentation",
            Status::Info,
            format!("{} supporting documents required", snapshot.len()),
        )
        .documents(snapshot),
    );

    out
}

/// Registrations the seller may need beyond its home jurisdiction.
pub fn tax_registration_requirements(input: &RuleInput<'_>, _prior: &Findings) -> Findings {
    let mut out = Findings::default();
    let c = input.classification;
    let buyer = input.buyer();
    let mut requirements = Vec::new();

    if c.region_transaction && input.context.buyer_type() == BuyerType::Consumer {
        requirements.push(format!(
            "Register for VAT in {buyer} once distance sales exceed the threshold, or use the One-Stop-Shop scheme"
        ));
    }
    if c.digital_services && c.cross_border {
        requirements.push(format!(
            "Register for VAT on digital services supplied to customers in {buyer} (One-Stop-Shop or local registration)"
        ));
    }
    let limit = input.config.export_registration_limit;
    if c.export_transaction && input.context.transaction_amount() > limit {
        requirements.push(format!(
            "Check whether local VAT registration is required in {buyer} for transactions above {limit}"
        ));
    }

    if requirements.is_empty() {
        out.record(ValidationEntry::new(
            "tax_registration",
            Status::Success,
            "No additional tax registration required",
        ));
    } else {
        out.record(
            ValidationEntry::new(
                "tax_registration",
                Status::Warning,
                "Additional tax registration may be required",
            )
            .requirements(requirements),
        );
    }

    out
}
