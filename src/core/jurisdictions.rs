//! Built-in jurisdiction tables used by [`TaxConfig::default`](super::TaxConfig).
//!
//! Codes are ISO 3166-1 alpha-3. The regional bloc is the EU-27; the
//! supported set adds the most common non-EU trading partners.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Members of the regional bloc (EU-27). Kept sorted.
pub static REGION_MEMBERS: &[&str] = &[
    "AUT", "BEL", "BGR", "CYP", "CZE", "DEU", "DNK", "ESP", "EST", "FIN", "FRA", "GRC", "HRV",
    "HUN", "IRL", "ITA", "LTU", "LUX", "LVA", "MLT", "NLD", "POL", "PRT", "ROU", "SVK", "SVN",
    "SWE",
];

/// Jurisdictions with rule coverage. Kept sorted.
pub static SUPPORTED_JURISDICTIONS: &[&str] = &[
    "AUT", "BEL", "BGR", "CHE", "CYP", "CZE", "DEU", "DNK", "ESP", "EST", "FIN", "FRA", "GBR",
    "GRC", "HRV", "HUN", "IRL", "ITA", "LTU", "LUX", "LVA", "MLT", "NLD", "NOR", "POL", "PRT",
    "ROU", "SVK", "SVN", "SWE", "USA",
];

/// Distance-selling thresholds that differ from [`DEFAULT_DISTANCE_SELLING_THRESHOLD`].
pub static DISTANCE_SELLING_THRESHOLDS: &[(&str, Decimal)] = &[
    ("DEU", dec!(100_000)),
    ("ESP", dec!(35_000)),
    ("FRA", dec!(35_000)),
    ("ITA", dec!(35_000)),
    ("LUX", dec!(100_000)),
    ("NLD", dec!(100_000)),
];

/// Fallback distance-selling threshold for bloc members without an entry.
pub const DEFAULT_DISTANCE_SELLING_THRESHOLD: Decimal = dec!(35_000);

/// VAT registration thresholds compared against a single transaction amount.
pub static REGISTRATION_THRESHOLDS: &[(&str, Decimal)] = &[
    ("DEU", dec!(22_000)),
    ("ESP", dec!(10_000)),
    ("FRA", dec!(36_800)),
    ("GBR", dec!(85_000)),
    ("ITA", dec!(65_000)),
    ("NLD", dec!(20_000)),
];

/// Lower-case fragments marking a line description as a digital service.
pub static DIGITAL_SERVICE_KEYWORDS: &[&str] = &[
    "software",
    "license",
    "subscription",
    "saas",
    "digital",
    "download",
    "streaming",
    "consulting",
    "training",
    "support",
    "maintenance",
];

/// Product types that mark a transaction as digital without keyword scanning.
pub static DIGITAL_PRODUCT_TYPES: &[&str] = &["digital_services", "software"];

/// Amount above which a signed contract or purchase order is required.
pub const DOCUMENTATION_AMOUNT_LIMIT: Decimal = dec!(1_000);

/// Export amount above which local registration in the destination is advised.
pub const EXPORT_REGISTRATION_LIMIT: Decimal = dec!(10_000);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JurisdictionCode, TaxConfig};

    fn code(s: &str) -> JurisdictionCode {
        JurisdictionCode::parse(s).unwrap()
    }

    #[test]
    fn region_members() {
        let config = TaxConfig::default();
        assert!(config.is_region_member(&code("DEU")));
        assert!(config.is_region_member(&code("ESP")));
        assert!(config.is_region_member(&code("FRA")));
        assert!(!config.is_region_member(&code("GBR")));
        assert!(!config.is_region_member(&code("USA")));
    }

    #[test]
    fn region_count() {
        assert_eq!(REGION_MEMBERS.len(), 27);
    }

    #[test]
    fn lists_are_sorted() {
        for list in [REGION_MEMBERS, SUPPORTED_JURISDICTIONS] {
            for window in list.windows(2) {
                assert!(
                    window[0] < window[1],
                    "codes not sorted: {} >= {}",
                    window[0],
                    window[1]
                );
            }
        }
    }

    #[test]
    fn every_region_member_is_supported() {
        for member in REGION_MEMBERS {
            assert!(
                SUPPORTED_JURISDICTIONS.contains(member),
                "{member} missing from supported set"
            );
        }
    }

    #[test]
    fn keywords_are_lowercase() {
        for kw in DIGITAL_SERVICE_KEYWORDS {
            assert_eq!(*kw, kw.to_lowercase());
        }
    }
}
