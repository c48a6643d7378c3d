//! Injectable rule tables.
//!
//! Every set, map and limit the rules consult lives in [`TaxConfig`], so
//! jurisdiction coverage can be extended or replaced without touching the
//! rule code. [`TaxConfig::default`] reproduces the built-in tables from
//! [`jurisdictions`](super::jurisdictions).

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{AdviceError, ContractViolation};
use super::jurisdictions;
use super::types::JurisdictionCode;

/// Rule tables consulted by the classifier and the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Members of the regional bloc (customs/tax union).
    pub region_members: BTreeSet<JurisdictionCode>,
    /// Jurisdictions the rule tables cover.
    pub supported_jurisdictions: BTreeSet<JurisdictionCode>,
    /// Per-jurisdiction distance-selling thresholds.
    pub distance_selling_thresholds: BTreeMap<JurisdictionCode, Decimal>,
    /// Used for bloc members missing from `distance_selling_thresholds`.
    pub default_distance_selling_threshold: Decimal,
    /// Registration thresholds compared against the single transaction amount.
    pub registration_thresholds: BTreeMap<JurisdictionCode, Decimal>,
    /// Lower-case description fragments that mark a digital service.
    pub digital_keywords: Vec<String>,
    /// Product types that mark a transaction as digital.
    pub digital_product_types: BTreeSet<String>,
    /// Amounts above this require a signed contract or purchase order.
    pub documentation_amount_limit: Decimal,
    /// Export amounts above this trigger a local-registration note.
    pub export_registration_limit: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        let codes = |list: &[&'static str]| {
            list.iter()
                .map(|c| JurisdictionCode::from_static(c))
                .collect::<BTreeSet<_>>()
        };
        let table = |list: &[(&'static str, Decimal)]| {
            list.iter()
                .map(|(c, amount)| (JurisdictionCode::from_static(c), *amount))
                .collect::<BTreeMap<_, _>>()
        };

        Self {
            region_members: codes(jurisdictions::REGION_MEMBERS),
            supported_jurisdictions: codes(jurisdictions::SUPPORTED_JURISDICTIONS),
            distance_selling_thresholds: table(jurisdictions::DISTANCE_SELLING_THRESHOLDS),
            default_distance_selling_threshold: jurisdictions::DEFAULT_DISTANCE_SELLING_THRESHOLD,
            registration_thresholds: table(jurisdictions::REGISTRATION_THRESHOLDS),
            digital_keywords: jurisdictions::DIGITAL_SERVICE_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            digital_product_types: jurisdictions::DIGITAL_PRODUCT_TYPES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            documentation_amount_limit: jurisdictions::DOCUMENTATION_AMOUNT_LIMIT,
            export_registration_limit: jurisdictions::EXPORT_REGISTRATION_LIMIT,
        }
    }
}

impl TaxConfig {
    pub fn is_region_member(&self, code: &JurisdictionCode) -> bool {
        self.region_members.contains(code)
    }

    pub fn is_supported(&self, code: &JurisdictionCode) -> bool {
        self.supported_jurisdictions.contains(code)
    }

    /// Distance-selling threshold for `code`, falling back to the default.
    pub fn distance_selling_threshold(&self, code: &JurisdictionCode) -> Decimal {
        self.distance_selling_thresholds
            .get(code)
            .copied()
            .unwrap_or(self.default_distance_selling_threshold)
    }

    /// Whether `description` contains any digital-service keyword (case-insensitive).
    pub fn matches_digital_keyword(&self, description: &str) -> bool {
        let lower = description.to_lowercase();
        self.digital_keywords
            .iter()
            .any(|kw| lower.contains(kw.as_str()))
    }

    /// Add a bloc member; it is also added to the supported set.
    pub fn with_region_member(mut self, code: JurisdictionCode) -> Self {
        self.supported_jurisdictions.insert(code.clone());
        self.region_members.insert(code);
        self
    }

    pub fn with_supported(mut self, code: JurisdictionCode) -> Self {
        self.supported_jurisdictions.insert(code);
        self
    }

    pub fn with_distance_selling_threshold(
        mut self,
        code: JurisdictionCode,
        threshold: Decimal,
    ) -> Self {
        self.distance_selling_thresholds.insert(code, threshold);
        self
    }

    pub fn with_registration_threshold(
        mut self,
        code: JurisdictionCode,
        threshold: Decimal,
    ) -> Self {
        self.registration_thresholds.insert(code, threshold);
        self
    }

    /// Check the tables for internal consistency.
    /// Returns all problems found (not just the first).
    pub fn violations(&self) -> Vec<ContractViolation> {
        let mut violations = Vec::new();

        for code in &self.region_members {
            if !self.supported_jurisdictions.contains(code) {
                violations.push(ContractViolation::new(
                    "region_members",
                    format!("{code} is a bloc member but not a supported jurisdiction"),
                ));
            }
        }

        let thresholds = self
            .distance_selling_thresholds
            .iter()
            .map(|(c, t)| ("distance_selling_thresholds", c, t))
            .chain(
                self.registration_thresholds
                    .iter()
                    .map(|(c, t)| ("registration_thresholds", c, t)),
            );
        for (field, code, threshold) in thresholds {
            if threshold.is_sign_negative() {
                violations.push(ContractViolation::new(
                    format!("{field}.{code}"),
                    format!("threshold {threshold} must not be negative"),
                ));
            }
        }

        let limits = [
            (
                "default_distance_selling_threshold",
                self.default_distance_selling_threshold,
            ),
            (
                "documentation_amount_limit",
                self.documentation_amount_limit,
            ),
            ("export_registration_limit", self.export_registration_limit),
        ];
        for (field, limit) in limits {
            if limit.is_sign_negative() {
                violations.push(ContractViolation::new(
                    field,
                    format!("limit {limit} must not be negative"),
                ));
            }
        }

        if self.digital_keywords.is_empty() {
            violations.push(ContractViolation::new(
                "digital_keywords",
                "keyword list must not be empty",
            ));
        }
        for kw in &self.digital_keywords {
            if kw.trim().is_empty() {
                violations.push(ContractViolation::new(
                    "digital_keywords",
                    "keywords must not be blank",
                ));
            } else if *kw != kw.to_lowercase() {
                violations.push(ContractViolation::new(
                    "digital_keywords",
                    format!("keyword '{kw}' must be lower-case"),
                ));
            }
        }

        violations
    }

    /// Validate the tables, joining all problems into one error.
    pub fn validate(&self) -> Result<(), AdviceError> {
        let violations = self.violations();
        if violations.is_empty() {
            return Ok(());
        }
        let msg = violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(AdviceError::Config(msg))
    }

    /// Load and validate a configuration from JSON. Missing fields take
    /// their default values.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, AdviceError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AdviceError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
