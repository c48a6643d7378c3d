//! Validation entries, the rule accumulator, and the final report.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classify::TransactionType;
use crate::core::JurisdictionCode;

/// Outcome level of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Info,
    Warning,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one check, keyed by what was checked (e.g. "reverse_charge").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub key: String,
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// Jurisdictions the entry refers to (e.g. the unsupported ones).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jurisdictions: Vec<JurisdictionCode>,
}

impl ValidationEntry {
    pub fn new(key: impl Into<String>, status: Status, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status,
            message: message.into(),
            threshold: None,
            requirements: Vec::new(),
            documents: Vec::new(),
            required: None,
            applicable: None,
            transaction_type: None,
            jurisdictions: Vec::new(),
        }
    }

    pub fn threshold(mut self, threshold: Decimal) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn documents(mut self, documents: Vec<String>) -> Self {
        self.documents = documents;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn applicable(mut self, applicable: bool) -> Self {
        self.applicable = Some(applicable);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn jurisdictions(mut self, codes: Vec<JurisdictionCode>) -> Self {
        self.jurisdictions = codes;
        self
    }
}

/// Everything the rules have produced, in rule order.
///
/// Each rule returns a fresh `Findings` holding only its own contribution;
/// the engine merges them left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub entries: Vec<ValidationEntry>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub required_documents: Vec<String>,
}

impl Findings {
    /// Record an entry. Warning entries also add their message to `warnings`.
    pub fn record(&mut self, entry: ValidationEntry) {
        if entry.status == Status::Warning {
            self.warnings.push(entry.message.clone());
        }
        self.entries.push(entry);
    }

    pub fn recommend(&mut self, recommendation: impl Into<String>) {
        self.recommendations.push(recommendation.into());
    }

    pub fn require_document(&mut self, document: impl Into<String>) {
        self.required_documents.push(document.into());
    }

    /// Append `other` after `self`, preserving order on every list.
    pub fn merge(mut self, other: Findings) -> Findings {
        self.entries.extend(other.entries);
        self.warnings.extend(other.warnings);
        self.recommendations.extend(other.recommendations);
        self.required_documents.extend(other.required_documents);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self.warnings.is_empty()
            && self.recommendations.is_empty()
            && self.required_documents.is_empty()
    }
}

/// Aggregate over all entries of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// `error` if any entry errored, else `warning` if any warned, else `success`.
    pub status: Status,
    pub total_checks: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub recommendation_count: usize,
    pub document_count: usize,
}

impl Summary {
    pub fn of(findings: &Findings) -> Self {
        let count = |status: Status| {
            findings
                .entries
                .iter()
                .filter(|e| e.status == status)
                .count()
        };
        let error_count = count(Status::Error);
        let warning_count = count(Status::Warning);

        let status = if error_count > 0 {
            Status::Error
        } else if warning_count > 0 {
            Status::Warning
        } else {
            Status::Success
        };

        Self {
            status,
            total_checks: findings.entries.len(),
            error_count,
            warning_count,
            recommendation_count: findings.recommendations.len(),
            document_count: findings.required_documents.len(),
        }
    }
}

/// Immutable outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    #[serde(rename = "validation_results")]
    results: BTreeMap<String, ValidationEntry>,
    warnings: Vec<String>,
    recommendations: Vec<String>,
    required_documents: Vec<String>,
    summary: Summary,
    transaction_date: NaiveDate,
}

impl ValidationReport {
    /// Summarise the accumulated findings into a report.
    pub fn from_findings(findings: Findings, transaction_date: NaiveDate) -> Self {
        let summary = Summary::of(&findings);
        let Findings {
            entries,
            warnings,
            recommendations,
            required_documents,
        } = findings;

        Self {
            results: entries.into_iter().map(|e| (e.key.clone(), e)).collect(),
            warnings,
            recommendations,
            required_documents,
            summary,
            transaction_date,
        }
    }

    pub fn entry(&self, key: &str) -> Option<&ValidationEntry> {
        self.results.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.results.values()
    }

    pub fn entries_with_status(&self, status: Status) -> impl Iterator<Item = &ValidationEntry> {
        self.results.values().filter(move |e| e.status == status)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn required_documents(&self) -> &[String] {
        &self.required_documents
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Date the report was produced for.
    pub fn transaction_date(&self) -> NaiveDate {
        self.transaction_date
    }

    /// True iff no entry has status `error`.
    pub fn is_valid(&self) -> bool {
        !self.results.values().any(|e| e.status == Status::Error)
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.entry("transaction_type")
            .and_then(|e| e.transaction_type)
    }

    pub fn reverse_charge_required(&self) -> bool {
        self.flag("reverse_charge", |e| e.required)
    }

    pub fn tax_exemption_applicable(&self) -> bool {
        self.flag("tax_exemption", |e| e.applicable)
    }

    pub fn export_exemption_applicable(&self) -> bool {
        self.flag("export_exemption", |e| e.applicable)
    }

    pub fn oss_required(&self) -> bool {
        self.flag("oss_requirement", |e| e.required)
    }

    pub fn distance_selling_threshold(&self) -> Option<Decimal> {
        self.entry("distance_selling").and_then(|e| e.threshold)
    }

    fn flag(&self, key: &str, field: impl Fn(&ValidationEntry) -> Option<bool>) -> bool {
        self.entry(key).and_then(field).unwrap_or(false)
    }

    /// Serialize in the shape consumed by UIs:
    /// `{validation_results, warnings, recommendations, required_documents, summary, ...}`.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, crate::core::AdviceError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::core::AdviceError::Json(e.to_string()))
    }
}
