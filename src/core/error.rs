use thiserror::Error;

/// Errors raised while assembling engine input or configuration.
///
/// The rule engine itself never fails: every variant here describes input
/// that was rejected before evaluation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdviceError {
    /// The transaction context violates the input contract.
    #[error("invalid transaction context: {0}")]
    Context(String),

    /// A jurisdiction code is malformed.
    #[error("invalid jurisdiction code '{code}': {reason}")]
    Jurisdiction {
        /// The rejected input.
        code: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A configuration table is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON input could not be parsed.
    #[error("JSON error: {0}")]
    Json(String),
}

/// A single input contract violation with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation {
    /// Dot-separated path to the offending field (e.g. "invoice_lines.0.discount").
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ContractViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_includes_field() {
        let v = ContractViolation::new("transaction_amount", "must not be negative");
        assert_eq!(v.to_string(), "transaction_amount: must not be negative");
    }

    #[test]
    fn jurisdiction_error_message() {
        let e = AdviceError::Jurisdiction {
            code: "E5P".into(),
            reason: "must contain only letters".into(),
        };
        assert_eq!(
            e.to_string(),
            "invalid jurisdiction code 'E5P': must contain only letters"
        );
    }
}
