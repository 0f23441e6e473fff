//! Classifier error types.

/// Errors produced while compiling a rule set.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },
}
