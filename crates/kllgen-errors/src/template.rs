//! Template substitution errors. All of them are fatal.

use crate::common::ErrorSeverity;

/// Template error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Placeholder name not in the registry
    #[error("{template}:{line}: unknown placeholder '<|{name}|>'")]
    UnknownPlaceholder {
        /// Template name
        template: String,
        /// Placeholder name
        name: String,
        /// 1-based line number
        line: usize,
    },

    /// `<|` without a closing `|>`
    #[error("{template}:{line}: unterminated placeholder")]
    Unterminated {
        /// Template name
        template: String,
        /// 1-based line number
        line: usize,
    },

    /// `<|` found inside another placeholder
    #[error("{template}:{line}: nested placeholder")]
    Nested {
        /// Template name
        template: String,
        /// 1-based line number
        line: usize,
    },

    /// Placeholder known, but nothing generated text for it
    #[error("{template}: no generator produced text for '<|{name}|>'")]
    NoGenerator {
        /// Template name
        template: String,
        /// Placeholder name
        name: String,
    },
}

impl TemplateError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }

    /// Unknown placeholder.
    pub fn unknown(template: impl Into<String>, name: impl Into<String>, line: usize) -> Self {
        TemplateError::UnknownPlaceholder {
            template: template.into(),
            name: name.into(),
            line,
        }
    }

    /// Placeholder without generated text.
    pub fn no_generator(template: impl Into<String>, name: impl Into<String>) -> Self {
        TemplateError::NoGenerator {
            template: template.into(),
            name: name.into(),
        }
    }
}
