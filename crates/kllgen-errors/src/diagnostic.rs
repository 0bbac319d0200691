//! Collected validation findings.
//!
//! The validation pass does not stop at the first problem. Every violated
//! check becomes a [`Diagnostic`] carrying the offending symbol, the check
//! that failed and the error class; the pass returns a [`DiagnosticReport`]
//! and emission proceeds only when the report holds no errors.

use core::fmt;

use crate::common::{ErrorCategory, ErrorSeverity};
use crate::{KllError, RangeError, ReferenceError, ShapeError};

/// Identifier of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Check {
    /// Trigger macro result references resolve
    ResultResolves,
    /// Result elements name valid capabilities with matching argument widths
    CapabilityArguments,
    /// Scan codes in every layer lie in [0, MaxScanCode]
    ScanCodeRange,
    /// Pixel channels lie inside the channel buffers and are not shared
    PixelChannels,
    /// Scan code → pixel entries reference declared pixels
    ScanCodePixels,
    /// Frame streams and frame-pointer arrays are terminated
    FrameTermination,
    /// Symbol indices are contiguous from zero
    IndexContiguity,
    /// MaxScanCode fits in one byte
    MaxScanCode,
    /// Display map is rectangular and references declared pixels
    DisplayMap,
    /// Explicit pixel buffer bases match the cumulative layout
    BufferLayout,
    /// Animations and animation settings referenced anywhere exist
    AnimationReferences,
    /// Capabilities required by routed result kinds exist
    Routing,
    /// Macro counts fit the firmware state word
    StateWordSize,
    /// Interconnect offsets are ordered and in range
    Interconnect,
    /// Key positions are keyed by valid scan codes
    KeyPositions,
    /// Animation frame payloads match the frame format
    FrameFormat,
    /// Layer bindings name declared trigger macros
    LayerBindings,
    /// Trigger elements fit their type bank and uid byte
    TriggerEncoding,
    /// Trigger and result combos are non-empty and fit a count byte
    ComboShape,
    /// Symbol names are unique within their kind
    Duplicates,
}

impl Check {
    /// Stable kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Check::ResultResolves => "result-resolves",
            Check::CapabilityArguments => "capability-arguments",
            Check::ScanCodeRange => "scan-code-range",
            Check::PixelChannels => "pixel-channels",
            Check::ScanCodePixels => "scan-code-pixels",
            Check::FrameTermination => "frame-termination",
            Check::IndexContiguity => "index-contiguity",
            Check::MaxScanCode => "max-scan-code",
            Check::DisplayMap => "display-map",
            Check::BufferLayout => "buffer-layout",
            Check::AnimationReferences => "animation-references",
            Check::Routing => "routing",
            Check::StateWordSize => "state-word-size",
            Check::Interconnect => "interconnect",
            Check::KeyPositions => "key-positions",
            Check::FrameFormat => "frame-format",
            Check::LayerBindings => "layer-bindings",
            Check::TriggerEncoding => "trigger-encoding",
            Check::ComboShape => "combo-shape",
            Check::Duplicates => "duplicates",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error classes that validation collects instead of raising.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticError {
    /// Unresolved symbol
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    /// Value out of range
    #[error(transparent)]
    Range(#[from] RangeError),
    /// Structural mismatch
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl DiagnosticError {
    /// Error category of the wrapped error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DiagnosticError::Reference(_) => ErrorCategory::Reference,
            DiagnosticError::Range(_) => ErrorCategory::Range,
            DiagnosticError::Shape(_) => ErrorCategory::Shape,
        }
    }
}

impl From<DiagnosticError> for KllError {
    fn from(err: DiagnosticError) -> Self {
        match err {
            DiagnosticError::Reference(e) => KllError::Reference(e),
            DiagnosticError::Range(e) => KllError::Range(e),
            DiagnosticError::Shape(e) => KllError::Shape(e),
        }
    }
}

/// One finding of the validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Check that produced the finding
    pub check: Check,
    /// Offending symbol name
    pub symbol: String,
    /// Error or warning
    pub severity: ErrorSeverity,
    /// Underlying error
    pub error: DiagnosticError,
}

impl Diagnostic {
    /// Error-severity finding.
    pub fn error(check: Check, symbol: impl Into<String>, error: impl Into<DiagnosticError>) -> Self {
        Self {
            check,
            symbol: symbol.into(),
            severity: ErrorSeverity::Error,
            error: error.into(),
        }
    }

    /// Warning-severity finding; does not block emission.
    pub fn warning(
        check: Check,
        symbol: impl Into<String>,
        error: impl Into<DiagnosticError>,
    ) -> Self {
        Self {
            check,
            symbol: symbol.into(),
            severity: ErrorSeverity::Warning,
            error: error.into(),
        }
    }

    /// Error category of the finding.
    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }

    /// Whether the finding blocks emission.
    pub fn is_error(&self) -> bool {
        self.severity >= ErrorSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.check, self.symbol, self.error
        )
    }
}

/// Ordered collection of findings from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticReport {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record an error-severity finding.
    pub fn error(
        &mut self,
        check: Check,
        symbol: impl Into<String>,
        error: impl Into<DiagnosticError>,
    ) {
        self.push(Diagnostic::error(check, symbol, error));
    }

    /// Record a warning-severity finding.
    pub fn warning(
        &mut self,
        check: Check,
        symbol: impl Into<String>,
        error: impl Into<DiagnosticError>,
    ) {
        self.push(Diagnostic::warning(check, symbol, error));
    }

    /// All findings in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Error-severity findings.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning-severity findings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Whether any finding blocks emission.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Findings produced by one check.
    pub fn by_check(&self, check: Check) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.check == check)
    }

    /// Turn the report into an error when it holds error-severity findings.
    ///
    /// # Errors
    ///
    /// Returns [`KllError::Validation`] carrying the whole report if any
    /// finding has error severity. Warnings alone pass through.
    pub fn into_result(self) -> Result<Self, KllError> {
        if self.has_errors() {
            Err(KllError::Validation(self))
        } else {
            Ok(self)
        }
    }
}

impl IntoIterator for DiagnosticReport {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl Extend<Diagnostic> for DiagnosticReport {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors().count();
        let warnings = self.warnings().count();
        write!(f, "{errors} error(s), {warnings} warning(s)")?;
        if let Some(first) = self.errors().next() {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_identifiers_are_kebab_case() {
        assert_eq!(Check::ScanCodeRange.as_str(), "scan-code-range");
        assert_eq!(Check::StateWordSize.to_string(), "state-word-size");
    }

    #[test]
    fn test_report_separates_errors_and_warnings() {
        let mut report = DiagnosticReport::new();
        report.warning(
            Check::Routing,
            "R3",
            ReferenceError::missing_capability("R3", "flashMode"),
        );
        assert!(!report.has_errors());

        report.error(
            Check::ScanCodeRange,
            "T1",
            RangeError::scan_code("T1", 0x90, 0x80),
        );
        assert!(report.has_errors());
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_into_result_keeps_warnings() {
        let mut report = DiagnosticReport::new();
        report.warning(
            Check::KeyPositions,
            "S7",
            RangeError::Position {
                scan_code: 7,
                max: 5,
            },
        );
        let kept = report.into_result();
        assert!(matches!(kept, Ok(ref r) if r.len() == 1));
    }

    #[test]
    fn test_validation_error_category_follows_first_error() {
        let mut report = DiagnosticReport::new();
        report.error(Check::DisplayMap, "row 2", ShapeError::display_row(2, 4, 3));
        report.error(
            Check::ResultResolves,
            "T0",
            ReferenceError::missing_result("T0", "R1"),
        );
        let result = report.into_result();
        assert!(matches!(&result, Err(e) if e.category() == ErrorCategory::Shape));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::error(
            Check::ResultResolves,
            "T0",
            ReferenceError::missing_result("T0", "R1"),
        );
        assert_eq!(
            d.to_string(),
            "ERROR [result-resolves] T0: Trigger macro 'T0' references unknown result macro 'R1'"
        );
    }
}
