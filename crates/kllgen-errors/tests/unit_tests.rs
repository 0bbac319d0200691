//! Unit tests for all error variants.
//!
//! Tests Display implementations, std::error::Error implementations,
//! From conversions and exit-status classification.

use kllgen_errors::{
    Result,
    common::{ErrorCategory, ErrorContext, ErrorSeverity, KllError, ResultExt},
    diagnostic::{Check, DiagnosticReport},
    range::RangeError,
    reference::ReferenceError,
    shape::ShapeError,
    template::TemplateError,
};

mod reference_error_tests {
    use super::*;

    #[test]
    fn test_all_variants_display() -> Result<()> {
        let variants = vec![
            ReferenceError::missing_result("T0", "R0"),
            ReferenceError::missing_trigger("default", "T3"),
            ReferenceError::missing_capability("R1", "usbKeyOut"),
            ReferenceError::missing_animation("T4", "rainbow"),
            ReferenceError::missing_settings("R2", "rainbow(loops:1)"),
            ReferenceError::missing_settings_trigger("rainbow(start)", "T9"),
            ReferenceError::MissingLayer {
                user: "R5".into(),
                layer: 3,
                layers: 2,
            },
            ReferenceError::MissingPixel {
                user: "S12".into(),
                pixel: 400,
            },
            ReferenceError::unknown("animation", "sparkle"),
        ];

        for variant in variants {
            assert!(!variant.to_string().is_empty());
            assert_eq!(variant.severity(), ErrorSeverity::Error);
        }
        Ok(())
    }

    #[test]
    fn test_converts_to_reference_category() -> Result<()> {
        let err: KllError = ReferenceError::missing_trigger("layer1", "T7").into();
        assert_eq!(err.category(), ErrorCategory::Reference);
        assert_eq!(err.category().exit_code(), 2);
        Ok(())
    }
}

mod range_error_tests {
    use super::*;

    #[test]
    fn test_scan_code_exit_code() -> Result<()> {
        let err: KllError = RangeError::scan_code("T0", 0x100, 0xFF).into();
        assert_eq!(err.category().exit_code(), 3);
        assert!(err.to_string().contains("0x100"));
        Ok(())
    }

    #[test]
    fn test_max_scan_code_display() -> Result<()> {
        let err = RangeError::MaxScanCode { value: 0x1FF };
        assert_eq!(err.to_string(), "MaxScanCode 0x1FF exceeds 0xFF");
        Ok(())
    }

    #[test]
    fn test_display_cell_display() -> Result<()> {
        let err = RangeError::DisplayCell {
            row: 5,
            col: 0,
            pixel: 130,
            max_pixel: 125,
        };
        assert!(err.to_string().contains("(5, 0)"));
        Ok(())
    }
}

mod shape_error_tests {
    use super::*;

    #[test]
    fn test_shape_exit_code() -> Result<()> {
        let err: KllError = ShapeError::duplicate("result macro", "R0").into();
        assert_eq!(err.category(), ErrorCategory::Shape);
        assert_eq!(err.category().exit_code(), 4);
        Ok(())
    }

    #[test]
    fn test_buffer_base_display() -> Result<()> {
        let err = ShapeError::BufferBase {
            buffer: 2,
            declared: 280,
            computed: 288,
        };
        assert!(err.to_string().contains("288"));
        Ok(())
    }
}

mod template_error_tests {
    use super::*;

    #[test]
    fn test_template_errors_are_critical() -> Result<()> {
        let variants = vec![
            TemplateError::unknown("kiibohdKeymap.h", "Nope", 4),
            TemplateError::Unterminated {
                template: "kiibohdKeymap.h".into(),
                line: 9,
            },
            TemplateError::Nested {
                template: "kiibohdKeymap.h".into(),
                line: 9,
            },
            TemplateError::no_generator("kiibohdPixelmap.c", "PixelMapping"),
        ];
        for variant in variants {
            let err: KllError = variant.into();
            assert!(err.is_fatal());
            assert_eq!(err.category().exit_code(), 5);
        }
        Ok(())
    }
}

mod kll_error_tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() -> Result<()> {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: KllError = io.into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category().exit_code(), 6);
        Ok(())
    }

    #[test]
    fn test_config_error() -> Result<()> {
        let err = KllError::config("schema_version 9 is newer than 1");
        assert_eq!(err.category().exit_code(), 7);
        assert!(err.to_string().starts_with("Configuration error"));
        Ok(())
    }

    #[test]
    fn test_other_error_exit_code() -> Result<()> {
        assert_eq!(KllError::other("boom").category().exit_code(), 1);
        Ok(())
    }

    #[test]
    fn test_context_is_added_to_config_error() -> Result<()> {
        let result: std::result::Result<(), KllError> = Err(KllError::config("bad yaml"));
        let err = match result.context(ErrorContext::new("load").with("path", "k.yaml")) {
            Err(e) => e,
            Ok(()) => return Err(KllError::other("expected an error")),
        };
        assert!(err.to_string().contains("k.yaml"));
        assert!(err.to_string().contains("bad yaml"));
        Ok(())
    }

    #[test]
    fn test_context_leaves_typed_errors_alone() -> Result<()> {
        let result: std::result::Result<(), RangeError> =
            Err(RangeError::scan_code("T0", 9, 8));
        let err = match result.with_context("validate") {
            Err(e) => e,
            Ok(()) => return Err(KllError::other("expected an error")),
        };
        assert!(matches!(err, KllError::Range(_)));
        Ok(())
    }

    #[test]
    fn test_empty_validation_report_is_other() -> Result<()> {
        let err = KllError::Validation(DiagnosticReport::new());
        assert_eq!(err.category(), ErrorCategory::Other);
        Ok(())
    }

    #[test]
    fn test_validation_report_category() -> Result<()> {
        let mut report = DiagnosticReport::new();
        report.error(
            Check::PixelChannels,
            "pixel 3",
            RangeError::channel(3, 700, 576),
        );
        let err: KllError = report.into();
        assert_eq!(err.category(), ErrorCategory::Range);
        assert!(!err.is_fatal());
        Ok(())
    }
}

mod snapshot_tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_missing_result_snapshot() {
        assert_snapshot!(
            KllError::from(ReferenceError::missing_result("T2", "R7")).to_string(),
            @"Reference error: Trigger macro 'T2' references unknown result macro 'R7'"
        );
    }

    #[test]
    fn test_duplicate_channel_snapshot() {
        let err = ShapeError::DuplicateChannel {
            channel: 33,
            buffer: 0,
            offset: 33,
            first: 1,
            second: 2,
        };
        assert_snapshot!(
            err.to_string(),
            @"Channel 33 (buffer 0, offset 33) is used by pixel 1 and pixel 2"
        );
    }

    #[test]
    fn test_report_snapshot() {
        let mut report = DiagnosticReport::new();
        report.error(
            Check::ScanCodeRange,
            "T1",
            RangeError::scan_code("T1", 0x4A, 0x40),
        );
        assert_snapshot!(
            report.to_string(),
            @"1 error(s), 0 warning(s); first: ERROR [scan-code-range] T1: 'T1' uses trigger uid 0x4A beyond MaxScanCode 0x40"
        );
    }
}
