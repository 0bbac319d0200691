//! Cross-table checks over an assembled configuration.
//!
//! Everything here runs on tables that [`Assembly::build`] already produced,
//! so a problem caught while building is never reported twice.

use std::collections::{BTreeMap, BTreeSet};

use kllgen_errors::{Check, DiagnosticReport, RangeError, ReferenceError, ShapeError};
use kllgen_model::FrameFormat;

use crate::assembly::Assembly;
use crate::pixel::PixelEntry;
use crate::symbols::SymbolKind;

/// Largest MaxScanCode the one-byte scan code tables can hold.
pub const MAX_SCAN_CODE_LIMIT: u16 = 0xFF;

pub(crate) fn run(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    max_scan_code(assembly, report);
    result_references(assembly, report);
    scan_code_range(assembly, report);
    capability_arguments(assembly, report);
    state_word_size(assembly, report);
    interconnect_order(assembly, report);
    key_positions(assembly, report);
    index_contiguity(assembly, report);
    if assembly.config.pixels.is_some() {
        pixel_channels(assembly, report);
        buffer_layout(assembly, report);
        scan_code_pixels(assembly, report);
        display_map(assembly, report);
    }
    frames(assembly, report);
}

fn max_scan_code(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let value = assembly.config.max_scan_code;
    if value > MAX_SCAN_CODE_LIMIT {
        report.error(Check::MaxScanCode, "MaxScanCode", RangeError::MaxScanCode { value });
    }
}

fn result_references(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    for trigger in assembly.triggers.iter().filter(|t| t.result.is_none()) {
        report.error(
            Check::ResultResolves,
            &trigger.name,
            ReferenceError::missing_result(&trigger.name, &trigger.result_name),
        );
    }
}

fn scan_code_range(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let max = assembly.config.max_scan_code;
    // A trigger bound on several layers is reported once per scan code.
    let mut seen = BTreeSet::new();
    for layer in &assembly.layers {
        for (scan_code, triggers) in layer.map.iter().filter(|(s, _)| *s > u32::from(max)) {
            for &trigger in triggers {
                if !seen.insert((trigger, scan_code)) {
                    continue;
                }
                let name = assembly
                    .symbols
                    .name(SymbolKind::TriggerMacro, trigger)
                    .unwrap_or(layer.name.as_str());
                report.error(Check::ScanCodeRange, name, RangeError::scan_code(name, scan_code, max));
            }
        }
    }
}

fn capability_arguments(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let count = assembly.capabilities.len();
    if count > 256 {
        report.error(
            Check::CapabilityArguments,
            "CapabilitiesList",
            RangeError::IndexOverflow {
                table: "CapabilitiesList".into(),
                count,
                bits: 8,
                limit: 256,
            },
        );
        return;
    }
    for result in &assembly.results {
        for call in result.guide.combos.iter().flatten() {
            let Some(capability) = assembly.capabilities.get(usize::from(call.capability)) else {
                report.error(
                    Check::CapabilityArguments,
                    &result.name,
                    ReferenceError::unknown("capability index", call.capability.to_string()),
                );
                continue;
            };
            if call.args.len() != capability.arg_bytes() {
                report.error(
                    Check::CapabilityArguments,
                    &result.name,
                    ShapeError::ArgumentWidth {
                        symbol: result.name.clone(),
                        capability: capability.name.clone(),
                        expected: capability.arg_bytes(),
                        actual: call.args.len(),
                    },
                );
            }
        }
    }
}

fn state_word_size(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let Some(bits) = assembly.config.state_word_size else {
        return;
    };
    let limit = 1u64.checked_shl(u32::from(bits)).unwrap_or(u64::MAX);
    let tables = [
        ("TriggerMacroList", assembly.triggers.len()),
        ("ResultMacroList", assembly.results.len()),
    ];
    for (table, count) in tables {
        if u64::try_from(count).unwrap_or(u64::MAX) > limit {
            report.error(
                Check::StateWordSize,
                table,
                RangeError::IndexOverflow {
                    table: table.into(),
                    count,
                    bits,
                    limit,
                },
            );
        }
    }
}

fn interconnect_order(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let max = assembly.config.max_scan_code;
    for (board, &offset) in assembly.offsets.iter().enumerate() {
        if offset > max {
            report.error(
                Check::Interconnect,
                "InterconnectOffsetList",
                RangeError::InterconnectOffset { board, offset, max },
            );
        }
    }
    for (board, pair) in assembly.offsets.windows(2).enumerate() {
        if let [previous, offset] = *pair
            && offset < previous
        {
            report.error(
                Check::Interconnect,
                "InterconnectOffsetList",
                ShapeError::InterconnectOrder {
                    board: board.saturating_add(1),
                    offset,
                    previous,
                },
            );
        }
    }
}

fn key_positions(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let max = assembly.config.max_scan_code;
    for position in &assembly.config.positions {
        if position.scan_code == 0 || position.scan_code > max {
            report.error(
                Check::KeyPositions,
                format!("S{}", position.scan_code),
                RangeError::Position {
                    scan_code: u32::from(position.scan_code),
                    max,
                },
            );
        }
    }
}

fn index_contiguity(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    for kind in SymbolKind::ALL {
        for (position, (index, _)) in assembly.symbols.iter(kind).enumerate() {
            if position != index {
                report.error(
                    Check::IndexContiguity,
                    kind.as_str(),
                    ShapeError::IndexGap {
                        kind: kind.as_str().into(),
                        expected: position,
                        found: index,
                    },
                );
                break;
            }
        }
    }

    let Some(pixels) = &assembly.config.pixels else {
        return;
    };
    let mut ids = BTreeSet::new();
    for pixel in &pixels.pixels {
        if pixel.id == 0 {
            report.error(
                Check::IndexContiguity,
                "pixel 0",
                ShapeError::IndexGap {
                    kind: "pixel".into(),
                    expected: 1,
                    found: 0,
                },
            );
        } else if !ids.insert(pixel.id) {
            report.error(
                Check::Duplicates,
                format!("pixel {}", pixel.id),
                ShapeError::duplicate("pixel", pixel.id.to_string()),
            );
        }
    }
}

fn pixel_channels(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let Some(map) = &assembly.pixels else {
        return;
    };
    let total = map.total_channels();
    let mut owners: BTreeMap<(usize, u32), u16> = BTreeMap::new();
    for (id, entry) in (1u16..).zip(&map.mapping) {
        let PixelEntry::Channels { channels, .. } = entry else {
            continue;
        };
        for &channel in channels {
            let Some((buffer, offset)) = map.locate(channel) else {
                report.error(
                    Check::PixelChannels,
                    format!("pixel {id}"),
                    RangeError::channel(id, channel, total),
                );
                continue;
            };
            let first = *owners.entry((buffer, offset)).or_insert(id);
            if first != id {
                report.error(
                    Check::PixelChannels,
                    format!("pixel {id}"),
                    ShapeError::DuplicateChannel {
                        channel,
                        buffer,
                        offset,
                        first,
                        second: id,
                    },
                );
            }
        }
    }
}

fn buffer_layout(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let (Some(config), Some(map)) = (&assembly.config.pixels, &assembly.pixels) else {
        return;
    };
    for (buffer, (def, built)) in config.buffers.iter().zip(&map.buffers).enumerate() {
        if let Some(declared) = def.base
            && declared != built.base
        {
            report.error(
                Check::BufferLayout,
                &def.buffer,
                ShapeError::BufferBase {
                    buffer,
                    declared,
                    computed: built.base,
                },
            );
        }
    }
}

fn scan_code_pixels(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let (Some(config), Some(map)) = (&assembly.config.pixels, &assembly.pixels) else {
        return;
    };
    let max = assembly.config.max_scan_code;
    let mut owners: BTreeMap<u16, u16> = BTreeMap::new();
    for pixel in &config.pixels {
        let Some(scan_code) = pixel.scan_code else {
            continue;
        };
        let symbol = format!("pixel {}", pixel.id);
        if scan_code > max {
            report.error(
                Check::ScanCodePixels,
                &symbol,
                RangeError::scan_code(&symbol, u32::from(scan_code), max),
            );
        }
        if let Some(&first) = owners.get(&scan_code) {
            report.warning(
                Check::ScanCodePixels,
                &symbol,
                ShapeError::duplicate("pixel scan code", format!("S{scan_code} (pixels {first} and {})", pixel.id)),
            );
        } else {
            owners.insert(scan_code, pixel.id);
        }
    }
    let total = map.total_pixels();
    for (scan_code, &pixel) in (1u32..).zip(&map.scan_to_pixel) {
        if usize::from(pixel) > total {
            report.error(
                Check::ScanCodePixels,
                format!("S{scan_code}"),
                ReferenceError::MissingPixel {
                    user: format!("S{scan_code}"),
                    pixel,
                },
            );
        }
    }
}

fn display_map(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let Some(map) = &assembly.pixels else {
        return;
    };
    let max_pixel = u16::try_from(map.total_pixels()).unwrap_or(u16::MAX);
    for (row, cells) in map.display.iter().enumerate() {
        if cells.len() != map.columns {
            report.error(
                Check::DisplayMap,
                "Pixel_DisplayMapping",
                ShapeError::display_row(row, map.columns, cells.len()),
            );
        }
        for (col, &pixel) in cells.iter().enumerate() {
            if pixel > max_pixel {
                report.error(
                    Check::DisplayMap,
                    "Pixel_DisplayMapping",
                    RangeError::DisplayCell {
                        row,
                        col,
                        pixel,
                        max_pixel,
                    },
                );
            }
        }
    }
}

fn frames(assembly: &Assembly<'_>, report: &mut DiagnosticReport) {
    let format = assembly
        .config
        .pixels
        .as_ref()
        .map(|p| p.frame_format)
        .unwrap_or_default();
    for animation in &assembly.animations {
        for frame in &animation.frames {
            let symbol = format!("{}_frame{}", animation.name, frame.number);
            if !frame.is_terminated() {
                report.error(
                    Check::FrameTermination,
                    &symbol,
                    ShapeError::FrameTermination {
                        frame: symbol.clone(),
                    },
                );
            }
            for record in &frame.records {
                let expected = payload_width(format, record.op.is_interpolation());
                if record.payload.len() != expected {
                    report.error(
                        Check::FrameFormat,
                        &symbol,
                        ShapeError::payload(&symbol, expected, record.payload.len()),
                    );
                }
            }
        }
    }
}

fn payload_width(format: FrameFormat, interpolation: bool) -> usize {
    if interpolation {
        usize::from(format.interpolation_payload_bytes)
    } else {
        usize::from(format.pixel_bytes)
    }
}

#[cfg(test)]
mod tests {
    use kllgen_errors::{DiagnosticError, ErrorCategory};
    use kllgen_model::{
        ChangeOp, KeyPositionDef, KeymapConfig, PixelDef, PixelRecord, Schedule, TriggerElement,
        TriggerMacroDef,
    };
    use kllgen_test_helpers::prelude::*;
    use proptest::prelude::*;

    use super::*;

    fn report_for(config: &KeymapConfig) -> DiagnosticReport {
        Assembly::build(config).validate()
    }

    #[test]
    fn test_fixtures_are_clean() {
        for config in [
            empty_keymap(),
            single_trigger_keymap(),
            interconnect_keymap(),
            display_keymap(),
            rainbow_keymap(),
            full_keymap(),
        ] {
            let report = report_for(&config);
            assert!(report.is_empty(), "{}: {report:?}", config.name);
        }
    }

    #[test]
    fn test_missing_result_reported_once() {
        let mut config = single_trigger_keymap();
        if let Some(trigger) = config.triggers.first_mut() {
            trigger.result = "R99".into();
        }
        let report = report_for(&config);
        assert_eq!(report.len(), 1);
        let diagnostic = must_some(report.errors().next(), "error");
        assert_eq!(diagnostic.check, Check::ResultResolves);
        assert_eq!(diagnostic.category(), ErrorCategory::Reference);
    }

    #[test]
    fn test_scan_code_beyond_max() {
        let mut config = single_trigger_keymap();
        config.max_scan_code = 4;
        let report = report_for(&config);
        let diagnostic = must_some(report.by_check(Check::ScanCodeRange).next(), "scan code error");
        assert!(matches!(
            &diagnostic.error,
            DiagnosticError::Range(RangeError::ScanCode { scan_code: 5, max: 4, .. })
        ));
    }

    #[test]
    fn test_max_scan_code_limit() {
        let config = KeymapConfig::new("wide", 0x100);
        let report = report_for(&config);
        assert_eq!(report.by_check(Check::MaxScanCode).count(), 1);
    }

    #[test]
    fn test_shared_channel_rejected() {
        let mut config = display_keymap();
        if let Some(pixels) = config.pixels.as_mut() {
            pixels.pixels.push(PixelDef {
                id: 9,
                channels: vec![33, 200, 201],
                scan_code: None,
            });
        }
        let report = report_for(&config);
        let diagnostic = must_some(report.by_check(Check::PixelChannels).next(), "channel error");
        assert!(matches!(
            &diagnostic.error,
            DiagnosticError::Shape(ShapeError::DuplicateChannel { first: 1, second: 9, .. })
        ));
    }

    #[test]
    fn test_channel_outside_buffers() {
        let mut config = display_keymap();
        if let Some(pixels) = config.pixels.as_mut() {
            pixels.pixels.push(PixelDef {
                id: 9,
                channels: vec![576],
                scan_code: None,
            });
        }
        assert_eq!(report_for(&config).by_check(Check::PixelChannels).count(), 1);
    }

    #[test]
    fn test_declared_base_must_match() {
        let mut config = display_keymap();
        if let Some(buffer) = config.pixels.as_mut().and_then(|p| p.buffers.get_mut(2)) {
            buffer.base = Some(300);
        }
        let report = report_for(&config);
        let diagnostic = must_some(report.by_check(Check::BufferLayout).next(), "layout error");
        assert!(matches!(
            &diagnostic.error,
            DiagnosticError::Shape(ShapeError::BufferBase { buffer: 2, declared: 300, computed: 288 })
        ));
    }

    #[test]
    fn test_ragged_display_row() {
        let mut config = display_keymap();
        if let Some(row) = config.pixels.as_mut().and_then(|p| p.display.get_mut(2)) {
            row.pop();
        }
        assert_eq!(report_for(&config).by_check(Check::DisplayMap).count(), 1);
    }

    #[test]
    fn test_display_cell_beyond_pixels() {
        let mut config = display_keymap();
        if let Some(cell) = config
            .pixels
            .as_mut()
            .and_then(|p| p.display.get_mut(4))
            .and_then(|row| row.get_mut(3))
        {
            *cell = 126;
        }
        assert_eq!(report_for(&config).by_check(Check::DisplayMap).count(), 1);
    }

    #[test]
    fn test_payload_width_checked() {
        let mut config = rainbow_keymap();
        if let Some(frame) = config
            .animations
            .first_mut()
            .and_then(|a| a.frames.first_mut())
        {
            frame.records.push(PixelRecord {
                address: kllgen_model::Address::Index { index: 1 },
                op: ChangeOp::Add,
                payload: vec![1],
            });
        }
        let report = report_for(&config);
        assert_eq!(report.by_check(Check::FrameFormat).count(), 1);
        assert_eq!(report.by_check(Check::FrameTermination).count(), 0);
    }

    #[test]
    fn test_state_word_size_overflow() {
        let mut config = full_keymap();
        config.state_word_size = Some(2);
        let report = report_for(&config);
        // 8 triggers and 7 results against a limit of 4.
        assert_eq!(report.by_check(Check::StateWordSize).count(), 2);
    }

    #[test]
    fn test_interconnect_offsets_must_increase() {
        let mut config = interconnect_keymap();
        config.interconnect_offsets = vec![0, 64, 32];
        assert_eq!(report_for(&config).by_check(Check::Interconnect).count(), 1);
    }

    #[test]
    fn test_interconnect_offset_beyond_max_scan_code() {
        let mut config = interconnect_keymap();
        // Board 2 has no bound switches but its offset is still emitted.
        config.interconnect_offsets = vec![0, 64, 0x140];
        let report = report_for(&config);
        let diagnostic = must_some(report.by_check(Check::Interconnect).next(), "offset error");
        assert!(matches!(
            &diagnostic.error,
            DiagnosticError::Range(RangeError::InterconnectOffset { board: 2, offset: 0x140, max: 0x7F })
        ));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_position_out_of_range() {
        let mut config = single_trigger_keymap();
        config.positions.push(KeyPositionDef {
            scan_code: 9,
            ..Default::default()
        });
        assert_eq!(report_for(&config).by_check(Check::KeyPositions).count(), 1);
    }

    #[test]
    fn test_duplicate_trigger_name() {
        let mut config = single_trigger_keymap();
        config.triggers.push(TriggerMacroDef::new(
            "T0",
            vec![vec![TriggerElement::Switch {
                scan_code: 6,
                board: 0,
                state: Schedule::Press,
            }]],
            "R0",
        ));
        assert_eq!(report_for(&config).by_check(Check::Duplicates).count(), 1);
    }

    #[test]
    fn test_shared_pixel_scan_code_warns() {
        let mut config = display_keymap();
        if let Some(pixels) = config.pixels.as_mut() {
            pixels.pixels.push(PixelDef {
                id: 9,
                channels: vec![200, 201, 202],
                scan_code: Some(3),
            });
        }
        let report = report_for(&config);
        assert!(!report.has_errors());
        assert_eq!(report.warnings().count(), 1);
    }

    proptest! {
        #[test]
        fn prop_channel_in_buffers_or_reported(channel in 0u32..1200) {
            let mut pixels = ktype_pixels();
            pixels.display.clear();
            pixels.pixels = vec![PixelDef { id: 1, channels: vec![channel], scan_code: None }];
            let mut config = KeymapConfig::new("channels", 8);
            config.pixels = Some(pixels);
            let reported = report_for(&config).by_check(Check::PixelChannels).count();
            prop_assert_eq!(reported, usize::from(channel >= 576));
        }
    }
}
