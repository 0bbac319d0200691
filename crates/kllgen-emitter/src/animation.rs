//! Animation frame compiler.
//!
//! Each frame becomes a stream of `(address type, address, change op,
//! payload)` records closed by a single `End` byte. Frames are numbered
//! from 1; missing numbers become `End`-only frames so the frame-pointer
//! array stays dense.

use std::collections::BTreeMap;

use kllgen_errors::{Check, DiagnosticReport, RangeError, ShapeError};
use kllgen_model::{Address, AnimationDef, ChangeOp, Coord};

/// Largest frame number an animation may declare.
pub const MAX_FRAME_INDEX: u32 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    End,
    Index,
    Rect,
    ColumnFill,
    RowFill,
    ScanCode,
    RelativeIndex,
    RelativeRect,
    RelativeColumnFill,
    RelativeRowFill,
}

impl AddressMode {
    pub fn byte(self) -> u8 {
        match self {
            AddressMode::End => 0,
            AddressMode::Index => 1,
            AddressMode::Rect => 2,
            AddressMode::ColumnFill => 3,
            AddressMode::RowFill => 4,
            AddressMode::ScanCode => 5,
            AddressMode::RelativeIndex => 6,
            AddressMode::RelativeRect => 7,
            AddressMode::RelativeColumnFill => 8,
            AddressMode::RelativeRowFill => 9,
        }
    }

    /// Address bytes following the type byte.
    pub fn address_len(self) -> usize {
        match self {
            AddressMode::End => 0,
            _ => 4,
        }
    }
}

pub fn op_byte(op: ChangeOp) -> u8 {
    match op {
        ChangeOp::Set => 0,
        ChangeOp::Add => 1,
        ChangeOp::Subtract => 2,
        ChangeOp::NoOp => 3,
        ChangeOp::InterpLinear => 4,
        ChangeOp::InterpEaseIn => 5,
        ChangeOp::InterpEaseOut => 6,
    }
}

/// Display size used to resolve fractional coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayExtent {
    pub columns: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    pub mode: AddressMode,
    pub address: Vec<u8>,
    pub op: ChangeOp,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// 1-based frame number.
    pub number: u32,
    pub records: Vec<FrameRecord>,
}

impl Frame {
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for record in &self.records {
            out.push(record.mode.byte());
            out.extend_from_slice(&record.address);
            out.push(op_byte(record.op));
            out.extend_from_slice(&record.payload);
        }
        out.push(AddressMode::End.byte());
        out
    }

    /// Whether walking the record layout lands exactly on one trailing
    /// `End` byte.
    pub fn is_terminated(&self) -> bool {
        let bytes = self.bytes();
        let walked: usize = self
            .records
            .iter()
            .map(|r| 2 + r.mode.address_len() + r.payload.len())
            .sum();
        self.records
            .iter()
            .all(|r| r.mode != AddressMode::End && r.address.len() == r.mode.address_len())
            && bytes.len() == walked + 1
            && bytes.last() == Some(&AddressMode::End.byte())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledAnimation {
    pub name: String,
    /// Dense frames 1..=last.
    pub frames: Vec<Frame>,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float to integer casts saturate; the result is range checked by the caller"
)]
fn round_to_i64(value: f64) -> i64 {
    value.round() as i64
}

fn coordinate(symbol: &str, coord: Coord, extent: usize) -> Result<u16, RangeError> {
    match coord {
        Coord::Absolute(v) => Ok(v),
        Coord::Fraction(f) => {
            let span = u32::try_from(extent.saturating_sub(1)).map_or(f64::from(u32::MAX), f64::from);
            let value = round_to_i64(span * f);
            if !(0.0..=1.0).contains(&f) {
                return Err(RangeError::address(symbol, value, 2));
            }
            u16::try_from(value)
                .ok()
                .ok_or_else(|| RangeError::address(symbol, value, 2))
        }
    }
}

fn pair_u16(a: u16, b: u16) -> Vec<u8> {
    a.to_le_bytes().into_iter().chain(b.to_le_bytes()).collect()
}

fn pair_i16(a: i16, b: i16) -> Vec<u8> {
    a.to_le_bytes().into_iter().chain(b.to_le_bytes()).collect()
}

/// Address type and little-endian address bytes.
///
/// # Errors
///
/// Returns [`RangeError::Address`] when a fractional coordinate lies
/// outside `0.0..=1.0`.
pub fn encode_address(
    symbol: &str,
    address: &Address,
    extent: DisplayExtent,
) -> Result<(AddressMode, Vec<u8>), RangeError> {
    Ok(match *address {
        Address::Index { index } => (AddressMode::Index, index.to_le_bytes().to_vec()),
        Address::ScanCode { scan_code } => (AddressMode::ScanCode, scan_code.to_le_bytes().to_vec()),
        Address::Rect { column, row } => (
            AddressMode::Rect,
            pair_u16(
                coordinate(symbol, column, extent.columns)?,
                coordinate(symbol, row, extent.rows)?,
            ),
        ),
        Address::ColumnFill { column, secondary } => (
            AddressMode::ColumnFill,
            pair_u16(coordinate(symbol, column, extent.columns)?, secondary),
        ),
        Address::RowFill { row, secondary } => (
            AddressMode::RowFill,
            pair_u16(coordinate(symbol, row, extent.rows)?, secondary),
        ),
        Address::RelativeIndex { offset } => (AddressMode::RelativeIndex, offset.to_le_bytes().to_vec()),
        Address::RelativeRect { column, row } => (AddressMode::RelativeRect, pair_i16(column, row)),
        Address::RelativeColumnFill { column, secondary } => {
            (AddressMode::RelativeColumnFill, pair_i16(column, secondary))
        }
        Address::RelativeRowFill { row, secondary } => {
            (AddressMode::RelativeRowFill, pair_i16(row, secondary))
        }
    })
}

/// Compile every frame of `def`, recording problems in `report`.
pub fn compile_animation(
    def: &AnimationDef,
    extent: DisplayExtent,
    report: &mut DiagnosticReport,
) -> CompiledAnimation {
    let mut numbered: BTreeMap<u32, Frame> = BTreeMap::new();
    for frame in &def.frames {
        let symbol = format!("{}_frame{}", def.name, frame.index);
        if frame.index == 0 {
            report.error(
                Check::IndexContiguity,
                &symbol,
                ShapeError::IndexGap {
                    kind: "animation frame".into(),
                    expected: 1,
                    found: 0,
                },
            );
            continue;
        }
        if frame.index > MAX_FRAME_INDEX {
            report.error(
                Check::FrameFormat,
                &symbol,
                RangeError::FrameIndex {
                    animation: def.name.clone(),
                    index: frame.index,
                    limit: MAX_FRAME_INDEX,
                },
            );
            continue;
        }
        if numbered.contains_key(&frame.index) {
            report.error(Check::Duplicates, &symbol, ShapeError::duplicate("animation frame", &symbol));
            continue;
        }
        let mut records = Vec::with_capacity(frame.records.len());
        for record in &frame.records {
            match encode_address(&symbol, &record.address, extent) {
                Ok((mode, address)) => records.push(FrameRecord {
                    mode,
                    address,
                    op: record.op,
                    payload: record.payload.clone(),
                }),
                Err(e) => report.error(Check::FrameFormat, &symbol, e),
            }
        }
        numbered.insert(
            frame.index,
            Frame {
                number: frame.index,
                records,
            },
        );
    }

    let last = numbered.keys().next_back().copied().unwrap_or(0);
    let frames = (1..=last)
        .map(|n| {
            numbered.remove(&n).unwrap_or(Frame {
                number: n,
                records: Vec::new(),
            })
        })
        .collect();
    tracing::debug!(animation = %def.name, frames = last, "compiled animation");
    CompiledAnimation {
        name: def.name.clone(),
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kllgen_errors::DiagnosticError;
    use kllgen_model::{FrameDef, PixelRecord};
    use kllgen_test_helpers::prelude::*;

    const EXTENT: DisplayExtent = DisplayExtent {
        columns: 38,
        rows: 6,
    };

    #[test]
    fn test_fraction_columns_resolve() {
        let columns: Vec<u16> = [0.0, 0.25, 0.5, 0.75, 1.0]
            .into_iter()
            .map(|f| must(coordinate("a", Coord::Fraction(f), 38)))
            .collect();
        assert_eq!(columns, vec![0, 9, 19, 28, 37]);
    }

    #[test]
    fn test_fraction_out_of_range() {
        let err = must_err(coordinate("a", Coord::Fraction(1.5), 38));
        assert!(matches!(err, RangeError::Address { .. }));
    }

    #[test]
    fn test_relative_rect_is_signed() {
        let (mode, bytes) = must(encode_address(
            "a",
            &Address::RelativeRect { column: -1, row: 2 },
            EXTENT,
        ));
        assert_eq!(mode.byte(), 7);
        assert_eq!(bytes, vec![0xFF, 0xFF, 0x02, 0x00]);
    }

    #[test]
    fn test_rainbow_frame_has_one_end() {
        let config = rainbow_keymap();
        let def = must_some(config.animations.first(), "rainbow_inter");
        let mut report = DiagnosticReport::new();
        let compiled = compile_animation(def, EXTENT, &mut report);
        assert!(report.is_empty());
        assert_eq!(compiled.frames.len(), 1);
        let frame = must_some(compiled.frames.first(), "frame 1");
        assert_eq!(frame.records.len(), 5);
        assert!(frame.is_terminated());
        // 5 × (type + 4 address + op + 3 payload) + End
        assert_eq!(frame.bytes().len(), 5 * 9 + 1);
    }

    #[test]
    fn test_missing_frames_are_filled() {
        let def = AnimationDef {
            name: "blink".into(),
            settings: Default::default(),
            frames: vec![FrameDef {
                index: 3,
                records: vec![PixelRecord {
                    address: Address::Index { index: 1 },
                    op: ChangeOp::Set,
                    payload: vec![1, 2, 3],
                }],
            }],
        };
        let mut report = DiagnosticReport::new();
        let compiled = compile_animation(&def, EXTENT, &mut report);
        let numbers: Vec<u32> = compiled.frames.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(compiled.frames.first().map(Frame::bytes), Some(vec![0]));
    }

    #[test]
    fn test_frame_index_beyond_limit_rejected() {
        let def = AnimationDef {
            name: "far".into(),
            settings: Default::default(),
            frames: vec![
                FrameDef {
                    index: 2,
                    records: Vec::new(),
                },
                FrameDef {
                    index: 20_000_000,
                    records: Vec::new(),
                },
            ],
        };
        let mut report = DiagnosticReport::new();
        let compiled = compile_animation(&def, EXTENT, &mut report);
        assert_eq!(compiled.frames.len(), 2);
        let diagnostic = must_some(report.by_check(Check::FrameFormat).next(), "frame limit");
        assert!(matches!(
            &diagnostic.error,
            DiagnosticError::Range(RangeError::FrameIndex { index: 20_000_000, .. })
        ));
    }

    #[test]
    fn test_duplicate_frame_reported() {
        let frame = FrameDef {
            index: 1,
            records: Vec::new(),
        };
        let def = AnimationDef {
            name: "dup".into(),
            settings: Default::default(),
            frames: vec![frame.clone(), frame],
        };
        let mut report = DiagnosticReport::new();
        compile_animation(&def, EXTENT, &mut report);
        assert_eq!(report.by_check(Check::Duplicates).count(), 1);
    }
}
