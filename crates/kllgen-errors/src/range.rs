//! Range error types.
//!
//! Values that fall outside the table or encoding they must fit in.

use crate::common::ErrorSeverity;

/// Range error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Trigger list uid (scan code, indicator, layer, animation or generic
    /// uid) beyond MaxScanCode
    #[error("'{symbol}' uses trigger uid 0x{scan_code:02X} beyond MaxScanCode 0x{max:02X}")]
    ScanCode {
        /// Offending symbol
        symbol: String,
        /// Effective uid (scan codes after interconnect offset)
        scan_code: u32,
        /// Configured MaxScanCode
        max: u16,
    },

    /// MaxScanCode larger than one byte
    #[error("MaxScanCode 0x{value:X} exceeds 0xFF")]
    MaxScanCode {
        /// Configured value
        value: u16,
    },

    /// Pixel channel outside every channel buffer
    #[error("Pixel {pixel} channel {channel} is outside the {total} available channels")]
    Channel {
        /// Pixel id
        pixel: u16,
        /// Global channel index
        channel: u32,
        /// Total channels across buffers
        total: u32,
    },

    /// Display map cell referencing a pixel beyond the pixel table
    #[error("Display map cell ({row}, {col}) holds pixel {pixel} beyond the last pixel {max_pixel}")]
    DisplayCell {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// Pixel id in the cell
        pixel: u16,
        /// Highest declared pixel id
        max_pixel: u16,
    },

    /// Table longer than the firmware's state word can index
    #[error("{table} has {count} entries but stateWordSize {bits} indexes at most {limit}")]
    IndexOverflow {
        /// Table name
        table: String,
        /// Entry count
        count: usize,
        /// State word size in bits
        bits: u8,
        /// Largest indexable count
        limit: u64,
    },

    /// Interconnect board id without an offset entry
    #[error("'{symbol}' uses board {board} but only {boards} interconnect offsets are declared")]
    Board {
        /// Offending symbol
        symbol: String,
        /// Board id
        board: u8,
        /// Declared offsets
        boards: usize,
    },

    /// Trigger uid too large for its trigger type banks
    #[error("'{symbol}' uses uid {uid} which does not fit the {banks} trigger type banks")]
    TriggerUid {
        /// Offending symbol
        symbol: String,
        /// Uid value
        uid: u32,
        /// Available banks of 256
        banks: u8,
    },

    /// Capability argument value does not fit its declared width
    #[error("'{symbol}' argument {value} does not fit in {width} byte(s)")]
    Argument {
        /// Offending symbol
        symbol: String,
        /// Argument value
        value: i64,
        /// Declared width in bytes
        width: u8,
    },

    /// Animation address coordinate does not fit its encoding
    #[error("'{symbol}' address value {value} does not fit its {bytes}-byte field")]
    Address {
        /// Offending symbol
        symbol: String,
        /// Resolved value
        value: i64,
        /// Field width in bytes
        bytes: u8,
    },

    /// Animation frame number past the frame-pointer array limit
    #[error("Animation '{animation}' frame {index} exceeds the {limit} frame limit")]
    FrameIndex {
        /// Animation name
        animation: String,
        /// Declared frame number
        index: u32,
        /// Largest frame number
        limit: u32,
    },

    /// Interconnect offset that does not fit the scan code space
    #[error("Interconnect offset 0x{offset:02X} of board {board} is beyond MaxScanCode 0x{max:02X}")]
    InterconnectOffset {
        /// Board id
        board: usize,
        /// Declared or derived offset
        offset: u16,
        /// Configured MaxScanCode
        max: u16,
    },

    /// Key position bound to an invalid scan code
    #[error("Key position for scan code {scan_code} is outside 1..={max}")]
    Position {
        /// Scan code
        scan_code: u32,
        /// Configured MaxScanCode
        max: u16,
    },
}

impl RangeError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Scan code beyond MaxScanCode.
    pub fn scan_code(symbol: impl Into<String>, scan_code: u32, max: u16) -> Self {
        RangeError::ScanCode {
            symbol: symbol.into(),
            scan_code,
            max,
        }
    }

    /// Channel beyond the channel buffers.
    pub fn channel(pixel: u16, channel: u32, total: u32) -> Self {
        RangeError::Channel {
            pixel,
            channel,
            total,
        }
    }

    /// Argument too wide for its declared width.
    pub fn argument(symbol: impl Into<String>, value: i64, width: u8) -> Self {
        RangeError::Argument {
            symbol: symbol.into(),
            value,
            width,
        }
    }

    /// Address coordinate too wide for its field.
    pub fn address(symbol: impl Into<String>, value: i64, bytes: u8) -> Self {
        RangeError::Address {
            symbol: symbol.into(),
            value,
            bytes,
        }
    }
}
