//! LED pixel and animation sections of the configuration tree.

use serde::{Deserialize, Serialize};

/// Pixel section; absent for keyboards without LEDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PixelConfig {
    pub buffers: Vec<PixelBufferDef>,
    #[serde(default)]
    pub pixels: Vec<PixelDef>,
    /// Row-major pixel ids, 0 = empty cell.
    #[serde(default)]
    pub display: Vec<Vec<u16>>,
    /// C text pasted verbatim into the pixel map source.
    #[serde(default)]
    pub led_buffer_struct: Option<String>,
    #[serde(default)]
    pub frame_format: FrameFormat,
}

/// One channel buffer of the LED driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PixelBufferDef {
    /// Channels in the buffer.
    pub length: u32,
    /// Element width in bits.
    pub width: u8,
    /// Global channel base; derived when absent.
    #[serde(default)]
    pub base: Option<u32>,
    /// Backing memory symbol.
    pub buffer: String,
}

/// Logical pixel; no channels means blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PixelDef {
    /// 1-based pixel id.
    pub id: u16,
    #[serde(default)]
    pub channels: Vec<u32>,
    #[serde(default)]
    pub scan_code: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FrameFormat {
    /// Payload bytes of set/add/subtract/no-op changes (3 for RGB8).
    pub pixel_bytes: u8,
    /// Control-point bytes of interpolation changes.
    pub interpolation_payload_bytes: u8,
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self {
            pixel_bytes: 3,
            interpolation_payload_bytes: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationDef {
    pub name: String,
    /// Default settings of the animation.
    #[serde(default)]
    pub settings: AnimationModifiers,
    #[serde(default)]
    pub frames: Vec<FrameDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameDef {
    /// 1-based frame number.
    pub index: u32,
    #[serde(default)]
    pub records: Vec<PixelRecord>,
}

/// One pixel modification: where, how and with what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PixelRecord {
    pub address: Address,
    pub op: ChangeOp,
    #[serde(default)]
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum Address {
    Index {
        index: u32,
    },
    ScanCode {
        scan_code: u32,
    },
    Rect {
        column: Coord,
        row: Coord,
    },
    ColumnFill {
        column: Coord,
        #[serde(default)]
        secondary: u16,
    },
    RowFill {
        row: Coord,
        #[serde(default)]
        secondary: u16,
    },
    RelativeIndex {
        offset: i32,
    },
    RelativeRect {
        column: i16,
        row: i16,
    },
    RelativeColumnFill {
        column: i16,
        #[serde(default)]
        secondary: i16,
    },
    RelativeRowFill {
        row: i16,
        #[serde(default)]
        secondary: i16,
    },
}

/// Display coordinate: absolute, or a fraction of the display extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Absolute(u16),
    Fraction(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Set,
    Add,
    Subtract,
    NoOp,
    InterpLinear,
    InterpEaseIn,
    InterpEaseOut,
}

impl ChangeOp {
    pub fn is_interpolation(self) -> bool {
        matches!(
            self,
            ChangeOp::InterpLinear | ChangeOp::InterpEaseIn | ChangeOp::InterpEaseOut
        )
    }
}

/// Additional named settings for an animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationSettingsDef {
    pub name: String,
    pub animation: String,
    /// Trigger macro that activates these settings.
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub modifiers: AnimationModifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AnimationModifiers {
    /// Starting frame position.
    pub frame: u16,
    /// Loop count, 0 = forever.
    pub loops: u16,
    pub loop_forever: bool,
    pub framedelay: u16,
    pub framestretch: bool,
    pub ffunc: FrameFunction,
    pub pfunc: PixelFunction,
    pub replace: ReplaceMode,
    pub state: PlayState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameFunction {
    #[default]
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFunction {
    #[default]
    Off,
    Interp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceMode {
    #[default]
    Stack,
    Basic,
    All,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    Start,
    #[default]
    Pause,
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_accepts_integer_and_fraction() -> Result<(), serde_json::Error> {
        let abs: Coord = serde_json::from_str("9")?;
        let frac: Coord = serde_json::from_str("0.5")?;
        assert_eq!(abs, Coord::Absolute(9));
        assert_eq!(frac, Coord::Fraction(0.5));
        Ok(())
    }

    #[test]
    fn test_column_fill_secondary_defaults_to_zero() -> Result<(), serde_json::Error> {
        let address: Address = serde_json::from_str(r#"{"mode":"column_fill","column":19}"#)?;
        assert_eq!(
            address,
            Address::ColumnFill {
                column: Coord::Absolute(19),
                secondary: 0
            }
        );
        Ok(())
    }

    #[test]
    fn test_frame_format_default_is_rgb8() {
        let format = FrameFormat::default();
        assert_eq!(format.pixel_bytes, 3);
    }

    #[test]
    fn test_interpolation_ops() {
        assert!(ChangeOp::InterpEaseOut.is_interpolation());
        assert!(!ChangeOp::Subtract.is_interpolation());
    }
}
