//! Trigger and result guide bytecode.
//!
//! A guide is a sequence of combos, each written as `count, element*`,
//! followed by a terminating `0`. Trigger elements are `(type, state, uid)`
//! triples; result elements are a capability index followed by its
//! little-endian argument bytes.

use kllgen_errors::RangeError;
use kllgen_model::{AnimationEvent, LayerMode, Schedule};

/// Number of 256-uid banks for switch, analog, layer and animation triggers.
pub const TRIGGER_BANKS: u8 = 4;

/// Trigger type byte: class plus bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerType(u8);

impl TriggerType {
    pub const SWITCH: u8 = 0x00;
    pub const LED: u8 = 0x04;
    pub const ANALOG: u8 = 0x05;
    pub const LAYER: u8 = 0x09;
    pub const ANIMATION: u8 = 0x0D;
    pub const SLEEP: u8 = 0x11;
    pub const RESUME: u8 = 0x12;
    pub const INACTIVE: u8 = 0x13;
    pub const ACTIVE: u8 = 0x14;
    pub const ROTATION: u8 = 0x15;
    pub const DEBUG: u8 = 0xFF;

    pub fn from_byte(byte: u8) -> Self {
        TriggerType(byte)
    }

    /// Select the bank for `uid` and return the type with the uid's low byte.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::TriggerUid`] when `uid / 256` is not below `banks`.
    pub fn banked(first: u8, banks: u8, symbol: &str, uid: u32) -> Result<(Self, u8), RangeError> {
        let [low, ..] = uid.to_le_bytes();
        match u8::try_from(uid >> 8) {
            Ok(bank) if bank < banks => Ok((TriggerType(first.saturating_add(bank)), low)),
            _ => Err(RangeError::TriggerUid {
                symbol: symbol.to_owned(),
                uid,
                banks,
            }),
        }
    }

    pub fn byte(self) -> u8 {
        self.0
    }
}

fn schedule_byte(schedule: Schedule) -> u8 {
    match schedule {
        Schedule::Off => 0x00,
        Schedule::Press => 0x01,
        Schedule::Hold => 0x02,
        Schedule::Release => 0x03,
        Schedule::UniquePress => 0x04,
        Schedule::UniqueRelease => 0x05,
    }
}

const DONE: u8 = 0x06;
const REPEAT: u8 = 0x07;

/// State byte of a trigger element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Schedule(Schedule),
    /// Layer trigger; the mode flag is OR-ed onto the schedule.
    Layer {
        state: Schedule,
        mode: Option<LayerMode>,
    },
    Animation(AnimationEvent),
    /// Analog threshold or generic parameter.
    Raw(u8),
}

impl TriggerState {
    pub fn byte(self) -> u8 {
        match self {
            TriggerState::Schedule(s) => schedule_byte(s),
            TriggerState::Layer { state, mode } => {
                let flag = match mode {
                    None => 0x00,
                    Some(LayerMode::Shift) => 0x10,
                    Some(LayerMode::Latch) => 0x20,
                    Some(LayerMode::Lock) => 0x40,
                };
                schedule_byte(state) | flag
            }
            TriggerState::Animation(AnimationEvent::Done) => DONE,
            TriggerState::Animation(AnimationEvent::Repeat) => REPEAT,
            TriggerState::Animation(AnimationEvent::DoneOrRepeat) => REPEAT | DONE,
            TriggerState::Raw(b) => b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerRecord {
    pub kind: TriggerType,
    pub state: TriggerState,
    pub uid: u8,
}

/// Encoded trigger sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerGuide {
    pub combos: Vec<Vec<TriggerRecord>>,
}

impl TriggerGuide {
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for combo in &self.combos {
            out.push(count_byte(combo.len()));
            for record in combo {
                out.extend([record.kind.byte(), record.state.byte(), record.uid]);
            }
        }
        out.push(0);
        out
    }
}

/// One capability invocation inside a result combo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCall {
    pub capability: u8,
    pub args: Vec<u8>,
}

/// Encoded result sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultGuide {
    pub combos: Vec<Vec<ResultCall>>,
}

impl ResultGuide {
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for combo in &self.combos {
            out.push(count_byte(combo.len()));
            for call in combo {
                out.push(call.capability);
                out.extend_from_slice(&call.args);
            }
        }
        out.push(0);
        out
    }
}

// Oversized combos are rejected before emission.
fn count_byte(len: usize) -> u8 {
    u8::try_from(len).unwrap_or(u8::MAX)
}

/// Little-endian encoding of `value` in `width` bytes.
///
/// Accepts anything that fits either the signed or the unsigned range of
/// the width; negative values are two's complement.
///
/// # Errors
///
/// Returns [`RangeError::Argument`] when the value does not fit.
pub fn encode_le(symbol: &str, value: i64, width: u8) -> Result<Vec<u8>, RangeError> {
    let bits = u32::from(width).saturating_mul(8);
    let fits = match bits {
        0 => value == 0,
        64.. => true,
        _ => {
            let min = -(1i128 << (bits - 1));
            let max = (1i128 << bits) - 1;
            (min..=max).contains(&i128::from(value))
        }
    };
    if !fits {
        return Err(RangeError::argument(symbol, value, width));
    }
    Ok(value
        .to_le_bytes()
        .into_iter()
        .chain(std::iter::repeat(if value < 0 { 0xFF } else { 0x00 }))
        .take(usize::from(width))
        .collect())
}
