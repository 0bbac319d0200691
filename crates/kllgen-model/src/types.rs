//! Keymap configuration tree.
//!
//! The frontend merges every `.kll` source of a target into one normalized
//! tree; this module is its on-disk shape. Every list is kept in
//! declaration order because the emitter derives firmware table indices
//! from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pixels::{AnimationDef, AnimationSettingsDef, PixelConfig};

/// Top-level versioned configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeymapConfig {
    /// Schema format version. Trees written before versioning deserialize as 0.
    #[serde(default)]
    pub schema_version: u32,

    /// Configuration name, printed in the generated file headers.
    pub name: String,

    #[serde(default)]
    pub sources: Sources,

    /// User `#define`s: C name → value.
    #[serde(default)]
    pub defines: BTreeMap<String, String>,

    /// Highest scan code of the keyboard, inclusive.
    pub max_scan_code: u16,

    /// Width in bits of the firmware's macro index type.
    #[serde(default)]
    pub state_word_size: Option<u8>,

    /// Explicit scan-code offset per interconnect board.
    #[serde(default)]
    pub interconnect_offsets: Vec<u16>,

    /// Scan codes per interconnect board, used to derive offsets when no
    /// explicit offsets are given.
    #[serde(default)]
    pub board_scan_codes: Vec<u16>,

    #[serde(default)]
    pub capabilities: Vec<CapabilityDef>,

    #[serde(default)]
    pub routing: Routing,

    #[serde(default)]
    pub results: Vec<ResultMacroDef>,

    #[serde(default)]
    pub triggers: Vec<TriggerMacroDef>,

    /// Layer 0 is the default layer, the rest are partial layers.
    pub layers: Vec<LayerDef>,

    #[serde(default)]
    pub positions: Vec<KeyPositionDef>,

    #[serde(default)]
    pub pixels: Option<PixelConfig>,

    #[serde(default)]
    pub animations: Vec<AnimationDef>,

    #[serde(default)]
    pub animation_settings: Vec<AnimationSettingsDef>,
}

impl KeymapConfig {
    /// Minimal configuration: one empty default layer.
    pub fn new(name: impl Into<String>, max_scan_code: u16) -> Self {
        Self {
            schema_version: crate::CURRENT_SCHEMA_VERSION,
            name: name.into(),
            sources: Sources::default(),
            defines: BTreeMap::new(),
            max_scan_code,
            state_word_size: None,
            interconnect_offsets: Vec::new(),
            board_scan_codes: Vec::new(),
            capabilities: Vec::new(),
            routing: Routing::default(),
            results: Vec::new(),
            triggers: Vec::new(),
            layers: vec![LayerDef::new("default")],
            positions: Vec::new(),
            pixels: None,
            animations: Vec::new(),
            animation_settings: Vec::new(),
        }
    }

    /// Look up a capability declaration by name.
    pub fn capability(&self, name: &str) -> Option<&CapabilityDef> {
        self.capabilities.iter().find(|c| c.name == name)
    }

    /// Look up a trigger macro by name.
    pub fn trigger(&self, name: &str) -> Option<&TriggerMacroDef> {
        self.triggers.iter().find(|t| t.name == name)
    }
}

/// Source files that contributed to the tree, for the information header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sources {
    #[serde(default)]
    pub configuration: Vec<String>,
    #[serde(default)]
    pub generic: Vec<String>,
    #[serde(default)]
    pub base: Vec<String>,
}

/// Firmware capability declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityDef {
    /// Name used by result macros.
    pub name: String,
    /// C function implementing the capability.
    pub function: String,
    #[serde(default)]
    pub args: Vec<CapabilityArg>,
    #[serde(default)]
    pub feature: CapabilityFeature,
}

impl CapabilityDef {
    pub fn new(name: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function: function.into(),
            args: Vec::new(),
            feature: CapabilityFeature::None,
        }
    }

    /// Builder: append an argument.
    pub fn with_arg(mut self, name: impl Into<String>, width: u8) -> Self {
        self.args.push(CapabilityArg {
            name: name.into(),
            width,
        });
        self
    }

    /// Total argument width in bytes.
    pub fn arg_bytes(&self) -> usize {
        self.args.iter().map(|a| usize::from(a.width)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityArg {
    pub name: String,
    /// Width in bytes.
    pub width: u8,
}

/// Whether the firmware may run the capability from any context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityFeature {
    Safe,
    #[default]
    None,
}

/// Capability names that implement each routed result kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Routing {
    pub usb: String,
    pub consumer: String,
    pub system: String,
    pub layer_shift: String,
    pub layer_latch: String,
    pub layer_lock: String,
    pub animation: String,
    /// Advance marker inserted between the steps of a multi-step result.
    pub spacer: Option<String>,
}

impl Default for Routing {
    fn default() -> Self {
        Self {
            usb: "usbKeyOut".into(),
            consumer: "consCtrlOut".into(),
            system: "sysCtrlOut".into(),
            layer_shift: "layerShift".into(),
            layer_latch: "layerLatch".into(),
            layer_lock: "layerLock".into(),
            animation: "animationIndex".into(),
            spacer: Some("usbKeyOut".into()),
        }
    }
}

/// Named result macro: a sequence of parallel combos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultMacroDef {
    pub name: String,
    pub steps: Vec<Vec<ResultElement>>,
}

impl ResultMacroDef {
    pub fn new(name: impl Into<String>, steps: Vec<Vec<ResultElement>>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ResultElement {
    /// Explicit capability call, one value per declared argument.
    Capability {
        name: String,
        #[serde(default)]
        args: Vec<i64>,
    },
    Usb {
        code: u32,
    },
    Consumer {
        code: u32,
    },
    System {
        code: u32,
    },
    Layer {
        mode: LayerMode,
        layer: u32,
    },
    /// Start an animation; `settings` names animation settings or an
    /// animation (its default settings).
    Animation {
        settings: String,
    },
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerMode {
    Shift,
    Latch,
    Lock,
}

/// Named trigger macro: a sequence of combos and the result it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerMacroDef {
    pub name: String,
    pub sequence: Vec<Vec<TriggerElement>>,
    pub result: String,
}

impl TriggerMacroDef {
    pub fn new(
        name: impl Into<String>,
        sequence: Vec<Vec<TriggerElement>>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sequence,
            result: result.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TriggerElement {
    /// Key switch; `scan_code` is local to `board`.
    Switch {
        scan_code: u16,
        #[serde(default)]
        board: u8,
        #[serde(default)]
        state: Schedule,
    },
    /// HID LED indicator.
    Indicator {
        code: u16,
        #[serde(default)]
        state: Schedule,
    },
    Layer {
        layer: u16,
        #[serde(default)]
        mode: Option<LayerMode>,
        #[serde(default)]
        state: Schedule,
    },
    Animation {
        animation: String,
        #[serde(default)]
        event: AnimationEvent,
    },
    Analog {
        code: u16,
        threshold: u8,
    },
    /// Raw trigger type code, e.g. sleep/resume/rotation.
    Generic {
        code: u8,
        uid: u16,
        #[serde(default)]
        param: u8,
    },
}

/// Schedule state a trigger element waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    #[default]
    Press,
    Hold,
    Release,
    Off,
    UniquePress,
    UniqueRelease,
}

/// Animation lifecycle events that can fire a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationEvent {
    Done,
    Repeat,
    #[default]
    DoneOrRepeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerDef {
    pub name: String,
    /// Files that make up the layer, for the information header.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Trigger macros active on this layer.
    #[serde(default)]
    pub triggers: Vec<String>,
}

impl LayerDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            triggers: Vec::new(),
        }
    }

    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers.extend(triggers.into_iter().map(Into::into));
        self
    }
}

/// Physical key position in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyPositionDef {
    pub scan_code: u16,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub rx: f64,
    #[serde(default)]
    pub ry: f64,
    #[serde(default)]
    pub rz: f64,
}
