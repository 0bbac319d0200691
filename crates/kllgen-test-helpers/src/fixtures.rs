//! Ready-made keymap configurations.
//!
//! Each fixture is a complete [`KeymapConfig`] that loads, validates and
//! generates without errors. Tests mutate a copy to provoke failures.

use kllgen_model::{
    Address, AnimationDef, AnimationEvent, AnimationModifiers, AnimationSettingsDef, CapabilityDef,
    CapabilityFeature, ChangeOp, Coord, FrameDef, KeyPositionDef, KeymapConfig, LayerDef,
    LayerMode, PixelBufferDef, PixelConfig, PixelDef, PixelRecord, ResultElement, ResultMacroDef,
    Schedule, TriggerElement, TriggerMacroDef,
};

/// Capabilities every routed result kind needs, in a fixed order.
///
/// | index | name |
/// |---|---|
/// | 0 | `noneOut` |
/// | 1 | `usbKeyOut` |
/// | 2 | `consCtrlOut` |
/// | 3 | `sysCtrlOut` |
/// | 4 | `layerShift` |
/// | 5 | `layerLatch` |
/// | 6 | `layerLock` |
/// | 7 | `animationIndex` |
pub fn standard_capabilities() -> Vec<CapabilityDef> {
    let safe = |c: CapabilityDef| CapabilityDef {
        feature: CapabilityFeature::Safe,
        ..c
    };
    vec![
        safe(CapabilityDef::new("noneOut", "Output_noneSend_capability")),
        safe(CapabilityDef::new("usbKeyOut", "Output_usbCodeSend_capability").with_arg("code", 1)),
        safe(CapabilityDef::new("consCtrlOut", "Output_consCtrlSend_capability").with_arg("code", 2)),
        safe(CapabilityDef::new("sysCtrlOut", "Output_sysCtrlSend_capability").with_arg("code", 1)),
        safe(CapabilityDef::new("layerShift", "Layer_layerShift_capability").with_arg("layer", 2)),
        safe(CapabilityDef::new("layerLatch", "Layer_layerLatch_capability").with_arg("layer", 2)),
        safe(CapabilityDef::new("layerLock", "Layer_layerLock_capability").with_arg("layer", 2)),
        CapabilityDef::new("animationIndex", "Pixel_AnimationIndex_capability").with_arg("index", 2),
    ]
}

fn switch(scan_code: u16) -> TriggerElement {
    TriggerElement::Switch {
        scan_code,
        board: 0,
        state: Schedule::Press,
    }
}

/// One empty default layer over scan codes 0..=2.
pub fn empty_keymap() -> KeymapConfig {
    KeymapConfig::new("empty", 2)
}

/// Scan code 5 fires `R0`, which invokes the zero-argument capability 0.
pub fn single_trigger_keymap() -> KeymapConfig {
    let mut config = KeymapConfig::new("single", 8);
    config.capabilities = standard_capabilities();
    config.results.push(ResultMacroDef::new(
        "R0",
        vec![vec![ResultElement::Capability {
            name: "noneOut".into(),
            args: Vec::new(),
        }]],
    ));
    config
        .triggers
        .push(TriggerMacroDef::new("T0", vec![vec![switch(5)]], "R0"));
    config.layers = vec![LayerDef::new("default").with_triggers(["T0"])];
    config
}

/// Two boards at offsets 0 and 64; scan code 10 on board 1 lands on 74.
pub fn interconnect_keymap() -> KeymapConfig {
    let mut config = KeymapConfig::new("interconnect", 0x7F);
    config.capabilities = standard_capabilities();
    config.interconnect_offsets = vec![0, 64];
    config
        .results
        .push(ResultMacroDef::new("R_a", vec![vec![ResultElement::Usb { code: 0x04 }]]));
    config.triggers.push(TriggerMacroDef::new(
        "T_right_a",
        vec![vec![TriggerElement::Switch {
            scan_code: 10,
            board: 1,
            state: Schedule::Press,
        }]],
        "R_a",
    ));
    config.layers = vec![LayerDef::new("default").with_triggers(["T_right_a"])];
    config
}

/// K-Type style LED layout: four 144-channel buffers, pixels 1..=8 on scan
/// codes 1..=8 and pixel 125 at the bottom-left of a 6×38 display.
pub fn ktype_pixels() -> PixelConfig {
    let buffers = (0..4u32)
        .map(|i| PixelBufferDef {
            length: 144,
            width: 16,
            base: Some(i * 144),
            buffer: format!("LED_pageBuffer[{i}].buffer"),
        })
        .collect();

    let mut pixels = vec![PixelDef {
        id: 1,
        channels: vec![0, 33, 49],
        scan_code: Some(1),
    }];
    pixels.extend((2..=8u16).map(|id| PixelDef {
        id,
        channels: vec![u32::from(id) - 1, 144 + u32::from(id), 288 + u32::from(id)],
        scan_code: Some(id),
    }));
    pixels.push(PixelDef {
        id: 125,
        channels: vec![440, 441, 442],
        scan_code: None,
    });

    let mut display = vec![vec![0u16; 38]; 6];
    if let Some(row) = display.first_mut() {
        for (cell, id) in row.iter_mut().zip(1..=8u16) {
            *cell = id;
        }
    }
    if let Some(cell) = display.get_mut(5).and_then(|row| row.first_mut()) {
        *cell = 125;
    }

    PixelConfig {
        buffers,
        pixels,
        display,
        led_buffer_struct: Some(
            "typedef struct LED_Buffer {\n\tuint16_t i2c_addr;\n\tuint16_t reg_addr;\n\tuint16_t buffer[144];\n} LED_Buffer;".into(),
        ),
        frame_format: Default::default(),
    }
}

/// Keymap carrying the K-Type pixel section and no animations.
pub fn display_keymap() -> KeymapConfig {
    let mut config = KeymapConfig::new("ktype", 0x30);
    config.capabilities = standard_capabilities();
    config.pixels = Some(ktype_pixels());
    config
}

fn rainbow_inter() -> AnimationDef {
    let colours: [[u8; 3]; 5] = [
        [0xFF, 0x00, 0x00],
        [0xFF, 0xFF, 0x00],
        [0x00, 0xFF, 0x00],
        [0x00, 0x00, 0xFF],
        [0xFF, 0x00, 0xFF],
    ];
    let columns = [0.0, 0.25, 0.5, 0.75, 1.0];
    let records = columns
        .iter()
        .zip(colours)
        .map(|(&f, rgb)| PixelRecord {
            address: Address::ColumnFill {
                column: Coord::Fraction(f),
                secondary: 0,
            },
            op: ChangeOp::Set,
            payload: rgb.to_vec(),
        })
        .collect();
    AnimationDef {
        name: "rainbow_inter".into(),
        settings: AnimationModifiers {
            loop_forever: true,
            framedelay: 1,
            ..Default::default()
        },
        frames: vec![FrameDef { index: 1, records }],
    }
}

/// The display keymap plus the single-frame `rainbow_inter` animation.
pub fn rainbow_keymap() -> KeymapConfig {
    let mut config = display_keymap();
    config.name = "rainbow".into();
    config.animations.push(rainbow_inter());
    config
}

/// Exercises every section: partial layers, multi-step results, every
/// routed result kind, animation settings with a trigger, rotation and
/// key positions.
pub fn full_keymap() -> KeymapConfig {
    let mut config = rainbow_keymap();
    config.name = "full".into();
    config.state_word_size = Some(8);
    config.sources.configuration = vec!["scancode_map.kll".into()];
    config.sources.generic = vec!["defaultMap.kll".into()];
    config
        .defines
        .insert("stateWordSize_define".into(), "8".into());
    config
        .defines
        .insert("ISSILedBrightness1_define".into(), "0xFF".into());

    config.results = vec![
        ResultMacroDef::new("R_a", vec![vec![ResultElement::Usb { code: 0x04 }]]),
        ResultMacroDef::new("R_b", vec![vec![ResultElement::Usb { code: 0x05 }]]),
        ResultMacroDef::new(
            "R_fn",
            vec![vec![ResultElement::Layer {
                mode: LayerMode::Shift,
                layer: 1,
            }]],
        ),
        ResultMacroDef::new(
            "R_hi",
            vec![
                vec![ResultElement::Usb { code: 0x0B }],
                vec![ResultElement::Usb { code: 0x0C }],
            ],
        ),
        ResultMacroDef::new("R_vol", vec![vec![ResultElement::Consumer { code: 0xE9 }]]),
        ResultMacroDef::new(
            "R_anim",
            vec![vec![ResultElement::Animation {
                settings: "rainbow_inter(loops:1)".into(),
            }]],
        ),
        ResultMacroDef::new("R_none", vec![vec![ResultElement::None]]),
    ];

    config.triggers = vec![
        TriggerMacroDef::new("T_a", vec![vec![switch(1)]], "R_a"),
        TriggerMacroDef::new("T_b", vec![vec![switch(2)]], "R_b"),
        TriggerMacroDef::new("T_fn", vec![vec![switch(3)]], "R_fn"),
        TriggerMacroDef::new("T_hi", vec![vec![switch(4), switch(5)]], "R_hi"),
        TriggerMacroDef::new(
            "T_rot",
            vec![vec![TriggerElement::Generic {
                code: 0x15,
                uid: 0,
                param: 3,
            }]],
            "R_none",
        ),
        TriggerMacroDef::new("T_vol", vec![vec![switch(1)]], "R_vol"),
        TriggerMacroDef::new("T_anim", vec![vec![switch(2)]], "R_anim"),
        TriggerMacroDef::new(
            "T_done",
            vec![vec![TriggerElement::Animation {
                animation: "rainbow_inter".into(),
                event: AnimationEvent::Done,
            }]],
            "R_none",
        ),
    ];

    let mut default = LayerDef::new("default").with_triggers(["T_a", "T_b", "T_fn", "T_hi", "T_rot"]);
    default.sources = vec!["defaultMap.kll".into()];
    let mut fn_layer = LayerDef::new("fn").with_triggers(["T_vol", "T_anim", "T_done"]);
    fn_layer.sources = vec!["fnMap.kll".into()];
    config.layers = vec![default, fn_layer];

    config.positions = (1..=5u16)
        .map(|scan_code| KeyPositionDef {
            scan_code,
            x: f64::from(scan_code - 1) * 19.05,
            ..Default::default()
        })
        .collect();

    config.animation_settings.push(AnimationSettingsDef {
        name: "rainbow_inter(loops:1)".into(),
        animation: "rainbow_inter".into(),
        trigger: Some("T_anim".into()),
        modifiers: AnimationModifiers {
            loops: 1,
            framedelay: 1,
            state: kllgen_model::PlayState::Start,
            ..Default::default()
        },
    });
    config
}
