//! C text for every generated table.
//!
//! Each function renders the complete text of one template placeholder.
//! Byte values inside guides and frames print as `0x..` hex, counts and
//! indices as decimal.

use kllgen_model::{
    AnimationEvent, CapabilityFeature, ChangeOp, FrameFunction, LayerMode, PixelFunction,
    PlayState, ReplaceMode, Schedule,
};

use crate::animation::{AddressMode, Frame};
use crate::assembly::{AnimationSetting, Assembly};
use crate::bytecode::{ResultCall, TriggerRecord, TriggerState, TriggerType};
use crate::pixel::{PixelEntry, PixelMap};

/// Generator name and version printed in every header.
pub const GENERATOR: &str = concat!("kllgen ", env!("CARGO_PKG_VERSION"));

fn hex(byte: u8) -> String {
    format!("0x{byte:02X}")
}

// ----- Names -----

pub fn trigger_type_name(kind: TriggerType) -> String {
    let byte = kind.byte();
    let bank = |first: u8| byte.saturating_sub(first).saturating_add(1);
    match byte {
        0x00..=0x03 => format!("TriggerType_Switch{}", bank(TriggerType::SWITCH)),
        TriggerType::LED => "TriggerType_LED1".into(),
        0x05..=0x08 => format!("TriggerType_Analog{}", bank(TriggerType::ANALOG)),
        0x09..=0x0C => format!("TriggerType_Layer{}", bank(TriggerType::LAYER)),
        0x0D..=0x10 => format!("TriggerType_Animation{}", bank(TriggerType::ANIMATION)),
        TriggerType::SLEEP => "TriggerType_Sleep1".into(),
        TriggerType::RESUME => "TriggerType_Resume1".into(),
        TriggerType::INACTIVE => "TriggerType_Inactive1".into(),
        TriggerType::ACTIVE => "TriggerType_Active1".into(),
        TriggerType::ROTATION => "TriggerType_Rotation1".into(),
        TriggerType::DEBUG => "TriggerType_Debug".into(),
        other => hex(other),
    }
}

fn schedule_name(schedule: Schedule) -> &'static str {
    match schedule {
        Schedule::Off => "ScheduleType_O",
        Schedule::Press => "ScheduleType_P",
        Schedule::Hold => "ScheduleType_H",
        Schedule::Release => "ScheduleType_R",
        Schedule::UniquePress => "ScheduleType_UP",
        Schedule::UniqueRelease => "ScheduleType_UR",
    }
}

pub fn trigger_state_text(state: TriggerState) -> String {
    match state {
        TriggerState::Schedule(s) => schedule_name(s).into(),
        TriggerState::Layer { state, mode: None } => schedule_name(state).into(),
        TriggerState::Layer {
            state,
            mode: Some(mode),
        } => {
            let flag = match mode {
                LayerMode::Shift => "ScheduleType_Shift",
                LayerMode::Latch => "ScheduleType_Latch",
                LayerMode::Lock => "ScheduleType_Lock",
            };
            format!("{} | {flag}", schedule_name(state))
        }
        TriggerState::Animation(AnimationEvent::Done) => "ScheduleType_Done".into(),
        TriggerState::Animation(AnimationEvent::Repeat) => "ScheduleType_Repeat".into(),
        TriggerState::Animation(AnimationEvent::DoneOrRepeat) => {
            "ScheduleType_Repeat | ScheduleType_Done".into()
        }
        TriggerState::Raw(b) => hex(b),
    }
}

fn address_name(mode: AddressMode) -> &'static str {
    match mode {
        AddressMode::End => "PixelAddressType_End",
        AddressMode::Index => "PixelAddressType_Index",
        AddressMode::Rect => "PixelAddressType_Rect",
        AddressMode::ColumnFill => "PixelAddressType_ColumnFill",
        AddressMode::RowFill => "PixelAddressType_RowFill",
        AddressMode::ScanCode => "PixelAddressType_ScanCode",
        AddressMode::RelativeIndex => "PixelAddressType_RelativeIndex",
        AddressMode::RelativeRect => "PixelAddressType_RelativeRect",
        AddressMode::RelativeColumnFill => "PixelAddressType_RelativeColumnFill",
        AddressMode::RelativeRowFill => "PixelAddressType_RelativeRowFill",
    }
}

fn change_name(op: ChangeOp) -> &'static str {
    match op {
        ChangeOp::Set => "PixelChange_Set",
        ChangeOp::Add => "PixelChange_Add",
        ChangeOp::Subtract => "PixelChange_Subtract",
        ChangeOp::NoOp => "PixelChange_NoOp",
        ChangeOp::InterpLinear => "PixelChange_InterpolateLinear",
        ChangeOp::InterpEaseIn => "PixelChange_InterpolateEaseIn",
        ChangeOp::InterpEaseOut => "PixelChange_InterpolateEaseOut",
    }
}

// ----- Header -----

pub fn information(a: &Assembly<'_>) -> String {
    let config = a.config;
    let mut out = format!("// Generated by {GENERATOR}, do not edit\n");
    out.push_str(&format!("// Configuration: {}\n//\n", config.name));
    let files = |title: &str, files: &[String]| {
        let mut section = format!("// - {title} -\n");
        for file in files {
            section.push_str(&format!("//   {file}\n"));
        }
        section
    };
    out.push_str(&files("Configuration Files", &config.sources.configuration));
    out.push_str(&files("Generic Files", &config.sources.generic));
    out.push_str(&files("Base Files", &config.sources.base));
    out.push_str("// - Default Layer -\n");
    if let Some(layer) = a.layers.first() {
        out.push_str(&format!("//   {}\n", layer.label));
    }
    out.push_str("// - Partial Layers -\n");
    for (n, layer) in a.layers.iter().enumerate().skip(1) {
        out.push_str(&format!("//   {n}: {}\n", layer.label));
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn defines(a: &Assembly<'_>) -> String {
    a.config
        .defines
        .iter()
        .map(|(name, value)| format!("\n#define {name} {value}"))
        .collect()
}

// ----- Capabilities -----

pub fn capabilities_func_decl(a: &Assembly<'_>) -> String {
    a.capabilities
        .iter()
        .map(|c| {
            format!(
                "void {}( TriggerMacro *trigger, uint8_t state, uint8_t stateType, uint8_t *args );",
                c.function
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn capabilities_list(a: &Assembly<'_>) -> String {
    let mut out = String::from("const Capability CapabilitiesList[] = {\n");
    for (i, c) in a.capabilities.iter().enumerate() {
        let feature = match c.feature {
            CapabilityFeature::Safe => "CapabilityFeature_Safe",
            CapabilityFeature::None => "CapabilityFeature_None",
        };
        out.push_str(&format!(
            "\t/* {i} {} */\n\t{{ {}, {}, {feature} }},\n",
            c.name,
            c.function,
            c.arg_bytes()
        ));
    }
    out.push_str("};");
    out
}

pub fn capabilities_indices(a: &Assembly<'_>) -> String {
    let mut out = String::from("typedef enum CapabilityIndex {\n");
    for c in &a.capabilities {
        out.push_str(&format!("\t{}_index,\n", c.function));
    }
    out.push_str("} CapabilityIndex;");
    out
}

// ----- Macros -----

fn result_call_text(call: &ResultCall) -> String {
    std::iter::once(call.capability.to_string())
        .chain(call.args.iter().map(|&b| hex(b)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn trigger_record_text(record: &TriggerRecord) -> String {
    format!(
        "{}, {}, {}",
        trigger_type_name(record.kind),
        trigger_state_text(record.state),
        hex(record.uid)
    )
}

fn guide_text<T>(combos: &[Vec<T>], element: impl Fn(&T) -> String) -> String {
    let mut parts = Vec::new();
    for combo in combos {
        parts.push(combo.len().to_string());
        parts.extend(combo.iter().map(&element));
    }
    parts.push("0".into());
    parts.join(", ")
}

pub fn result_macros(a: &Assembly<'_>) -> String {
    a.results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "Guide_RM( {i} ) = {{ {} }}; // {}",
                guide_text(&r.guide.combos, result_call_text),
                r.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn result_macro_list(a: &Assembly<'_>) -> String {
    let mut out = String::from("const ResultMacro ResultMacroList[] = {\n");
    for (i, r) in a.results.iter().enumerate() {
        out.push_str(&format!("\tDefine_RM( {i} ), // {}\n", r.name));
    }
    out.push_str("};");
    out
}

pub fn trigger_macros(a: &Assembly<'_>) -> String {
    a.trigger_guides
        .iter()
        .enumerate()
        .map(|(i, g)| {
            format!(
                "Guide_TM( {i} ) = {{ {} }}; // {}",
                guide_text(&g.guide.combos, trigger_record_text),
                g.users.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn trigger_macro_list(a: &Assembly<'_>) -> String {
    let mut out = String::from("const TriggerMacro TriggerMacroList[] = {\n");
    for (i, t) in a.triggers.iter().enumerate() {
        out.push_str(&format!(
            "\t/* {i} */ Define_TM( {}, {} ), // {}\n",
            t.guide,
            t.result.unwrap_or_default(),
            t.name
        ));
    }
    out.push_str("};");
    out
}

pub fn trigger_macro_record() -> String {
    "TriggerMacroRecord TriggerMacroRecordList[ TriggerMacroNum ];".into()
}

// ----- Layers -----

pub fn max_scan_code(a: &Assembly<'_>) -> String {
    format!("0x{:X}", a.config.max_scan_code)
}

fn trigger_list_entry(prefix: &str, scan_code: u32, triggers: &[usize]) -> String {
    let items: String = triggers.iter().map(|t| format!(", {t}")).collect();
    format!(
        "Define_TL( {prefix}, 0x{scan_code:02X} ) = {{ {}{items} }};",
        triggers.len()
    )
}

fn default_lists(a: &Assembly<'_>) -> Vec<Vec<usize>> {
    a.layers
        .first()
        .map(|l| l.map.dense(0, u32::from(a.config.max_scan_code)))
        .unwrap_or_default()
}

pub fn default_layer_trigger_list(a: &Assembly<'_>) -> String {
    (0u32..)
        .zip(default_lists(a))
        .map(|(scan_code, list)| trigger_list_entry("default", scan_code, &list))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn default_layer_scan_map(a: &Assembly<'_>) -> String {
    let mut out = String::from("const nat_ptr_t *default_scanMap[] = {\n");
    for (scan_code, _) in (0u32..).zip(default_lists(a)) {
        out.push_str(&format!("\tdefault_tl_0x{scan_code:02X},\n"));
    }
    out.push_str("};");
    out
}

pub fn partial_layer_trigger_lists(a: &Assembly<'_>) -> String {
    a.layers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(n, layer)| {
            let (_, lists) = layer.map.span();
            let prefix = format!("layer{n}");
            let mut out = format!("// Partial Layer {n}\n");
            let entries: Vec<String> = (0u32..)
                .zip(lists)
                .map(|(rel, list)| trigger_list_entry(&prefix, rel, &list))
                .collect();
            out.push_str(&entries.join("\n"));
            out
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn partial_layer_scan_maps(a: &Assembly<'_>) -> String {
    a.layers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(n, layer)| {
            let (_, lists) = layer.map.span();
            let mut out = format!("// Partial Layer {n}\nconst nat_ptr_t *layer{n}_scanMap[] = {{\n");
            for (rel, _) in (0u32..).zip(lists) {
                out.push_str(&format!("\tlayer{n}_tl_0x{rel:02X},\n"));
            }
            out.push_str("};");
            out
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn layer_index_list(a: &Assembly<'_>) -> String {
    let mut out = String::from("const Layer LayerIndex[] = {\n");
    for (n, layer) in a.layers.iter().enumerate() {
        if n == 0 {
            out.push_str(&format!(
                "\tLayer_IN( default_scanMap, \"D: {}\", 0x00 ),\n",
                layer.label
            ));
        } else {
            let (first, _) = layer.map.span();
            out.push_str(&format!(
                "\tLayer_IN( layer{n}_scanMap, \"{n}: {}\", 0x{first:02X} ),\n",
                layer.label
            ));
        }
    }
    out.push_str("};");
    out
}

pub fn layer_state(a: &Assembly<'_>) -> String {
    let states: Vec<&str> = (0..a.layers.len())
        .map(|n| {
            if n == 0 {
                "LayerStateType_Lock"
            } else {
                "LayerStateType_Off"
            }
        })
        .collect();
    format!(
        "LayerStateType LayerState[ LayerNum ] = {{ {} }};",
        states.join(", ")
    )
}

pub fn interconnect_offset_list(a: &Assembly<'_>) -> String {
    if a.offsets.is_empty() {
        return String::new();
    }
    let mut out = String::from("const uint8_t InterconnectOffsetList[] = {\n");
    for offset in &a.offsets {
        out.push_str(&format!("\t0x{offset:02X},\n"));
    }
    out.push_str("};");
    out
}

pub fn interconnect_node_max(a: &Assembly<'_>) -> String {
    format!("#define InterconnectNodeMax 0x{:X}", a.offsets.len())
}

pub fn rotation_parameters(a: &Assembly<'_>) -> String {
    let mut out = String::from("const uint8_t Rotation_MaxParameter[] = {\n");
    for (uid, max) in a.rotation.dense().into_iter().enumerate() {
        out.push_str(&format!("\t/*{uid}*/ {max},\n"));
    }
    out.push_str("};");
    out
}

pub fn key_positions(a: &Assembly<'_>) -> String {
    let mut out = String::from("const Position Key_Positions[] = {\n");
    for (scan_code, p) in &a.positions.entries {
        out.push_str(&format!(
            "\tPositionEntry( {:?}, {:?}, {:?}, {:?}, {:?}, {:?} ), // S{scan_code}\n",
            p.x, p.y, p.z, p.rx, p.ry, p.rz
        ));
    }
    out.push_str("};");
    out
}

// ----- Pixels -----

pub fn led_buffer_struct(map: &PixelMap) -> String {
    map.led_buffer_struct.clone().unwrap_or_default()
}

pub fn pixel_buffer_setup(map: &PixelMap) -> String {
    let mut out = String::from("PixelBuf Pixel_Buffers[] = {\n");
    for b in &map.buffers {
        out.push_str(&format!(
            "\tPixelBufElem( {}, {}, {}, {} ),\n",
            b.length, b.width, b.base, b.symbol
        ));
    }
    out.push_str("};");
    out
}

pub fn pixel_mapping(map: &PixelMap) -> String {
    let mut out = String::from("const PixelElement Pixel_Mapping[] = {\n");
    for (id, entry) in (1u32..).zip(&map.mapping) {
        let element = match entry {
            PixelEntry::Blank => "Pixel_Blank()".to_string(),
            PixelEntry::Channels { channels, .. } if channels.len() == 3 => {
                let list: Vec<String> = channels.iter().map(u32::to_string).collect();
                format!("Pixel_RGBChannel({})", list.join(","))
            }
            PixelEntry::Channels { width, channels } => {
                let list: Vec<String> = channels.iter().map(u32::to_string).collect();
                format!("{{ {width}, {}, {{{}}} }}", channels.len(), list.join(","))
            }
        };
        out.push_str(&format!("\t{element}, // {id}\n"));
    }
    out.push_str("};");
    out
}

pub fn scan_code_to_pixel(map: &PixelMap) -> String {
    let mut out = String::from("const uint16_t Pixel_ScanCodeToPixel[] = {\n");
    for (scan_code, pixel) in (1u32..).zip(&map.scan_to_pixel) {
        out.push_str(&format!("\t/*{scan_code}*/ {pixel},\n"));
    }
    out.push_str("};");
    out
}

pub fn scan_code_to_display(map: &PixelMap) -> String {
    let mut out = String::from("const uint16_t Pixel_ScanCodeToDisplay[] = {\n");
    for (scan_code, offset) in (1u32..).zip(&map.scan_to_display) {
        out.push_str(&format!("\t/*{scan_code}*/ {offset},\n"));
    }
    out.push_str("};");
    out
}

pub fn pixel_display_mapping(map: &PixelMap) -> String {
    let element = if map.wide_display() { "uint16_t" } else { "uint8_t" };
    let mut out = format!("const {element} Pixel_DisplayMapping[] = {{\n");
    for row in &map.display {
        let cells: Vec<String> = row.iter().map(|c| format!("{c:>3}")).collect();
        out.push_str(&cells.join(","));
        out.push_str(",\n");
    }
    out.push_str("};");
    out
}

// ----- Animations -----

fn frame_text(name: &str, frame: &Frame) -> String {
    let n = frame.number;
    if frame.records.is_empty() {
        return format!("const uint8_t {name}_frame{n}[] = {{ PixelAddressType_End }};");
    }
    let mut out = format!("// {name} frame {n}\nconst uint8_t {name}_frame{n}[] = {{\n");
    for record in &frame.records {
        let mut parts = vec![address_name(record.mode).to_string()];
        parts.extend(record.address.iter().map(|&b| hex(b)));
        parts.push(change_name(record.op).into());
        parts.extend(record.payload.iter().map(|&b| hex(b)));
        out.push_str(&format!("\t{},\n", parts.join(", ")));
    }
    out.push_str("\tPixelAddressType_End\n};");
    out
}

pub fn animation_frames(a: &Assembly<'_>) -> String {
    let mut sections = Vec::new();
    for animation in &a.animations {
        let name = &animation.name;
        for frame in &animation.frames {
            sections.push(frame_text(name, frame));
        }
        let mut set = format!("//// {name} Animation Frame Set ////\nconst uint8_t *{name}_frames[] = {{\n");
        for frame in &animation.frames {
            set.push_str(&format!("\t{name}_frame{},\n", frame.number));
        }
        set.push_str("\t0\n};");
        sections.push(set);
    }
    sections.join("\n\n")
}

pub fn animations(a: &Assembly<'_>) -> String {
    let mut out = String::from("const uint8_t **Pixel_Animations[] = {\n");
    for (i, animation) in a.animations.iter().enumerate() {
        out.push_str(&format!("\t/*{i}*/ {}_frames,\n", animation.name));
    }
    out.push_str("\t0\n};");
    out
}

fn settings_entry(index: usize, setting: &AnimationSetting) -> String {
    let m = &setting.modifiers;
    let trigger = match (setting.trigger, setting.initial) {
        (Some(t), _) => format!("&TriggerMacroList[{t}]"),
        (None, true) => "1".into(),
        (None, false) => "0".into(),
    };
    let loops = if m.loop_forever { 0 } else { m.loops };
    let frame_option = if m.framestretch {
        "PixelFrameOption_FrameStretch"
    } else {
        "PixelFrameOption_None"
    };
    let ffunc = match m.ffunc {
        FrameFunction::Off => 0,
    };
    let pfunc = match m.pfunc {
        PixelFunction::Off => 0,
        PixelFunction::Interp => 1,
    };
    let replace = match m.replace {
        ReplaceMode::Stack => 0,
        ReplaceMode::Basic => 1,
        ReplaceMode::All => 2,
        ReplaceMode::State => 3,
    };
    let state = match m.state {
        PlayState::Start => "AnimationPlayState_Start",
        PlayState::Pause => "AnimationPlayState_Pause",
        PlayState::Stop => "AnimationPlayState_Stop",
    };
    format!(
        "\n\t/*{index} {}*/ {{ (TriggerMacro*){trigger}, Animation__{}, {}, 0, {loops}, {}, {frame_option}, {ffunc}, {pfunc}, {replace}, {state} }},",
        setting.name, setting.animation_name, m.frame, m.framedelay
    )
}

pub fn animation_settings(a: &Assembly<'_>) -> String {
    let mut out = String::from("const AnimationStackElement Pixel_AnimationSettings[] = {");
    for (i, setting) in a.settings.iter().enumerate().filter(|(_, s)| s.initial) {
        out.push_str(&settings_entry(i, setting));
    }
    out.push_str("\n\n\t/* Additional Settings */");
    for (i, setting) in a.settings.iter().enumerate().filter(|(_, s)| !s.initial) {
        out.push_str(&settings_entry(i, setting));
    }
    out.push_str("\n};");
    out
}

pub fn animation_list(a: &Assembly<'_>) -> String {
    if a.pixels.is_none() {
        return String::new();
    }
    a.animations
        .iter()
        .enumerate()
        .map(|(i, animation)| format!("\n#define Animation__{} {i}", animation.name))
        .collect()
}

pub fn kll_defines(a: &Assembly<'_>) -> String {
    let mut lines = vec![
        format!("#define CapabilitiesNum_KLL {}", a.capabilities.len()),
        format!("#define LayerNum_KLL {}", a.layers.len()),
        format!("#define ResultMacroNum_KLL {}", a.results.len()),
        format!("#define TriggerMacroNum_KLL {}", a.triggers.len()),
        format!("#define MaxScanCode_KLL {}", a.config.max_scan_code),
    ];
    match &a.pixels {
        Some(map) => {
            lines.push(format!("#define Pixel_BuffersLen_KLL {}", map.buffers.len()));
            lines.push(format!("#define Pixel_TotalChannels_KLL {}", map.total_channels()));
            lines.push(format!("#define Pixel_TotalPixels_KLL {}", map.total_pixels()));
            lines.push(format!("#define Pixel_DisplayMapping_Cols_KLL {}", map.columns));
            lines.push(format!("#define Pixel_DisplayMapping_Rows_KLL {}", map.rows()));
            lines.push(format!("#define Pixel_AnimationSettingsNum_KLL {}", a.settings.len()));
            lines.push(format!("#define AnimationNum_KLL {}", a.animations.len()));
        }
        None => lines.push("#define AnimationNum_KLL 0".into()),
    }
    lines.join("\n")
}
