//! One generation pass worth of assembled tables.
//!
//! [`Assembly::build`] never fails: problems that stop a table from being
//! encoded are recorded and the offending element is skipped.
//! [`Assembly::validate`] returns those findings together with the
//! cross-table checks, and emission only runs on a clean report.

use std::collections::BTreeMap;

use kllgen_errors::{Check, DiagnosticReport, RangeError, ReferenceError, ShapeError};
use kllgen_model::{
    AnimationModifiers, CapabilityDef, KeymapConfig, LayerMode, ResultElement, ResultMacroDef,
    TriggerElement, TriggerMacroDef,
};
use tracing::debug;

use crate::animation::{CompiledAnimation, DisplayExtent, compile_animation};
use crate::bytecode::{
    ResultCall, ResultGuide, TRIGGER_BANKS, TriggerGuide, TriggerRecord, TriggerState, TriggerType,
    encode_le,
};
use crate::layers::{LayerTable, RotationTable, interconnect_offsets};
use crate::pixel::PixelMap;
use crate::position::KeyPositions;
use crate::symbols::{SymbolIndex, SymbolKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMacro {
    pub name: String,
    pub guide: ResultGuide,
}

/// Trigger guide with the trigger macros that share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedGuide {
    pub guide: TriggerGuide,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMacro {
    pub name: String,
    /// Index into [`Assembly::trigger_guides`].
    pub guide: usize,
    /// Resolved result macro, `None` when the reference dangles.
    pub result: Option<usize>,
    pub result_name: String,
}

/// One row of the animation settings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSetting {
    pub name: String,
    pub animation: Option<usize>,
    pub animation_name: String,
    pub trigger: Option<usize>,
    /// Default entry of its animation rather than an additional one.
    pub initial: bool,
    pub modifiers: AnimationModifiers,
}

/// Every table of one configuration.
#[derive(Debug, Clone)]
pub struct Assembly<'a> {
    pub config: &'a KeymapConfig,
    pub symbols: SymbolIndex,
    pub capabilities: Vec<&'a CapabilityDef>,
    pub offsets: Vec<u16>,
    pub results: Vec<ResultMacro>,
    pub trigger_guides: Vec<SharedGuide>,
    pub triggers: Vec<TriggerMacro>,
    pub layers: Vec<LayerTable>,
    pub rotation: RotationTable,
    pub positions: KeyPositions,
    pub pixels: Option<PixelMap>,
    pub animations: Vec<CompiledAnimation>,
    pub settings: Vec<AnimationSetting>,
    diagnostics: DiagnosticReport,
}

impl<'a> Assembly<'a> {
    pub fn build(config: &'a KeymapConfig) -> Self {
        let mut assembly = Assembly {
            config,
            symbols: SymbolIndex::new(),
            capabilities: Vec::new(),
            offsets: interconnect_offsets(config),
            results: Vec::new(),
            trigger_guides: Vec::new(),
            triggers: Vec::new(),
            layers: Vec::new(),
            rotation: RotationTable::default(),
            positions: KeyPositions::build(&config.positions, config.max_scan_code),
            pixels: config.pixels.as_ref().map(PixelMap::build),
            animations: Vec::new(),
            settings: Vec::new(),
            diagnostics: DiagnosticReport::new(),
        };

        let results = assembly.intern_symbols();
        assembly.build_settings();
        assembly.results = results
            .iter()
            .map(|def| ResultMacro {
                name: def.name.clone(),
                guide: assembly.compile_result(def),
            })
            .collect();
        assembly.build_triggers();
        assembly.build_layers();
        assembly.build_animations();

        debug!(
            name = %config.name,
            capabilities = assembly.capabilities.len(),
            results = assembly.results.len(),
            triggers = assembly.triggers.len(),
            trigger_guides = assembly.trigger_guides.len(),
            layers = assembly.layers.len(),
            animations = assembly.animations.len(),
            "assembled tables"
        );
        assembly
    }

    /// Findings recorded while building, followed by the cross-table checks.
    pub fn validate(&self) -> DiagnosticReport {
        let mut report = self.diagnostics.clone();
        crate::validate::run(self, &mut report);
        report
    }

    /// Settings table index by settings or animation name.
    pub fn settings_index(&self, name: &str) -> Option<usize> {
        self.settings.iter().position(|s| s.name == name)
    }

    /// Display size for fractional coordinates; zero without a pixel section.
    pub fn display_extent(&self) -> DisplayExtent {
        self.pixels
            .as_ref()
            .map(|p| DisplayExtent {
                columns: p.columns,
                rows: p.rows(),
            })
            .unwrap_or_default()
    }

    /// Interconnect offset of `board`; boards are only valid past 0 when
    /// offsets are declared.
    pub fn board_offset(&self, board: u8) -> Option<u16> {
        match self.offsets.get(usize::from(board)) {
            Some(&offset) => Some(offset),
            None if board == 0 && self.offsets.is_empty() => Some(0),
            None => None,
        }
    }

    // First definition of every name wins; later ones are reported.
    fn intern_symbols(&mut self) -> Vec<&'a ResultMacroDef> {
        let config = self.config;
        for capability in &config.capabilities {
            if self.intern_unique(SymbolKind::Capability, &capability.name) {
                self.capabilities.push(capability);
            }
        }
        let mut results = Vec::new();
        for result in &config.results {
            if self.intern_unique(SymbolKind::ResultMacro, &result.name) {
                results.push(result);
            }
        }
        for trigger in &config.triggers {
            self.intern_unique(SymbolKind::TriggerMacro, &trigger.name);
        }
        for animation in &config.animations {
            self.intern_unique(SymbolKind::Animation, &animation.name);
        }
        if let Some(pixels) = &self.pixels {
            for id in 1..=pixels.total_pixels() {
                self.symbols.intern(SymbolKind::Pixel, &id.to_string());
            }
        }
        results
    }

    fn intern_unique(&mut self, kind: SymbolKind, name: &str) -> bool {
        if self.symbols.resolve(kind, name).is_some() {
            self.diagnostics
                .error(Check::Duplicates, name, ShapeError::duplicate(kind.as_str(), name));
            return false;
        }
        self.symbols.intern(kind, name);
        true
    }

    fn build_settings(&mut self) {
        let config = self.config;
        for animation in &config.animations {
            if self.settings_index(&animation.name).is_some() {
                continue;
            }
            self.settings.push(AnimationSetting {
                name: animation.name.clone(),
                animation: self.symbols.resolve(SymbolKind::Animation, &animation.name),
                animation_name: animation.name.clone(),
                trigger: None,
                initial: true,
                modifiers: animation.settings.clone(),
            });
        }
        for extra in &config.animation_settings {
            if self.settings_index(&extra.name).is_some() {
                self.diagnostics.error(
                    Check::Duplicates,
                    &extra.name,
                    ShapeError::duplicate("animation settings", &extra.name),
                );
                continue;
            }
            let animation = self.symbols.resolve(SymbolKind::Animation, &extra.animation);
            if animation.is_none() {
                self.diagnostics.error(
                    Check::AnimationReferences,
                    &extra.name,
                    ReferenceError::missing_animation(&extra.name, &extra.animation),
                );
            }
            let trigger = extra.trigger.as_ref().and_then(|t| {
                let resolved = self.symbols.resolve(SymbolKind::TriggerMacro, t);
                if resolved.is_none() {
                    self.diagnostics.error(
                        Check::AnimationReferences,
                        &extra.name,
                        ReferenceError::missing_settings_trigger(&extra.name, t),
                    );
                }
                resolved
            });
            self.settings.push(AnimationSetting {
                name: extra.name.clone(),
                animation,
                animation_name: extra.animation.clone(),
                trigger,
                initial: false,
                modifiers: extra.modifiers.clone(),
            });
        }
    }

    fn capability_index(&self, name: &str) -> Option<(u8, &'a CapabilityDef)> {
        let index = self.symbols.resolve(SymbolKind::Capability, name)?;
        let def = self.capabilities.get(index).copied()?;
        Some((u8::try_from(index).unwrap_or(u8::MAX), def))
    }

    /// Call of a routed single-argument capability.
    fn routed(&mut self, symbol: &str, capability: &str, value: i64) -> Option<ResultCall> {
        let Some((index, def)) = self.capability_index(capability) else {
            self.diagnostics.error(
                Check::Routing,
                symbol,
                ReferenceError::missing_capability(symbol, capability),
            );
            return None;
        };
        let [arg] = def.args.as_slice() else {
            self.diagnostics.error(
                Check::Routing,
                symbol,
                ShapeError::ArgumentCount {
                    symbol: symbol.to_owned(),
                    capability: capability.to_owned(),
                    expected: 1,
                    actual: def.args.len(),
                },
            );
            return None;
        };
        match encode_le(symbol, value, arg.width) {
            Ok(args) => Some(ResultCall {
                capability: index,
                args,
            }),
            Err(e) => {
                self.diagnostics.error(Check::CapabilityArguments, symbol, e);
                None
            }
        }
    }

    /// Spacer call: the spacer capability with all-zero arguments.
    fn spacer(&mut self, symbol: &str) -> Option<ResultCall> {
        let config = self.config;
        let name = config.routing.spacer.as_deref().unwrap_or("spacer");
        match self.capability_index(name) {
            Some((index, def)) => Some(ResultCall {
                capability: index,
                args: vec![0; def.arg_bytes()],
            }),
            None => {
                self.diagnostics.error(
                    Check::Routing,
                    symbol,
                    ReferenceError::missing_capability(symbol, name),
                );
                None
            }
        }
    }

    fn compile_element(&mut self, symbol: &str, element: &ResultElement) -> Option<ResultCall> {
        let config = self.config;
        let routing = &config.routing;
        match element {
            ResultElement::Capability { name, args } => {
                let Some((index, def)) = self.capability_index(name) else {
                    self.diagnostics.error(
                        Check::CapabilityArguments,
                        symbol,
                        ReferenceError::missing_capability(symbol, name),
                    );
                    return None;
                };
                if args.len() != def.args.len() {
                    self.diagnostics.error(
                        Check::CapabilityArguments,
                        symbol,
                        ShapeError::ArgumentCount {
                            symbol: symbol.to_owned(),
                            capability: name.clone(),
                            expected: def.args.len(),
                            actual: args.len(),
                        },
                    );
                    return None;
                }
                let mut bytes = Vec::with_capacity(def.arg_bytes());
                for (value, arg) in args.iter().zip(&def.args) {
                    match encode_le(symbol, *value, arg.width) {
                        Ok(encoded) => bytes.extend(encoded),
                        Err(e) => {
                            self.diagnostics.error(Check::CapabilityArguments, symbol, e);
                            return None;
                        }
                    }
                }
                Some(ResultCall {
                    capability: index,
                    args: bytes,
                })
            }
            ResultElement::Usb { code } => {
                self.routed(symbol, &routing.usb, i64::from(*code))
            }
            ResultElement::Consumer { code } => {
                self.routed(symbol, &routing.consumer, i64::from(*code))
            }
            ResultElement::System { code } => {
                self.routed(symbol, &routing.system, i64::from(*code))
            }
            ResultElement::Layer { mode, layer } => {
                let layers = config.layers.len();
                if usize::try_from(*layer).map_or(true, |l| l >= layers) {
                    self.diagnostics.error(
                        Check::LayerBindings,
                        symbol,
                        ReferenceError::MissingLayer {
                            user: symbol.to_owned(),
                            layer: usize::try_from(*layer).unwrap_or(usize::MAX),
                            layers,
                        },
                    );
                    return None;
                }
                let capability = match mode {
                    LayerMode::Shift => &routing.layer_shift,
                    LayerMode::Latch => &routing.layer_latch,
                    LayerMode::Lock => &routing.layer_lock,
                };
                self.routed(symbol, capability, i64::from(*layer))
            }
            ResultElement::Animation { settings } => {
                let Some(index) = self.settings_index(settings) else {
                    self.diagnostics.error(
                        Check::AnimationReferences,
                        symbol,
                        ReferenceError::missing_settings(symbol, settings),
                    );
                    return None;
                };
                self.routed(symbol, &routing.animation, i64::try_from(index).unwrap_or(i64::MAX))
            }
            ResultElement::None => self.spacer(symbol),
        }
    }

    fn compile_result(&mut self, def: &ResultMacroDef) -> ResultGuide {
        let symbol = def.name.as_str();
        if def.steps.is_empty() {
            self.diagnostics.error(
                Check::ComboShape,
                symbol,
                ShapeError::EmptyCombo {
                    symbol: symbol.to_owned(),
                    step: 0,
                },
            );
        }
        let spaced = def.steps.len() > 1 && self.config.routing.spacer.is_some();
        let mut guide = ResultGuide::default();
        for (step, combo) in def.steps.iter().enumerate() {
            if combo.is_empty() {
                self.diagnostics.error(
                    Check::ComboShape,
                    symbol,
                    ShapeError::EmptyCombo {
                        symbol: symbol.to_owned(),
                        step,
                    },
                );
            }
            self.check_combo_len(symbol, combo.len());
            let calls: Vec<ResultCall> = combo
                .iter()
                .filter_map(|element| self.compile_element(symbol, element))
                .collect();
            guide.combos.push(calls);
            if spaced && let Some(spacer) = self.spacer(symbol) {
                guide.combos.push(vec![spacer]);
            }
        }
        guide
    }

    fn check_combo_len(&mut self, symbol: &str, len: usize) {
        if len > usize::from(u8::MAX) {
            self.diagnostics.error(
                Check::ComboShape,
                symbol,
                RangeError::IndexOverflow {
                    table: format!("{symbol} combo"),
                    count: len,
                    bits: 8,
                    limit: u64::from(u8::MAX),
                },
            );
        }
    }

    fn trigger_record(&mut self, symbol: &str, element: &TriggerElement) -> Option<TriggerRecord> {
        let encoded = match element {
            TriggerElement::Switch {
                scan_code,
                board,
                state,
            } => {
                let Some(offset) = self.board_offset(*board) else {
                    self.diagnostics.error(
                        Check::Interconnect,
                        symbol,
                        RangeError::Board {
                            symbol: symbol.to_owned(),
                            board: *board,
                            boards: self.offsets.len(),
                        },
                    );
                    return None;
                };
                let uid = u32::from(*scan_code) + u32::from(offset);
                TriggerType::banked(TriggerType::SWITCH, TRIGGER_BANKS, symbol, uid)
                    .map(|t| (t, TriggerState::Schedule(*state)))
            }
            TriggerElement::Indicator { code, state } => {
                TriggerType::banked(TriggerType::LED, 1, symbol, u32::from(*code))
                    .map(|t| (t, TriggerState::Schedule(*state)))
            }
            TriggerElement::Layer { layer, mode, state } => {
                let layers = self.config.layers.len();
                if usize::from(*layer) >= layers {
                    self.diagnostics.error(
                        Check::LayerBindings,
                        symbol,
                        ReferenceError::MissingLayer {
                            user: symbol.to_owned(),
                            layer: usize::from(*layer),
                            layers,
                        },
                    );
                    return None;
                }
                TriggerType::banked(TriggerType::LAYER, TRIGGER_BANKS, symbol, u32::from(*layer)).map(
                    |t| {
                        (
                            t,
                            TriggerState::Layer {
                                state: *state,
                                mode: *mode,
                            },
                        )
                    },
                )
            }
            TriggerElement::Animation { animation, event } => {
                let Some(index) = self.symbols.resolve(SymbolKind::Animation, animation) else {
                    self.diagnostics.error(
                        Check::AnimationReferences,
                        symbol,
                        ReferenceError::missing_animation(symbol, animation),
                    );
                    return None;
                };
                let uid = u32::try_from(index).unwrap_or(u32::MAX);
                TriggerType::banked(TriggerType::ANIMATION, TRIGGER_BANKS, symbol, uid)
                    .map(|t| (t, TriggerState::Animation(*event)))
            }
            TriggerElement::Analog { code, threshold } => {
                TriggerType::banked(TriggerType::ANALOG, TRIGGER_BANKS, symbol, u32::from(*code))
                    .map(|t| (t, TriggerState::Raw(*threshold)))
            }
            TriggerElement::Generic { code, uid, param } => {
                TriggerType::banked(*code, 1, symbol, u32::from(*uid))
                    .map(|t| (t, TriggerState::Raw(*param)))
            }
        };
        match encoded {
            Ok(((kind, uid), state)) => Some(TriggerRecord { kind, state, uid }),
            Err(e) => {
                self.diagnostics.error(Check::TriggerEncoding, symbol, e);
                None
            }
        }
    }

    fn compile_trigger(&mut self, def: &TriggerMacroDef) -> TriggerGuide {
        let symbol = def.name.as_str();
        if def.sequence.is_empty() {
            self.diagnostics.error(
                Check::ComboShape,
                symbol,
                ShapeError::EmptyCombo {
                    symbol: symbol.to_owned(),
                    step: 0,
                },
            );
        }
        let mut guide = TriggerGuide::default();
        for (step, combo) in def.sequence.iter().enumerate() {
            if combo.is_empty() {
                self.diagnostics.error(
                    Check::ComboShape,
                    symbol,
                    ShapeError::EmptyCombo {
                        symbol: symbol.to_owned(),
                        step,
                    },
                );
            }
            self.check_combo_len(symbol, combo.len());
            let records = combo
                .iter()
                .filter_map(|element| self.trigger_record(symbol, element))
                .collect();
            guide.combos.push(records);
        }
        guide
    }

    fn build_triggers(&mut self) {
        let config = self.config;
        let mut dedup: BTreeMap<Vec<u8>, usize> = BTreeMap::new();
        for (_, name) in self.symbols.clone().iter(SymbolKind::TriggerMacro) {
            let Some(def) = config.trigger(name) else {
                continue;
            };
            let guide = self.compile_trigger(def);
            let index = *dedup.entry(guide.bytes()).or_insert_with(|| {
                self.trigger_guides.push(SharedGuide {
                    guide,
                    users: Vec::new(),
                });
                self.trigger_guides.len().saturating_sub(1)
            });
            if let Some(shared) = self.trigger_guides.get_mut(index) {
                shared.users.push(def.name.clone());
            }
            self.triggers.push(TriggerMacro {
                name: def.name.clone(),
                guide: index,
                result: self.symbols.resolve(SymbolKind::ResultMacro, &def.result),
                result_name: def.result.clone(),
            });
        }
    }

    /// Trigger list slot an element fires through. Unresolved elements and
    /// analog inputs have none.
    fn list_uid(&self, element: &TriggerElement) -> Option<u32> {
        match element {
            TriggerElement::Switch {
                scan_code, board, ..
            } => self
                .board_offset(*board)
                .map(|offset| u32::from(*scan_code) + u32::from(offset)),
            TriggerElement::Indicator { code, .. } => Some(u32::from(*code)),
            TriggerElement::Layer { layer, .. } => {
                (usize::from(*layer) < self.config.layers.len()).then_some(u32::from(*layer))
            }
            TriggerElement::Animation { animation, .. } => self
                .symbols
                .resolve(SymbolKind::Animation, animation)
                .and_then(|index| u32::try_from(index).ok()),
            TriggerElement::Generic { uid, .. } => Some(u32::from(*uid)),
            TriggerElement::Analog { .. } => None,
        }
    }

    fn build_layers(&mut self) {
        let config = self.config;
        for def in &config.layers {
            let mut table = LayerTable::new(def);
            for name in &def.triggers {
                let (Some(index), Some(trigger)) = (
                    self.symbols.resolve(SymbolKind::TriggerMacro, name),
                    config.trigger(name),
                ) else {
                    self.diagnostics.error(
                        Check::LayerBindings,
                        &def.name,
                        ReferenceError::missing_trigger(&def.name, name),
                    );
                    continue;
                };
                for element in trigger.sequence.iter().flatten() {
                    if let Some(uid) = self.list_uid(element) {
                        table.map.insert(uid, index);
                    }
                    if let TriggerElement::Generic { code, uid, param } = element
                        && *code == TriggerType::ROTATION
                        && let Ok(uid) = u8::try_from(*uid)
                    {
                        self.rotation.record(uid, *param);
                    }
                }
            }
            debug!(layer = %table.name, scan_codes = table.map.iter().count(), "built layer");
            self.layers.push(table);
        }
    }

    fn build_animations(&mut self) {
        let extent = self.display_extent();
        let config = self.config;
        for (_, name) in self.symbols.clone().iter(SymbolKind::Animation) {
            if let Some(def) = config.animations.iter().find(|a| a.name == name) {
                let compiled = compile_animation(def, extent, &mut self.diagnostics);
                self.animations.push(compiled);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kllgen_model::LayerDef;
    use kllgen_test_helpers::prelude::*;

    #[test]
    fn test_single_trigger_assembly() {
        let config = single_trigger_keymap();
        let assembly = Assembly::build(&config);
        assert!(assembly.validate().is_empty());
        assert_eq!(assembly.triggers.len(), 1);
        let result = must_some(assembly.results.first(), "R0");
        assert_eq!(result.guide.bytes(), vec![1, 0, 0]);
        let default = must_some(assembly.layers.first(), "default layer");
        assert_eq!(default.map.get(5).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_interconnect_offsets_scan_codes() {
        let config = interconnect_keymap();
        let assembly = Assembly::build(&config);
        let default = must_some(assembly.layers.first(), "default layer");
        assert_eq!(default.map.first(), Some(74));
        let guide = must_some(assembly.trigger_guides.first(), "guide");
        assert_eq!(guide.guide.bytes(), vec![1, 0x00, 0x01, 74, 0]);
    }

    #[test]
    fn test_identical_triggers_share_a_guide() {
        let config = full_keymap();
        let assembly = Assembly::build(&config);
        // T_a and T_vol are both a press of scan code 1.
        let shared = must_some(assembly.trigger_guides.first(), "guide 0");
        assert_eq!(shared.users, vec!["T_a".to_string(), "T_vol".to_string()]);
        assert_eq!(assembly.trigger_guides.len(), assembly.triggers.len() - 2);
    }

    #[test]
    fn test_multi_step_result_gets_spacers() {
        let config = full_keymap();
        let assembly = Assembly::build(&config);
        let hi = must_some(assembly.results.iter().find(|r| r.name == "R_hi"), "R_hi");
        // usbKeyOut is capability 1: step, spacer, step, spacer.
        assert_eq!(hi.guide.bytes(), vec![1, 1, 0x0B, 1, 1, 0x00, 1, 1, 0x0C, 1, 1, 0x00, 0]);
    }

    #[test]
    fn test_animation_result_uses_settings_index() {
        let config = full_keymap();
        let assembly = Assembly::build(&config);
        assert_eq!(assembly.settings_index("rainbow_inter"), Some(0));
        assert_eq!(assembly.settings_index("rainbow_inter(loops:1)"), Some(1));
        let anim = must_some(assembly.results.iter().find(|r| r.name == "R_anim"), "R_anim");
        assert_eq!(anim.guide.bytes(), vec![1, 7, 0x01, 0x00, 0]);
    }

    #[test]
    fn test_event_triggers_land_in_layer_lists() {
        let config = full_keymap();
        let assembly = Assembly::build(&config);
        let default = must_some(assembly.layers.first(), "default layer");
        // T_rot is generic uid 0, T_done waits on animation 0.
        assert_eq!(default.map.get(0).collect::<Vec<_>>(), vec![4]);
        let fn_layer = must_some(assembly.layers.get(1), "fn layer");
        assert_eq!(fn_layer.map.get(0).collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_indicator_and_layer_triggers_filed_by_uid() {
        let mut config = single_trigger_keymap();
        config.triggers.push(TriggerMacroDef::new(
            "T_caps",
            vec![vec![TriggerElement::Indicator {
                code: 2,
                state: Default::default(),
            }]],
            "R0",
        ));
        config.triggers.push(TriggerMacroDef::new(
            "T_layer",
            vec![vec![TriggerElement::Layer {
                layer: 0,
                mode: Some(LayerMode::Lock),
                state: Default::default(),
            }]],
            "R0",
        ));
        config.triggers.push(TriggerMacroDef::new(
            "T_analog",
            vec![vec![TriggerElement::Analog { code: 3, threshold: 40 }]],
            "R0",
        ));
        config.layers = vec![LayerDef::new("default").with_triggers(["T0", "T_caps", "T_layer", "T_analog"])];
        let assembly = Assembly::build(&config);
        assert!(assembly.validate().is_empty());
        let default = must_some(assembly.layers.first(), "default layer");
        assert_eq!(default.map.get(2).collect::<Vec<_>>(), vec![1]);
        assert_eq!(default.map.get(0).collect::<Vec<_>>(), vec![2]);
        assert_eq!(default.map.get(3).count(), 0);
    }

    #[test]
    fn test_indicator_uid_beyond_max_reported() {
        let mut config = single_trigger_keymap();
        config.triggers.push(TriggerMacroDef::new(
            "T_led",
            vec![vec![TriggerElement::Indicator {
                code: 0x20,
                state: Default::default(),
            }]],
            "R0",
        ));
        config.layers = vec![LayerDef::new("default").with_triggers(["T0", "T_led"])];
        let report = Assembly::build(&config).validate();
        assert_eq!(report.by_check(Check::ScanCodeRange).count(), 1);
    }

    #[test]
    fn test_rotation_from_bound_triggers() {
        let config = full_keymap();
        let assembly = Assembly::build(&config);
        assert_eq!(assembly.rotation.dense(), vec![3]);
    }

    #[test]
    fn test_unknown_capability_recorded() {
        let mut config = single_trigger_keymap();
        config.results.push(ResultMacroDef::new(
            "R1",
            vec![vec![ResultElement::Capability {
                name: "nope".into(),
                args: Vec::new(),
            }]],
        ));
        let report = Assembly::build(&config).validate();
        assert_eq!(report.by_check(Check::CapabilityArguments).count(), 1);
    }

    #[test]
    fn test_missing_routing_only_when_used() {
        let mut config = single_trigger_keymap();
        config.capabilities.retain(|c| c.name != "consCtrlOut");
        assert!(Assembly::build(&config).validate().is_empty());

        config
            .results
            .push(ResultMacroDef::new("R1", vec![vec![ResultElement::Consumer { code: 0xE9 }]]));
        let report = Assembly::build(&config).validate();
        assert_eq!(report.by_check(Check::Routing).count(), 1);
    }

    #[test]
    fn test_board_without_offsets_rejected() {
        let mut config = single_trigger_keymap();
        config.triggers.push(TriggerMacroDef::new(
            "T1",
            vec![vec![TriggerElement::Switch {
                scan_code: 1,
                board: 2,
                state: Default::default(),
            }]],
            "R0",
        ));
        let report = Assembly::build(&config).validate();
        assert_eq!(report.by_check(Check::Interconnect).count(), 1);
    }
}
