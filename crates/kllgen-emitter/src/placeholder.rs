//! Template placeholder registry.

use std::fmt;

use crate::assembly::Assembly;
use crate::format;

/// Every `<|Name|>` a template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    Information,
    CapabilitiesFuncDecl,
    CapabilitiesList,
    ResultMacros,
    ResultMacroList,
    TriggerMacros,
    TriggerMacroList,
    TriggerMacroRecord,
    MaxScanCode,
    DefaultLayerTriggerList,
    PartialLayerTriggerLists,
    ScanCodeInterconnectOffsetList,
    DefaultLayerScanMap,
    PartialLayerScanMaps,
    LayerIndexList,
    LayerState,
    RotationParameters,
    KeyPositions,
    LedBufferStruct,
    PixelBufferSetup,
    PixelMapping,
    PixelDisplayMapping,
    AnimationFrames,
    Animations,
    AnimationSettings,
    ScanCodeToPixelMapping,
    ScanCodeToDisplayMapping,
    Defines,
    CapabilitiesIndices,
    KllDefines,
    AnimationList,
    InterconnectNodeMax,
}

impl Placeholder {
    pub const ALL: [Placeholder; 32] = [
        Placeholder::Information,
        Placeholder::CapabilitiesFuncDecl,
        Placeholder::CapabilitiesList,
        Placeholder::ResultMacros,
        Placeholder::ResultMacroList,
        Placeholder::TriggerMacros,
        Placeholder::TriggerMacroList,
        Placeholder::TriggerMacroRecord,
        Placeholder::MaxScanCode,
        Placeholder::DefaultLayerTriggerList,
        Placeholder::PartialLayerTriggerLists,
        Placeholder::ScanCodeInterconnectOffsetList,
        Placeholder::DefaultLayerScanMap,
        Placeholder::PartialLayerScanMaps,
        Placeholder::LayerIndexList,
        Placeholder::LayerState,
        Placeholder::RotationParameters,
        Placeholder::KeyPositions,
        Placeholder::LedBufferStruct,
        Placeholder::PixelBufferSetup,
        Placeholder::PixelMapping,
        Placeholder::PixelDisplayMapping,
        Placeholder::AnimationFrames,
        Placeholder::Animations,
        Placeholder::AnimationSettings,
        Placeholder::ScanCodeToPixelMapping,
        Placeholder::ScanCodeToDisplayMapping,
        Placeholder::Defines,
        Placeholder::CapabilitiesIndices,
        Placeholder::KllDefines,
        Placeholder::AnimationList,
        Placeholder::InterconnectNodeMax,
    ];

    /// Name as written between `<|` and `|>`.
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Information => "Information",
            Placeholder::CapabilitiesFuncDecl => "CapabilitiesFuncDecl",
            Placeholder::CapabilitiesList => "CapabilitiesList",
            Placeholder::ResultMacros => "ResultMacros",
            Placeholder::ResultMacroList => "ResultMacroList",
            Placeholder::TriggerMacros => "TriggerMacros",
            Placeholder::TriggerMacroList => "TriggerMacroList",
            Placeholder::TriggerMacroRecord => "TriggerMacroRecord",
            Placeholder::MaxScanCode => "MaxScanCode",
            Placeholder::DefaultLayerTriggerList => "DefaultLayerTriggerList",
            Placeholder::PartialLayerTriggerLists => "PartialLayerTriggerLists",
            Placeholder::ScanCodeInterconnectOffsetList => "ScanCodeInterconnectOffsetList",
            Placeholder::DefaultLayerScanMap => "DefaultLayerScanMap",
            Placeholder::PartialLayerScanMaps => "PartialLayerScanMaps",
            Placeholder::LayerIndexList => "LayerIndexList",
            Placeholder::LayerState => "LayerState",
            Placeholder::RotationParameters => "RotationParameters",
            Placeholder::KeyPositions => "KeyPositions",
            Placeholder::LedBufferStruct => "LEDBufferStruct",
            Placeholder::PixelBufferSetup => "PixelBufferSetup",
            Placeholder::PixelMapping => "PixelMapping",
            Placeholder::PixelDisplayMapping => "PixelDisplayMapping",
            Placeholder::AnimationFrames => "AnimationFrames",
            Placeholder::Animations => "Animations",
            Placeholder::AnimationSettings => "AnimationSettings",
            Placeholder::ScanCodeToPixelMapping => "ScanCodeToPixelMapping",
            Placeholder::ScanCodeToDisplayMapping => "ScanCodeToDisplayMapping",
            Placeholder::Defines => "Defines",
            Placeholder::CapabilitiesIndices => "CapabilitiesIndices",
            Placeholder::KllDefines => "KLLDefines",
            Placeholder::AnimationList => "AnimationList",
            Placeholder::InterconnectNodeMax => "InterconnectNodeMax",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Whether the placeholder only has text when a pixel section exists.
    pub fn needs_pixels(self) -> bool {
        matches!(
            self,
            Placeholder::PixelBufferSetup
                | Placeholder::PixelMapping
                | Placeholder::PixelDisplayMapping
                | Placeholder::AnimationFrames
                | Placeholder::Animations
                | Placeholder::AnimationSettings
                | Placeholder::ScanCodeToPixelMapping
                | Placeholder::ScanCodeToDisplayMapping
                | Placeholder::LedBufferStruct
        )
    }

    /// Table text for this placeholder, `None` when the configuration has
    /// nothing to generate it from.
    pub fn generate(self, a: &Assembly<'_>) -> Option<String> {
        let pixels = a.pixels.as_ref();
        Some(match self {
            Placeholder::Information => format::information(a),
            Placeholder::CapabilitiesFuncDecl => format::capabilities_func_decl(a),
            Placeholder::CapabilitiesList => format::capabilities_list(a),
            Placeholder::ResultMacros => format::result_macros(a),
            Placeholder::ResultMacroList => format::result_macro_list(a),
            Placeholder::TriggerMacros => format::trigger_macros(a),
            Placeholder::TriggerMacroList => format::trigger_macro_list(a),
            Placeholder::TriggerMacroRecord => format::trigger_macro_record(),
            Placeholder::MaxScanCode => format::max_scan_code(a),
            Placeholder::DefaultLayerTriggerList => format::default_layer_trigger_list(a),
            Placeholder::PartialLayerTriggerLists => format::partial_layer_trigger_lists(a),
            Placeholder::ScanCodeInterconnectOffsetList => format::interconnect_offset_list(a),
            Placeholder::DefaultLayerScanMap => format::default_layer_scan_map(a),
            Placeholder::PartialLayerScanMaps => format::partial_layer_scan_maps(a),
            Placeholder::LayerIndexList => format::layer_index_list(a),
            Placeholder::LayerState => format::layer_state(a),
            Placeholder::RotationParameters => format::rotation_parameters(a),
            Placeholder::KeyPositions => format::key_positions(a),
            Placeholder::LedBufferStruct => format::led_buffer_struct(pixels?),
            Placeholder::PixelBufferSetup => format::pixel_buffer_setup(pixels?),
            Placeholder::PixelMapping => format::pixel_mapping(pixels?),
            Placeholder::PixelDisplayMapping => format::pixel_display_mapping(pixels?),
            Placeholder::ScanCodeToPixelMapping => format::scan_code_to_pixel(pixels?),
            Placeholder::ScanCodeToDisplayMapping => format::scan_code_to_display(pixels?),
            Placeholder::AnimationFrames => {
                pixels?;
                format::animation_frames(a)
            }
            Placeholder::Animations => {
                pixels?;
                format::animations(a)
            }
            Placeholder::AnimationSettings => {
                pixels?;
                format::animation_settings(a)
            }
            Placeholder::Defines => format::defines(a),
            Placeholder::CapabilitiesIndices => format::capabilities_indices(a),
            Placeholder::KllDefines => format::kll_defines(a),
            Placeholder::AnimationList => format::animation_list(a),
            Placeholder::InterconnectNodeMax => format::interconnect_node_max(a),
        })
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kllgen_test_helpers::prelude::*;

    #[test]
    fn test_names_round_trip() {
        for placeholder in Placeholder::ALL {
            assert_eq!(Placeholder::from_name(placeholder.name()), Some(placeholder));
        }
        assert_eq!(Placeholder::from_name("Bogus"), None);
        assert_eq!(Placeholder::from_name("LEDBufferStruct"), Some(Placeholder::LedBufferStruct));
    }

    #[test]
    fn test_pixel_placeholders_need_pixels() {
        let config = single_trigger_keymap();
        let a = Assembly::build(&config);
        for placeholder in Placeholder::ALL {
            assert_eq!(
                placeholder.generate(&a).is_none(),
                placeholder.needs_pixels(),
                "{placeholder}"
            );
        }
    }
}
