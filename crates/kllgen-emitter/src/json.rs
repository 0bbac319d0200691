//! Machine-readable dump of the assembled tables (`kll.json`).

use kllgen_errors::KllError;
use serde_json::{Map, Value, json};

use crate::assembly::Assembly;
use crate::pixel::PixelEntry;
use crate::symbols::SymbolKind;

fn capabilities(a: &Assembly<'_>) -> Value {
    let entries: Map<String, Value> = a
        .capabilities
        .iter()
        .enumerate()
        .map(|(index, c)| {
            (
                c.name.clone(),
                json!({
                    "index": index,
                    "function": c.function,
                    "args": c.args.iter().map(|arg| json!({ "name": arg.name, "width": arg.width })).collect::<Vec<_>>(),
                    "feature": c.feature,
                }),
            )
        })
        .collect();
    Value::Object(entries)
}

fn layers(a: &Assembly<'_>) -> Value {
    let list = a
        .layers
        .iter()
        .zip(&a.config.layers)
        .map(|(layer, def)| {
            let triggers: Map<String, Value> = layer
                .map
                .iter()
                .map(|(scan_code, indices)| {
                    let names: Vec<&str> = indices
                        .iter()
                        .filter_map(|&i| a.symbols.name(SymbolKind::TriggerMacro, i))
                        .collect();
                    (format!("0x{scan_code:02X}"), json!(names))
                })
                .collect();
            json!({
                "name": layer.name,
                "label": layer.label,
                "sources": def.sources,
                "triggers": triggers,
            })
        })
        .collect();
    Value::Array(list)
}

fn animation_ids(a: &Assembly<'_>) -> Value {
    let ids: Map<String, Value> = a
        .animations
        .iter()
        .enumerate()
        .map(|(i, animation)| (animation.name.clone(), json!(i)))
        .collect();
    Value::Object(ids)
}

fn animation_settings(a: &Assembly<'_>) -> (Value, Value) {
    let by_name: Map<String, Value> = a
        .settings
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.clone(), json!(i)))
        .collect();
    let index = a
        .settings
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "animation": s.animation_name,
                "trigger": s.trigger.and_then(|t| a.symbols.name(SymbolKind::TriggerMacro, t)),
                "modifiers": s.modifiers,
            })
        })
        .collect();
    (Value::Object(by_name), Value::Array(index))
}

/// Row and column of the first display cell holding `pixel`.
fn display_cell(a: &Assembly<'_>, pixel: u16) -> Option<(usize, usize)> {
    let map = a.pixels.as_ref()?;
    map.display
        .iter()
        .enumerate()
        .find_map(|(row, cells)| cells.iter().position(|&c| c == pixel).map(|col| (row, col)))
}

fn pixel_ids(a: &Assembly<'_>) -> Value {
    let Some(map) = &a.pixels else {
        return Value::Object(Map::new());
    };
    let ids: Map<String, Value> = (1u16..)
        .zip(&map.mapping)
        .filter_map(|(id, entry)| match entry {
            PixelEntry::Blank => None,
            PixelEntry::Channels { width, channels } => {
                let mut fields = Map::new();
                fields.insert("Channels".into(), json!(channels));
                fields.insert("Width".into(), json!(width));
                if let Some(scan_code) = (1u32..)
                    .zip(&map.scan_to_pixel)
                    .find_map(|(s, &p)| (p == id).then_some(s))
                {
                    fields.insert("ScanCode".into(), json!(scan_code));
                }
                if let Some((row, col)) = display_cell(a, id) {
                    fields.insert("Row".into(), json!(row));
                    fields.insert("Col".into(), json!(col));
                }
                Some((id.to_string(), Value::Object(fields)))
            }
        })
        .collect();
    Value::Object(ids)
}

fn scan_codes(a: &Assembly<'_>) -> Value {
    let mut codes: Map<String, Value> = Map::new();
    for (scan_code, p) in &a.positions.entries {
        codes.insert(
            scan_code.to_string(),
            json!({ "x": p.x, "y": p.y, "z": p.z, "rx": p.rx, "ry": p.ry, "rz": p.rz }),
        );
    }
    if let Some(map) = &a.pixels {
        for (scan_code, &pixel) in (1u32..).zip(&map.scan_to_pixel).filter(|(_, p)| **p > 0) {
            let entry = codes
                .entry(scan_code.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = entry {
                fields.insert("PixelId".into(), json!(pixel));
                if let Some((row, col)) = display_cell(a, pixel) {
                    fields.insert("Row".into(), json!(row));
                    fields.insert("Col".into(), json!(col));
                }
            }
        }
    }
    Value::Object(codes)
}

/// Sorted-key JSON document describing the generated tables.
pub fn dump_value(a: &Assembly<'_>) -> Value {
    let (settings, settings_index) = animation_settings(a);
    let mut root = Map::new();
    root.insert("AnimationIds".into(), animation_ids(a));
    root.insert("AnimationSettings".into(), settings);
    root.insert("AnimationSettingsIndex".into(), settings_index);
    root.insert("Capabilities".into(), capabilities(a));
    root.insert("Defines".into(), json!(a.config.defines));
    root.insert("Layers".into(), layers(a));
    root.insert("PixelIds".into(), pixel_ids(a));
    root.insert("ScanCodes".into(), scan_codes(a));
    Value::Object(root)
}

/// Pretty-printed [`dump_value`].
///
/// # Errors
///
/// Returns [`KllError::Other`] if serialization fails.
pub fn dump(a: &Assembly<'_>) -> Result<String, KllError> {
    serde_json::to_string_pretty(&dump_value(a))
        .map_err(|e| KllError::other(format!("JSON dump: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kllgen_test_helpers::prelude::*;

    #[test]
    fn test_top_level_keys_sorted() {
        let config = full_keymap();
        let a = Assembly::build(&config);
        let value = dump_value(&a);
        let keys: Vec<&String> = value.as_object().map(|o| o.keys().collect()).unwrap_or_default();
        assert_eq!(
            keys,
            [
                "AnimationIds",
                "AnimationSettings",
                "AnimationSettingsIndex",
                "Capabilities",
                "Defines",
                "Layers",
                "PixelIds",
                "ScanCodes"
            ]
        );
    }

    #[test]
    fn test_pixel_one_location() {
        let config = display_keymap();
        let a = Assembly::build(&config);
        let value = dump_value(&a);
        let pixel = must_some(value.pointer("/PixelIds/1"), "pixel 1");
        insta::assert_json_snapshot!(pixel, @r#"
        {
          "Channels": [
            0,
            33,
            49
          ],
          "Col": 0,
          "Row": 0,
          "ScanCode": 1,
          "Width": 16
        }
        "#);
    }

    #[test]
    fn test_layer_triggers_by_scan_code() {
        let config = full_keymap();
        let a = Assembly::build(&config);
        let value = dump_value(&a);
        assert_eq!(value.pointer("/Layers/1/triggers/0x01"), Some(&json!(["T_vol"])));
        assert_eq!(value.pointer("/Layers/1/triggers/0x00"), Some(&json!(["T_done"])));
        assert_eq!(
            value.pointer("/AnimationSettings/rainbow_inter(loops:1)"),
            Some(&json!(1))
        );
        assert_eq!(
            value.pointer("/AnimationSettingsIndex/1/trigger"),
            Some(&json!("T_anim"))
        );
    }

    #[test]
    fn test_dump_is_deterministic() {
        let config = full_keymap();
        let first = must(dump(&Assembly::build(&config)));
        let second = must(dump(&Assembly::build(&config)));
        assert_eq!(first, second);
    }
}
