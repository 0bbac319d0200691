//! Loading configuration documents from text and from disk.

use std::io::Write;

use kllgen_errors::KllError;
use kllgen_model::{
    Address, ConfigFormat, Coord, KeymapConfig, LayerMode, ResultElement, TriggerElement,
    load_path, load_str, to_json,
};
use kllgen_test_helpers::prelude::*;

const YAML: &str = r#"
schema_version: 1
name: yaml-board
max_scan_code: 32
capabilities:
  - name: usbKeyOut
    function: Output_usbCodeSend_capability
    args: [ { name: code, width: 1 } ]
    feature: safe
results:
  - name: R0
    steps:
      - - { kind: usb, code: 4 }
  - name: R1
    steps:
      - - { kind: layer, mode: lock, layer: 1 }
triggers:
  - name: T0
    sequence:
      - - { kind: switch, scan_code: 3 }
    result: R0
layers:
  - name: default
    triggers: [ T0 ]
  - name: fn
animations:
  - name: blink
    frames:
      - index: 1
        records:
          - { address: { mode: column_fill, column: 0.5 }, op: set, payload: [255, 0, 0] }
"#;

#[test]
fn test_load_yaml_document() {
    let config = must(load_str(YAML, ConfigFormat::Yaml));
    assert_eq!(config.name, "yaml-board");
    assert_eq!(config.max_scan_code, 0x20);
    assert_eq!(config.layers.len(), 2);

    let lock = config
        .results
        .get(1)
        .and_then(|r| r.steps.first())
        .and_then(|combo| combo.first());
    assert_eq!(
        lock,
        Some(&ResultElement::Layer {
            mode: LayerMode::Lock,
            layer: 1
        })
    );

    let address = config
        .animations
        .first()
        .and_then(|a| a.frames.first())
        .and_then(|f| f.records.first())
        .map(|r| r.address.clone());
    assert_eq!(
        address,
        Some(Address::ColumnFill {
            column: Coord::Fraction(0.5),
            secondary: 0
        })
    );
}

#[test]
fn test_unknown_field_is_config_error() {
    let text = r#"{ "name": "x", "max_scan_code": 2, "layers": [ { "name": "d" } ], "colour": 1 }"#;
    let err = must_err(load_str(text, ConfigFormat::Json));
    assert!(matches!(err, KllError::Config(_)));
    assert_eq!(err.category().exit_code(), 7);
}

#[test]
fn test_unknown_trigger_kind_rejected() {
    let text = r#"{
        "name": "x", "max_scan_code": 2, "layers": [ { "name": "d" } ],
        "triggers": [ { "name": "T0", "sequence": [ [ { "kind": "pedal", "code": 1 } ] ], "result": "R0" } ]
    }"#;
    assert!(matches!(load_str(text, ConfigFormat::Json), Err(KllError::Config(_))));
}

#[test]
fn test_load_path_picks_format_by_extension() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("board.yml");
    let mut file = std::fs::File::create(&path)?;
    file.write_all(YAML.as_bytes())?;
    drop(file);

    let config = load_path(&path)?;
    assert_eq!(config.name, "yaml-board");
    Ok(())
}

#[test]
fn test_load_path_missing_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let err = must_err(load_path(&dir.path().join("absent.json")));
    assert_eq!(err.category().exit_code(), 6);
    assert!(err.to_string().contains("absent.json"));
    assert!(err.to_string().contains("load_config"));
    Ok(())
}

#[test]
fn test_load_path_parse_error_names_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "name: [unclosed\n")?;
    let err = must_err(load_path(&path));
    assert_eq!(err.category().exit_code(), 7);
    assert!(err.to_string().contains("broken.yaml"));
    Ok(())
}

#[test]
fn test_fixture_survives_json_round_trip() {
    let config = full_keymap();
    let text = must(to_json(&config));
    let reloaded: KeymapConfig = must(load_str(&text, ConfigFormat::Json));
    assert_eq!(reloaded, config);
}

#[test]
fn test_switch_defaults_in_yaml() {
    let config = must(load_str(YAML, ConfigFormat::Yaml));
    let element = config
        .triggers
        .first()
        .and_then(|t| t.sequence.first())
        .and_then(|combo| combo.first())
        .cloned();
    assert_eq!(
        element,
        Some(TriggerElement::Switch {
            scan_code: 3,
            board: 0,
            state: kllgen_model::Schedule::Press
        })
    );
}

#[test]
fn test_result_element_json_shape() {
    insta::assert_json_snapshot!(
        ResultElement::Layer { mode: LayerMode::Shift, layer: 2 },
        @r#"
    {
      "kind": "layer",
      "mode": "shift",
      "layer": 2
    }
    "#
    );
}

mod property {
    use super::*;
    use kllgen_model::validate_config;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn state_word_size_accepts_only_machine_words(bits in any::<u8>()) {
            let mut config = KeymapConfig::new("words", 8);
            config.state_word_size = Some(bits);
            let accepted = validate_config(&config).is_ok();
            prop_assert_eq!(accepted, matches!(bits, 8 | 16 | 32));
        }

        #[test]
        fn max_scan_code_survives_reload(max in 0u16..=0x3FF, name in "[a-z][a-z0-9-]{0,12}") {
            let config = KeymapConfig::new(name, max);
            let text = must(to_json(&config));
            let reloaded = must(load_str(&text, ConfigFormat::Json));
            prop_assert_eq!(reloaded.max_scan_code, max);
            prop_assert_eq!(reloaded.name, config.name);
        }
    }
}
