//! Layer tables, interconnect offsets and rotation parameters.

use std::collections::BTreeMap;

use kllgen_model::{KeymapConfig, LayerDef};

use crate::scanmap::ScanMap;

/// Source files that only describe the hardware and never name a layer.
const UNNAMED_SOURCES: &[&str] = &["capabilities.kll", "scancode_map.kll"];

/// One assembled layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTable {
    pub name: String,
    /// Name shown in the firmware layer index.
    pub label: String,
    pub map: ScanMap,
}

impl LayerTable {
    pub fn new(def: &LayerDef) -> Self {
        Self {
            name: def.name.clone(),
            label: layer_label(def),
            map: ScanMap::new(),
        }
    }
}

/// `a.kll + b.kll` from the layer's sources, or the layer name.
pub fn layer_label(def: &LayerDef) -> String {
    let files: Vec<&str> = def
        .sources
        .iter()
        .map(String::as_str)
        .filter(|f| !UNNAMED_SOURCES.contains(f))
        .collect();
    if files.is_empty() {
        def.name.clone()
    } else {
        files.join(" + ")
    }
}

/// Offsets where each board's scan codes start, given each board's count.
///
/// ```
/// use kllgen_emitter::layers::cumulative_offsets;
///
/// assert_eq!(cumulative_offsets(&[64, 48, 10]), vec![0, 64, 112]);
/// ```
pub fn cumulative_offsets(board_scan_codes: &[u16]) -> Vec<u16> {
    board_scan_codes
        .iter()
        .scan(0u16, |next, &count| {
            let offset = *next;
            *next = next.saturating_add(count);
            Some(offset)
        })
        .collect()
}

/// Explicit offsets when given, otherwise derived from board sizes.
pub fn interconnect_offsets(config: &KeymapConfig) -> Vec<u16> {
    if config.interconnect_offsets.is_empty() {
        cumulative_offsets(&config.board_scan_codes)
    } else {
        config.interconnect_offsets.clone()
    }
}

/// Highest rotation parameter seen per rotation uid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationTable {
    maxima: BTreeMap<u8, u8>,
}

impl RotationTable {
    pub fn record(&mut self, uid: u8, param: u8) {
        let max = self.maxima.entry(uid).or_insert(param);
        *max = (*max).max(param);
    }

    pub fn is_empty(&self) -> bool {
        self.maxima.is_empty()
    }

    /// Dense table indexed by uid; unused uids are 0.
    pub fn dense(&self) -> Vec<u8> {
        let len = self
            .maxima
            .keys()
            .next_back()
            .map_or(0, |&uid| usize::from(uid) + 1);
        let mut table = vec![0u8; len];
        for (&uid, &max) in &self.maxima {
            if let Some(slot) = table.get_mut(usize::from(uid)) {
                *slot = max;
            }
        }
        table
    }
}
