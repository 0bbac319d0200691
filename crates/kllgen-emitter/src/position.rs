//! Physical key positions, dense by scan code.

use std::collections::BTreeMap;

use kllgen_model::KeyPositionDef;

/// Position table indexed by scan code − 1; gaps are all-zero entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyPositions {
    pub entries: Vec<(u16, KeyPositionDef)>,
}

impl KeyPositions {
    /// Build from the declared positions, ignoring scan codes outside
    /// `1..=max_scan_code` (validation reports those).
    pub fn build(positions: &[KeyPositionDef], max_scan_code: u16) -> Self {
        let by_scan: BTreeMap<u16, KeyPositionDef> = positions
            .iter()
            .filter(|p| (1..=max_scan_code).contains(&p.scan_code))
            .map(|p| (p.scan_code, *p))
            .collect();
        let last = by_scan.keys().next_back().copied().unwrap_or(0);
        let entries = (1..=last)
            .map(|scan_code| {
                let position = by_scan.get(&scan_code).copied().unwrap_or(KeyPositionDef {
                    scan_code,
                    ..Default::default()
                });
                (scan_code, position)
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
