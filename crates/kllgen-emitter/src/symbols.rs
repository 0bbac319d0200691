//! Stable name → index interning.
//!
//! Firmware tables are addressed by position, so every named entity gets a
//! 0-based index in first-seen order. Interning an existing name returns
//! its index without changing anything.

use std::collections::BTreeMap;
use std::fmt;

/// The disjoint namespaces of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Capability,
    TriggerMacro,
    ResultMacro,
    Pixel,
    Animation,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 5] = [
        SymbolKind::Capability,
        SymbolKind::TriggerMacro,
        SymbolKind::ResultMacro,
        SymbolKind::Pixel,
        SymbolKind::Animation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Capability => "capability",
            SymbolKind::TriggerMacro => "trigger macro",
            SymbolKind::ResultMacro => "result macro",
            SymbolKind::Pixel => "pixel",
            SymbolKind::Animation => "animation",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SymbolTable {
    names: Vec<String>,
    lookup: BTreeMap<String, usize>,
}

impl SymbolTable {
    fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.lookup.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name.to_owned());
        self.lookup.insert(name.to_owned(), index);
        index
    }
}

/// Per-kind interning tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolIndex {
    capabilities: SymbolTable,
    triggers: SymbolTable,
    results: SymbolTable,
    pixels: SymbolTable,
    animations: SymbolTable,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: SymbolKind) -> &SymbolTable {
        match kind {
            SymbolKind::Capability => &self.capabilities,
            SymbolKind::TriggerMacro => &self.triggers,
            SymbolKind::ResultMacro => &self.results,
            SymbolKind::Pixel => &self.pixels,
            SymbolKind::Animation => &self.animations,
        }
    }

    fn table_mut(&mut self, kind: SymbolKind) -> &mut SymbolTable {
        match kind {
            SymbolKind::Capability => &mut self.capabilities,
            SymbolKind::TriggerMacro => &mut self.triggers,
            SymbolKind::ResultMacro => &mut self.results,
            SymbolKind::Pixel => &mut self.pixels,
            SymbolKind::Animation => &mut self.animations,
        }
    }

    /// Index of `name`, allocating the next one on first sight.
    pub fn intern(&mut self, kind: SymbolKind, name: &str) -> usize {
        self.table_mut(kind).intern(name)
    }

    pub fn resolve(&self, kind: SymbolKind, name: &str) -> Option<usize> {
        self.table(kind).lookup.get(name).copied()
    }

    pub fn name(&self, kind: SymbolKind, index: usize) -> Option<&str> {
        self.table(kind).names.get(index).map(String::as_str)
    }

    pub fn len(&self, kind: SymbolKind) -> usize {
        self.table(kind).names.len()
    }

    pub fn is_empty(&self, kind: SymbolKind) -> bool {
        self.len(kind) == 0
    }

    /// `(index, name)` pairs in insertion order.
    pub fn iter(&self, kind: SymbolKind) -> impl Iterator<Item = (usize, &str)> {
        self.table(kind)
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (i, n.as_str()))
    }
}
