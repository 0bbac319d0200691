//! LED pixel tables: channel buffers, pixel mapping and display lookups.

use std::collections::BTreeMap;

use kllgen_model::PixelConfig;

/// Channel buffer with its resolved global base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub length: u32,
    pub width: u8,
    pub base: u32,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelEntry {
    Blank,
    Channels { width: u8, channels: Vec<u32> },
}

/// Pixel tables of one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMap {
    pub buffers: Vec<PixelBuffer>,
    /// Indexed by pixel id − 1.
    pub mapping: Vec<PixelEntry>,
    /// Indexed by scan code − 1; 0 = no pixel.
    pub scan_to_pixel: Vec<u16>,
    /// Indexed by scan code − 1; flat display offset of the pixel.
    pub scan_to_display: Vec<usize>,
    pub display: Vec<Vec<u16>>,
    pub columns: usize,
    pub led_buffer_struct: Option<String>,
}

impl PixelMap {
    pub fn build(config: &PixelConfig) -> Self {
        let mut base = 0u32;
        let buffers: Vec<PixelBuffer> = config
            .buffers
            .iter()
            .map(|b| {
                let buffer = PixelBuffer {
                    length: b.length,
                    width: b.width,
                    base,
                    symbol: b.buffer.clone(),
                };
                base = base.saturating_add(b.length);
                buffer
            })
            .collect();

        // First definition of an id wins; duplicates are reported by validation.
        let mut by_id: BTreeMap<u16, &[u32]> = BTreeMap::new();
        for pixel in config.pixels.iter().filter(|p| p.id > 0) {
            by_id.entry(pixel.id).or_insert(pixel.channels.as_slice());
        }
        let max_id = by_id.keys().next_back().copied().unwrap_or(0);

        let mut map = PixelMap {
            buffers,
            mapping: Vec::new(),
            scan_to_pixel: Vec::new(),
            scan_to_display: Vec::new(),
            columns: config.display.first().map_or(0, Vec::len),
            display: config.display.clone(),
            led_buffer_struct: config.led_buffer_struct.clone(),
        };

        map.mapping = (1..=max_id)
            .map(|id| match by_id.get(&id) {
                Some(channels) if !channels.is_empty() => PixelEntry::Channels {
                    width: channels
                        .first()
                        .and_then(|&c| map.locate(c))
                        .and_then(|(buffer, _)| map.buffers.get(buffer))
                        .map_or(0, |b| b.width),
                    channels: channels.to_vec(),
                },
                _ => PixelEntry::Blank,
            })
            .collect();

        // First pixel on a scan code wins.
        let mut scanned: BTreeMap<u16, u16> = BTreeMap::new();
        for (scan_code, id) in config
            .pixels
            .iter()
            .filter_map(|p| p.scan_code.filter(|&s| s > 0).map(|s| (s, p.id)))
        {
            scanned.entry(scan_code).or_insert(id);
        }
        let max_scan = scanned.keys().next_back().copied().unwrap_or(0);
        map.scan_to_pixel = (1..=max_scan)
            .map(|s| scanned.get(&s).copied().unwrap_or(0))
            .collect();
        map.scan_to_display = map
            .scan_to_pixel
            .iter()
            .map(|&pixel| {
                if pixel == 0 {
                    0
                } else {
                    map.display_offset(pixel).unwrap_or(0)
                }
            })
            .collect();
        map
    }

    pub fn rows(&self) -> usize {
        self.display.len()
    }

    /// Channels across all buffers.
    pub fn total_channels(&self) -> u32 {
        self.buffers
            .last()
            .map_or(0, |b| b.base.saturating_add(b.length))
    }

    pub fn total_pixels(&self) -> usize {
        self.mapping.len()
    }

    /// `(buffer, offset)` of a global channel.
    pub fn locate(&self, channel: u32) -> Option<(usize, u32)> {
        self.buffers.iter().enumerate().find_map(|(i, b)| {
            channel
                .checked_sub(b.base)
                .filter(|&offset| offset < b.length)
                .map(|offset| (i, offset))
        })
    }

    /// Row-major offset of the first display cell holding `pixel`.
    pub fn display_offset(&self, pixel: u16) -> Option<usize> {
        self.display.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|&c| c == pixel)
                .map(|col| row.saturating_mul(self.columns).saturating_add(col))
        })
    }

    /// Whether display cells need 16 bits.
    pub fn wide_display(&self) -> bool {
        self.display.iter().flatten().any(|&c| c > 0xFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kllgen_test_helpers::prelude::*;

    #[test]
    fn test_ktype_buffer_bases() {
        let map = PixelMap::build(&ktype_pixels());
        let bases: Vec<u32> = map.buffers.iter().map(|b| b.base).collect();
        assert_eq!(bases, vec![0, 144, 288, 432]);
        assert_eq!(map.total_channels(), 576);
    }

    #[test]
    fn test_channel_lookup() {
        let map = PixelMap::build(&ktype_pixels());
        assert_eq!(map.locate(33), Some((0, 33)));
        assert_eq!(map.locate(440), Some((3, 8)));
        assert_eq!(map.locate(576), None);
    }

    #[test]
    fn test_gaps_become_blank() {
        let map = PixelMap::build(&ktype_pixels());
        assert_eq!(map.total_pixels(), 125);
        assert_eq!(map.mapping.get(8), Some(&PixelEntry::Blank));
        assert_eq!(
            map.mapping.first(),
            Some(&PixelEntry::Channels {
                width: 16,
                channels: vec![0, 33, 49]
            })
        );
    }

    #[test]
    fn test_display_offsets() {
        let map = PixelMap::build(&ktype_pixels());
        assert_eq!(map.display_offset(125), Some(190));
        assert_eq!(map.display.get(3).and_then(|r| r.first()).copied(), Some(0));
        assert_eq!(map.scan_to_display.get(2), Some(&2));
        assert!(!map.wide_display());
    }
}
