//! ROM image and sample map
//!
//! Image layout:
//! - [0, header_size): zero-filled reserved pages
//! - [header_size, ..): accepted samples back to back, in acceptance order

use std::fmt;

use crate::AcceptedSample;

/// Final wave ROM bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomImage {
    data: Vec<u8>,
}

impl RomImage {
    /// Lay out `samples` behind a zeroed header. The samples must come
    /// straight from the selector, whose offsets already describe this layout.
    pub fn pack(samples: &[AcceptedSample], header_size: usize) -> Self {
        let total: usize = samples.iter().map(|s| s.size).sum();
        let mut data = Vec::with_capacity(header_size + total);
        data.resize(header_size, 0);

        for sample in samples {
            debug_assert_eq!(sample.byte_offset, data.len(), "{} is misplaced", sample.name);
            data.extend_from_slice(&sample.pcm);
        }

        RomImage { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MapEntry {
    name: String,
    offset: usize,
    page: usize,
    size: usize,
}

/// Text listing of where every sample landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMap {
    entries: Vec<MapEntry>,
    rom_size: usize,
}

impl SampleMap {
    pub fn new(samples: &[AcceptedSample], rom_size: usize) -> Self {
        let entries = samples
            .iter()
            .map(|s| MapEntry {
                name: s.name.clone(),
                offset: s.byte_offset,
                page: s.page_index,
                size: s.size,
            })
            .collect();
        Self { entries, rom_size }
    }

    pub fn sample_count(&self) -> usize {
        self.entries.len()
    }

    pub fn rom_size(&self) -> usize {
        self.rom_size
    }
}

impl fmt::Display for SampleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ES5503 Wave ROM Sample Map")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f)?;
        for entry in &self.entries {
            writeln!(f, "Sample: {}", entry.name)?;
            writeln!(f, "  Offset: 0x{:04X} ({} bytes)", entry.offset, entry.offset)?;
            writeln!(f, "  Page:   {}", entry.page)?;
            writeln!(f, "  Size:   {} bytes", entry.size)?;
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "Total ROM size: {} bytes", self.rom_size)?;
        writeln!(f, "Total samples: {}", self.entries.len())
    }
}
