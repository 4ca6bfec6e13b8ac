//! End-to-end ROM build: scan, select, pack, write

use std::path::{Path, PathBuf};

use wavepack_common::RomConfig;

use crate::pack::{RomImage, SampleMap};
use crate::select::{select, FsLoader, Selection, SelectionLimits};
use crate::{catalog, Result, RomError};

/// What a successful build produced
#[derive(Debug)]
pub struct BuildReport {
    pub rom_path: PathBuf,
    pub map_path: PathBuf,
    pub rom_size: usize,
    pub sample_count: usize,
    pub selection: Selection,
}

/// Build the ROM from `source_dir` into `output_dir`
pub fn build(config: &RomConfig, source_dir: &Path, output_dir: &Path) -> Result<BuildReport> {
    config.validate()?;
    tracing::debug!("Samples start at page {}", config.first_sample_page());

    let groups = catalog::scan_groups(source_dir, &config.groups, &config.extension)?;
    let limits = SelectionLimits::from(config);

    let selection = select(&groups, &FsLoader, &limits);
    if selection.is_empty() {
        return Err(RomError::NoSamples);
    }
    if selection.parse_failures > 0 || selection.oversized > 0 {
        tracing::info!(
            "Skipped {} unreadable and {} oversized candidates",
            selection.parse_failures,
            selection.oversized
        );
    }

    let image = RomImage::pack(&selection.samples, config.header_size);
    let map = SampleMap::new(&selection.samples, image.len());

    std::fs::create_dir_all(output_dir).map_err(|source| RomError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let rom_path = output_dir.join(&config.rom_name);
    let map_path = write_outputs(&rom_path, &image, &map)?;

    Ok(BuildReport {
        rom_path,
        map_path,
        rom_size: map.rom_size(),
        sample_count: map.sample_count(),
        selection,
    })
}

/// Map file that accompanies a ROM: `es5503_wavetable.bin` -> `es5503_wavetable.map.txt`
pub fn map_path_for(rom_path: &Path) -> PathBuf {
    rom_path.with_extension("map.txt")
}

/// Write the image and its map; returns the map path
pub fn write_outputs(rom_path: &Path, image: &RomImage, map: &SampleMap) -> Result<PathBuf> {
    std::fs::write(rom_path, image.as_bytes()).map_err(|source| RomError::Write {
        path: rom_path.to_path_buf(),
        source,
    })?;

    let map_path = map_path_for(rom_path);
    std::fs::write(&map_path, map.to_string()).map_err(|source| RomError::Write {
        path: map_path.clone(),
        source,
    })?;

    tracing::info!("Created {}: {} bytes", rom_path.display(), image.len());
    tracing::info!("Sample map: {}", map_path.display());
    Ok(map_path)
}
