//! Common configuration and constants shared across wavepack crates
//!
//! The ES5503 wave RAM layout:
//! - 128KB total (131,072 bytes), addressed in 256-byte pages
//! - Pages 0-7 (0x0000-0x07FF) reserved for built-in waveforms
//! - Pages 8+ (offset 2048+) hold custom sample data

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Total ES5503 wave RAM in bytes
pub const WAVE_RAM_SIZE: usize = 128 * 1024;

/// Addressing unit of the chip
pub const PAGE_SIZE: usize = 256;

/// Reserved zero-filled region at the start of the ROM (pages 0-7)
pub const HEADER_SIZE: usize = 8 * PAGE_SIZE;

/// Default sample budget, leaving the header region free
pub const DEFAULT_BUDGET: usize = 126 * 1024;

/// Samples longer than this are not useful as wavetables
pub const MAX_SAMPLE_SIZE: usize = 32768;

/// Priority directories of the Mirage4Amiga library
pub const DEFAULT_GROUPS: [&str; 8] = [
    "SYNTH_48", // Synth waveforms
    "DIGITAL1", // Digital waveforms
    "DIGITAL2",
    "A",        // Piano samples
    "STRINGS1",
    "BRASS1",
    "BAS-SYN1", // Bass synth
    "CLASSIC1",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// What the selector does with a candidate that would overflow the budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackingStrategy {
    /// Stop the whole selection at the first overflowing candidate
    #[default]
    HaltOnOverflow,
    /// Skip the overflowing candidate and keep looking for smaller ones
    SkipOnOverflow,
}

impl PackingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            PackingStrategy::HaltOnOverflow => "halt-on-overflow",
            PackingStrategy::SkipOnOverflow => "skip-on-overflow",
        }
    }

    /// Parse the kebab-case name used in config files and on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "halt-on-overflow" => Some(PackingStrategy::HaltOnOverflow),
            "skip-on-overflow" => Some(PackingStrategy::SkipOnOverflow),
            _ => None,
        }
    }
}

/// ROM build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RomConfig {
    /// Zero-filled bytes before the first sample
    pub header_size: usize,
    pub page_size: usize,
    /// Maximum total bytes of sample data, header excluded
    pub budget: usize,
    /// Per-sample ceiling; longer samples are skipped without touching the budget
    pub max_sample_size: usize,
    /// Candidate file extension, matched case-insensitively
    pub extension: String,
    /// Candidate groups in priority order
    pub groups: Vec<String>,
    pub strategy: PackingStrategy,
    /// File name of the ROM image inside the output directory
    pub rom_name: String,
}

impl Default for RomConfig {
    fn default() -> Self {
        Self {
            header_size: HEADER_SIZE,
            page_size: PAGE_SIZE,
            budget: DEFAULT_BUDGET,
            max_sample_size: MAX_SAMPLE_SIZE,
            extension: "8svx".to_string(),
            groups: DEFAULT_GROUPS.iter().map(|g| g.to_string()).collect(),
            strategy: PackingStrategy::default(),
            rom_name: "es5503_wavetable.bin".to_string(),
        }
    }
}

impl RomConfig {
    /// Load a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: RomConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the layout against the chip's wave RAM
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be non-zero".into()));
        }
        if self.header_size % self.page_size != 0 {
            return Err(ConfigError::Invalid(format!(
                "header_size {} is not a multiple of page_size {}",
                self.header_size, self.page_size
            )));
        }
        let used = self.header_size.saturating_add(self.budget);
        if used > WAVE_RAM_SIZE {
            return Err(ConfigError::Invalid(format!(
                "header_size + budget = {} exceeds wave RAM ({} bytes)",
                used, WAVE_RAM_SIZE
            )));
        }
        if self.max_sample_size == 0 {
            return Err(ConfigError::Invalid("max_sample_size must be non-zero".into()));
        }
        if self.extension.is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.is_empty() {
                return Err(ConfigError::Invalid("empty group name".into()));
            }
            if !seen.insert(group.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate group '{}'", group)));
            }
        }
        Ok(())
    }

    /// First page available for sample data
    pub fn first_sample_page(&self) -> usize {
        self.header_size / self.page_size
    }
}
