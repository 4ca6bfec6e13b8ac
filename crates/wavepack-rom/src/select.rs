//! Budgeted sample selection
//!
//! Walks candidate groups in priority order and accepts samples until the
//! budget is hit. Offsets are assigned at acceptance time, so the accepted
//! list is already laid out: each sample starts where the previous ended.

use std::collections::HashSet;
use std::path::Path;

use wavepack_common::{PackingStrategy, RomConfig};
use wavepack_iff::{ParsedVoice, TranscodedSample};

use crate::CandidateGroup;

/// Source of parsed voices for candidate paths
pub trait VoiceLoader {
    fn load(&self, path: &Path) -> wavepack_iff::Result<ParsedVoice>;
}

/// Reads candidates from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl VoiceLoader for FsLoader {
    fn load(&self, path: &Path) -> wavepack_iff::Result<ParsedVoice> {
        ParsedVoice::open(path)
    }
}

impl<F> VoiceLoader for F
where
    F: Fn(&Path) -> wavepack_iff::Result<ParsedVoice>,
{
    fn load(&self, path: &Path) -> wavepack_iff::Result<ParsedVoice> {
        self(path)
    }
}

/// Layout and budget rules the selector enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub header_size: usize,
    pub page_size: usize,
    pub budget: usize,
    pub max_sample_size: usize,
    pub strategy: PackingStrategy,
}

impl From<&RomConfig> for SelectionLimits {
    fn from(config: &RomConfig) -> Self {
        Self {
            header_size: config.header_size,
            page_size: config.page_size,
            budget: config.budget,
            max_sample_size: config.max_sample_size,
            strategy: config.strategy,
        }
    }
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self::from(&RomConfig::default())
    }
}

/// A sample placed in the ROM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedSample {
    /// `<group>/<file name>`
    pub name: String,
    /// Absolute offset in the ROM image
    pub byte_offset: usize,
    pub size: usize,
    pub page_index: usize,
    pub sample_rate: u32,
    pub pcm: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every candidate was considered
    Exhausted,
    /// `rejected` would have pushed the total past the budget
    BudgetReached { total: usize, rejected: String },
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub samples: Vec<AcceptedSample>,
    /// Sum of accepted sizes, header excluded
    pub total_size: usize,
    pub stop: StopReason,
    pub parse_failures: usize,
    pub oversized: usize,
    /// Candidates skipped by [`PackingStrategy::SkipOnOverflow`]
    pub overflowed: usize,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Select samples from `groups` in order until the budget is exhausted
pub fn select<L: VoiceLoader>(
    groups: &[CandidateGroup],
    loader: &L,
    limits: &SelectionLimits,
) -> Selection {
    let mut samples: Vec<AcceptedSample> = Vec::new();
    let mut names = HashSet::new();
    let mut total_size = 0usize;
    let mut stop = StopReason::Exhausted;
    let mut parse_failures = 0;
    let mut oversized = 0;
    let mut overflowed = 0;

    'groups: for group in groups {
        for path in &group.files {
            let voice = match loader.load(path) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    parse_failures += 1;
                    continue;
                }
            };
            let sample = TranscodedSample::from_voice(&voice);
            let size = sample.len();

            if size > limits.max_sample_size {
                tracing::debug!(
                    "Skip {}: {} bytes exceeds {} byte sample limit",
                    path.display(),
                    size,
                    limits.max_sample_size
                );
                oversized += 1;
                continue;
            }

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = format!("{}/{}", group.name, file_name);

            if names.contains(&name) {
                tracing::warn!("Skip {}: duplicate sample name", name);
                continue;
            }

            if total_size + size > limits.budget {
                match limits.strategy {
                    PackingStrategy::HaltOnOverflow => {
                        tracing::info!("Size limit reached at {} bytes", total_size);
                        stop = StopReason::BudgetReached {
                            total: total_size,
                            rejected: name,
                        };
                        break 'groups;
                    }
                    PackingStrategy::SkipOnOverflow => {
                        tracing::debug!(
                            "Skip {}: {} bytes does not fit ({} of {} used)",
                            name,
                            size,
                            total_size,
                            limits.budget
                        );
                        overflowed += 1;
                        continue;
                    }
                }
            }

            let byte_offset = limits.header_size + total_size;
            tracing::info!("Added: {} - {} bytes @ {}Hz", name, size, sample.sample_rate);
            names.insert(name.clone());
            samples.push(AcceptedSample {
                name,
                byte_offset,
                size,
                page_index: byte_offset / limits.page_size,
                sample_rate: sample.sample_rate,
                pcm: sample.pcm,
            });
            total_size += size;
        }
    }

    Selection {
        samples,
        total_size,
        stop,
        parse_failures,
        oversized,
        overflowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use wavepack_common::HEADER_SIZE;
    use wavepack_iff::IffError;

    /// In-memory voices keyed by path; unknown paths fail to parse
    fn loader(voices: &[(&str, usize)]) -> impl Fn(&Path) -> wavepack_iff::Result<ParsedVoice> {
        let map: HashMap<PathBuf, usize> = voices
            .iter()
            .map(|(p, len)| (PathBuf::from(p), *len))
            .collect();
        move |path: &Path| match map.get(path) {
            Some(&len) => Ok(ParsedVoice {
                pcm: (0..len).map(|i| i as u8).collect(),
                sample_rate: 22050,
                one_shot_length: len as u32,
            }),
            None => Err(IffError::Format(format!("bad file {}", path.display()))),
        }
    }

    fn group(name: &str, files: &[&str]) -> CandidateGroup {
        CandidateGroup::new(name, files.iter().map(PathBuf::from).collect())
    }

    fn limits(budget: usize) -> SelectionLimits {
        SelectionLimits {
            budget,
            ..SelectionLimits::default()
        }
    }

    #[test]
    fn test_offsets_are_packed() {
        let groups = vec![
            group("SYNTH_48", &["s/a", "s/b"]),
            group("A", &["a/c"]),
        ];
        let load = loader(&[("s/a", 10), ("s/b", 300), ("a/c", 7)]);
        let sel = select(&groups, &load, &limits(10_000));

        assert_eq!(sel.stop, StopReason::Exhausted);
        let names: Vec<_> = sel.samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SYNTH_48/a", "SYNTH_48/b", "A/c"]);

        let mut expected = HEADER_SIZE;
        for s in &sel.samples {
            assert_eq!(s.byte_offset, expected);
            assert_eq!(s.page_index, s.byte_offset / 256);
            assert_eq!(s.size, s.pcm.len());
            expected += s.size;
        }
        assert_eq!(sel.total_size, 317);
        assert_eq!(sel.samples[2].byte_offset, 2048 + 310);
        assert_eq!(sel.samples[2].page_index, 9);
    }

    #[test]
    fn test_budget_exhaustion_halts_everything() {
        let groups = vec![group("G", &["x", "y"])];
        let load = loader(&[("x", 10), ("y", 10)]);
        let sel = select(&groups, &load, &limits(5));

        assert!(sel.is_empty());
        assert_eq!(
            sel.stop,
            StopReason::BudgetReached {
                total: 0,
                rejected: "G/x".to_string()
            }
        );
    }

    #[test]
    fn test_halt_skips_later_groups() {
        let groups = vec![group("G1", &["big", "small"]), group("G2", &["tiny"])];
        let load = loader(&[("big", 60), ("small", 10), ("tiny", 1)]);
        let sel = select(&groups, &load, &limits(50));
        assert!(sel.is_empty());
        assert!(matches!(sel.stop, StopReason::BudgetReached { .. }));
    }

    #[test]
    fn test_budget_boundary_is_inclusive() {
        let groups = vec![group("G", &["a", "b", "c"])];
        let load = loader(&[("a", 20), ("b", 30), ("c", 1)]);
        let sel = select(&groups, &load, &limits(50));
        assert_eq!(sel.samples.len(), 2);
        assert_eq!(sel.total_size, 50);
        assert!(sel.total_size <= 50);
    }

    #[test]
    fn test_skip_on_overflow_keeps_going() {
        let groups = vec![group("G1", &["big", "small"]), group("G2", &["tiny"])];
        let load = loader(&[("big", 60), ("small", 10), ("tiny", 1)]);
        let sel = select(
            &groups,
            &load,
            &SelectionLimits {
                budget: 50,
                strategy: PackingStrategy::SkipOnOverflow,
                ..SelectionLimits::default()
            },
        );
        let names: Vec<_> = sel.samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["G1/small", "G2/tiny"]);
        assert_eq!(sel.overflowed, 1);
        assert_eq!(sel.stop, StopReason::Exhausted);
        assert_eq!(sel.samples[1].byte_offset, HEADER_SIZE + 10);
    }

    #[test]
    fn test_oversized_sample_does_not_touch_budget() {
        let groups = vec![group("G", &["huge", "ok"])];
        let load = loader(&[("huge", 32769), ("ok", 32768)]);
        let sel = select(&groups, &load, &limits(40_000));
        assert_eq!(sel.oversized, 1);
        assert_eq!(sel.samples.len(), 1);
        assert_eq!(sel.samples[0].name, "G/ok");
        assert_eq!(sel.samples[0].byte_offset, HEADER_SIZE);
    }

    #[test]
    fn test_parse_failures_are_skipped() {
        let groups = vec![group("G", &["broken", "good"])];
        let load = loader(&[("good", 4)]);
        let sel = select(&groups, &load, &limits(100));
        assert_eq!(sel.parse_failures, 1);
        assert_eq!(sel.samples.len(), 1);
        assert_eq!(sel.samples[0].name, "G/good");
    }

    #[test]
    fn test_samples_are_transcoded() {
        let groups = vec![group("G", &["a"])];
        let load = loader(&[("a", 256)]);
        let sel = select(&groups, &load, &limits(1000));
        let pcm = &sel.samples[0].pcm;
        assert_eq!(pcm.len(), 256);
        assert!(pcm.iter().all(|&b| b != 0));
        assert_eq!(pcm[0], 0x80);
    }

    #[test]
    fn test_duplicate_names_skipped() {
        let groups = vec![group("G", &["d1/x", "d2/x"])];
        let load = loader(&[("d1/x", 3), ("d2/x", 3)]);
        let sel = select(&groups, &load, &limits(100));
        assert_eq!(sel.samples.len(), 1);
        assert_eq!(sel.total_size, 3);
    }

    #[test]
    fn test_duplicate_never_halts_selection() {
        let groups = vec![group("G", &["d1/x", "d2/x", "z"])];
        let load = loader(&[("d1/x", 3), ("d2/x", 10), ("z", 3)]);
        let sel = select(&groups, &load, &limits(8));
        let names: Vec<_> = sel.samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["G/x", "G/z"]);
        assert_eq!(sel.stop, StopReason::Exhausted);
        assert_eq!(sel.samples[1].byte_offset, HEADER_SIZE + 3);
    }

    #[test]
    fn test_deterministic() {
        let groups = vec![group("G1", &["a", "b"]), group("G2", &["c", "d"])];
        let load = loader(&[("a", 100), ("b", 200), ("c", 50), ("d", 400)]);
        let first = select(&groups, &load, &limits(500));
        let second = select(&groups, &load, &limits(500));
        assert_eq!(first.samples, second.samples);
        assert_eq!(first.stop, second.stop);
    }

    #[test]
    fn test_no_groups() {
        let load = loader(&[]);
        let sel = select(&[], &load, &SelectionLimits::default());
        assert!(sel.is_empty());
        assert_eq!(sel.stop, StopReason::Exhausted);
    }
}
