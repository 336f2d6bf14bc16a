//! Settings of one analysis run.

use getset::CopyGetters;

/// Image looked up in the working directory when no path is given.
pub const DEFAULT_IMAGE: &str = "CW Image.dd";

/// Zero-based index, among allocated partitions, of the partition probed by default.
/// The tool was written to inspect a known secondary evidence partition.
pub const DEFAULT_TARGET_INDEX: usize = 1;

/// Options of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
pub struct AnalysisConfig {
    /// Zero-based index of the allocated partition whose boot sector is probed.
    #[get_copy = "pub"]
    target_index: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_index: DEFAULT_TARGET_INDEX,
        }
    }
}

impl AnalysisConfig {
    /// Builds a config probing the `n`-th allocated partition, counting from 1.
    ///
    /// Returns `None` for `n == 0`.
    pub fn with_target(n: usize) -> Option<Self> {
        n.checked_sub(1).map(|target_index| Self { target_index })
    }

    /// The 1-based number of the probed allocated partition.
    pub fn target_number(&self) -> usize {
        self.target_index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_second_allocated_partition() {
        let config = AnalysisConfig::default();

        assert_eq!(config.target_index(), 1);
        assert_eq!(config.target_number(), 2);
        assert_eq!(AnalysisConfig::with_target(2), Some(config));
    }

    #[test]
    fn partition_numbers_start_at_one() {
        assert_eq!(AnalysisConfig::with_target(0), None);
        assert_eq!(AnalysisConfig::with_target(1).unwrap().target_index(), 0);
    }
}
