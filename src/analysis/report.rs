//! Orchestration of one analysis run and rendering of its findings.
//!
//! A run moves through `Opened -> MbrDecoded -> Probed -> Rendered -> Closed`.
//! It aborts only when sector 0 is unreadable or carries no MBR signature;
//! anything that goes wrong below the MBR is recorded in the findings instead.

use getset::Getters;
use log::{debug, info, warn};
use std::fmt;
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

use super::config::AnalysisConfig;
use crate::disk::{DiskError, SectorReader};
use crate::partition::{Mbr, PartitionEntry};
use crate::traits::LayoutDisplay;
use crate::volume::{self, FileSystemGuess};

/// Lifecycle of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Opened,
    MbrDecoded,
    Probed,
    Rendered,
    Closed,
    Aborted,
}

/// What happened when probing the target partition.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The boot sector was read and classified.
    Probed {
        slot: usize,
        entry: PartitionEntry,
        guess: FileSystemGuess,
    },
    /// The boot sector could not be read. The partition table is still reported.
    Failed {
        slot: usize,
        entry: PartitionEntry,
        error: DiskError,
    },
    /// There are fewer allocated partitions than the target requires.
    NoTarget { allocated: usize },
}

/// The output of one analysis run. Built once, then only read for rendering.
#[derive(Debug, Getters)]
pub struct AnalysisFindings {
    /// The analysed disk image.
    #[get = "pub"]
    image: PathBuf,
    /// The decoded partition table, all four slots included.
    #[get = "pub"]
    mbr: Mbr,
    /// Result of the boot sector probe.
    #[get = "pub"]
    probe: ProbeOutcome,
    #[get = "pub"]
    config: AnalysisConfig,
}

/// One analysis run over a disk image. The run owns its reader exclusively.
pub struct Analysis<R> {
    image: PathBuf,
    reader: SectorReader<R>,
    config: AnalysisConfig,
    state: AnalysisState,
}

impl Analysis<std::fs::File> {
    /// Opens the image at `path` for analysis.
    pub fn open(path: &Path, config: AnalysisConfig) -> Result<Self, DiskError> {
        let reader = SectorReader::open(path)?;
        Ok(Self::new(path, reader, config))
    }
}

impl<R: Read + Seek> Analysis<R> {
    pub fn new(image: &Path, reader: SectorReader<R>, config: AnalysisConfig) -> Self {
        debug!("Analysis of {} opened", image.display());
        Self {
            image: image.to_path_buf(),
            reader,
            config,
            state: AnalysisState::Opened,
        }
    }

    pub fn state(&self) -> AnalysisState {
        self.state
    }

    fn transition(&mut self, next: AnalysisState) {
        debug!("Analysis state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Decodes the MBR and probes the target partition.
    ///
    /// # Errors
    /// - `DiskError::Io` or `DiskError::TruncatedImage` if sector 0 cannot be read.
    /// - `DiskError::InvalidSignature` if sector 0 is not an MBR.
    pub fn collect(&mut self) -> Result<AnalysisFindings, DiskError> {
        let mbr = match self.reader.read_sector(0).and_then(|s| Mbr::decode(&s)) {
            Ok(mbr) => mbr,
            Err(err) => {
                self.transition(AnalysisState::Aborted);
                return Err(err.with_path(&self.image));
            }
        };
        self.transition(AnalysisState::MbrDecoded);

        let allocated = mbr.allocated();
        let probe = match allocated.get(self.config.target_index()) {
            Some(&(slot, entry)) => {
                info!("Probing partition {} at LBA {}", slot, entry.lba_start());
                let outcome = match volume::probe(entry, &mut self.reader) {
                    Ok(guess) => ProbeOutcome::Probed {
                        slot,
                        entry: entry.clone(),
                        guess,
                    },
                    Err(error) => {
                        warn!("Could not probe partition {slot}: {error}");
                        ProbeOutcome::Failed {
                            slot,
                            entry: entry.clone(),
                            error,
                        }
                    }
                };
                self.transition(AnalysisState::Probed);
                outcome
            }
            None => ProbeOutcome::NoTarget {
                allocated: allocated.len(),
            },
        };

        Ok(AnalysisFindings {
            image: self.image.clone(),
            mbr,
            probe,
            config: self.config,
        })
    }

    /// Runs the whole analysis and renders the report to `out`.
    ///
    /// The image is closed when this returns.
    pub fn run<W: Write>(mut self, out: &mut W) -> Result<AnalysisFindings, DiskError> {
        let findings = self.collect()?;
        render(&findings, out)?;
        self.transition(AnalysisState::Rendered);
        self.transition(AnalysisState::Closed);
        Ok(findings)
    }
}

/// Opens the image at `path`, analyses it and renders the report to `out`.
pub fn analyze<W: Write>(
    path: &Path,
    config: AnalysisConfig,
    out: &mut W,
) -> Result<AnalysisFindings, DiskError> {
    Analysis::open(path, config)?.run(out)
}

/// English ordinal of small 1-based numbers, as used in section headings.
fn ordinal(n: usize) -> Option<&'static str> {
    match n {
        1 => Some("First"),
        2 => Some("Second"),
        3 => Some("Third"),
        4 => Some("Fourth"),
        _ => None,
    }
}

impl LayoutDisplay for AnalysisFindings {
    fn display_layout(&self, indent: u8) -> Result<String, fmt::Error> {
        use std::fmt::Write;

        let mut out = String::new();
        let pad = " ".repeat(indent.into());
        let target = self.config.target_number();

        writeln!(out, "{pad}Partition Table Analysis for: {}", self.image.display())?;
        writeln!(out, "{pad}{}", "=".repeat(60))?;
        write!(out, "{}", self.mbr.display_layout(indent)?)?;

        let entry = match &self.probe {
            ProbeOutcome::NoTarget { .. } => {
                match ordinal(target) {
                    Some(word) => writeln!(
                        out,
                        "{pad}No {} allocated partition found!",
                        word.to_lowercase()
                    )?,
                    None => writeln!(out, "{pad}No allocated partition #{target} found!")?,
                }
                return Ok(out);
            }
            ProbeOutcome::Probed { entry, .. } | ProbeOutcome::Failed { entry, .. } => entry,
        };

        writeln!(out)?;
        writeln!(out, "{pad}{}", "=".repeat(50))?;
        match ordinal(target) {
            Some(word) => writeln!(out, "{pad}{word} Partition Detailed Analysis:")?,
            None => writeln!(out, "{pad}Allocated Partition #{target} Detailed Analysis:")?,
        }
        writeln!(out, "{pad}{}", "=".repeat(40))?;

        match &self.probe {
            ProbeOutcome::Probed { slot, guess, .. } => {
                writeln!(out, "{pad}  Partition slot: {slot}")?;
                writeln!(out, "{pad}  {guess}")?;
                writeln!(out, "{pad}  Starting at sector: {}", entry.lba_start())?;
                writeln!(out, "{pad}  Total sectors: {}", entry.sector_count())?;
                writeln!(out, "{pad}  Total size: {:.2} MB", entry.size_mb())?;
            }
            ProbeOutcome::Failed { slot, error, .. } => {
                writeln!(out, "{pad}  Partition slot: {slot}")?;
                writeln!(out, "{pad}  ERROR reading partition: {error}")?;
            }
            ProbeOutcome::NoTarget { .. } => {}
        }

        Ok(out)
    }
}

/// Writes the findings report to any writer.
pub fn render<W: Write>(findings: &AnalysisFindings, out: &mut W) -> io::Result<()> {
    let report = findings.display_layout(0).map_err(io::Error::other)?;
    out.write_all(report.as_bytes())?;
    out.flush()
}
