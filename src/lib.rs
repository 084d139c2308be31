// src/lib.rs
pub mod types;
pub mod taxonomy;
pub mod viral_summary;
pub mod species_annotation;
pub mod pathogen_map;
pub mod amr_annotation;

use std::fmt;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::amr_annotation::AmrParse;
use crate::types::{Family, Parsed, ParseWarning, PathogenSpecies, SpeciesAnnotation};

/// The four report kinds a bundle is built from; used to label
/// bundle-level diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    ViralSummary,
    SpeciesAnnotation,
    PathogenMap,
    AmrAnnotation,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportKind::ViralSummary => "viral summary",
            ReportKind::SpeciesAnnotation => "species annotation",
            ReportKind::PathogenMap => "pathogen map",
            ReportKind::AmrAnnotation => "AMR annotation",
        })
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    /// A report that parsed to zero records cannot feed a report run.
    #[error("no records parsed from the {kind} report")]
    EmptyReport { kind: ReportKind },
}

/// Reads a whole report file as text. Files ending in `.gz` are
/// decompressed on the fly.
pub fn read_report_text<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let mut reader: Box<dyn Read> = if is_gz {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// All four parsed reports for one sample, each with its warnings.
/// Records are immutable once the bundle is built; the text getters
/// generate their output on demand.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub viral: Parsed<Family>,
    pub species: Parsed<SpeciesAnnotation>,
    pub pathogens: Parsed<PathogenSpecies>,
    pub amr: AmrParse,
}

impl ReportBundle {
    /// The report run treats an empty parse from any file as an unusable
    /// input. The AMR report counts as empty when its first bin has no
    /// classes.
    pub fn ensure_non_empty(&self) -> Result<(), ReportError> {
        if self.viral.records.is_empty() {
            return Err(ReportError::EmptyReport {
                kind: ReportKind::ViralSummary,
            });
        }
        if self.species.records.is_empty() {
            return Err(ReportError::EmptyReport {
                kind: ReportKind::SpeciesAnnotation,
            });
        }
        if self.pathogens.records.is_empty() {
            return Err(ReportError::EmptyReport {
                kind: ReportKind::PathogenMap,
            });
        }
        if self.amr.first_bin().is_empty() {
            return Err(ReportError::EmptyReport {
                kind: ReportKind::AmrAnnotation,
            });
        }
        Ok(())
    }

    pub fn warning_count(&self) -> usize {
        self.viral.warnings.len()
            + self.species.warnings.len()
            + self.pathogens.warnings.len()
            + self.amr.warnings.len()
    }

    /// Generate a tab-separated per-report summary on demand.
    pub fn get_summary(&self) -> String {
        let mut output = String::new();
        output.push_str("report\trecords\twarnings\n");
        writeln!(
            output,
            "{}\t{}\t{}",
            ReportKind::ViralSummary,
            self.viral.records.len(),
            self.viral.warnings.len()
        )
        .unwrap();
        writeln!(
            output,
            "{}\t{}\t{}",
            ReportKind::SpeciesAnnotation,
            self.species.records.len(),
            self.species.warnings.len()
        )
        .unwrap();
        writeln!(
            output,
            "{}\t{}\t{}",
            ReportKind::PathogenMap,
            self.pathogens.records.len(),
            self.pathogens.warnings.len()
        )
        .unwrap();
        writeln!(
            output,
            "{}\t{}\t{}",
            ReportKind::AmrAnnotation,
            self.amr.first_bin().len(),
            self.amr.warnings.len()
        )
        .unwrap();
        output
    }

    /// Generate the warning report on demand, one line per warning.
    pub fn get_warning_report(&self) -> String {
        let sections: [(ReportKind, &[ParseWarning]); 4] = [
            (ReportKind::ViralSummary, &self.viral.warnings),
            (ReportKind::SpeciesAnnotation, &self.species.warnings),
            (ReportKind::PathogenMap, &self.pathogens.warnings),
            (ReportKind::AmrAnnotation, &self.amr.warnings),
        ];

        let mut output = String::new();
        for (kind, warnings) in sections {
            for warning in warnings {
                writeln!(
                    output,
                    "{}\tline {}\t{}\t{}",
                    kind, warning.line_no, warning.reason, warning.line
                )
                .unwrap();
            }
        }
        output
    }
}

/// Parses all four report files for one sample. The parsers hold no shared
/// state and never fail hard, so they run side by side as two pairs of
/// rayon joins.
pub fn parse_report_bundle(
    viral_path: &Path,
    species_path: &Path,
    pathogen_path: &Path,
    amr_path: &Path,
) -> ReportBundle {
    let ((viral, species), (pathogens, amr)) = rayon::join(
        || {
            rayon::join(
                || viral_summary::parse_viral_summary(viral_path),
                || species_annotation::parse_species_annotation(species_path),
            )
        },
        || {
            rayon::join(
                || pathogen_map::parse_pathogen_map(pathogen_path),
                || amr_annotation::parse_amr_annotation(amr_path),
            )
        },
    );

    log::info!(
        "parsed {} families, {} annotations, {} pathogen species, {} AMR classes",
        viral.records.len(),
        species.records.len(),
        pathogens.records.len(),
        amr.first_bin().len()
    );

    ReportBundle {
        viral,
        species,
        pathogens,
        amr,
    }
}
