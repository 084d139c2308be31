//src/types.rs

use std::io;
use std::path::Path;

/// A structured representation of one family entry in the viral summary.
/// For example:
///  12 Coronaviridae [Family] — High confidence
#[derive(Debug, Clone)]
pub struct Family {
    pub name: String,
    /// Confidence word as written in the report (High / Moderate / Low)
    pub confidence: String,
    /// Reads attributed to this family
    pub count: u32,
    /// Genera in first-seen order
    pub genera: Vec<Genus>,
}

/// One genus line under a family.
#[derive(Debug, Clone)]
pub struct Genus {
    pub name: String,
    pub count: u32,
}

/// One annotated identification block from the species annotation log.
///
/// The rank fields (kingdom..species) are derived from `taxonomy` when the
/// block is finalized; see `taxonomy::decompose`.
#[derive(Debug, Clone, Default)]
pub struct SpeciesAnnotation {
    pub id: String,
    pub taxonomy: String,
    pub similarity_threshold: f64,
    pub similarity: f64,
    pub proportion_threshold: f64,
    pub proportion_genome_aligned: f64,
    pub warnings: String,
    pub impression: String,
    pub confidence_level: String,

    pub kingdom: String,
    pub phylum: String,
    pub class_name: String,
    pub order: String,
    pub family: String,
    pub genus: String,
    pub species: String,
}

impl SpeciesAnnotation {
    /// Returns the most specific non-empty rank as a (level, name) pair,
    /// scanning species up to kingdom. Falls back to the impression text,
    /// then to "Unknown".
    pub fn lowest_taxonomy(&self) -> (&'static str, &str) {
        let ladder = [
            ("Species", &self.species),
            ("Genus", &self.genus),
            ("Family", &self.family),
            ("Order", &self.order),
            ("Class", &self.class_name),
            ("Phylum", &self.phylum),
            ("Kingdom", &self.kingdom),
        ];
        for (level, name) in ladder {
            if !name.is_empty() {
                return (level, name);
            }
        }
        if self.impression.is_empty() {
            ("Unknown", "Unknown")
        } else {
            ("Unknown", &self.impression)
        }
    }
}

/// One species from the pathogen read map.
#[derive(Debug, Clone)]
pub struct PathogenSpecies {
    pub name: String,
    /// Not validated against the sum of strain reads
    pub total_reads: u32,
    /// Strains in first-seen order
    pub strains: Vec<Strain>,
}

/// One strain line under a pathogen species.
#[derive(Debug, Clone)]
pub struct Strain {
    pub name: String,
    pub reads: u32,
}

/// A named bin from the AMR report, holding its antibiotic classes in
/// first-seen order.
#[derive(Debug, Clone)]
pub struct AmrBin {
    pub name: String,
    pub classes: Vec<AmrAnnotation>,
}

/// One antibiotic class line, e.g. `Beta-lactams (20)`.
#[derive(Debug, Clone)]
pub struct AmrAnnotation {
    pub name: String,
    pub count: u32,
    /// Mechanisms in first-seen order
    pub mechanisms: Vec<ResistanceMechanism>,
}

/// One resistance mechanism line, e.g. `- efflux pump (12)`.
#[derive(Debug, Clone)]
pub struct ResistanceMechanism {
    pub name: String,
    pub count: u32,
}

/// A line (or file) a parser could not use, kept for the caller to surface,
/// log, or ignore.
#[derive(Debug, Clone)]
pub struct ParseWarning {
    /// 1-based line number; 0 for file-level failures
    pub line_no: usize,
    /// The raw line as it appeared in the report
    pub line: String,
    pub reason: String,
}

impl ParseWarning {
    /// Pseudo-warning for a report file that could not be read at all.
    pub(crate) fn file_error(path: &Path, err: &io::Error) -> ParseWarning {
        ParseWarning {
            line_no: 0,
            line: path.display().to_string(),
            reason: format!("file read failed: {err}"),
        }
    }
}

/// The result of one parser invocation: the records that matched plus
/// structured warnings for everything that did not.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    /// Top-level records in first-seen order
    pub records: Vec<T>,
    pub warnings: Vec<ParseWarning>,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Parsed {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> Parsed<T> {
    pub(crate) fn warn(&mut self, line_no: usize, line: &str, reason: &str) {
        self.warnings.push(ParseWarning {
            line_no,
            line: line.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Empty result carrying a single file-level warning. Used at the
    /// parser boundary when the report file cannot be read.
    pub(crate) fn from_file_error(path: &Path, err: &io::Error) -> Self {
        let mut parsed = Parsed::default();
        parsed.warnings.push(ParseWarning::file_error(path, err));
        parsed
    }
}
