// src/pathogen_map.rs

use std::path::Path;

use regex::Regex;

use crate::types::{Parsed, PathogenSpecies, Strain};

/// The structural role a pathogen map line plays.
#[derive(Debug, Clone, PartialEq)]
pub enum PathogenLine {
    /// `Species: <name> Total_Reads: <int>`
    Species { name: String, total_reads: u32 },
    /// `Strain: <name> Reads: <int>`, leading whitespace allowed
    Strain { name: String, reads: u32 },
    /// Anything else; reported as a warning
    Other,
}

/// Line classifier for the pathogen read-map grammar.
pub struct PathogenLineClassifier {
    species: Regex,
    strain: Regex,
}

impl PathogenLineClassifier {
    pub fn new() -> Self {
        PathogenLineClassifier {
            species: Regex::new(r"^Species:\s+(.+)\s+Total_Reads:\s+(\d+)")
                .expect("hardcoded pattern"),
            strain: Regex::new(r"^\s*Strain:\s+(.*?)\s+Reads:\s+(\d+)")
                .expect("hardcoded pattern"),
        }
    }

    pub fn classify(&self, line: &str) -> PathogenLine {
        if let Some(caps) = self.species.captures(line) {
            return PathogenLine::Species {
                name: caps[1].trim().to_string(),
                total_reads: caps[2].parse().unwrap_or(0),
            };
        }
        if let Some(caps) = self.strain.captures(line) {
            return PathogenLine::Strain {
                name: caps[1].trim().to_string(),
                reads: caps[2].parse().unwrap_or(0),
            };
        }
        PathogenLine::Other
    }
}

impl Default for PathogenLineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses the pathogen read map into species records in file order, each
/// holding its strain lines. Strains before any species are dropped;
/// unrecognized lines are kept as warnings and the scan continues.
pub fn parse_pathogen_map_text(text: &str) -> Parsed<PathogenSpecies> {
    let classifier = PathogenLineClassifier::new();
    let mut parsed = Parsed::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        match classifier.classify(line) {
            PathogenLine::Species { name, total_reads } => {
                parsed.records.push(PathogenSpecies {
                    name,
                    total_reads,
                    strains: Vec::new(),
                });
            }
            PathogenLine::Strain { name, reads } => {
                // No preceding species means nothing to attach to.
                if let Some(species) = parsed.records.last_mut() {
                    species.strains.push(Strain { name, reads });
                }
            }
            PathogenLine::Other => {
                parsed.warn(idx + 1, raw_line, "unrecognized pathogen map line");
            }
        }
    }
    parsed
}

/// Reads and parses a pathogen map file. A file that cannot be read yields
/// an empty result carrying a file-level warning.
pub fn parse_pathogen_map<P: AsRef<Path>>(path: P) -> Parsed<PathogenSpecies> {
    let path = path.as_ref();
    match crate::read_report_text(path) {
        Ok(text) => parse_pathogen_map_text(&text),
        Err(err) => {
            log::error!("could not read pathogen map {}: {err}", path.display());
            Parsed::from_file_error(path, &err)
        }
    }
}
