// src/viral_summary.rs

use std::path::Path;

use regex::Regex;

use crate::types::{Family, Genus, Parsed};

/// The structural role a viral summary line plays.
#[derive(Debug, Clone, PartialEq)]
pub enum ViralLine {
    /// `<count> <name> [Family] — <confidence> confidence`, column zero
    Family {
        name: String,
        confidence: String,
        count: u32,
    },
    /// Indented `<count> <name> [Genus]`
    Genus { name: String, count: u32 },
    /// Anything else; ignored without diagnostic
    Other,
}

/// Line classifier for the structured viral summary grammar.
pub struct ViralLineClassifier {
    family: Regex,
    genus: Regex,
}

impl ViralLineClassifier {
    pub fn new() -> Self {
        ViralLineClassifier {
            family: Regex::new(r"^(\d+) (\w+) \[Family\] — (\w+) confidence")
                .expect("hardcoded pattern"),
            genus: Regex::new(r"^\s+(\d+) (\w+) \[Genus\]").expect("hardcoded pattern"),
        }
    }

    /// Classifies one raw line. Lines are not trimmed first: family lines
    /// start at column zero, genus lines must be indented.
    pub fn classify(&self, line: &str) -> ViralLine {
        if let Some(caps) = self.family.captures(line) {
            return ViralLine::Family {
                count: caps[1].parse().unwrap_or(0),
                name: caps[2].to_string(),
                confidence: caps[3].to_string(),
            };
        }
        if let Some(caps) = self.genus.captures(line) {
            return ViralLine::Genus {
                count: caps[1].parse().unwrap_or(0),
                name: caps[2].to_string(),
            };
        }
        ViralLine::Other
    }
}

impl Default for ViralLineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses the full text of a structured viral summary into family records
/// in first-seen order. Genus lines with no preceding family are dropped,
/// and lines matching neither shape are skipped without diagnostic.
pub fn parse_viral_summary_text(text: &str) -> Parsed<Family> {
    let classifier = ViralLineClassifier::new();
    let mut parsed = Parsed::default();

    for line in text.lines() {
        match classifier.classify(line) {
            ViralLine::Family {
                name,
                confidence,
                count,
            } => {
                parsed.records.push(Family {
                    name,
                    confidence,
                    count,
                    genera: Vec::new(),
                });
            }
            ViralLine::Genus { name, count } => {
                // The current family is the last one started.
                if let Some(family) = parsed.records.last_mut() {
                    family.genera.push(Genus { name, count });
                }
            }
            ViralLine::Other => {}
        }
    }
    parsed
}

/// Reads and parses a viral summary report file. A file that cannot be
/// read yields an empty result carrying a file-level warning.
pub fn parse_viral_summary<P: AsRef<Path>>(path: P) -> Parsed<Family> {
    let path = path.as_ref();
    match crate::read_report_text(path) {
        Ok(text) => parse_viral_summary_text(&text),
        Err(err) => {
            log::error!("could not read viral summary {}: {err}", path.display());
            Parsed::from_file_error(path, &err)
        }
    }
}
