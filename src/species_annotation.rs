// src/species_annotation.rs

use std::path::Path;

use regex::Regex;

use crate::taxonomy::{self, TaxRank};
use crate::types::{Parsed, SpeciesAnnotation};

/// Parses the species annotation log. Blocks look like:
/// ```text
/// NODE_12:
///   Taxonomy: "d__Bacteria;p__Proteobacteria;c__Gammaproteobacteria;o__;f__;g__;s__"
///   Similarity threshold: 95.0
///   Similarity: 98.7
///   Proportion threshold: 0.5
///   Proportion of genome aligned: 0.82
///   Warnings: low coverage
///   Impression: probable pathogen
///   Confidence level of call: High
/// ```
/// A block starts at a line that is just an identifier plus a colon and
/// runs until the next such line or end of input. A non-numeric value in a
/// numeric field skips that one block; missing fields keep their defaults.
pub fn parse_species_annotation_text(text: &str) -> Parsed<SpeciesAnnotation> {
    let confidence = Regex::new(r"(?i)confidence level[^:]*:\s*(\w+)").expect("hardcoded pattern");

    let mut parsed = Parsed::default();
    let mut current: Option<SpeciesAnnotation> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        // An identifier followed by a bare colon opens a new block.
        if line.ends_with(':') {
            if let Some(ann) = current.take() {
                parsed.records.push(finish(ann));
            }
            current = Some(SpeciesAnnotation {
                id: line.trim_end_matches(':').to_string(),
                ..SpeciesAnnotation::default()
            });
            continue;
        }

        let ann = match current.as_mut() {
            Some(ann) => ann,
            // Key/value lines outside a block are ignored.
            None => continue,
        };
        let (raw_key, raw_value) = match line.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };
        let key = raw_key.trim().to_lowercase().replace(' ', "_");
        let value = raw_value.trim();

        let mut bad_numeric = false;
        match key.as_str() {
            "taxonomy" => ann.taxonomy = value.to_string(),
            "warnings" => ann.warnings = value.to_string(),
            "impression" => ann.impression = value.to_string(),
            "similarity_threshold" | "similarity" | "proportion_threshold"
            | "proportion_of_genome_aligned" => match value.parse::<f64>() {
                Ok(number) => match key.as_str() {
                    "similarity_threshold" => ann.similarity_threshold = number,
                    "similarity" => ann.similarity = number,
                    "proportion_threshold" => ann.proportion_threshold = number,
                    _ => ann.proportion_genome_aligned = number,
                },
                Err(_) => bad_numeric = true,
            },
            _ => {
                // Free-form lines can still carry the confidence verdict.
                if let Some(caps) = confidence.captures(line) {
                    ann.confidence_level = caps[1].to_lowercase();
                }
            }
        }

        if bad_numeric {
            // A bad numeric field skips this one block; the scan goes on.
            parsed.warn(idx + 1, raw_line, &format!("non-numeric value for {key}"));
            current = None;
        }
    }

    if let Some(ann) = current.take() {
        parsed.records.push(finish(ann));
    }
    parsed
}

/// Fills the derived rank fields of a finished block from its taxonomy
/// string.
fn finish(mut ann: SpeciesAnnotation) -> SpeciesAnnotation {
    for (rank, name) in taxonomy::decompose(&ann.taxonomy) {
        match rank {
            TaxRank::Kingdom => ann.kingdom = name,
            TaxRank::Phylum => ann.phylum = name,
            TaxRank::Class => ann.class_name = name,
            TaxRank::Order => ann.order = name,
            TaxRank::Family => ann.family = name,
            TaxRank::Genus => ann.genus = name,
            TaxRank::Species => ann.species = name,
        }
    }
    ann
}

/// Reads and parses a species annotation file. A file that cannot be read
/// yields an empty result carrying a file-level warning.
pub fn parse_species_annotation<P: AsRef<Path>>(path: P) -> Parsed<SpeciesAnnotation> {
    let path = path.as_ref();
    match crate::read_report_text(path) {
        Ok(text) => parse_species_annotation_text(&text),
        Err(err) => {
            log::error!("could not read species annotation {}: {err}", path.display());
            Parsed::from_file_error(path, &err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BLOCK: &str = "\
NODE_12:
  Taxonomy: \"d__Bacteria;p__Proteobacteria;c__Gammaproteobacteria;o__Enterobacterales;f__Enterobacteriaceae;g__Escherichia;s__Escherichia coli\"
  Similarity threshold: 95.0
  Similarity: 98.7
  Proportion threshold: 0.5
  Proportion of genome aligned: 0.82
  Warnings: low coverage
  Impression: probable pathogen
  Confidence level of call: High
";

    #[test]
    fn parses_a_full_block() {
        let parsed = parse_species_annotation_text(FULL_BLOCK);

        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.records.len(), 1);
        let ann = &parsed.records[0];
        assert_eq!(ann.id, "NODE_12");
        assert_eq!(ann.similarity_threshold, 95.0);
        assert_eq!(ann.similarity, 98.7);
        assert_eq!(ann.proportion_threshold, 0.5);
        assert_eq!(ann.proportion_genome_aligned, 0.82);
        assert_eq!(ann.warnings, "low coverage");
        assert_eq!(ann.impression, "probable pathogen");
        // The trailing confidence word is lowercased
        assert_eq!(ann.confidence_level, "high");
    }

    #[test]
    fn derives_rank_fields_from_the_taxonomy_string() {
        let parsed = parse_species_annotation_text(FULL_BLOCK);
        let ann = &parsed.records[0];

        assert_eq!(ann.kingdom, "Bacteria");
        assert_eq!(ann.phylum, "Proteobacteria");
        assert_eq!(ann.class_name, "Gammaproteobacteria");
        assert_eq!(ann.order, "Enterobacterales");
        assert_eq!(ann.family, "Enterobacteriaceae");
        assert_eq!(ann.genus, "Escherichia");
        assert_eq!(ann.species, "Escherichia coli");
        assert_eq!(ann.lowest_taxonomy(), ("Species", "Escherichia coli"));
    }

    #[test]
    fn blocks_come_out_in_file_order() {
        let text = "\
NODE_2:
  Similarity: 91.0
NODE_1:
  Similarity: 99.9
";
        let parsed = parse_species_annotation_text(text);
        let ids: Vec<&str> = parsed.records.iter().map(|ann| ann.id.as_str()).collect();
        assert_eq!(ids, ["NODE_2", "NODE_1"]);
    }

    #[test]
    fn bad_numeric_field_skips_only_that_block() {
        let text = "\
NODE_1:
  Similarity: not-a-number
  Impression: should be discarded
NODE_2:
  Similarity: 98.5
";
        let parsed = parse_species_annotation_text(text);

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].id, "NODE_2");
        assert_eq!(parsed.records[0].similarity, 98.5);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line_no, 2);
        assert!(parsed.warnings[0].reason.contains("similarity"));
    }

    #[test]
    fn missing_fields_keep_their_defaults() {
        let text = "NODE_1:\n  Impression: inconclusive\n";
        let parsed = parse_species_annotation_text(text);

        let ann = &parsed.records[0];
        assert_eq!(ann.taxonomy, "");
        assert_eq!(ann.similarity, 0.0);
        assert_eq!(ann.confidence_level, "");
        assert_eq!(ann.lowest_taxonomy(), ("Unknown", "inconclusive"));
    }

    #[test]
    fn key_value_lines_before_any_id_are_ignored() {
        let text = "Similarity: 98.5\nNODE_1:\n  Similarity: 91.0\n";
        let parsed = parse_species_annotation_text(text);

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].similarity, 91.0);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn empty_input_yields_no_records() {
        let parsed = parse_species_annotation_text("");
        assert!(parsed.records.is_empty());
        assert!(parsed.warnings.is_empty());
    }
}
