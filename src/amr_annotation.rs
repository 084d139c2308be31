// src/amr_annotation.rs

use std::path::Path;

use crate::types::{AmrAnnotation, AmrBin, Parsed, ParseWarning, ResistanceMechanism};

/// A parsed AMR report: every bin in first-seen order. The historical
/// single-bin reading of the report lives in `first_bin`/`into_first_bin`
/// rather than in the parser.
#[derive(Debug, Clone, Default)]
pub struct AmrParse {
    pub bins: Vec<AmrBin>,
    pub warnings: Vec<ParseWarning>,
}

impl AmrParse {
    /// Antibiotic classes of the first bin in the report, or an empty
    /// slice when no bin was found.
    pub fn first_bin(&self) -> &[AmrAnnotation] {
        self.bins
            .first()
            .map(|bin| bin.classes.as_slice())
            .unwrap_or(&[])
    }

    /// Narrows the parse to the first bin's classes, keeping the warnings.
    pub fn into_first_bin(mut self) -> Parsed<AmrAnnotation> {
        let records = if self.bins.is_empty() {
            Vec::new()
        } else {
            std::mem::take(&mut self.bins[0].classes)
        };
        Parsed {
            records,
            warnings: self.warnings,
        }
    }
}

/// Parses an AMR summary report in the format:
/// ```text
/// [INFO] resistance scan complete
/// ### Bin: bin1
/// Beta-lactams (20)
/// - efflux pump (12)
/// - beta-lactamase (8)
/// ### Bin: bin2
/// ...
/// ```
/// Class and mechanism lines both end in a parenthesized count; lines that
/// do not fit that shape are skipped without diagnostic, as are mechanism
/// lines with no class to attach to and any line before the first bin
/// marker.
pub fn parse_amr_annotation_text(text: &str) -> AmrParse {
    let mut parse = AmrParse::default();
    let mut current_bin: Option<usize> = None;
    let mut have_class = false;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("[INFO]") {
            continue;
        }

        if let Some(name) = line.strip_prefix("### Bin:") {
            let name = name.trim();
            // A repeated bin name resets that bin in place.
            let idx = match parse.bins.iter().position(|bin| bin.name == name) {
                Some(idx) => {
                    parse.bins[idx].classes.clear();
                    idx
                }
                None => {
                    parse.bins.push(AmrBin {
                        name: name.to_string(),
                        classes: Vec::new(),
                    });
                    parse.bins.len() - 1
                }
            };
            current_bin = Some(idx);
            have_class = false;
            continue;
        }

        let bin_idx = match current_bin {
            Some(idx) => idx,
            // Lines before any bin marker are ignored.
            None => continue,
        };

        if let Some(mechanism_text) = line.strip_prefix("- ") {
            if !have_class {
                continue;
            }
            if let Some((name, count)) = split_name_count(mechanism_text) {
                if let Some(class) = parse.bins[bin_idx].classes.last_mut() {
                    class.mechanisms.push(ResistanceMechanism { name, count });
                }
            }
            continue;
        }

        // Anything else inside a bin is an antibiotic class line.
        if let Some((name, count)) = split_name_count(line) {
            parse.bins[bin_idx].classes.push(AmrAnnotation {
                name,
                count,
                mechanisms: Vec::new(),
            });
            have_class = true;
        }
    }
    parse
}

/// Splits `<name> (<count>)` on the last open paren. Returns None when the
/// trailing parenthesized integer is missing or malformed.
fn split_name_count(text: &str) -> Option<(String, u32)> {
    let (name, count_part) = text.rsplit_once('(')?;
    let count = count_part
        .trim()
        .trim_end_matches(')')
        .trim()
        .parse()
        .ok()?;
    Some((name.trim().to_string(), count))
}

/// Reads and parses an AMR report file. A file that cannot be read yields
/// an empty result carrying a file-level warning.
pub fn parse_amr_annotation<P: AsRef<Path>>(path: P) -> AmrParse {
    let path = path.as_ref();
    match crate::read_report_text(path) {
        Ok(text) => parse_amr_annotation_text(&text),
        Err(err) => {
            log::error!("could not read AMR report {}: {err}", path.display());
            AmrParse {
                bins: Vec::new(),
                warnings: vec![ParseWarning::file_error(path, &err)],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_with_mechanism() {
        let text = "### Bin: bin1\nBeta-lactams (20)\n- efflux pump (12)\n";
        let parse = parse_amr_annotation_text(text);

        assert_eq!(parse.bins.len(), 1);
        let classes = parse.first_bin();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Beta-lactams");
        assert_eq!(classes[0].count, 20);
        assert_eq!(classes[0].mechanisms.len(), 1);
        assert_eq!(classes[0].mechanisms[0].name, "efflux pump");
        assert_eq!(classes[0].mechanisms[0].count, 12);
    }

    #[test]
    fn later_bins_are_kept_but_excluded_from_the_first_bin_view() {
        let text = "\
### Bin: bin1
Beta-lactams (20)
- efflux pump (12)
### Bin: bin2
Aminoglycosides (7)
- phosphotransferase (7)
";
        let parse = parse_amr_annotation_text(text);

        assert_eq!(parse.bins.len(), 2);
        assert_eq!(parse.bins[1].name, "bin2");
        assert_eq!(parse.bins[1].classes[0].name, "Aminoglycosides");

        let first = parse.clone().into_first_bin();
        assert_eq!(first.records.len(), 1);
        assert_eq!(first.records[0].name, "Beta-lactams");
    }

    #[test]
    fn mechanism_with_no_current_class_is_dropped() {
        let text = "### Bin: bin1\n- efflux pump (12)\nBeta-lactams (20)\n";
        let parse = parse_amr_annotation_text(text);

        let classes = parse.first_bin();
        assert_eq!(classes.len(), 1);
        assert!(classes[0].mechanisms.is_empty());
    }

    #[test]
    fn mechanism_attaches_to_most_recent_class() {
        let text = "\
### Bin: bin1
Beta-lactams (20)
Aminoglycosides (7)
- phosphotransferase (7)
";
        let parse = parse_amr_annotation_text(text);

        let classes = parse.first_bin();
        assert_eq!(classes.len(), 2);
        assert!(classes[0].mechanisms.is_empty());
        assert_eq!(classes[1].mechanisms.len(), 1);
    }

    #[test]
    fn info_and_shapeless_lines_are_skipped_without_diagnostic() {
        let text = "\
[INFO] resistance scan complete
### Bin: bin1
Beta-lactams (20)
no trailing count here
- efflux pump (twelve)
";
        let parse = parse_amr_annotation_text(text);

        assert_eq!(parse.first_bin().len(), 1);
        assert!(parse.first_bin()[0].mechanisms.is_empty());
        assert!(parse.warnings.is_empty());
    }

    #[test]
    fn lines_before_any_bin_are_ignored() {
        let text = "Beta-lactams (20)\n### Bin: bin1\nMacrolides (3)\n";
        let parse = parse_amr_annotation_text(text);

        let classes = parse.first_bin();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Macrolides");
    }

    #[test]
    fn repeated_bin_name_resets_that_bin_in_place() {
        let text = "\
### Bin: bin1
Beta-lactams (20)
### Bin: bin2
Macrolides (3)
### Bin: bin1
Aminoglycosides (7)
";
        let parse = parse_amr_annotation_text(text);

        assert_eq!(parse.bins.len(), 2);
        assert_eq!(parse.bins[0].name, "bin1");
        assert_eq!(parse.bins[0].classes.len(), 1);
        assert_eq!(parse.bins[0].classes[0].name, "Aminoglycosides");
    }

    #[test]
    fn empty_input_yields_no_bins() {
        let parse = parse_amr_annotation_text("");
        assert!(parse.bins.is_empty());
        assert!(parse.first_bin().is_empty());
    }

    #[test]
    fn name_count_split_uses_the_last_open_paren() {
        assert_eq!(
            split_name_count("tet(M) ribosomal protection (4)"),
            Some(("tet(M) ribosomal protection".to_string(), 4))
        );
        assert_eq!(split_name_count("no count at all"), None);
        assert_eq!(split_name_count("trailing junk (4) extra"), None);
    }
}
