use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;

use pathoreport_rs::parse_report_bundle;

fn main() {
    env_logger::init();

    // Report paths come from argv, falling back to the conventional names.
    let mut args = std::env::args().skip(1);
    let viral_path = PathBuf::from(args.next().unwrap_or_else(|| "viral_summary.txt".to_string()));
    let species_path =
        PathBuf::from(args.next().unwrap_or_else(|| "species_annotation.txt".to_string()));
    let pathogen_path = PathBuf::from(args.next().unwrap_or_else(|| "pathogen_map.txt".to_string()));
    let amr_path = PathBuf::from(args.next().unwrap_or_else(|| "amr_annotation.txt".to_string()));

    // 1. Spinner for parsing the four report files
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message("Parsing report files...");

    let bundle = parse_report_bundle(&viral_path, &species_path, &pathogen_path, &amr_path);

    spinner.finish_with_message(format!(
        "Parsed 4 report files with {} warning(s).",
        bundle.warning_count()
    ));

    bundle
        .ensure_non_empty()
        .expect("Report validation failed");

    // 2. Spinner for writing outputs
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template("{spinner:.yellow} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message("Writing output files...");

    fs::write("parse_summary.txt", bundle.get_summary())
        .expect("Could not write parse_summary.txt");

    fs::write("parse_warnings.txt", bundle.get_warning_report())
        .expect("Could not write parse_warnings.txt");

    spinner.finish_with_message("Output files created.");
}
