use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Note that a year's report PDF was not found and is being skipped.
pub fn print_year_missing(
    w: &mut dyn Write,
    year: i32,
    path: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!("{}: no report at {}, skipping", year, path.display());
    if color.enabled() {
        writeln!(w, "{}", msg.yellow())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// Report how many aim sections a year's PDF yielded.
pub fn print_year_extracted(
    w: &mut dyn Write,
    year: i32,
    found: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}: {} of 5 aims found", year.bold(), found)
    } else {
        writeln!(w, "{}: {} of 5 aims found", year, found)
    }
}
