//! Common display utilities for CLI commands.

use std::path::{Path, PathBuf};

use colored::Colorize;

/// Maximum number of paths printed in a list.
const MAX_DISPLAY_ITEMS: usize = 10;

/// Print `files` as a bulleted list, relative to `root` where possible.
///
/// Shows up to `MAX_DISPLAY_ITEMS` entries followed by "... and N more".
pub fn print_files(files: &[PathBuf], root: &Path, empty_message: &str) {
    if files.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for file in files.iter().take(MAX_DISPLAY_ITEMS) {
        let display = file.strip_prefix(root).unwrap_or(file);
        println!("    {} {}", "•".dimmed(), display.display());
    }

    if let Some(hidden) = hidden_count(files.len()) {
        println!("    {} ... and {hidden} more", "•".dimmed());
    }
}

/// How many of `len` entries a bounded list leaves out, if any.
fn hidden_count(len: usize) -> Option<usize> {
    len.checked_sub(MAX_DISPLAY_ITEMS).filter(|&n| n > 0)
}

#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
