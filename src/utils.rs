/*!
 * Utility functions for rbxplugin
 */

use std::path::Path;

use walkdir::WalkDir;

/// Count files below `dir` for progress tracking
///
/// Unreadable entries are not counted; the walk itself decides whether
/// they are fatal.
pub fn count_files(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() || entry.file_type().is_symlink())
        .count() as u64
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
