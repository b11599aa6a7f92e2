//! File naming and discovery helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Human-readable file size ("512B", "3.4KB", "1.2MB")
///
/// # Examples
/// ```
/// use manet_analyzer::utils::files::format_file_size;
///
/// assert_eq!(format_file_size(512), "512B");
/// assert_eq!(format_file_size(2048), "2.0KB");
/// assert_eq!(format_file_size(3 * 1024 * 1024), "3.0MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{}B", bytes)
    } else if bytes < MB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    }
}

/// Size of a file on disk, "N/A" if it cannot be read
pub fn file_size_label(path: &Path) -> String {
    fs::metadata(path)
        .map(|meta| format_file_size(meta.len()))
        .unwrap_or_else(|_| "N/A".to_string())
}

/// File-name-safe form of a label or metric name.
///
/// Alphanumerics, `-` and `.` are kept, everything else collapses to `_`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug.to_string()
    }
}

/// Whether `path` has one of `extensions` (case-insensitive, without dot)
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Regular files directly inside `dir` with a matching extension, sorted by name
pub fn list_files_with_extensions(dir: &Path, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("run A (blackhole)"), "run_A_blackhole");
        assert_eq!(slugify("end_to_end_delay"), "end_to_end_delay");
        assert_eq!(slugify("  ???  "), "unnamed");
        assert_eq!(slugify("v1.2-final"), "v1.2-final");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0B");
        assert_eq!(format_file_size(1536), "1.5KB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 512 * 1024), "5.5MB");
    }

    #[test]
    fn test_list_files_with_extensions() {
        let dir = TempDir::new().unwrap();
        for name in ["b.json", "a.JSON", "c.yaml", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let exts = vec!["json".to_string(), "yaml".to_string()];
        let files = list_files_with_extensions(dir.path(), &exts).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JSON", "b.json", "c.yaml"]);
    }
}
