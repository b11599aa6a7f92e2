//! Shared utilities: file naming, discovery and size formatting.

pub mod files;

pub use files::{file_size_label, format_file_size, list_files_with_extensions, slugify};
