//! File I/O utilities for reading game records, stdin lines, and ensuring directories.
//!
//! This module provides helper functions for file operations used across CLI commands:
//! - Reading from stdin (interactive move choices)
//! - Reading text files with BOM stripping
//! - Collecting `.jsonl` files from a file or directory argument
//! - Ensuring parent directories exist before file writes
//!
//! ## Error Handling
//!
//! Functions return `Result` types with appropriate error messages. I/O errors
//! are converted to `String` for easy integration with command error handling.

use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Reads a line of input from a buffered reader, blocking until available.
///
/// # Returns
///
/// * `Some(String)` - Trimmed input line (may be empty after trimming)
/// * `None` - EOF or read error occurred
///
/// # Example
///
/// ```rust,no_run
/// use std::io::{self, BufRead};
/// # use ludo_cli::io_utils::read_stdin_line;
///
/// let stdin = io::stdin();
/// let mut handle = stdin.lock();
/// if let Some(line) = read_stdin_line(&mut handle) {
///     println!("You entered: {}", line);
/// }
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Read a text file, stripping a leading UTF-8 BOM.
pub fn read_text(path: &Path) -> Result<String, String> {
    let mut content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// Resolve a `--input` argument to the record files it names.
///
/// A file is returned as is. A directory is walked recursively and every
/// `.jsonl` file below it is returned in sorted order.
pub fn collect_jsonl_files(input: &Path) -> Result<Vec<PathBuf>, String> {
    if !input.is_dir() {
        if input.exists() {
            return Ok(vec![input.to_path_buf()]);
        }
        return Err(format!("{} does not exist", input.display()));
    }

    let mut files = Vec::new();
    let mut stack = vec![input.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(v) => v,
            Err(_) => continue,
        };
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "jsonl") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Ensure parent directory exists for given path, creating if needed.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// # use ludo_cli::io_utils::ensure_parent_dir;
///
/// let path = Path::new("output/data/games.jsonl");
/// ensure_parent_dir(path).unwrap();
/// // Now "output/data/" directory exists
/// ```
pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Strip UTF-8 BOM (Byte Order Mark) from the beginning of a string if present.
fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}
