//! Known names to index
//!
//! The indexing command uses [`DEFAULT_NAMES`] unless it is handed a names
//! file: plain text, one name per line, blank lines and `#` comments ignored.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::Result;

/// Built-in list of known names.
pub const DEFAULT_NAMES: &[&str] = &[
    "John Smith",
    "Jon Smyth",
    "Jane Doe",
    "Janet Dough",
    "Michael Johnson",
    "Micheal Jonson",
    "Mohammed Ali",
    "Muhammad Aly",
    "Catherine Zeta",
    "Katherine Zeta",
    "Christopher Lee",
    "Kristofer Leigh",
    "Elizabeth Taylor",
    "Elisabeth Tailor",
    "Alexander Petrov",
    "Aleksandr Petrof",
    "Sean O'Connor",
    "Shawn O'Conner",
    "Isabella Rossi",
    "Isabela Rosi",
    "Li Wei",
    "Lee Way",
    "Priya Sharma",
    "Priyah Sharmah",
    "Anna Schmidt",
    "Ana Schmitt",
    "Jose Garcia",
    "José García",
    "Alice",
    "Alicia",
    "Bob",
    "Robert",
];

/// Parse a names listing: one name per line, trimmed, skipping blank lines
/// and `#` comments.
pub fn parse_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read a names file from disk.
pub fn load_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let names = parse_names(&fs::read_to_string(path)?);
    debug!(path = %path.display(), count = names.len(), "loaded names file");
    Ok(names)
}

/// The built-in names as owned strings.
pub fn default_names() -> Vec<String> {
    DEFAULT_NAMES.iter().map(|name| (*name).to_string()).collect()
}
