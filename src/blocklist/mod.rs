//! Blocklist loading and membership checks
//!
//! The blocklist is a plain-text file with one IP address literal per
//! non-empty line. It is loaded once at startup and never mutated during a
//! run, so readers need no synchronization.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

/// Fallback entries used when the blocklist file is absent.
const DEFAULT_ENTRIES: [&str; 2] = ["192.168.1.100", "10.0.0.50"];

/// A read-only set of IP addresses treated as known-malicious for the
/// duration of a run.
#[derive(Debug, Clone)]
pub struct Blocklist {
    entries: HashSet<String>,
}

impl Blocklist {
    /// Load the blocklist from a file, falling back to the built-in default
    /// set when the file is absent.
    ///
    /// A missing file is an input error recovered locally: it is logged and
    /// never fatal. Read errors other than absence are also downgraded to
    /// the fallback, since a monitor with a default blocklist is more useful
    /// than no monitor.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let entries: HashSet<String> = content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();
                info!(
                    path = %path.display(),
                    entries = entries.len(),
                    "Loaded blocklist"
                );
                Self { entries }
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Blocklist file not readable, using default blocklist"
                );
                Self::default()
            }
        }
    }

    /// Build a blocklist from explicit entries
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the given address is blocklisted
    pub fn contains(&self, ip: &str) -> bool {
        self.entries.contains(ip)
    }

    /// Number of blocklisted addresses
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the blocklist holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Test 1: Load from a file with entries, blank lines, and whitespace
    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "10.0.0.50").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  203.0.113.7  ").unwrap();
        writeln!(file, "198.51.100.23").unwrap();

        let blocklist = Blocklist::load(file.path());

        assert_eq!(blocklist.len(), 3);
        assert!(blocklist.contains("10.0.0.50"));
        assert!(blocklist.contains("203.0.113.7"));
        assert!(blocklist.contains("198.51.100.23"));
        assert!(!blocklist.contains("8.8.8.8"));
    }

    // Test 2: Missing file falls back to the 2-entry default set
    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let blocklist = Blocklist::load("/definitely/not/a/real/blocklist.txt");

        assert_eq!(blocklist.len(), 2);
        assert!(blocklist.contains("192.168.1.100"));
        assert!(blocklist.contains("10.0.0.50"));
    }

    // Test 3: Duplicate lines collapse into one entry
    #[test]
    fn test_duplicates_collapse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "10.0.0.50").unwrap();
        writeln!(file, "10.0.0.50").unwrap();

        let blocklist = Blocklist::load(file.path());
        assert_eq!(blocklist.len(), 1);
    }

    // Test 4: Empty file yields an empty blocklist, not the fallback
    #[test]
    fn test_empty_file_is_empty_blocklist() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let blocklist = Blocklist::load(file.path());
        assert!(blocklist.is_empty());
    }

    // Test 5: from_entries builds the expected set
    #[test]
    fn test_from_entries() {
        let blocklist = Blocklist::from_entries(["10.0.0.50"]);
        assert_eq!(blocklist.len(), 1);
        assert!(blocklist.contains("10.0.0.50"));
    }
}
