//! Common test utilities for ktlens integration tests

use std::path::Path;

use ktlens::{AnalyzedFile, OffsetRange};

/// Parse and bind a Kotlin snippet as if it were `Test.kt`
pub fn analyze(source: &str) -> AnalyzedFile {
    AnalyzedFile::parse(Path::new("Test.kt"), source.to_string()).unwrap()
}

/// Byte range of the nth occurrence of `needle` (0-based)
pub fn range_of(source: &str, needle: &str, occurrence: usize) -> OffsetRange {
    let mut found = source.find(needle).unwrap();
    for _ in 0..occurrence {
        let from = found + needle.len();
        found = from + source[from..].find(needle).unwrap();
    }
    OffsetRange::new(found, found + needle.len())
}
