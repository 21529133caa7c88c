//! Language detection and tree-sitter grammar loading

use std::path::Path;
use tree_sitter::Language;

use crate::error::{KtLensError, Result};

/// Supported source flavors
///
/// Both flavors parse with the same Kotlin grammar; the distinction only
/// matters for display and file discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Kotlin,
    KotlinScript,
}

impl Lang {
    /// Detect language from file path extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| KtLensError::UnsupportedLanguage {
                extension: "none".to_string(),
            })?;

        Self::from_extension(ext)
    }

    /// Detect language from file extension string
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "kt" => Ok(Self::Kotlin),
            "kts" => Ok(Self::KotlinScript),
            _ => Err(KtLensError::UnsupportedLanguage {
                extension: ext.to_string(),
            }),
        }
    }

    /// Get the canonical name of the language
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kotlin => "kotlin",
            Self::KotlinScript => "kotlin-script",
        }
    }

    /// Get the tree-sitter Language for parsing
    pub fn tree_sitter_language(&self) -> Language {
        tree_sitter_kotlin_ng::LANGUAGE.into()
    }

    /// Get common file extensions for this language
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Kotlin => &["kt"],
            Self::KotlinScript => &["kts"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_detection() {
        assert_eq!(Lang::from_extension("kt").unwrap(), Lang::Kotlin);
        assert_eq!(Lang::from_extension("kts").unwrap(), Lang::KotlinScript);
        assert_eq!(Lang::from_extension("KT").unwrap(), Lang::Kotlin);
    }

    #[test]
    fn test_language_from_path() {
        let path = PathBuf::from("src/main/kotlin/App.kt");
        assert_eq!(Lang::from_path(&path).unwrap(), Lang::Kotlin);

        let path = PathBuf::from("build.gradle.kts");
        assert_eq!(Lang::from_path(&path).unwrap(), Lang::KotlinScript);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(Lang::from_extension("java").is_err());
        assert!(Lang::from_path(Path::new("Makefile")).is_err());
    }

    #[test]
    fn test_grammar_loads() {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&Lang::Kotlin.tree_sitter_language())
            .unwrap();
    }
}
