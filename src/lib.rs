//! ktlens: Kotlin semantic highlighting and outline engine
//!
//! This library classifies an already-parsed Kotlin file into a mapping from
//! source ranges to display-style tags, and projects function declarations
//! into outline items. Parsing uses tree-sitter; resolution results come
//! from a [`BindingContext`] — either the built-in best-effort single-file
//! binder or an external resolution engine.
//!
//! # Example
//!
//! ```ignore
//! use ktlens::{AnalyzedFile, SemanticAnalyzer};
//! use std::path::Path;
//!
//! let source = r#"
//! class Greeter {
//!     val name = "world"
//!     fun greet(times: Int) {}
//! }
//! "#;
//!
//! let analyzed = AnalyzedFile::parse(Path::new("Greeter.kt"), source.to_string())?;
//! let mut analyzer = SemanticAnalyzer::new();
//! analyzer.run(Some(&analyzed));
//!
//! for (range, tags) in analyzer.highlights() {
//!     println!("{range}: {tags:?}");
//! }
//! ```

pub mod analyzer;
pub mod cli;
pub mod error;
pub mod highlight;
pub mod java_interop;
pub mod lang;
pub mod resolve;
pub mod schema;
pub mod structure;

// Re-export commonly used types
pub use analyzer::{AnalyzedFile, SemanticAnalyzer, SEMANTIC_PASS_PRIORITY};
pub use cli::{Cli, OutputFormat};
pub use error::{KtLensError, Result};
pub use highlight::SemanticHighlighter;
pub use java_interop::{
    ConstantValue, JavaField, NullPropertyInitializerEvaluator, PropertyInitializerEvaluator,
};
pub use lang::Lang;
pub use resolve::{BindingContext, ClassKind, FileBinder, ResolvedTarget};
pub use schema::{
    sorted_entries, HighlightEntry, HighlightSummary, OffsetRange, OutlineEntry, StyleTag,
};
pub use structure::{scan_functions, FunctionStructureItem};
