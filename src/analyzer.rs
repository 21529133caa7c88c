//! Classification request lifecycle driver
//!
//! The host scheduler owns when a pass runs; this module owns what a pass
//! does: clear the previous highlight map, reset the cancellation token, and
//! rebuild the map from scratch when a parsed input is available. Results
//! are swapped in wholesale — readers never observe a half-built map.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;
use tree_sitter::Tree;

use crate::error::{KtLensError, Result};
use crate::highlight::SemanticHighlighter;
use crate::lang::Lang;
use crate::resolve::{BindingContext, FileBinder};
use crate::schema::{OffsetRange, StyleTag};

/// Scheduling priority of the highlighting pass
///
/// Highest number = lowest priority: the host may defer this pass behind
/// error checking and other analysis passes.
pub const SEMANTIC_PASS_PRIORITY: i32 = 999;

/// A parsed and bound source file, ready for classification
pub struct AnalyzedFile {
    pub file: PathBuf,
    pub lang: Lang,
    pub source: String,
    pub tree: Tree,
    pub bindings: BindingContext,
}

impl AnalyzedFile {
    /// Parse `source` as Kotlin and bind it with the single-file binder
    pub fn parse(path: &Path, source: String) -> Result<Self> {
        let lang = Lang::from_path(path)?;

        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&lang.tree_sitter_language())
            .map_err(|e| KtLensError::ParseFailure {
                message: format!("Failed to set language: {:?}", e),
            })?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| KtLensError::ParseFailure {
                message: "Failed to parse file".to_string(),
            })?;

        let bindings = FileBinder::bind(&tree, &source);

        Ok(Self {
            file: path.to_path_buf(),
            lang,
            source,
            tree,
            bindings,
        })
    }

    /// Use an externally produced binding context instead of the built-in
    /// binder
    pub fn with_bindings(mut self, bindings: BindingContext) -> Self {
        self.bindings = bindings;
        self
    }
}

/// Drives highlighting passes for one file slot
///
/// One instance per open file; the host calls [`run`](Self::run) on each
/// scheduling event and [`cancel`](Self::cancel) when the input is
/// superseded. Not internally synchronized beyond the cancellation token —
/// exclusion of concurrent runs is the host's responsibility.
pub struct SemanticAnalyzer {
    cancel: Arc<AtomicBool>,
    highlights: HashMap<OffsetRange, HashSet<StyleTag>>,
    smart_casts: HashMap<OffsetRange, String>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            highlights: HashMap::new(),
            smart_casts: HashMap::new(),
        }
    }

    pub fn priority(&self) -> i32 {
        SEMANTIC_PASS_PRIORITY
    }

    /// The highlight map from the most recent completed pass
    pub fn highlights(&self) -> &HashMap<OffsetRange, HashSet<StyleTag>> {
        &self.highlights
    }

    /// Smart-cast renderings from the most recent completed pass
    pub fn smart_casts(&self) -> &HashMap<OffsetRange, String> {
        &self.smart_casts
    }

    /// Token the host can hold to cancel a pass from another thread
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Signal the running pass to stop at its next traversal step
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Run one classification pass
    ///
    /// Clears prior results and the cancellation token first. With no input
    /// (the file failed to parse upstream) the maps stay empty. A pass
    /// cancelled mid-run leaves the maps empty rather than half-filled.
    pub fn run(&mut self, result: Option<&AnalyzedFile>) {
        self.highlights.clear();
        self.smart_casts.clear();
        self.cancel.store(false, Ordering::Relaxed);

        let Some(analyzed) = result else {
            return;
        };

        let mut highlighter = SemanticHighlighter::new(&analyzed.bindings, &self.cancel);
        highlighter.compute_highlighting_ranges(analyzed.tree.root_node());

        if self.cancel.load(Ordering::Relaxed) {
            debug!(file = %analyzed.file.display(), "highlighting pass cancelled");
            return;
        }

        let (highlights, smart_casts) = highlighter.into_results();
        self.highlights = highlights;
        self.smart_casts = smart_casts;
        debug!(
            file = %analyzed.file.display(),
            ranges = self.highlights.len(),
            "highlighting pass complete"
        );
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
