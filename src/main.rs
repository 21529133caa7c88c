//! ktlens CLI entry point

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ktlens::cli::Command;
use ktlens::{
    scan_functions, sorted_entries, AnalyzedFile, Cli, HighlightSummary, KtLensError, Lang,
    OutputFormat, SemanticAnalyzer,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> ktlens::Result<String> {
    match cli.command {
        Command::Highlight {
            file,
            format,
            print_ast,
        } => run_highlight(&file, format, print_ast),
        Command::Outline { file, format } => run_outline(&file, format),
    }
}

fn run_highlight(file: &Path, format: OutputFormat, print_ast: bool) -> ktlens::Result<String> {
    let analyzed = load(file)?;

    if print_ast {
        eprintln!("\n=== AST ===");
        print_tree(&analyzed.tree.root_node(), &analyzed.source, 0);
        eprintln!("=== END AST ===\n");
    }

    let mut analyzer = SemanticAnalyzer::new();
    analyzer.run(Some(&analyzed));

    let entries = sorted_entries(analyzer.highlights());

    match format {
        OutputFormat::Json => {
            let summary = HighlightSummary {
                file: file.display().to_string(),
                language: analyzed.lang.name().to_string(),
                highlights: entries,
            };
            serde_json::to_string_pretty(&summary).map_err(|e| KtLensError::EncodingFailure {
                message: format!("JSON serialization failed: {}", e),
            })
        }
        OutputFormat::Text => {
            let mut lines = Vec::with_capacity(entries.len());
            for entry in entries {
                let tags: Vec<&str> = entry.tags.iter().map(|t| t.name()).collect();
                lines.push(format!("{}..{} {}", entry.start, entry.end, tags.join(",")));
            }
            Ok(lines.join("\n"))
        }
    }
}

fn run_outline(file: &Path, format: OutputFormat) -> ktlens::Result<String> {
    let analyzed = load(file)?;
    let items = scan_functions(&analyzed.tree, &analyzed.source);

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = items.iter().map(|i| i.to_entry()).collect();
            serde_json::to_string_pretty(&entries).map_err(|e| KtLensError::EncodingFailure {
                message: format!("JSON serialization failed: {}", e),
            })
        }
        OutputFormat::Text => {
            let lines: Vec<String> = items
                .iter()
                .map(|i| format!("{} [{}..{}]", i.label(), i.position(), i.end_position()))
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

fn load(file: &Path) -> ktlens::Result<AnalyzedFile> {
    if !file.exists() {
        return Err(KtLensError::FileNotFound {
            path: file.display().to_string(),
        });
    }

    // Fail on unsupported extensions before touching the file contents.
    Lang::from_path(file)?;

    let source = fs::read_to_string(file)?;
    AnalyzedFile::parse(file, source)
}

/// Print AST for debugging
fn print_tree(node: &tree_sitter::Node, source: &str, depth: usize) {
    let indent = "  ".repeat(depth);
    let text = node.utf8_text(source.as_bytes()).unwrap_or("<invalid utf8>");
    let text_preview: String = text.chars().take(50).collect();
    let text_preview = text_preview.replace('\n', "\\n");

    eprintln!(
        "{}{}:{} [{}-{}] \"{}\"{}",
        indent,
        node.kind(),
        if node.is_named() { "" } else { " (anonymous)" },
        node.start_byte(),
        node.end_byte(),
        text_preview,
        if text.len() > 50 { "..." } else { "" }
    );

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        print_tree(&child, source, depth + 1);
    }
}
