//! Page-Weave CLI (for testing purposes only)
//! The main interface is through WASM bindings.
//!
//! Paginates a document headlessly and prints the resulting overlay:
//!
//! ```text
//! page-weave <document.json | document.txt> [options.json] [--max-frames N]
//! ```

use clap::Parser;
use page_weave::render::HARD_BREAK_CLASS;
use page_weave::{Document, Editor, PaginationOptions, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "page-weave",
    about = "Paginate a document headlessly and print the page overlay",
    version
)]
struct Cli {
    /// Document to paginate: persisted JSON, or plain text with one paragraph per line
    document: PathBuf,

    /// Pagination options as JSON
    options: Option<PathBuf>,

    /// Frames allowed for the layout to settle
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    max_frames: usize,
}

const DEFAULT_MAX_FRAMES: usize = 16;

fn load_document(path: &Path) -> Result<Document> {
    let source = std::fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        Document::from_json(&source)
    } else {
        Ok(Document::from_text(&source))
    }
}

fn run(cli: &Cli) -> Result<()> {
    let document = load_document(&cli.document)?;
    let options = match cli.options.as_deref() {
        Some(path) => PaginationOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => PaginationOptions::default(),
    };

    let mut editor = Editor::new(document, options);
    let frames = editor.settle(cli.max_frames);
    if editor.has_pending_frame() {
        log::warn!("layout did not settle within {} frames", cli.max_frames);
    }

    println!("Pages: {} (settled after {} frames)", editor.page_count(), frames);
    println!();
    for region in editor.decorations().regions() {
        let (left, right) = region.plain_text();
        let source = if region.from_override { "override" } else { "default" };
        println!(
            "  page {:>3} {:<6} [{}] {:?} | {:?}",
            region.page_number, region.kind, source, left, right
        );
    }
    let hard_breaks = editor.hard_breaks();
    if !hard_breaks.is_empty() {
        println!();
        println!("  {} hard breaks (.{})", hard_breaks.len(), HARD_BREAK_CLASS);
    }
    println!();
    print!("{}", editor.style_vars().to_css());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
