//! Lyco CLI
//!
//! Usage:
//!   lyco compose -c <LAYOUT> [-o <OUTPUT>] [--root <DIR>] [--lint]
//!   lyco check -c <LAYOUT>
//!   lyco normalize -c <LAYOUT> [--dry-run]
//!   lyco schema
//!
//! Global options:
//!   --settings <FILE>  Settings file (TOML)
//!   -v, --verbose      Debug logging (RUST_LOG overrides)

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lyco::layout::lint;
use lyco::session::{FileStore, LayoutStore, MemoryStore};
use lyco::{
    compose_to_file, ComposeError, Document, DocumentError, EditSession, FsLoader, SessionError,
    Settings,
};

#[derive(Parser)]
#[command(name = "lyco")]
#[command(about = "Lyco Image Mosaic: compose images into one transparent wallpaper")]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a layout to a PNG
    Compose {
        /// Layout file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output path (overrides the layout's `output`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory relative image paths resolve against (default: working directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Report overlapping and clipped placements
        #[arg(long)]
        lint: bool,
    },

    /// Validate a layout and report lint warnings
    Check {
        /// Layout file (YAML)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Shift a layout so it starts at the origin and fix its canvas size
    Normalize {
        /// Layout file (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Print the normalized layout instead of saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the layout file format
    Schema,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.settings {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Settings::default(),
    };
    debug!(?settings, "settings loaded");

    match cli.command {
        Command::Compose {
            config,
            output,
            root,
            lint,
        } => run_compose(&settings, &config, output.as_deref(), root, lint),
        Command::Check { config } => run_check(&config),
        Command::Normalize { config, dry_run } => run_normalize(&settings, &config, dry_run),
        Command::Schema => print_schema(),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "lyco=debug" } else { "lyco=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_layout(path: &Path) -> String {
    match FileStore::new(path).load() {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn report_document_error(err: &DocumentError, source: &str, path: &Path) -> ! {
    eprintln!("{}", err.format(source, &path.display().to_string()));
    process::exit(1);
}

fn run_compose(
    settings: &Settings,
    layout: &Path,
    output: Option<&Path>,
    root: Option<PathBuf>,
    lint: bool,
) {
    let source = read_layout(layout);
    let loader = root.map(FsLoader::with_root).unwrap_or_default();
    let config = settings.compose_config().with_lint(lint);

    match compose_to_file(&source, &loader, output, &config) {
        Ok(report) => {
            for w in &report.warnings {
                eprintln!("warning: {}", w);
            }
            println!("Wrote {} ({})", report.output.display(), report.canvas);
        }
        Err(ComposeError::Document(e)) => report_document_error(&e, &source, layout),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_check(layout: &Path) {
    let source = read_layout(layout);
    let document = match Document::parse(&source) {
        Ok(d) => d,
        Err(e) => report_document_error(&e, &source, layout),
    };
    let warnings = lint::check(&document);
    for w in &warnings {
        println!("warning: {}", w);
    }
    println!(
        "{}: {} placement(s), canvas {}, {} warning(s)",
        layout.display(),
        document.placements.len(),
        document.canvas_size(),
        warnings.len()
    );
}

fn run_normalize(settings: &Settings, layout: &Path, dry_run: bool) {
    let result = if dry_run {
        let source = read_layout(layout);
        EditSession::open(MemoryStore::new(source), settings.session_config()).and_then(|mut s| {
            s.save()?;
            print!("{}", s.buffer());
            Ok(s.canvas())
        })
    } else {
        EditSession::open(FileStore::new(layout), settings.session_config()).and_then(|mut s| {
            s.save()?;
            Ok(s.canvas())
        })
    };

    match result {
        Ok(canvas) if !dry_run => println!("Normalized {} (canvas {})", layout.display(), canvas),
        Ok(_) => {}
        Err(SessionError::Document(e)) => {
            let source = read_layout(layout);
            report_document_error(&e, &source, layout)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_schema() {
    println!(
        r#"LYCO LAYOUT FORMAT
==================

Layouts are YAML mappings. Keys are written back in this order.

output: <path>                 Destination PNG (default: wallpaper.png)
canvas_width: <int>            Explicit canvas size; give both or neither
canvas_height: <int>
items:                         At least one placement, drawn first to last
  - file: <path>               Image to place (PNG, JPEG, GIF, BMP)
    x: <int>                   Left edge on the canvas
    y: <int>                   Top edge on the canvas
    resolution: <W>x<H>        Size the image is scaled to, e.g. 1920x1080

CANVAS
------
Without canvas_width/canvas_height the canvas reaches the furthest right and
bottom placement edges, starting at 0,0. Placements at negative positions are
clipped; run `lyco normalize` to move the layout back to the origin.

EXAMPLE
-------
output: wallpaper.png
items:
  - file: left.png
    x: 0
    y: 0
    resolution: 1920x1080
  - file: right.png
    x: 1920
    y: 0
    resolution: 2560x1440"#
    );
}
