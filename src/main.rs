// Exclude entire file from coverage - binary entry point
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Polyglot CLI
//!
//! Manages user snippets and demonstrates live expansion from the terminal.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use polyglot_lib::commands::{self, ConsoleEventEmitter};
use polyglot_lib::snippets::SnippetPatch;
use polyglot_lib::{
    Buffer, BuiltinPresets, DebouncedPreview, Debouncer, NoPreview, Pane, PlaygroundContext,
    PreviewScheduler, Settings, SnippetStore, TextBuffer,
};
use tokio::runtime::Runtime;

#[derive(Debug, Parser)]
#[command(name = "polyglot")]
#[command(about = "Polyglot - snippet manager and expansion engine", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List user snippets, grouped by language
    List {
        #[arg(long)]
        language: Option<String>,
    },
    /// Add a snippet
    Add {
        language: String,
        trigger: String,
        template: String,
    },
    /// Update fields of an existing snippet
    Update {
        id: String,
        #[arg(long)]
        trigger: Option<String>,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
    /// Delete a snippet
    Delete { id: String },
    /// Enable or disable a snippet
    Toggle { id: String },
    /// Export user snippets as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import snippets from a JSON file
    Import { file: PathBuf },
    /// Type a line into a buffer and print the expanded result
    Expand { language: String, line: String },
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings, String> {
    let result = match path {
        Some(path) => Settings::load(&path),
        None => Settings::load_default(),
    };
    result.map_err(|e| e.to_string())
}

fn open_store(settings: &Settings) -> Result<SnippetStore, String> {
    let path = settings.snippets_path().map_err(|e| e.to_string())?;
    polyglot_lib::debug!("Snippet store: {:?}", path);
    Ok(SnippetStore::with_file(path))
}

/// Debounced preview on its own runtime; the refresh is only logged
fn start_preview(settings: &Settings) -> Result<(Runtime, Arc<DebouncedPreview>), String> {
    let runtime = Runtime::new().map_err(|e| format!("Failed to start runtime: {}", e))?;
    let debouncer = Debouncer::new(runtime.handle().clone());
    let preview = DebouncedPreview::from_settings(debouncer, settings, || {
        polyglot_lib::info!("Preview refreshed");
    });
    Ok((runtime, Arc::new(preview)))
}

/// Block until the last requested refresh has run
fn flush_preview(preview: &DebouncedPreview) {
    let step = Duration::from_millis(10);
    let mut waited = Duration::ZERO;
    while preview.is_pending() && waited < preview.window() * 2 {
        std::thread::sleep(step);
        waited += step;
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let settings = load_settings(cli.settings)?;
    init_logging(&settings.log_level);

    let emitter = if cli.quiet {
        ConsoleEventEmitter::quiet()
    } else {
        ConsoleEventEmitter::new()
    };

    // Only the expansion demo has a preview to keep fresh
    let preview = match cli.command {
        Commands::Expand { .. } => Some(start_preview(&settings)?),
        _ => None,
    };
    let scheduler: Arc<dyn PreviewScheduler> = match &preview {
        Some((_, preview)) => preview.clone(),
        None => Arc::new(NoPreview),
    };

    let mut context = PlaygroundContext::new(
        open_store(&settings)?,
        BuiltinPresets::shared(),
        scheduler,
        Arc::new(emitter),
    );
    context.open_manager()?;

    match cli.command {
        Commands::List { language } => {
            for (group, snippets) in commands::grouped_by_language(context.store()) {
                if language.as_deref().is_some_and(|l| l != group) {
                    continue;
                }
                println!("{}:", group);
                for snippet in snippets {
                    let state = if snippet.is_enabled { "" } else { " (disabled)" };
                    println!("  {}  {}{}", snippet.id, snippet.trigger, state);
                }
            }
        }
        Commands::Add {
            language,
            trigger,
            template,
        } => {
            let snippet = context.add_snippet(&trigger, &template, &language)?;
            println!("{}", snippet.id);
        }
        Commands::Update {
            id,
            trigger,
            template,
            language,
        } => {
            let patch = SnippetPatch {
                trigger,
                template,
                language,
                is_enabled: None,
            };
            context.update_snippet(&id, patch)?;
        }
        Commands::Delete { id } => context.delete_snippet(&id)?,
        Commands::Toggle { id } => {
            context.toggle_snippet(&id)?;
        }
        Commands::Export { output } => {
            if let Some(json) = context.export_snippets()? {
                match output {
                    Some(path) => std::fs::write(&path, json)
                        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?,
                    None => println!("{}", json),
                }
            }
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
            context.import_snippets(&raw)?;
        }
        Commands::Expand { language, line } => {
            context.add_pane(Pane::Script, TextBuffer::default());
            context.set_language(Pane::Script, &language);
            let caret = context.type_text(Pane::Script, &line);

            if let Some(editor) = context.pane(Pane::Script) {
                println!("{}", editor.buffer.text());
                let position = caret.unwrap_or_else(|| editor.buffer.caret());
                println!("caret: {}:{}", position.line, position.column);
            }
            if let Some((_, preview)) = &preview {
                flush_preview(preview);
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
