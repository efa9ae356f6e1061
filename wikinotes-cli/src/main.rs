//! `wikinotes`: format, inspect and store outline documents from the shell.

mod settings;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wikinotes_core::{
    derive_display_forest, export_document, find_node, parse, serialize_with, DocumentStore,
    SerializeOptions, Storage, WikiError,
};

use settings::{load_settings, save_settings, AppSettings};

#[derive(Parser, Debug)]
#[command(name = "wikinotes")]
#[command(author, version, about = "Outline documents as indented bullet text")]
struct Cli {
    /// SQLite database to use instead of the one in settings
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a text file and print it back in canonical form
    Fmt {
        file: PathBuf,
        /// Print what an opened document would save under the outline settings
        /// (collapsed subtrees dropped unless persistCollapsedChildren is set)
        #[arg(long)]
        saved: bool,
    },
    /// Print the parsed node tree of a text file as JSON
    Show {
        file: PathBuf,
        /// Only show the subtree rooted at this node id (e.g. line-3)
        #[arg(long)]
        zoom: Option<String>,
    },
    /// Store a text file as a new document and print its id
    Import {
        file: PathBuf,
        /// Document title; defaults to the file name
        #[arg(long)]
        title: Option<String>,
    },
    /// Print a stored document
    Export {
        id: String,
        /// Emit JSON with ids, notes and collapsed subtrees intact
        #[arg(long)]
        json: bool,
    },
    /// List stored documents
    List,
    /// Print the current settings, optionally changing the database path
    Config {
        #[arg(long)]
        set_db: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("failed to initialise logging: {e}");
    }

    let cli = Cli::parse();
    let settings = load_settings();
    let mut stdout = std::io::stdout().lock();

    match run(cli, settings, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            match e.downcast_ref::<WikiError>() {
                Some(wiki) => eprintln!("error: {}", wiki.user_message()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("wikinotes=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn run(cli: Cli, mut settings: AppSettings, out: &mut impl Write) -> anyhow::Result<()> {
    let db_path = cli
        .db
        .unwrap_or_else(|| PathBuf::from(&settings.database_path));

    match cli.command {
        Command::Fmt { file, saved } => {
            let forest = parse(&read_text(&file)?);
            let options = if saved {
                settings.outline.serialize_options()
            } else {
                SerializeOptions { include_collapsed: true }
            };
            writeln!(out, "{}", serialize_with(&forest, options))?;
        }
        Command::Show { file, zoom } => {
            let forest = parse(&read_text(&file)?);
            if let Some(id) = zoom.as_deref() {
                if find_node(&forest, id).is_none() {
                    log::warn!("no node {id} in {}; showing the whole document", file.display());
                }
            }
            let shown = derive_display_forest(&forest, zoom.as_deref());
            writeln!(out, "{}", serde_json::to_string_pretty(shown)?)?;
        }
        Command::Import { file, title } => {
            let body = read_text(&file)?;
            let title = title.unwrap_or_else(|| {
                file.file_stem()
                    .map_or_else(|| "Untitled".to_string(), |s| s.to_string_lossy().to_string())
            });
            let mut storage = open_storage(&db_path)?;
            let id = storage.create_document(&title, &body)?;
            writeln!(out, "{id}")?;
        }
        Command::Export { id, json } => {
            let storage = open_storage(&db_path)?;
            let text = storage.load_document_text(&id)?;
            if json {
                writeln!(out, "{}", export_document(&id, &parse(&text))?)?;
            } else {
                writeln!(out, "{text}")?;
            }
        }
        Command::List => {
            let storage = open_storage(&db_path)?;
            for doc in storage.list_documents()? {
                writeln!(out, "{}\t{}", doc.id, doc.title)?;
            }
        }
        Command::Config { set_db } => {
            if let Some(path) = set_db {
                settings.database_path = path.to_string_lossy().to_string();
                let saved_to = save_settings(&settings)?;
                log::info!("settings saved to {}", saved_to.display());
            }
            writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
        }
    }
    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn open_storage(path: &Path) -> anyhow::Result<Storage> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let storage = Storage::open_or_create(path)?;
    log::debug!("using database {}", path.display());
    Ok(storage)
}
