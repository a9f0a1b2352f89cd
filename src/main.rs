// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Genkou CLI entrypoint.
//!
//! Counts and previews manuscript files, and inspects or edits works kept in a local store
//! directory.

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use genkou::backend::{Backend, MemoryBackend, StaticAuth};
use genkou::config::EditorConfig;
use genkou::model::{UserId, WorkDraft, WorkId};
use genkou::shelf::{WorkListView, WorkShelf};
use genkou::store::WorkFolder;
use genkou::text::{count_pure, count_total, render_ruby_html};
use genkou::workspace::{event_channel, Workspace};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GENKOU_LOG";

/// Manuscript tools for serialized fiction.
#[derive(Debug, Parser)]
#[command(name = "genkou", version, about)]
struct Cli {
    /// Editor settings (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace). `GENKOU_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print pure and total character counts.
    Count {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Render ruby markup as HTML.
    Preview { file: PathBuf },
    /// List a work's chapters with their pure counts.
    Stats {
        #[arg(long)]
        store: PathBuf,
        work: String,
    },
    /// Append a chapter to a work.
    AddChapter {
        #[arg(long)]
        store: PathBuf,
        work: String,
    },
    /// List a user's works, pinned first.
    Works {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        user: String,
    },
    /// Create a work owned by a user.
    CreateWork {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        user: String,
        title: String,
    },
    /// Show a user's recent daily progress.
    Progress {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 7)]
        days: usize,
    },
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "genkou=debug",
        _ => "genkou=trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(EditorConfig::load(path)?),
        None => Ok(EditorConfig::default()),
    }
}

fn open_backend(store: &Path, config: &EditorConfig) -> Arc<MemoryBackend> {
    let folder = WorkFolder::new(store).with_durability(config.write_durability());
    Arc::new(MemoryBackend::with_folder(folder))
}

fn write_count(out: &mut impl Write, label: &str, text: &str) -> io::Result<()> {
    writeln!(out, "{}\t{}\t{label}", count_pure(text), count_total(text))
}

fn stats(
    out: &mut impl Write,
    store: &Path,
    work: WorkId,
    config: &EditorConfig,
) -> Result<(), Box<dyn Error>> {
    let backend = open_backend(store, config);
    let (mut workspace, _events) =
        Workspace::open(backend, Arc::new(StaticAuth::anonymous()), config, work)?;
    workspace.pump_ready();

    let view = workspace.chapters().view();
    for row in &view.rows {
        writeln!(out, "{}\t{}\t{}", row.id, row.pure_count, row.title)?;
    }
    writeln!(out, "total\t{}", view.total_pure)?;
    Ok(())
}

async fn add_chapter(
    out: &mut impl Write,
    store: &Path,
    work: WorkId,
    config: &EditorConfig,
) -> Result<(), Box<dyn Error>> {
    let backend = open_backend(store, config);
    let (mut workspace, _events) =
        Workspace::open(backend, Arc::new(StaticAuth::anonymous()), config, work)?;
    workspace.pump_ready();

    let id = workspace.chapters_mut().add_chapter().await?;
    workspace.pump_ready();
    let title = workspace.chapters().current_chapter().map(|c| c.title().to_owned());
    writeln!(out, "{id}\t{}", title.unwrap_or_default())?;
    workspace.close();
    Ok(())
}

fn write_works(out: &mut impl Write, view: &WorkListView) -> io::Result<()> {
    if view.is_empty() {
        return writeln!(out, "作品がありません");
    }
    for row in &view.rows {
        let pin = if row.pinned { '★' } else { '☆' };
        writeln!(
            out,
            "{}\t{}\t{pin}\t{}\t{}",
            row.id,
            row.status.label(),
            row.total_chars,
            row.title
        )?;
    }
    Ok(())
}

fn works(
    out: &mut impl Write,
    store: &Path,
    user: UserId,
    config: &EditorConfig,
) -> Result<(), Box<dyn Error>> {
    let backend = open_backend(store, config);
    let (events, _rx) = event_channel();
    let mut shelf = WorkShelf::new(backend, Arc::new(StaticAuth::signed_in(user)), events);
    shelf.open()?;
    shelf.pump_ready();
    write_works(out, &shelf.view())?;
    shelf.close();
    Ok(())
}

async fn create_work(
    out: &mut impl Write,
    store: &Path,
    user: UserId,
    title: String,
    config: &EditorConfig,
) -> Result<(), Box<dyn Error>> {
    let backend = open_backend(store, config);
    let (events, _rx) = event_channel();
    let mut shelf = WorkShelf::new(backend, Arc::new(StaticAuth::signed_in(user)), events);
    let id = shelf.create_work(WorkDraft::titled(title)).await?;
    writeln!(out, "{id}")?;
    Ok(())
}

async fn progress(
    out: &mut impl Write,
    store: &Path,
    user: UserId,
    days: usize,
    config: &EditorConfig,
) -> Result<(), Box<dyn Error>> {
    let backend = open_backend(store, config);
    for day in backend.recent_daily_progress(&user, days).await? {
        writeln!(out, "{}\t{}", day.date, day.count)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = load_config(cli.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Count { files } => {
            for file in &files {
                let text = std::fs::read_to_string(file)?;
                write_count(&mut out, &file.display().to_string(), &text)?;
            }
        }
        Command::Preview { file } => {
            let text = std::fs::read_to_string(&file)?;
            writeln!(out, "{}", render_ruby_html(&text))?;
        }
        Command::Stats { store, work } => {
            stats(&mut out, &store, WorkId::new(work)?, &config)?;
        }
        Command::AddChapter { store, work } => {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(add_chapter(&mut out, &store, WorkId::new(work)?, &config))?;
        }
        Command::Works { store, user } => {
            works(&mut out, &store, UserId::new(user)?, &config)?;
        }
        Command::CreateWork { store, user, title } => {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(create_work(&mut out, &store, UserId::new(user)?, title, &config))?;
        }
        Command::Progress { store, user, days } => {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(progress(&mut out, &store, UserId::new(user)?, days, &config))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("genkou: {err}");
            ExitCode::FAILURE
        }
    }
}
