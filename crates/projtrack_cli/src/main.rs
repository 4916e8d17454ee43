//! Command-line front end over the project store.
//!
//! # Responsibility
//! - Drive create/edit/delete/list through the same store the FFI host uses.
//! - Keep output plain and line-oriented for scripting.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use projtrack_core::{
    default_log_level, filter_projects, init_logging, open_target, status_icon, LinkKind, LoadOutcome,
    MetadataEntry, ProjectDetail, ProjectInput, ProjectListItem, ProjectStatus, ProjectStore,
    SqliteKvRepository, StoreConfig, TitlePolicy,
};
use std::path::PathBuf;

const DEFAULT_DB_FILE: &str = "projtrack.sqlite3";

#[derive(Parser)]
#[command(name = "projtrack")]
#[command(about = "Track projects, their status and their links")]
struct Cli {
    /// SQLite file holding the project list
    #[arg(long, env = "PROJTRACK_DB_PATH", value_name = "FILE")]
    db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); needs --log-dir
    #[arg(long, value_name = "LEVEL", requires = "log_dir")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; the level defaults to the
    /// build's default when --log-level is absent
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Reject blank titles on add and edit
    #[arg(long)]
    strict_titles: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Level and directory to log with, when file logging was asked for.
    fn logging_request(&self) -> Option<(&str, &std::path::Path)> {
        let dir = self.log_dir.as_deref()?;
        let level = self.log_level.as_deref().unwrap_or(default_log_level());
        Some((level, dir))
    }
}

#[derive(Subcommand)]
enum Command {
    /// List projects, optionally filtered by title or status
    List {
        #[arg(value_name = "QUERY")]
        query: Vec<String>,
    },
    /// Show one project's detail pane
    Show { index: usize },
    /// Append a new project
    Add(ProjectArgs),
    /// Replace fields of the project at INDEX; an empty value clears a field
    Edit {
        index: usize,
        #[command(flatten)]
        fields: ProjectArgs,
    },
    /// Delete the project at INDEX
    Delete { index: usize },
    /// Print the URL an open action would launch
    Open {
        index: usize,
        /// Link field to open; defaults to the favorite link
        #[arg(long, value_name = "KIND")]
        link: Option<String>,
    },
    /// Print the icon and tint for a status label
    StatusIcon { label: String },
    /// List the status choices
    Statuses,
    /// Print core linkage info
    Ping,
}

#[derive(Args)]
struct ProjectArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    repository: Option<String>,
    #[arg(long)]
    roadmap: Option<String>,
    #[arg(long)]
    design: Option<String>,
    #[arg(long)]
    backend: Option<String>,
    #[arg(long)]
    extra: Option<String>,
    /// Link field used by `open` when no --link is given
    #[arg(long, value_name = "KIND")]
    favorite: Option<String>,
}

impl ProjectArgs {
    fn apply(self, input: &mut ProjectInput) {
        let fields = [
            (self.title, &mut input.title),
            (self.status, &mut input.status),
            (self.description, &mut input.description),
            (self.website, &mut input.website),
            (self.repository, &mut input.repository),
            (self.roadmap, &mut input.roadmap),
            (self.design, &mut input.design),
            (self.backend, &mut input.backend),
            (self.extra, &mut input.extra),
            (self.favorite, &mut input.favorite),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some((level, dir)) = cli.logging_request() {
        let dir = dir.to_str().context("--log-dir must be valid UTF-8")?;
        init_logging(level, dir).map_err(anyhow::Error::msg)?;
    }

    match &cli.command {
        Command::Ping => {
            println!("projtrack_core ping={}", projtrack_core::ping());
            println!("projtrack_core version={}", projtrack_core::core_version());
            return Ok(());
        }
        Command::Statuses => {
            for status in ProjectStatus::ALL {
                let display = status.display();
                println!(
                    "{:<12} {:<20} {}",
                    status.label(),
                    display.icon.name(),
                    display.color.map_or("-", |tint| tint.name())
                );
            }
            return Ok(());
        }
        Command::StatusIcon { label } => {
            let display = status_icon(label);
            println!(
                "{} {}",
                display.icon.name(),
                display.color.map_or("-", |tint| tint.name())
            );
            return Ok(());
        }
        _ => {}
    }

    let db_path = cli.db.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
    let repo = SqliteKvRepository::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    let config = StoreConfig {
        title_policy: if cli.strict_titles {
            TitlePolicy::RejectBlank
        } else {
            TitlePolicy::AllowBlank
        },
        ..StoreConfig::default()
    };
    let (mut store, outcome) = ProjectStore::open(repo, config)?;
    if let LoadOutcome::Recovered { error, backup_key } = outcome {
        eprintln!("warning: saved projects were unreadable and have been reset ({error})");
        eprintln!("warning: the unreadable data is kept under key `{backup_key}`");
    }

    match cli.command {
        Command::List { query } => {
            let query = query.join(" ");
            let matches = filter_projects(store.projects(), &query);
            if matches.is_empty() {
                println!("No projects.");
            }
            for project in matches {
                let index = store.index_of(project.id).unwrap_or_default();
                let item = ProjectListItem::from_project(project);
                println!(
                    "{index:>3}  {:<20} {}  {}",
                    item.icon.icon.name(),
                    item.title,
                    item.subtitle.unwrap_or_default()
                );
            }
        }
        Command::Show { index } => {
            let project = store
                .get(index)
                .with_context(|| format!("no project at index {index}"))?;
            print_detail(&ProjectDetail::from_project(project));
        }
        Command::Add(fields) => {
            if fields.title.is_none() {
                bail!("--title is required");
            }
            let mut input = ProjectInput::for_create();
            fields.apply(&mut input);
            let id = store.create(input.into_project())?;
            println!("created {id} at index {}", store.len() - 1);
        }
        Command::Edit { index, fields } => {
            let current = store
                .get(index)
                .with_context(|| format!("no project at index {index}"))?;
            let mut input = ProjectInput::from_project(current);
            fields.apply(&mut input);
            let replacement = input.into_edit_of(current);
            store.edit(index, replacement)?;
            println!("updated index {index}");
        }
        Command::Delete { index } => {
            let removed = store.delete(index)?;
            println!("deleted {}", removed.id);
        }
        Command::Open { index, link } => {
            let project = store
                .get(index)
                .with_context(|| format!("no project at index {index}"))?;
            let kind = match link.as_deref() {
                Some(raw) => {
                    LinkKind::parse(raw).with_context(|| format!("unknown link kind `{raw}`"))?
                }
                None => project
                    .favorite
                    .context("project has no favorite link; pass --link")?,
            };
            match open_target(project, kind) {
                Some(url) => println!("{url}"),
                None => bail!("project has no {kind} link"),
            }
        }
        Command::Ping | Command::Statuses | Command::StatusIcon { .. } => {}
    }

    Ok(())
}

fn print_detail(detail: &ProjectDetail) {
    for entry in &detail.metadata {
        match entry {
            MetadataEntry::Tag { title, text, color } => println!(
                "{title}: {text} ({})",
                color.map_or("-", |tint| tint.name())
            ),
            MetadataEntry::Link {
                title,
                text,
                target,
            } => println!("{title}: {text} <{target}>"),
            MetadataEntry::Label { title, text } => println!("{title}: {text}"),
            MetadataEntry::Separator => println!("--"),
        }
    }
    if !detail.markdown.is_empty() {
        println!();
        println!("{}", detail.markdown);
    }
}
