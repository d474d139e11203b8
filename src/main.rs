//! todo-ledger - a TODO ledger kept in one markdown file

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use todo_ledger::{
    EntryRecord, Ledger, LedgerConfig, LedgerError, NewEntry, Status,
};

#[derive(Parser)]
#[command(name = "todo-ledger")]
#[command(version)]
#[command(about = "Keep a TODO ledger in a markdown file", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Ledger file, overriding configuration (relative to the project)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an open entry and print its ID
    Add {
        /// What needs doing
        description: String,

        /// Where in the code the entry applies
        #[arg(short, long)]
        location: Option<String>,

        /// Extra context for the entry
        #[arg(short, long)]
        context: Option<String>,

        /// High, Medium or Low (anything else becomes Medium)
        #[arg(long)]
        priority: Option<String>,

        /// Section to file the entry under
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Mark an entry open or closed
    Update {
        /// Entry ID
        id: String,

        /// open or closed
        status: String,
    },

    /// Delete an entry and its fields
    Remove {
        /// Entry ID
        id: String,
    },

    /// Summarize entries by status and location
    Report {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entries
    List {
        /// Only entries in this section
        #[arg(short, long)]
        section: Option<String>,

        /// Only open or closed entries
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an empty ledger file
    Init {
        /// Overwrite an existing ledger
        #[arg(long)]
        force: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print configuration file locations
    Paths,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let filter = if cli.verbose {
        "todo_ledger=debug,info"
    } else {
        "todo_ledger=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<LedgerError>()
        .map_or(1, LedgerError::exit_code)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());

    if !project_path.is_dir() {
        anyhow::bail!(
            "Project directory does not exist: {}",
            project_path.display()
        );
    }

    let mut config = LedgerConfig::load(&project_path)?;
    if let Some(file) = cli.file {
        config.file = file;
    }
    let ledger = Ledger::from_config(&config, &project_path);

    match cli.command {
        Commands::Add {
            description,
            location,
            context,
            priority,
            section,
        } => {
            let entry = NewEntry {
                description,
                location,
                context,
                priority,
                section,
            };
            let id = ledger.insert(&entry)?;
            println!("{id}");
        }

        Commands::Update { id, status } => {
            let status: Status = status.parse()?;
            ledger.set_status(&id, status)?;
            println!("{} Marked {} as {}", "OK".green(), id, status);
        }

        Commands::Remove { id } => {
            let removed = ledger.remove(&id)?;
            println!("{} Removed {} ({} lines)", "OK".green(), id, removed);
        }

        Commands::Report { json } => {
            let report = ledger.report()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }

        Commands::List {
            section,
            status,
            json,
        } => {
            let status = status.map(|s| s.parse::<Status>()).transpose()?;
            let entries: Vec<EntryRecord> = ledger
                .entries()?
                .into_iter()
                .filter(|e| status.is_none_or(|s| e.status == s))
                .filter(|e| {
                    section
                        .as_deref()
                        .is_none_or(|s| e.section.as_deref() == Some(s.trim()))
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No entries found.");
            } else {
                print_entries(&entries);
            }
        }

        Commands::Init { force } => {
            ledger.init(force)?;
            println!(
                "{} Created {}",
                "OK".green(),
                ledger.path().display()
            );
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("\n{} Ledger Configuration", "Config:".cyan().bold());
                    println!("{}", "─".repeat(40));
                    println!("   File: {}", config.ledger_path(&project_path).display());
                    println!("   Default section: {}", config.default_section);
                    println!("   Title: {}", config.title);
                    println!("   Locking: {}", config.lock);
                }
            }

            ConfigAction::Paths => {
                println!("\n{} Configuration Paths", "Config:".cyan().bold());
                println!("{}", "─".repeat(40));
                match LedgerConfig::user_config_path() {
                    Some(path) => println!("   User: {}", describe(&path)),
                    None => println!("   User: (no config directory)"),
                }
                println!(
                    "   Project: {}",
                    describe(&LedgerConfig::project_config_path(&project_path))
                );
                println!("   Ledger: {}", describe(ledger.path()));
            }
        },
    }

    Ok(())
}

fn print_entries(entries: &[EntryRecord]) {
    let mut current_section: Option<&str> = None;
    for entry in entries {
        let section = entry.section.as_deref();
        if current_section != Some(section.unwrap_or("")) {
            println!("\n{}", section.unwrap_or("(no section)").bold());
            current_section = Some(section.unwrap_or(""));
        }

        let mark = match entry.status {
            Status::Open => "[ ]".yellow(),
            Status::Closed => "[x]".green(),
        };
        let id = entry.id.as_ref().map_or("-", |id| id.as_str());
        let priority = entry
            .priority
            .map(|p| format!(" ({p})"))
            .unwrap_or_default();
        println!("  {} {}{} {}", mark, id.dimmed(), priority, entry.description);
        if let Some(location) = &entry.location {
            println!("      at {location}");
        }
    }
}

fn describe(path: &Path) -> String {
    if path.exists() {
        format!("{}", path.display())
    } else {
        format!("{} (missing)", path.display())
    }
}
