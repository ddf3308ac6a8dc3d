//! rights - Rights record CLI
//!
//! Inspect stored rights records: flatten them to index fields, project the
//! inheritable rules, and check what a user may do.

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hydra_rights::rights::parse_instant;
use hydra_rights::{
    authorize, load_record, project, save_record, Action, Agent, IndexConfig, Indexable, RightsError,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "rights")]
#[command(version)]
#[command(about = "Rights metadata tools for repository objects", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the index fields of a record as JSON
    Index {
        /// Record file (.json, .yaml, .yml)
        file: PathBuf,
        /// Flatten the inheritable projection instead of the record itself
        #[arg(long)]
        inheritable: bool,
        /// Index field-name table (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Project the rules a record hands down to child objects
    Project {
        /// Record file (.json, .yaml, .yml)
        file: PathBuf,
        /// Write the projected record here instead of printing it
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Check whether a user may perform an action on a record
    Check {
        /// Record file (.json, .yaml, .yml)
        file: PathBuf,
        /// User key; omit for an anonymous visitor
        #[arg(long)]
        user: Option<String>,
        /// Group membership (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,
        /// Action to check (discover, read, edit)
        #[arg(long, default_value = "read")]
        action: String,
        /// Evaluate at this date or date-time instead of now
        #[arg(long)]
        at: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Index { file, inheritable, config } => {
            let record = load_record(&file).with_context(|| format!("loading {}", file.display()))?;
            let config = match config {
                Some(path) => IndexConfig::load(&path).with_context(|| format!("loading {}", path.display()))?,
                None => IndexConfig::default(),
            };

            let doc = if inheritable {
                project(&record).to_index_fields(&config)
            } else {
                record.to_index_fields(&config)
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }

        Commands::Project { file, output } => {
            let record = load_record(&file).with_context(|| format!("loading {}", file.display()))?;
            let projected = project(&record).into_record();

            match output {
                Some(path) => {
                    save_record(&path, &projected).with_context(|| format!("writing {}", path.display()))?;
                    println!("✓ Inheritable rights written to {}", path.display());
                }
                None => println!("{}", serde_yaml::to_string(&projected)?),
            }
        }

        Commands::Check { file, user, groups, action, at } => {
            let record = load_record(&file).with_context(|| format!("loading {}", file.display()))?;
            let action: Action = action.parse()?;
            let now: DateTime<Utc> = match at {
                Some(value) => parse_instant("at", &value)?,
                None => Utc::now(),
            };

            let agent = groups.into_iter().fold(
                Agent {
                    user,
                    ..Agent::default()
                },
                |agent, group| agent.with_group(group),
            );
            debug!(?agent, %action, %now, "checking access");

            match authorize(&record, &agent, action, now) {
                Ok(level) => println!("{} {} (level: {})", "ALLOWED".green().bold(), action, level),
                Err(RightsError::AccessDenied { message, .. }) => {
                    println!("{} {}", "DENIED".red().bold(), message);
                    std::process::exit(1);
                }
                Err(e) => bail!(e),
            }
        }
    }

    Ok(())
}
