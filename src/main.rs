//! # Job Searcher CLI (`jobs`)
//!
//! ## Usage
//!
//! ```bash
//! jobs --config ./config/jobs.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `jobs search <q>` | Search job postings |
//! | `jobs insights <position>` | Search job-insight reports |
//! | `jobs saved jobs\|insights` | List a saved collection |
//! | `jobs save job\|insight <file>` | Save an item read from a JSON file |
//! | `jobs unsave jobs\|insights <id>` | Remove a saved item |
//! | `jobs config` | Print the resolved configuration |

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use job_searcher::api::Resource;
use job_searcher::config::{self, Config};
use job_searcher::render::{Listing, OutputFormat};
use job_searcher::{logging, saved, search};
use job_searcher_core::{InsightsQuery, JobInsight, JobPosting, JobQuery};

/// Job Searcher: search job postings and job insights, manage saved lists.
///
/// The API base URL comes from `[api].base_url` in the config file or the
/// `JOB_API_BASE_URL` environment variable.
#[derive(Parser)]
#[command(name = "jobs", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When the file does not exist, built-in defaults are used.
    #[arg(long, global = true, default_value = "./config/jobs.toml")]
    config: PathBuf,

    /// Log debug output to stderr (ignored when RUST_LOG is set).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search job postings.
    ///
    /// At least one of the query, `--city`, or `--workday` must be non-blank.
    Search {
        /// Free-text search terms.
        #[arg(default_value = "")]
        q: String,

        #[arg(long, default_value = "")]
        city: String,

        /// Workday tenant selector, e.g. `pwc.wd3.myworkdayjobs.com:Global_Experienced_Careers:pwc`.
        #[arg(long, default_value = "")]
        workday: String,

        /// Exclude Netflix postings.
        #[arg(long)]
        no_netflix: bool,

        /// Relax strict matching.
        #[arg(long)]
        loose: bool,

        /// Number of pages to fetch.
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search job-insight reports.
    ///
    /// A position or at least one `--company` is required.
    Insights {
        /// Position title.
        #[arg(default_value = "")]
        position: String,

        /// Company filter; repeat for several.
        #[arg(long = "company")]
        companies: Vec<String>,

        /// Years of experience.
        #[arg(long, default_value_t = 0)]
        years: u32,

        /// Only remote roles.
        #[arg(long)]
        remote: bool,

        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[arg(long)]
        json: bool,
    },

    /// List a saved collection.
    Saved {
        collection: Collection,

        #[arg(long)]
        json: bool,
    },

    /// Save an item read from a JSON file.
    Save {
        collection: Collection,

        /// JSON file holding one job posting or insight.
        file: PathBuf,
    },

    /// Remove a saved item by id.
    Unsave { collection: Collection, id: String },

    /// Print the resolved configuration as TOML.
    Config,
}

/// Which saved collection a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Collection {
    #[value(alias = "job")]
    Jobs,
    #[value(alias = "insight")]
    Insights,
}

fn resolve_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        let cfg = Config::minimal();
        cfg.validate()?;
        Ok(cfg)
    }
}

/// One operation on a saved collection.
#[derive(Debug, PartialEq, Eq)]
enum SavedAction<'a> {
    List(OutputFormat),
    Save(&'a Path),
    Remove(&'a str),
}

async fn dispatch_saved(
    cfg: &Config,
    collection: Collection,
    action: SavedAction<'_>,
) -> anyhow::Result<()> {
    match collection {
        Collection::Jobs => run_saved::<JobPosting>(cfg, action).await,
        Collection::Insights => run_saved::<JobInsight>(cfg, action).await,
    }
}

async fn run_saved<R: Resource + Listing>(
    cfg: &Config,
    action: SavedAction<'_>,
) -> anyhow::Result<()> {
    match action {
        SavedAction::List(format) => saved::run_list::<R>(cfg, format).await,
        SavedAction::Save(file) => saved::run_save::<R>(cfg, file).await,
        SavedAction::Remove(id) => saved::run_unsave::<R>(cfg, id).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    let cfg = resolve_config(&cli.config)?;

    match &cli.command {
        Commands::Search {
            q,
            city,
            workday,
            no_netflix,
            loose,
            pages,
            json,
        } => {
            let query = JobQuery {
                q: q.clone(),
                city: city.clone(),
                workday: workday.clone(),
                include_netflix: !no_netflix,
                strict: !loose,
                ..Default::default()
            }
            .with_page_size(cfg.search.page_size);
            let format = OutputFormat::from_json_flag(*json);
            search::run_search::<JobPosting>(&cfg, query, *pages, format).await?;
        }
        Commands::Insights {
            position,
            companies,
            years,
            remote,
            pages,
            json,
        } => {
            let query = InsightsQuery {
                position: position.clone(),
                companies: companies.clone(),
                years_experience: *years,
                remote: *remote,
                ..Default::default()
            }
            .with_page_size(cfg.search.page_size);
            let format = OutputFormat::from_json_flag(*json);
            search::run_search::<JobInsight>(&cfg, query, *pages, format).await?;
        }
        Commands::Saved { collection, json } => {
            let action = SavedAction::List(OutputFormat::from_json_flag(*json));
            dispatch_saved(&cfg, *collection, action).await?;
        }
        Commands::Save { collection, file } => {
            dispatch_saved(&cfg, *collection, SavedAction::Save(file)).await?;
        }
        Commands::Unsave { collection, id } => {
            dispatch_saved(&cfg, *collection, SavedAction::Remove(id)).await?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}
