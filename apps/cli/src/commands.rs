//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use papertrail_core::{
    AbstractsConfig, PaperConfig, ProgressReporter, WalkSummary, download_abstracts,
    download_paper,
};
use papertrail_shared::{AppConfig, FetchConfig, config_file_path, init_config, load_config};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Papertrail: pull abstracts and papers from a conference proceedings site.
#[derive(Parser)]
#[command(
    name = "papertrail",
    version,
    about = "Download conference-paper abstracts and documents from a proceedings site.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Walk the proceedings index and save abstracts as text files.
    Abstracts {
        /// Maximum number of abstracts to save.
        #[arg(short, long)]
        count: Option<usize>,

        /// Output directory for abstract files.
        #[arg(short, long)]
        out: Option<String>,

        /// Proceedings index page URL.
        #[arg(long, env = "PAPERTRAIL_INDEX_URL")]
        index_url: Option<String>,
    },

    /// Download one paper's document by (partial) title.
    Paper {
        /// Title to search for; `_` is read as `:`.
        title: String,

        /// Output directory for paper documents.
        #[arg(short, long)]
        out: Option<String>,

        /// Proceedings index page URL.
        #[arg(long, env = "PAPERTRAIL_INDEX_URL")]
        index_url: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "papertrail=info",
        1 => "papertrail=debug",
        _ => "papertrail=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Abstracts {
            count,
            out,
            index_url,
        } => cmd_abstracts(count, out.as_deref(), index_url.as_deref()).await,
        Command::Paper {
            title,
            out,
            index_url,
        } => cmd_paper(&title, out.as_deref(), index_url.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn parse_index_url(config: &AppConfig, flag: Option<&str>) -> Result<Url> {
    let raw = flag.unwrap_or(&config.defaults.index_url);
    Url::parse(raw).map_err(|e| eyre!("invalid index URL '{raw}': {e}"))
}

async fn cmd_abstracts(
    count: Option<usize>,
    out: Option<&str>,
    index_url: Option<&str>,
) -> Result<()> {
    let config = load_config()?;

    let abstracts_config = AbstractsConfig {
        count: count.unwrap_or(config.defaults.count),
        out_dir: PathBuf::from(out.unwrap_or(&config.defaults.abstracts_dir)),
        index_url: parse_index_url(&config, index_url)?,
        fetch: FetchConfig::from(&config),
    };

    info!(
        count = abstracts_config.count,
        out = %abstracts_config.out_dir.display(),
        index_url = %abstracts_config.index_url,
        "downloading abstracts"
    );

    let reporter = CliProgress::new();
    let result = download_abstracts(&abstracts_config, &reporter).await;
    reporter.spinner.finish_and_clear();
    let summary = result?;

    println!();
    println!("  Abstracts downloaded.");
    println!("  Found:    {}", summary.entries_found);
    println!("  Saved:    {}", summary.saved);
    println!("  Existing: {}", summary.skipped_existing);
    println!("  Failed:   {}", summary.failed);
    println!("  No link:  {}", summary.unlinked);
    println!("  Path:     {}", abstracts_config.out_dir.display());
    println!("  Time:     {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_paper(title: &str, out: Option<&str>, index_url: Option<&str>) -> Result<()> {
    let config = load_config()?;

    let paper_config = PaperConfig {
        title: title.to_string(),
        out_dir: PathBuf::from(out.unwrap_or(&config.defaults.papers_dir)),
        index_url: parse_index_url(&config, index_url)?,
        fetch: FetchConfig::from(&config),
    };

    info!(title, out = %paper_config.out_dir.display(), "downloading paper");

    match download_paper(&paper_config).await? {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(eyre!("no document found for '{title}'")),
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config written to {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let path = config_file_path()?;
    let source = if path.exists() {
        path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };

    println!("# resolved from {source}");
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn entry_processed(&self, title: &str, saved: usize, target: usize) {
        self.spinner
            .set_message(format!("[{saved}/{target}] {title}"));
    }

    fn done(&self, _summary: &WalkSummary) {
        self.spinner.finish_and_clear();
    }
}
