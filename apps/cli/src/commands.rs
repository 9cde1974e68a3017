//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use docsetgen_artifacts::{default_version, github_release_base_url};
use docsetgen_core::pipeline::{
    CorpusSource, GenerateConfig, GenerateResult, ProgressReporter, cleanup_work_dir, generate,
};
use docsetgen_core::release::{ReleaseConfig, build_release};
use docsetgen_shared::{CONFIG_FILE_NAME, DocsetConfig, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsetgen: build offline documentation bundles from markdown.
#[derive(Parser)]
#[command(
    name = "docsetgen",
    version,
    about = "Render a markdown documentation tree into a searchable Dash docset and package releases.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./docsetgen.toml when present).
    #[arg(long, global = true, env = "DOCSETGEN_CONFIG")]
    pub config: Option<PathBuf>,

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
    /// Generate the docset bundle.
    Generate {
        /// Directory the bundle is written into.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Scratch directory for the checkout and HTML tree (defaults to a
        /// fresh directory under the system temp dir).
        #[arg(short, long)]
        work_dir: Option<PathBuf>,

        /// Reuse an existing checkout in the work directory.
        #[arg(long, conflicts_with = "corpus")]
        skip_clone: bool,

        /// Keep the work directory afterwards.
        #[arg(long)]
        keep_temp: bool,

        /// Use a local documentation tree instead of cloning.
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Generate a fresh docset and package it as a versioned release.
    #[command(disable_version_flag = true)]
    Release {
        /// Directory receiving the release files.
        #[arg(short, long, default_value = "releases")]
        output: PathBuf,

        /// Release version (defaults to today's date, YYYY.MM.DD).
        #[arg(long)]
        version: Option<String>,

        /// Base download URL.
        #[arg(short = 'u', long)]
        base_url: Option<String>,

        /// Mirror download URL (repeatable).
        #[arg(short, long = "mirror")]
        mirrors: Vec<String>,

        /// Derive the base URL from a GitHub release of `--repo`.
        #[arg(long, requires = "repo")]
        github_release: bool,

        /// GitHub repository (owner/repo).
        #[arg(long)]
        repo: Option<String>,

        /// Use a local documentation tree instead of cloning.
        #[arg(long)]
        corpus: Option<PathBuf>,
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
    /// Write the default config file.
    Init {
        /// Where to write it.
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
    },
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
        0 => "docsetgen=info",
        1 => "docsetgen=debug",
        _ => "docsetgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Generate {
            output,
            work_dir,
            skip_clone,
            keep_temp,
            corpus,
        } => {
            let source = corpus_source(corpus, skip_clone);
            cmd_generate(config_path, output, work_dir, source, keep_temp).await
        }
        Command::Release {
            output,
            version,
            base_url,
            mirrors,
            github_release,
            repo,
            corpus,
        } => {
            let version = version.unwrap_or_else(default_version);
            let base_url = match (github_release, repo.as_deref()) {
                (true, Some(repo)) => Some(github_release_base_url(repo, &version)?),
                _ => base_url,
            };
            let release = ReleaseConfig {
                docset: load_config(config_path)?,
                output_dir: output,
                version,
                base_url,
                mirrors,
                source: corpus_source(corpus, false),
            };
            cmd_release(&release).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init { path } => cmd_config_init(&path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn corpus_source(corpus: Option<PathBuf>, skip_clone: bool) -> CorpusSource {
    match corpus {
        Some(path) => CorpusSource::Local(path),
        None if skip_clone => CorpusSource::Existing,
        None => CorpusSource::Clone,
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(
    config_path: Option<&Path>,
    output: PathBuf,
    work_dir: Option<PathBuf>,
    source: CorpusSource,
    keep_temp: bool,
) -> Result<()> {
    let docset = load_config(config_path)?;
    let work_dir = work_dir.unwrap_or_else(|| {
        std::env::temp_dir().join(format!("docsetgen-{}", uuid::Uuid::now_v7()))
    });
    std::fs::create_dir_all(&output)
        .wrap_err_with(|| format!("cannot create output directory {}", output.display()))?;

    let config = GenerateConfig {
        docset,
        output_dir: output,
        work_dir,
        source,
    };

    info!(
        output = %config.output_dir.display(),
        work_dir = %config.work_dir.display(),
        "generating docset"
    );

    let reporter = CliProgress::new();
    let outcome = generate(&config, &reporter).await;
    reporter.clear();

    if keep_temp {
        info!(path = %config.work_dir.display(), "keeping work directory");
    } else {
        cleanup_work_dir(&config.work_dir, &config.output_dir);
    }

    let result = outcome?;

    println!();
    println!("  Docset generated successfully!");
    println!("  Location: {}", result.bundle_path.display());
    println!("  Pages:    {}", result.rendered);
    println!("  Skipped:  {}", result.skipped);
    println!("  Entries:  {}", result.records);
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_release(config: &ReleaseConfig) -> Result<()> {
    info!(
        version = %config.version,
        output = %config.output_dir.display(),
        "building release"
    );

    let reporter = CliProgress::new();
    let outcome = build_release(config, &reporter).await;
    reporter.clear();
    let result = outcome?;

    let package = &result.package;
    println!();
    println!("  Release built successfully!");
    println!("  Archive:  {}", package.archive_path.display());
    println!("  Size:     {}", package.metadata.archive.size_human);
    println!("  MD5:      {}", package.checksums.md5);
    println!("  SHA1:     {}", package.checksums.sha1);
    println!("  SHA256:   {}", package.checksums.sha256);
    println!("  Feed:     {}", package.feed_path.display());
    println!("  Metadata: {}", package.metadata_path.display());
    println!("  Latest:   {}", package.latest_link.display());
    if package.metadata.urls.is_empty() {
        println!("  URLs:     none (pass --base-url or --mirror)");
    } else {
        for url in &package.metadata.urls {
            println!("  URL:      {url}");
        }
    }
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_config_init(path: &Path) -> Result<()> {
    let path = init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: DocsetConfig = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
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
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_rendered(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.set_message("Docset assembled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn release_flags_parse() {
        let cli = Cli::try_parse_from([
            "docsetgen",
            "-vv",
            "release",
            "--version",
            "1.2.3",
            "-u",
            "https://example.com",
            "-m",
            "https://a.example",
            "-m",
            "https://b.example",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Release {
                version,
                base_url,
                mirrors,
                output,
                ..
            } => {
                assert_eq!(version.as_deref(), Some("1.2.3"));
                assert_eq!(base_url.as_deref(), Some("https://example.com"));
                assert_eq!(mirrors.len(), 2);
                assert_eq!(output, PathBuf::from("releases"));
            }
            _ => panic!("expected release"),
        }
    }

    #[test]
    fn github_release_requires_repo() {
        let err = Cli::try_parse_from(["docsetgen", "release", "--github-release"]);
        assert!(err.is_err());
    }

    #[test]
    fn generate_source_selection() {
        assert_eq!(corpus_source(None, false), CorpusSource::Clone);
        assert_eq!(corpus_source(None, true), CorpusSource::Existing);
        assert_eq!(
            corpus_source(Some(PathBuf::from("docs")), false),
            CorpusSource::Local(PathBuf::from("docs"))
        );
        assert!(Cli::try_parse_from(["docsetgen", "generate", "--skip-clone", "--corpus", "x"]).is_err());
    }
}
