//! leap-i18n: command-line tool for the InputLeap GUI translation catalogs.
//!
//! # Usage
//!
//! ```text
//! leap-i18n [--config <PATH>] [--dir <PATH>] <COMMAND>
//!
//! Commands:
//!   check <FILE>...                    Parse catalogs and print a summary
//!   report [--json]                    Report on every catalog in the directory
//!   lookup [--locale <TAG>] --context <CTX> <SOURCE> [--arg <V>]...
//!                                      Resolve one message the way the GUI would
//!   languages                          List catalogs and their display names
//!   set-language <TAG>                 Store the UI language in the config file
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable            | Description                                  |
//! |---------------------|----------------------------------------------|
//! | `LEAP_I18N_CONFIG`  | Config file instead of the platform default  |
//! | `LEAP_I18N_DIR`     | Catalog directory, overrides the config file |
//! | `RUST_LOG`          | Log filter, overrides `general.log_level`    |
//!
//! Command output goes to stdout; logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use leap_i18n::infrastructure::storage::config::{
    config_file_path, load_config, load_config_from, save_config_to, ConfigError,
};
use leap_i18n::{
    load_catalog_set, system_locale, AppConfig, CatalogReport, CatalogSource,
    DirectoryCatalogSource, Translator,
};
use leap_i18n_core::{parse_catalog, LocaleMatch, LocaleTag};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and query the InputLeap GUI translation catalogs.
#[derive(Debug, Parser)]
#[command(
    name = "leap-i18n",
    about = "Inspect and query the InputLeap GUI translation catalogs",
    version
)]
struct Cli {
    /// Configuration file to read instead of the platform default.
    #[arg(long, global = true, env = "LEAP_I18N_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the `gui_<tag>.ts` catalogs.
    #[arg(long, global = true, env = "LEAP_I18N_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse catalog files and print an lrelease-style summary for each.
    ///
    /// Exits with an error if any file fails to parse.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also fail on duplicate messages and placeholder mismatches.
        #[arg(long)]
        strict: bool,
    },

    /// Report on every catalog in the catalog directory.
    Report {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Resolve one message for a locale and substitute its arguments.
    Lookup {
        /// Locale to resolve for.  Defaults to the configured language, then
        /// the system locale.
        #[arg(long)]
        locale: Option<LocaleTag>,

        /// Message context, e.g. `AboutDialog`.
        #[arg(long)]
        context: String,

        /// English source text.
        source: String,

        /// Value for `%1`, `%2`, … in order.  Repeatable.
        #[arg(long = "arg")]
        args: Vec<String>,
    },

    /// List the available catalogs with their names from `Languages.xml`.
    Languages,

    /// Store the UI language in the config file, like the GUI settings dialog.
    ///
    /// An empty tag is not accepted; edit the file to go back to the system
    /// locale.
    SetLanguage {
        tag: LocaleTag,
    },
}

impl Cli {
    /// Loads the configuration and applies command-line overrides.
    fn settings(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => match load_config() {
                Err(ConfigError::NoPlatformConfigDir) => AppConfig::default(),
                other => other.context("failed to load config")?,
            },
        };
        if let Some(dir) = &self.dir {
            config.catalogs.directory = dir.clone();
        }
        Ok(config)
    }
}

/// The file `set-language` writes to: `--config`, else the platform default.
fn config_target(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => config_file_path().context("no config file location on this platform"),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Takes the language tag from a file name such as `gui_cs-CZ.ts`.
fn tag_from_file_name(path: &Path, prefix: &str) -> Option<LocaleTag> {
    let stem = path.file_stem()?.to_str()?;
    LocaleTag::parse(stem.strip_prefix(prefix)?).ok()
}

fn run_check(config: &AppConfig, files: &[PathBuf], strict: bool) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    let mut failed = 0;
    let mut unclean = 0;

    for path in files {
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mut options = config.catalogs.load_options();
        options.default_language = tag_from_file_name(path, &config.catalogs.file_prefix);

        match parse_catalog(&bytes, &options) {
            Ok(catalog) => {
                let report = CatalogReport::from_catalog(&catalog);
                if !report.is_clean() {
                    unclean += 1;
                }
                writeln!(out, "{}: {}", path.display(), report.summary())?;
            }
            Err(e) => {
                error!("{}: {e}", path.display());
                writeln!(out, "{}: error: {e}", path.display())?;
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} catalog(s) failed to load", files.len());
    }
    if strict && unclean > 0 {
        bail!("{unclean} catalog(s) have duplicate messages or placeholder mismatches");
    }
    Ok(())
}

fn run_report(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let source = DirectoryCatalogSource::from_config(&config.catalogs);
    let set = load_catalog_set(&source)
        .with_context(|| format!("failed to load catalogs from {}", source.directory().display()))?;
    let reports: Vec<CatalogReport> = set
        .iter()
        .map(|(_, catalog)| CatalogReport::from_catalog(catalog))
        .collect();

    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
    } else {
        for report in &reports {
            writeln!(out, "{}", report.summary())?;
        }
    }
    Ok(())
}

fn run_lookup(
    config: &AppConfig,
    locale: Option<LocaleTag>,
    context: &str,
    source_text: &str,
    args: &[String],
) -> anyhow::Result<()> {
    let requested = match locale {
        Some(tag) => Some(tag),
        None => config
            .general
            .requested_language()
            .context("invalid general.language in config")?
            .or_else(system_locale),
    };

    let translator = Translator::new(Arc::new(DirectoryCatalogSource::from_config(&config.catalogs)));
    match &requested {
        Some(tag) => match translator.switch_language(tag)? {
            LocaleMatch::Source => warn!("no catalog for {tag}; showing source text"),
            chosen => info!("resolving with {chosen:?}"),
        },
        None => warn!("no language configured or detected; showing source text"),
    }

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", translator.tr_args(context, source_text, args))?;
    Ok(())
}

fn run_languages(config: &AppConfig) -> anyhow::Result<()> {
    let source = DirectoryCatalogSource::from_config(&config.catalogs);
    let available = source.available()?;
    let names = source.language_names().unwrap_or_else(|e| {
        warn!("language names unavailable: {e}");
        Vec::new()
    });

    let mut out = std::io::stdout().lock();
    for tag in &available {
        let name = names
            .iter()
            .find(|info| &info.ietf_code == tag)
            .map_or("", |info| info.name.as_str());
        writeln!(out, "{tag}\t{name}")?;
    }
    Ok(())
}

/// Writes `tag` as `general.language`, keeping the rest of `config`.
fn run_set_language(mut config: AppConfig, path: &Path, tag: &LocaleTag) -> anyhow::Result<()> {
    config.general.language = tag.to_string();
    save_config_to(path, &config).with_context(|| format!("failed to save {}", path.display()))?;
    info!("language set to {tag} in {}", path.display());
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.settings()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise the configured level applies.  Logs go to
    // stderr so command output on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Check { files, strict } => run_check(&config, &files, strict),
        Command::Report { json } => run_report(&config, json),
        Command::Lookup {
            locale,
            context,
            source,
            args,
        } => run_lookup(&config, locale, &context, &source, &args),
        Command::Languages => run_languages(&config),
        Command::SetLanguage { tag } => {
            let path = config_target(cli.config.as_deref())?;
            run_set_language(config, &path, &tag)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
