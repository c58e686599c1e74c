// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};

use subtl::app_config::Config;
use subtl::app_controller::Controller;
use subtl::providers::{ActiveTranslator, ProviderKind, Translator};
use subtl::translation::{CaptionPipeline, ScriptTable, retranslate_ledger};

/// CLI wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Deepl,
    Libre,
    Luna,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Deepl => ProviderKind::DeepL,
            CliProvider::Libre => ProviderKind::Libre,
            CliProvider::Luna => ProviderKind::Luna,
        }
    }
}

/// subtl - batch subtitle translator
///
/// Translates subtitle files (SRT, WebVTT, LRC) under an input folder using
/// DeepL, LibreTranslate, or LunaTranslator, with a persistent translation
/// cache and validation of every provider result.
#[derive(Parser, Debug)]
#[command(name = "subtl")]
#[command(version = "0.1.0")]
#[command(about = "Batch subtitle translation with caching and validation")]
#[command(long_about = "subtl walks an input folder for subtitle files and translates their dialogue
lines into the configured target language.

Configuration is environment-style: a .env file in the working directory is
loaded first, then the process environment. Recognized keys include
INPUT_PATH, BACKUP_PATH, OUTPUT_PATH, CACHE_PATH, LEDGER_PATH, TRANSLATOR,
and the per-provider DEEPL_*/LIBRE_*/LUNA_* settings.

EXAMPLES:
    subtl                          # Translate ./queue with the configured provider
    subtl -p libre ./subs          # Use LibreTranslate on the ./subs folder
    subtl --log-level debug        # Show classification and cache decisions
    subtl retranslate              # Retry the entries of the rejection ledger

SUPPORTED PROVIDERS:
    deepl - DeepL API, batch translation (requires DEEPL_API_KEY)
    libre - self-hosted LibreTranslate (default http://127.0.0.1:5000/)
    luna  - local LunaTranslator bridge (default http://127.0.0.1:2333/)")]
struct CommandLineOptions {
    /// Input folder to process (overrides INPUT_PATH)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Translation provider to use (overrides TRANSLATOR)
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Set logging level
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Retry the entries of a rejected-translation ledger file
    ///
    /// Each entry is re-submitted through the active provider using its
    /// recorded detected source language, and the outcome is written next
    /// to the input as a "-translated" snapshot.
    Retranslate {
        /// Ledger file to retry (defaults to LEDGER_PATH)
        #[arg(value_name = "LEDGER_FILE")]
        path: Option<PathBuf>,
    },
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // .env first, so Config::from_env sees its keys
    dotenvy::dotenv().ok();

    let mut cli = CommandLineOptions::parse();
    if CustomLogger::init(cli.log_level).is_err() {
        eprintln!("Failed to initialize logger");
    }

    let result = match cli.command.take() {
        Some(Commands::Retranslate { path }) => run_retranslate(cli, path).await,
        None => run(cli).await,
    };
    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run_retranslate(cli: CommandLineOptions, path: Option<PathBuf>) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(provider) = cli.provider {
        config.provider = provider.into();
    }
    config.validate()?;

    let mut translator = ActiveTranslator::from_config(&config)?;
    info!(
        "Using {} ({} -> {})",
        translator.kind().display_name(),
        translator.source_lang().unwrap_or("auto"),
        translator.target_lang()
    );
    translator.init().await?;

    let input = path.unwrap_or_else(|| config.ledger_path.clone());
    let summary = retranslate_ledger(&translator, &input).await?;
    info!(
        "Recovered {} of {} ledger entries, snapshot at {:?}",
        summary.replaced, summary.attempted, summary.output
    );
    Ok(())
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(provider) = cli.provider {
        config.provider = provider.into();
    }
    if let Some(input_path) = cli.input_path {
        config.input_root = input_path;
    }

    let controller = Controller::with_config(config)?;

    let translator = ActiveTranslator::from_config(controller.config())?;
    info!(
        "Using {} ({} -> {})",
        translator.kind().display_name(),
        translator.source_lang().unwrap_or("auto"),
        translator.target_lang()
    );

    let mut pipeline = CaptionPipeline::new(translator, ScriptTable::default());
    // Startup precondition: bad credentials, unreachable backend, or an
    // unsupported language pair halts the run before any file is touched.
    pipeline.init().await?;

    controller.run_with_pipeline(&pipeline).await?;
    Ok(())
}
