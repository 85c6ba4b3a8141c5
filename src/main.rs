// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use webslate::app_config::{self, Config};
use webslate::drivers::webdriver::GeckoLauncher;
use webslate::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a text file (default command)
    Translate(TranslateArgs),

    /// Open the translator page and print the beginning of its source
    Probe(ProbeArgs),

    /// Generate shell completions for webslate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input text file (defaults to the configured input_file)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output text file (defaults to the configured output_file)
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Maximum characters per submitted chunk
    #[arg(long)]
    char_limit: Option<usize>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    show_browser: bool,

    /// Report chunk sizes before translating
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    /// Show the browser window instead of running headless
    #[arg(long)]
    show_browser: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// webslate - translate long texts through a size-limited web translator
///
/// Splits the input into sentence-respecting chunks, submits them one by one
/// to the translator page through Firefox and geckodriver, and writes the
/// concatenated translations.
#[derive(Parser, Debug)]
#[command(name = "webslate")]
#[command(version)]
#[command(about = "Chunked text translation through a browser-driven web translator")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "webslate splits a text file into chunks below the translator's character limit, \
submits them one at a time through a browser session and writes the translations to a file.

EXAMPLES:
    webslate input.txt                          # Translate using conf.json
    webslate -s en -t de input.txt -o out.txt   # Translate from English to German
    webslate --char-limit 3000 -v input.txt     # Larger chunks, report chunk sizes
    webslate probe --show-browser               # Check that the browser can open the translator
    webslate completions bash > webslate.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "webslate", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Probe(args)) => run_probe(args).await,
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

/// Load the config file and apply the log level from the command line or the config
fn load_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    if let Some(level) = log_level {
        log::set_max_level(level_filter(&level.clone().into()));
    }

    let mut config = Config::load_or_create(config_path)?;

    match log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(level_filter(&config.log_level)),
    }

    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.as_ref())?;

    // Override config with CLI options if provided
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(char_limit) = options.char_limit {
        config.char_limit = char_limit;
    }
    if options.show_browser {
        config.browser.headless = false;
    }
    if options.verbose {
        config.verbose = true;
    }

    let input_path = options.input_path.unwrap_or_else(|| config.input_file.clone());
    let output_path = options.output_path.unwrap_or_else(|| config.output_file.clone());

    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?;

    controller
        .run(&GeckoLauncher::new(), &input_path, &output_path)
        .await
        .with_context(|| format!("Translation of {} failed", input_path.display()))?;

    info!("Translation successful.");
    Ok(())
}

async fn run_probe(options: ProbeArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.as_ref())?;
    if options.show_browser {
        config.browser.headless = false;
    }

    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?;

    let preview = controller
        .probe(&GeckoLauncher::new())
        .await
        .map_err(|e| anyhow!("Probe failed: {}", e))?;

    println!("{}", preview);
    Ok(())
}
