use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::language_utils;

/// Application configuration module
/// This module handles loading, validating and saving the run configuration.
/// The configuration is built once per run and passed down by reference.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translator page; languages are appended as `#src/dst/-`
    #[serde(default = "default_translator_url")]
    pub translator_url: String,

    /// Maximum characters per submitted chunk
    #[serde(default = "default_char_limit")]
    pub char_limit: usize,

    /// Browser and driver settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// CSS selectors of the translator page
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Upper bound for the input element to become interactive
    #[serde(default = "default_element_timeout_secs")]
    pub element_timeout_secs: f64,

    /// Unconditional wait after navigation and after each submission
    #[serde(default = "default_fixed_delay_secs")]
    pub fixed_delay_secs: f64,

    /// How to wait for a translation to render
    #[serde(default)]
    pub render_wait: RenderWait,

    /// Default input file
    #[serde(default = "default_input_file")]
    pub input_file: PathBuf,

    /// Default output file
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Log the chunk size report before translating
    #[serde(default)]
    pub verbose: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Browser and driver configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Firefox executable
    #[serde(default = "default_browser_binary")]
    pub binary_path: PathBuf,

    /// geckodriver executable
    #[serde(default = "default_driver_binary")]
    pub driver_path: PathBuf,

    /// Run without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// File receiving the driver's output
    #[serde(default = "default_driver_log")]
    pub driver_log_path: Option<PathBuf>,

    /// How long the driver may take to start accepting connections
    #[serde(default = "default_driver_startup_timeout_secs")]
    pub driver_startup_timeout_secs: f64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary_path: default_browser_binary(),
            driver_path: default_driver_binary(),
            headless: true,
            driver_log_path: default_driver_log(),
            driver_startup_timeout_secs: default_driver_startup_timeout_secs(),
        }
    }
}

/// CSS selectors of the translator page
///
/// These follow the remote page structure and break silently when it changes.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SelectorConfig {
    /// Text box receiving the source text
    #[serde(default = "default_input_selector")]
    pub input: String,

    /// Text box showing the translation
    #[serde(default = "default_output_selector")]
    pub output: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            input: default_input_selector(),
            output: default_output_selector(),
        }
    }
}

/// Strategy for waiting on a rendered translation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenderWait {
    /// Sleep `fixed_delay_secs` and read whatever is rendered
    #[default]
    Fixed,
    /// Poll the output until it is non-empty and unchanged between two reads
    PollUntilStable {
        /// Delay between reads
        #[serde(default = "default_poll_interval_ms")]
        interval_ms: u64,
        /// Give up waiting after this long and read what is there
        #[serde(default = "default_poll_timeout_secs")]
        timeout_secs: f64,
    },
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_translator_url() -> String {
    "https://www.deepl.com/en/translator".to_string()
}

fn default_char_limit() -> usize {
    1500
}

fn default_element_timeout_secs() -> f64 {
    8.0
}

fn default_fixed_delay_secs() -> f64 {
    12.0
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_poll_timeout_secs() -> f64 {
    30.0
}

fn default_input_file() -> PathBuf {
    PathBuf::from("input.txt")
}

fn default_output_file() -> PathBuf {
    PathBuf::from("output.txt")
}

fn default_browser_binary() -> PathBuf {
    PathBuf::from("/usr/bin/firefox")
}

fn default_driver_binary() -> PathBuf {
    PathBuf::from("/opt/geckodriver")
}

fn default_driver_log() -> Option<PathBuf> {
    Some(PathBuf::from("geckodriver.log"))
}

fn default_driver_startup_timeout_secs() -> f64 {
    10.0
}

fn default_input_selector() -> String {
    "d-textarea[name='source'] div[role='textbox']".to_string()
}

fn default_output_selector() -> String {
    "d-textarea[name='target'] div[role='textbox']".to_string()
}

fn default_true() -> bool {
    true
}

/// Seconds as a `Duration`, saturating on values `Duration` cannot hold
pub fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn check_secs(name: &str, value: f64) -> Result<()> {
    Duration::try_from_secs_f64(value)
        .map(|_| ())
        .map_err(|e| anyhow!("{} must be a non-negative number of seconds, got {}: {}", name, value, e))
}

impl Config {
    /// Load a configuration file, writing a default one if none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let source_name = language_utils::get_language_name(&self.source_language)?;
        let _target_name = language_utils::get_language_name(&self.target_language)?;

        if language_utils::language_codes_match(&self.source_language, &self.target_language) {
            warn!("Source and target language are both {}", source_name);
        }

        Url::parse(&self.translator_url)
            .with_context(|| format!("Invalid translator URL: {}", self.translator_url))?;

        if self.char_limit == 0 {
            return Err(anyhow!("char_limit must be greater than zero"));
        }

        check_secs("element_timeout_secs", self.element_timeout_secs)?;
        check_secs("fixed_delay_secs", self.fixed_delay_secs)?;
        check_secs("browser.driver_startup_timeout_secs", self.browser.driver_startup_timeout_secs)?;

        if let RenderWait::PollUntilStable { interval_ms, timeout_secs } = &self.render_wait {
            if *interval_ms == 0 {
                return Err(anyhow!("render_wait.interval_ms must be greater than zero"));
            }
            check_secs("render_wait.timeout_secs", *timeout_secs)?;
        }

        if self.selectors.input.trim().is_empty() || self.selectors.output.trim().is_empty() {
            return Err(anyhow!("Input and output selectors must not be empty"));
        }

        Ok(())
    }

    /// Translator URL with the language pair selected
    pub fn navigation_url(&self) -> Result<String> {
        let source = language_utils::to_url_code(&self.source_language)?;
        let target = language_utils::to_url_code(&self.target_language)?;
        Ok(format!("{}#{}/{}/-", self.translator_url, source, target))
    }

    pub fn fixed_delay(&self) -> Duration {
        secs_to_duration(self.fixed_delay_secs)
    }

    pub fn element_timeout(&self) -> Duration {
        secs_to_duration(self.element_timeout_secs)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            translator_url: default_translator_url(),
            char_limit: default_char_limit(),
            browser: BrowserConfig::default(),
            selectors: SelectorConfig::default(),
            element_timeout_secs: default_element_timeout_secs(),
            fixed_delay_secs: default_fixed_delay_secs(),
            render_wait: RenderWait::default(),
            input_file: default_input_file(),
            output_file: default_output_file(),
            verbose: false,
            log_level: LogLevel::default(),
        }
    }
}
