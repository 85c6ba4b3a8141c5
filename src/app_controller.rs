use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::chunking::{ChunkReport, build_chunks};
use crate::drivers::{DriverLauncher, LaunchOptions, RemoteDriver};
use crate::errors::{AppError, SessionError};
use crate::file_utils::FileManager;
use crate::session::{SessionTiming, TranslationSession};

// @module: Application controller for chunked browser translation

/// Number of page source characters shown by `probe`
const PROBE_PREVIEW_CHARS: usize = 300;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of chunks submitted
    pub chunks: usize,
    /// Characters read from the input file
    pub input_chars: usize,
    /// Characters written to the output file
    pub output_chars: usize,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate `input_file` into `output_file`
    ///
    /// The input is read before any browser is launched, and the output is
    /// only written once every chunk has been translated.
    pub async fn run<L: DriverLauncher>(
        &self,
        launcher: &L,
        input_file: &Path,
        output_file: &Path,
    ) -> Result<RunSummary, AppError> {
        let start_time = Instant::now();

        let input_text = FileManager::load_input(input_file)?;

        info!("Preprocessing data...");
        let chunks = build_chunks(&input_text, self.config.char_limit);
        let report = ChunkReport::new(&input_text, &chunks);
        if self.config.verbose {
            Self::log_report(&report, self.config.char_limit);
        }

        let translation = self.translate_chunks(launcher, &chunks).await?;

        info!("Writing results to file...");
        // Chunk boundaries are not re-delimited
        let output_text = translation.concat();
        FileManager::write_to_file(output_file, &output_text)?;

        let summary = RunSummary {
            chunks: chunks.len(),
            input_chars: report.input_chars,
            output_chars: output_text.chars().count(),
            elapsed: start_time.elapsed(),
        };

        info!(
            "Success: {} ({} chunks in {})",
            output_file.display(),
            summary.chunks,
            Self::format_duration(summary.elapsed)
        );

        Ok(summary)
    }

    /// Open the bare translator page and return the start of its markup
    ///
    /// The source is read right after loading, without the settle delay, so
    /// this only checks that the browser stack works.
    pub async fn probe<L: DriverLauncher>(&self, launcher: &L) -> Result<String, AppError> {
        let mut session = self.open_session(launcher).await?;

        let result = async {
            session.navigate(&self.config.translator_url, Duration::ZERO).await?;
            session.page_source().await
        }
        .await;

        let source = Self::finish(&mut session, result).await?;
        Ok(source.chars().take(PROBE_PREVIEW_CHARS).collect())
    }

    fn navigation_url(&self) -> Result<String, AppError> {
        self.config
            .navigation_url()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    async fn open_session<L: DriverLauncher>(
        &self,
        launcher: &L,
    ) -> Result<TranslationSession<L::Driver>, AppError> {
        let options = LaunchOptions::from(&self.config.browser);
        let session = TranslationSession::initialize(launcher, &options, self.config.selectors.clone()).await?;
        info!("Browser initialized");
        Ok(session)
    }

    /// Run all chunks through one browser session and always release it
    async fn translate_chunks<L: DriverLauncher>(
        &self,
        launcher: &L,
        chunks: &[String],
    ) -> Result<Vec<String>, AppError> {
        let url = self.navigation_url()?;
        let timing = SessionTiming::from(&self.config);
        let mut session = self.open_session(launcher).await?;

        let result = Self::drive(&mut session, &url, chunks, &timing).await;
        Self::finish(&mut session, result).await
    }

    async fn drive<D: RemoteDriver>(
        session: &mut TranslationSession<D>,
        url: &str,
        chunks: &[String],
        timing: &SessionTiming,
    ) -> Result<Vec<String>, SessionError> {
        session.navigate(url, timing.settle_delay).await?;
        session.locate_input_element(timing.element_timeout).await?;

        let progress_bar = ProgressBar::new(chunks.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let result = session
            .translate_all(chunks, timing, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;

        progress_bar.finish_and_clear();
        result
    }

    /// Close the session on every path; a run error wins over a close error
    async fn finish<D: RemoteDriver, T>(
        session: &mut TranslationSession<D>,
        result: Result<T, SessionError>,
    ) -> Result<T, AppError> {
        if let Err(close_error) = session.close().await {
            warn!("Failed to shut down browser session: {}", close_error);
        } else {
            debug!("Browser shut down");
        }
        result.map_err(AppError::from)
    }

    fn log_report(report: &ChunkReport, char_limit: usize) {
        info!("Input text contains {} characters.", report.input_chars);
        info!("Found {} chunks!", report.chunk_count());
        info!("Sizes: {:?} characters each.", report.chunk_sizes);
        let oversized = report.oversized(char_limit);
        if oversized > 0 {
            warn!("{} chunk(s) exceed the {} character limit", oversized, char_limit);
        }
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
