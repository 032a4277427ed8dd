// UI layer: the linear lookup dialogue. Input goes through the `Prompt`
// trait (backed by `dialoguer` on a real terminal) and output through any
// `io::Write`, so the whole flow can be scripted in tests.

use crate::api::{self, MovieDetails, MovieService, MovieSummary};
use crate::config::{self, Settings, MAX_RESULTS};
use crate::error::{Error, Result};
use crate::output::{self, OutputDocument};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Source of user answers. `prompt` is shown without a trailing colon.
pub trait Prompt {
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        (**self).read_line(prompt)
    }
}

/// Plain line reader for piped or redirected input.
///
/// Writes `"<prompt>: "` to `out` and reads one line from `input` with the
/// line ending stripped. End of input is `UnexpectedEof`, which ends the
/// selection loop instead of spinning on it.
pub struct LinePrompt<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, out: W) -> Self {
        LinePrompt { input, out }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{prompt}: ")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            )));
        }
        let answer = line.strip_suffix('\n').unwrap_or(&line);
        Ok(answer.strip_suffix('\r').unwrap_or(answer).to_string())
    }
}

/// Prompt on the controlling terminal, falling back to [`LinePrompt`] over
/// stdin when nobody is attended.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        // dialoguer answers "" without reading when stdin is not a tty.
        if !(std::io::stdin().is_terminal() && console::user_attended_stderr()) {
            tracing::debug!("stdin is not a terminal, reading lines directly");
            return LinePrompt::new(std::io::stdin().lock(), std::io::stderr()).read_line(prompt);
        }
        // Empty answers are passed through; the search accepts them as-is.
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

/// How a session that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoResults,
    Saved(PathBuf),
}

/// One run of the search/select/details dialogue.
pub struct Session<'a, S, P, W> {
    settings: &'a Settings,
    service: &'a S,
    prompt: P,
    out: W,
    progress: bool,
}

impl<'a, S, P, W> Session<'a, S, P, W>
where
    S: MovieService,
    P: Prompt,
    W: Write,
{
    pub fn new(settings: &'a Settings, service: &'a S, prompt: P, out: W) -> Self {
        Session {
            settings,
            service,
            prompt,
            out,
            progress: false,
        }
    }

    /// Show a spinner while requests are in flight.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    /// Run the dialogue once. The credential is loaded before any prompt
    /// or request, so a bad settings file fails without network traffic.
    pub fn run(&mut self) -> Result<Outcome> {
        let api_key = config::load_api_key(&self.settings.config_path)?;

        let query = self.prompt.read_line("Enter a movie title to search")?;
        writeln!(self.out, "Searching for \"{query}\"...")?;

        let spinner = self.spinner("Searching...");
        let search = self.service.search(&query, &api_key);
        spinner.finish_and_clear();
        let search = search?;

        let hits = api::top_results(&search, MAX_RESULTS)?;
        tracing::debug!(shown = hits.len(), "search finished");

        if hits.is_empty() {
            writeln!(self.out, "No results found.")?;
            return Ok(Outcome::NoResults);
        }

        writeln!(self.out, "\nResults:")?;
        for (i, hit) in hits.iter().enumerate() {
            writeln!(self.out, "{}", result_line(i + 1, hit))?;
        }

        let selected = &hits[self.select(hits.len())?];
        let id = selected.require_id()?;

        let spinner = self.spinner("Fetching details...");
        let chosen = self.service.details(id, &api_key);
        spinner.finish_and_clear();
        let chosen = chosen?;

        let details = MovieDetails::from_raw(&chosen);
        writeln!(self.out, "\n=== Movie Details ===")?;
        for line in detail_lines(&details) {
            writeln!(self.out, "{line}")?;
        }

        let path = self.settings.output_path.clone();
        output::save_json(&OutputDocument { search, chosen }, &path)?;
        writeln!(self.out, "\nFull data saved to {}", path.display())?;

        Ok(Outcome::Saved(path))
    }

    /// Re-prompt until the answer is a valid 1-based pick; returns the index.
    fn select(&mut self, count: usize) -> Result<usize> {
        loop {
            writeln!(self.out)?;
            let answer = self
                .prompt
                .read_line(&format!("Select a movie number (1-{count})"))?;
            if let Some(index) = parse_selection(&answer, count) {
                return Ok(index);
            }
            writeln!(self.out, "Invalid input, try again.")?;
        }
    }

    fn spinner(&self, msg: &'static str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

/// Zero-based index for an answer naming a whole number in `1..=count`,
/// `None` otherwise. Decimal, exponent and `0x`/`0o`/`0b` spellings of a
/// whole number count (`1.0`, `1e0`, `0x1`); fractions do not.
pub fn parse_selection(answer: &str, count: usize) -> Option<usize> {
    let n = parse_number(answer.trim())?;
    if n.fract() != 0.0 || n < 1.0 || n > count as f64 {
        return None;
    }
    Some(n as usize - 1)
}

fn parse_number(text: &str) -> Option<f64> {
    let lower = text.to_ascii_lowercase();
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
        }
    }
    // NaN and infinities parse here but never pass the range check.
    text.parse().ok()
}

/// First four characters of the release date, or `N/A` when there is none.
pub fn release_year(date: Option<&str>) -> String {
    match date {
        Some(d) if !d.is_empty() => d.chars().take(4).collect(),
        _ => "N/A".to_string(),
    }
}

/// `"<n>. <title> (<year>)"`
pub fn result_line(number: usize, hit: &MovieSummary) -> String {
    format!(
        "{number}. {} ({})",
        hit.title,
        release_year(hit.release_date.as_deref())
    )
}

pub fn detail_lines(details: &MovieDetails) -> Vec<String> {
    vec![
        format!("Title: {}", details.title),
        format!("Original Title: {}", details.original_title),
        format!("Release Date: {}", details.release_date),
        format!(
            "TMDB Rating: {} ({} votes)",
            details.vote_average, details.vote_count
        ),
        format!("Overview: {}", details.overview),
    ]
}
