use anyhow::{anyhow, Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::models::{Board, Config, JobType, RawJob, RawRow};
use crate::prompt::Prompter;
use crate::table::render_table;

const COUNTRY: &str = "USA";
const BRIDGE_SCRIPT: &str = include_str!("jobspy_bridge.py");

// --- Search capability ---

/// Anything that can turn search parameters into result rows.
/// `Ok(None)` means the source returned no table at all.
pub trait JobSearcher {
    fn search(&self, params: &SearchParams) -> Result<Option<Vec<RawRow>>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParams {
    pub boards: Vec<Board>,
    pub search_term: String,
    pub location: String,
    pub results_per_board: u32,
    pub remote_only: bool,
    pub job_type: Option<JobType>,
    pub country: String,
}

impl SearchParams {
    pub fn from_config(config: &Config, search_term: &str, location: &str) -> Self {
        Self {
            boards: config.job_boards.clone(),
            search_term: search_term.to_string(),
            location: location.to_string(),
            results_per_board: config.results_per_site,
            remote_only: config.remote_only,
            job_type: config.job_type,
            country: COUNTRY.to_string(),
        }
    }
}

// --- jobspy bridge (shells out to Python) ---

#[derive(Debug, Deserialize)]
struct BridgeOutput {
    rows: Option<Vec<RawRow>>,
}

#[derive(Debug)]
pub struct JobSpySearcher {
    python: String,
}

impl JobSpySearcher {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl JobSearcher for JobSpySearcher {
    fn search(&self, params: &SearchParams) -> Result<Option<Vec<RawRow>>> {
        let input = serde_json::to_vec(params).context("Failed to encode search parameters")?;

        tracing::debug!(python = %self.python, boards = params.boards.len(), "starting jobspy bridge");
        let mut child = Command::new(&self.python)
            .arg("-c")
            .arg(BRIDGE_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| {
                format!(
                    "Failed to run '{}'. Install Python 3 and `pip install python-jobspy`.",
                    self.python
                )
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .context("Failed to send search parameters to jobspy")?;
        }

        let output = child
            .wait_with_output()
            .context("Failed to wait for jobspy")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("unknown error");
            return Err(anyhow!("jobspy failed: {}", reason.trim()));
        }

        let parsed: BridgeOutput =
            serde_json::from_slice(&output.stdout).context("Failed to parse jobspy output")?;
        Ok(parsed.rows)
    }
}

// --- Search orchestration ---

/// Prompt for a term and location, then search. Returns the jobs found
/// and the term that was used.
pub fn search_jobs(
    searcher: &dyn JobSearcher,
    prompter: &mut dyn Prompter,
    config: &Config,
) -> Result<(Vec<RawJob>, String)> {
    println!("\n{}", style("Job Search").cyan().bold());

    let search_term = prompter.text("Job title / keywords", &config.default_search)?;
    let search_term = search_term.trim();
    if search_term.is_empty() {
        println!("{}", style("Search term is required").red());
        return Ok((Vec::new(), String::new()));
    }

    let location = prompter.text("Location", &config.default_location)?;
    Ok(run_search(searcher, config, search_term, location.trim()))
}

pub fn run_search(
    searcher: &dyn JobSearcher,
    config: &Config,
    search_term: &str,
    location: &str,
) -> (Vec<RawJob>, String) {
    if search_term.is_empty() {
        return (Vec::new(), String::new());
    }

    println!(
        "\n{}",
        style(format!(
            "Searching {} boards, {} results each",
            config.job_boards.len(),
            config.results_per_site
        ))
        .dim()
    );
    if config.remote_only {
        println!("{}", style("Remote jobs only").dim());
    }
    if let Some(job_type) = config.job_type {
        println!("{}", style(format!("Job type: {}", job_type)).dim());
    }

    let params = SearchParams::from_config(config, search_term, location);
    let spinner = spinner("Searching job boards...");
    let result = searcher.search(&params);
    spinner.finish_and_clear();

    let rows = match result {
        Ok(Some(rows)) => rows,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, term = search_term, "search failed");
            println!("{}", style(format!("Search error: {}", e)).red());
            return (Vec::new(), search_term.to_string());
        }
    };

    let jobs: Vec<RawJob> = rows.iter().map(RawJob::from_row).collect();
    tracing::info!(count = jobs.len(), term = search_term, "search finished");

    if jobs.is_empty() {
        println!(
            "\n{}",
            style("No jobs found. Try different search terms or location.").yellow()
        );
        return (Vec::new(), search_term.to_string());
    }

    println!("\n{}", style(format!("Found {} jobs!", jobs.len())).green());
    println!("{}", render_table(&jobs));

    (jobs, search_term.to_string())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(template);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
