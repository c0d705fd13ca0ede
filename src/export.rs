use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use console::style;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::models::{Amount, DatePosted, EXPORT_STATUS, ExportDocument, ExportRecord, RawJob};
use crate::prompt::Prompter;

const FALLBACK_BASE: &str = "jobs";

static NON_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-]").expect("valid filename pattern"));
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid underscore pattern"));

// --- Filenames ---

pub fn sanitize_term(term: &str) -> String {
    let lowered = term.to_lowercase();
    let replaced = NON_FILENAME_CHARS.replace_all(&lowered, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    let base = collapsed.trim_matches('_');
    if base.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        base.to_string()
    }
}

/// `<base>_<YYYYMMDD>_<HHMMSS><+HHMM>.json`
pub fn default_filename<Tz>(term: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("{}_{}.json", sanitize_term(term), now.format("%Y%m%d_%H%M%S%z"))
}

pub fn resolve_filename(input: &str, default: &str) -> String {
    let name = input.trim();
    let name = if name.is_empty() { default } else { name };
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}

// --- Field conversion ---

pub fn format_salary(min: Amount, max: Amount) -> String {
    match (min.value(), max.value()) {
        (Some(min), Some(max)) => format!("${} - ${}", thousands(min), thousands(max)),
        (Some(min), None) => format!("${}+", thousands(min)),
        (None, Some(max)) => format!("Up to ${}", thousands(max)),
        (None, None) => String::new(),
    }
}

fn thousands(value: f64) -> String {
    let n = value.trunc() as i64;
    let digits = n.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_date(date: &DatePosted, today: NaiveDate) -> String {
    match date {
        DatePosted::Calendar(d) => d.format("%Y-%m-%d").to_string(),
        DatePosted::RawText(s) => s.chars().take(10).collect(),
        DatePosted::Missing => today.format("%Y-%m-%d").to_string(),
    }
}

pub fn to_export_record(job: &RawJob, today: NaiveDate) -> ExportRecord {
    ExportRecord {
        id: uuid::Uuid::new_v4().to_string(),
        company: job.company.clone(),
        title: job.title.clone(),
        location: job.location.clone(),
        url: job.job_url.clone(),
        description: job.description.clone(),
        salary: format_salary(job.min_amount, job.max_amount),
        date_posted: format_date(&job.date_posted, today),
        source: job.site.clone(),
        status: EXPORT_STATUS.to_string(),
        tags: Vec::new(),
    }
}

pub fn build_document(jobs: &[RawJob], today: NaiveDate) -> ExportDocument {
    ExportDocument::new(jobs.iter().map(|job| to_export_record(job, today)).collect())
}

pub fn write_document(path: &Path, document: &ExportDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document).context("Failed to serialize export")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// --- Interactive export ---

/// Ask for a filename and write the jobs out. Returns the written path,
/// or `None` when there was nothing to export or the write failed.
pub fn export_jobs(
    jobs: &[RawJob],
    search_term: &str,
    prompter: &mut dyn Prompter,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    if jobs.is_empty() {
        println!(
            "\n{}",
            style("No jobs to export. Run a search first.").yellow()
        );
        return Ok(None);
    }

    println!(
        "\n{}",
        style(format!("Export {} Jobs", jobs.len())).cyan().bold()
    );

    let now = Local::now();
    let default_name = default_filename(search_term, &now);
    let answer = prompter.text("Filename", &default_name)?;
    let path = output_dir.join(resolve_filename(&answer, &default_name));

    let document = build_document(jobs, now.date_naive());
    match write_document(&path, &document) {
        Ok(()) => {
            tracing::info!(path = %path.display(), count = document.jobs.len(), "export written");
            println!(
                "\n{}",
                style(format!("Exported {} jobs to {}", document.jobs.len(), path.display())).green()
            );
            println!("{}", style("Import this file into Cleansheet Job Opportunities").dim());
            Ok(Some(path))
        }
        Err(e) => {
            tracing::warn!(error = %e, "export failed");
            println!("{}", style(format!("Export failed: {:#}", e)).red());
            Ok(None)
        }
    }
}
