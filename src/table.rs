use crate::models::RawJob;

pub const MAX_ROWS: usize = 50;

const TITLE_WIDTH: usize = 30;
const COMPANY_WIDTH: usize = 25;
const LOCATION_WIDTH: usize = 20;
const SOURCE_WIDTH: usize = 12;

/// Render the first `MAX_ROWS` jobs as a fixed-width table. Truncation is
/// display-only; the jobs themselves are untouched.
pub fn render_table(jobs: &[RawJob]) -> String {
    let mut lines = vec![
        format!(
            "{:<4} {:<TITLE_WIDTH$} {:<COMPANY_WIDTH$} {:<LOCATION_WIDTH$} {:<SOURCE_WIDTH$}",
            "#", "TITLE", "COMPANY", "LOCATION", "SOURCE"
        ),
        "-".repeat(4 + TITLE_WIDTH + COMPANY_WIDTH + LOCATION_WIDTH + SOURCE_WIDTH + 4),
    ];

    lines.extend(jobs.iter().take(MAX_ROWS).enumerate().map(|(i, job)| {
        format!(
            "{:<4} {:<TITLE_WIDTH$} {:<COMPANY_WIDTH$} {:<LOCATION_WIDTH$} {:<SOURCE_WIDTH$}",
            i + 1,
            truncate(&job.title, TITLE_WIDTH),
            truncate(&job.company, COMPANY_WIDTH),
            truncate(&job.location, LOCATION_WIDTH),
            job.site
        )
    }));

    if jobs.len() > MAX_ROWS {
        lines.push(format!(
            "...and {} more (all will be exported)",
            jobs.len() - MAX_ROWS
        ));
    }

    lines.join("\n")
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
