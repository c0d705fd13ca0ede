use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One row of the external search result, as handed back by the bridge.
pub type RawRow = Map<String, Value>;

pub const EXPORT_TYPE: &str = "jobspy_harvest";
pub const EXPORT_STATUS: &str = "Saved";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Fulltime,
    Parttime,
    Internship,
    Contract,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::Fulltime,
        JobType::Parttime,
        JobType::Internship,
        JobType::Contract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Fulltime => "fulltime",
            JobType::Parttime => "parttime",
            JobType::Internship => "internship",
            JobType::Contract => "contract",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Board {
    #[serde(rename = "indeed")]
    Indeed,
    #[serde(rename = "linkedin")]
    LinkedIn,
    #[serde(rename = "glassdoor")]
    Glassdoor,
    #[serde(rename = "zip_recruiter")]
    ZipRecruiter,
    #[serde(rename = "google")]
    Google,
}

impl Board {
    /// Every board the search bridge knows about, in menu order.
    pub const CATALOG: [Board; 5] = [
        Board::Indeed,
        Board::LinkedIn,
        Board::Glassdoor,
        Board::ZipRecruiter,
        Board::Google,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Board::Indeed => "indeed",
            Board::LinkedIn => "linkedin",
            Board::Glassdoor => "glassdoor",
            Board::ZipRecruiter => "zip_recruiter",
            Board::Google => "google",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::CATALOG.into_iter().find(|b| b.as_str() == s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_search: String,
    pub default_location: String,
    pub results_per_site: u32,
    pub remote_only: bool,
    #[serde(deserialize_with = "lenient_job_type")]
    pub job_type: Option<JobType>,
    #[serde(deserialize_with = "lenient_boards")]
    pub job_boards: Vec<Board>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_search: String::new(),
            default_location: "USA".to_string(),
            results_per_site: 15,
            remote_only: false,
            job_type: None,
            job_boards: Board::CATALOG.to_vec(),
        }
    }
}

// Unknown job types read as "Any" rather than invalidating the whole file.
fn lenient_job_type<'de, D>(deserializer: D) -> Result<Option<JobType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(JobType::parse))
}

// Boards outside the catalog are dropped; the rest of the list is kept.
fn lenient_boards<'de, D>(deserializer: D) -> Result<Vec<Board>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    let mut boards = Vec::with_capacity(raw.len());
    for id in &raw {
        match Board::parse(id) {
            Some(board) => boards.push(board),
            None => tracing::warn!(board = %id, "ignoring unknown job board in settings"),
        }
    }
    Ok(boards)
}

/// A salary bound as it arrived from the search result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Missing,
    Invalid,
    Valid(f64),
}

impl Amount {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Amount::Missing,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => Amount::Valid(v),
                _ => Amount::Invalid,
            },
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Amount::Valid(v),
                _ => Amount::Invalid,
            },
            Some(_) => Amount::Invalid,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Amount::Valid(v) => Some(*v),
            Amount::Missing | Amount::Invalid => None,
        }
    }
}

/// The posting date as it arrived from the search result.
#[derive(Debug, Clone, PartialEq)]
pub enum DatePosted {
    Missing,
    RawText(String),
    Calendar(NaiveDate),
}

impl DatePosted {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => DatePosted::Missing,
            Some(Value::String(s)) if s.trim().is_empty() => DatePosted::Missing,
            Some(Value::String(s)) => match parse_calendar_date(s.trim()) {
                Some(date) => DatePosted::Calendar(date),
                None => DatePosted::RawText(s.clone()),
            },
            Some(other) => DatePosted::RawText(other.to_string()),
        }
    }
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// A scraped posting. Unknown keys are dropped and every recognised key
/// is optional; text fields default to empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RawJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_url: String,
    pub description: String,
    pub site: String,
    pub date_posted: DatePosted,
    pub min_amount: Amount,
    pub max_amount: Amount,
}

impl RawJob {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            title: text_field(row, "title"),
            company: text_field(row, "company"),
            location: text_field(row, "location"),
            job_url: text_field(row, "job_url"),
            description: text_field(row, "description"),
            site: text_field(row, "site"),
            date_posted: DatePosted::from_value(row.get("date_posted")),
            min_amount: Amount::from_value(row.get("min_amount")),
            max_amount: Amount::from_value(row.get("max_amount")),
        }
    }
}

fn text_field(row: &RawRow, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub id: String,
    pub company: String,
    pub title: String,
    pub location: String,
    pub url: String,
    pub description: String,
    pub salary: String,
    pub date_posted: String,
    pub source: String,
    pub status: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "exportType")]
    pub export_type: String,
    pub jobs: Vec<ExportRecord>,
}

impl ExportDocument {
    pub fn new(jobs: Vec<ExportRecord>) -> Self {
        Self {
            export_type: EXPORT_TYPE.to_string(),
            jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_amount_classification() {
        assert_eq!(Amount::from_value(None), Amount::Missing);
        assert_eq!(Amount::from_value(Some(&Value::Null)), Amount::Missing);
        assert_eq!(Amount::from_value(Some(&json!(120000))), Amount::Valid(120000.0));
        assert_eq!(Amount::from_value(Some(&json!(95000.5))), Amount::Valid(95000.5));
        assert_eq!(Amount::from_value(Some(&json!("80000"))), Amount::Valid(80000.0));
        assert_eq!(Amount::from_value(Some(&json!("NaN"))), Amount::Invalid);
        assert_eq!(Amount::from_value(Some(&json!("competitive"))), Amount::Invalid);
        assert_eq!(Amount::from_value(Some(&json!(true))), Amount::Invalid);
    }

    #[test]
    fn test_date_posted_classification() {
        assert_eq!(DatePosted::from_value(None), DatePosted::Missing);
        assert_eq!(DatePosted::from_value(Some(&json!(""))), DatePosted::Missing);

        let expected = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            DatePosted::from_value(Some(&json!("2025-01-15"))),
            DatePosted::Calendar(expected)
        );
        assert_eq!(
            DatePosted::from_value(Some(&json!("2025-01-15T00:00:00"))),
            DatePosted::Calendar(expected)
        );
        assert_eq!(
            DatePosted::from_value(Some(&json!("2025-01-15T09:30:00+02:00"))),
            DatePosted::Calendar(expected)
        );
        assert_eq!(
            DatePosted::from_value(Some(&json!("3 days ago"))),
            DatePosted::RawText("3 days ago".to_string())
        );
    }

    #[test]
    fn test_raw_job_from_row_defaults_missing_fields() {
        let job = RawJob::from_row(&row(json!({
            "title": "Data Engineer",
            "company": null,
            "site": "linkedin",
            "min_amount": 100000,
            "extra_column": "ignored"
        })));

        assert_eq!(job.title, "Data Engineer");
        assert_eq!(job.company, "");
        assert_eq!(job.location, "");
        assert_eq!(job.job_url, "");
        assert_eq!(job.site, "linkedin");
        assert_eq!(job.date_posted, DatePosted::Missing);
        assert_eq!(job.min_amount, Amount::Valid(100000.0));
        assert_eq!(job.max_amount, Amount::Missing);
    }

    #[test]
    fn test_raw_job_non_string_text_field() {
        let job = RawJob::from_row(&row(json!({ "company": 3 })));
        assert_eq!(job.company, "3");
    }

    #[test]
    fn test_config_ignores_unknown_keys_and_fills_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"default_search": "rust", "unknown_key": 1}"#,
        )
        .unwrap();
        assert_eq!(config.default_search, "rust");
        assert_eq!(config.default_location, "USA");
        assert_eq!(config.job_boards, Board::CATALOG.to_vec());
    }

    #[test]
    fn test_config_unknown_job_type_reads_as_any() {
        let config: Config = serde_json::from_str(r#"{"job_type": "temporary"}"#).unwrap();
        assert_eq!(config.job_type, None);

        let config: Config = serde_json::from_str(r#"{"job_type": "contract"}"#).unwrap();
        assert_eq!(config.job_type, Some(JobType::Contract));
    }

    #[test]
    fn test_config_drops_unknown_boards() {
        let config: Config =
            serde_json::from_str(r#"{"job_boards": ["indeed", "bayt", "zip_recruiter"]}"#).unwrap();
        assert_eq!(config.job_boards, vec![Board::Indeed, Board::ZipRecruiter]);
    }

    #[test]
    fn test_board_serialization_uses_bridge_names() {
        let json = serde_json::to_string(&Board::CATALOG).unwrap();
        assert_eq!(
            json,
            r#"["indeed","linkedin","glassdoor","zip_recruiter","google"]"#
        );
    }

    #[test]
    fn test_export_document_field_names() {
        let doc = ExportDocument::new(vec![]);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["exportType"], "jobspy_harvest");
        assert!(value["jobs"].as_array().unwrap().is_empty());
    }
}
