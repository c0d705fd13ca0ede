use anyhow::Result;
use console::style;
use std::path::PathBuf;

use crate::export::export_jobs;
use crate::models::{Board, Config, JobType, RawJob};
use crate::prompt::Prompter;
use crate::search::{search_jobs, JobSearcher};
use crate::settings::SettingsStore;

const BANNER: &str = r"
     ╦╔═╗╔╗ ╔═╗╔═╗╔═╗╦╔═╔═╗╦═╗
     ║║ ║╠╩╗╠═╝╠═╣║  ╠╩╗║╣ ╠╦╝
    ╚╝╚═╝╚═╝╩  ╩ ╩╚═╝╩ ╩╚═╝╩╚═
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Searching,
    SettingsEditing,
    Exporting,
    Exited,
}

/// Everything the menu carries between visits.
#[derive(Debug, Default)]
pub struct Session {
    pub config: Config,
    pub jobs: Vec<RawJob>,
    pub last_search_term: String,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

pub struct Menu<'a> {
    store: &'a SettingsStore,
    searcher: &'a dyn JobSearcher,
    prompter: &'a mut dyn Prompter,
    output_dir: PathBuf,
}

impl<'a> Menu<'a> {
    pub fn new(
        store: &'a SettingsStore,
        searcher: &'a dyn JobSearcher,
        prompter: &'a mut dyn Prompter,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            searcher,
            prompter,
            output_dir,
        }
    }

    pub fn run(&mut self, mut session: Session) -> Result<Session> {
        let mut state = MenuState::MainMenu;
        while state != MenuState::Exited {
            state = self.step(state, &mut session)?;
            tracing::debug!(?state, "menu transition");
        }
        println!("\n{}\n", style("Goodbye!").blue().bold());
        Ok(session)
    }

    pub fn step(&mut self, state: MenuState, session: &mut Session) -> Result<MenuState> {
        match state {
            MenuState::MainMenu => self.main_menu(),
            MenuState::Searching => {
                let (jobs, term) = search_jobs(self.searcher, &mut *self.prompter, &session.config)?;
                session.jobs = jobs;
                session.last_search_term = term;
                Ok(MenuState::MainMenu)
            }
            MenuState::SettingsEditing => {
                self.settings_menu(&mut session.config)?;
                Ok(MenuState::MainMenu)
            }
            MenuState::Exporting => {
                export_jobs(
                    &session.jobs,
                    &session.last_search_term,
                    &mut *self.prompter,
                    &self.output_dir,
                )?;
                Ok(MenuState::MainMenu)
            }
            MenuState::Exited => Ok(MenuState::Exited),
        }
    }

    fn main_menu(&mut self) -> Result<MenuState> {
        println!("\n{}", style("Main Menu").cyan().bold());
        println!("  [1] Search for Jobs");
        println!("  [2] Settings");
        println!("  [3] Export Results");
        println!("  [4] Exit");
        println!();

        let choice = self
            .prompter
            .choice("Select option", &["1", "2", "3", "4"], "1")?;

        Ok(match choice.as_str() {
            "1" => MenuState::Searching,
            "2" => MenuState::SettingsEditing,
            "3" => MenuState::Exporting,
            _ => MenuState::Exited,
        })
    }

    // Edits apply in memory; only leaving with 0 writes the file.
    fn settings_menu(&mut self, config: &mut Config) -> Result<()> {
        loop {
            print_settings(config);

            let choice = self.prompter.choice(
                "Select option",
                &["0", "1", "2", "3", "4", "5", "6"],
                "0",
            )?;

            match choice.as_str() {
                "0" => {
                    match self.store.save(config) {
                        Ok(()) => println!(
                            "{}",
                            style(format!("Settings saved to {}", self.store.path().display())).dim()
                        ),
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to save settings");
                            println!("{}", style(format!("Could not save settings: {:#}", e)).red());
                        }
                    }
                    return Ok(());
                }
                "1" => {
                    let answer = self
                        .prompter
                        .text("Default search terms", &config.default_search)?;
                    config.default_search = answer.trim().to_string();
                }
                "2" => {
                    let answer = self
                        .prompter
                        .text("Default location", &config.default_location)?;
                    config.default_location = answer.trim().to_string();
                }
                "3" => {
                    config.results_per_site = self
                        .prompter
                        .integer("Results per site", config.results_per_site)?;
                }
                "4" => {
                    config.remote_only = self
                        .prompter
                        .confirm("Remote jobs only?", config.remote_only)?;
                }
                "5" => {
                    println!(
                        "\nJob Types: {}, fulltime, parttime, internship, contract",
                        style("(none)").dim()
                    );
                    // A blank answer clears the filter
                    let current = config.job_type.map(|t| t.as_str()).unwrap_or("Any");
                    let answer = self
                        .prompter
                        .text(&format!("Job type (currently {})", current), "")?;
                    match parse_job_type_answer(&answer) {
                        Some(job_type) => config.job_type = job_type,
                        None => println!(
                            "{}",
                            style(format!("Unknown job type '{}', keeping current", answer.trim())).red()
                        ),
                    }
                }
                "6" => {
                    config.job_boards = self.select_job_boards(&config.job_boards)?;
                }
                _ => {}
            }
        }
    }

    fn select_job_boards(&mut self, current: &[Board]) -> Result<Vec<Board>> {
        println!(
            "\n{} (comma-separated numbers)",
            style("Select Job Boards").bold()
        );
        for (i, board) in Board::CATALOG.iter().enumerate() {
            let status = if current.contains(board) {
                style("✓").green()
            } else {
                style("○").dim()
            };
            println!("  {} [{}] {}", status, i + 1, board);
        }
        println!("\nEnter numbers (e.g., 1,2,3) or 'all' for all boards");

        let answer = self.prompter.text("Selection", "all")?;
        match parse_board_selection(&answer) {
            Some(selected) => Ok(selected),
            None => {
                println!("{}", style("Invalid selection, keeping current boards").red());
                Ok(current.to_vec())
            }
        }
    }
}

pub fn print_banner() {
    println!("{}", style("Job Harvester for Cleansheet").blue().bold());
    println!("{}", BANNER);
    println!("{}", style("Powered by JobSpy").dim());
}

fn print_settings(config: &Config) {
    let value = |s: String| style(s).yellow();
    let search = if config.default_search.is_empty() {
        "(none)".to_string()
    } else {
        config.default_search.clone()
    };
    let job_type = config
        .job_type
        .map(|t| t.to_string())
        .unwrap_or_else(|| "Any".to_string());
    let boards: Vec<&str> = config.job_boards.iter().map(Board::as_str).collect();

    println!("\n{}", style("Settings").cyan().bold());
    println!("  [1] Default Search: {}", value(search));
    println!("  [2] Default Location: {}", value(config.default_location.clone()));
    println!("  [3] Results per Site: {}", value(config.results_per_site.to_string()));
    println!("  [4] Remote Only: {}", value(config.remote_only.to_string()));
    println!("  [5] Job Type: {}", value(job_type));
    println!("  [6] Job Boards: {}", value(boards.join(", ")));
    println!("  [0] Back to Main Menu");
    println!();
}

/// `Some(None)` clears the filter, `None` means the answer was not a job type.
fn parse_job_type_answer(answer: &str) -> Option<Option<JobType>> {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("any") || answer == "(none)" {
        return Some(None);
    }
    JobType::parse(answer).map(Some)
}

/// "all" picks every board; otherwise 1-based indices, comma-separated.
/// Out-of-range indices are dropped. Returns `None` when nothing valid
/// was picked or any entry is not a number.
pub fn parse_board_selection(input: &str) -> Option<Vec<Board>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Some(Board::CATALOG.to_vec());
    }

    let mut indices = Vec::new();
    for token in input.split(',') {
        let index: i64 = token.trim().parse().ok()?;
        if index >= 1 && index <= Board::CATALOG.len() as i64 {
            indices.push(index as usize - 1);
        }
    }

    let selected: Vec<Board> = Board::CATALOG
        .iter()
        .enumerate()
        .filter(|(i, _)| indices.contains(i))
        .map(|(_, board)| *board)
        .collect();

    if selected.is_empty() { None } else { Some(selected) }
}
