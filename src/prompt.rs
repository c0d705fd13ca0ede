use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

/// Source of interactive answers. Every prompt carries the value that an
/// empty answer falls back to.
pub trait Prompter {
    fn text(&mut self, prompt: &str, default: &str) -> Result<String>;
    fn integer(&mut self, prompt: &str, default: u32) -> Result<u32>;
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
    fn choice(&mut self, prompt: &str, choices: &[&str], default: &str) -> Result<String>;
}

pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn text(&mut self, prompt: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn integer(&mut self, prompt: &str, default: u32) -> Result<u32> {
        Ok(Input::<u32>::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_text()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn choice(&mut self, prompt: &str, choices: &[&str], default: &str) -> Result<String> {
        let label = format!("{} [{}]", prompt, choices.join("/"));
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .default(default.to_string())
            .validate_with(|answer: &String| -> Result<(), String> {
                if choices.contains(&answer.trim()) {
                    Ok(())
                } else {
                    Err(format!("Please select one of the available options: {}", choices.join(", ")))
                }
            })
            .interact_text()?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use anyhow::anyhow;
    use std::collections::VecDeque;

    /// Replays canned answers. An empty answer takes the prompt default.
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
            }
        }

        pub fn is_exhausted(&self) -> bool {
            self.answers.is_empty()
        }

        fn next(&mut self, prompt: &str) -> Result<String> {
            self.asked.push(prompt.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow!("No scripted answer for prompt '{}'", prompt))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn text(&mut self, prompt: &str, default: &str) -> Result<String> {
            let answer = self.next(prompt)?;
            Ok(if answer.is_empty() { default.to_string() } else { answer })
        }

        fn integer(&mut self, prompt: &str, default: u32) -> Result<u32> {
            let answer = self.next(prompt)?;
            if answer.is_empty() {
                return Ok(default);
            }
            Ok(answer.trim().parse()?)
        }

        fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
            let answer = self.next(prompt)?;
            Ok(match answer.trim().to_lowercase().as_str() {
                "" => default,
                "y" | "yes" => true,
                _ => false,
            })
        }

        fn choice(&mut self, prompt: &str, choices: &[&str], default: &str) -> Result<String> {
            let answer = self.next(prompt)?;
            let answer = if answer.is_empty() { default.to_string() } else { answer };
            if !choices.contains(&answer.as_str()) {
                return Err(anyhow!("'{}' is not one of {:?}", answer, choices));
            }
            Ok(answer)
        }
    }
}
