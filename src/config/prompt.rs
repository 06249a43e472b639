use crate::error::{DeployError, Result};
use dialoguer::{Input, Password};

/// Source of interactive answers
pub trait Prompter {
    /// Ask for a plain value; an empty answer is allowed
    fn input(&mut self, label: &str) -> Result<String>;

    /// Ask for a value without echoing it
    fn secret(&mut self, label: &str) -> Result<String>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, label: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map(|answer| answer.trim().to_string())
            .map_err(|e| DeployError::Prompt(e.to_string()))
    }

    fn secret(&mut self, label: &str) -> Result<String> {
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map(|answer| answer.trim().to_string())
            .map_err(|e| DeployError::Prompt(e.to_string()))
    }
}
