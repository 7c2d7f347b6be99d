//! Menu input seam
//!
//! The session reads one short token at a time. Console input goes
//! through dialoguer; tests feed a scripted sequence instead.

use anyhow::Result;
use dialoguer::{Input, theme::ColorfulTheme};

pub trait MenuInput {
    /// Read one navigation token. Tokens are trimmed and lowercased;
    /// empty input comes back as an empty string.
    fn read_token(&mut self, prompt: &str) -> Result<String>;
}

pub struct ConsoleInput;

impl MenuInput for ConsoleInput {
    fn read_token(&mut self, prompt: &str) -> Result<String> {
        let raw: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(raw.trim().to_lowercase())
    }
}
