//! Interactive navigation engine
//!
//! A single loop over an explicit menu level. Each menu handler reads
//! one token and returns a [`NavCommand`]; the loop applies it. The
//! installed-tools list is a transparent side view: it never changes the
//! level itself, and whatever the user chooses inside it is applied by
//! the level that invoked it.

mod input;


pub use input::{ConsoleInput, MenuInput};

use anyhow::Result;
use colored::Colorize;

use crate::config::ToolshedConfig;
use crate::dispatch::Dispatch;
use crate::error::ToolshedError;
use crate::models::{Action, ActionResult, ToolCategory, ToolDescriptor};
use crate::report;
use crate::runner::CommandRunner;

/// Where the session currently is. `Tool` is only reachable through a
/// `Category`, so both indices are always valid together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuLevel {
    Main,
    Category(usize),
    Tool { category: usize, tool: usize },
}

/// What a menu handler wants the loop to do next. Handlers never jump
/// levels themselves; the loop applies the command, so every transition
/// is checked in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Stay at (or re-render) the current level.
    Continue,
    /// One level up.
    Back,
    /// Jump to the enclosing category (meaningful from the tool level).
    ToCategory,
    ToMain,
    Quit,
}

/// Map an action letter to an action, honoring the purge gate: tools
/// that do not offer purge simply have no token for it.
pub fn action_for_token(tool: &ToolDescriptor, token: &str) -> Option<Action> {
    match token {
        "i" => Some(Action::Install),
        "r" => Some(Action::Remove),
        "p" if tool.offers_purge() => Some(Action::Purge),
        "c" => Some(Action::Check),
        "v" => Some(Action::Version),
        "u" => Some(Action::Update),
        _ => None,
    }
}

/// Parse a 1-based menu index into a 0-based one.
fn parse_index(token: &str, len: usize) -> Option<usize> {
    let n: usize = token.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

pub struct Session<'a> {
    categories: &'static [ToolCategory],
    dispatcher: &'a dyn Dispatch,
    runner: &'a dyn CommandRunner,
    input: &'a mut dyn MenuInput,
    config: ToolshedConfig,
    level: MenuLevel,
    /// Most recent (tool, action) pair that was dispatched, successful
    /// or not; read only by the repeat token.
    last_action: Option<(&'static ToolDescriptor, Action)>,
}

impl<'a> Session<'a> {
    pub fn new(
        categories: &'static [ToolCategory],
        dispatcher: &'a dyn Dispatch,
        runner: &'a dyn CommandRunner,
        input: &'a mut dyn MenuInput,
        config: ToolshedConfig,
    ) -> Self {
        Self {
            categories,
            dispatcher,
            runner,
            input,
            config,
            level: MenuLevel::Main,
            last_action: None,
        }
    }

    /// Run until the user quits.
    pub fn run(&mut self) -> Result<()> {
        while self.step()? {}
        println!("{}", "Bye.".dimmed());
        Ok(())
    }

    /// One iteration of the loop: render the current level, read input,
    /// apply the resulting command. Returns false when the session ends.
    pub fn step(&mut self) -> Result<bool> {
        let command = match self.level {
            MenuLevel::Main => self.main_menu()?,
            MenuLevel::Category(category) => self.category_menu(category)?,
            MenuLevel::Tool { category, tool } => self.tool_menu(category, tool)?,
        };
        Ok(self.apply(command))
    }

    fn apply(&mut self, command: NavCommand) -> bool {
        match command {
            NavCommand::Quit => return false,
            NavCommand::Continue => {}
            NavCommand::Back => {
                self.level = match self.level {
                    MenuLevel::Main => MenuLevel::Main,
                    MenuLevel::Category(_) => MenuLevel::Main,
                    MenuLevel::Tool { category, .. } => MenuLevel::Category(category),
                };
            }
            NavCommand::ToMain => self.level = MenuLevel::Main,
            NavCommand::ToCategory => {
                if let MenuLevel::Tool { category, .. } = self.level {
                    self.level = MenuLevel::Category(category);
                }
            }
        }
        true
    }

    fn main_menu(&mut self) -> Result<NavCommand> {
        println!("\n{}", "Tool categories".bold());
        for (i, category) in self.categories.iter().enumerate() {
            println!("  {}. {}", i + 1, category.label);
        }
        println!("  [l] list installed tools   [q] quit");

        let token = self.input.read_token("select a category")?;
        match token.as_str() {
            "q" => Ok(NavCommand::Quit),
            "l" => self.show_list(),
            _ => {
                match parse_index(&token, self.categories.len()) {
                    Some(index) => self.level = MenuLevel::Category(index),
                    None => self.print_invalid(&token),
                }
                Ok(NavCommand::Continue)
            }
        }
    }

    fn category_menu(&mut self, category: usize) -> Result<NavCommand> {
        let tools = self.categories[category].tools;
        println!("\n{}", self.categories[category].label.bold());
        for (i, tool) in tools.iter().enumerate() {
            println!("  {}. {}", i + 1, tool.label);
        }
        println!("  [b] back   [l] list installed tools   [q] quit");

        let token = self.input.read_token("select a tool")?;
        match token.as_str() {
            "b" => Ok(NavCommand::Back),
            "q" => Ok(NavCommand::Quit),
            "l" => self.show_list(),
            _ => {
                match parse_index(&token, tools.len()) {
                    Some(index) => {
                        self.level = MenuLevel::Tool {
                            category,
                            tool: index,
                        };
                    }
                    None => self.print_invalid(&token),
                }
                Ok(NavCommand::Continue)
            }
        }
    }

    fn tool_menu(&mut self, category: usize, tool_index: usize) -> Result<NavCommand> {
        let tools = self.categories[category].tools;
        let tool = &tools[tool_index];

        println!("\n{}", tool.label.bold());
        print!("  [i] install   [r] remove");
        if tool.offers_purge() {
            print!("   [p] purge");
        }
        println!();
        println!("  [c] check installed   [v] show version   [u] update");
        println!("  [b] back   [m] main menu   [l] list installed tools   [q] quit");

        let token = self.input.read_token("select an action")?;
        match token.as_str() {
            "b" => Ok(NavCommand::Back),
            "m" => Ok(NavCommand::ToMain),
            "q" => Ok(NavCommand::Quit),
            "l" => self.show_list(),
            _ => match action_for_token(tool, &token) {
                Some(action) => self.run_action(tool, action),
                None => {
                    self.print_invalid(&token);
                    Ok(NavCommand::Continue)
                }
            },
        }
    }

    /// Execute one action against a tool, print its outcome line, then
    /// hand over to the post-action prompt.
    fn run_action(
        &mut self,
        tool: &'static ToolDescriptor,
        action: Action,
    ) -> Result<NavCommand> {
        if action.is_destructive() && self.config.confirm_destructive && !self.confirm(tool, action)? {
            println!("{}", "Cancelled.".yellow());
            return Ok(NavCommand::Continue);
        }

        let result = self.dispatcher.dispatch(tool, action);
        print_outcome(&result);
        self.last_action = Some((tool, action));
        self.post_action_prompt()
    }

    fn confirm(&mut self, tool: &ToolDescriptor, action: Action) -> Result<bool> {
        let prompt = format!("{} {}? type y to confirm", action, tool.label);
        Ok(self.input.read_token(&prompt)? == "y")
    }

    /// Shown immediately after an action. Repeat re-dispatches the
    /// stored pair and stays here; any unrecognized or empty token drops
    /// back to the tool's action menu.
    fn post_action_prompt(&mut self) -> Result<NavCommand> {
        loop {
            let token = self.input.read_token(
                "[b] tool menu  [c] category  [m] main  [r] repeat  [l] list installed",
            )?;
            match token.as_str() {
                "c" => return Ok(NavCommand::ToCategory),
                "m" => return Ok(NavCommand::ToMain),
                "l" => return self.show_list(),
                "r" => match self.last_action {
                    Some((tool, action)) => {
                        let result = self.dispatcher.dispatch(tool, action);
                        print_outcome(&result);
                    }
                    None => println!("{}", "Nothing to repeat yet.".yellow()),
                },
                // "b", empty and anything else: back to the action menu.
                _ => return Ok(NavCommand::Continue),
            }
        }
    }

    /// The cross-cutting installed-tools view. Renders the report, then
    /// lets the user pick where to go; returning `Continue` lands back
    /// at whatever level invoked the list. The category jump only
    /// exists when a category encloses the invoking level.
    fn show_list(&mut self) -> Result<NavCommand> {
        let collected = report::collect(self.runner, self.categories);
        report::print_report(&collected);

        let at_tool_level = matches!(self.level, MenuLevel::Tool { .. });
        let prompt = if at_tool_level {
            "[b] back  [c] category  [m] main  [q] quit"
        } else {
            "[b] back  [m] main  [q] quit"
        };

        loop {
            let token = self.input.read_token(prompt)?;
            match token.as_str() {
                "b" => return Ok(NavCommand::Continue),
                "c" if at_tool_level => return Ok(NavCommand::ToCategory),
                "m" => return Ok(NavCommand::ToMain),
                "q" => return Ok(NavCommand::Quit),
                _ => self.print_invalid(&token),
            }
        }
    }

    fn print_invalid(&self, token: &str) {
        println!(
            "{} {}",
            "✗".red(),
            ToolshedError::InvalidMenuInput(token.to_string())
        );
    }
}

fn print_outcome(result: &ActionResult) {
    match result {
        ActionResult::Success(msg) => println!("{} {}", "✓".green(), msg),
        ActionResult::Failure(msg) => println!("{} {}", "✗".red(), msg),
        ActionResult::NotApplicable(msg) => println!("{} {}", "•".yellow(), msg),
    }
}
