//! Special commands parser for interactive chat mode
//!
//! This module parses special commands that can be entered during
//! interactive chat sessions. Special commands act on the session directly
//! instead of being routed through the intent classifier:
//! - Force a document conversion with an explicit path
//! - Show this session's conversion records
//! - Display help information
//! - Exit the session
//!
//! Commands are case-insensitive. Anything that is not a special command
//! is a regular agent prompt.

use regex::Regex;

/// Special commands recognized by the interactive loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Convert the document at the given path
    ///
    /// Bypasses the intent classifier and routes straight to the document
    /// handler. Surrounding quotes are stripped from the path.
    Convert(String),

    /// Show this session's conversion records
    History,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be processed as a regular agent prompt.
    None,
}

/// Parse a user input string into a special command
///
/// Bare `convert` (no path) is not a command; it goes through the
/// classifier so the agent can ask for a path.
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Examples
///
/// ```
/// use fiscus::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("convert \"/tmp/w2 form.pdf\"");
/// assert_eq!(cmd, SpecialCommand::Convert("/tmp/w2 form.pdf".to_string()));
///
/// let cmd = parse_special_command("EXIT");
/// assert_eq!(cmd, SpecialCommand::Exit);
///
/// let cmd = parse_special_command("hello agent");
/// assert_eq!(cmd, SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> SpecialCommand {
    let trimmed = input.trim();

    match trimmed.to_lowercase().as_str() {
        "exit" | "quit" => return SpecialCommand::Exit,
        "help" => return SpecialCommand::Help,
        "history" => return SpecialCommand::History,
        _ => {}
    }

    let convert = Regex::new(r"(?i)^convert\s+(.+)$").unwrap();
    if let Some(captures) = convert.captures(trimmed) {
        let path = captures[1].trim().trim_matches('"').trim_matches('\'');
        if !path.is_empty() {
            return SpecialCommand::Convert(path.to_string());
        }
    }

    SpecialCommand::None
}

/// Print help information for interactive chat mode
pub fn print_help() {
    println!(
        r#"
Available commands:

  convert <path>   Convert a tax document (.pdf, .txt, .md) to CSV
  history          Show documents converted in this session
  help             Show this help
  exit, quit       Leave the agent

Anything else is sent to the agent, which decides whether to answer
directly, search the web, or start a document conversion.
"#
    );
}
