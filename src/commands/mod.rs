/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes four top-level command modules:

- `chat`    — Interactive chat loop
- `convert` — One-shot document conversion
- `history` — Conversion and session listings
- `special_commands` — Parser for in-chat commands

These handlers are intentionally small and use the library components:
providers, search, storage, and the agent.
*/

pub mod convert;
pub mod history;
pub mod special_commands;

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Runs a readline-based loop that submits user input to the agent and
    //! prints replies. Special commands (convert, history, help, exit) are
    //! intercepted before classification.

    use crate::agent::{Agent, TurnOutcome};
    use crate::commands::history;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::error::Result;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::PathBuf;
    use uuid::Uuid;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `agent` - Configured agent (consumed)
    /// * `session` - Session identifier to resume, or None for a fresh one
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscus::commands::chat;
    ///
    /// // In application code:
    /// // chat::run_chat(agent, None).await?;
    /// ```
    pub async fn run_chat(agent: Agent, session: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let session_id = match session {
            Some(id) => {
                println!("Resuming session {}\n", id.cyan());
                id
            }
            None => {
                print_recent_sessions(&agent)?;
                Uuid::new_v4().to_string()
            }
        };

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner();

        loop {
            match rl.readline("You: ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    rl.add_history_entry(trimmed)?;

                    match parse_special_command(trimmed) {
                        SpecialCommand::Exit => break,
                        SpecialCommand::Help => {
                            print_help();
                            continue;
                        }
                        SpecialCommand::History => {
                            if let Err(e) = history::print_conversions(agent.store(), Some(&session_id))
                            {
                                eprintln!("{}", format!("Error: {:#}", e).red());
                            }
                            continue;
                        }
                        SpecialCommand::Convert(path) => {
                            let source = PathBuf::from(path);
                            match agent
                                .process_document_turn(&session_id, trimmed, &source)
                                .await
                            {
                                Ok(outcome) => print_outcome(&outcome),
                                Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
                            }
                        }
                        SpecialCommand::None => {
                            match agent.process_turn(&session_id, trimmed).await {
                                Ok(outcome) => print_outcome(&outcome),
                                Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner() {
        println!("\n╔══════════════════════════════════════════════╗");
        println!("║           AI Tax & Research Agent            ║");
        println!("║    Chat · Web Search · Document → CSV        ║");
        println!("╠══════════════════════════════════════════════╣");
        println!("║  Commands:                                   ║");
        println!("║    convert <path>   — document to CSV        ║");
        println!("║    history          — list conversions       ║");
        println!("║    help             — show this help         ║");
        println!("║    exit / quit      — leave the agent        ║");
        println!("╚══════════════════════════════════════════════╝\n");
        println!("Type 'help' for available commands, 'exit' to quit\n");
    }

    /// Show the most recently active sessions so the user can resume one
    fn print_recent_sessions(agent: &Agent) -> Result<()> {
        let recent = agent.store().list_recent_sessions(5)?;
        if recent.is_empty() {
            return Ok(());
        }

        println!(
            "Recent sessions (resume with {}):",
            "fiscus chat --session <id>".cyan()
        );
        for session in &recent {
            println!(
                "  {}  {} messages, last active {}",
                session.session_id.cyan(),
                session.message_count,
                session.last_active.format("%Y-%m-%d %H:%M")
            );
        }
        println!();
        Ok(())
    }

    /// Print one turn's reply and artifact notice
    fn print_outcome(outcome: &TurnOutcome) {
        println!("\nAgent: {}\n", outcome.reply);
        if let Some(path) = &outcome.artifact {
            println!("{}", format!("  [CSV saved → {}]\n", path.display()).green());
        }
    }
}
