//! Interactive screener REPL.
//!
//! Each line is one input event: it is parsed, dispatched synchronously to
//! the filter cascade, and the table is redrawn if the view was reset.

pub mod readline;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;

use crate::commands::{parse_command, Command};
use crate::dispatcher::{dispatch_command, Flow, Session};
use crate::filter::Preset;

/// Preset applied when the session opens.
pub const STARTUP_PRESET: Preset = Preset::BrickAnchor;

/// Launch the interactive REPL over a loaded session.
pub fn launch_tui(mut session: Session) -> Result<()> {
    println!("{}", "marginminer - FII screener".bold());
    println!(
        "Type {} for help, {} to exit\n",
        "help".cyan(),
        "exit".cyan()
    );

    let patterns = readline::command_patterns(&session.controller().segments());
    let mut rl = readline::Readline::new(patterns, None)?;

    dispatch_command(
        &mut session,
        Command::Preset {
            preset: STARTUP_PRESET,
        },
    )?;
    println!("{} {}\n", "Preset:".dimmed(), STARTUP_PRESET);
    if let Some(table) = session.take_redraw() {
        println!("{}", table);
    }

    loop {
        match rl.readline("marginminer> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Ok(cmd) => match dispatch_command(&mut session, cmd) {
                        Ok(Flow::Exit) => {
                            println!("Goodbye!");
                            break;
                        }
                        Ok(Flow::Continue) => {
                            if let Some(table) = session.take_redraw() {
                                println!("{}", table);
                            }
                        }
                        Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                    },
                    Err(e) => {
                        eprintln!("{} {}", "Parse error:".yellow().bold(), e.message);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}
