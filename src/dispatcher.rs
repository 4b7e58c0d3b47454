//! Command dispatcher that routes parsed [`Command`]s to the filter cascade
//! and prints the results.
//!
//! A [`Session`] is the event-dispatch side of the screener: it owns the
//! controller and redraws the table whenever the adapter signals a reset.

use anyhow::{anyhow, Result};
use colored::Colorize;
use tracing::info;

use crate::commands::Command;
use crate::dataset::{Column, Dataset};
use crate::filter::{FilterController, Preset};
use crate::parse::parse_bound;
use crate::render::{render_json, render_summary, render_table, ResetTracker};

/// What the caller should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Session {
    controller: FilterController,
    resets: ResetTracker,
    json_output: bool,
}

impl Session {
    pub fn new(dataset: Dataset, json_output: bool) -> Self {
        let mut controller = FilterController::with_default_table(dataset);
        let resets = ResetTracker::new();
        controller.table_mut().subscribe(resets.observer());
        Self {
            controller,
            resets,
            json_output,
        }
    }

    pub fn controller(&self) -> &FilterController {
        &self.controller
    }

    /// Rendered table if the view changed since the last call.
    pub fn take_redraw(&self) -> Option<String> {
        self.resets.take().map(|_| self.render())
    }

    pub fn render(&self) -> String {
        if self.json_output {
            return render_json(self.controller.view())
                .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e));
        }
        let view = self.controller.view();
        format!(
            "{}\n{}",
            render_table(self.controller.table()),
            render_summary(view.len(), self.controller.dataset().len())
        )
    }

    /// Case-insensitive match against the loaded segments.
    fn resolve_segment(&self, name: &str) -> Result<String> {
        let segments = self.controller.segments();
        segments
            .iter()
            .find(|s| s.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "Unknown segment '{}'. Available: {}",
                    name,
                    segments.join(", ")
                )
            })
    }
}

/// Route a parsed command to its handler
pub fn dispatch_command(session: &mut Session, command: Command) -> Result<Flow> {
    match command {
        Command::Show => {
            session.resets.take();
            println!("{}", session.render());
        }
        Command::Segment { name } => {
            let segment = name.map(|n| session.resolve_segment(&n)).transpose()?;
            info!("Segment -> {:?}", segment);
            session.controller.set_segment(segment.as_deref());
        }
        Command::Set {
            column,
            side,
            value,
        } => {
            session.controller.set_bound(column, side, &value);
            if parse_bound(&value).is_none() {
                eprintln!(
                    "{} '{}' is not a number; {} {:?} left unset",
                    "Warning:".yellow().bold(),
                    value,
                    column.key(),
                    side
                );
            }
        }
        Command::Unset { column, side } => {
            session.controller.set_bound_value(column, side, None);
        }
        Command::Preset { preset } => {
            session.controller.apply_preset(preset);
        }
        Command::Clear => session.controller.clear(),
        Command::Tickers => {
            print_list(session.json_output, session.controller.tickers())?;
        }
        Command::Segments => {
            print_list(session.json_output, &session.controller.segments())?;
        }
        Command::State => print_state(session)?,
        Command::Help => print_help(),
        Command::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

fn print_list(json_output: bool, items: &[String]) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        for item in items {
            println!("{}", item);
        }
    }
    Ok(())
}

fn print_state(session: &Session) -> Result<()> {
    let state = session.controller.state();
    if session.json_output {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }
    println!(
        "  {:<10} {}",
        "segment".bold(),
        state.segment.as_deref().unwrap_or("Todos")
    );
    if state.ranges.is_empty() {
        println!("  {:<10} none", "ranges".bold());
    }
    for (column, range) in &state.ranges {
        println!("  {:<10} {}", column.key().bold(), range);
    }
    Ok(())
}

fn print_help() {
    let fields: Vec<&str> = Column::FILTERABLE.iter().map(|c| c.key()).collect();
    let presets: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
    println!("Available commands:");
    println!("  show                         - Show the filtered table");
    println!("  segment <name|todos>         - Select a segment");
    println!("  set <field> <min|max> <v>    - Set a range bound (pt-BR number, e.g. 0,94)");
    println!("  unset <field> <min|max>      - Remove a range bound");
    println!("  preset <name>                - Apply a preset");
    println!("  clear                        - Remove every range bound");
    println!("  tickers                      - List tickers of the active segment");
    println!("  segments                     - List segments");
    println!("  state                        - Show active filters");
    println!("  help                         - Show this help");
    println!("  exit                         - Exit application");
    println!("\nFields:  {}", fields.join(", "));
    println!("Presets: {}", presets.join(", "));
}
