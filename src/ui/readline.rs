//! Readline wrapper with command completion for the screener REPL.

use std::path::PathBuf;

use itertools::Itertools;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};
use tracing::{debug, warn};

use crate::dataset::Column;
use crate::filter::Preset;

/// Token sequences the completer offers, e.g. `["set", "pvp", "min"]`.
pub fn command_patterns(segments: &[String]) -> Vec<Vec<String>> {
    let mut patterns: Vec<Vec<String>> = ["show", "clear", "tickers", "segments", "state", "help", "exit", "quit"]
        .iter()
        .map(|k| vec![k.to_string()])
        .collect();

    patterns.push(vec!["segment".into(), "todos".into()]);
    for segment in segments {
        patterns.push(vec!["segment".into(), segment.clone()]);
    }
    for column in Column::FILTERABLE {
        for side in ["min", "max"] {
            patterns.push(vec!["set".into(), column.key().into(), side.into()]);
            patterns.push(vec!["unset".into(), column.key().into(), side.into()]);
        }
    }
    for preset in Preset::ALL {
        patterns.push(vec!["preset".into(), preset.name().into()]);
    }
    patterns
}

/// Completions for the text before the cursor: the byte offset where the
/// last token starts, and the sorted, unique replacements for it.
pub fn complete_tokens(patterns: &[Vec<String>], before: &str) -> (usize, Vec<String>) {
    let mut tokens: Vec<&str> = before.split_whitespace().collect();
    if before.chars().last().map_or(true, char::is_whitespace) {
        tokens.push("");
    }
    let Some((&partial, typed)) = tokens.split_last() else {
        return (0, Vec::new());
    };
    let start = before.len() - partial.len();
    let slash = if typed.is_empty() && partial.starts_with('/') { "/" } else { "" };
    let partial = partial.trim_start_matches('/').to_lowercase();

    let candidates: Vec<String> = patterns
        .iter()
        .filter(|pattern| {
            pattern.len() > typed.len()
                && pattern
                    .iter()
                    .zip(typed)
                    .all(|(p, t)| p.eq_ignore_ascii_case(t.trim_start_matches('/')))
        })
        .map(|pattern| &pattern[typed.len()])
        .filter(|candidate| candidate.to_lowercase().starts_with(&partial))
        .map(|candidate| format!("{}{} ", slash, candidate))
        .sorted()
        .dedup()
        .collect();
    (start, candidates)
}

pub struct CommandHelper {
    patterns: Vec<Vec<String>>,
}

impl CommandHelper {
    pub fn new(patterns: Vec<Vec<String>>) -> Self {
        Self { patterns }
    }
}

impl Helper for CommandHelper {}
impl Validator for CommandHelper {}
impl Highlighter for CommandHelper {}
impl Hinter for CommandHelper {
    type Hint = String;
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = complete_tokens(&self.patterns, &line[..pos]);
        let pairs = candidates
            .into_iter()
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();
        Ok((start, pairs))
    }
}

/// Default history file under the user data directory.
pub fn default_history_path() -> PathBuf {
    dir_spec::data_home()
        .map(|dir| dir.join("marginminer"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("history")
}

/// Thin wrapper over `rustyline::Editor` with completion and a history file.
pub struct Readline {
    editor: Editor<CommandHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Readline {
    pub fn new(patterns: Vec<Vec<String>>, history_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CommandHelper::new(patterns)));

        let history_path = history_path.unwrap_or_else(default_history_path);
        if let Some(parent) = history_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Cannot create history dir {}: {}", parent.display(), e);
            }
        }
        if let Err(e) = editor.load_history(&history_path) {
            debug!("No history loaded from {}: {}", history_path.display(), e);
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        let line = self.editor.readline(prompt)?;
        if !line.trim().is_empty() {
            self.editor.add_history_entry(line.as_str())?;
            if let Err(e) = self.editor.append_history(&self.history_path) {
                warn!("Cannot save history to {}: {}", self.history_path.display(), e);
            }
        }
        Ok(line)
    }

    /// Completions with their replacement start index, without terminal input.
    pub fn completions_with_start(&self, line: &str) -> Vec<(usize, String)> {
        if let Some(helper) = self.editor.helper() {
            let pos = line.len();
            let history = self.editor.history();
            if let Ok((start, pairs)) = helper.complete(line, pos, &Context::new(history)) {
                return pairs.into_iter().map(|p| (start, p.replacement)).collect();
            }
        }
        Vec::new()
    }
}
