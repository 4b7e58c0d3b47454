//! Terminal rendering surface for any [`TableDataSource`].

use std::cell::Cell;
use std::rc::Rc;

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::dataset::DatasetView;
use crate::error::Result;
use crate::format::HorizontalAlign;
use crate::table::{TableDataSource, TableObserver, TableReset};

/// Render the full table, row numbers first.
pub fn render_table(source: &dyn TableDataSource) -> String {
    let columns = source.column_count();
    let mut builder = Builder::default();

    let header = std::iter::once("#".to_string())
        .chain((0..columns).map(|c| source.header(c).bold().to_string()));
    builder.push_record(header);

    for row in 0..source.row_count() {
        let cells = std::iter::once(source.row_header(row))
            .chain((0..columns).map(|c| source.cell_text(row, c)));
        builder.push_record(cells);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.with(Alignment::center_vertical());
    table.modify(Columns::new(0..1), Alignment::right());
    for c in 0..columns {
        let align = match source.alignment(c).horizontal {
            HorizontalAlign::Left => Alignment::left(),
            HorizontalAlign::Right => Alignment::right(),
        };
        // +1 for the row-number column
        table.modify(Columns::new(c + 1..c + 2), align);
    }
    table.to_string()
}

/// One-line summary printed under a table.
pub fn render_summary(shown: usize, total: usize) -> String {
    format!("{} of {} funds", shown.to_string().bold(), total)
}

pub fn render_json(view: &DatasetView) -> Result<String> {
    let records: Vec<_> = view.iter().collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Remembers the latest reset so the REPL knows to redraw.
#[derive(Debug, Clone, Default)]
pub struct ResetTracker {
    last: Rc<Cell<Option<TableReset>>>,
}

impl ResetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer half, to hand to the table adapter.
    pub fn observer(&self) -> Box<dyn TableObserver> {
        Box::new(self.clone())
    }

    /// Take the pending reset, if any.
    pub fn take(&self) -> Option<TableReset> {
        self.last.take()
    }
}

impl TableObserver for ResetTracker {
    fn on_reset(&mut self, reset: &TableReset) {
        self.last.set(Some(*reset));
    }
}
