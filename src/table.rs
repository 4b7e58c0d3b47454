//! Read-only table model over the currently visible dataset view.
//!
//! Rendering surfaces only see [`TableDataSource`]; they never touch the
//! dataset directly. The adapter swaps its view wholesale and tells every
//! registered [`TableObserver`] that previously held indices are stale.

use std::sync::Arc;

use crate::dataset::{Column, DatasetView};
use crate::format::{format_value, CellAlignment, ColumnFormats, FormatSpec};

/// What a rendering surface may ask of a table model.
pub trait TableDataSource {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn cell_text(&self, row: usize, column: usize) -> String;
    fn header(&self, column: usize) -> String;
    fn row_header(&self, row: usize) -> String {
        (row + 1).to_string()
    }
    fn alignment(&self, column: usize) -> CellAlignment;
}

/// Sent after the visible dataset was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableReset {
    pub rows: usize,
    pub columns: usize,
}

pub trait TableObserver {
    fn on_reset(&mut self, reset: &TableReset);
}

pub struct TableAdapter {
    columns: Vec<Column>,
    headers: Option<Vec<String>>,
    formats: ColumnFormats,
    view: Arc<DatasetView>,
    observers: Vec<Box<dyn TableObserver>>,
}

impl TableAdapter {
    pub fn new(
        columns: Vec<Column>,
        headers: Option<Vec<String>>,
        formats: ColumnFormats,
        view: Arc<DatasetView>,
    ) -> Self {
        Self {
            columns,
            headers,
            formats,
            view,
            observers: Vec::new(),
        }
    }

    /// All columns, display headers and default formats.
    pub fn with_defaults(view: Arc<DatasetView>) -> Self {
        let headers = Column::ALL.iter().map(|c| c.header().to_string()).collect();
        Self::new(
            Column::ALL.to_vec(),
            Some(headers),
            Column::default_formats(),
            view,
        )
    }

    pub fn subscribe(&mut self, observer: Box<dyn TableObserver>) {
        self.observers.push(observer);
    }

    /// Replace the visible view and signal a full structural reset.
    pub fn set_dataset(&mut self, view: Arc<DatasetView>) {
        self.view = view;
        let reset = TableReset {
            rows: self.row_count(),
            columns: self.column_count(),
        };
        for observer in &mut self.observers {
            observer.on_reset(&reset);
        }
    }

    pub fn view(&self) -> &Arc<DatasetView> {
        &self.view
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Display header first, then the raw column name.
    pub fn format_for(&self, column: usize) -> FormatSpec {
        let explicit = self
            .headers
            .as_ref()
            .and_then(|h| h.get(column))
            .and_then(|label| self.formats.get(label));
        explicit
            .or_else(|| {
                self.columns
                    .get(column)
                    .and_then(|c| self.formats.get(c.name()))
            })
            .unwrap_or(FormatSpec::Text)
    }
}

impl TableDataSource for TableAdapter {
    fn row_count(&self) -> usize {
        self.view.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn cell_text(&self, row: usize, column: usize) -> String {
        let (Some(record), Some(&col)) = (self.view.record(row), self.columns.get(column)) else {
            return String::new();
        };
        format_value(&record.value(col), self.format_for(column))
    }

    fn header(&self, column: usize) -> String {
        if let Some(label) = self.headers.as_ref().and_then(|h| h.get(column)) {
            return label.clone();
        }
        self.columns
            .get(column)
            .map(|c| c.name().to_string())
            .unwrap_or_default()
    }

    fn alignment(&self, column: usize) -> CellAlignment {
        self.format_for(column).alignment()
    }
}
