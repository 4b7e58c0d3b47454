//! Filter cascade: segment -> ticker list -> range filters -> table.
//!
//! Every recompute runs synchronously on the caller's thread. The table
//! adapter only ever receives a freshly built view; nothing is mutated in
//! place.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::dataset::{Column, Dataset, DatasetView};
use crate::filter::{apply_ranges, resolve_segment, BoundSide, FilterState, Preset, RangeConstraint};
use crate::parse::parse_bound;
use crate::table::TableAdapter;

pub struct FilterController {
    dataset: Dataset,
    state: FilterState,
    /// Rows of the active segment, before range filters.
    segment_rows: Vec<usize>,
    tickers: Vec<String>,
    table: TableAdapter,
}

impl FilterController {
    /// Builds the controller and runs a first full recompute.
    pub fn new(dataset: Dataset, table: TableAdapter) -> Self {
        let mut controller = Self {
            dataset,
            state: FilterState::default(),
            segment_rows: Vec::new(),
            tickers: Vec::new(),
            table,
        };
        controller.refresh_segment();
        controller.push_filtered();
        controller
    }

    /// Controller with a default table (all columns, display headers).
    pub fn with_default_table(dataset: Dataset) -> Self {
        let table = TableAdapter::with_defaults(Arc::new(DatasetView::empty()));
        Self::new(dataset, table)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn table(&self) -> &TableAdapter {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableAdapter {
        &mut self.table
    }

    /// The currently visible view.
    pub fn view(&self) -> &Arc<DatasetView> {
        self.table.view()
    }

    /// Sorted tickers of the active segment, ignoring range filters.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn segments(&self) -> Vec<String> {
        self.dataset.segments()
    }

    /// `None` selects every segment.
    pub fn set_segment(&mut self, segment: Option<&str>) {
        self.state.segment = segment.map(str::to_string);
        self.refresh_segment();
        self.push_filtered();
    }

    /// Edit one bound from raw input text. Unparsable text unsets the bound.
    pub fn set_bound(&mut self, column: Column, side: BoundSide, text: &str) {
        let value = parse_bound(text);
        self.set_bound_value(column, side, value);
    }

    pub fn set_bound_value(&mut self, column: Column, side: BoundSide, value: Option<Decimal>) {
        self.state.set_bound(column, side, value);
        self.push_filtered();
    }

    pub fn set_range(&mut self, column: Column, min: Option<Decimal>, max: Option<Decimal>) {
        self.state.set_range(column, RangeConstraint::new(min, max));
        self.push_filtered();
    }

    /// Unset every range constraint; the segment stays selected.
    pub fn clear(&mut self) {
        self.state.clear_ranges();
        self.recompute();
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        debug!("Applying preset {}", preset);
        for &(column, side, value) in preset.bounds() {
            self.state.set_bound(column, side, Some(value));
        }
        self.recompute();
    }

    /// Full pass: segment resolution then range filtering.
    pub fn recompute(&mut self) {
        self.segment_rows = resolve_segment(&self.dataset, self.state.segment.as_deref());
        self.push_filtered();
    }

    /// Stage 1 and the derived ticker list.
    fn refresh_segment(&mut self) {
        self.segment_rows = resolve_segment(&self.dataset, self.state.segment.as_deref());
        let working = DatasetView::new(self.dataset.clone(), self.segment_rows.clone());
        self.tickers = working.tickers();
    }

    /// Stage 2 over the cached segment rows, then swap into the table.
    fn push_filtered(&mut self) {
        let rows = apply_ranges(&self.dataset, &self.segment_rows, &self.state);
        debug!(
            segment = ?self.state.segment,
            constraints = self.state.ranges.len(),
            "Filtered {} of {} rows",
            rows.len(),
            self.segment_rows.len()
        );
        let view = DatasetView::new(self.dataset.clone(), rows);
        self.table.set_dataset(Arc::new(view));
    }
}
