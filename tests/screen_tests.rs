use marginminer::config::AppConfig;
use marginminer::dataset::{Column, Dataset};
use marginminer::filter::{BoundSide, FilterController, FilterState, Preset, RangeConstraint};
use marginminer::loader::DatasetLoader;
use marginminer::table::TableDataSource;
use rust_decimal_macros::dec;

fn load_fixtures() -> Dataset {
    let config = AppConfig::with_data_dir("tests/fixtures");
    DatasetLoader::new(&config)
        .load()
        .expect("failed to load fixtures")
}

fn shown(controller: &FilterController) -> Vec<String> {
    controller.view().tickers()
}

fn cell(controller: &FilterController, ticker: &str, column: Column) -> String {
    let table = controller.table();
    let row = (0..table.row_count())
        .find(|&r| table.cell_text(r, 0) == ticker)
        .expect("ticker not shown");
    let col = table
        .columns()
        .iter()
        .position(|c| *c == column)
        .expect("column not shown");
    table.cell_text(row, col)
}

#[test]
fn loads_every_sector_file() {
    let dataset = load_fixtures();
    assert_eq!(dataset.len(), 9);
    assert_eq!(dataset.segments(), vec!["Papel", "Tijolo"]);
    // Files load in path order
    assert_eq!(dataset.records()[0].ticker, "MXRF11");
    assert_eq!(dataset.records()[4].ticker, "HGLG11");
}

#[test]
fn missing_cells_load_as_missing() {
    let dataset = load_fixtures();
    let xpml = dataset
        .records()
        .iter()
        .find(|r| r.ticker == "XPML11")
        .unwrap();
    assert_eq!(xpml.cash_percent, None);
    assert_eq!(xpml.price_to_book, Some(dec!(0.96)));
    assert_eq!(xpml.equity, Some(dec!(3500000000.00)));
}

#[test]
fn segment_then_ranges_narrow_in_file_order() {
    let mut controller = FilterController::with_default_table(load_fixtures());
    controller.set_segment(Some("Tijolo"));
    controller.set_bound(Column::PriceToBook, BoundSide::Min, "0,94");
    controller.set_bound(Column::PriceToBook, BoundSide::Max, "1,05");
    controller.set_bound(Column::DividendYield, BoundSide::Min, "9");

    assert_eq!(shown(&controller), vec!["BTLG11", "XPML11"]);
}

#[test]
fn ticker_list_ignores_ranges() {
    let mut controller = FilterController::with_default_table(load_fixtures());
    controller.set_segment(Some("Tijolo"));
    controller.set_bound(Column::PriceToBook, BoundSide::Max, "0,90");

    assert_eq!(shown(&controller), vec!["VISC11"]);
    assert_eq!(
        controller.tickers(),
        ["BTLG11", "HGLG11", "HGRU11", "VISC11", "XPML11"]
    );
}

#[test]
fn unparsable_bound_behaves_as_unset() {
    let mut with_garbage = FilterController::with_default_table(load_fixtures());
    with_garbage.set_segment(Some("Tijolo"));
    with_garbage.set_bound(Column::PriceToBook, BoundSide::Min, "0,94");
    with_garbage.set_bound(Column::DividendYield, BoundSide::Min, "abc");

    let mut without = FilterController::with_default_table(load_fixtures());
    without.set_segment(Some("Tijolo"));
    without.set_bound(Column::PriceToBook, BoundSide::Min, "0,94");

    assert_eq!(shown(&with_garbage), shown(&without));
    assert_eq!(shown(&without), vec!["HGLG11", "BTLG11", "HGRU11", "XPML11"]);
}

#[test]
fn missing_value_fails_a_bounded_range() {
    let mut controller = FilterController::with_default_table(load_fixtures());
    controller.set_segment(Some("Tijolo"));
    controller.set_bound(Column::CashPercent, BoundSide::Min, "0");

    assert!(!shown(&controller).contains(&"XPML11".to_string()));
    assert_eq!(shown(&controller).len(), 4);
}

#[test]
fn clear_restores_the_segment() {
    let mut controller = FilterController::with_default_table(load_fixtures());
    controller.set_segment(Some("Papel"));
    let before = shown(&controller);

    controller.apply_preset(Preset::PaperAnchor);
    assert_ne!(shown(&controller), before);

    controller.clear();
    assert_eq!(shown(&controller), before);
    assert_eq!(controller.state().segment.as_deref(), Some("Papel"));
}

#[test]
fn all_segments_includes_every_record() {
    let mut controller = FilterController::with_default_table(load_fixtures());
    controller.set_segment(Some("Papel"));
    controller.set_segment(None);
    assert_eq!(controller.view().len(), 9);
    assert_eq!(controller.tickers().len(), 9);
}

#[test]
fn preset_ranges_select_paper_anchors() {
    let mut controller = FilterController::with_default_table(load_fixtures());
    controller.set_segment(Some("Papel"));
    controller.apply_preset(Preset::PaperAnchor);

    assert_eq!(shown(&controller), vec!["CPTS11", "KNIP11"]);
    assert_eq!(
        controller.state().range(Column::PriceToBook),
        RangeConstraint::new(Some(dec!(0.90)), Some(dec!(1)))
    );
}

#[test]
fn recompute_is_idempotent() {
    let mut controller = FilterController::with_default_table(load_fixtures());
    controller.set_segment(Some("Tijolo"));
    controller.set_bound(Column::PriceToBook, BoundSide::Max, "1,03");
    let first = shown(&controller);
    controller.recompute();
    controller.recompute();
    assert_eq!(shown(&controller), first);
}

#[test]
fn staged_filtering_matches_single_predicate() {
    let dataset = load_fixtures();
    let mut controller = FilterController::with_default_table(dataset.clone());
    controller.set_segment(Some("Tijolo"));
    controller.set_bound(Column::PriceToBook, BoundSide::Min, "0,94");
    controller.set_bound(Column::Price, BoundSide::Max, "R$ 150,00");

    let mut state = FilterState {
        segment: Some("Tijolo".to_string()),
        ..Default::default()
    };
    state.set_bound(Column::PriceToBook, BoundSide::Min, Some(dec!(0.94)));
    state.set_bound(Column::Price, BoundSide::Max, Some(dec!(150)));
    let expected: Vec<String> = dataset
        .records()
        .iter()
        .filter(|r| state.matches(r))
        .map(|r| r.ticker.clone())
        .collect();

    assert_eq!(shown(&controller), expected);
    assert_eq!(expected, vec!["BTLG11", "HGRU11", "XPML11"]);
}

#[test]
fn table_cells_use_brazilian_formats() {
    let controller = FilterController::with_default_table(load_fixtures());

    assert_eq!(cell(&controller, "HGLG11", Column::Price), "R$ 160,50");
    assert_eq!(
        cell(&controller, "HGLG11", Column::DailyLiquidity),
        "R$ 12.345.678,90"
    );
    assert_eq!(cell(&controller, "HGLG11", Column::DividendYield), "8,25%");
    assert_eq!(cell(&controller, "HGLG11", Column::ValueCagr3y), "-1,20%");
    assert_eq!(cell(&controller, "HGLG11", Column::PriceToBook), "1,04");
    assert_eq!(cell(&controller, "HGLG11", Column::QuotaHolders), "350.000");
    assert_eq!(cell(&controller, "MXRF11", Column::Quotas), "290.000.000");
    assert_eq!(cell(&controller, "XPML11", Column::CashPercent), "");
    assert_eq!(cell(&controller, "KNIP11", Column::Management), "Passiva");
    assert_eq!(cell(&controller, "KNIP11", Column::Segment), "Papel");
}

#[test]
fn sector_tickers_keep_file_order() {
    let config = AppConfig::with_data_dir("tests/fixtures");
    let loader = DatasetLoader::new(&config);
    assert_eq!(
        loader.list_sector_files().unwrap(),
        vec!["Papel.csv", "Tijolo.csv"]
    );
    assert_eq!(
        loader.load_sector_tickers("Tijolo.csv").unwrap(),
        vec!["HGLG11", "BTLG11", "VISC11", "HGRU11", "XPML11"]
    );
}
