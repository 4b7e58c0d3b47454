//! FII indicator dataset
//!
//! A [`Dataset`] is the full, immutable set of fund snapshots loaded at
//! startup. Filtering never copies records: a [`DatasetView`] is the shared
//! dataset plus the indices of the retained rows, in original order.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use itertools::Itertools;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::format::{CellValue, ColumnFormats, FormatSpec};

/// Every attribute of a fund snapshot, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Ticker,
    Price,
    Dividend,
    DividendYield,
    BookValuePerShare,
    PriceToBook,
    DailyLiquidity,
    CashPercent,
    DividendCagr3y,
    ValueCagr3y,
    Equity,
    QuotaHolders,
    Management,
    Quotas,
    Segment,
}

impl Column {
    pub const ALL: [Column; 15] = [
        Column::Ticker,
        Column::Price,
        Column::Dividend,
        Column::DividendYield,
        Column::BookValuePerShare,
        Column::PriceToBook,
        Column::DailyLiquidity,
        Column::CashPercent,
        Column::DividendCagr3y,
        Column::ValueCagr3y,
        Column::Equity,
        Column::QuotaHolders,
        Column::Management,
        Column::Quotas,
        Column::Segment,
    ];

    /// Columns with a dedicated min/max input in the screener.
    pub const FILTERABLE: [Column; 5] = [
        Column::PriceToBook,
        Column::DividendYield,
        Column::CashPercent,
        Column::Price,
        Column::DailyLiquidity,
    ];

    /// Raw column name as carried by the dataset.
    pub fn name(self) -> &'static str {
        match self {
            Column::Ticker => "TICKER",
            Column::Price => "PRECO",
            Column::Dividend => "DIV",
            Column::DividendYield => "DY",
            Column::BookValuePerShare => "VPC",
            Column::PriceToBook => "P/VP",
            Column::DailyLiquidity => "LIQ. DIARIA",
            Column::CashPercent => "PERC. CAIXA",
            Column::DividendCagr3y => "CAGR DIV. 3 A",
            Column::ValueCagr3y => "CAGR VAL 3 A",
            Column::Equity => "PATRIMONIO",
            Column::QuotaHolders => "N COTISTAS",
            Column::Management => "GESTAO",
            Column::Quotas => "N COTAS",
            Column::Segment => "SEGMENTO",
        }
    }

    /// Label shown in the table header.
    pub fn header(self) -> &'static str {
        match self {
            Column::Segment => "SEG",
            other => other.name(),
        }
    }

    pub fn default_format(self) -> FormatSpec {
        match self {
            Column::Ticker | Column::Management | Column::Segment => FormatSpec::Text,
            Column::Price
            | Column::Dividend
            | Column::BookValuePerShare
            | Column::DailyLiquidity
            | Column::Equity => FormatSpec::BrlCurrency,
            Column::DividendYield
            | Column::CashPercent
            | Column::DividendCagr3y
            | Column::ValueCagr3y => FormatSpec::Percent,
            Column::PriceToBook => FormatSpec::FixedFloat(2),
            Column::QuotaHolders | Column::Quotas => FormatSpec::IntegerGrouped,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.default_format().is_numeric()
    }

    /// Short name used by the CLI and REPL (`pvp`, `dy`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Column::Ticker => "ticker",
            Column::Price => "price",
            Column::Dividend => "div",
            Column::DividendYield => "dy",
            Column::BookValuePerShare => "vpc",
            Column::PriceToBook => "pvp",
            Column::DailyLiquidity => "liq",
            Column::CashPercent => "cash",
            Column::DividendCagr3y => "cagr-div",
            Column::ValueCagr3y => "cagr-val",
            Column::Equity => "equity",
            Column::QuotaHolders => "holders",
            Column::Management => "management",
            Column::Quotas => "quotas",
            Column::Segment => "segment",
        }
    }

    /// Accepted CSV header spellings, already accent-folded and uppercased.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Ticker => &["TICKER", "PAPEL", "CODIGO"],
            Column::Price => &["PRECO", "COTACAO", "PRECO ATUAL"],
            Column::Dividend => &["DIV", "ULTIMO DIVIDENDO", "DIVIDENDO"],
            Column::DividendYield => &["DY", "DIVIDEND YIELD"],
            Column::BookValuePerShare => &["VPC", "VALOR PATRIMONIAL COTA", "VP POR COTA"],
            Column::PriceToBook => &["P/VP", "PVP"],
            Column::DailyLiquidity => &["LIQ. DIARIA", "LIQUIDEZ MEDIA DIARIA", "LIQUIDEZ DIARIA"],
            Column::CashPercent => &["PERC. CAIXA", "PERCENTUAL EM CAIXA", "% CAIXA"],
            Column::DividendCagr3y => &["CAGR DIV. 3 A", "CAGR DIVIDENDOS 3 ANOS"],
            Column::ValueCagr3y => &["CAGR VAL 3 A", "CAGR VALOR CADA 3 ANOS", "CAGR VALOR 3 ANOS"],
            Column::Equity => &["PATRIMONIO", "PATRIMONIO LIQUIDO"],
            Column::QuotaHolders => &["N COTISTAS", "N. COTISTAS", "NUMERO DE COTISTAS"],
            Column::Management => &["GESTAO", "TIPO DE GESTAO"],
            Column::Quotas => &["N COTAS", "N. COTAS", "NUMERO DE COTAS"],
            Column::Segment => &["SEGMENTO"],
        }
    }

    /// Match a CSV header against the known aliases.
    pub fn from_header(header: &str) -> Option<Column> {
        let normalized = normalize_header(header);
        Column::ALL
            .into_iter()
            .find(|col| col.aliases().iter().any(|alias| *alias == normalized))
    }

    /// Default formats keyed by both raw name and display header.
    pub fn default_formats() -> ColumnFormats {
        let mut formats = ColumnFormats::new();
        for col in Column::ALL {
            formats.insert(col.name(), col.default_format());
            formats.insert(col.header(), col.default_format());
        }
        formats
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Column::ALL
            .into_iter()
            .find(|c| c.key() == lower)
            .or_else(|| Column::from_header(s))
            .ok_or_else(|| format!("Unknown column '{}'", s))
    }
}

/// Uppercase, strip accents and collapse whitespace.
pub(crate) fn normalize_header(input: &str) -> String {
    let upper = input.trim().replace(['º', '°'], "").to_uppercase();
    upper
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}

/// One fund's indicator snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    pub ticker: String,
    pub price: Option<Decimal>,
    pub dividend: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub book_value_per_share: Option<Decimal>,
    pub price_to_book: Option<Decimal>,
    pub daily_liquidity: Option<Decimal>,
    pub cash_percent: Option<Decimal>,
    pub dividend_cagr_3y: Option<Decimal>,
    pub value_cagr_3y: Option<Decimal>,
    pub equity: Option<Decimal>,
    pub quota_holders: Option<Decimal>,
    pub management: Option<String>,
    pub quotas: Option<Decimal>,
    pub segment: String,
}

impl FundRecord {
    pub fn new(ticker: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            segment: segment.into(),
            ..Default::default()
        }
    }

    pub fn value(&self, column: Column) -> CellValue {
        match column {
            Column::Ticker => CellValue::Text(self.ticker.clone()),
            Column::Management => self.management.as_deref().into(),
            Column::Segment => CellValue::Text(self.segment.clone()),
            numeric => self.number(numeric).into(),
        }
    }

    /// Numeric attribute, `None` for text columns or missing values.
    pub fn number(&self, column: Column) -> Option<Decimal> {
        match column {
            Column::Price => self.price,
            Column::Dividend => self.dividend,
            Column::DividendYield => self.dividend_yield,
            Column::BookValuePerShare => self.book_value_per_share,
            Column::PriceToBook => self.price_to_book,
            Column::DailyLiquidity => self.daily_liquidity,
            Column::CashPercent => self.cash_percent,
            Column::DividendCagr3y => self.dividend_cagr_3y,
            Column::ValueCagr3y => self.value_cagr_3y,
            Column::Equity => self.equity,
            Column::QuotaHolders => self.quota_holders,
            Column::Quotas => self.quotas,
            Column::Ticker | Column::Management | Column::Segment => None,
        }
    }

    pub fn set_number(&mut self, column: Column, value: Option<Decimal>) {
        let slot = match column {
            Column::Price => &mut self.price,
            Column::Dividend => &mut self.dividend,
            Column::DividendYield => &mut self.dividend_yield,
            Column::BookValuePerShare => &mut self.book_value_per_share,
            Column::PriceToBook => &mut self.price_to_book,
            Column::DailyLiquidity => &mut self.daily_liquidity,
            Column::CashPercent => &mut self.cash_percent,
            Column::DividendCagr3y => &mut self.dividend_cagr_3y,
            Column::ValueCagr3y => &mut self.value_cagr_3y,
            Column::Equity => &mut self.equity,
            Column::QuotaHolders => &mut self.quota_holders,
            Column::Quotas => &mut self.quotas,
            Column::Ticker | Column::Management | Column::Segment => return,
        };
        *slot = value;
    }
}

/// The full, shared collection of fund records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Arc<[FundRecord]>,
}

impl Dataset {
    pub fn new(records: Vec<FundRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FundRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&FundRecord> {
        self.records.get(idx)
    }

    /// Sorted, deduplicated segment labels.
    pub fn segments(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.segment.clone())
            .sorted()
            .dedup()
            .collect()
    }

    /// Sorted, deduplicated tickers across the whole dataset.
    pub fn tickers(&self) -> Vec<String> {
        self.full_view().tickers()
    }

    /// View retaining every row.
    pub fn full_view(&self) -> DatasetView {
        DatasetView::new(self.clone(), (0..self.len()).collect())
    }
}

/// A filtered, read-only projection over a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct DatasetView {
    source: Dataset,
    rows: Vec<usize>,
}

impl DatasetView {
    pub fn new(source: Dataset, rows: Vec<usize>) -> Self {
        debug_assert!(rows.iter().all(|&r| r < source.len()));
        Self { source, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indices into the source dataset, in display order.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn record(&self, row: usize) -> Option<&FundRecord> {
        self.rows.get(row).and_then(|&idx| self.source.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FundRecord> + '_ {
        self.rows.iter().filter_map(move |&idx| self.source.get(idx))
    }

    pub fn tickers(&self) -> Vec<String> {
        self.iter()
            .map(|r| r.ticker.clone())
            .sorted()
            .dedup()
            .collect()
    }
}
