//! Marginminer - screener for Brazilian real-estate investment funds (FII)
//!
//! This library loads FII indicator exports, renders them with Brazilian
//! locale formatting and narrows them through a segment -> ticker list ->
//! numeric range filter cascade.

pub mod cache;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod parse;
pub mod render;
pub mod table;
pub mod ui;
