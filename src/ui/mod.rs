//! Everything that presents analysis results: console, tables, charts data and reports.
pub mod charts;
pub mod export;
pub mod output;
pub mod report;
