//! The core of capture parsing and traffic analysis.
//! Turn text capture lines into packet records, count them per source and flag suspicious sources.
pub mod utils;
pub mod core;
pub mod scan;
pub mod parser;
pub mod containers;
