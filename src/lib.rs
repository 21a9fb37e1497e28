pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod plss;
pub mod types;

// Input and output edges of the import pipeline
pub mod export;
pub mod workbook;

pub mod dashboard;
pub mod script;
pub mod sources;

// Use cases and the ports they depend on
pub mod app;
