// issuelens: per-version term and topic extraction for issue reports
//
// This is the library root. Each module corresponds to a major subsystem
// of the analysis pipeline.

pub mod config;
pub mod error;
pub mod issues;
pub mod output;
pub mod topics;
