// Library root: re-exports the app modules so integration tests can drive
// the pipeline without the binary.

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod report;
