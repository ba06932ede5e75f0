pub mod achievement;
pub mod insights;
pub mod metric;
pub mod milestone;
pub mod settings;
pub mod snapshot;
