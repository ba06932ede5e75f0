pub mod achievement_repository;
pub mod collection;
pub mod memory_repository;
pub mod metric_repository;
pub mod milestone_repository;
pub mod settings_repository;
pub mod snapshot_repository;
