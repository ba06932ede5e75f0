pub mod achievement_notifier;
pub mod achievement_service;
pub mod insights_service;
pub mod metrics_service;
pub mod milestone_service;
pub mod progress_store;
pub mod settings_service;
pub mod snapshot_service;
