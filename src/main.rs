use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use awards_progress_lib::commands::progress::{
    self, MilestoneProgressPayload, NomineeSyncPayload, SnapshotPayload,
};
use awards_progress_lib::commands::{CommandError, CommandResult};
use awards_progress_lib::models::metric::PerformanceMetricUpdate;
use awards_progress_lib::models::milestone::{
    MilestoneCategory, MilestonePriority, NewMilestone, NomineeRecord,
};
use awards_progress_lib::models::settings::ProgressSettingsUpdate;
use awards_progress_lib::models::snapshot::SnapshotMetrics;
use awards_progress_lib::utils::logger::init_logging;
use awards_progress_lib::ProgressTracker;

const DATABASE_FILE: &str = "progress.sqlite";

#[derive(Parser)]
#[command(name = "awards-progress", version, about = "Nominee milestone and progress tracking")]
struct Cli {
    /// Directory holding the database and logs.
    #[arg(long, global = true, default_value = ".awards-progress")]
    data_dir: PathBuf,

    /// User the command applies to.
    #[arg(long, global = true, default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and update milestones.
    Milestones {
        #[command(subcommand)]
        action: MilestoneAction,
    },
    /// Upsert or list performance metrics.
    Metrics {
        #[command(subcommand)]
        action: MetricAction,
    },
    /// Record and query daily snapshots.
    Snapshots {
        #[command(subcommand)]
        action: SnapshotAction,
    },
    /// List unlocked achievements.
    Achievements,
    /// Growth, trend, streak and projected completion.
    Insights,
    /// Weighted performance score.
    Score,
    /// Show or change scoring settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Clear all progress data. Settings are kept.
    Reset,
}

#[derive(Subcommand)]
enum MilestoneAction {
    /// Individual milestones for the user.
    List {
        /// Include team and system milestones.
        #[arg(long)]
        all: bool,
    },
    Show {
        id: String,
    },
    /// Set the current value of a milestone.
    Progress {
        id: String,
        value: f64,
    },
    /// Add a custom milestone.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        target: f64,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        unit: String,
    },
    /// Recompute built-in milestones from a JSON array of nominee records.
    Sync {
        /// Path to a JSON file, e.g. `[{"score": 92}, {"qualityScore": 75}]`.
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum MetricAction {
    List,
    /// Apply a JSON array of partial metric updates.
    Update {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum SnapshotAction {
    /// Write today's snapshot.
    Record {
        #[arg(long, default_value_t = 0)]
        submitted: u32,
        #[arg(long, default_value_t = 0)]
        approved: u32,
        #[arg(long, default_value_t = 0.0)]
        quality: f64,
        #[arg(long, default_value_t = 0.0)]
        completion_rate: f64,
        #[arg(long, default_value_t = 0)]
        minutes: u32,
        #[arg(long, default_value_t = 0)]
        active_days: u32,
        #[arg(long)]
        note: Option<String>,
    },
    List {
        /// Only snapshots from the last N days.
        #[arg(long)]
        days: Option<u32>,
    },
    /// Drop snapshots older than N days.
    Prune {
        #[arg(long)]
        keep_days: u32,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        projection_target: Option<u32>,
        #[arg(long)]
        full_productivity_daily_rate: Option<f64>,
        #[arg(long)]
        high_quality_threshold: Option<f64>,
        #[arg(long)]
        insight_window_days: Option<u32>,
        #[arg(long)]
        consistency_window_days: Option<u32>,
    },
    Reset,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging(&cli.data_dir.join("logs")) {
        eprintln!("failed to initialise logging: {error}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = ProgressTracker::open(cli.data_dir.join(DATABASE_FILE))?;
    let user = cli.user.as_str();

    match cli.command {
        Commands::Milestones { action } => match action {
            MilestoneAction::List { all: true } => print(progress::milestones_list_all(&tracker)),
            MilestoneAction::List { all: false } => print(progress::milestones_list(&tracker, user)),
            MilestoneAction::Show { id } => print(progress::milestone_get(&tracker, &id)),
            MilestoneAction::Progress { id, value } => print(progress::milestone_update_progress(
                &tracker,
                MilestoneProgressPayload {
                    milestone_id: id,
                    value,
                },
            )),
            MilestoneAction::Create {
                title,
                target,
                description,
                unit,
            } => print(progress::milestone_create(
                &tracker,
                NewMilestone {
                    title,
                    description,
                    target,
                    current: 0.0,
                    unit,
                    category: MilestoneCategory::Individual,
                    priority: MilestonePriority::Medium,
                    deadline: None,
                    reward: None,
                },
            )),
            MilestoneAction::Sync { file } => {
                let nominees: Vec<NomineeRecord> = read_json(&file)?;
                print(progress::milestones_sync_from_nominees(
                    &tracker,
                    NomineeSyncPayload {
                        user_id: user.to_string(),
                        nominees,
                    },
                ))
            }
        },
        Commands::Metrics { action } => match action {
            MetricAction::List => print(progress::metrics_get(&tracker, user)),
            MetricAction::Update { file } => {
                let updates: Vec<PerformanceMetricUpdate> = read_json(&file)?;
                print(progress::metrics_update(&tracker, user, updates))
            }
        },
        Commands::Snapshots { action } => match action {
            SnapshotAction::Record {
                submitted,
                approved,
                quality,
                completion_rate,
                minutes,
                active_days,
                note,
            } => print(progress::snapshot_create(
                &tracker,
                SnapshotPayload {
                    user_id: user.to_string(),
                    metrics: SnapshotMetrics {
                        nominees_submitted: submitted,
                        nominees_approved: approved,
                        quality_score: quality,
                        completion_rate,
                        time_spent_minutes: minutes,
                        active_days,
                    },
                    note,
                },
            )),
            SnapshotAction::List { days } => print(progress::snapshots_get(&tracker, user, days)),
            SnapshotAction::Prune { keep_days } => {
                print(progress::snapshots_prune(&tracker, user, keep_days))
            }
        },
        Commands::Achievements => print(progress::achievements_get(&tracker, user)),
        Commands::Insights => print(progress::insights_get(&tracker, user)),
        Commands::Score => print(progress::score_get(&tracker, user)),
        Commands::Settings { action } => match action {
            SettingsAction::Show => print(progress::settings_get(&tracker)),
            SettingsAction::Set {
                projection_target,
                full_productivity_daily_rate,
                high_quality_threshold,
                insight_window_days,
                consistency_window_days,
            } => print(progress::settings_update(
                &tracker,
                ProgressSettingsUpdate {
                    projection_target,
                    full_productivity_daily_rate,
                    high_quality_threshold,
                    insight_window_days,
                    consistency_window_days,
                },
            )),
            SettingsAction::Reset => print(progress::settings_reset(&tracker)),
        },
        Commands::Reset => print(progress::progress_reset(&tracker)),
    }
}

fn print<T: Serialize>(result: CommandResult<T>) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(error) => {
            eprintln!("{}", serde_json::to_string_pretty(&error)?);
            Err(Box::new(error))
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        Box::new(CommandError::new(
            "VALIDATION_ERROR",
            format!("invalid JSON in {}: {err}", path.display()),
            None,
        )) as Box<dyn std::error::Error>
    })
}
