use clap::Subcommand;
use studyroom_core::storage::Database;
use studyroom_core::Config;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's completed work sessions
    Today {
        #[arg(long)]
        json: bool,
    },
    /// Today's and all-time totals
    All {
        #[arg(long)]
        json: bool,
    },
    /// Most recent completed sessions
    History {
        /// Maximum number of sessions to show
        #[arg(long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let user = config.user_id();

    match action {
        StatsAction::Today { json } => {
            let stats = db.stats_today(user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "Today: {} sessions, {} minutes",
                    stats.today_sessions, stats.today_minutes
                );
            }
        }
        StatsAction::All { json } => {
            let stats = db.stats_today(user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "Today: {} sessions, {} minutes",
                    stats.today_sessions, stats.today_minutes
                );
                println!(
                    "Total: {} sessions, {} minutes",
                    stats.total_sessions, stats.total_minutes
                );
            }
        }
        StatsAction::History { limit, json } => {
            let sessions = db.list_sessions(user, Some(limit))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("No sessions recorded yet.");
            } else {
                for s in sessions {
                    println!(
                        "{}  {:>3} min  {}",
                        s.started_at.format("%Y-%m-%d %H:%M"),
                        s.duration_min,
                        s.subject_id.as_deref().unwrap_or("-")
                    );
                }
            }
        }
    }
    Ok(())
}
