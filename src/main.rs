//! Moodlog CLI
//!
//! Command-line interface for the mood journal: logging, search, analytics,
//! import/export, goals, and backups.

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use moodlog::analytics::{
    compare_periods, detect_anomalies, fit_trend, generate_stats, predict_mood, AnomalyKind,
    Severity, DEFAULT_HORIZON,
};
use moodlog::config::{generate_default_config, Config};
use moodlog::export;
use moodlog::goals::{achievement_catalog, Goal, GoalBook, GoalCondition};
use moodlog::integrations::{import_csv_path, import_json_str, WebhookConfig, WebhookNotifier};
use moodlog::search::{search_and_filter, SearchHistory, SearchOutcome};
use moodlog::store::{
    normalize_tags, start_background_sync, EntryStore, FilterState, ImportMode, MoodEntry,
    MoodRating, StoreConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "moodlog", version, about = "Mood journal with analytics")]
struct Cli {
    /// Config file path (defaults to the standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log a mood entry
    Add {
        /// Mood value, 1 (terrible) to 5 (great)
        mood: u8,
        /// Free-text note
        #[arg(short, long, default_value = "")]
        note: String,
        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
        /// Custom mood label (defaults to the standard label for the value)
        #[arg(short, long)]
        label: Option<String>,
    },
    /// List entries, newest first
    List {
        /// Maximum number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Search and filter entries
    Search {
        /// Free-text query (matches note, tags, label, date)
        query: Option<String>,
        /// Only entries carrying one of these tags (comma-separated)
        #[arg(short, long)]
        tags: Option<String>,
        /// Earliest local date, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Latest local date, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        /// Minimum mood value
        #[arg(long)]
        mood_min: Option<u8>,
        /// Maximum mood value
        #[arg(long)]
        mood_max: Option<u8>,
    },
    /// Show the journal summary
    Stats,
    /// Flag unusual entries in the recent window
    Anomalies,
    /// Forecast upcoming moods from the recent trend
    Predict {
        /// How many days ahead to forecast
        #[arg(short, long, default_value_t = DEFAULT_HORIZON)]
        days: usize,
    },
    /// Compare two date ranges
    Compare {
        /// First period start, YYYY-MM-DD
        first_from: String,
        /// First period end, YYYY-MM-DD
        first_to: String,
        /// Second period start, YYYY-MM-DD
        second_from: String,
        /// Second period end, YYYY-MM-DD
        second_to: String,
    },
    /// Import entries from a CSV or JSON file
    Import {
        /// Input file (.csv or .json)
        file: PathBuf,
        /// Replace the collection instead of appending
        #[arg(long)]
        replace: bool,
        /// Parse and report without changing the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Export the journal
    Export {
        /// Output format: json, csv, markdown, ical
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },
    /// Show unlocked achievements
    Achievements,
    /// Show or clear recent searches
    History {
        /// Clear the history
        #[arg(long)]
        clear: bool,
    },
    /// Write a backup of the collection
    Backup {
        /// Output file
        output: PathBuf,
    },
    /// Replace the collection from a backup file
    Restore {
        /// Backup file
        file: PathBuf,
    },
    /// Delete an entry by id
    Delete {
        /// Entry id
        id: String,
    },
    /// Print a commented default config file
    InitConfig,
}

#[derive(Subcommand)]
enum GoalAction {
    /// List goals with progress
    List,
    /// Add a goal (exactly one of --streak, --count, --average)
    Add {
        /// Goal name
        name: String,
        /// Target consecutive-day streak
        #[arg(long)]
        streak: Option<u32>,
        /// Target entry count
        #[arg(long)]
        count: Option<usize>,
        /// Target average mood
        #[arg(long)]
        average: Option<f64>,
    },
    /// Remove a goal by id
    Remove { id: String },
    /// Enable or disable a goal
    Toggle { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // InitConfig runs before any store or logging setup
    if matches!(cli.command, Command::InitConfig) {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_logging(&config);

    let store_config = {
        let mut sc = StoreConfig::new(&config.store.data_dir);
        sc.sync_interval_secs = config.store.sync_interval_secs;
        sc.passphrase = Config::passphrase();
        sc
    };

    let mut store = EntryStore::open(store_config).await?;
    let notifier = if config.webhook.url.is_empty() {
        None
    } else {
        Some(Arc::new(WebhookNotifier::new(WebhookConfig {
            url: config.webhook.url.clone(),
            secret: config.webhook.secret.clone(),
        })))
    };
    if let Some(notifier) = &notifier {
        store = store.with_notifier(Arc::clone(notifier));
    }
    let store = Arc::new(store);

    // Keep the in-memory collection fresh while the command runs
    let sync_handle = start_background_sync(&store);

    let result = run_command(cli.command, &store).await;

    store.shutdown().await;
    sync_handle.abort();
    // Returning drops the runtime, which cancels spawned deliveries; let
    // any webhook fired by the command finish first
    if let Some(notifier) = &notifier {
        notifier.drain().await;
    }

    result
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("moodlog={}", config.logging.level)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_command(command: Command, store: &Arc<EntryStore>) -> anyhow::Result<()> {
    match command {
        Command::Add {
            mood,
            note,
            tags,
            label,
        } => {
            let rating = match label {
                Some(label) => MoodRating::with_label(mood, label),
                None => MoodRating::new(mood),
            }
            .context("mood must be between 1 and 5")?;

            let mut entry = MoodEntry::new(rating).note(note);
            if let Some(tags) = tags {
                entry = entry.tags(tags.split(','));
            }

            let added = store.add(entry).await?;
            println!(
                "Logged {} ({}/5) as {}",
                added.mood.label, added.mood.value, added.id
            );
        }

        Command::List { limit } => {
            let entries = store.snapshot().await;
            print_entries(entries.iter().rev().take(limit));
            println!("{} of {} entries", limit.min(entries.len()), entries.len());
        }

        Command::Search {
            query,
            tags,
            from,
            to,
            mood_min,
            mood_max,
        } => {
            let mut filters = FilterState::default();
            filters.date_from = from.as_deref().map(parse_date).transpose()?;
            filters.date_to = to.as_deref().map(parse_date).transpose()?;
            if let Some(min) = mood_min {
                filters.mood_min = min;
            }
            if let Some(max) = mood_max {
                filters.mood_max = max;
            }
            if let Some(tags) = tags {
                filters.tags = normalize_tags(tags.split(',')).into_iter().collect();
            }

            let entries = store.snapshot().await;
            let query = query.unwrap_or_default();

            match search_and_filter(&entries, &query, &filters) {
                SearchOutcome::Inactive => {
                    println!("No search criteria; showing everything.");
                    print_entries(entries.iter().rev());
                }
                SearchOutcome::Results(found) => {
                    print_entries(found.iter().rev());
                    println!("{} matching entries", found.len());
                }
            }

            // Only free-text queries enter the history
            if !query.trim().is_empty() {
                let path = store.config().history_path();
                let mut history = SearchHistory::load(&path);
                history.record(&query);
                if let Err(e) = history.save(&path) {
                    tracing::warn!(error = %e, "Failed to save search history");
                }
            }
        }

        Command::Stats => {
            let entries = store.snapshot().await;
            let summary = generate_stats(&entries, Local::now().date_naive());

            println!("Entries:        {}", summary.total_entries);
            match summary.average_mood {
                Some(avg) => println!("Average mood:   {avg:.2} / 5"),
                None => println!("Average mood:   no data"),
            }
            println!("Current streak: {} day(s)", summary.current_streak);
            println!("Trend:          {}", summary.trend);
            println!("Stability:      {} (σ {:.2})", summary.stability, summary.std_dev);
            if let Some(best) = &summary.best_day {
                println!("Best day:       {} ({}/5 {})", best.date, best.mood, best.label);
            }
            if let Some(worst) = &summary.worst_day {
                println!("Worst day:      {} ({}/5 {})", worst.date, worst.mood, worst.label);
            }

            const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
            println!("Weekly pattern:");
            for (day, avg) in WEEKDAYS.iter().zip(summary.weekly_pattern.iter()) {
                println!("  {day}  {avg:.2}");
            }
        }

        Command::Anomalies => {
            let entries = store.snapshot().await;
            let anomalies = detect_anomalies(&entries);
            if anomalies.is_empty() {
                println!("Nothing unusual in the recent window.");
            }
            for anomaly in anomalies {
                let severity = match anomaly.severity {
                    Severity::High => "HIGH",
                    Severity::Medium => "medium",
                };
                match anomaly.kind {
                    AnomalyKind::Deviation { sigma } => {
                        println!("[{severity}] entry {} deviates {:.1}σ from the recent mean", anomaly.entry_ids[0], sigma);
                    }
                    AnomalyKind::SustainedLow { run_length } => {
                        println!("[{severity}] {run_length} consecutive below-average entries");
                    }
                }
            }
        }

        Command::Predict { days } => {
            let entries = store.snapshot().await;
            let predictions = predict_mood(&entries, days);
            if predictions.is_empty() {
                println!("Not enough history to forecast (need at least 2 entries).");
            } else {
                if let Some(line) = fit_trend(&entries) {
                    println!(
                        "Trend over last {} entries: {:+.3} per day",
                        line.sample_size, line.slope
                    );
                }
                for p in predictions {
                    println!(
                        "  +{} day(s): {:.1} (confidence {:.0}%)",
                        p.days_ahead,
                        p.value,
                        p.confidence * 100.0
                    );
                }
            }
        }

        Command::Compare {
            first_from,
            first_to,
            second_from,
            second_to,
        } => {
            let entries = store.snapshot().await;
            let comparison = compare_periods(
                &entries,
                (parse_date(&first_from)?, parse_date(&first_to)?),
                (parse_date(&second_from)?, parse_date(&second_to)?),
            );

            print_period("First period", &comparison.first);
            print_period("Second period", &comparison.second);
            match comparison.mean_delta {
                Some(delta) => {
                    let pct = comparison
                        .mean_delta_pct
                        .map(|p| format!(" ({p:+.1}%)"))
                        .unwrap_or_default();
                    println!("Mean change: {delta:+.2}{pct}");
                }
                None => println!("Mean change: n/a (an empty period)"),
            }
            println!("Stability change: {:+.2}", comparison.stability_delta);
        }

        Command::Import {
            file,
            replace,
            dry_run,
        } => {
            let report = match file.extension().and_then(|e| e.to_str()) {
                Some("csv") => import_csv_path(&file)?,
                Some("json") => {
                    let content = std::fs::read_to_string(&file)
                        .with_context(|| format!("reading {}", file.display()))?;
                    import_json_str(&content)?
                }
                _ => bail!("Unsupported import format; expected .csv or .json"),
            };

            for error in &report.errors {
                println!("  skipped: {error}");
            }
            println!(
                "Parsed {} entries ({} rows skipped)",
                report.entries.len(),
                report.rows_skipped
            );
            if dry_run {
                println!("Dry run; store unchanged.");
                return Ok(());
            }

            let mode = if replace {
                ImportMode::Replace
            } else {
                ImportMode::Append
            };
            let outcome = store.import(report.entries, mode).await?;
            println!(
                "Imported {} entries ({} duplicate ids skipped)",
                outcome.added, outcome.skipped_duplicates
            );
        }

        Command::Export { format, output } => {
            let entries = store.snapshot().await;
            let rendered = match format.as_str() {
                "json" => export::to_json(&entries)?,
                "csv" => export::to_csv(&entries)?,
                "markdown" | "md" => {
                    let summary = generate_stats(&entries, Local::now().date_naive());
                    export::to_markdown(&entries, &summary)
                }
                "ical" | "ics" => export::to_ical(&entries),
                other => bail!("Unknown export format: {other}"),
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Exported {} entries to {}", entries.len(), path.display());
                }
                None => print!("{rendered}"),
            }
        }

        Command::Goal { action } => {
            let path = store.config().goals_path();
            let mut book = GoalBook::load(&path);

            match action {
                GoalAction::List => {
                    let entries = store.snapshot().await;
                    let progress = book.progress(&entries, Local::now().date_naive());
                    if progress.is_empty() {
                        println!("No active goals.");
                    }
                    for p in progress {
                        let mark = if p.met { "✓" } else { " " };
                        println!(
                            "[{mark}] {} — {:.1}/{:.1} ({})",
                            p.name, p.current, p.target, p.goal_id
                        );
                    }
                }
                GoalAction::Add {
                    name,
                    streak,
                    count,
                    average,
                } => {
                    let condition = match (streak, count, average) {
                        (Some(days), None, None) => GoalCondition::Streak(days),
                        (None, Some(n), None) => GoalCondition::EntryCount(n),
                        (None, None, Some(avg)) => GoalCondition::AverageMood(avg),
                        _ => bail!("Specify exactly one of --streak, --count, --average"),
                    };
                    let goal = Goal::new(name, condition);
                    println!("Added goal {} ({})", goal.name, goal.id);
                    book.add(goal);
                    book.save(&path)?;
                }
                GoalAction::Remove { id } => {
                    if book.remove(&id) {
                        book.save(&path)?;
                        println!("Removed goal {id}");
                    } else {
                        bail!("No goal with id {id}");
                    }
                }
                GoalAction::Toggle { id } => match book.toggle(&id) {
                    Some(enabled) => {
                        book.save(&path)?;
                        println!(
                            "Goal {id} is now {}",
                            if enabled { "enabled" } else { "disabled" }
                        );
                    }
                    None => bail!("No goal with id {id}"),
                },
            }
        }

        Command::Achievements => {
            let unlocked = store.unlocked_achievements().await;
            for achievement in achievement_catalog() {
                let mark = if unlocked.iter().any(|id| id == achievement.id) {
                    "✓"
                } else {
                    " "
                };
                println!("[{mark}] {} — {}", achievement.name, achievement.description);
            }
        }

        Command::History { clear } => {
            let path = store.config().history_path();
            let mut history = SearchHistory::load(&path);
            if clear {
                history.clear();
                history.save(&path)?;
                println!("Search history cleared.");
            } else if history.queries().is_empty() {
                println!("No recent searches.");
            } else {
                for query in history.queries() {
                    println!("  {query}");
                }
            }
        }

        Command::Backup { output } => {
            let payload = store.backup().await?;
            std::fs::write(&output, payload)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Backed up {} entries to {}",
                store.len().await,
                output.display()
            );
        }

        Command::Restore { file } => {
            let payload = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let count = store.restore(&payload).await?;
            println!("Restored {count} entries");
        }

        Command::Delete { id } => {
            store.delete(&id).await?;
            println!("Deleted entry {id}");
        }

        Command::InitConfig => unreachable!("handled before store setup"),
    }

    Ok(())
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {raw:?}; expected YYYY-MM-DD"))
}

fn print_entries<'a>(entries: impl Iterator<Item = &'a MoodEntry>) {
    for entry in entries {
        let tags = if entry.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", entry.tags.join(", "))
        };
        println!(
            "{}  {} ({}/5)  {}{}",
            entry.local_date(),
            entry.mood.label,
            entry.mood.value,
            entry.note,
            tags
        );
    }
}

fn print_period(name: &str, summary: &moodlog::analytics::PeriodSummary) {
    println!("{name}: {} entries", summary.count);
    if let Some(mean) = summary.mean {
        println!(
            "  mean {mean:.2}, min {}, max {}, σ {:.2}",
            summary.min.unwrap_or(0),
            summary.max.unwrap_or(0),
            summary.std_dev
        );
    }
    if !summary.top_tags.is_empty() {
        let tags: Vec<String> = summary
            .top_tags
            .iter()
            .map(|(tag, n)| format!("{tag} ({n})"))
            .collect();
        println!("  top tags: {}", tags.join(", "));
    }
}
