//! `daybook` CLI — inspect and run the planning engine against a plan file.
//!
//! A plan file is the JSON form of the in-memory store: categories,
//! deadlines, recurring events and buckets with their occurrences, tasks,
//! and task intervals.
//!
//! ## Usage
//!
//! ```sh
//! # Expand a recurring event into its concrete occurrences
//! daybook expand -i plan.json --event 3
//!
//! # Validate a bucket against everything already scheduled
//! daybook check -i plan.json --bucket 5 --today 2026-03-02
//!
//! # Show the free slots left in the availability buckets
//! daybook slots -i plan.json
//!
//! # Regenerate occurrences, run a scheduling pass, write the plan back
//! daybook schedule -i plan.json -o scheduled.json --today 2026-03-02
//! ```

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use daybook_engine::{
    check_bucket_conflicts, check_event_conflicts, compute_free_slots, expand_recurrence,
    regenerate_bucket_occurrences, regenerate_event_occurrences, run_scheduling_pass, MemoryStore,
    OverlapInfo, OverlapKind, PlanStore, SchedulerConfig,
};

#[derive(Parser)]
#[command(name = "daybook", version, about = "Planning engine CLI for daybook")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a recurring event or bucket into dated occurrences
    Expand {
        /// Plan file to read
        #[arg(short, long)]
        input: String,
        /// Id of the event to expand
        #[arg(long, conflicts_with = "bucket")]
        event: Option<i64>,
        /// Id of the bucket to expand
        #[arg(long)]
        bucket: Option<i64>,
        /// Anchor date for the scan window (defaults to the system date)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Horizon in months
        #[arg(long, default_value_t = 3)]
        horizon: u32,
    },
    /// Check a recurring event or bucket for conflicts with existing occurrences
    Check {
        /// Plan file to read
        #[arg(short, long)]
        input: String,
        /// Id of the event to validate
        #[arg(long, conflicts_with = "bucket")]
        event: Option<i64>,
        /// Id of the bucket to validate
        #[arg(long)]
        bucket: Option<i64>,
        /// Anchor date for the scan window (defaults to the system date)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Horizon in months
        #[arg(long, default_value_t = 3)]
        horizon: u32,
    },
    /// Show the free slots left in the availability buckets
    Slots {
        /// Plan file to read
        #[arg(short, long)]
        input: String,
    },
    /// Regenerate occurrences and run a full scheduling pass
    Schedule {
        /// Plan file to read
        #[arg(short, long)]
        input: String,
        /// Output plan file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<String>,
        /// Anchor date for the pass (defaults to the system date)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Horizon in months
        #[arg(long, default_value_t = 3)]
        horizon: u32,
        /// Smallest partial interval for breakable tasks, in minutes
        #[arg(long, default_value_t = 15)]
        min_chunk: i64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Expand {
            input,
            event,
            bucket,
            today,
            horizon,
        } => {
            let store = load_plan(&input)?;
            let today = today.unwrap_or_else(local_today);
            let windows = match (event, bucket) {
                (Some(id), _) => {
                    let event = store
                        .event(id)?
                        .with_context(|| format!("No event with id {} in {}", id, input))?;
                    expand_recurrence(
                        &event.recurrence,
                        event.start_date,
                        event.end_date,
                        event.start_time,
                        event.end_time,
                        today,
                        horizon,
                    )
                }
                (None, Some(id)) => {
                    let bucket = store
                        .bucket(id)?
                        .with_context(|| format!("No bucket with id {} in {}", id, input))?;
                    expand_recurrence(
                        &bucket.recurrence,
                        bucket.start_date,
                        bucket.end_date,
                        bucket.start_time,
                        bucket.end_time,
                        today,
                        horizon,
                    )
                }
                (None, None) => bail!("Pass --event <id> or --bucket <id>"),
            };
            for w in &windows {
                println!(
                    "{} {}-{}",
                    w.date,
                    w.start_time.format("%H:%M"),
                    w.end_time.format("%H:%M")
                );
            }
            println!("{} occurrence(s)", windows.len());
        }
        Commands::Check {
            input,
            event,
            bucket,
            today,
            horizon,
        } => {
            let store = load_plan(&input)?;
            let today = today.unwrap_or_else(local_today);
            let info = match (event, bucket) {
                (Some(id), _) => {
                    let event = store
                        .event(id)?
                        .with_context(|| format!("No event with id {} in {}", id, input))?;
                    check_event_conflicts(&store, &event, today, horizon)?
                }
                (None, Some(id)) => {
                    let bucket = store
                        .bucket(id)?
                        .with_context(|| format!("No bucket with id {} in {}", id, input))?;
                    check_bucket_conflicts(&store, &bucket, today, horizon)?
                }
                (None, None) => bail!("Pass --event <id> or --bucket <id>"),
            };
            print_overlap(&info);
        }
        Commands::Slots { input } => {
            let store = load_plan(&input)?;
            // Free time is what the buckets offer minus every interval
            // already claimed, pinned or assigned.
            let slots = compute_free_slots(&store.bucket_occurrences()?, &store.task_intervals()?);
            for slot in &slots {
                println!(
                    "{} {}-{} ({} min)",
                    slot.date,
                    slot.start_time.format("%H:%M"),
                    slot.end_time.format("%H:%M"),
                    slot.duration_minutes()
                );
            }
            println!("{} free slot(s)", slots.len());
        }
        Commands::Schedule {
            input,
            output,
            today,
            horizon,
            min_chunk,
        } => {
            let mut store = load_plan(&input)?;
            let today = today.unwrap_or_else(local_today);

            for event in store.events()? {
                regenerate_event_occurrences(&mut store, event.id, today, horizon)?;
            }
            for bucket in store.buckets()? {
                regenerate_bucket_occurrences(&mut store, bucket.id, today, horizon)?;
            }

            let config = SchedulerConfig {
                horizon_months: horizon,
                min_chunk_minutes: min_chunk,
            };
            let summary = run_scheduling_pass(&mut store, today, &config)?;

            let target = output.as_deref().unwrap_or(&input);
            save_plan(target, &store)?;

            println!("Manual intervals:  {}", summary.manual_committed);
            println!("Assigned tasks:    {}", summary.assigned_task_ids.len());
            println!("Unassigned tasks:  {}", summary.unassigned_task_ids.len());
            for id in &summary.unassigned_task_ids {
                println!("  not scheduled this cycle: task {}", id);
            }
            println!("Intervals created: {}", summary.intervals_created);
        }
    }

    Ok(())
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_overlap(info: &OverlapInfo) {
    if !info.has_overlap {
        println!("no conflict");
        return;
    }
    let kind = match info.kind {
        Some(OverlapKind::Event) => "event",
        Some(OverlapKind::Bucket) => "bucket",
        None => "occurrence",
    };
    // All three fields are set whenever has_overlap is.
    let date = info.date.map(|d| d.to_string()).unwrap_or_default();
    let start = info
        .start_time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default();
    let end = info
        .end_time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default();
    println!("conflict with {} occurrence on {} {}-{}", kind, date, start, end);
}

fn load_plan(path: &str) -> Result<MemoryStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse plan file: {}", path))
}

fn save_plan(path: &str, store: &MemoryStore) -> Result<()> {
    let pretty = serde_json::to_string_pretty(store)?;
    std::fs::write(path, pretty).with_context(|| format!("Failed to write plan file: {}", path))?;
    Ok(())
}
