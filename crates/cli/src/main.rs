//! WrapTrack CLI - car wrap service tracking.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wraptrack_app::{progress_bar, search_faqs, status_marker, Disclosure, TrackingView, CONTACTS};
use wraptrack_core::{JobId, JobRecord, MediaRef, StepId, TrackerPolicy};
use wraptrack_progress::{sample_tracker, CompletionEstimator, ProgressTracker, WorkflowTemplate};
use wraptrack_storage::{JobStore, JsonJobStore};

#[derive(Parser)]
#[command(name = "wraptrack")]
#[command(about = "Car wrap service tracking", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, env = "WRAPTRACK_DATA", default_value = ".wraptrack", global = true)]
    data_dir: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a job from the car wrap template
    New {
        /// Plate number or customer name
        #[arg(long, default_value = "")]
        label: String,
        /// Seed the demo progress (inspection done, preparation under way)
        #[arg(long)]
        sample: bool,
        /// Allow completing a pending step without starting it
        #[arg(long)]
        allow_direct_completion: bool,
    },
    /// List jobs
    List,
    /// Show job progress
    Show {
        /// Job ID
        job: String,
        /// Expand a step card (position or step ID)
        #[arg(long)]
        expand: Option<String>,
    },
    /// Move a step to its next status
    Advance {
        /// Job ID
        job: String,
        /// Step position (1-based) or step ID
        step: String,
    },
    /// Complete a step, optionally with its actual duration
    Complete {
        /// Job ID
        job: String,
        /// Step position (1-based) or step ID
        step: String,
        /// Actual minutes
        #[arg(long, allow_negative_numbers = true)]
        minutes: Option<i64>,
    },
    /// Record the actual duration of an in-progress step
    Duration {
        /// Job ID
        job: String,
        /// Step position (1-based) or step ID
        step: String,
        /// Actual minutes
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
    /// Attach a photo or video to a step
    Attach {
        /// Job ID
        job: String,
        /// Step position (1-based) or step ID
        step: String,
        /// Media identifier
        media: String,
        /// The media is a video
        #[arg(long)]
        video: bool,
    },
    /// Delete a job
    Delete {
        /// Job ID
        job: String,
    },
    /// Browse the knowledge base
    Faq {
        /// Search text
        query: Option<String>,
    },
    /// Show contact details
    Contact,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Faq { query } => {
            for faq in search_faqs(query.as_deref().unwrap_or("")) {
                println!("Q: {}", faq.question);
                for line in faq.answer.lines() {
                    println!("   {}", line);
                }
                println!();
            }
            return Ok(());
        }
        Commands::Contact => {
            for entry in CONTACTS {
                match entry.action {
                    Some(action) => println!("{:<15} {}  <{}>", entry.label, entry.value, action),
                    None => println!("{:<15} {}", entry.label, entry.value),
                }
            }
            return Ok(());
        }
        _ => {}
    }

    let mut store = JsonJobStore::new(&cli.data_dir)
        .await
        .with_context(|| format!("opening {}", cli.data_dir.display()))?;

    match cli.command {
        Commands::New { label, sample, allow_direct_completion } => {
            let policy = if allow_direct_completion {
                TrackerPolicy::permissive()
            } else {
                TrackerPolicy::default()
            };
            let steps = if sample {
                sample_tracker()?.steps_view()
            } else {
                WorkflowTemplate::car_wrap().instantiate()
            };
            let job = ProgressTracker::with_policy(steps, policy)?.into_record(JobId::new(), label);
            store.save_job(&job).await?;
            info!("Created job {}", job.id);
            println!("{}", job.id);
        }
        Commands::List => {
            let jobs = store.list_jobs().await?;
            println!("Jobs ({}) [done/active/pending]", jobs.len());
            for job in jobs {
                match ProgressTracker::from_record(&job) {
                    Ok(tracker) => {
                        let snapshot = tracker.snapshot();
                        println!(
                            "  {} | {:>5.1}% | {}/{}/{} | {}",
                            job.id,
                            snapshot.percentage,
                            snapshot.completed,
                            snapshot.in_progress,
                            snapshot.pending,
                            job.label
                        );
                    }
                    Err(e) => println!("  {} | invalid: {}", job.id, e),
                }
            }
        }
        Commands::Show { job, expand } => {
            let (record, tracker) = store.load_tracker(parse_job(&job)?).await?;
            let mut expansion = Disclosure::new();
            if let Some(step) = expand {
                expansion.toggle(resolve_step(&tracker, &step)?);
            }
            print_job(&record, &tracker, &expansion);
        }
        Commands::Advance { job, step } => {
            let (mut record, mut tracker) = store.load_tracker(parse_job(&job)?).await?;
            let id = resolve_step(&tracker, &step)?;
            tracker.advance(id)?;
            save(&mut store, &mut record, &tracker).await?;
            report_step(&tracker, id);
        }
        Commands::Complete { job, step, minutes } => {
            let (mut record, mut tracker) = store.load_tracker(parse_job(&job)?).await?;
            let id = resolve_step(&tracker, &step)?;
            tracker.complete(id, minutes)?;
            save(&mut store, &mut record, &tracker).await?;
            report_step(&tracker, id);
        }
        Commands::Duration { job, step, minutes } => {
            let (mut record, mut tracker) = store.load_tracker(parse_job(&job)?).await?;
            let id = resolve_step(&tracker, &step)?;
            tracker.set_actual_duration(id, minutes)?;
            save(&mut store, &mut record, &tracker).await?;
            println!("Recorded {} minutes for step {}", minutes, id);
        }
        Commands::Attach { job, step, media, video } => {
            let (mut record, mut tracker) = store.load_tracker(parse_job(&job)?).await?;
            let id = resolve_step(&tracker, &step)?;
            let media = if video { MediaRef::video(media) } else { MediaRef::image(media) };
            tracker.attach_media(id, media)?;
            save(&mut store, &mut record, &tracker).await?;
            report_step(&tracker, id);
        }
        Commands::Delete { job } => {
            store.delete_job(parse_job(&job)?).await?;
            println!("Deleted job {}", job);
        }
        Commands::Faq { .. } | Commands::Contact => {}
    }

    Ok(())
}

async fn save(store: &mut JsonJobStore, record: &mut JobRecord, tracker: &ProgressTracker) -> Result<()> {
    tracker.write_record(record);
    store.save_job(record).await?;
    Ok(())
}

fn parse_job(s: &str) -> Result<JobId> {
    s.parse().map_err(|_| anyhow::anyhow!("Invalid job ID: {}", s))
}

/// Accept a 1-based position or a step ID.
fn resolve_step(tracker: &ProgressTracker, s: &str) -> Result<StepId> {
    if let Ok(position) = s.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| tracker.step_at(i))
            .map(|step| step.id)
            .ok_or_else(|| anyhow::anyhow!("No step at position {} (job has {})", s, tracker.len()));
    }
    let id: StepId = s.parse().map_err(|_| anyhow::anyhow!("Invalid step: {}", s))?;
    Ok(id)
}

fn report_step(tracker: &ProgressTracker, id: StepId) {
    if let Some(step) = tracker.step(id) {
        println!(
            "{} -> {} ({} min) | overall {:.1}%",
            step.title,
            step.status,
            step.display_minutes(),
            tracker.progress_percent()
        );
    }
}

fn print_job(record: &JobRecord, tracker: &ProgressTracker, expansion: &Disclosure<StepId>) {
    let view = TrackingView::build(tracker, expansion);
    let estimation = CompletionEstimator.estimate(tracker, Utc::now());

    println!("Job: {} {}", record.id, record.label);
    println!("  {}", view.label);
    println!("  {}", progress_bar(view.percent, 30));
    for card in &view.cards {
        println!(
            "  [{}] {}. {} - {} min{}",
            status_marker(card.status),
            card.position,
            card.title,
            card.minutes,
            if card.images + card.videos > 0 {
                format!(" ({} images, {} videos)", card.images, card.videos)
            } else {
                String::new()
            }
        );
        if let Some(details) = &card.details {
            println!("        {}", details);
        }
    }
    println!("  Remaining: {} min", estimation.remaining_minutes);
    println!("  Estimated completion: {}", estimation.estimated_completion.format("%Y-%m-%d %H:%M UTC"));
    if estimation.spent_minutes > 0 {
        println!("  Spent: {} min ({:+} vs estimate)", estimation.spent_minutes, estimation.variance_minutes);
    }
}
