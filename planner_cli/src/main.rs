use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use planner_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "studyplan")]
#[command(about = "Exam study schedule generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User the plan is stored under
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new plan and store it
    Generate {
        /// Subject as NAME:DIFFICULTY:TOPICS (repeatable), e.g. "DBMS:hard:8"
        #[arg(long = "subject", required = true)]
        subjects: Vec<String>,

        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        exam_date: String,

        /// Study hours available per day
        #[arg(long)]
        hours: f64,

        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,

        /// Show the plan without storing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show plan summary
    Summary,

    /// Show progress, per-subject hours and milestones
    Progress {
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show today's sessions
    Today {
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show one week day by day
    Week {
        /// Week number, starting at 1
        number: u32,
    },

    /// Mark a topic as completed
    Complete {
        /// Subject index (0-based)
        #[arg(long)]
        subject: usize,

        /// Topic index within the subject (0-based)
        #[arg(long)]
        topic: usize,

        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },

    /// Print the stored plan as JSON
    Show,

    /// Export all sessions to CSV
    Export {
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    planner_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let user = cli.user.unwrap_or_else(|| config.user.default_user.clone());
    let store = PlanStore::new(data_dir);

    match cli.command {
        Commands::Generate {
            subjects,
            exam_date,
            hours,
            today,
            dry_run,
        } => cmd_generate(&store, &user, &config, &subjects, &exam_date, hours, today, dry_run),
        Commands::Summary => with_plan(&store, &user, |plan| {
            display_summary(&study_plan_summary(plan));
            Ok(())
        }),
        Commands::Progress { today } => {
            let today = resolve_today(today.as_deref())?;
            with_plan(&store, &user, |plan| {
                display_progress(plan, today);
                Ok(())
            })
        }
        Commands::Today { today } => {
            let today = resolve_today(today.as_deref())?;
            with_plan(&store, &user, |plan| {
                display_sessions(today, todays_plan(plan, today));
                Ok(())
            })
        }
        Commands::Week { number } => with_plan(&store, &user, |plan| cmd_week(plan, number)),
        Commands::Complete {
            subject,
            topic,
            undo,
        } => cmd_complete(&store, &user, subject, topic, !undo),
        Commands::Show => with_plan(&store, &user, |plan| {
            println!("{}", serde_json::to_string_pretty(plan)?);
            Ok(())
        }),
        Commands::Export { out } => with_plan(&store, &user, |plan| {
            let count = export_sessions_csv(plan, &out)?;
            println!("✓ Exported {} sessions", count);
            println!("  CSV: {}", out.display());
            Ok(())
        }),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    store: &PlanStore,
    user: &str,
    config: &Config,
    subject_specs: &[String],
    exam_date: &str,
    hours: f64,
    today: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let subjects = subject_specs
        .iter()
        .map(|spec| parse_subject(spec))
        .collect::<Result<Vec<_>>>()?;
    let exam_date = parse_date(exam_date)?;
    let today = resolve_today(today.as_deref())?;

    let planner = Planner::new(config.planner.clone());
    let plan = planner.generate_study_plan(&subjects, exam_date, hours, today)?;

    display_summary(&study_plan_summary(&plan));

    if dry_run {
        println!("\n[Dry run - plan not saved]");
        return Ok(());
    }

    store.save(user, &plan)?;
    println!("\n✓ Study plan created for '{}'", user);
    Ok(())
}

fn cmd_week(plan: &StudyPlan, number: u32) -> Result<()> {
    let week = plan
        .weeks
        .iter()
        .find(|w| w.week_number == number)
        .ok_or_else(|| {
            Error::Other(format!(
                "Week {} is not in the plan (1-{})",
                number,
                plan.weeks.len()
            ))
        })?;

    println!(
        "Week {}: {:.1}h planned",
        week.week_number, week.total_hours
    );
    for day in &week.days {
        println!();
        display_sessions(day.date, &day.sessions);
    }
    Ok(())
}

fn cmd_complete(
    store: &PlanStore,
    user: &str,
    subject_index: usize,
    topic_index: usize,
    completed: bool,
) -> Result<()> {
    let plan = store.update(user, |plan| {
        update_topic_progress(plan, subject_index, topic_index, completed)
    })?;

    let topic = &plan.subjects[subject_index].topics[topic_index];
    if completed {
        println!("✓ Completed {}", topic.topic_name);
    } else {
        println!("✓ Reopened {}", topic.topic_name);
    }
    println!("  Overall progress: {}%", calculate_progress(&plan));
    Ok(())
}

/// Run `f` against the user's stored plan, or explain that there is none
fn with_plan<F>(store: &PlanStore, user: &str, f: F) -> Result<()>
where
    F: FnOnce(&StudyPlan) -> Result<()>,
{
    match store.load(user)? {
        Some(plan) => f(&plan),
        None => {
            println!(
                "No study plan found for '{}' - run `studyplan generate` first.",
                user
            );
            Ok(())
        }
    }
}

fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(date) => parse_date(date),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parse NAME:DIFFICULTY:TOPICS; the name itself may contain colons
fn parse_subject(spec: &str) -> Result<SubjectInput> {
    let mut parts = spec.rsplitn(3, ':');
    let (topics, difficulty, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(t), Some(d), Some(n)) => (t, d, n),
        _ => {
            return Err(Error::Other(format!(
                "Subject '{}' must look like NAME:DIFFICULTY:TOPICS",
                spec
            )))
        }
    };

    let topic_count = topics.trim().parse::<u32>().map_err(|_| {
        Error::Other(format!(
            "Topic count '{}' in subject '{}' is not a whole number",
            topics, spec
        ))
    })?;

    let difficulty = Difficulty::from(difficulty.trim().to_lowercase());
    if let Difficulty::Unrecognized(ref d) = difficulty {
        tracing::warn!(
            "Unknown difficulty: {}. Weighting '{}' with a multiplier of 1.",
            d,
            name.trim()
        );
    }

    tracing::debug!("Parsed subject '{}' ({}, {} topics)", name, difficulty, topic_count);
    Ok(SubjectInput::new(name.trim(), difficulty, topic_count))
}

fn display_summary(summary: &StudyPlanSummary) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  STUDY PLAN");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {} → {}", summary.start_date, summary.end_date);
    println!(
        "  {} subjects, {} days, {}h total ({}h/day)",
        summary.total_subjects, summary.total_days, summary.total_hours, summary.average_hours_per_day
    );
    println!();
    for subject in &summary.subject_breakdown {
        println!(
            "  → {} ({}, {} topics): {}h",
            subject.name, subject.difficulty, subject.topics, subject.total_hours
        );
    }
}

fn display_progress(plan: &StudyPlan, today: NaiveDate) {
    let stats = dashboard_stats(plan, today);

    println!("Overall progress: {}%", stats.progress);
    println!(
        "  Topics: {} / {} completed, {} pending",
        stats.completed_topics, stats.total_topics, stats.pending_topics
    );
    println!("  Subjects: {}", stats.total_subjects);
    println!("  Days left: {}", stats.days_left);
    println!();

    for subject in subject_progress(plan) {
        println!(
            "  {}: {}/{} topics, {:.1}h done, {:.1}h left",
            subject.name,
            subject.completed_topics,
            subject.total_topics,
            subject.completed_hours,
            subject.remaining_hours
        );
    }
    println!();

    for milestone in milestones(stats.progress) {
        let marker = if milestone.current {
            "▶"
        } else if milestone.achieved {
            "✓"
        } else {
            " "
        };
        println!("  {} {} - {}", marker, milestone.title, milestone.subtitle);
    }
}

fn display_sessions(date: NaiveDate, sessions: &[Session]) {
    println!("{}", date.format("%A %Y-%m-%d"));
    if sessions.is_empty() {
        println!("  No sessions scheduled.");
        return;
    }

    for session in sessions {
        let kind = match session.revision_type {
            Some(revision) => format!("Revision: {}", revision),
            None => "Study".to_string(),
        };
        println!(
            "  {} - {}  {}  [{}]",
            session.start_time, session.end_time, session.topic, kind
        );
    }
}
