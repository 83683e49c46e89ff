use breath_core::feedback::NEUTRAL_SCALE;
use breath_core::history::summarize;
use breath_core::progression::{current_streak_on, level_for, xp_to_next_level};
use breath_core::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "breathe")]
#[command(about = "Guided breathing practice with streaks and XP", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available breathing techniques
    List,

    /// Run a breathing session (default)
    Run {
        /// Technique id (see `breathe list`)
        technique: Option<String>,

        /// Milliseconds per tick; each tick is one second of the session
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        tick_ms: Option<u64>,

        /// Stop the session early after this many seconds
        #[arg(long)]
        max_seconds: Option<u32>,

        /// Disable haptic cues
        #[arg(long)]
        no_haptics: bool,

        /// Dry run - show the phase plan without starting
        #[arg(long)]
        dry_run: bool,
    },

    /// Show recent sessions
    History {
        /// How many days back to look
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(0..))]
        days: i64,
    },

    /// Show XP, level and streaks
    Stats,

    /// Export the practice journal to CSV
    Export {
        /// Output CSV path
        path: PathBuf,
    },
}

struct JournalPaths {
    wal: PathBuf,
    progress: PathBuf,
}

impl JournalPaths {
    fn new(data_dir: &Path) -> Self {
        let journal_dir = data_dir.join("journal");
        Self {
            wal: journal_dir.join("practice.wal"),
            progress: journal_dir.join("progress.json"),
        }
    }
}

fn main() -> Result<()> {
    breath_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let paths = JournalPaths::new(&data_dir);

    match cli.command {
        Some(Commands::List) => cmd_list(&config),
        Some(Commands::Run {
            technique,
            tick_ms,
            max_seconds,
            no_haptics,
            dry_run,
        }) => cmd_run(
            &paths,
            &config,
            technique,
            tick_ms,
            max_seconds,
            no_haptics,
            dry_run,
        ),
        Some(Commands::History { days }) => cmd_history(&paths, days),
        Some(Commands::Stats) => cmd_stats(&paths, &config),
        Some(Commands::Export { path }) => cmd_export(&paths, &path),
        None => cmd_run(&paths, &config, None, None, None, false, false),
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    let catalog = get_default_catalog().with_custom(&config.techniques.custom)?;
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn cmd_list(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;

    println!();
    for t in catalog.list() {
        let marker = if t.id == config.session.default_technique {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<12} {:<22} {:>9}  {:>2} cycles  ~{}s",
            marker,
            t.id,
            t.name,
            t.pattern(),
            t.cycles,
            t.total_seconds()
        );
        if !t.description.is_empty() {
            println!("  {:<12} {}", "", t.description);
        }
    }
    println!();
    Ok(())
}

fn cmd_run(
    paths: &JournalPaths,
    config: &Config,
    technique: Option<String>,
    tick_ms: Option<u64>,
    max_seconds: Option<u32>,
    no_haptics: bool,
    dry_run: bool,
) -> Result<()> {
    let catalog = load_catalog(config)?;
    let technique_id = technique.unwrap_or_else(|| config.session.default_technique.clone());

    let Some(technique) = catalog.get(&technique_id).cloned() else {
        let known: Vec<_> = catalog.list().iter().map(|t| t.id.as_str()).collect();
        eprintln!(
            "Unknown technique: {}. Available: {}",
            technique_id,
            known.join(", ")
        );
        return Err(Error::UnknownTechnique(technique_id));
    };

    display_technique(&technique);

    if dry_run {
        for step in cycle_plan(&technique) {
            println!("  → {:<12} {}s", step.phase.label(), step.duration_seconds);
        }
        println!("\n[Dry run - not starting session]");
        return Ok(());
    }

    let tick_interval = Duration::from_millis(tick_ms.unwrap_or(config.session.tick_interval_ms));
    let presenter = Presenter::new(config.session.haptics && !no_haptics);
    let cycles = technique.cycles;

    let mut runner = PracticeRunner::new(
        technique,
        presenter,
        Box::new(TerminalFeedback::default()),
        tick_interval,
    );

    runner.start();
    let record = runner.run(|timer, event| {
        if let Some(SessionEvent::CycleStarted { cycle, .. }) = event {
            println!("  · cycle {}/{}", cycle, cycles);
        }
        match max_seconds {
            Some(limit) if timer.elapsed_seconds() >= limit => Control::Stop,
            _ => Control::Continue,
        }
    });

    let Some(record) = record else {
        return Err(Error::State("Session ended without a result".into()));
    };

    let mut sink = JsonlSink::new(&paths.wal);
    sink.append(&record)?;

    let (progress, award) = UserProgress::update(&paths.progress, |progress| {
        apply_record(progress, &record, &config.progression)
    })?;

    println!();
    if record.completed {
        println!("✓ Session complete!");
    } else {
        println!(
            "Session stopped after {} of {} cycles.",
            record.cycles_completed, record.cycles_planned
        );
    }
    println!("  +{} XP (level {})", award.xp, award.level_after);
    if award.leveled_up() {
        println!("  ★ Level up!");
    }
    if record.completed {
        println!("  Streak: {} day(s)", progress.current_streak);
    }

    Ok(())
}

fn cmd_history(paths: &JournalPaths, days: i64) -> Result<()> {
    let records = load_recent_records(&paths.wal, days)?;

    if records.is_empty() {
        println!("No sessions in the last {} days.", days);
        return Ok(());
    }

    println!();
    for r in &records {
        let when = r.ended_at.with_timezone(&chrono::Local);
        println!(
            "  {}  {:<12} {:>2}/{:<2} cycles  {:>4}s  {}",
            when.format("%Y-%m-%d %H:%M"),
            r.technique_id,
            r.cycles_completed,
            r.cycles_planned,
            r.elapsed_seconds,
            if r.completed { "✓" } else { "stopped" }
        );
    }

    let summary = summarize(&records);
    println!();
    println!(
        "  {} sessions ({} completed), {} min total",
        summary.sessions,
        summary.completed,
        summary.total_seconds / 60
    );
    Ok(())
}

fn cmd_stats(paths: &JournalPaths, config: &Config) -> Result<()> {
    let progress = UserProgress::load(&paths.progress)?;
    let per_level = config.progression.xp_per_level;
    let today = chrono::Local::now().date_naive();
    let week = summarize(&load_recent_records(&paths.wal, 7)?);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  PRACTICE STATS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Level {}  ({} XP, {} to next)",
        level_for(progress.total_xp, per_level),
        progress.total_xp,
        xp_to_next_level(progress.total_xp, per_level)
    );
    println!(
        "  Streak: {} day(s), longest {}",
        current_streak_on(&progress, today),
        progress.longest_streak
    );
    println!(
        "  Sessions: {} completed, {} stopped early",
        progress.sessions_completed, progress.sessions_stopped
    );
    println!("  Time practiced: {} min", progress.total_seconds / 60);
    if let Some(favourite) = week.favourite_technique {
        println!("  Favourite this week: {}", favourite);
    }
    println!();
    Ok(())
}

fn cmd_export(paths: &JournalPaths, path: &Path) -> Result<()> {
    let count = breath_core::csv_export::export_journal(&paths.wal, path)?;
    println!("✓ Exported {} sessions", count);
    println!("  CSV: {}", path.display());
    Ok(())
}

fn display_technique(technique: &BreathingTechnique) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", technique.name.to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    if !technique.description.is_empty() {
        println!("  {}", technique.description);
    }
    println!(
        "  Pattern {} · {} cycles · ~{}s",
        technique.pattern(),
        technique.cycles,
        technique.total_seconds()
    );
    println!();
}

/// Prints labels with a bar sized to the current breathing scale.
/// Terminals have no vibration motor, so haptics only reach the debug log.
struct TerminalFeedback {
    scale: f32,
}

impl Default for TerminalFeedback {
    fn default() -> Self {
        Self {
            scale: NEUTRAL_SCALE,
        }
    }
}

impl FeedbackSink for TerminalFeedback {
    fn deliver(&mut self, cue: &Cue) -> Result<()> {
        match cue {
            Cue::Haptic(h) => tracing::debug!("haptic pulse: {:?}", h),
            Cue::Animate {
                scale,
                duration_seconds,
            } => {
                tracing::trace!("animate to {} over {}s", scale, duration_seconds);
                self.scale = *scale;
            }
            Cue::Label(text) => {
                let width = ((self.scale - 0.75) * 8.0).round().max(1.0) as usize;
                println!("  {:<8} {}", "●".repeat(width), text);
            }
        }
        Ok(())
    }
}
