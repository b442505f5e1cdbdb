use std::fmt;

use course_core::model::BADGES;
use services::{
    AppServices, Clock, ModulePercentPolicy, ProgressPolicy, ProgressService, UnlockPolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingOperand { command: &'static str, operand: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUnlock { raw: String },
    InvalidPercent { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingOperand { command, operand } => {
                write!(f, "{command} requires <{operand}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUnlock { raw } => {
                write!(f, "invalid --unlock value: {raw} (expected open|sequential)")
            }
            ArgsError::InvalidPercent { raw } => {
                write!(f, "invalid --percent value: {raw} (expected sections|blended)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  course [status]                               [options]");
    eprintln!("  course read   <module-id> <section-id>        [options]");
    eprintln!("  course answer <module-id> <question-id> <opt> [options]");
    eprintln!("  course badges                                 [options]");
    eprintln!("  course reset                                  [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>                 default sqlite://progress.sqlite3");
    eprintln!("  --unlock  open|sequential         default open");
    eprintln!("  --percent sections|blended        default sections");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_DB_URL, COURSE_UNLOCK_POLICY, COURSE_PERCENT_POLICY, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Read,
    Answer,
    Badges,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "status" => Some(Self::Status),
            "read" => Some(Self::Read),
            "answer" => Some(Self::Answer),
            "badges" => Some(Self::Badges),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Read => "read",
            Self::Answer => "answer",
            Self::Badges => "badges",
            Self::Reset => "reset",
        }
    }

    fn operands(self) -> &'static [&'static str] {
        match self {
            Self::Read => &["module-id", "section-id"],
            Self::Answer => &["module-id", "question-id", "option"],
            Self::Status | Self::Badges | Self::Reset => &[],
        }
    }
}

struct Args {
    db_url: String,
    policy: ProgressPolicy,
    operands: Vec<String>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("COURSE_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://progress.sqlite3".into(), normalize_sqlite_url);
        let mut policy = ProgressPolicy::default();
        if let Ok(raw) = std::env::var("COURSE_UNLOCK_POLICY") {
            policy.unlock = parse_unlock(raw)?;
        }
        if let Ok(raw) = std::env::var("COURSE_PERCENT_POLICY") {
            policy.module_percent = parse_percent(raw)?;
        }
        let mut operands = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--unlock" => policy.unlock = parse_unlock(require_value(args, "--unlock")?)?,
                "--percent" => {
                    policy.module_percent = parse_percent(require_value(args, "--percent")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if operands.len() < cmd.operands().len() => operands.push(arg),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if let Some(missing) = cmd.operands().get(operands.len()) {
            return Err(ArgsError::MissingOperand {
                command: cmd.name(),
                operand: *missing,
            });
        }

        Ok(Self {
            db_url,
            policy,
            operands,
        })
    }
}

fn parse_unlock(raw: String) -> Result<UnlockPolicy, ArgsError> {
    match raw.trim() {
        "open" => Ok(UnlockPolicy::Open),
        "sequential" => Ok(UnlockPolicy::SequentialQuiz),
        _ => Err(ArgsError::InvalidUnlock { raw }),
    }
}

fn parse_percent(raw: String) -> Result<ModulePercentPolicy, ArgsError> {
    match raw.trim() {
        "sections" => Ok(ModulePercentPolicy::SectionsOnly),
        "blended" => Ok(ModulePercentPolicy::BLENDED_70_30),
        _ => Err(ArgsError::InvalidPercent { raw }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

//
// ─── OUTPUT ────────────────────────────────────────────────────────────────────
//

fn print_status(service: &ProgressService) {
    let progress = service.progress();
    let level = service.level();
    println!("Level {} · {} · {} XP", level.level, level.title, progress.xp);
    match service.next_level() {
        Some(next) => println!(
            "  {} XP to {}",
            next.xp_required.saturating_sub(progress.xp),
            next.title
        ),
        None => println!("  top level reached"),
    }
    println!(
        "Streak {} day(s), longest {}",
        progress.streak.current, progress.streak.longest
    );
    println!("Course {}% complete", service.overall_percent());
    println!();

    for def in service.catalog().modules() {
        let id = def.id().as_str();
        let marker = if service.is_module_complete(id) {
            "done"
        } else if service.is_module_unlocked(id) {
            "open"
        } else {
            "locked"
        };
        let quiz = service
            .module_progress(id)
            .map(|m| format!("{}/{}", m.quiz.score, m.quiz.total_questions))
            .unwrap_or_default();
        println!(
            "  {:>2}. [{marker:^6}] {:>3}%  quiz {quiz:<5} {} (~{} min)",
            def.number(),
            service.module_percent(id),
            def.title(),
            def.estimated_minutes()
        );
    }
}

fn print_badges(service: &ProgressService) {
    for badge in BADGES {
        let mark = if service.has_badge(badge.id) { "x" } else { " " };
        println!(
            "  [{mark}] {:<18} {:<26} {}",
            badge.name,
            badge.description,
            badge.criteria.tag()
        );
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: show status when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Status,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Status,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), parsed.policy).await?;
    let mut progress = services.progress_service().await;

    match (cmd, parsed.operands.as_slice()) {
        (Command::Read, [module_id, section_id]) => {
            match progress.mark_section_read(module_id, section_id).await {
                Some(outcome) => {
                    println!("+{} XP", outcome.xp_gained);
                    if outcome.module_completed {
                        println!("Module complete!");
                    }
                    if outcome.course_completed {
                        println!("Course complete!");
                    }
                    for badge in &outcome.badges_awarded {
                        println!("Badge earned: {badge}");
                    }
                }
                None => println!("Nothing recorded (unknown id or already read)."),
            }
        }
        (Command::Answer, [module_id, question_id, option]) => {
            let answer = progress
                .submit_quiz_answer(module_id, question_id, option)
                .await;
            match answer.recorded {
                Some(outcome) => {
                    let verdict = if answer.correct { "Correct" } else { "Incorrect" };
                    println!(
                        "{verdict} (attempt {}), +{} XP",
                        outcome.attempt_number, outcome.xp_gained
                    );
                    if outcome.quiz_completed {
                        println!("Quiz complete!");
                    }
                    for badge in &outcome.badges_awarded {
                        println!("Badge earned: {badge}");
                    }
                }
                None => println!("Unknown module or question."),
            }
        }
        (Command::Badges, _) => print_badges(&progress),
        (Command::Reset, _) => {
            progress.reset_progress().await;
            println!("Progress reset.");
        }
        _ => print_status(&progress),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "course exited with an error");
        std::process::exit(2);
    }
}
