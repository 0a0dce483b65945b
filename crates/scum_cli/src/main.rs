use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use scum_core::backup;
use scum_core::config::{self, EditPlan};
use scum_core::core_api::{CoreError, CoreErrorCode, EditReport, Engine, LocalPrisoner};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;
const EXIT_CANCELLED: i32 = 130;

/// Maxes out (or sets) the attributes and skills of a SCUM single player
/// prisoner by patching the save database directly.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Save database to edit. Defaults to the game's single player database.
    #[arg(long, value_name = "SCUM.db")]
    db: Option<PathBuf>,
    /// JSON edit plan replacing the built-in maxed-out values.
    #[arg(long, value_name = "PLAN.json")]
    config: Option<PathBuf>,
    /// Prisoner to edit; skips the interactive selection.
    #[arg(long, value_name = "ID")]
    id: Option<i64>,
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // Ctrl-C before the commit leaves the open transaction uncommitted, so the
    // save is untouched and the backup is still there.
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\nExiting...");
        process::exit(EXIT_CANCELLED);
    }) {
        tracing::warn!("failed to install Ctrl-C handler: {e}");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    match run(&cli, &mut input) {
        Ok(()) => {
            pause(&mut input, "\nAll done! Press enter to exit.");
        }
        Err(e) if e.is_cancelled() => {
            println!("\nExiting...");
            process::exit(EXIT_CANCELLED);
        }
        Err(e) => {
            println!("\n\nSomething went wrong...\n");
            eprintln!("{e}");
            pause(&mut input, "\n\nPress enter to exit.");
            process::exit(EXIT_FAILURE);
        }
    }
}

fn run(cli: &Cli, input: &mut impl BufRead) -> Result<(), CoreError> {
    let plan = match &cli.config {
        Some(path) => EditPlan::from_json_path(path)?,
        None => EditPlan::default(),
    };
    for warning in plan.range_warnings() {
        tracing::warn!("{warning}");
    }

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => config::default_database_path()?,
    };

    println!("Backing up database... ");
    let backup_path = backup::create_backup(&db_path)?;
    println!("Backed up to: {}", backup_path.display());

    println!("\nConnecting to database...");
    let mut session = Engine::new().open_path(&db_path)?;

    let prisoner_id = match cli.id {
        Some(id) => id,
        None => choose_prisoner(&session.local_prisoners()?, input)?,
    };

    println!("Loading prisoner with ID {prisoner_id}...");
    let report = session.apply(prisoner_id, &plan)?;
    print_report(&report);

    Ok(())
}

fn choose_prisoner(
    candidates: &[LocalPrisoner],
    input: &mut impl BufRead,
) -> Result<i64, CoreError> {
    println!("\nFound prisoners in local single player:\n");
    for prisoner in candidates {
        println!("\"{}\" with ID {}", prisoner.display_name(), prisoner.id);
    }

    let line = prompt(input, "\nEnter prisoner ID: ")?;
    line.trim().parse::<i64>().map_err(|_| {
        CoreError::new(
            CoreErrorCode::InvalidInput,
            format!("invalid prisoner ID: {:?}", line.trim()),
        )
    })
}

fn print_report(report: &EditReport) {
    println!("\nUpdating attributes... ");
    for change in &report.attributes {
        println!("  {}: {} -> {}", change.name, change.previous, change.written);
    }
    println!("Success!");

    println!("Updating skills... ");
    for change in &report.skills {
        println!(
            "  {}: level {} -> {}, experience {} -> {}",
            change.name,
            change.previous_level,
            change.level,
            change.previous_experience,
            change.experience
        );
    }
    println!("Success!");
}

/// Reads one line. End of input means the user bailed out.
fn prompt(input: &mut impl BufRead, message: &str) -> Result<String, CoreError> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CoreError::cancelled());
    }
    Ok(line)
}

fn pause(input: &mut impl BufRead, message: &str) {
    // Nothing useful to do if stdin is already gone.
    let _ = prompt(input, message);
}
