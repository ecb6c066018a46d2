mod app_dirs;
mod ingest;
mod mistakes;
mod scoring;
mod session;
mod store;

use crate::session::{Action, Session, Status};
use crate::store::ProgressDb;
use clap::Parser;
use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// line-by-line typing practice over your own documents
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice typing against your own documents, one line at a time. \
Accuracy is scored per character, mistakes are tracked across sessions, and \
progress survives restarts so you can pick up where you left off."
)]
struct Cli {
    /// document to practice; omit to list resumable documents
    file: Option<PathBuf>,

    /// override the progress file location
    #[clap(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut db = match &cli.db {
        Some(path) => ProgressDb::with_path(path),
        None => ProgressDb::new(),
    };

    let Some(file) = &cli.file else {
        list_documents(&db);
        return Ok(());
    };

    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or("not a file path")?;

    // nothing is ingested on failure, so the error is recoverable: the
    // record map is untouched and the user just picks another file
    let lines = ingest::extract_lines(file).map_err(|e| e.to_string())?;
    db.add_file(&filename, lines.len())?;

    let mut session = Session::start_or_resume(&db, &filename, lines);
    if session.status() == Status::Complete && session.current_index() > 0 {
        println!("'{filename}' is already complete.");
        print_summary(&session);
        return Ok(());
    }

    println!("Practicing '{filename}'. Type each line and press enter; enter ':stop' to end early.\n");

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();
    while session.status() == Status::InProgress {
        let Some(target) = session.current_line().map(str::to_string) else {
            break;
        };

        println!(
            "[{}/{}] score {:.2}",
            session.current_index() + 1,
            session.total_lines(),
            session.average_score()
        );
        println!("{target}");

        let Some(typed) = input.next().transpose()? else {
            // stdin closed mid-run; progress up to here is already persisted
            break;
        };

        if typed.trim() == ":stop" {
            // not a scored attempt; every advance is already persisted
            break;
        }
        session.submit(&mut db, &typed, Action::Advance)?;
    }

    print_summary(&session);
    Ok(())
}

fn print_summary(session: &Session) {
    let summary = session.summary();
    println!("\n--- session summary ---");
    println!("final score: {:.2}", summary.final_score);
    println!(
        "lines typed: {}/{}",
        summary.typed_lines, summary.total_lines
    );

    if summary.ranked_mistakes.is_empty() {
        println!("no mistakes recorded");
    } else {
        println!("most frequent mistakes:");
        for m in &summary.ranked_mistakes {
            println!("  expected '{}', typed '{}' ({}x)", m.expected, m.typed, m.count);
        }
    }
}

fn list_documents(db: &ProgressDb) {
    let files = db.get_all_files();
    if files.is_empty() {
        println!("no documents yet; pass a text file to start practicing");
        return;
    }

    println!("resumable documents:");
    for (name, record) in files {
        let last = record
            .last_practiced
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {name}: line {}/{}, score {:.2}, last practiced {last}",
            record.current_index, record.total_lines, record.score
        );
    }
}
