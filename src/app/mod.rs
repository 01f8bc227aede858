mod chain;
mod episode;
mod library;
mod tui;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};

use crate::cli::{Cli, Command};
use crate::db::{Database, PlanEntry};
use crate::http::fetch_text;
use crate::paths::{database_file_path, ranking_file_path};

use self::chain::longest_watch_chain;
use self::episode::{Episode, episode_code, format_plan_line, format_watched_display, truncate};
use self::library::{parse_ranking, read_ranking};

pub fn run(cli: Cli) -> Result<()> {
    let mut db = open_db()?;

    match cli.command {
        Some(Command::Plan { file, json }) => run_plan(&mut db, file.as_deref(), json)?,
        Some(Command::Fetch { url }) => run_fetch(&url)?,
        Some(Command::Next) => run_next(&db)?,
        Some(Command::Undo) => run_undo(&db)?,
        Some(Command::List) => run_list(&db)?,
        Some(Command::Tui) | None => tui::run_tui(&db)?,
    }

    Ok(())
}

fn run_plan(db: &mut Database, file: Option<&Path>, json: bool) -> Result<()> {
    let ranking_path = match file {
        Some(path) => path.to_path_buf(),
        None => default_ranking_path()?,
    };

    let read = read_ranking(&ranking_path)?;
    for warning in &read.warnings {
        eprintln!("Warning: {warning}");
    }
    if read.episodes.is_empty() {
        bail!("no episodes found in {}", ranking_path.display());
    }

    let plan = longest_watch_chain(&read.episodes)
        .with_context(|| format!("ranking at {} cannot be planned", ranking_path.display()))?;
    let entries = plan_entries(&plan);
    db.replace_plan(&entries)?;

    if json {
        println!("{}", plan_as_json(&entries));
        return Ok(());
    }

    println!(
        "Watch order: {} of {} ranked episodes, each later and better than the last.\n",
        entries.len(),
        read.episodes.len()
    );
    for entry in &entries {
        println!("{}", format_plan_line(entry));
    }
    println!("\nSaved. Run `marathon next` after each episode you watch.");
    Ok(())
}

fn run_fetch(url: &str) -> Result<()> {
    let body = fetch_text(
        url,
        Duration::from_secs(5),
        Duration::from_secs(15),
        3,
        Duration::from_secs(1),
    )
    .map_err(|err| anyhow!(err))?;

    let (episodes, skipped_rows) =
        parse_ranking(&body).with_context(|| format!("ranking fetched from {url} is unusable"))?;
    if episodes.is_empty() {
        bail!("no episodes found in ranking fetched from {url}");
    }
    if skipped_rows > 0 {
        eprintln!("Warning: ignored {skipped_rows} malformed ranking row(s)");
    }

    let path = ranking_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create data directory {}", parent.display()))?;
    }
    fs::write(&path, &body)
        .with_context(|| format!("failed to write ranking to {}", path.display()))?;

    println!("Fetched {} episodes to {}", episodes.len(), path.display());
    println!("Run `marathon plan` to build the watch order.");
    Ok(())
}

fn run_next(db: &Database) -> Result<()> {
    let entries = db.list_plan()?;
    if entries.is_empty() {
        println!("No saved plan yet. Run `marathon plan` first.");
        return Ok(());
    }

    match db.next_unwatched()? {
        Some(entry) => {
            db.mark_watched(entry.position)?;
            println!("Marked watched: {}", format_plan_line(&entry));

            let remaining = entries
                .iter()
                .filter(|planned| planned.watched_at.is_none())
                .count()
                .saturating_sub(1);
            if remaining == 0 {
                println!("That was the last one. Marathon complete.");
            } else {
                println!("{remaining} episode(s) left in the plan.");
            }
        }
        None => println!("Plan complete. Nothing left to watch."),
    }
    Ok(())
}

fn run_undo(db: &Database) -> Result<()> {
    match db.last_watched()? {
        Some(entry) => {
            db.clear_watched(entry.position)?;
            println!("Unmarked: {}", format_plan_line(&entry));
        }
        None => println!("Nothing watched yet."),
    }
    Ok(())
}

fn run_list(db: &Database) -> Result<()> {
    let entries = db.list_plan()?;
    if entries.is_empty() {
        println!("No saved plan yet. Run `marathon plan` first.");
        return Ok(());
    }

    println!(
        "{:<4} {:<5} {:<8} {:<40} {:<28}",
        "#", "RANK", "CODE", "TITLE", "WATCHED"
    );
    for entry in &entries {
        println!(
            "{:<4} {:<5} {:<8} {:<40} {:<28}",
            entry.position,
            format!("{:02}", entry.rank),
            episode_code(entry.season, entry.episode),
            truncate(&entry.title, 40),
            entry
                .watched_at
                .as_deref()
                .map(format_watched_display)
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    let watched = entries
        .iter()
        .filter(|entry| entry.watched_at.is_some())
        .count();
    println!("\n{watched} of {} watched.", entries.len());
    Ok(())
}

fn default_ranking_path() -> Result<PathBuf> {
    let path = ranking_file_path()?;
    if !path.exists() {
        bail!(
            "no ranking at {} yet; run `marathon fetch <url>` or pass a CSV path to `marathon plan`",
            path.display()
        );
    }
    Ok(path)
}

fn plan_entries(plan: &[Episode]) -> Vec<PlanEntry> {
    plan.iter()
        .enumerate()
        .map(|(idx, episode)| PlanEntry {
            position: (idx + 1) as u32,
            rank: episode.rank,
            title: episode.title.clone(),
            season: episode.season,
            episode: episode.episode,
            watched_at: None,
        })
        .collect()
}

fn plan_as_json(entries: &[PlanEntry]) -> String {
    let values: Vec<serde_json::Value> = entries
        .iter()
        .map(|entry| {
            serde_json::json!({
                "position": entry.position,
                "rank": entry.rank,
                "title": entry.title,
                "season": entry.season,
                "episode": entry.episode,
            })
        })
        .collect();
    serde_json::Value::Array(values).to_string()
}

fn open_db() -> Result<Database> {
    let db_path = database_file_path()?;
    let db = Database::open(&db_path)?;
    db.migrate()?;
    Ok(db)
}
