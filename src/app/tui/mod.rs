mod render;
mod session;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use crate::db::{Database, PlanEntry};

use super::episode::truncate;

use self::render::draw_tui;
use self::session::TuiSession;

pub(crate) fn run_tui(db: &Database) -> Result<()> {
    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut entries = db.list_plan()?;
    let mut table_state = TableState::default();
    table_state.select((!entries.is_empty()).then_some(0));
    let mut pending_reset = false;
    let mut status = if entries.is_empty() {
        status_info("No saved plan yet. Run `marathon plan` first.")
    } else {
        status_info("Ready.")
    };

    loop {
        terminal.draw(|frame| {
            draw_tui(frame, &entries, &mut table_state, &status, pending_reset)
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if pending_reset {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    pending_reset = false;
                    match db.reset_progress() {
                        Ok(cleared) => {
                            status =
                                status_info(&format!("Progress reset: {cleared} entries unmarked."));
                            refresh_entries(db, &mut entries, &mut table_state)?;
                        }
                        Err(err) => status = status_error(&format!("Reset failed: {err}")),
                    }
                }
                KeyCode::Esc | KeyCode::Char('n') => {
                    pending_reset = false;
                    status = status_info("Reset canceled.");
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Up => {
                if let Some(selected) = table_state.selected() {
                    table_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = table_state.selected()
                    && !entries.is_empty()
                {
                    let next = (selected + 1).min(entries.len().saturating_sub(1));
                    table_state.select(Some(next));
                }
            }
            KeyCode::Enter | KeyCode::Char('w') => {
                let Some(selected) = table_state.selected() else {
                    continue;
                };
                if selected >= entries.len() {
                    continue;
                }
                let entry = &entries[selected];
                status = match toggle_watched(db, entry) {
                    Ok(message) => status_info(&message),
                    Err(err) => status_error(&format!(
                        "Update failed for {}: {err}",
                        truncate(&entry.title, 40)
                    )),
                };
                refresh_entries(db, &mut entries, &mut table_state)?;
            }
            KeyCode::Char('r') => {
                if entries.is_empty() {
                    status = status_error("Reset failed: no saved plan.");
                    continue;
                }
                pending_reset = true;
                status = status_info("Confirm reset: y/Enter to reset, n/Esc to cancel.");
            }
            _ => {}
        }
    }

    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}

fn toggle_watched(db: &Database, entry: &PlanEntry) -> Result<String> {
    let short_title = truncate(&entry.title, 40);
    if entry.watched_at.is_some() {
        db.clear_watched(entry.position)?;
        Ok(format!("Unmarked: {short_title}"))
    } else {
        db.mark_watched(entry.position)?;
        Ok(format!("Marked watched: {short_title}"))
    }
}

fn refresh_entries(
    db: &Database,
    entries: &mut Vec<PlanEntry>,
    table_state: &mut TableState,
) -> Result<()> {
    let selected = table_state.selected();
    *entries = db.list_plan()?;
    if entries.is_empty() {
        table_state.select(None);
        return Ok(());
    }

    match selected {
        Some(idx) => table_state.select(Some(idx.min(entries.len() - 1))),
        None => table_state.select(Some(0)),
    }
    Ok(())
}

fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}
