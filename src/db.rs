use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};

#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub position: u32,
    pub rank: u32,
    pub title: String,
    pub season: u32,
    pub episode: u32,
    pub watched_at: Option<String>,
}

impl PlanEntry {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            position: row.get(0)?,
            rank: row.get(1)?,
            title: row.get(2)?,
            season: row.get(3)?,
            episode: row.get(4)?,
            watched_at: row.get(5)?,
        })
    }
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create data directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("could not open database at {}", path.display()))?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS plan_entry (
                position INTEGER PRIMARY KEY,
                rank INTEGER NOT NULL,
                title TEXT NOT NULL,
                season INTEGER NOT NULL,
                episode INTEGER NOT NULL,
                watched_at TEXT
            );
            "#,
        )?;
        Ok(())
    }

    pub fn replace_plan(&mut self, entries: &[PlanEntry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM plan_entry", [])?;
        for entry in entries {
            tx.execute(
                r#"
                INSERT INTO plan_entry (position, rank, title, season, episode, watched_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    entry.position,
                    entry.rank,
                    entry.title,
                    entry.season,
                    entry.episode,
                    entry.watched_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_plan(&self) -> Result<Vec<PlanEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT position, rank, title, season, episode, watched_at FROM plan_entry ORDER BY position",
        )?;
        let rows = stmt.query_map([], PlanEntry::from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn next_unwatched(&self) -> Result<Option<PlanEntry>> {
        self.first_entry(
            "SELECT position, rank, title, season, episode, watched_at FROM plan_entry WHERE watched_at IS NULL ORDER BY position LIMIT 1",
        )
    }

    pub fn last_watched(&self) -> Result<Option<PlanEntry>> {
        self.first_entry(
            "SELECT position, rank, title, season, episode, watched_at FROM plan_entry WHERE watched_at IS NOT NULL ORDER BY position DESC LIMIT 1",
        )
    }

    fn first_entry(&self, sql: &str) -> Result<Option<PlanEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(PlanEntry::from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn mark_watched(&self, position: u32) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE plan_entry SET watched_at = ?1 WHERE position = ?2 AND watched_at IS NULL",
            params![now, position],
        )?;
        Ok(changed > 0)
    }

    pub fn clear_watched(&self, position: u32) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE plan_entry SET watched_at = NULL WHERE position = ?1 AND watched_at IS NOT NULL",
            params![position],
        )?;
        Ok(changed > 0)
    }

    pub fn reset_progress(&self) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE plan_entry SET watched_at = NULL WHERE watched_at IS NOT NULL",
            [],
        )?;
        Ok(changed)
    }
}
