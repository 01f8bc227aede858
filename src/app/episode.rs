use chrono::{DateTime, Local};

use crate::db::PlanEntry;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Episode {
    pub(crate) rank: u32,
    pub(crate) title: String,
    pub(crate) season: u32,
    pub(crate) episode: u32,
}

impl Episode {
    pub(crate) fn slot(&self) -> (u32, u32) {
        (self.season, self.episode)
    }

    pub(crate) fn airs_before(&self, other: &Episode) -> bool {
        self.slot() < other.slot()
    }
}

pub(crate) fn episode_code(season: u32, episode: u32) -> String {
    format!("S{season:02}E{episode:02}")
}

pub(crate) fn format_plan_line(entry: &PlanEntry) -> String {
    format!(
        "{:>3}  {:02}. {} ({})",
        entry.position,
        entry.rank,
        entry.title,
        episode_code(entry.season, entry.episode)
    )
}

pub(crate) fn format_watched_display(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M %:z")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

pub(crate) fn format_watched_display_tui(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}
