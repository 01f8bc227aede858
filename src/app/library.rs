use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::episode::Episode;

#[derive(Default)]
pub(crate) struct LibraryRead {
    pub(crate) episodes: Vec<Episode>,
    pub(crate) warnings: Vec<String>,
}

pub(crate) fn read_ranking(path: &Path) -> Result<LibraryRead> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read ranking at {}", path.display()))?;

    let (episodes, skipped_rows) =
        parse_ranking(&raw).with_context(|| format!("ranking at {} is unusable", path.display()))?;

    let mut warnings = Vec::new();
    if skipped_rows > 0 {
        warnings.push(format!(
            "ignored {skipped_rows} malformed ranking row(s) in {}",
            path.display()
        ));
    }

    Ok(LibraryRead { episodes, warnings })
}

pub(crate) fn parse_ranking(raw: &str) -> Result<(Vec<Episode>, usize)> {
    let mut lines = raw.lines();
    let header = lines
        .find(|line| !line.trim().is_empty())
        .context("ranking has no header row")?;
    let columns = RankingColumns::from_header(header)?;

    let mut episodes = Vec::new();
    let mut skipped_rows = 0;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_ranking_row(line, &columns) {
            Some(episode) => episodes.push(episode),
            None => skipped_rows += 1,
        }
    }

    Ok((episodes, skipped_rows))
}

struct RankingColumns {
    rank: usize,
    title: usize,
    season: usize,
    episode: usize,
}

impl RankingColumns {
    fn from_header(header: &str) -> Result<Self> {
        let fields = split_csv_fields(header);
        let column = |name: &str| {
            fields
                .iter()
                .position(|field| field.trim().eq_ignore_ascii_case(name))
                .with_context(|| format!("ranking header has no `{name}` column"))
        };
        Ok(Self {
            rank: column("rank")?,
            title: column("title")?,
            season: column("season")?,
            episode: column("episode")?,
        })
    }
}

fn parse_ranking_row(line: &str, columns: &RankingColumns) -> Option<Episode> {
    let fields = split_csv_fields(line);
    let field = |idx: usize| {
        fields
            .get(idx)
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
    };

    let rank = field(columns.rank)?.parse::<u32>().ok()?;
    let title = field(columns.title)?.to_string();
    let season = field(columns.season)?.parse::<u32>().ok()?;
    let episode = field(columns.episode)?.parse::<u32>().ok()?;
    if rank == 0 || season == 0 || episode == 0 {
        return None;
    }

    Some(Episode {
        rank,
        title,
        season,
        episode,
    })
}

// Minimal quote-aware splitter: double quotes delimit fields, doubled
// quotes inside a quoted field escape a literal quote.
fn split_csv_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
