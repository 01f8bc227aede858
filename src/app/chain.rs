use std::collections::HashMap;

use thiserror::Error;

use super::episode::Episode;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum LibraryError {
    #[error("ranking is empty; nothing to plan")]
    EmptyLibrary,
    #[error("rank {rank} is assigned to both \"{first}\" and \"{second}\"")]
    DuplicateRank {
        rank: u32,
        first: String,
        second: String,
    },
    #[error("S{season:02}E{episode:02} is held by both \"{first}\" and \"{second}\"")]
    DuplicateSlot {
        season: u32,
        episode: u32,
        first: String,
        second: String,
    },
}

// Longest watch order that moves strictly forward in broadcast order and
// strictly upward in quality at every step. Ties between equally long orders
// are broken by iteration order over the input: the first best endpoint wins,
// and reconstruction always takes the first predecessor with a matching
// length.
pub(crate) fn longest_watch_chain(episodes: &[Episode]) -> Result<Vec<Episode>, LibraryError> {
    validate_library(episodes)?;

    let predecessors = predecessor_lists(episodes);
    let lengths = chain_lengths(&predecessors);

    let mut best_idx = 0;
    let mut best_len = 0;
    for (idx, &len) in lengths.iter().enumerate() {
        if len > best_len {
            best_len = len;
            best_idx = idx;
        }
    }

    let mut path = vec![best_idx];
    let mut current = best_idx;
    let mut remaining = best_len;
    while remaining > 1 {
        for &pred in &predecessors[current] {
            if lengths[pred] == remaining - 1 {
                path.push(pred);
                current = pred;
                remaining -= 1;
                break;
            }
        }
    }
    path.reverse();

    Ok(path.into_iter().map(|idx| episodes[idx].clone()).collect())
}

pub(crate) fn may_follow(prev: &Episode, next: &Episode) -> bool {
    next.rank < prev.rank && !next.airs_before(prev)
}

// Full pairwise scan. Predecessor lists keep input order, which the
// tie-breaks in `longest_watch_chain` rely on.
fn predecessor_lists(episodes: &[Episode]) -> Vec<Vec<usize>> {
    let mut predecessors = vec![Vec::new(); episodes.len()];
    for (i, earlier) in episodes.iter().enumerate() {
        for (j, later) in episodes.iter().enumerate() {
            if i == j {
                continue;
            }
            if may_follow(earlier, later) {
                predecessors[j].push(i);
            }
        }
    }
    predecessors
}

// Memoized on-demand recursion so the result does not depend on the input
// being sorted. The memo lives in this call frame only.
fn chain_lengths(predecessors: &[Vec<usize>]) -> Vec<u32> {
    let mut memo = vec![None; predecessors.len()];
    for idx in 0..predecessors.len() {
        chain_length_at(idx, predecessors, &mut memo);
    }
    memo.into_iter().map(|len| len.unwrap_or(1)).collect()
}

fn chain_length_at(idx: usize, predecessors: &[Vec<usize>], memo: &mut Vec<Option<u32>>) -> u32 {
    if let Some(len) = memo[idx] {
        return len;
    }
    let mut best = 0;
    for &pred in &predecessors[idx] {
        best = best.max(chain_length_at(pred, predecessors, memo));
    }
    let len = best + 1;
    memo[idx] = Some(len);
    len
}

fn validate_library(episodes: &[Episode]) -> Result<(), LibraryError> {
    if episodes.is_empty() {
        return Err(LibraryError::EmptyLibrary);
    }

    let mut by_rank: HashMap<u32, &Episode> = HashMap::new();
    let mut by_slot: HashMap<(u32, u32), &Episode> = HashMap::new();
    for episode in episodes {
        if let Some(existing) = by_rank.insert(episode.rank, episode) {
            return Err(LibraryError::DuplicateRank {
                rank: episode.rank,
                first: existing.title.clone(),
                second: episode.title.clone(),
            });
        }
        if let Some(existing) = by_slot.insert(episode.slot(), episode) {
            return Err(LibraryError::DuplicateSlot {
                season: episode.season,
                episode: episode.episode,
                first: existing.title.clone(),
                second: episode.title.clone(),
            });
        }
    }
    Ok(())
}
