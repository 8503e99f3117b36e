//! Placement resolution for multi-player games.

use std::collections::BTreeMap;

use crate::models::Ranked;

/// Below this many seats the organizer's ranking is the placement.
const MIN_TIE_BREAK_PARTICIPANTS: usize = 3;

/// Resolve each participant's placement, breaking shared rankings by score.
///
/// Returns participant index -> placement. Rows without a ranking get no entry.
///
/// - Rank 1 is always placement 1, even when shared.
/// - A rank held by one participant is its own placement.
/// - Inside a shared rank, a member places at `rank + members with a strictly
///   higher score`; equal scores stay tied and a missing score keeps the rank.
///
/// Ranks `[1, 2, 2, 2]` with scores `[50, 40, 40, 30]` resolve to `[1, 2, 2, 4]`.
pub fn resolve_placements<T: Ranked>(participants: &[T]) -> BTreeMap<usize, u32> {
    let mut placements = BTreeMap::new();

    if participants.len() < MIN_TIE_BREAK_PARTICIPANTS {
        for (index, participant) in participants.iter().enumerate() {
            if let Some(rank) = participant.ranking() {
                placements.insert(index, rank);
            }
        }
        return placements;
    }

    let mut by_rank: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (index, participant) in participants.iter().enumerate() {
        if let Some(rank) = participant.ranking() {
            by_rank.entry(rank).or_default().push(index);
        }
    }

    for (rank, members) in by_rank {
        if rank == 1 || members.len() == 1 {
            placements.extend(members.into_iter().map(|index| (index, rank)));
            continue;
        }

        for &index in &members {
            let placement = match participants[index].final_score() {
                Some(score) => {
                    let ahead = members
                        .iter()
                        .filter(|&&other| {
                            participants[other]
                                .final_score()
                                .is_some_and(|s| s > score)
                        })
                        .count();
                    rank.saturating_add(u32::try_from(ahead).unwrap_or(u32::MAX))
                }
                None => rank,
            };
            placements.insert(index, placement);
        }
    }

    placements
}
