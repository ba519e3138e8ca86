//! Picking the next queue index while shuffling.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::ShufflePolicy;

use super::state::PlayerState;

/// Choose the next index for a non-empty queue.
pub(super) fn pick_next<R: Rng>(
    state: &mut PlayerState,
    policy: ShufflePolicy,
    rng: &mut R,
) -> usize {
    match policy {
        ShufflePolicy::Recency => pick_avoiding_recent(state, rng),
        ShufflePolicy::Cycle => pick_from_cycle(state, rng),
    }
}

fn pick_avoiding_recent<R: Rng>(state: &PlayerState, rng: &mut R) -> usize {
    let len = state.queue.len();
    let current = state.current_index;

    let others: Vec<usize> = (0..len).filter(|&i| Some(i) != current).collect();
    let fresh: Vec<usize> = others
        .iter()
        .copied()
        .filter(|&i| !state.playlists.recently_played.contains(&state.queue[i].id))
        .collect();

    let pool = if fresh.is_empty() { &others } else { &fresh };
    pool.choose(rng).copied().unwrap_or(current.unwrap_or(0))
}

fn pick_from_cycle<R: Rng>(state: &mut PlayerState, rng: &mut R) -> usize {
    let current_id = state.current_id().cloned();
    let queue = &state.queue;

    state
        .shuffle_remaining
        .retain(|id| Some(id) != current_id.as_ref() && queue.iter().any(|t| &t.id == id));

    if state.shuffle_remaining.is_empty() {
        state.shuffle_remaining = queue
            .iter()
            .map(|t| t.id.clone())
            .filter(|id| Some(id) != current_id.as_ref())
            .collect();
        state.shuffle_remaining.dedup();
    }

    if state.shuffle_remaining.is_empty() {
        return state.current_index.unwrap_or(0);
    }

    let pick = rng.gen_range(0..state.shuffle_remaining.len());
    let id = state.shuffle_remaining.swap_remove(pick);
    state.queue_position(&id).unwrap_or(0)
}
