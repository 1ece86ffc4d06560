//! Live game registry
//!
//! Owns the ordered live set and the "current" display pointer, and merges
//! each freshly extracted snapshot into them.
//!
//! Invariants held after every call:
//! - no two entries share an id
//! - `current` is `None` exactly when the set is empty, otherwise a valid index
//! - positions only move when the set of ids itself changes

use crate::models::Game;
use log::info;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// What a reconciliation did to the live set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing tracked before, nothing live now
    Idle,
    /// Every tracked game dropped out
    Cleared { removed: usize },
    /// The set of ids changed; contents were replaced and re-sorted
    Replaced {
        added: Vec<String>,
        removed: Vec<String>,
        /// The previously current game is gone (or there was none), so the
        /// pointer went back to the first game
        current_reset: bool,
    },
    /// Same ids as before; records refreshed in place
    Refreshed,
}

impl ReconcileOutcome {
    pub fn current_reset(&self) -> bool {
        matches!(self, ReconcileOutcome::Replaced { current_reset: true, .. })
    }
}

#[derive(Debug, Default)]
pub struct LiveGameRegistry {
    games: Vec<Game>,
    current: Option<usize>,
}

impl LiveGameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.games.iter().map(|g| g.id.as_str()).collect()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Game> {
        self.current.and_then(|i| self.games.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut Game> {
        let index = self.current?;
        self.games.get_mut(index)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.games.iter().position(|g| g.id == id)
    }

    /// Replace the whole set with a single game and point at it.
    pub fn seed(&mut self, game: Game) {
        self.games = vec![game];
        self.current = Some(0);
    }

    /// Move the pointer to the next game, wrapping around.
    pub fn advance(&mut self) -> Option<&Game> {
        if self.games.is_empty() {
            self.current = None;
            return None;
        }
        let next = self.current.map_or(0, |i| (i + 1) % self.games.len());
        self.current = Some(next);
        self.games.get(next)
    }

    /// Merge a filtered candidate list into the live set.
    pub fn reconcile(&mut self, candidates: Vec<Game>) -> ReconcileOutcome {
        let candidates = dedup_by_id(candidates);

        if candidates.is_empty() {
            self.current = None;
            if self.games.is_empty() {
                return ReconcileOutcome::Idle;
            }
            let removed = self.games.len();
            self.games.clear();
            info!("Live games previously showing have ended or are no longer live.");
            return ReconcileOutcome::Cleared { removed };
        }

        let (added, removed) = {
            let new_ids: HashSet<&str> = candidates.iter().map(|g| g.id.as_str()).collect();
            let old_ids: HashSet<&str> = self.games.iter().map(|g| g.id.as_str()).collect();

            let added: Vec<String> = candidates
                .iter()
                .filter(|g| !old_ids.contains(g.id.as_str()))
                .map(|g| g.id.clone())
                .collect();
            let removed: Vec<String> = self
                .games
                .iter()
                .filter(|g| !new_ids.contains(g.id.as_str()))
                .map(|g| g.id.clone())
                .collect();
            (added, removed)
        };

        if added.is_empty() && removed.is_empty() {
            let mut fresh: HashMap<String, Game> =
                candidates.into_iter().map(|g| (g.id.clone(), g)).collect();
            for slot in self.games.iter_mut() {
                if let Some(game) = fresh.remove(&slot.id) {
                    *slot = game;
                }
            }
            return ReconcileOutcome::Refreshed;
        }

        let previous_current = self.current().map(|g| g.id.clone());

        let mut sorted = candidates;
        sorted.sort_by(compare_start_time);
        self.games = sorted;

        let current_reset = match previous_current.and_then(|id| self.position(&id)) {
            Some(index) => {
                self.current = Some(index);
                false
            }
            None => {
                self.current = Some(0);
                true
            }
        };

        ReconcileOutcome::Replaced {
            added,
            removed,
            current_reset,
        }
    }
}

/// Keep the first occurrence of each id, preserving feed order.
fn dedup_by_id(games: Vec<Game>) -> Vec<Game> {
    let mut seen = HashSet::new();
    games
        .into_iter()
        .filter(|g| seen.insert(g.id.clone()))
        .collect()
}

/// Earliest kickoff first; games without a start time go last. Used with a
/// stable sort, so ties keep their feed order from tick to tick.
fn compare_start_time(a: &Game, b: &Game) -> Ordering {
    match (a.start_time_utc, b.start_time_utc) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
