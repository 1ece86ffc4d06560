//! Scoring event de-duplication
//!
//! The feed keeps reporting "touchdown" in the status text for several polls
//! after the play. This tracker remembers the last label seen per game so an
//! alert fires once per occurrence, and forgets it as soon as the label
//! clears so the next score is a fresh alert.

use crate::models::{Game, ScoringAlert, ScoringEvent};
use log::{debug, info};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ScoringEventTracker {
    /// game_id -> last non-empty label
    last_events: HashMap<String, ScoringEvent>,
    /// Upper-cased abbreviations that get alerts
    favorite_teams: HashSet<String>,
}

impl ScoringEventTracker {
    pub fn new<I, S>(favorite_teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            last_events: HashMap::new(),
            favorite_teams: favorite_teams
                .into_iter()
                .map(|t| t.as_ref().trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn is_favorite(&self, abbr: &str) -> bool {
        self.favorite_teams.contains(&abbr.to_uppercase())
    }

    pub fn last_event(&self, game_id: &str) -> Option<ScoringEvent> {
        self.last_events.get(game_id).copied()
    }

    pub fn tracked_count(&self) -> usize {
        self.last_events.len()
    }

    /// Compare each live game's label against what was last seen and return
    /// the alerts for new transitions.
    ///
    /// The scoring team is whoever holds possession in the same snapshot.
    /// Entries for games no longer passed in are dropped.
    pub fn check(&mut self, games: &[Game]) -> Vec<ScoringAlert> {
        let mut alerts = Vec::new();

        for game in games {
            let event = match game.scoring_event {
                Some(event) => event,
                None => {
                    self.last_events.remove(&game.id);
                    continue;
                }
            };

            if self.last_events.get(&game.id) == Some(&event) {
                continue;
            }
            self.last_events.insert(game.id.clone(), event);

            let team = match game.possessing_abbr() {
                Some(abbr) => abbr.to_uppercase(),
                None => {
                    debug!(
                        "{} on {} but scoring team unknown (possession {:?})",
                        event,
                        game.matchup(),
                        game.possession
                    );
                    continue;
                }
            };

            if !self.favorite_teams.contains(&team) {
                continue;
            }

            info!("SCORING ALERT: {} - {}", team, event);
            alerts.push(ScoringAlert {
                game_id: game.id.clone(),
                team_abbr: team,
                event,
            });
        }

        let live_ids: HashSet<&str> = games.iter().map(|g| g.id.as_str()).collect();
        self.last_events.retain(|id, _| live_ids.contains(id.as_str()));

        alerts
    }
}
