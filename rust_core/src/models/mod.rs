// Shared models for the live scoreboard
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Game lifecycle
// ============================================================================

/// Where a contest sits in its lifecycle: `pre → in → halftime → in → post`.
///
/// All four status flags on [`Game`] are read from this single value, so
/// exactly one of them is true at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Upcoming,
    Live,
    Halftime,
    Final,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Upcoming => "upcoming",
            GamePhase::Live => "live",
            GamePhase::Halftime => "halftime",
            GamePhase::Final => "final",
        }
    }
}

/// Ephemeral per-snapshot classification of the status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringEvent {
    #[serde(rename = "TOUCHDOWN")]
    Touchdown,
    #[serde(rename = "FIELD GOAL")]
    FieldGoal,
    #[serde(rename = "PAT")]
    Pat,
}

impl ScoringEvent {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringEvent::Touchdown => "TOUCHDOWN",
            ScoringEvent::FieldGoal => "FIELD GOAL",
            ScoringEvent::Pat => "PAT",
        }
    }
}

impl fmt::Display for ScoringEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PossessionSide {
    Home,
    Away,
}

// ============================================================================
// Game record
// ============================================================================

/// One normalized contest, rebuilt from scratch on every extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub home_id: String,
    pub away_id: String,
    pub home_abbr: String,
    pub away_abbr: String,
    pub home_score: u16,
    pub away_score: u16,
    /// 0 = pre-kickoff, 1-4 = quarters, 5+ = overtime
    pub period: u8,
    pub period_text: String,
    /// "MM:SS"
    pub clock: String,
    pub down_distance_text: String,
    /// Team id holding the ball (live only)
    pub possession: Option<String>,
    pub possession_indicator: Option<PossessionSide>,
    pub is_redzone: bool,
    pub home_timeouts: u8,
    pub away_timeouts: u8,
    pub scoring_event: Option<ScoringEvent>,
    pub start_time_utc: Option<DateTime<Utc>>,
    pub phase: GamePhase,
}

impl Game {
    pub fn is_live(&self) -> bool {
        self.phase == GamePhase::Live
    }

    pub fn is_halftime(&self) -> bool {
        self.phase == GamePhase::Halftime
    }

    pub fn is_final(&self) -> bool {
        self.phase == GamePhase::Final
    }

    pub fn is_upcoming(&self) -> bool {
        self.phase == GamePhase::Upcoming
    }

    /// "AWAY@HOME"
    pub fn matchup(&self) -> String {
        format!("{}@{}", self.away_abbr, self.home_abbr)
    }

    /// Period label and clock, e.g. "Q3 07:42"
    pub fn status_text(&self) -> String {
        format!("{} {}", self.period_text, self.clock)
            .trim()
            .to_string()
    }

    /// Abbreviation of the team currently holding the ball, if it can be resolved.
    pub fn possessing_abbr(&self) -> Option<&str> {
        let possession = self.possession.as_deref()?;
        if possession == self.home_id {
            Some(&self.home_abbr)
        } else if possession == self.away_id {
            Some(&self.away_abbr)
        } else {
            None
        }
    }
}

// ============================================================================
// Outputs to downstream collaborators
// ============================================================================

/// Emitted at most once per (game, scoring label) transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringAlert {
    pub game_id: String,
    pub team_abbr: String,
    pub event: ScoringEvent,
}

/// What the rendering side needs after each reconciled tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreboardSnapshot {
    pub current: Option<Game>,
    pub current_index: Option<usize>,
    pub live_count: usize,
    pub test_mode: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_game() -> Game {
        Game {
            id: "401".to_string(),
            home_id: "6".to_string(),
            away_id: "27".to_string(),
            home_abbr: "DAL".to_string(),
            away_abbr: "TB".to_string(),
            home_score: 14,
            away_score: 10,
            period: 3,
            period_text: "Q3".to_string(),
            clock: "07:42".to_string(),
            down_distance_text: "2nd & 7".to_string(),
            possession: Some("27".to_string()),
            possession_indicator: Some(PossessionSide::Away),
            is_redzone: false,
            home_timeouts: 3,
            away_timeouts: 2,
            scoring_event: None,
            start_time_utc: None,
            phase: GamePhase::Live,
        }
    }

    #[test]
    fn test_status_flags_follow_phase() {
        let mut game = sample_game();
        assert!(game.is_live());
        assert!(!game.is_final());

        game.phase = GamePhase::Final;
        assert!(game.is_final());
        assert!(!game.is_live());
        assert!(!game.is_halftime());
        assert!(!game.is_upcoming());
    }

    #[test]
    fn test_matchup_and_status_text() {
        let game = sample_game();
        assert_eq!(game.matchup(), "TB@DAL");
        assert_eq!(game.status_text(), "Q3 07:42");
    }

    #[test]
    fn test_possessing_abbr() {
        let mut game = sample_game();
        assert_eq!(game.possessing_abbr(), Some("TB"));

        game.possession = Some("6".to_string());
        assert_eq!(game.possessing_abbr(), Some("DAL"));

        game.possession = Some("999".to_string());
        assert_eq!(game.possessing_abbr(), None);

        game.possession = None;
        assert_eq!(game.possessing_abbr(), None);
    }

    #[test]
    fn test_scoring_event_serializes_as_label() {
        let json = serde_json::to_string(&ScoringEvent::FieldGoal).unwrap();
        assert_eq!(json, "\"FIELD GOAL\"");
        assert_eq!(ScoringEvent::Pat.to_string(), "PAT");
    }
}
