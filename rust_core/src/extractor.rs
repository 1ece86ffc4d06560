//! Feed event → [`Game`] extraction
//!
//! Every event either yields a fully populated game or an [`ExtractionError`]
//! naming the event. A bad event never takes the rest of the snapshot down
//! with it; [`GameDetailExtractor::extract_all`] collects both sides so the
//! caller can keep the good games and log the rest.

use crate::error::ExtractionError;
use crate::models::{Game, GamePhase, PossessionSide, ScoringEvent};
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use serde_json::Value;

/// Timeouts assumed when the feed doesn't report them
pub const DEFAULT_TIMEOUTS: u8 = 3;

const UNKNOWN_EVENT_ID: &str = "unknown";

// ============================================================================
// Scoring keyword table
// ============================================================================

/// Ordered keyword groups used to classify status text.
///
/// The first group with any keyword contained in the text wins; earlier
/// groups take priority.
#[derive(Debug, Clone)]
pub struct ScoringKeywords {
    groups: Vec<(ScoringEvent, Vec<&'static str>)>,
}

impl Default for ScoringKeywords {
    fn default() -> Self {
        Self {
            groups: vec![
                (ScoringEvent::Touchdown, vec!["touchdown", "td"]),
                (ScoringEvent::FieldGoal, vec!["field goal", "fg"]),
                (ScoringEvent::Pat, vec!["extra point", "pat", "point after"]),
            ],
        }
    }
}

impl ScoringKeywords {
    pub fn new(groups: Vec<(ScoringEvent, Vec<&'static str>)>) -> Self {
        Self { groups }
    }

    fn classify(&self, text: &str) -> Option<ScoringEvent> {
        let text = text.to_lowercase();
        self.groups
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(event, _)| *event)
    }

    /// Long detail is searched in full before the short detail is looked at.
    pub fn detect(&self, detail: &str, short_detail: &str) -> Option<ScoringEvent> {
        self.classify(detail).or_else(|| self.classify(short_detail))
    }
}

// ============================================================================
// Extractor
// ============================================================================

/// Outcome of extracting a whole snapshot
#[derive(Debug, Default)]
pub struct ExtractionBatch {
    pub games: Vec<Game>,
    pub failures: Vec<ExtractionError>,
}

#[derive(Debug, Clone)]
pub struct GameDetailExtractor {
    keywords: ScoringKeywords,
    display_tz: Tz,
}

impl Default for GameDetailExtractor {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

/// Team identity pulled from one competitor entry
struct Side {
    id: String,
    abbr: String,
    score: u16,
}

impl GameDetailExtractor {
    /// `display_tz` is only used to label upcoming games' kickoff time.
    pub fn new(display_tz: Tz) -> Self {
        Self::with_keywords(display_tz, ScoringKeywords::default())
    }

    pub fn with_keywords(display_tz: Tz, keywords: ScoringKeywords) -> Self {
        Self {
            keywords,
            display_tz,
        }
    }

    /// Extract every event, keeping going past failures.
    pub fn extract_all(&self, events: &[Value]) -> ExtractionBatch {
        let mut batch = ExtractionBatch::default();

        for event in events {
            match self.extract(event) {
                Ok(game) => batch.games.push(game),
                Err(e) => {
                    warn!("Skipping event {}: {}", e.event_id(), e);
                    batch.failures.push(e);
                }
            }
        }

        batch
    }

    /// Normalize a single raw event.
    pub fn extract(&self, event: &Value) -> Result<Game, ExtractionError> {
        let event_id = event
            .get("id")
            .and_then(value_as_string)
            .ok_or_else(|| missing(UNKNOWN_EVENT_ID, "id"))?;

        let competition = event
            .get("competitions")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .ok_or_else(|| missing(&event_id, "competitions"))?;

        let status = competition
            .get("status")
            .or_else(|| event.get("status"))
            .ok_or_else(|| missing(&event_id, "status"))?;
        let status_type = status
            .get("type")
            .ok_or_else(|| missing(&event_id, "status.type"))?;
        let state = status_type
            .get("state")
            .and_then(Value::as_str)
            .ok_or_else(|| missing(&event_id, "status.type.state"))?;
        let status_name = str_field(status_type, "name");

        let phase = parse_phase(state, status_name).ok_or_else(|| {
            ExtractionError::MalformedField {
                event_id: event_id.clone(),
                field: "status.type.state",
                reason: format!("unknown state `{}`", state),
            }
        })?;

        let (home, away) = parse_competitors(competition, &event_id)?;
        if home.abbr.is_empty() || away.abbr.is_empty() {
            return Err(ExtractionError::MissingAbbreviation { event_id });
        }

        let period = status
            .get("period")
            .and_then(Value::as_u64)
            .map(|p| p.min(u8::MAX as u64) as u8)
            .unwrap_or(0);
        let clock = status
            .get("displayClock")
            .and_then(Value::as_str)
            .unwrap_or("0:00")
            .to_string();
        let start_time_utc = event.get("date").and_then(Value::as_str).and_then(parse_espn_date);

        let mut game = Game {
            id: event_id,
            home_id: home.id,
            away_id: away.id,
            home_abbr: home.abbr,
            away_abbr: away.abbr,
            home_score: home.score,
            away_score: away.score,
            period,
            period_text: String::new(),
            clock,
            down_distance_text: String::new(),
            possession: None,
            possession_indicator: None,
            is_redzone: false,
            home_timeouts: DEFAULT_TIMEOUTS,
            away_timeouts: DEFAULT_TIMEOUTS,
            scoring_event: None,
            start_time_utc,
            phase,
        };

        game.period_text = match phase {
            GamePhase::Live => period_label(period).to_string(),
            GamePhase::Halftime => "HALF".to_string(),
            GamePhase::Final if period > 4 => "Final/OT".to_string(),
            GamePhase::Final => "Final".to_string(),
            GamePhase::Upcoming => self.game_time_label(start_time_utc),
        };

        if phase == GamePhase::Live {
            game.scoring_event = self.keywords.detect(
                str_field(status_type, "detail"),
                str_field(status_type, "shortDetail"),
            );

            if let Some(situation) = competition.get("situation") {
                apply_situation(&mut game, situation);
            }
        }

        debug!(
            "Extracted: {}, Status: {}, Phase: {}",
            game.matchup(),
            status_name,
            game.phase.as_str()
        );

        Ok(game)
    }

    /// Kickoff time in the display timezone, e.g. "7:30 PM".
    fn game_time_label(&self, start: Option<DateTime<Utc>>) -> String {
        start
            .map(|t| t.with_timezone(&self.display_tz).format("%-I:%M %p").to_string())
            .unwrap_or_default()
    }
}

/// Label for an in-progress period.
pub fn period_label(period: u8) -> &'static str {
    match period {
        0 => "Start",
        1 => "Q1",
        2 => "Q2",
        3 => "Q3",
        4 => "Q4",
        _ => "OT",
    }
}

fn parse_phase(state: &str, name: &str) -> Option<GamePhase> {
    if state == "halftime" || name == "STATUS_HALFTIME" {
        return Some(GamePhase::Halftime);
    }
    match state {
        "pre" => Some(GamePhase::Upcoming),
        "in" => Some(GamePhase::Live),
        "post" => Some(GamePhase::Final),
        _ => None,
    }
}

fn parse_competitors(competition: &Value, event_id: &str) -> Result<(Side, Side), ExtractionError> {
    let competitors = competition
        .get("competitors")
        .and_then(Value::as_array)
        .ok_or_else(|| missing(event_id, "competitors"))?;

    let find_side = |side: &str, field: &'static str| -> Result<Side, ExtractionError> {
        let comp = competitors
            .iter()
            .find(|c| c.get("homeAway").and_then(Value::as_str) == Some(side))
            .ok_or_else(|| missing(event_id, field))?;
        let team = comp
            .get("team")
            .ok_or_else(|| missing(event_id, "competitors.team"))?;

        Ok(Side {
            id: team.get("id").and_then(value_as_string).unwrap_or_default(),
            abbr: str_field(team, "abbreviation").trim().to_string(),
            score: comp.get("score").map(parse_score).unwrap_or(0),
        })
    };

    Ok((
        find_side("home", "competitors.home")?,
        find_side("away", "competitors.away")?,
    ))
}

fn apply_situation(game: &mut Game, situation: &Value) {
    game.down_distance_text = str_field(situation, "shortDownDistanceText").to_string();
    game.is_redzone = situation
        .get("isRedZone")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    game.possession = situation
        .get("possession")
        .and_then(value_as_string)
        .filter(|p| !p.is_empty());
    game.possession_indicator = match game.possession.as_deref() {
        Some(p) if p == game.home_id => Some(PossessionSide::Home),
        Some(p) if p == game.away_id => Some(PossessionSide::Away),
        _ => None,
    };
    game.home_timeouts = timeouts(situation, "homeTimeouts");
    game.away_timeouts = timeouts(situation, "awayTimeouts");
}

fn timeouts(situation: &Value, key: &str) -> u8 {
    situation
        .get(key)
        .and_then(Value::as_u64)
        .map(|t| t.min(DEFAULT_TIMEOUTS as u64) as u8)
        .unwrap_or(DEFAULT_TIMEOUTS)
}

/// Scores arrive as strings ("21") on the scoreboard and as numbers elsewhere.
fn parse_score(score: &Value) -> u16 {
    match score {
        Value::String(s) => s.trim().parse::<u16>().unwrap_or(0),
        Value::Number(n) => n.as_u64().map(|n| n.min(u16::MAX as u64) as u16).unwrap_or(0),
        _ => 0,
    }
}

/// Parse ESPN date string, e.g. "2024-01-15T19:00Z" or full RFC 3339
pub fn parse_espn_date(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn missing(event_id: &str, field: &'static str) -> ExtractionError {
    ExtractionError::MissingField {
        event_id: event_id.to_string(),
        field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn event(state: &str, name: &str, period: u64, detail: &str, short_detail: &str) -> Value {
        json!({
            "id": "401547",
            "date": "2024-01-15T19:00Z",
            "competitions": [{
                "status": {
                    "period": period,
                    "displayClock": "07:42",
                    "type": {
                        "state": state,
                        "name": name,
                        "detail": detail,
                        "shortDetail": short_detail
                    }
                },
                "situation": {
                    "shortDownDistanceText": "3rd & 4",
                    "isRedZone": true,
                    "possession": "27",
                    "homeTimeouts": 2
                },
                "competitors": [
                    {"homeAway": "home", "score": "14", "team": {"id": "6", "abbreviation": "DAL"}},
                    {"homeAway": "away", "score": "10", "team": {"id": "27", "abbreviation": "TB"}}
                ]
            }]
        })
    }

    fn live(detail: &str, short_detail: &str) -> Value {
        event("in", "STATUS_IN_PROGRESS", 3, detail, short_detail)
    }

    #[test]
    fn test_extract_live_game() {
        let game = GameDetailExtractor::default()
            .extract(&live("7:42 - 3rd Quarter", "7:42 - 3rd"))
            .unwrap();

        assert_eq!(game.id, "401547");
        assert_eq!(game.matchup(), "TB@DAL");
        assert_eq!((game.home_score, game.away_score), (14, 10));
        assert_eq!(game.period_text, "Q3");
        assert_eq!(game.clock, "07:42");
        assert_eq!(game.down_distance_text, "3rd & 4");
        assert!(game.is_redzone);
        assert_eq!(game.possession.as_deref(), Some("27"));
        assert_eq!(game.possession_indicator, Some(PossessionSide::Away));
        assert_eq!(game.home_timeouts, 2);
        assert_eq!(game.away_timeouts, DEFAULT_TIMEOUTS);
        assert_eq!(game.scoring_event, None);
        assert!(game.is_live());
        assert_eq!(
            game.start_time_utc,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 19, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_period_text_by_state() {
        let extractor = GameDetailExtractor::default();

        for (period, expected) in [(0, "Start"), (1, "Q1"), (2, "Q2"), (4, "Q4"), (5, "OT"), (6, "OT")] {
            let game = extractor
                .extract(&event("in", "STATUS_IN_PROGRESS", period, "", ""))
                .unwrap();
            assert_eq!(game.period_text, expected, "period {}", period);
        }

        let half = extractor
            .extract(&event("halftime", "STATUS_HALFTIME", 2, "Halftime", "Halftime"))
            .unwrap();
        assert_eq!(half.period_text, "HALF");
        assert!(half.is_halftime());

        let final_reg = extractor.extract(&event("post", "STATUS_FINAL", 4, "", "")).unwrap();
        assert_eq!(final_reg.period_text, "Final");
        assert!(final_reg.is_final());

        let final_ot = extractor.extract(&event("post", "STATUS_FINAL", 5, "", "")).unwrap();
        assert_eq!(final_ot.period_text, "Final/OT");
    }

    #[test]
    fn test_halftime_by_name_while_state_in() {
        let game = GameDetailExtractor::default()
            .extract(&event("in", "STATUS_HALFTIME", 2, "Halftime", "Halftime"))
            .unwrap();
        assert!(game.is_halftime());
        assert!(!game.is_live());
        assert_eq!(game.period_text, "HALF");
        assert_eq!(game.down_distance_text, "");
        assert_eq!(game.possession, None);
    }

    #[test]
    fn test_upcoming_game_time_label() {
        let extractor = GameDetailExtractor::new(chrono_tz::America::New_York);
        let game = extractor
            .extract(&event("pre", "STATUS_SCHEDULED", 0, "Mon, January 15th", ""))
            .unwrap();

        assert!(game.is_upcoming());
        assert_eq!(game.period_text, "2:00 PM");
        assert_eq!(game.down_distance_text, "");
        assert!(!game.is_redzone);
        assert_eq!(game.possession_indicator, None);
        assert_eq!(game.home_timeouts, DEFAULT_TIMEOUTS);
    }

    #[test]
    fn test_situational_fields_only_while_live() {
        let game = GameDetailExtractor::default()
            .extract(&event("post", "STATUS_FINAL", 4, "Final - touchdown", ""))
            .unwrap();
        assert_eq!(game.down_distance_text, "");
        assert!(!game.is_redzone);
        assert_eq!(game.possession, None);
        assert_eq!(game.scoring_event, None);
    }

    #[test]
    fn test_scoring_event_detection() {
        let extractor = GameDetailExtractor::default();
        let detect = |detail: &str, short: &str| extractor.extract(&live(detail, short)).unwrap().scoring_event;

        assert_eq!(detect("TOUCHDOWN by Evans", ""), Some(ScoringEvent::Touchdown));
        assert_eq!(detect("Aubrey 45 Yd Field Goal", ""), Some(ScoringEvent::FieldGoal));
        assert_eq!(detect("Extra Point is GOOD", ""), Some(ScoringEvent::Pat));
        assert_eq!(detect("", "Point After attempt"), Some(ScoringEvent::Pat));
        assert_eq!(detect("", "FG good"), Some(ScoringEvent::FieldGoal));
        assert_eq!(detect("7:42 - 3rd Quarter", "7:42 - 3rd"), None);
    }

    #[test]
    fn test_scoring_priority_long_before_short_and_group_order() {
        let extractor = GameDetailExtractor::default();

        // Long text wins even if short text names a higher-priority group
        let game = extractor.extract(&live("Field goal is good", "touchdown")).unwrap();
        assert_eq!(game.scoring_event, Some(ScoringEvent::FieldGoal));

        // Within one text, touchdown beats extra point
        let game = extractor.extract(&live("Touchdown, extra point good", "")).unwrap();
        assert_eq!(game.scoring_event, Some(ScoringEvent::Touchdown));
    }

    #[test]
    fn test_custom_scoring_keywords() {
        let keywords = ScoringKeywords::new(vec![
            (ScoringEvent::Pat, vec!["two-point"]),
            (ScoringEvent::Touchdown, vec!["touchdown"]),
        ]);
        let extractor = GameDetailExtractor::with_keywords(chrono_tz::UTC, keywords);

        let game = extractor.extract(&live("Touchdown, two-point try good", "")).unwrap();
        assert_eq!(game.scoring_event, Some(ScoringEvent::Pat));
        // Default keywords no longer apply
        let game = extractor.extract(&live("Aubrey 45 Yd Field Goal", "FG")).unwrap();
        assert_eq!(game.scoring_event, None);
    }

    #[test]
    fn test_possession_indicator_home_and_unknown() {
        let extractor = GameDetailExtractor::default();

        let mut raw = live("", "");
        raw["competitions"][0]["situation"]["possession"] = json!("6");
        let game = extractor.extract(&raw).unwrap();
        assert_eq!(game.possession_indicator, Some(PossessionSide::Home));

        raw["competitions"][0]["situation"]["possession"] = json!("99");
        let game = extractor.extract(&raw).unwrap();
        assert_eq!(game.possession.as_deref(), Some("99"));
        assert_eq!(game.possession_indicator, None);
    }

    #[test]
    fn test_missing_abbreviation_is_error() {
        let mut raw = live("", "");
        raw["competitions"][0]["competitors"][1]["team"]["abbreviation"] = json!("");

        let err = GameDetailExtractor::default().extract(&raw).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MissingAbbreviation {
                event_id: "401547".to_string()
            }
        );
    }

    #[test]
    fn test_missing_structures_are_errors() {
        let extractor = GameDetailExtractor::default();

        let err = extractor.extract(&json!({"competitions": []})).unwrap_err();
        assert_eq!(err.event_id(), "unknown");

        let err = extractor.extract(&json!({"id": "9", "competitions": []})).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingField { field: "competitions", .. }));

        let mut raw = live("", "");
        raw["competitions"][0].as_object_mut().unwrap().remove("status");
        let err = extractor.extract(&raw).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingField { field: "status", .. }));

        let mut raw = live("", "");
        raw["competitions"][0]["competitors"].as_array_mut().unwrap().pop();
        let err = extractor.extract(&raw).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingField { field: "competitors.away", .. }));

        let raw = event("delayed", "STATUS_DELAYED", 1, "", "");
        let err = extractor.extract(&raw).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedField { .. }));
    }

    #[test]
    fn test_extract_all_skips_bad_events() {
        let mut bad = live("", "");
        bad["id"] = json!("bad");
        bad["competitions"][0]["competitors"][0]["team"]["abbreviation"] = json!("");

        let mut good2 = live("", "");
        good2["id"] = json!(402);

        let batch = GameDetailExtractor::default().extract_all(&[live("", ""), bad, good2]);

        assert_eq!(batch.games.len(), 2);
        assert_eq!(batch.games[1].id, "402");
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].event_id(), "bad");
    }

    #[test]
    fn test_parse_espn_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 9, 8, 17, 0, 0).unwrap();
        assert_eq!(parse_espn_date("2024-09-08T17:00Z"), Some(expected));
        assert_eq!(parse_espn_date("2024-09-08T17:00:00Z"), Some(expected));
        assert_eq!(parse_espn_date("next sunday"), None);
    }

    #[test]
    fn test_numeric_scores_and_missing_situation() {
        let mut raw = live("", "");
        raw["competitions"][0]["competitors"][0]["score"] = json!(21);
        raw["competitions"][0].as_object_mut().unwrap().remove("situation");

        let game = GameDetailExtractor::default().extract(&raw).unwrap();
        assert_eq!(game.home_score, 21);
        assert_eq!(game.down_distance_text, "");
        assert_eq!(game.home_timeouts, DEFAULT_TIMEOUTS);
    }
}
