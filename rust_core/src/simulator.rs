//! Network-free game clock simulation for test mode.
//!
//! Runs the current game's clock down one second per poll, rolls quarters
//! over, and ends the game after regulation. The down & distance text is
//! cosmetic filler so the display has something to change; nothing reads it.

use crate::error::ClockParseError;
use crate::extractor::period_label;
use crate::league_config::FootballLeague;
use crate::models::{Game, GamePhase};

const DOWNS: [&str; 4] = ["1st", "2nd", "3rd", "4th"];

/// What one simulated second did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Game isn't live; nothing changed
    Idle,
    Running,
    QuarterEnded { period: u8 },
    GameEnded,
}

#[derive(Debug, Clone)]
pub struct TestClockSimulator {
    regulation_periods: u8,
    quarter_minutes: i32,
}

impl Default for TestClockSimulator {
    fn default() -> Self {
        Self::new(4, 15)
    }
}

impl TestClockSimulator {
    pub fn new(regulation_periods: u8, quarter_minutes: i32) -> Self {
        Self {
            regulation_periods,
            quarter_minutes,
        }
    }

    pub fn for_league(league: &FootballLeague) -> Self {
        let quarter_minutes = parse_clock(league.quarter_clock)
            .map(|(m, _)| m)
            .unwrap_or(15);
        Self::new(league.regulation_periods, quarter_minutes)
    }

    /// Clock a fresh quarter starts from, e.g. "15:00"
    pub fn quarter_clock(&self) -> String {
        format!("{:02}:00", self.quarter_minutes)
    }

    /// Run the clock down by one second.
    ///
    /// On a parse error the game is left untouched.
    pub fn advance(&self, game: &mut Game) -> Result<ClockTick, ClockParseError> {
        if !game.is_live() {
            return Ok(ClockTick::Idle);
        }

        let (mut minutes, mut seconds) = parse_clock(&game.clock)?;
        let mut outcome = ClockTick::Running;

        seconds -= 1;
        if seconds < 0 {
            seconds = 59;
            minutes -= 1;
            if minutes < 0 {
                if game.period < self.regulation_periods {
                    game.period += 1;
                    game.period_text = period_label(game.period).to_string();
                    minutes = self.quarter_minutes;
                    seconds = 0;
                    outcome = ClockTick::QuarterEnded { period: game.period };
                } else {
                    game.phase = GamePhase::Final;
                    game.period_text = "Final".to_string();
                    minutes = 0;
                    seconds = 0;
                    outcome = ClockTick::GameEnded;
                }
            }
        }

        game.clock = format!("{:02}:{:02}", minutes, seconds);

        if seconds % 15 == 0 {
            game.down_distance_text =
                format!("{} & {}", DOWNS[(seconds % 4) as usize], seconds % 10 + 1);
        }

        Ok(outcome)
    }
}

/// Parse "MM:SS" (minutes may be one digit).
pub fn parse_clock(clock: &str) -> Result<(i32, i32), ClockParseError> {
    let err = || ClockParseError {
        clock: clock.to_string(),
    };

    let (m, s) = clock.trim().split_once(':').ok_or_else(err)?;
    let minutes = m.parse::<i32>().map_err(|_| err())?;
    let seconds = s.parse::<i32>().map_err(|_| err())?;

    if minutes < 0 || !(0..60).contains(&seconds) {
        return Err(err());
    }
    Ok((minutes, seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league_config::get_league;

    fn live_game(period: u8, clock: &str) -> Game {
        Game {
            id: "test-game".to_string(),
            home_id: "6".to_string(),
            away_id: "27".to_string(),
            home_abbr: "DAL".to_string(),
            away_abbr: "TB".to_string(),
            home_score: 0,
            away_score: 0,
            period,
            period_text: period_label(period).to_string(),
            clock: clock.to_string(),
            down_distance_text: String::new(),
            possession: None,
            possession_indicator: None,
            is_redzone: false,
            home_timeouts: 3,
            away_timeouts: 3,
            scoring_event: None,
            start_time_utc: None,
            phase: GamePhase::Live,
        }
    }

    #[test]
    fn test_decrements_one_second() {
        let sim = TestClockSimulator::default();
        let mut game = live_game(1, "15:00");

        assert_eq!(sim.advance(&mut game).unwrap(), ClockTick::Running);
        assert_eq!(game.clock, "14:59");

        game.clock = "3:10".to_string();
        sim.advance(&mut game).unwrap();
        assert_eq!(game.clock, "03:09");
    }

    #[test]
    fn test_quarter_rollover() {
        let sim = TestClockSimulator::default();
        let mut game = live_game(2, "00:00");

        assert_eq!(
            sim.advance(&mut game).unwrap(),
            ClockTick::QuarterEnded { period: 3 }
        );
        assert_eq!(game.period, 3);
        assert_eq!(game.period_text, "Q3");
        assert_eq!(game.clock, "15:00");
        assert!(game.is_live());
    }

    #[test]
    fn test_pre_kickoff_rolls_into_first_quarter() {
        let sim = TestClockSimulator::default();
        let mut game = live_game(0, "0:00");

        sim.advance(&mut game).unwrap();
        assert_eq!(game.period, 1);
        assert_eq!(game.period_text, "Q1");
    }

    #[test]
    fn test_game_ends_after_fourth_quarter() {
        let sim = TestClockSimulator::default();
        let mut game = live_game(4, "00:00");

        assert_eq!(sim.advance(&mut game).unwrap(), ClockTick::GameEnded);
        assert!(!game.is_live());
        assert!(game.is_final());
        assert_eq!(game.period_text, "Final");
        assert_eq!(game.clock, "00:00");

        // Terminal: further ticks do nothing
        assert_eq!(sim.advance(&mut game).unwrap(), ClockTick::Idle);
        assert_eq!(game.clock, "00:00");
    }

    #[test]
    fn test_overtime_ends_without_another_period() {
        let sim = TestClockSimulator::default();
        let mut game = live_game(5, "00:00");

        assert_eq!(sim.advance(&mut game).unwrap(), ClockTick::GameEnded);
        assert_eq!(game.period, 5);
        assert!(game.is_final());
        assert_eq!(game.period_text, "Final");
        assert_eq!(game.clock, "00:00");
    }

    #[test]
    fn test_down_text_every_fifteen_seconds() {
        let sim = TestClockSimulator::default();
        let mut game = live_game(1, "10:16");

        sim.advance(&mut game).unwrap();
        assert_eq!(game.clock, "10:15");
        assert_eq!(game.down_distance_text, "4th & 6");

        sim.advance(&mut game).unwrap();
        assert_eq!(game.down_distance_text, "4th & 6");

        game.clock = "10:01".to_string();
        sim.advance(&mut game).unwrap();
        assert_eq!(game.down_distance_text, "1st & 1");
    }

    #[test]
    fn test_unparsable_clock_leaves_game_unchanged() {
        let sim = TestClockSimulator::default();
        let mut game = live_game(2, "halftime");
        let before = game.clone();

        let err = sim.advance(&mut game).unwrap_err();
        assert_eq!(err.clock, "halftime");
        assert_eq!(game, before);
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("15:00").unwrap(), (15, 0));
        assert_eq!(parse_clock("0:07").unwrap(), (0, 7));
        assert!(parse_clock("1500").is_err());
        assert!(parse_clock("12:75").is_err());
        assert!(parse_clock("-1:30").is_err());
        assert!(parse_clock("ab:cd").is_err());
    }

    #[test]
    fn test_for_league() {
        let sim = TestClockSimulator::for_league(get_league("nfl").unwrap());
        assert_eq!(sim.quarter_clock(), "15:00");
    }
}
