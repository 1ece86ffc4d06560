//! League configuration for supported football leagues.
//!
//! This module provides:
//! - Static configuration for each league the scoreboard can follow
//! - ESPN endpoint path mappings
//! - Regulation structure used by the clock simulator

/// Configuration for a single league.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootballLeague {
    /// League code (e.g., "nfl", "ncaaf")
    pub code: &'static str,
    /// ESPN sport path segment
    pub espn_sport: &'static str,
    /// ESPN league path segment
    pub espn_league: &'static str,
    /// Number of regulation quarters
    pub regulation_periods: u8,
    /// Clock value at the start of each quarter
    pub quarter_clock: &'static str,
}

impl FootballLeague {
    /// Scoreboard endpoint for this league
    pub fn scoreboard_url(&self) -> String {
        format!(
            "http://site.api.espn.com/apis/site/v2/sports/{}/{}/scoreboard",
            self.espn_sport, self.espn_league
        )
    }
}

/// Static configuration for all supported leagues.
pub static FOOTBALL_LEAGUES: &[FootballLeague] = &[
    FootballLeague {
        code: "nfl",
        espn_sport: "football",
        espn_league: "nfl",
        regulation_periods: 4,
        quarter_clock: "15:00",
    },
    FootballLeague {
        code: "ncaaf",
        espn_sport: "football",
        espn_league: "college-football",
        regulation_periods: 4,
        quarter_clock: "15:00",
    },
];

/// Look up a league by code (case-insensitive).
pub fn get_league(code: &str) -> Option<&'static FootballLeague> {
    let code = code.trim().to_lowercase();
    FOOTBALL_LEAGUES.iter().find(|l| l.code == code)
}

/// All supported league codes.
pub fn league_codes() -> Vec<&'static str> {
    FOOTBALL_LEAGUES.iter().map(|l| l.code).collect()
}
