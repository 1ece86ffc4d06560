//! Configuration and environment loading for the scoreboard service
//!
//! Everything is read once at startup (after `.env` is loaded) and handed to
//! the core as plain structs.

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use gridiron_core::alerts::DEFAULT_ALERT_QUEUE_CAPACITY;
use gridiron_core::league_config::{get_league, league_codes, FootballLeague};
use gridiron_core::{LiveConfig, PollSchedulerConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LEAGUE: &str = "nfl";
pub const DEFAULT_LIVE_UPDATE_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_IDLE_UPDATE_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_LOG_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_LIVE_GAME_DURATION_SECS: u64 = 20;
pub const DEFAULT_DISPLAY_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ScoreboardConfig {
    pub league: &'static FootballLeague,

    pub live_update_interval: Duration,
    pub idle_update_interval: Duration,
    pub log_interval: Duration,
    pub live_game_duration: Duration,

    pub scoring_alerts_enabled: bool,
    pub favorite_teams: Vec<String>,
    pub show_favorite_teams_only: bool,
    pub test_mode: bool,

    pub display_timezone: Tz,
    /// How often the main loop calls into the manager
    pub tick_interval: Duration,
    pub feed_timeout: Duration,

    pub wled_url: Option<String>,
    pub team_colors_path: Option<String>,
    pub alert_queue_capacity: usize,
}

impl ScoreboardConfig {
    pub fn from_env() -> Result<Self> {
        let league_code = env::var("LEAGUE").unwrap_or_else(|_| DEFAULT_LEAGUE.to_string());
        let league = get_league(&league_code).ok_or_else(|| {
            anyhow!(
                "Invalid LEAGUE: {} (expected one of {})",
                league_code,
                league_codes().join(", ")
            )
        })?;

        let tz_name =
            env::var("DISPLAY_TIMEZONE").unwrap_or_else(|_| DEFAULT_DISPLAY_TIMEZONE.to_string());
        let display_timezone = Tz::from_str(&tz_name).map_err(|_| {
            anyhow!(
                "Invalid DISPLAY_TIMEZONE: {} (expected IANA tz like America/New_York)",
                tz_name
            )
        })?;

        Ok(Self {
            league,
            live_update_interval: parse_secs_env(
                "LIVE_UPDATE_INTERVAL_SECS",
                DEFAULT_LIVE_UPDATE_INTERVAL_SECS,
            )?,
            idle_update_interval: parse_secs_env(
                "IDLE_UPDATE_INTERVAL_SECS",
                DEFAULT_IDLE_UPDATE_INTERVAL_SECS,
            )?,
            log_interval: parse_secs_env("LOG_INTERVAL_SECS", DEFAULT_LOG_INTERVAL_SECS)?,
            live_game_duration: parse_secs_env(
                "LIVE_GAME_DURATION_SECS",
                DEFAULT_LIVE_GAME_DURATION_SECS,
            )?,
            scoring_alerts_enabled: parse_bool_env("SCORING_ALERTS_ENABLED", true),
            favorite_teams: parse_csv_env("FAVORITE_TEAMS"),
            show_favorite_teams_only: parse_bool_env("SHOW_FAVORITE_TEAMS_ONLY", false),
            test_mode: parse_bool_env("TEST_MODE", false),
            display_timezone,
            tick_interval: Duration::from_millis(
                parse_u64_env("TICK_INTERVAL_MS", DEFAULT_TICK_INTERVAL_MS)?.max(1),
            ),
            feed_timeout: parse_secs_env("FEED_TIMEOUT_SECS", DEFAULT_FEED_TIMEOUT_SECS)?,
            wled_url: parse_optional_env("WLED_URL"),
            team_colors_path: parse_optional_env("TEAM_COLORS_PATH"),
            alert_queue_capacity: parse_u64_env(
                "ALERT_QUEUE_CAPACITY",
                DEFAULT_ALERT_QUEUE_CAPACITY as u64,
            )? as usize,
        })
    }

    /// Settings the core manager needs
    pub fn live_config(&self) -> LiveConfig {
        LiveConfig {
            league: self.league,
            display_tz: self.display_timezone,
            test_mode: self.test_mode,
            scoring_alerts_enabled: self.scoring_alerts_enabled,
            favorite_teams: self.favorite_teams.clone(),
            show_favorite_teams_only: self.show_favorite_teams_only,
            display_duration: self.live_game_duration,
            poll: PollSchedulerConfig {
                live_interval: self.live_update_interval,
                idle_interval: self.idle_update_interval,
                log_interval: self.log_interval,
            },
        }
    }
}

fn parse_csv_env(key: &str) -> Vec<String> {
    env::var(key)
        .map(|raw| parse_csv(&raw))
        .unwrap_or_default()
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("Invalid {key}: {raw} (expected integer)"))
}

fn parse_secs_env(key: &str, default: u64) -> Result<Duration> {
    parse_u64_env(key, default).map(Duration::from_secs)
}

fn parse_optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
