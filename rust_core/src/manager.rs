//! Live game manager
//!
//! Glues the pipeline together for one league: poll gate, fetch, extract,
//! filter, reconcile, scoring check, rotation. The caller drives it by
//! calling [`LiveGameManager::tick`] with the current time; all state is
//! owned here and mutated from that single call site.

use crate::alerts::AlertSender;
use crate::extractor::{period_label, GameDetailExtractor};
use crate::league_config::{FootballLeague, FOOTBALL_LEAGUES};
use crate::models::{Game, GamePhase, ScoreboardSnapshot, ScoringAlert};
use crate::providers::FeedSource;
use crate::scheduling::{PollScheduler, PollSchedulerConfig, RotationScheduler};
use crate::simulator::{ClockTick, TestClockSimulator};
use crate::tracking::{LiveGameRegistry, ReconcileOutcome, ScoringEventTracker};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Id of the synthetic game shown in test mode
pub const TEST_GAME_ID: &str = "test-game";

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub league: &'static FootballLeague,
    /// Used for kickoff labels of upcoming games
    pub display_tz: Tz,
    pub test_mode: bool,
    pub scoring_alerts_enabled: bool,
    pub favorite_teams: Vec<String>,
    pub show_favorite_teams_only: bool,
    /// How long each live game stays on screen before rotating
    pub display_duration: Duration,
    pub poll: PollSchedulerConfig,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            league: &FOOTBALL_LEAGUES[0],
            display_tz: chrono_tz::America::New_York,
            test_mode: false,
            scoring_alerts_enabled: true,
            favorite_teams: Vec::new(),
            show_favorite_teams_only: false,
            display_duration: Duration::from_secs(20),
            poll: PollSchedulerConfig::default(),
        }
    }
}

/// What a single tick did
#[derive(Debug, Default, Clone)]
pub struct TickReport {
    /// The poll interval had elapsed and an update ran
    pub polled: bool,
    pub fetch_failed: bool,
    pub extraction_failures: usize,
    pub outcome: Option<ReconcileOutcome>,
    pub alerts: Vec<ScoringAlert>,
    pub simulated: Option<ClockTick>,
    pub rotated_to: Option<usize>,
    pub logged_summary: bool,
}

// ============================================================================
// Manager
// ============================================================================

pub struct LiveGameManager {
    config: LiveConfig,
    feed: Arc<dyn FeedSource>,
    extractor: GameDetailExtractor,
    registry: LiveGameRegistry,
    tracker: ScoringEventTracker,
    rotation: RotationScheduler,
    poll: PollScheduler,
    simulator: TestClockSimulator,
    alerts: Option<AlertSender>,
    snapshot_tx: watch::Sender<ScoreboardSnapshot>,
}

impl LiveGameManager {
    pub fn new(config: LiveConfig, feed: Arc<dyn FeedSource>) -> Self {
        let mut registry = LiveGameRegistry::new();
        if config.test_mode {
            registry.seed(demo_game(config.league));
            info!("Test mode: showing simulated game {}", TEST_GAME_ID);
        }

        let (snapshot_tx, _) = watch::channel(ScoreboardSnapshot {
            test_mode: config.test_mode,
            ..ScoreboardSnapshot::default()
        });

        let manager = Self {
            extractor: GameDetailExtractor::new(config.display_tz),
            tracker: ScoringEventTracker::new(config.favorite_teams.iter()),
            rotation: RotationScheduler::new(config.display_duration),
            poll: PollScheduler::new(config.poll.clone()),
            simulator: TestClockSimulator::for_league(config.league),
            registry,
            feed,
            alerts: None,
            snapshot_tx,
            config,
        };
        if manager.config.test_mode {
            manager.publish(None);
        }
        manager
    }

    /// Route scoring alerts to an alert worker.
    pub fn with_alerts(mut self, sender: AlertSender) -> Self {
        self.alerts = Some(sender);
        self
    }

    /// Receiver for the snapshot published after each tick that changed something
    pub fn subscribe(&self) -> watch::Receiver<ScoreboardSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn registry(&self) -> &LiveGameRegistry {
        &self.registry
    }

    pub fn current_game(&self) -> Option<&Game> {
        self.registry.current()
    }

    pub fn tracker(&self) -> &ScoringEventTracker {
        &self.tracker
    }

    pub fn poll_scheduler(&self) -> &PollScheduler {
        &self.poll
    }

    pub fn rotation(&self) -> &RotationScheduler {
        &self.rotation
    }

    /// Run one tick of the pipeline.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();
        let test_mode = self.config.test_mode;

        if self.poll.is_due(now, self.registry.is_empty(), test_mode) {
            // Stamp before fetching so a failed fetch waits a full interval
            self.poll.record_poll(now);
            report.polled = true;

            if test_mode {
                self.simulate(&mut report);
            } else {
                self.refresh(now, &mut report).await;
            }
        }

        // Rotation runs every tick, independent of the poll gate
        report.rotated_to = self.rotation.tick(&mut self.registry, now, test_mode);

        if report.polled || report.rotated_to.is_some() {
            self.publish(Some(now));
        }
        report
    }

    fn simulate(&mut self, report: &mut TickReport) {
        let Some(game) = self.registry.current_mut() else {
            return;
        };

        match self.simulator.advance(game) {
            Ok(tick) => {
                if tick == ClockTick::GameEnded {
                    info!("Test mode: simulated game {} is final", game.matchup());
                }
                report.simulated = Some(tick);
            }
            Err(e) => warn!("Test mode: {}", e),
        }
    }

    async fn refresh(&mut self, now: DateTime<Utc>, report: &mut TickReport) {
        let events = match self.feed.fetch_events().await {
            Ok(events) => events,
            Err(e) => {
                if self.registry.is_empty() {
                    warn!(
                        "Could not fetch data from {} and no existing live games: {}",
                        self.feed.provider_name(),
                        e
                    );
                } else {
                    warn!(
                        "Could not fetch update from {}; keeping existing live game data for now: {}",
                        self.feed.provider_name(),
                        e
                    );
                }
                report.fetch_failed = true;
                return;
            }
        };

        let batch = self.extractor.extract_all(&events);
        report.extraction_failures = batch.failures.len();

        let candidates: Vec<Game> = batch
            .games
            .into_iter()
            .filter(|g| self.is_candidate(g))
            .collect();
        debug!(
            "{} of {} events are live candidates",
            candidates.len(),
            events.len()
        );

        let should_log = {
            let previous = self.registry.ids();
            let candidate_ids: Vec<&str> = candidates.iter().map(|g| g.id.as_str()).collect();
            self.poll.should_log(now, &previous, &candidate_ids)
        };
        if should_log {
            self.log_summary(&candidates);
            self.poll.record_log(now);
            report.logged_summary = true;
        }

        let outcome = self.registry.reconcile(candidates);
        if outcome.current_reset() {
            self.rotation.reset(now);
        }
        report.outcome = Some(outcome);

        if self.config.scoring_alerts_enabled {
            let alerts = self.tracker.check(self.registry.games());
            if let Some(sender) = &self.alerts {
                for alert in &alerts {
                    sender.enqueue(alert.clone());
                }
            }
            report.alerts = alerts;
        }
    }

    /// Live or at halftime, and passing the favorites filter when enabled.
    pub fn is_candidate(&self, game: &Game) -> bool {
        if !(game.is_live() || game.is_halftime()) {
            return false;
        }
        if !self.config.show_favorite_teams_only {
            return true;
        }
        self.config.favorite_teams.iter().any(|team| {
            team.eq_ignore_ascii_case(&game.home_abbr) || team.eq_ignore_ascii_case(&game.away_abbr)
        })
    }

    fn log_summary(&self, candidates: &[Game]) {
        if candidates.is_empty() {
            let filter_text = if self.config.show_favorite_teams_only {
                "favorite teams"
            } else {
                "criteria"
            };
            info!("No live/halftime games found for {}.", filter_text);
            return;
        }

        let filter_text = if self.config.show_favorite_teams_only {
            "favorite teams"
        } else {
            "all teams"
        };
        info!(
            "Found {} live/halftime games for {}.",
            candidates.len(),
            filter_text
        );
        for game in candidates {
            info!("  - {} ({})", game.matchup(), game.status_text());
        }
    }

    fn publish(&self, now: Option<DateTime<Utc>>) {
        self.snapshot_tx.send_replace(ScoreboardSnapshot {
            current: self.registry.current().cloned(),
            current_index: self.registry.current_index(),
            live_count: self.registry.len(),
            test_mode: self.config.test_mode,
            updated_at: now,
        });
    }
}

/// Synthetic live game used by test mode
pub fn demo_game(league: &FootballLeague) -> Game {
    Game {
        id: TEST_GAME_ID.to_string(),
        home_id: "6".to_string(),
        away_id: "27".to_string(),
        home_abbr: "DAL".to_string(),
        away_abbr: "TB".to_string(),
        home_score: 21,
        away_score: 17,
        period: 1,
        period_text: period_label(1).to_string(),
        clock: league.quarter_clock.to_string(),
        down_distance_text: "1st & 10".to_string(),
        possession: Some("27".to_string()),
        possession_indicator: Some(crate::models::PossessionSide::Away),
        is_redzone: false,
        home_timeouts: 3,
        away_timeouts: 3,
        scoring_event: None,
        start_time_utc: None,
        phase: GamePhase::Live,
    }
}
