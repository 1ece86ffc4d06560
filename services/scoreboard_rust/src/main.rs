//! Scoreboard Service
//!
//! Live football tracking for an LED scoreboard.
//!
//! This service:
//! - Polls the ESPN scoreboard for the configured league
//! - Keeps the set of live games and rotates the one on display
//! - Detects scoring plays and queues alerts for lighting effects
//! - Runs a simulated game instead of polling when TEST_MODE is on

mod config;

use anyhow::Result;
use chrono::Utc;
use config::ScoreboardConfig;
use dotenv::dotenv;
use gridiron_core::alerts::{alert_channel, LogAlertSink, WledEffectSink};
use gridiron_core::providers::EspnFeedProvider;
use gridiron_core::{Game, LiveGameManager, ScoreboardSnapshot, TeamPalette};
use log::{debug, error, info, warn};
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Scoreboard Service...");

    let config = ScoreboardConfig::from_env()?;
    info!(
        "League: {}, test mode: {}, favorites: {:?} (only favorites: {}), alerts: {}",
        config.league.code,
        config.test_mode,
        config.favorite_teams,
        config.show_favorite_teams_only,
        config.scoring_alerts_enabled
    );

    let feed = Arc::new(EspnFeedProvider::with_timeout(
        config.league,
        config.feed_timeout,
    ));

    let (alert_tx, worker) = alert_channel(config.alert_queue_capacity);
    let mut worker = worker.with_sink(LogAlertSink);
    if let Some(url) = &config.wled_url {
        let palette = TeamPalette::load(config.team_colors_path.as_deref());
        let sink = WledEffectSink::new(url, palette);
        info!("WLED effects enabled at {}", sink.state_url());
        worker = worker.with_sink(sink);
    }
    let alert_handle = tokio::spawn(worker.run());

    let mut manager = LiveGameManager::new(config.live_config(), feed).with_alerts(alert_tx);
    let display_handle = tokio::spawn(follow_snapshots(manager.subscribe()));

    run_until_shutdown(&mut manager, config.tick_interval, tokio::signal::ctrl_c()).await;

    // Dropping the manager closes both the alert queue and the snapshot channel
    drop(manager);
    if let Err(e) = alert_handle.await {
        warn!("Alert worker ended abnormally: {}", e);
    }
    if let Err(e) = display_handle.await {
        warn!("Display task ended abnormally: {}", e);
    }

    info!("Scoreboard Service stopped");
    Ok(())
}

/// Tick the manager until `shutdown` resolves.
///
/// `shutdown` is polled across ticks rather than recreated, so a signal that
/// lands while a tick is awaiting the feed is still picked up.
async fn run_until_shutdown<F>(manager: &mut LiveGameManager, tick_interval: Duration, shutdown: F)
where
    F: Future<Output = io::Result<()>>,
{
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::pin!(shutdown);
    let mut listening = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = manager.tick(Utc::now()).await;
                if report.polled {
                    debug!(
                        "Tick: outcome={:?}, alerts={}, skipped events={}",
                        report.outcome,
                        report.alerts.len(),
                        report.extraction_failures
                    );
                }
            }
            res = &mut shutdown, if listening => match res {
                Ok(()) => {
                    info!("Shutdown requested");
                    break;
                }
                Err(e) => {
                    // Keep serving; the process can still be killed
                    error!("Unable to listen for shutdown signal: {}", e);
                    listening = false;
                }
            },
        }
    }
}

/// Stand-in for the display: logs whenever the game on screen changes.
async fn follow_snapshots(mut rx: watch::Receiver<ScoreboardSnapshot>) {
    let mut last_line = String::new();

    while rx.changed().await.is_ok() {
        let line = {
            let snapshot = rx.borrow_and_update();
            match &snapshot.current {
                Some(game) => scorebug_line(game),
                None if snapshot.test_mode => "Test mode: no game".to_string(),
                None => "No live games".to_string(),
            }
        };
        if line != last_line {
            debug!("Display: {}", line);
            last_line = line;
        }
    }
}

/// One-line scorebug, e.g. "TB 17 @ DAL 21 | Q3 07:42 | 2nd & 7 | TB ball | RZ"
fn scorebug_line(game: &Game) -> String {
    let mut parts = vec![
        format!(
            "{} {} @ {} {}",
            game.away_abbr, game.away_score, game.home_abbr, game.home_score
        ),
        game.status_text(),
    ];
    if !game.down_distance_text.is_empty() {
        parts.push(game.down_distance_text.clone());
    }
    if let Some(team) = game.possessing_abbr() {
        parts.push(format!("{} ball", team));
    }
    if game.is_redzone {
        parts.push("RZ".to_string());
    }
    if let Some(event) = game.scoring_event {
        parts.push(event.to_string());
    }
    parts.join(" | ")
}
