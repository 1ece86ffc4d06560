//! ESPN Feed Provider
//!
//! Implements the FeedSource trait for one football league's scoreboard.

use super::FeedSource;
use crate::clients::espn::EspnClient;
use crate::error::FetchError;
use crate::league_config::FootballLeague;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

/// ESPN provider for a specific league
pub struct EspnFeedProvider {
    league: &'static FootballLeague,
    url: String,
    client: EspnClient,
}

impl EspnFeedProvider {
    pub fn new(league: &'static FootballLeague) -> Self {
        Self::with_client(league, EspnClient::new())
    }

    pub fn with_timeout(league: &'static FootballLeague, timeout: Duration) -> Self {
        Self::with_client(league, EspnClient::with_timeout(timeout))
    }

    fn with_client(league: &'static FootballLeague, client: EspnClient) -> Self {
        Self {
            league,
            url: league.scoreboard_url(),
            client,
        }
    }

    pub fn league(&self) -> &'static FootballLeague {
        self.league
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for EspnFeedProvider {
    async fn fetch_events(&self) -> Result<Vec<Value>, FetchError> {
        let events = self.client.get_events(&self.url).await?;
        debug!(
            "Fetched {} {} events from ESPN",
            events.len(),
            self.league.code
        );
        Ok(events)
    }

    fn provider_name(&self) -> &str {
        "ESPN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league_config::get_league;

    #[test]
    fn test_espn_provider_creation() {
        let provider = EspnFeedProvider::new(get_league("ncaaf").unwrap());
        assert_eq!(provider.provider_name(), "ESPN");
        assert_eq!(provider.league().code, "ncaaf");
        assert!(provider.url().ends_with("/football/college-football/scoreboard"));
    }
}
