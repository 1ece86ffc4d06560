//! WLED lighting effects for scoring plays

use super::AlertSink;
use crate::error::AlertError;
use crate::models::{ScoringAlert, ScoringEvent};
use crate::team_palette::{Rgb, TeamPalette};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::{json, Value};
use std::time::Duration;

const EFFECT_TIMEOUT: Duration = Duration::from_secs(2);
const EFFECT_SPEED: u8 = 200;
const EFFECT_INTENSITY: u8 = 128;
const EFFECT_PALETTE: u8 = 3;
const EFFECT_BRIGHTNESS: u8 = 255;

/// WLED effect number played for each kind of score
pub fn effect_id(event: ScoringEvent) -> u8 {
    match event {
        ScoringEvent::Touchdown => 50,
        ScoringEvent::FieldGoal | ScoringEvent::Pat => 73,
    }
}

/// Posts a team-coloured effect to a WLED controller's JSON API.
pub struct WledEffectSink {
    client: reqwest::Client,
    state_url: String,
    palette: TeamPalette,
}

impl WledEffectSink {
    /// `base_url` may be a bare host ("10.0.0.116"), a URL, or the full
    /// `/json/state` endpoint.
    pub fn new(base_url: &str, palette: TeamPalette) -> Self {
        let client = reqwest::Client::builder()
            .timeout(EFFECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            state_url: state_url(base_url),
            palette,
        }
    }

    pub fn state_url(&self) -> &str {
        &self.state_url
    }

    pub fn payload(&self, alert: &ScoringAlert) -> Value {
        let (primary, secondary) = self.palette.colors_for(&alert.team_abbr);
        json!({
            "on": true,
            "bri": EFFECT_BRIGHTNESS,
            "seg": [{
                "fx": effect_id(alert.event),
                "sx": EFFECT_SPEED,
                "ix": EFFECT_INTENSITY,
                "pal": EFFECT_PALETTE,
                "col": [rgb(primary), rgb(secondary)],
            }]
        })
    }
}

fn rgb((r, g, b): Rgb) -> [u8; 3] {
    [r, g, b]
}

fn state_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    if with_scheme.ends_with("/json/state") {
        with_scheme
    } else {
        format!("{}/json/state", with_scheme)
    }
}

#[async_trait]
impl AlertSink for WledEffectSink {
    async fn deliver(&self, alert: &ScoringAlert) -> Result<(), AlertError> {
        let payload = self.payload(alert);
        debug!("WLED payload for {}: {}", alert.team_abbr, payload);

        let response = self.client.post(&self.state_url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(AlertError::Status(response.status().as_u16()));
        }

        info!(
            "Triggered WLED effect {} for {} {}",
            effect_id(alert.event),
            alert.team_abbr,
            alert.event
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "wled"
    }
}
