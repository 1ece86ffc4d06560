//! Team colour palette for scoring effects.
//!
//! This module provides:
//! - Built-in NFL primary/secondary colours keyed by abbreviation
//! - JSON overrides loaded from disk
//! - A lookup that falls back to white/red for unknown teams

use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub type Rgb = (u8, u8, u8);

/// Colours used when a team has no entry
pub const FALLBACK_COLORS: (Rgb, Rgb) = ((255, 255, 255), (255, 0, 0));

const NFL_TEAM_COLORS: &[(&str, Rgb, Rgb)] = &[
    ("TB", (213, 10, 10), (101, 79, 73)),
    ("DAL", (0, 34, 68), (134, 147, 151)),
    ("KC", (227, 24, 55), (255, 184, 28)),
    ("BUF", (0, 51, 141), (198, 12, 48)),
    ("MIA", (0, 142, 151), (252, 76, 2)),
    ("NE", (0, 34, 68), (198, 12, 48)),
    ("NYJ", (18, 87, 64), (255, 255, 255)),
    ("LV", (0, 0, 0), (165, 172, 175)),
    ("DEN", (251, 79, 20), (0, 34, 68)),
    ("LAC", (0, 128, 198), (255, 194, 14)),
    ("PHI", (0, 76, 84), (165, 172, 175)),
    ("NYG", (1, 35, 82), (163, 13, 45)),
    ("WSH", (90, 20, 20), (255, 182, 18)),
    ("GB", (24, 48, 40), (255, 184, 28)),
    ("CHI", (11, 22, 42), (200, 56, 3)),
    ("MIN", (79, 38, 131), (255, 198, 47)),
    ("DET", (0, 118, 182), (176, 183, 188)),
    ("SF", (170, 0, 0), (173, 153, 93)),
    ("SEA", (0, 34, 68), (105, 190, 40)),
    ("LAR", (0, 53, 148), (255, 209, 0)),
    ("ARI", (155, 35, 63), (255, 182, 18)),
    ("NO", (16, 24, 31), (211, 188, 141)),
    ("ATL", (167, 25, 48), (0, 0, 0)),
    ("CAR", (0, 133, 202), (16, 24, 31)),
    ("PIT", (16, 24, 32), (255, 182, 18)),
    ("BAL", (26, 25, 95), (158, 124, 12)),
    ("CIN", (251, 79, 20), (0, 0, 0)),
    ("CLE", (49, 29, 0), (255, 60, 0)),
    ("TEN", (12, 35, 64), (75, 146, 219)),
    ("IND", (0, 44, 95), (255, 255, 255)),
    ("JAX", (16, 24, 31), (215, 163, 62)),
    ("HOU", (3, 32, 47), (167, 25, 48)),
];

/// Abbreviation → (primary, secondary). Read-only once built.
#[derive(Debug, Clone)]
pub struct TeamPalette {
    colors: HashMap<String, (Rgb, Rgb)>,
}

impl Default for TeamPalette {
    fn default() -> Self {
        Self::nfl()
    }
}

impl TeamPalette {
    /// Empty palette; every lookup falls back.
    pub fn empty() -> Self {
        Self {
            colors: HashMap::new(),
        }
    }

    pub fn nfl() -> Self {
        let colors = NFL_TEAM_COLORS
            .iter()
            .map(|(abbr, primary, secondary)| (abbr.to_string(), (*primary, *secondary)))
            .collect();
        Self { colors }
    }

    /// Built-in colours with overrides from a JSON file layered on top.
    ///
    /// A missing or unreadable file leaves the defaults in place.
    pub fn load(path: Option<&str>) -> Self {
        let mut palette = Self::nfl();
        let Some(path) = path else {
            return palette;
        };
        if !Path::new(path).exists() {
            warn!("Team colour file {} not found, using built-in colours", path);
            return palette;
        }

        match fs::read_to_string(path).map_err(|e| e.to_string()).and_then(|content| {
            // { "KC": [[227, 24, 55], [255, 184, 28]], ... }
            serde_json::from_str::<HashMap<String, (Rgb, Rgb)>>(&content).map_err(|e| e.to_string())
        }) {
            Ok(overrides) => {
                debug!("Loaded {} team colour overrides from {}", overrides.len(), path);
                for (abbr, colors) in overrides {
                    palette.insert(&abbr, colors.0, colors.1);
                }
            }
            Err(e) => warn!("Failed to load team colours from {}: {}", path, e),
        }
        palette
    }

    pub fn insert(&mut self, abbr: &str, primary: Rgb, secondary: Rgb) {
        self.colors
            .insert(abbr.trim().to_uppercase(), (primary, secondary));
    }

    /// Primary and secondary colour for a team, white/red when unknown.
    pub fn colors_for(&self, abbr: &str) -> (Rgb, Rgb) {
        self.colors
            .get(&abbr.trim().to_uppercase())
            .copied()
            .unwrap_or(FALLBACK_COLORS)
    }

    pub fn contains(&self, abbr: &str) -> bool {
        self.colors.contains_key(&abbr.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
