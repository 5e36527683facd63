//! Mood catalogue.
//!
//! Each mood maps to a playlist name and a set of Spotify search queries.
//! The `weather` pseudo-mood is resolved to a real one from the current
//! conditions before the catalogue is consulted.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::types::MoodTableRow;

/// Request value that asks for the mood to be derived from the weather.
pub const WEATHER_MOOD: &str = "weather";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Rainy,
    Summer,
    Winter,
    Spring,
    Workout,
    Party,
    Focus,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Rainy,
        Mood::Summer,
        Mood::Winter,
        Mood::Spring,
        Mood::Workout,
        Mood::Party,
        Mood::Focus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Rainy => "rainy",
            Mood::Summer => "summer",
            Mood::Winter => "winter",
            Mood::Spring => "spring",
            Mood::Workout => "workout",
            Mood::Party => "party",
            Mood::Focus => "focus",
        }
    }

    pub fn playlist_name(&self) -> &'static str {
        match self {
            Mood::Rainy => "Rainy Day Chill",
            Mood::Summer => "Summer Party Vibe",
            Mood::Winter => "Winter Focus Lo-fi",
            Mood::Spring => "Spring Awakening",
            Mood::Workout => "High-Energy Workout",
            Mood::Party => "Ultimate Party Mix",
            Mood::Focus => "Deep Focus Instrumentals",
        }
    }

    pub fn queries(&self) -> &'static [&'static str] {
        match self {
            Mood::Rainy => &["genre:acoustic", "genre:chill", "genre:sad", "genre:ambient"],
            Mood::Summer => &["genre:pop", "genre:dance", "genre:summer", "genre:happy"],
            Mood::Winter => &["genre:\"lo-fi\"", "genre:ambient", "genre:study"],
            Mood::Spring => &[
                "genre:indie-pop",
                "genre:\"folk-pop\"",
                "genre:singer-songwriter",
            ],
            Mood::Workout => &["genre:work-out", "genre:edm", "genre:techno", "genre:pop"],
            Mood::Party => &["genre:party", "genre:dance", "genre:pop", "genre:disco"],
            Mood::Focus => &["genre:focus", "genre:ambient", "genre:classical", "genre:study"],
        }
    }

    pub fn description(&self) -> String {
        format!("A playlist for a {self} mood, generated via search.")
    }

    /// Picks a mood for the main weather condition reported by OpenWeather.
    pub fn for_weather(condition: &str) -> Mood {
        let weather = condition.to_lowercase();
        if weather.contains("rain") || weather.contains("drizzle") {
            Mood::Rainy
        } else if weather.contains("clear") {
            Mood::Summer
        } else if weather.contains("snow") {
            Mood::Winter
        } else if weather.contains("clouds") {
            Mood::Spring
        } else {
            Mood::Summer
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == norm)
            .ok_or_else(|| format!("invalid mood '{s}'"))
    }
}

pub fn mood_table_rows() -> Vec<MoodTableRow> {
    Mood::ALL
        .iter()
        .map(|mood| MoodTableRow {
            mood: mood.to_string(),
            playlist: mood.playlist_name().to_string(),
            queries: mood.queries().join(", "),
        })
        .collect()
}
