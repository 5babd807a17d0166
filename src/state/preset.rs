//! Fighter presets: durations and flavor text per phase

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Phase;

/// Identifier of a known preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetId {
    Soft,
    Jammy,
    Hard,
    Custom,
}

impl PresetId {
    /// All presets in display order
    pub const ALL: [PresetId; 4] = [
        PresetId::Soft,
        PresetId::Jammy,
        PresetId::Hard,
        PresetId::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetId::Soft => "soft",
            PresetId::Jammy => "jammy",
            PresetId::Hard => "hard",
            PresetId::Custom => "custom",
        }
    }

    /// Look up the static preset entry for this id
    pub fn preset(self) -> &'static Preset {
        match self {
            PresetId::Soft => &PRESETS[0],
            PresetId::Jammy => &PRESETS[1],
            PresetId::Hard => &PRESETS[2],
            PresetId::Custom => &PRESETS[3],
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PresetId::Custom)
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soft" => Ok(PresetId::Soft),
            "jammy" => Ok(PresetId::Jammy),
            "hard" => Ok(PresetId::Hard),
            "custom" => Ok(PresetId::Custom),
            other => Err(format!("Unknown preset: {}", other)),
        }
    }
}

/// Flavor quotes for each phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseQuotes {
    pub idle: &'static [&'static str],
    pub running: &'static [&'static str],
    pub finished: &'static [&'static str],
}

impl PhaseQuotes {
    pub fn for_phase(&self, phase: Phase) -> &'static [&'static str] {
        match phase {
            Phase::Idle => self.idle,
            Phase::Running => self.running,
            Phase::Finished => self.finished,
        }
    }
}

/// Static preset configuration
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub id: PresetId,
    pub name: &'static str,
    pub default_duration_seconds: u64,
    pub description: &'static str,
    pub quotes: PhaseQuotes,
}

impl Preset {
    /// Pick a quote for the phase, rotating with the cursor
    pub fn quote(&self, phase: Phase, cursor: u64) -> &'static str {
        let list = self.quotes.for_phase(phase);
        if list.is_empty() {
            return "";
        }
        list[(cursor % list.len() as u64) as usize]
    }
}

pub static PRESETS: [Preset; 4] = [
    Preset {
        id: PresetId::Soft,
        name: "The Softie",
        default_duration_seconds: 180,
        description: "Anxious & Runny!",
        quotes: PhaseQuotes {
            idle: &["P-please be careful...", "Is it getting hot?", "I'm not ready!"],
            running: &["I'M MELTING!", "DON'T PANIC!", "TOO HOT!!"],
            finished: &["I'm... I'm a mess.", "Done? Phew.", "Soft as a cloud!"],
        },
    },
    Preset {
        id: PresetId::Jammy,
        name: "The Jammy",
        default_duration_seconds: 360,
        description: "Cool & Gooey.",
        quotes: PhaseQuotes {
            idle: &["Keep it chill, man.", "Ready when you are.", "Stay golden."],
            running: &["Just vibing in here.", "Perfect temp.", "Feeling gooey."],
            finished: &["Solid gold.", "Perfectly jammy.", "Bon appetit, friend."],
        },
    },
    Preset {
        id: PresetId::Hard,
        name: "The Hard Case",
        default_duration_seconds: 540,
        description: "Built Like Steel.",
        quotes: PhaseQuotes {
            idle: &["Reporting for duty!", "Let's cook, soldier!", "I can take the heat."],
            running: &["STAY VIGILANT!", "HEAT IS TEMPORARY!", "NOT A CRACK!"],
            finished: &["MISSION COMPLETE.", "SOLID AS A ROCK.", "IRON EGG READY."],
        },
    },
    Preset {
        id: PresetId::Custom,
        name: "The Wildcard",
        default_duration_seconds: 300,
        description: "Rules? What rules?",
        quotes: PhaseQuotes {
            idle: &["How long we talkin'?", "Set the dial!", "I'm ready for anything."],
            running: &["Doing it MY way.", "Custom cookin'!", "Tick tock, buddy."],
            finished: &["Exactly as planned.", "Perfect timing!", "Customized to perfection."],
        },
    },
];
