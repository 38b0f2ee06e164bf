//! Voice catalog and per-call synthesis options.

use narravox_foundation::StudioConfig;

/// Ordered narration-intensity labels indexed by expressiveness level 0-10.
pub const EXPRESSIVENESS_LABELS: [&str; 11] = [
    "monotone",
    "flat",
    "subtle",
    "natural",
    "engaging",
    "expressive",
    "emotional",
    "dramatic",
    "theatrical",
    "intense",
    "extreme",
];

/// Map an expressiveness level to its intensity label, clamping past 10.
pub fn expressiveness_label(level: u8) -> &'static str {
    EXPRESSIVENESS_LABELS[(level as usize).min(EXPRESSIVENESS_LABELS.len() - 1)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceGender {
    Male,
    Female,
}

/// An immutable voice catalog entry; selected by id, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct VoicePersona {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: VoiceGender,
    pub style: &'static str,
}

/// Fallback voice when an unrecognized id is requested.
pub const DEFAULT_VOICE: &str = "Kore";

pub const AVAILABLE_VOICES: [VoicePersona; 7] = [
    VoicePersona {
        id: "Aoede",
        name: "Aoede",
        gender: VoiceGender::Female,
        style: "Highly Expressive & Dynamic",
    },
    VoicePersona {
        id: "Leda",
        name: "Leda",
        gender: VoiceGender::Female,
        style: "Steady, Mature & Professional",
    },
    VoicePersona {
        id: "Puck",
        name: "Puck",
        gender: VoiceGender::Female,
        style: "Bright, Energetic & Youthful",
    },
    VoicePersona {
        id: "Zephyr",
        name: "Zephyr",
        gender: VoiceGender::Female,
        style: "Soothing, Calm & Gentle",
    },
    VoicePersona {
        id: "Charon",
        name: "Charon",
        gender: VoiceGender::Male,
        style: "Authoritative, Bold & Strong",
    },
    VoicePersona {
        id: "Fenrir",
        name: "Fenrir",
        gender: VoiceGender::Male,
        style: "Dramatic, Theatrical Narrator",
    },
    VoicePersona {
        id: "Kore",
        name: "Kore",
        gender: VoiceGender::Male,
        style: "Neutral, Professional & Clear",
    },
];

/// Resolve a requested voice id to a catalog entry, substituting the
/// default for unknown ids.
pub fn resolve_voice(voice_id: &str) -> &'static VoicePersona {
    AVAILABLE_VOICES
        .iter()
        .find(|v| v.id == voice_id)
        .or_else(|| AVAILABLE_VOICES.iter().find(|v| v.id == DEFAULT_VOICE))
        .unwrap_or(&AVAILABLE_VOICES[0])
}

/// Snapshot of the synthesis parameters for one call.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    pub voice_id: String,
    pub speed: f32,
    pub expressiveness: u8,
}

impl SynthesisOptions {
    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            voice_id: config.voice_id.clone(),
            speed: config.speed,
            expressiveness: config.expressiveness,
        }
    }
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self::from_config(&StudioConfig::default())
    }
}
