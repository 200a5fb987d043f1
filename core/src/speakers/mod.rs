//! Speaker catalog and identifier resolution
//!
//! - `resolver`: tiered matching of loose identifiers (names, partial names, ids)
//! - `catalog`: merging per-language catalog partitions into one deduplicated list

pub mod catalog;
pub mod resolver;

pub use catalog::{merge_partitions, ALL_SPEAKERS_KEY};
pub use resolver::{
    resolve, ResolutionError, ResolutionPolicy, ResolvedSpeaker, SpeakerResolver,
    DEFAULT_MIN_CANONICAL_LEN, DEFAULT_SEPARATOR,
};

use serde::{Deserialize, Serialize};

/// A selectable voice, as listed by the speakers endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub speaker_id: String,
    pub name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub demo_audio_url: String,
}

impl Speaker {
    pub fn new(
        speaker_id: impl Into<String>,
        name: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            name: name.into(),
            language: language.into(),
            gender: String::new(),
            demo_audio_url: String::new(),
        }
    }
}
