//! Tiered speaker resolution.
//!
//! A single identifier is matched by increasingly loose strategies, first hit
//! wins:
//!
//! 1. exact speaker id
//! 2. exact display name
//! 3. case-insensitive display name
//! 4. case-insensitive substring of the display name
//! 5. case-insensitive substring of the speaker id
//!
//! Batches never short-circuit: every input is attempted and all failures are
//! reported together.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Speaker;

/// Separator that marks a structured speaker id
pub const DEFAULT_SEPARATOR: char = '-';

/// Inputs longer than this (and containing the separator) are taken as ids
pub const DEFAULT_MIN_CANONICAL_LEN: usize = 20;

/// Number of catalog entries echoed back in a resolution error
const PREVIEW_LEN: usize = 10;

/// Resolve one identifier against a catalog.
pub fn resolve<'a>(raw: &str, catalog: &'a [Speaker]) -> Option<&'a Speaker> {
    if let Some(found) = catalog.iter().find(|s| s.speaker_id == raw) {
        return Some(found);
    }
    if let Some(found) = catalog.iter().find(|s| s.name == raw) {
        return Some(found);
    }

    let query = raw.to_lowercase();
    catalog
        .iter()
        .find(|s| s.name.to_lowercase() == query)
        .or_else(|| {
            catalog
                .iter()
                .find(|s| s.name.to_lowercase().contains(&query))
        })
        .or_else(|| {
            catalog
                .iter()
                .find(|s| s.speaker_id.to_lowercase().contains(&query))
        })
}

/// Policy knobs for batch resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    /// Character that canonical ids contain
    pub separator: char,
    /// Inputs strictly longer than this may bypass the catalog
    pub min_canonical_len: usize,
    /// Remediation hint appended to resolution errors
    pub hint: Option<String>,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            min_canonical_len: DEFAULT_MIN_CANONICAL_LEN,
            hint: None,
        }
    }
}

impl ResolutionPolicy {
    /// Whether `raw` looks like a full canonical id and can skip the lookup
    pub fn is_canonical(&self, raw: &str) -> bool {
        raw.contains(self.separator) && raw.chars().count() > self.min_canonical_len
    }

    /// Whether resolving `raws` needs the catalog at all
    pub fn needs_catalog<S: AsRef<str>>(&self, raws: &[S]) -> bool {
        raws.iter().any(|raw| !self.is_canonical(raw.as_ref()))
    }
}

/// Outcome of resolving one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSpeaker {
    pub speaker_id: String,
    /// Raw input, when it differed from the canonical id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_from: Option<String>,
}

/// Catalog entry summary kept in a resolution error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerPreview {
    pub name: String,
    pub speaker_id: String,
}

/// Aggregate failure for a batch with at least one unresolved input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub unresolved: Vec<String>,
    pub available_total: usize,
    pub preview: Vec<SpeakerPreview>,
    pub hint: Option<String>,
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to resolve speaker(s): {}.\n\nAvailable speakers ({} total):",
            self.unresolved.join(", "),
            self.available_total
        )?;
        for speaker in &self.preview {
            write!(f, "\n- {} ({})", speaker.name, speaker.speaker_id)?;
        }
        if self.available_total > self.preview.len() {
            write!(f, "\n... and more")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n\n{}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for ResolutionError {}

/// Batch resolver applying a `ResolutionPolicy`
#[derive(Debug, Clone, Default)]
pub struct SpeakerResolver {
    policy: ResolutionPolicy,
}

impl SpeakerResolver {
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    /// Resolve every input or fail with one error naming all misses.
    pub fn resolve_all<S: AsRef<str>>(
        &self,
        raws: &[S],
        catalog: &[Speaker],
    ) -> Result<Vec<ResolvedSpeaker>, ResolutionError> {
        let mut resolved = Vec::with_capacity(raws.len());
        let mut unresolved = Vec::new();

        for raw in raws {
            let raw = raw.as_ref();
            if self.policy.is_canonical(raw) {
                resolved.push(ResolvedSpeaker {
                    speaker_id: raw.to_string(),
                    resolved_from: None,
                });
                continue;
            }

            match resolve(raw, catalog) {
                Some(speaker) => resolved.push(ResolvedSpeaker {
                    speaker_id: speaker.speaker_id.clone(),
                    resolved_from: (speaker.speaker_id != raw).then(|| raw.to_string()),
                }),
                None => unresolved.push(raw.to_string()),
            }
        }

        if unresolved.is_empty() {
            return Ok(resolved);
        }

        Err(ResolutionError {
            unresolved,
            available_total: catalog.len(),
            preview: catalog
                .iter()
                .take(PREVIEW_LEN)
                .map(|s| SpeakerPreview {
                    name: s.name.clone(),
                    speaker_id: s.speaker_id.clone(),
                })
                .collect(),
            hint: self.policy.hint.clone(),
        })
    }
}
