use std::collections::HashSet;

use super::Speaker;

/// Cache key of the merged multi-language catalog
pub const ALL_SPEAKERS_KEY: &str = "_all_speakers_";

/// Merge catalog partitions in order, keeping the first entry per speaker id.
pub fn merge_partitions<I>(partitions: I) -> Vec<Speaker>
where
    I: IntoIterator<Item = Vec<Speaker>>,
{
    let mut seen = HashSet::new();
    partitions
        .into_iter()
        .flatten()
        .filter(|speaker| seen.insert(speaker.speaker_id.clone()))
        .collect()
}
