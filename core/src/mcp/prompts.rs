//! The `create_podcast_guide` prompt.

use crate::session::Session;
use crate::Result;

use super::types::{Prompt, PromptArgument};

pub const PODCAST_GUIDE: &str = "create_podcast_guide";

/// Speakers listed by the speaker-selection guide
const LISTED_SPEAKERS: usize = 10;

/// Section of the guide the host asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideTask {
    QuickStart,
    SpeakerSelection,
    Troubleshooting,
}

impl GuideTask {
    /// Unknown or missing tasks fall back to the quick start
    pub fn parse(task: Option<&str>) -> Self {
        match task {
            Some("speaker_selection") => GuideTask::SpeakerSelection,
            Some("troubleshooting") => GuideTask::Troubleshooting,
            _ => GuideTask::QuickStart,
        }
    }
}

pub fn podcast_guide_prompt() -> Prompt {
    Prompt {
        name: PODCAST_GUIDE.to_string(),
        description: Some(
            "Step-by-step guide for creating podcasts with speaker name resolution".to_string(),
        ),
        arguments: vec![PromptArgument {
            name: "task".to_string(),
            description: Some(
                "Specific task: quick_start, speaker_selection, or troubleshooting".to_string(),
            ),
            required: false,
        }],
    }
}

/// Guide text for `task`; the speaker section reads the cached catalog
pub async fn podcast_guide(session: &Session, task: GuideTask) -> Result<String> {
    match task {
        GuideTask::QuickStart => Ok(QUICK_START.trim().to_string()),
        GuideTask::Troubleshooting => Ok(TROUBLESHOOTING.trim().to_string()),
        GuideTask::SpeakerSelection => {
            let catalog = session.catalog().await?;
            let listed = catalog
                .iter()
                .take(LISTED_SPEAKERS)
                .map(|s| format!("- {} ({}, {})", s.name, s.language, s.gender))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(SPEAKER_SELECTION.trim().replace("{speakers}", &listed))
        }
    }
}

const SPEAKER_SELECTION: &str = r#"
## Speaker Selection Guide

You can use speaker names or IDs when creating podcasts. The system will automatically resolve names to IDs.

### Available Speakers (showing first 10):
{speakers}

### IMPORTANT: Use the "name" field from get_speakers output

When creating podcasts, use the speaker's display name (the "name" field from get_speakers), not the speakerId.

### Usage Examples:

1. Using speaker names:
   speakers: ["David", "Lily (ASMR)"]

2. Using full speaker IDs (also supported):
   speakers: ["chinese-mandarin-male-anchor", "ASMR-Female-CN"]

### Tips:
- Always use the "name" field from get_speakers output
- Names are case-insensitive
- Partial name matching is supported
- Use get_speakers tool to see all available speakers
"#;

const TROUBLESHOOTING: &str = r#"
## Podcast Creation Troubleshooting

### Common Issues:

1. Speaker not found:
   - Use get_speakers tool to verify speaker availability
   - Check spelling of speaker names
   - Try using the full speaker ID instead

2. Language mismatch:
   - Ensure speakers match the podcast language
   - Use language parameter to filter speakers

3. Generation timeout:
   - Deep mode takes longer than quick mode
   - Check episode status with get_podcast_status
   - Generation can take 5-10 minutes for complex content

4. Invalid sources:
   - URLs must be accessible
   - Text sources should be well-formatted
   - Combine query + sources for best results
"#;

const QUICK_START: &str = r#"
## Quick Start: Creating a Podcast

### Step 1: Choose Speakers
Use speaker names from get_speakers output - the "name" field, not the ID!

Example: If get_speakers returns:
- David (speakerId: chinese-mandarin-male-anchor)
- Lily (ASMR) (speakerId: ASMR-Female-CN)

### Step 2: Create Podcast
Use the create_podcast tool with speaker display names:

{
  "speakers": ["David", "Lily (ASMR)"],
  "query": "Explain artificial intelligence in simple terms",
  "language": "en",
  "mode": "debate"
}

The system will:
1. Automatically resolve speaker names to IDs
2. Generate podcast script
3. Generate audio
4. Return the complete episode

### Step 3: Check Status (Optional)
If generation takes time, use get_podcast_status with the episode ID.

### Available Modes:
- quick: Fast generation (3-5 minutes)
- deep: Detailed content (8-15 minutes)
- debate: Conversational discussion (5-10 minutes, requires 2 speakers)

### Pro Tips:
- ALWAYS use the "name" field from get_speakers, not the speakerId
- Use 1-2 speakers for best results
- Provide clear, specific topics in query
- Add sources (URLs or text) for richer content
"#;
