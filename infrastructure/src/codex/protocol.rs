//! Output parsing for the codex CLI.
//!
//! A codex invocation reports its final message in one of two shapes:
//!
//! - **Stream**: stdout is NDJSON, one event per line. The opinion is the
//!   `text` of the last `item.completed` event whose item is an
//!   `agent_message`. Lines that are not JSON (banners, warnings) are
//!   skipped.
//! - **File**: codex writes its last message to a designated file. The
//!   message body is expected to contain a JSON object whose `summary`
//!   field holds the opinion; anything around the object (log prefixes,
//!   trailing notes) is ignored.
//!
//! Both parsers are pure functions over captured output so they can be
//! tested without spawning a process.

use serde::Deserialize;

/// One NDJSON event on codex stdout. Unknown event kinds deserialize
/// fine and are ignored by the scanner.
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    item: Option<StreamItem>,
}

/// Payload of an `item.completed` event.
#[derive(Debug, Deserialize)]
struct StreamItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Scan NDJSON stdout for the final agent message.
///
/// Codex may emit several `agent_message` items (reasoning previews,
/// partial drafts); the last one is the reply. Returns `None` when no
/// agent message appears in the stream.
pub fn scan_agent_message(stdout: &str) -> Option<String> {
    let mut message = None;
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(event) = serde_json::from_str::<StreamEvent>(line) else {
            continue;
        };
        if event.kind != "item.completed" {
            continue;
        }
        if let Some(item) = event.item {
            if item.kind == "agent_message" {
                if let Some(text) = item.text {
                    message = Some(text);
                }
            }
        }
    }
    message
}

/// Extract the `summary` field from the JSON object embedded in a
/// last-message file.
///
/// The scan is greedy: it spans from the first `{` to the last `}` in the
/// content, so a reply that contains more than one top-level object fails
/// to parse and yields `None` rather than a half-read summary.
pub fn extract_summary(content: &str) -> Option<String> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(&content[start..=end]).ok()?;
    value
        .get("summary")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Collapse a raw codex reply into a single line.
///
/// Replies sometimes arrive with hard-wrapped lines or trailing blank
/// lines; scoring and summaries want one flat sentence run.
pub fn normalize_reply(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
