//! Replay plugin: stands in for the liveness inference plugin by cycling
//! through recorded results, one JSON document per line.
//!
//! A `null` line is a frame with no face. A line that fails to parse is kept
//! and reported as a plugin error whenever it comes up, so error handling can
//! be exercised from a script.

use std::path::Path;

use anyhow::{bail, Context, Result};
use liveness_core::DetectionResult;
use liveness_pipeline::{Frame, LivenessPlugin, PluginError};

enum Entry {
    Result(DetectionResult),
    Malformed { line: usize, error: String },
}

pub struct ReplayPlugin {
    entries: Vec<Entry>,
    cursor: usize,
}

impl ReplayPlugin {
    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replay script {}", path.display()))?;
        Self::from_script(&text).with_context(|| format!("invalid replay script {}", path.display()))
    }

    pub fn from_script(text: &str) -> Result<Self> {
        let entries: Vec<Entry> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .map(|(idx, line)| {
                match serde_json::from_str::<Option<DetectionResult>>(line) {
                    Ok(result) => Entry::Result(result.unwrap_or_default()),
                    Err(e) => {
                        tracing::warn!(line = idx + 1, error = %e, "replay line will fail at playback");
                        Entry::Malformed {
                            line: idx + 1,
                            error: e.to_string(),
                        }
                    }
                }
            })
            .collect();

        if entries.is_empty() {
            bail!("replay script has no entries");
        }
        tracing::debug!(entries = entries.len(), "replay script loaded");
        Ok(Self { entries, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl LivenessPlugin for ReplayPlugin {
    fn liveness(&mut self, _frame: &Frame) -> Result<DetectionResult, PluginError> {
        let entry = &self.entries[self.cursor];
        self.cursor = (self.cursor + 1) % self.entries.len();
        match entry {
            Entry::Result(result) => Ok(result.clone()),
            Entry::Malformed { line, error } => {
                Err(PluginError::Malformed(format!("line {line}: {error}")))
            }
        }
    }
}
