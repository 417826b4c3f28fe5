//! Clipboard adapters.

use std::process::Stdio;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::export::Clipboard;

/// Holds the most recently copied text for the presenting layer to read back.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: RwLock<Option<String>>,
}

impl MemoryClipboard {
    pub async fn contents(&self) -> Option<String> {
        self.contents.read().await.clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn copy_to_clipboard(&self, text: &str) {
        *self.contents.write().await = Some(text.to_string());
        info!("Copied {} chars to clipboard buffer", text.len());
    }
}

/// Pipes copied text into an external clipboard tool such as `xclip` or `pbcopy`.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Parses a shell-style command line, e.g. `xclip -selection clipboard`.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let mut words = shell_words::split(command_line)
            .with_context(|| format!("Invalid clipboard command: {command_line}"))?;
        if words.is_empty() {
            bail!("Clipboard command is empty");
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
        })
    }

    async fn pipe(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn clipboard command '{}'", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // stdin drops here so the tool sees EOF.
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            bail!(
                "clipboard command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn copy_to_clipboard(&self, text: &str) {
        match self.pipe(text).await {
            Ok(()) => info!("Copied {} chars via '{}'", text.len(), self.program),
            Err(e) => warn!("Clipboard copy failed: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_clipboard_keeps_latest_copy() {
        let clipboard = MemoryClipboard::default();
        assert!(clipboard.contents().await.is_none());

        clipboard.copy_to_clipboard("first").await;
        clipboard.copy_to_clipboard("second").await;

        assert_eq!(clipboard.contents().await.as_deref(), Some("second"));
    }

    #[test]
    fn test_command_line_is_split_shell_style() {
        let clipboard =
            CommandClipboard::from_command_line("xclip -selection 'clip board'").unwrap();
        assert_eq!(clipboard.program, "xclip");
        assert_eq!(clipboard.args, vec!["-selection", "clip board"]);
    }

    #[test]
    fn test_empty_or_unbalanced_command_line_is_rejected() {
        assert!(CommandClipboard::from_command_line("   ").is_err());
        assert!(CommandClipboard::from_command_line("xclip 'unterminated").is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_clipboard_pipes_text_to_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clipboard.txt");
        let command_line = format!("sh -c 'cat > \"{}\"'", target.display());
        let clipboard = CommandClipboard::from_command_line(&command_line).unwrap();

        clipboard.copy_to_clipboard("Dear Acme,\nThanks.").await;
        clipboard.copy_to_clipboard("Dear Acme,\nThanks.").await;

        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, "Dear Acme,\nThanks.");
    }

    #[tokio::test]
    async fn test_missing_program_is_logged_not_raised() {
        let clipboard =
            CommandClipboard::from_command_line("definitely-not-a-clipboard-tool-7f3a").unwrap();
        // Must simply return.
        clipboard.copy_to_clipboard("text").await;
    }
}
