//! System clipboard access through external commands

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long a clipboard helper may take before it is killed
const COPY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("No clipboard command available (tried {0})")]
    Unavailable(String),

    #[error("{command} failed: {reason}")]
    Failed { command: String, reason: String },
}

/// Anything that can take text for pasting elsewhere
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents. Blocks until the copy is done.
    fn write_all(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard backed by the first helper found on PATH
///
/// Tried in order:
/// - wl-copy (Wayland)
/// - xclip (X11)
/// - xsel (X11 alternative)
/// - pbcopy (macOS)
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    commands: Vec<(String, Vec<String>)>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::with_commands(&[
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("xsel", &["--clipboard", "--input"]),
            ("pbcopy", &[]),
        ])
    }
}

impl SystemClipboard {
    pub fn with_commands(commands: &[(&str, &[&str])]) -> Self {
        Self {
            commands: commands
                .iter()
                .map(|(cmd, args)| {
                    (
                        cmd.to_string(),
                        args.iter().map(|a| a.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    fn tried(&self) -> String {
        self.commands
            .iter()
            .map(|(cmd, _)| cmd.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Clipboard for SystemClipboard {
    fn write_all(&self, text: &str) -> Result<(), ClipboardError> {
        for (cmd, args) in &self.commands {
            if !crate::shell::on_path(cmd) {
                continue;
            }
            tracing::debug!("Copying {} bytes with {}", text.len(), cmd);
            return copy_with(cmd, args, text);
        }
        Err(ClipboardError::Unavailable(self.tried()))
    }
}

fn copy_with(cmd: &str, args: &[String], text: &str) -> Result<(), ClipboardError> {
    let failed = |reason: String| ClipboardError::Failed {
        command: cmd.to_string(),
        reason,
    };

    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| failed(e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| failed(e.to_string()))?;
        // stdin dropped here so the helper sees EOF
    }

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => return Ok(()),
            Ok(Some(status)) => return Err(failed(status.to_string())),
            Ok(None) => {
                if start.elapsed() > COPY_TIMEOUT {
                    let _ = child.kill();
                    return Err(failed("timed out".to_string()));
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(failed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tries_all_helpers() {
        let clipboard = SystemClipboard::default();
        assert_eq!(clipboard.tried(), "wl-copy, xclip, xsel, pbcopy");
    }

    #[test]
    fn test_no_helper_is_unavailable() {
        let clipboard =
            SystemClipboard::with_commands(&[("lazyhcloud-test-no-such-clipboard", &[])]);
        let err = clipboard.write_all("203.0.113.1").unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable(_)));
        assert_eq!(
            err.to_string(),
            "No clipboard command available (tried lazyhcloud-test-no-such-clipboard)"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_helper_reports_command() {
        let clipboard = SystemClipboard::with_commands(&[("false", &[])]);
        let err = clipboard.write_all("x").unwrap_err();
        assert!(matches!(err, ClipboardError::Failed { ref command, .. } if command == "false"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_helper() {
        // `cat` reads stdin to EOF and exits 0
        let clipboard = SystemClipboard::with_commands(&[("cat", &[])]);
        clipboard.write_all("hello").unwrap();
    }
}
