//! services/client/src/terminal.rs
//!
//! Terminal implementations of the user-facing ports: notifications go to stderr,
//! confirmations are read from stdin.

use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

use code_explainer_core::domain::{Notification, NotificationKind};
use code_explainer_core::ports::{Confirmation, Notifier};

/// Prints notifications to stderr, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let marker = match notification.kind {
            NotificationKind::Success => "✔",
            NotificationKind::Error => "✖",
            NotificationKind::Warning => "⚠",
            NotificationKind::Info => "ℹ",
        };
        eprintln!("{} {}", marker, notification.message);
    }
}

/// Interprets a typed answer; only `y` and `yes` confirm.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_prompt(prompt: &str) {
    print!("{} [y/N] ", prompt);
    if let Err(e) = std::io::stdout().flush() {
        warn!("Could not flush prompt: {}", e);
    }
}

//=========================================================================================
// Shared Line Reader
//=========================================================================================

/// A line reader over stdin that several consumers can take turns on.
///
/// The interactive browser reads commands from it and the confirmation prompt reads
/// answers from it; a single reader means no input is lost between the two.
#[derive(Clone)]
pub struct SharedLines {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl SharedLines {
    pub fn stdin() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
        }
    }

    /// The next line, or `None` at end of input. Cancel-safe.
    pub async fn next_line(&self) -> std::io::Result<Option<String>> {
        self.lines.lock().await.next_line().await
    }
}

/// Asks on stdout and reads the answer from a `SharedLines`.
#[derive(Clone)]
pub struct LineConfirmation {
    lines: SharedLines,
}

impl LineConfirmation {
    pub fn new(lines: SharedLines) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl Confirmation for LineConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        print_prompt(prompt);
        match self.lines.next_line().await {
            Ok(Some(answer)) => is_affirmative(&answer),
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES \n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
    }
}
