//! Message formatter.
//!
//! Turns a build event into the markdown-flavoured text the chat webhook
//! displays. The output layout is consumed verbatim by the webhook:
//!
//! 1. Header: status glyph, build name, number, status text and build-log link
//! 2. `Triggered by:` line (info events, or verbose recipients)
//! 3. Author / description table of at most five changes (same condition)

use std::fmt::Write;

use chime_common::types::{BuildEvent, EventCategory, StatusKind};

/// Maximum number of change rows rendered in the change table.
pub const MAX_CHANGE_ROWS: usize = 5;

/// Line separator used by the chat markdown dialect.
const LINE_BREAK: &str = "\n  ";

/// Formats build events into webhook messages.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    root_url: String,
}

impl MessageFormatter {
    /// `root_url` is the build server base URL, e.g. `https://ci.example.com`.
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
        }
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Link to the build log page for this event.
    pub fn build_log_url(&self, event: &BuildEvent) -> String {
        format!(
            "{}/viewLog.html?buildNumber={}&buildTypeId={}",
            self.root_url, event.build_number, event.build_type_id
        )
    }

    /// Render the message for `event`.
    ///
    /// Trigger and change details are included for info-class events, and for
    /// every event when `verbose` is set.
    pub fn format(&self, event: &BuildEvent, category: EventCategory, verbose: bool) -> String {
        let (status, status_text) = category.status();

        let mut message = format!(
            "/md ### {} {} #{}: {}{}[View build]({}){}",
            status.glyph(),
            event.full_name,
            event.build_number,
            status_text,
            LINE_BREAK,
            self.build_log_url(event),
            LINE_BREAK,
        );

        if status == StatusKind::Info || verbose {
            if let Some(triggered_by) = &event.triggered_by {
                let _ = write!(message, "Triggered by: {}{}", triggered_by, LINE_BREAK);
            }

            if !event.changes.is_empty() {
                message.push_str("| Author | Description |\n|-|-|\n");
                for change in event.changes.iter().take(MAX_CHANGE_ROWS) {
                    let _ = write!(
                        message,
                        "| {} | {} |{}",
                        change.author,
                        change.first_line(),
                        LINE_BREAK
                    );
                }
            }
        }

        message
    }
}
