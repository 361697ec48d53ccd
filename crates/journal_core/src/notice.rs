//! Transient status notices.
//!
//! # Responsibility
//! - Hold the single current status message with its expiry deadline.
//!
//! # Invariants
//! - Posting a new message replaces the prior one and restarts the
//!   time-to-live window (the old deadline is cancelled, never fires).
//! - Expiry is lazy: readers pass a clock instant and expired messages
//!   read as absent.

use std::time::{Duration, Instant};

/// How long a posted message stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    expires_at: Instant,
}

/// One-slot holder for the current transient message.
#[derive(Debug, Default)]
pub struct NoticeCenter {
    current: Option<Notice>,
}

impl NoticeCenter {
    pub fn post(&mut self, text: impl Into<String>) {
        self.post_at(text, Instant::now());
    }

    pub fn post_at(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            text: text.into(),
            expires_at: now + NOTICE_TTL,
        });
    }

    pub fn current(&self) -> Option<&str> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|notice| now < notice.expires_at)
            .map(|notice| notice.text.as_str())
    }

    /// Explicit dismissal.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
