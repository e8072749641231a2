// Transient user-facing notifications
//
// One alert at a time; raising a new one replaces the current one. Each alert
// expires after its lifetime and is cleared on the next tick.

use std::time::{Duration, Instant};

/// Default alert lifetime
pub const DEFAULT_ALERT_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Warning,
    Info,
}

impl AlertKind {
    pub fn icon(&self) -> &'static str {
        match self {
            AlertKind::Success => "✓",
            AlertKind::Error => "✗",
            AlertKind::Warning => "!",
            AlertKind::Info => "i",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
    pub raised_at: Instant,
    pub ttl: Duration,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            raised_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_expires_after_ttl() {
        let alert = Alert::new(AlertKind::Info, "x", Duration::ZERO);
        assert!(alert.is_expired());

        let alert = Alert::new(AlertKind::Success, "ok", DEFAULT_ALERT_TTL);
        assert!(!alert.is_expired());
    }
}
