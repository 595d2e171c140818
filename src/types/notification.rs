//! User-facing notification types
//!
//! Notifications are fire-and-forget status events handed to a
//! `NotificationSink` for display. The engine never waits on delivery.

use serde::Serialize;
use std::fmt;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        };
        f.write_str(label)
    }
}

/// A single user-facing status message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            kind: NotificationKind::Info,
        }
    }
}
