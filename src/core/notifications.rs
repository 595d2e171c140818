//! Notification sink implementations
//!
//! - `TracingSink` writes notifications to the log
//! - `ChannelSink` forwards them over a tokio channel to a UI task
//! - `CollectingSink` keeps them in memory for inspection

use crate::core::traits::NotificationSink;
use crate::types::{Notification, NotificationKind};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Sink that logs every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => error!(kind = %notification.kind, "{}", notification.message),
            _ => info!(kind = %notification.kind, "{}", notification.message),
        }
    }
}

/// Sink that forwards notifications to an unbounded channel
///
/// Sending never blocks. Notifications sent after the receiver is dropped are
/// discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    /// Create a sink together with the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (ChannelSink { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        if let Err(dropped) = self.sender.send(notification) {
            debug!("notification receiver gone, dropping: {}", dropped.0.message);
        }
    }
}

/// Sink that records notifications in arrival order
#[derive(Debug, Default)]
pub struct CollectingSink {
    received: Mutex<Vec<Notification>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every notification received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.notify(Notification::info("first"));
        sink.notify(Notification::error("second"));
        sink.notify(Notification::success("third"));

        let received = sink.notifications();
        assert_eq!(received.len(), 3);
        assert_eq!(received[0].message, "first");
        assert_eq!(received[1].kind, NotificationKind::Error);
        assert_eq!(sink.count_of(NotificationKind::Success), 1);
    }

    #[test]
    fn test_channel_sink_delivers() {
        let (sink, mut receiver) = ChannelSink::new();
        sink.notify(Notification::success("Statement processed successfully!"));

        let received = receiver.try_recv().unwrap();
        assert_eq!(received.kind, NotificationKind::Success);
        assert_eq!(received.message, "Statement processed successfully!");
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (sink, receiver) = ChannelSink::new();
        drop(receiver);
        sink.notify(Notification::info("nobody listening"));
    }

    #[test]
    fn test_tracing_sink_accepts_every_kind() {
        let sink = TracingSink;
        sink.notify(Notification::success("ok"));
        sink.notify(Notification::error("bad"));
        sink.notify(Notification::info("fyi"));
    }
}
