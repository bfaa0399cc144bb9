//! Transient user notifications
//!
//! Stores report outcomes here instead of returning errors to the UI.

use std::fmt;

use tokio::sync::mpsc;

/// A toast-style message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives notifications from the stores
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::Error(message.to_string()));
    }
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => tracing::info!(%message, "notification"),
            Notification::Error(message) => tracing::warn!(%message, "notification"),
        }
    }
}

/// Forwards notifications to a UI task over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::trace!("Notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.success("Logged in successfully");
        notifier.error("Invalid credentials");

        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::Success("Logged in successfully".into())
        );
        let err = rx.try_recv().unwrap();
        assert!(err.is_error());
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.error("nobody listening");
    }
}
