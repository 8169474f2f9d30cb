//! # Notifier
//!
//! Fire-and-forget channel for user-facing error messages.
//!
//! The store never waits on a notifier and never looks at what happened to
//! a message after handing it over.
//!
//! ```text
//! CartStore ──notify("Erro na adição do produto")──► Notifier
//!                                                      │
//!                               ┌──────────────────────┴───────────────┐
//!                               ▼                                      ▼
//!                        TracingNotifier                        ChannelNotifier
//!                        (warn! event)                          (mpsc → UI toasts)
//! ```

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Receives human-readable error messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Logs each message as a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!(target: "shoecart::notify", "{}", message);
    }
}

/// Forwards messages to a presentation layer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    /// Creates the notifier and the receiving end for the UI.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (ChannelNotifier { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str) {
        if self.sender.send(message.to_string()).is_err() {
            debug!(dropped = message, "Notification dropped, receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_delivers_in_order() {
        let (notifier, mut receiver) = ChannelNotifier::new();
        notifier.notify("first");
        notifier.notify("second");

        assert_eq!(receiver.try_recv().unwrap(), "first");
        assert_eq!(receiver.try_recv().unwrap(), "second");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_notifier_ignores_closed_receiver() {
        let (notifier, receiver) = ChannelNotifier::new();
        drop(receiver);
        notifier.notify("nobody listening");
    }
}
