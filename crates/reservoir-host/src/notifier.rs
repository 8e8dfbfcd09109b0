//! Notifier that forwards economy messages to the host's output loop.
//!
//! The economy raises [`Notification`]s synchronously while a command
//! runs. [`ChannelNotifier`] pushes them onto an unbounded `tokio` channel
//! and the command loop drains and prints them after each command.

use chrono::{DateTime, TimeZone};
use reservoir_core::{Notification, Notifier};
use reservoir_types::WarningLevel;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::warn;

/// Notifier backed by an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver that drains it.
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&mut self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            warn!("Notification receiver dropped");
        }
    }
}

/// Tag printed before a warning.
const fn severity_tag(level: WarningLevel) -> &'static str {
    match level {
        WarningLevel::Discomfort => "WARN",
        WarningLevel::Pain => "PAIN",
        WarningLevel::SeverePain => "SEVERE",
    }
}

/// Render a notification as one output line stamped with `at`.
pub fn format_notification<Tz>(notification: &Notification, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    let time = at.format("%H:%M:%S");
    match notification.warning {
        Some(level) => format!(
            "[{time}] {}: {}",
            severity_tag(level),
            notification.message
        ),
        None => format!("[{time}] {}", notification.message),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use reservoir_types::CharacterId;

    use super::*;

    fn notification(warning: Option<WarningLevel>, message: &str) -> Notification {
        Notification {
            character: CharacterId::from("Rin"),
            warning,
            message: String::from(message),
        }
    }

    #[test]
    fn channel_delivers_in_order() {
        let (mut notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify(notification(None, "one"));
        notifier.notify(notification(Some(WarningLevel::Pain), "two"));

        assert_eq!(rx.try_recv().ok().map(|n| n.message), Some(String::from("one")));
        assert_eq!(
            rx.try_recv().ok().and_then(|n| n.warning),
            Some(WarningLevel::Pain)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_not_fatal() {
        let (mut notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify(notification(None, "lost"));
    }

    #[test]
    fn warnings_carry_a_severity_tag() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 7).single();
        assert!(at.is_some());
        let Some(at) = at else { return };

        assert_eq!(
            format_notification(&notification(None, "Rin reached level 2"), &at),
            "[09:05:07] Rin reached level 2"
        );
        assert_eq!(
            format_notification(
                &notification(Some(WarningLevel::SeverePain), "Rin is in severe pain"),
                &at
            ),
            "[09:05:07] SEVERE: Rin is in severe pain"
        );
    }
}
