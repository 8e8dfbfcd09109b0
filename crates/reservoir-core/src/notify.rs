//! Host-facing event plumbing: turn triggers and user notifications.
//!
//! The host owns both directions. It fires a [`TurnTrigger`] once per
//! qualifying chat turn with the speaking character's identity, and it
//! receives [`Notification`]s through whatever [`Notifier`] it hands to
//! the economy.

use reservoir_types::{CharacterId, WarningLevel};

/// A user-visible message, distinct from an operation's return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Character the message is about.
    pub character: CharacterId,
    /// Overflow severity, when the message is an overflow warning.
    pub warning: Option<WarningLevel>,
    /// Message text.
    pub message: String,
}

/// Receives notifications raised by the economy.
pub trait Notifier {
    /// Surface a message to the user.
    fn notify(&mut self, notification: Notification);
}

/// A notifier that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&mut self, _notification: Notification) {}
}

/// A notifier that keeps every notification in order.
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Notifications received so far.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Remove and return everything received so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.entries)
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, notification: Notification) {
        self.entries.push(notification);
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

type TurnCallback<'a> = Box<dyn FnMut(&CharacterId) + 'a>;

/// Fan-out point for "a chat turn happened" events.
///
/// Callbacks registered with [`TurnTrigger::on_turn_advance`] run in
/// registration order, each receiving the identity of the character that
/// spoke.
#[derive(Default)]
pub struct TurnTrigger<'a> {
    callbacks: Vec<TurnCallback<'a>>,
}

impl<'a> TurnTrigger<'a> {
    /// Create a trigger with no callbacks.
    pub const fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Register a callback invoked once per turn event.
    pub fn on_turn_advance(&mut self, callback: impl FnMut(&CharacterId) + 'a) {
        self.callbacks.push(Box::new(callback));
    }

    /// Deliver a turn event to every callback. Returns how many ran.
    pub fn fire(&mut self, speaker: &CharacterId) -> usize {
        for callback in &mut self.callbacks {
            callback(speaker);
        }
        self.callbacks.len()
    }
}

impl core::fmt::Debug for TurnTrigger<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TurnTrigger")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_order_and_drains() {
        let mut log = NotificationLog::new();
        for text in ["first", "second"] {
            log.notify(Notification {
                character: CharacterId::from("Rin"),
                warning: None,
                message: String::from(text),
            });
        }
        let messages: Vec<String> = log.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn trigger_delivers_speaker_to_every_callback() {
        let mut first = Vec::new();
        let mut second = 0_u32;
        {
            let mut trigger = TurnTrigger::new();
            trigger.on_turn_advance(|speaker| first.push(speaker.clone()));
            trigger.on_turn_advance(|_| second = second.saturating_add(1));
            assert_eq!(trigger.fire(&CharacterId::from("Rin")), 2);
            assert_eq!(trigger.fire(&CharacterId::from("Kai")), 2);
        }
        assert_eq!(first, vec![CharacterId::from("Rin"), CharacterId::from("Kai")]);
        assert_eq!(second, 2);
    }

    #[test]
    fn empty_trigger_runs_nothing() {
        let mut trigger = TurnTrigger::new();
        assert_eq!(trigger.fire(&CharacterId::from("Rin")), 0);
    }
}
