//! Parse notification / diagnostic system.
//!
//! Non-fatal issues encountered while reading (or writing) a SWF are
//! collected as `Notification` items rather than being silently dropped or
//! causing hard errors. Every notification is also forwarded to the `log`
//! facade.
//!
//! After a read/write operation the caller can inspect
//! [`SwfDocument::notifications`](crate::SwfDocument) to see what was
//! encountered.

use std::fmt;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A tag consumed more or fewer bytes than its header declared; the
    /// cursor was moved to the declared boundary.
    StreamDesync,
    /// The end of the data was reached without an End tag.
    UnterminatedStream,
    /// A tag failed to parse and its raw record was kept instead (failsafe).
    TagFallback,
    /// A recognised feature whose processing is not implemented.
    NotImplemented,
    /// Any other non-fatal warning.
    Warning,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamDesync => write!(f, "StreamDesync"),
            Self::UnterminatedStream => write!(f, "UnterminatedStream"),
            Self::TagFallback => write!(f, "TagFallback"),
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single notification produced during reading or writing.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The category.
    pub notification_type: NotificationType,
    /// A human-readable description of the issue.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Collects notifications during a read/write operation.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification and forward it to the log.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        let notification = Notification::new(notification_type, message);
        match notification_type {
            NotificationType::NotImplemented => log::debug!("{notification}"),
            _ => log::warn!("{notification}"),
        }
        self.items.push(notification);
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drop all collected notifications.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_basics() {
        let mut c = NotificationCollection::new();
        assert!(c.is_empty());

        c.notify(NotificationType::StreamDesync, "excess bytes: 2");
        c.notify(NotificationType::UnterminatedStream, "no end tag");
        c.notify(NotificationType::StreamDesync, "excess bytes: -1");

        assert_eq!(c.len(), 3);
        assert_eq!(c.of_type(NotificationType::StreamDesync).len(), 2);
        assert!(c.has_type(NotificationType::UnterminatedStream));
        assert!(!c.has_type(NotificationType::TagFallback));

        c.clear();
        assert!(c.is_empty());
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationType::NotImplemented, "ADPCM sound stream");
        assert_eq!(format!("{}", n), "[NotImplemented] ADPCM sound stream");
    }
}
