//! Transient "copied" / "exported" banners.
//!
//! Each raise hands out a ticket. The scheduled reset only clears the flag if no
//! newer raise happened in between, so a second copy inside the display window
//! keeps the banner up for its own full interval.

use serde::{Deserialize, Serialize};

/// Which export action a notification (or an export request) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Copy,
    Document,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flag {
    active: bool,
    ticket: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Notifications {
    copied: Flag,
    exported: Flag,
}

/// Serializable view of both flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationsView {
    pub copied: bool,
    pub exported: bool,
}

impl Notifications {
    /// Raises the flag and returns the ticket the reset must present.
    pub fn raise(&mut self, kind: ExportKind) -> u64 {
        let flag = self.flag_mut(kind);
        flag.ticket += 1;
        flag.active = true;
        flag.ticket
    }

    /// Clears the flag if `ticket` is still the latest raise. Returns whether it was cleared.
    pub fn expire(&mut self, kind: ExportKind, ticket: u64) -> bool {
        let flag = self.flag_mut(kind);
        if flag.active && flag.ticket == ticket {
            flag.active = false;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub fn is_active(&self, kind: ExportKind) -> bool {
        match kind {
            ExportKind::Copy => self.copied.active,
            ExportKind::Document => self.exported.active,
        }
    }

    pub fn view(&self) -> NotificationsView {
        NotificationsView {
            copied: self.copied.active,
            exported: self.exported.active,
        }
    }

    fn flag_mut(&mut self, kind: ExportKind) -> &mut Flag {
        match kind {
            ExportKind::Copy => &mut self.copied,
            ExportKind::Document => &mut self.exported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_then_expire_clears_flag() {
        let mut notifications = Notifications::default();
        let ticket = notifications.raise(ExportKind::Copy);
        assert!(notifications.is_active(ExportKind::Copy));

        assert!(notifications.expire(ExportKind::Copy, ticket));
        assert!(!notifications.is_active(ExportKind::Copy));
    }

    #[test]
    fn test_stale_ticket_does_not_clear_newer_raise() {
        let mut notifications = Notifications::default();
        let first = notifications.raise(ExportKind::Document);
        let second = notifications.raise(ExportKind::Document);

        assert!(!notifications.expire(ExportKind::Document, first));
        assert!(notifications.is_active(ExportKind::Document));
        assert!(notifications.expire(ExportKind::Document, second));
    }

    #[test]
    fn test_flags_are_independent() {
        let mut notifications = Notifications::default();
        notifications.raise(ExportKind::Copy);

        let view = notifications.view();
        assert!(view.copied);
        assert!(!view.exported);
    }

    #[test]
    fn test_export_kind_serde_names() {
        let kind: ExportKind = serde_json::from_str(r#""document""#).unwrap();
        assert_eq!(kind, ExportKind::Document);
        assert_eq!(serde_json::to_string(&ExportKind::Copy).unwrap(), r#""copy""#);
    }
}
