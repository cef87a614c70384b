use std::cell::RefCell;

use crate::types::{DiffView, Notification, NotificationLevel};

/// User-facing feedback channel supplied by whoever hosts the commands.
pub trait Host {
    fn show_information_message(&self, message: &str);

    fn show_warning_message(&self, message: &str);

    fn show_diff(&self, view: &DiffView);
}

impl<H: Host + ?Sized> Host for &H {
    fn show_information_message(&self, message: &str) {
        (**self).show_information_message(message);
    }

    fn show_warning_message(&self, message: &str) {
        (**self).show_warning_message(message);
    }

    fn show_diff(&self, view: &DiffView) {
        (**self).show_diff(view);
    }
}

/// Host that keeps every notification and diff view in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    notifications: RefCell<Vec<Notification>>,
    diffs: RefCell<Vec<DiffView>>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }

    #[must_use]
    pub fn diffs(&self) -> Vec<DiffView> {
        self.diffs.borrow().clone()
    }

    fn push(&self, level: NotificationLevel, message: &str) {
        self.notifications.borrow_mut().push(Notification {
            level,
            message: message.to_string(),
        });
    }
}

impl Host for RecordingHost {
    fn show_information_message(&self, message: &str) {
        self.push(NotificationLevel::Information, message);
    }

    fn show_warning_message(&self, message: &str) {
        self.push(NotificationLevel::Warning, message);
    }

    fn show_diff(&self, view: &DiffView) {
        self.diffs.borrow_mut().push(view.clone());
    }
}

/// Last `/` (or `\`) separated segment of `path`, used in notification text.
/// Paths ending in a separator yield themselves.
#[must_use]
pub fn display_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(path)
}

pub mod messages {
    #[must_use]
    pub fn file_added(name: &str) -> String {
        format!("Git: File added - {name}")
    }

    #[must_use]
    pub fn folder_added(name: &str) -> String {
        format!("Git: Folder and contents added - {name}")
    }

    #[must_use]
    pub fn file_unstaged(name: &str) -> String {
        format!("Git: File unstaged - {name}")
    }

    #[must_use]
    pub fn nothing_to_unstage(name: &str) -> String {
        format!("Git: Nothing to unstage - {name}")
    }

    #[must_use]
    pub fn folder_unstaged(name: &str) -> String {
        format!("Git: Folder and contents unstaged - {name}")
    }

    #[must_use]
    pub fn nothing_to_unstage_in_folder(name: &str) -> String {
        format!("Git: Nothing to unstage in folder - {name}")
    }

    #[must_use]
    pub fn diff_title(name: &str) -> String {
        format!("{name} (HEAD ↔ Working Tree)")
    }
}
