//! Toast notifications
//!
//! Short, user-facing messages raised by the session when an analysis
//! resolves. The terminal implementation prints them to stderr so they stay
//! out of the rendered views on stdout.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::new(title, description)
        }
    }

    pub fn analysis_complete(item_count: usize) -> Self {
        Self::new(
            "Analysis Complete!",
            format!("Found {} food items in your meal.", item_count),
        )
    }

    pub fn analysis_failed() -> Self {
        Self::destructive(
            "Analysis Failed",
            "Please try again with a clearer photo.",
        )
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, toast: Toast) {
        let marker = match toast.variant {
            ToastVariant::Default => "*",
            ToastVariant::Destructive => "!",
        };
        eprintln!("[{}] {}: {}", marker, toast.title, toast.description);
    }
}

/// Keeps every toast in memory.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_complete_counts_items() {
        let toast = Toast::analysis_complete(3);
        assert_eq!(toast.title, "Analysis Complete!");
        assert_eq!(toast.description, "Found 3 food items in your meal.");
        assert_eq!(toast.variant, ToastVariant::Default);
    }

    #[test]
    fn test_analysis_failed_is_destructive() {
        let toast = Toast::analysis_failed();
        assert_eq!(toast.variant, ToastVariant::Destructive);
        assert!(toast.description.contains("clearer photo"));
    }

    #[test]
    fn test_recording_notifier_shares_history() {
        let notifier = RecordingNotifier::new();
        let probe = notifier.clone();

        notifier.notify(Toast::new("One", "first"));
        notifier.notify(Toast::analysis_failed());

        assert_eq!(probe.get_toasts().len(), 2);
        assert_eq!(probe.last(), Some(Toast::analysis_failed()));
    }
}
