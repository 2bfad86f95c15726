//! User notifications
//!
//! Interfaces for surfacing outcomes to the user (toasts in the onboarding
//! UI) and for reporting API failures, with in-memory and tracing-backed
//! implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation completed
    Success,

    /// Informational
    Info,

    /// Something needs attention
    Warning,

    /// Operation failed
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Longer description
    pub description: String,

    /// Severity
    pub severity: Severity,

    /// When the notification was raised
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            description: description.into(),
            severity,
            created_at: Utc::now(),
        }
    }

    /// Success notification.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Success)
    }

    /// Error notification.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Error)
    }
}

/// Notification emitter.
pub trait Notifier: Send + Sync {
    /// Emit a notification.
    fn notify(&self, notification: Notification);
}

/// Shared reporter for failed API calls.
pub trait ApiErrorReporter: Send + Sync {
    /// Report `error` to the user under `title`.
    fn report(&self, error: &ApiError, title: &str);
}

/// Notifier that records everything it is given.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl MemoryNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications emitted so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .read()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.notifications
            .read()
            .ok()
            .and_then(|list| list.last().cloned())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut list) = self.notifications.write() {
            list.push(notification);
        }
    }
}

/// Notifier that writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success | Severity::Info => {
                info!(title = %notification.title, "{}", notification.description)
            }
            Severity::Warning => warn!(title = %notification.title, "{}", notification.description),
            Severity::Error => error!(title = %notification.title, "{}", notification.description),
        }
    }
}

/// Reporter that logs the error and emits an error notification.
#[derive(Clone)]
pub struct NotifyingErrorReporter {
    notifier: Arc<dyn Notifier>,
}

impl NotifyingErrorReporter {
    /// Report through the given notifier.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// User-facing description for an API error.
    pub fn describe(error: &ApiError) -> String {
        match error {
            ApiError::RequestFailed(e) if e.is_timeout() => {
                "The request timed out. Please try again.".to_string()
            }
            ApiError::RequestFailed(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ApiError::AuthenticationFailed => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::ApiError { message, .. } | ApiError::Rejected(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl ApiErrorReporter for NotifyingErrorReporter {
    fn report(&self, error: &ApiError, title: &str) {
        error!(error = %error, "{}", title);
        self.notifier
            .notify(Notification::error(title, Self::describe(error)));
    }
}
