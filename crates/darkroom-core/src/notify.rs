//! Notification sink for user-facing messages.
//!
//! The pipeline never renders messages itself; it hands them to a
//! [`Notifier`]. [`TracingNotifier`] routes them into the log.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// How many rejection messages a summary spells out.
const SUMMARY_LIMIT: usize = 3;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(s)
    }
}

/// Receives user-facing notifications.
pub trait Notifier {
    fn notify(&self, kind: NotifyKind, message: &str);
}

/// Notifier that emits each message as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotifyKind, message: &str) {
        match kind {
            NotifyKind::Error => tracing::error!("{}", message),
            NotifyKind::Warning => tracing::warn!("{}", message),
            NotifyKind::Success | NotifyKind::Info => tracing::info!("{}", message),
        }
    }
}

/// Join the first few rejection messages into one line.
///
/// Returns `None` for an empty list.
pub fn summarize_rejections(errors: &[ValidationError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }

    let shown: Vec<String> = errors
        .iter()
        .take(SUMMARY_LIMIT)
        .map(ToString::to_string)
        .collect();
    let mut summary = shown.join(", ");
    if errors.len() > SUMMARY_LIMIT {
        summary.push_str(&format!(" ...and {} more", errors.len() - SUMMARY_LIMIT));
    }
    Some(summary)
}
