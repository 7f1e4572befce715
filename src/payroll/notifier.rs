#[cfg(test)]
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message meant for the operator who triggered an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub operator: String,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(operator: &str, message: impl Into<String>) -> Self {
        Self {
            operator: operator.to_string(),
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(operator: &str, message: impl Into<String>) -> Self {
        Self {
            operator: operator.to_string(),
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the application log.
#[derive(Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => {
                tracing::info!(operator = %notice.operator, "{}", notice.message)
            }
            NoticeLevel::Error => {
                tracing::warn!(operator = %notice.operator, "{}", notice.message)
            }
        }
    }
}

/// Keeps every notice in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
