use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::{TOAST_CAPACITY, TOAST_TTL_SECS};

/// User-facing notification sink. Fire-and-forget: nothing is returned.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);

    fn notify_info(&self, _message: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub created_at: Instant,
}

/// Bounded queue of recent toasts, drawn in the footer.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: Mutex<VecDeque<Toast>>,
    ttl: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_secs(TOAST_TTL_SECS))
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self { toasts: Mutex::new(VecDeque::with_capacity(TOAST_CAPACITY)), ttl }
    }

    fn push(&self, level: ToastLevel, message: &str) {
        let mut toasts = self.toasts.lock().unwrap_or_else(|p| p.into_inner());
        if toasts.len() == TOAST_CAPACITY {
            toasts.pop_front();
        }
        toasts.push_back(Toast { level, message: message.to_string(), created_at: Instant::now() });
    }

    /// Live toasts, oldest first. Expired ones are dropped on the way.
    pub fn visible(&self) -> Vec<Toast> {
        let mut toasts = self.toasts.lock().unwrap_or_else(|p| p.into_inner());
        let ttl = self.ttl;
        toasts.retain(|t| t.created_at.elapsed() < ttl);
        toasts.iter().cloned().collect()
    }
}

impl Notifier for ToastQueue {
    fn notify_error(&self, message: &str) {
        self.push(ToastLevel::Error, message);
    }

    fn notify_info(&self, message: &str) {
        self.push(ToastLevel::Info, message);
    }
}
