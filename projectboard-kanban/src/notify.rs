//! Transient user notifications

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long a toast stays on screen
pub const TOAST_LIFETIME_MS: i64 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// A short message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    /// Assigned by [`ToastQueue::push`]; zero until then
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            id: 0,
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

/// Active toasts, oldest first. Each expires after its lifetime.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
    lifetime: Duration,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            lifetime: Duration::milliseconds(TOAST_LIFETIME_MS),
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Queue a toast and return its id
    pub fn push(&mut self, mut toast: Toast) -> u64 {
        toast.id = self.next_id;
        self.next_id += 1;
        self.toasts.push(toast);
        self.next_id - 1
    }

    /// Remove a toast before it expires. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drop toasts older than the lifetime at `now`, returning how many went
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.toasts.len();
        let lifetime = self.lifetime;
        self.toasts.retain(|t| now - t.created_at < lifetime);
        before - self.toasts.len()
    }

    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_ids() {
        let mut queue = ToastQueue::new();
        let a = queue.push(Toast::new(ToastKind::Error, "Failed to move task."));
        let b = queue.push(Toast::new(ToastKind::Success, "Saved"));
        assert_eq!((a, b), (1, 2));
        assert_eq!(queue.active().len(), 2);
        assert!(queue.active()[0].is_error());
    }

    #[test]
    fn test_expire_after_lifetime() {
        let mut queue = ToastQueue::new();
        let mut toast = Toast::new(ToastKind::Error, "old");
        let created = toast.created_at;
        queue.push(toast.clone());
        toast.created_at = created + Duration::seconds(3);
        toast.message = "newer".into();
        queue.push(toast);

        assert_eq!(queue.expire(created + Duration::milliseconds(3999)), 0);
        assert_eq!(queue.expire(created + Duration::milliseconds(4000)), 1);
        assert_eq!(queue.active()[0].message, "newer");
        assert_eq!(queue.expire(created + Duration::seconds(8)), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dismiss() {
        let mut queue = ToastQueue::new();
        let id = queue.push(Toast::new(ToastKind::Success, "hi"));
        assert!(queue.dismiss(id));
        assert!(!queue.dismiss(id));
    }
}
