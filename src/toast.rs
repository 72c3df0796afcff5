use std::time::{Duration, Instant};

/// How long a toast stays up.
pub const TOAST_TTL: Duration = Duration::from_secs(4);
/// Toasts kept at once; the oldest goes first.
pub const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    pub fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match kind {
            ToastKind::Error => tracing::warn!(toast = %message),
            _ => tracing::info!(toast = %message),
        }
        self.items.push(Toast { kind, message, created: now });
        if self.items.len() > MAX_TOASTS {
            let excess = self.items.len() - MAX_TOASTS;
            self.items.drain(0..excess);
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    /// Drop every toast older than the TTL.
    pub fn expire(&mut self, now: Instant) {
        self.items
            .retain(|t| now.saturating_duration_since(t.created) < TOAST_TTL);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expire_drops_only_old_toasts() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.push_at(ToastKind::Error, "old", start);
        toasts.push_at(ToastKind::Info, "new", start + Duration::from_secs(3));
        toasts.expire(start + TOAST_TTL);
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].message, "new");
    }

    #[test]
    fn capped_at_max() {
        let mut toasts = Toasts::new();
        for i in 0..(MAX_TOASTS + 3) {
            toasts.info(format!("t{i}"));
        }
        assert_eq!(toasts.items().len(), MAX_TOASTS);
        assert_eq!(toasts.items()[0].message, "t3");
    }
}
