use crate::eid::Eid;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToastKind::Success => write!(f, "success"),
            ToastKind::Error => write!(f, "error"),
            ToastKind::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: Eid,
    pub message: String,
    pub kind: ToastKind,
    pub visible: bool,

    #[serde(skip)]
    expires_at: Instant,
}

impl Toast {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Short-lived status messages. Each toast expires on its own after `ttl`;
/// several may be shown at once and identical messages are not merged.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    ttl: Duration,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) -> Eid {
        self.push_at(message, kind, Instant::now())
    }

    pub fn push_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) -> Eid {
        self.prune_at(now);

        let toast = Toast {
            id: Eid::generate(),
            message: message.into(),
            kind,
            visible: true,
            expires_at: now + self.ttl,
        };
        log::debug!("toast [{}] {}", toast.kind, toast.message);

        let id = toast.id.clone();
        self.toasts.push(toast);
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> Eid {
        self.push(message, ToastKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Eid {
        self.push(message, ToastKind::Error)
    }

    pub fn info(&mut self, message: impl Into<String>) -> Eid {
        self.push(message, ToastKind::Info)
    }

    /// Early removal on user action. Returns false when already gone.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id.as_str() != id);
        self.toasts.len() != before
    }

    pub fn prune_at(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.is_expired_at(now));
    }

    /// Toasts still on screen, in the order they were raised.
    pub fn active(&mut self) -> Vec<Toast> {
        self.active_at(Instant::now())
    }

    pub fn active_at(&mut self, now: Instant) -> Vec<Toast> {
        self.prune_at(now);
        self.toasts.clone()
    }

    /// Takes every toast still on screen and empties the queue.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.drain_at(Instant::now())
    }

    pub fn drain_at(&mut self, now: Instant) -> Vec<Toast> {
        self.prune_at(now);
        std::mem::take(&mut self.toasts)
    }
}
