//! Transient user-facing notices.
//!
//! Every stage reports failures and progress through this channel. A notice
//! expires on its own after the configured delay; manual dismissal and the
//! timer never conflict because removal is idempotent.

use std::time::{Duration, Instant};

use crate::logging::{self, obj, v_str, Domain, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Danger,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Danger => "danger",
        }
    }

    fn level(&self) -> Level {
        match self {
            NoticeKind::Success => Level::Info,
            NoticeKind::Warning => Level::Warn,
            NoticeKind::Danger => Level::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Instant,
}

pub struct AlertChannel {
    notices: Vec<Notice>,
    next_id: u64,
    ttl: Duration,
}

impl AlertChannel {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            notices: Vec::new(),
            next_id: 0,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        let message = message.into();
        let id = self.next_id;
        self.next_id += 1;
        logging::log(
            kind.level(),
            Domain::Alert,
            "notice",
            obj(&[("kind", v_str(kind.as_str())), ("msg", v_str(&message))]),
        );
        self.notices.push(Notice {
            id,
            kind,
            message,
            expires_at: Instant::now() + self.ttl,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeKind::Success, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeKind::Warning, message)
    }

    pub fn danger(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeKind::Danger, message)
    }

    /// Drop every notice whose delay has elapsed. Each notice expires on its
    /// own deadline regardless of later pushes.
    pub fn tick(&mut self, now: Instant) {
        self.notices.retain(|n| n.expires_at > now);
    }

    /// Remove a notice by id. A second removal of the same id is a no-op.
    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
